use super::model::CellValue;

/// Grid size used by the distribution chart unless configured otherwise.
pub const DEFAULT_GRID_POINTS: usize = 200;

/// How many bandwidths the grid extends beyond the smallest / largest sample.
const CUT: f64 = 3.0;

/// Gaussian kernel density estimate of the numeric cells, as `[x, density]`
/// points on an evenly spaced grid.
///
/// Bandwidth follows Scott's rule, `σ · n^(-1/5)` with the sample standard
/// deviation. Fewer than two values, or values with no spread, give an empty
/// curve since no bandwidth can be derived.
pub fn gaussian_kde<'a>(
    values: impl IntoIterator<Item = &'a CellValue>,
    grid_points: usize,
) -> Vec<[f64; 2]> {
    let samples: Vec<f64> = values.into_iter().filter_map(CellValue::as_f64).collect();
    let n = samples.len();
    if n < 2 || grid_points < 2 {
        return Vec::new();
    }

    let mean = samples.iter().sum::<f64>() / n as f64;
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let std_dev = variance.sqrt();
    if std_dev <= f64::EPSILON {
        return Vec::new();
    }
    let bandwidth = std_dev * (n as f64).powf(-0.2);

    let min = samples.iter().cloned().fold(f64::INFINITY, f64::min) - CUT * bandwidth;
    let max = samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max) + CUT * bandwidth;
    let step = (max - min) / (grid_points - 1) as f64;
    let norm = 1.0 / (n as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    (0..grid_points)
        .map(|i| {
            let x = min + i as f64 * step;
            let density: f64 = samples
                .iter()
                .map(|&xi| {
                    let z = (x - xi) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum();
            [x, density * norm]
        })
        .collect()
}
