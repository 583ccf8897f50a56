//! Writes a deterministic demo dataset: `sample_data/summary.parquet` and
//! `sample_data/raw.parquet`, loadable with `cane-dashboard sample_data`.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray, TimestampSecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct Farmer {
    name: &'static str,
    father: &'static str,
    mobile: i64,
    village: &'static str,
    device: String,
    irrigations: i64,
}

const FARMERS: [(&str, &str, &str); 8] = [
    ("Asha Devi", "Ram Lal", "Kheri"),
    ("Bhola Singh", "Jagdish Singh", "Kheri"),
    ("Chanda Rani", "Mohan Lal", "Kheri"),
    ("Dinesh Kumar", "Suresh Kumar", "Mirzapur"),
    ("Geeta Yadav", "Ramesh Yadav", "Mirzapur"),
    ("Harish Verma", "Omkar Verma", "Sitapur"),
    ("Kamla Devi", "Shyam Lal", "Sitapur"),
    ("Lakhan Pal", "Brij Pal", "Sitapur"),
];

const DAYS: i64 = 60;

fn write_parquet(path: &Path, columns: Vec<(&str, DataType, ArrayRef)>) -> Result<()> {
    let schema = Arc::new(Schema::new(
        columns
            .iter()
            .map(|(name, dtype, _)| Field::new(*name, dtype.clone(), false))
            .collect::<Vec<_>>(),
    ));
    let arrays = columns.into_iter().map(|(_, _, a)| a).collect();
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn strings<S: AsRef<str>>(values: &[S]) -> ArrayRef {
    Arc::new(StringArray::from(
        values.iter().map(|s| s.as_ref()).collect::<Vec<_>>(),
    ))
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let out_dir = Path::new("sample_data");
    std::fs::create_dir_all(out_dir).context("creating sample_data/")?;

    let farmers: Vec<Farmer> = FARMERS
        .iter()
        .enumerate()
        .map(|(i, &(name, father, village))| Farmer {
            name,
            father,
            mobile: 9_800_000_000 + (rng.next_u64() % 100_000_000) as i64,
            village,
            device: format!("JSP-{:03}", i + 1),
            irrigations: 4 + (rng.next_u64() % 6) as i64,
        })
        .collect();

    // ---- summary sheet: one row per device ----
    let mut irrigated = Vec::new();
    let mut rain = Vec::new();
    let mut total = Vec::new();
    let mut yields = Vec::new();
    for f in &farmers {
        let irrigated_water = f.irrigations as f64 * rng.range(2.2, 3.0);
        let rain_water = rng.range(7.5, 9.5);
        irrigated.push((irrigated_water * 100.0).round() / 100.0);
        rain.push((rain_water * 100.0).round() / 100.0);
        total.push(((irrigated_water + rain_water) * 100.0).round() / 100.0);
        yields.push((rng.gauss(300.0, 15.0) + f.irrigations as f64 * 2.0).round());
    }

    let villages: Vec<&str> = farmers.iter().map(|f| f.village).collect();
    let names: Vec<&str> = farmers.iter().map(|f| f.name).collect();
    let devices: Vec<&str> = farmers.iter().map(|f| f.device.as_str()).collect();
    let irrigation_counts: Vec<i64> = farmers.iter().map(|f| f.irrigations).collect();
    let float = DataType::Float64;
    write_parquet(
        &out_dir.join("summary.parquet"),
        vec![
            ("Village Name", DataType::Utf8, strings(&villages)),
            ("Farmer Name", DataType::Utf8, strings(&names)),
            ("Device ID", DataType::Utf8, strings(&devices)),
            ("No of Irrigation", DataType::Int64, Arc::new(Int64Array::from(irrigation_counts))),
            ("Yield (quintal/acre)", float.clone(), Arc::new(Float64Array::from(yields))),
            (
                "Irrigated Water (lakh L/acre)",
                float.clone(),
                Arc::new(Float64Array::from(irrigated)),
            ),
            ("Total Water (lakh L/acre)", float.clone(), Arc::new(Float64Array::from(total))),
            ("Rain Water (lakh L/acre)", float, Arc::new(Float64Array::from(rain))),
        ],
    )?;

    // ---- raw sheet: one daily moisture reading per device ----
    let start = NaiveDate::from_ymd_opt(2024, 7, 1)
        .and_then(|d| d.and_hms_opt(6, 0, 0))
        .context("invalid start date")?;

    let mut name = Vec::new();
    let mut father = Vec::new();
    let mut mobile = Vec::new();
    let mut village = Vec::new();
    let mut device = Vec::new();
    let mut created = Vec::new();
    let mut moisture = Vec::new();
    let mut irrigations = Vec::new();

    for f in &farmers {
        let irrigation_every = DAYS / f.irrigations;
        let mut level: f64 = rng.range(28.0, 34.0);
        for day in 0..DAYS {
            if day > 0 && day % irrigation_every == 0 {
                level = rng.range(34.0, 38.0);
            } else {
                level = (level - rng.range(0.2, 0.9)).max(12.0);
            }
            name.push(f.name);
            father.push(f.father);
            mobile.push(f.mobile);
            village.push(f.village);
            device.push(f.device.as_str());
            created.push((start + Duration::days(day)).and_utc().timestamp());
            moisture.push((level * 100.0).round() / 100.0);
            irrigations.push(f.irrigations);
        }
    }
    let rows = name.len();

    write_parquet(
        &out_dir.join("raw.parquet"),
        vec![
            ("Farmer Name", DataType::Utf8, strings(&name)),
            ("Father Name", DataType::Utf8, strings(&father)),
            ("Mobile Number", DataType::Int64, Arc::new(Int64Array::from(mobile))),
            ("Village Name", DataType::Utf8, strings(&village)),
            ("Device ID", DataType::Utf8, strings(&device)),
            (
                "CreateDate",
                DataType::Timestamp(TimeUnit::Second, None),
                Arc::new(TimestampSecondArray::from(created)),
            ),
            ("CalculatedValue", DataType::Float64, Arc::new(Float64Array::from(moisture))),
            ("No of Irrigation", DataType::Int64, Arc::new(Int64Array::from(irrigations))),
        ],
    )?;

    println!(
        "Wrote {} devices and {rows} readings to {}",
        farmers.len(),
        out_dir.display()
    );
    Ok(())
}
