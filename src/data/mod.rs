/// Data layer: core types, loading, caching, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .xlsx / .ods / directory of .parquet|.csv|.json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read sheet → Table, check schema
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  (resource, sheet) → Arc<Table>, loaded once
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  village / farmer selection → row subset
///   └──────────┘
///        │
///        ▼
///   ┌─────────────────────────────┐
///   │ aggregate / series / density│  KPIs, grouped means, time series, KDE
///   └─────────────────────────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod density;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod series;
