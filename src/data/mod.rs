/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Vec<RawRecord>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  keyed records, per-stat extents
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  minimum-Total threshold → selected indices
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
