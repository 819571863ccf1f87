/// Data layer: core types, loading, and grid alignment.
///
/// Architecture:
/// ```text
///  .csv / .txt
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → SpectralCurve
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ WeightedCurve  │  curve × user multiplier
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  align    │  common grid + sum → CompositeCurve
///   └──────────┘
/// ```

pub mod align;
pub mod loader;
pub mod model;
