/// View layer: everything between the dataset and the painter.
///
/// ```text
///   Dataset + ViewConfig + surface size
///        │
///        ▼
///   layout ── scale ── histogram      built once per layout pass
///        │
///        ▼
///   interaction ──► ViewState         input events mutate state
///        │
///        ▼
///   selection (threshold + brush)     pure derivation
///        │
///        ▼
///   reconcile                         keyed polyline marks
/// ```

pub mod brush;
pub mod histogram;
pub mod interaction;
pub mod layout;
pub mod reconcile;
pub mod scale;
pub mod selection;
pub mod zoom;
