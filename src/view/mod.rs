//! Display hand-off
//!
//! Pure geometry for the host renderer: maps physical results to pixels and
//! builds colored vertex lists. No drawing happens in this crate.

pub mod mapping;
pub mod shapes;
pub mod vertex;

pub use mapping::{ScreenMapping, TubeViewMapping, ViewAxis, Viewport};
pub use shapes::{trail_color, view_panel};
pub use vertex::Vertex;
