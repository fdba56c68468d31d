//! Native backend: paints frames into a Vello [`Scene`](vello::Scene).
//!
//! The host owns the wgpu device and presents the scene; this crate only
//! encodes it.

pub mod scene;

pub use scene::{PaintCounts, SceneSurface, parse_css_color};
