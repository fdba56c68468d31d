//! Core of SimCanvas: paints simulation frames onto a 2D surface.
//!
//! A frame is a list of layers of shape descriptors whose coordinates live in
//! the unit square. The [`Renderer`] maps them onto pixels with the y axis
//! pointing up, through any [`Surface`] implementation.

pub mod builder;
pub mod config;
pub mod error;
pub mod model;
pub mod record;
pub mod render;
pub mod surface;
pub mod wire;

pub use builder::{ContinuousSpace, FrameBuilder};
pub use config::SurfaceConfig;
pub use error::{Error, Result};
pub use model::*;
pub use render::{DrawStats, Renderer};
pub use surface::{SavedState, Surface};
pub use wire::{DecodedFrame, decode_frame, decode_frame_value, encode_frame};

// Re-export the transform type so surface implementors share one version
pub use kurbo::{Affine, Point};
