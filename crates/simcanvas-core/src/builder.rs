//! Producer-side helpers: world positions → unit square, shapes → layers.

use crate::error::{Error, Result};
use crate::model::{Frame, Layer, ShapeDescriptor};
use std::collections::BTreeMap;

/// Axis-aligned bounds of a continuous simulation space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContinuousSpace {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl ContinuousSpace {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Self> {
        let extent_ok = |lo: f64, hi: f64| (hi - lo).is_finite() && hi != lo;
        if !extent_ok(x_min, x_max) {
            return Err(Error::DegenerateSpace { axis: "x" });
        }
        if !extent_ok(y_min, y_max) {
            return Err(Error::DegenerateSpace { axis: "y" });
        }
        Ok(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    /// Map a world position into the unit square. Positions outside the
    /// space map outside `[0, 1]`.
    pub fn normalize(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.x_min) / (self.x_max - self.x_min),
            (y - self.y_min) / (self.y_max - self.y_min),
        )
    }
}

/// Collects shapes by layer number and yields a [`Frame`] ordered by layer.
#[derive(Debug, Default)]
pub struct FrameBuilder {
    layers: BTreeMap<u32, Layer>,
}

impl FrameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `shape` to `layer`; shapes within a layer keep insertion order.
    pub fn push(&mut self, layer: u32, shape: ShapeDescriptor) -> &mut Self {
        self.layers.entry(layer).or_default().push(shape);
        self
    }

    pub fn build(self) -> Frame {
        Frame::from_layers(self.layers.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalize_maps_bounds_to_unit_square() {
        let space = ContinuousSpace::new(-10.0, 10.0, 0.0, 50.0).unwrap();
        assert_eq!(space.normalize(-10.0, 0.0), (0.0, 0.0));
        assert_eq!(space.normalize(10.0, 50.0), (1.0, 1.0));
        assert_eq!(space.normalize(0.0, 25.0), (0.5, 0.5));
        assert_eq!(space.normalize(20.0, -50.0), (1.5, -1.0));
    }

    #[test]
    fn degenerate_space_is_rejected() {
        assert!(matches!(
            ContinuousSpace::new(1.0, 1.0, 0.0, 1.0),
            Err(Error::DegenerateSpace { axis: "x" })
        ));
        assert!(matches!(
            ContinuousSpace::new(0.0, 1.0, 0.0, f64::INFINITY),
            Err(Error::DegenerateSpace { axis: "y" })
        ));
    }

    #[test]
    fn layers_come_out_in_numeric_order() {
        let mut builder = FrameBuilder::new();
        builder
            .push(3, ShapeDescriptor::circle(0.1, 0.1, 1.0, "c", true))
            .push(1, ShapeDescriptor::circle(0.2, 0.2, 1.0, "a", true))
            .push(3, ShapeDescriptor::circle(0.3, 0.3, 1.0, "d", true))
            .push(2, ShapeDescriptor::circle(0.4, 0.4, 1.0, "b", true));
        let frame = builder.build();

        assert_eq!(frame.layers().len(), 3);
        let colors: Vec<&str> = frame
            .shapes()
            .map(|s| match s {
                ShapeDescriptor::Circle { color, .. } => color.as_str(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(colors, ["a", "b", "c", "d"]);
    }
}
