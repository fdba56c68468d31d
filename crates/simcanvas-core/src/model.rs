//! Shape descriptors, layers, and frames.
//!
//! Positions are normalized to the unit square with the origin at the
//! bottom-left. Radii and line widths are already in pixels. Nothing here
//! knows about the surface size; the renderer does the scaling.

// ─── Shapes ──────────────────────────────────────────────────────────────

/// One primitive to paint.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeDescriptor {
    /// Circle centered at `(x, y)` with a pixel radius.
    Circle {
        x: f64,
        y: f64,
        r: f64,
        color: String,
        filled: bool,
    },
    /// Straight segment between two normalized points.
    Line {
        from_x: f64,
        from_y: f64,
        to_x: f64,
        to_y: f64,
        width: f64,
        color: String,
    },
    /// Oriented triangle marker, pointing along `angle` (radians).
    ArrowHead {
        x: f64,
        y: f64,
        angle: f64,
        scale: f64,
        color: String,
        filled: bool,
    },
    /// A tag this renderer does not know. Drawing it does nothing.
    Unknown { tag: String },
}

impl ShapeDescriptor {
    pub fn circle(x: f64, y: f64, r: f64, color: impl Into<String>, filled: bool) -> Self {
        Self::Circle {
            x,
            y,
            r,
            color: color.into(),
            filled,
        }
    }

    pub fn line(
        from: (f64, f64),
        to: (f64, f64),
        width: f64,
        color: impl Into<String>,
    ) -> Self {
        Self::Line {
            from_x: from.0,
            from_y: from.1,
            to_x: to.0,
            to_y: to.1,
            width,
            color: color.into(),
        }
    }

    pub fn arrow_head(
        x: f64,
        y: f64,
        angle: f64,
        scale: f64,
        color: impl Into<String>,
        filled: bool,
    ) -> Self {
        Self::ArrowHead {
            x,
            y,
            angle,
            scale,
            color: color.into(),
            filled,
        }
    }

    /// The wire tag for this shape.
    pub fn tag(&self) -> &str {
        match self {
            Self::Circle { .. } => "circle",
            Self::Line { .. } => "line",
            Self::ArrowHead { .. } => "arrowHead",
            Self::Unknown { tag } => tag,
        }
    }

    /// `true` when every numeric field is finite.
    ///
    /// `Unknown` has no numeric fields and is always finite.
    pub fn is_finite(&self) -> bool {
        match *self {
            Self::Circle { x, y, r, .. } => [x, y, r].iter().all(|v| v.is_finite()),
            Self::Line {
                from_x,
                from_y,
                to_x,
                to_y,
                width,
                ..
            } => [from_x, from_y, to_x, to_y, width]
                .iter()
                .all(|v| v.is_finite()),
            Self::ArrowHead {
                x, y, angle, scale, ..
            } => [x, y, angle, scale].iter().all(|v| v.is_finite()),
            Self::Unknown { .. } => true,
        }
    }
}

// ─── Layers & frames ─────────────────────────────────────────────────────

/// Shapes painted in order; later shapes cover earlier ones.
pub type Layer = Vec<ShapeDescriptor>;

/// One renderable snapshot: layers painted back to front.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    layers: Vec<Layer>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_layers(layers: Vec<Layer>) -> Self {
        Self { layers }
    }

    /// A frame with a single layer.
    pub fn single(shapes: Layer) -> Self {
        Self {
            layers: vec![shapes],
        }
    }

    pub fn push_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Every shape in paint order.
    pub fn shapes(&self) -> impl Iterator<Item = &ShapeDescriptor> {
        self.layers.iter().flatten()
    }

    pub fn shape_count(&self) -> usize {
        self.layers.iter().map(Vec::len).sum()
    }

    /// `true` when there is nothing to paint (no layers, or only empty ones).
    pub fn is_empty(&self) -> bool {
        self.shape_count() == 0
    }
}

impl From<Vec<Layer>> for Frame {
    fn from(layers: Vec<Layer>) -> Self {
        Self::from_layers(layers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_fields_are_detected() {
        assert!(ShapeDescriptor::circle(0.5, 0.5, 3.0, "red", true).is_finite());
        assert!(!ShapeDescriptor::circle(f64::NAN, 0.5, 3.0, "red", true).is_finite());
        assert!(!ShapeDescriptor::line((0.0, 0.0), (1.0, f64::INFINITY), 1.0, "blue").is_finite());
        assert!(!ShapeDescriptor::arrow_head(0.1, 0.1, f64::NAN, 1.0, "red", false).is_finite());
        assert!(
            ShapeDescriptor::Unknown {
                tag: "rect".into()
            }
            .is_finite()
        );
    }

    #[test]
    fn frame_with_empty_layers_is_empty() {
        let frame = Frame::from_layers(vec![vec![], vec![]]);
        assert_eq!(frame.layers().len(), 2);
        assert!(frame.is_empty());
    }

    #[test]
    fn shapes_iterate_in_paint_order() {
        let frame = Frame::from_layers(vec![
            vec![ShapeDescriptor::circle(0.1, 0.1, 1.0, "a", false)],
            vec![
                ShapeDescriptor::line((0.0, 0.0), (1.0, 1.0), 1.0, "b"),
                ShapeDescriptor::arrow_head(0.2, 0.2, 0.0, 1.0, "c", true),
            ],
        ]);
        let tags: Vec<&str> = frame.shapes().map(ShapeDescriptor::tag).collect();
        assert_eq!(tags, ["circle", "line", "arrowHead"]);
        assert_eq!(frame.shape_count(), 3);
    }
}
