//! A [`Surface`] that records what would have been painted.
//!
//! Every call is logged as an [`Op`] with its arguments as given. On top of
//! the raw log the recorder tracks Canvas2D state (transform stack, styles,
//! the current path in device space) and turns each `stroke`/`fill` into a
//! [`Mark`], so tests can assert on pixels-to-be instead of call sequences.

use crate::surface::Surface;
use kurbo::{Affine, Point};
use smallvec::SmallVec;

/// One call made on the surface, with logical (pre-transform) arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    SetTransform(Affine),
    Save,
    Restore,
    Translate(f64, f64),
    Rotate(f64),
    Scale(f64, f64),
    ClearRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    BeginPath,
    MoveTo(Point),
    LineTo(Point),
    Arc {
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
    },
    ClosePath,
    StrokeStyle(String),
    FillStyle(String),
    LineWidth(f64),
    Stroke,
    Fill,
}

/// A path segment in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    MoveTo(Point),
    LineTo(Point),
    /// Radius is scaled by the transform's uniform scale factor.
    Arc {
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
    },
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkKind {
    Stroke,
    Fill,
}

/// Paint that landed on the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Mark {
    pub kind: MarkKind,
    pub color: String,
    /// Device-space line width; `0.0` for fills.
    pub line_width: f64,
    pub path: Vec<Segment>,
}

impl Mark {
    /// Points of the path's move/line segments, in order.
    pub fn vertices(&self) -> Vec<Point> {
        self.path
            .iter()
            .filter_map(|seg| match *seg {
                Segment::MoveTo(p) | Segment::LineTo(p) => Some(p),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
struct State {
    transform: Affine,
    stroke_style: String,
    fill_style: String,
    line_width: f64,
}

impl Default for State {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            stroke_style: "#000000".to_string(),
            fill_style: "#000000".to_string(),
            line_width: 1.0,
        }
    }
}

/// In-memory surface of `width × height` pixels that records instead of
/// rasterizing.
#[derive(Debug)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    state: State,
    stack: SmallVec<[State; 4]>,
    path: Vec<Segment>,
    ops: Vec<Op>,
    marks: Vec<Mark>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f64,
            height: height as f64,
            state: State::default(),
            stack: SmallVec::new(),
            path: Vec::new(),
            ops: Vec::new(),
            marks: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Paint currently visible, oldest first.
    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    /// `true` when nothing is painted.
    pub fn is_blank(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn transform(&self) -> Affine {
        self.state.transform
    }

    /// Number of states saved and not yet restored.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Forget the op log. Marks and state are kept.
    pub fn clear_log(&mut self) {
        self.ops.clear();
    }

    fn to_device(&self, x: f64, y: f64) -> Point {
        self.state.transform * Point::new(x, y)
    }

    /// Uniform scale factor of the current transform.
    fn scale_factor(&self) -> f64 {
        self.state.transform.determinant().abs().sqrt()
    }

    fn covers_surface(&self, x: f64, y: f64, width: f64, height: f64) -> bool {
        let corners = [
            self.to_device(x, y),
            self.to_device(x + width, y),
            self.to_device(x, y + height),
            self.to_device(x + width, y + height),
        ];
        let min_x = corners.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let max_x = corners.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let min_y = corners.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_y = corners.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        min_x <= 0.0 && min_y <= 0.0 && max_x >= self.width && max_y >= self.height
    }
}

impl Surface for RecordingSurface {
    fn set_transform(&mut self, transform: Affine) {
        self.ops.push(Op::SetTransform(transform));
        self.state.transform = transform;
    }

    fn save(&mut self) {
        self.ops.push(Op::Save);
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        self.ops.push(Op::Restore);
        // Canvas2D ignores an unbalanced restore
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.ops.push(Op::Translate(x, y));
        self.state.transform = self.state.transform * Affine::translate((x, y));
    }

    fn rotate(&mut self, angle: f64) {
        self.ops.push(Op::Rotate(angle));
        self.state.transform = self.state.transform * Affine::rotate(angle);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.ops.push(Op::Scale(sx, sy));
        self.state.transform = self.state.transform * Affine::scale_non_uniform(sx, sy);
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(Op::ClearRect {
            x,
            y,
            width,
            height,
        });
        // Partial clears are logged only; marks are not pixel-exact.
        if self.covers_surface(x, y, width, height) {
            self.marks.clear();
        }
    }

    fn begin_path(&mut self) {
        self.ops.push(Op::BeginPath);
        self.path.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ops.push(Op::MoveTo(Point::new(x, y)));
        let p = self.to_device(x, y);
        self.path.push(Segment::MoveTo(p));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ops.push(Op::LineTo(Point::new(x, y)));
        let p = self.to_device(x, y);
        self.path.push(Segment::LineTo(p));
    }

    fn arc(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64) {
        self.ops.push(Op::Arc {
            center: Point::new(cx, cy),
            radius,
            start,
            end,
        });
        let center = self.to_device(cx, cy);
        let radius = radius * self.scale_factor();
        self.path.push(Segment::Arc {
            center,
            radius,
            start,
            end,
        });
    }

    fn close_path(&mut self) {
        self.ops.push(Op::ClosePath);
        self.path.push(Segment::Close);
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.ops.push(Op::StrokeStyle(color.to_string()));
        self.state.stroke_style = color.to_string();
    }

    fn set_fill_style(&mut self, color: &str) {
        self.ops.push(Op::FillStyle(color.to_string()));
        self.state.fill_style = color.to_string();
    }

    fn set_line_width(&mut self, width: f64) {
        self.ops.push(Op::LineWidth(width));
        // Canvas2D ignores non-positive and non-finite widths
        if width.is_finite() && width > 0.0 {
            self.state.line_width = width;
        }
    }

    fn stroke(&mut self) {
        self.ops.push(Op::Stroke);
        if self.path.is_empty() {
            return;
        }
        self.marks.push(Mark {
            kind: MarkKind::Stroke,
            color: self.state.stroke_style.clone(),
            line_width: self.state.line_width * self.scale_factor(),
            path: self.path.clone(),
        });
    }

    fn fill(&mut self) {
        self.ops.push(Op::Fill);
        if self.path.is_empty() {
            return;
        }
        self.marks.push(Mark {
            kind: MarkKind::Fill,
            color: self.state.fill_style.clone(),
            line_width: 0.0,
            path: self.path.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn path_points_use_transform_at_insertion() {
        let mut surface = RecordingSurface::new(100, 100);
        surface.begin_path();
        surface.move_to(1.0, 1.0);
        surface.translate(10.0, 0.0);
        surface.line_to(1.0, 1.0);
        surface.stroke();

        assert_eq!(
            surface.marks()[0].vertices(),
            vec![Point::new(1.0, 1.0), Point::new(11.0, 1.0)]
        );
    }

    #[test]
    fn stroke_without_path_leaves_no_mark() {
        let mut surface = RecordingSurface::new(10, 10);
        surface.stroke();
        surface.fill();
        assert!(surface.is_blank());
        assert_eq!(surface.ops(), &[Op::Stroke, Op::Fill]);
    }

    #[test]
    fn partial_clear_keeps_marks() {
        let mut surface = RecordingSurface::new(10, 10);
        surface.begin_path();
        surface.move_to(0.0, 0.0);
        surface.line_to(5.0, 5.0);
        surface.stroke();

        surface.clear_rect(0.0, 0.0, 5.0, 5.0);
        assert_eq!(surface.marks().len(), 1);

        surface.clear_rect(0.0, 0.0, 10.0, 10.0);
        assert!(surface.is_blank());
    }

    #[test]
    fn unbalanced_restore_is_ignored() {
        let mut surface = RecordingSurface::new(10, 10);
        surface.translate(2.0, 3.0);
        surface.restore();
        assert_eq!(surface.transform(), Affine::translate((2.0, 3.0)));
    }

    #[test]
    fn line_width_scales_with_transform() {
        let mut surface = RecordingSurface::new(10, 10);
        surface.scale(2.0, 2.0);
        surface.set_line_width(1.5);
        surface.begin_path();
        surface.move_to(0.0, 0.0);
        surface.line_to(1.0, 0.0);
        surface.stroke();
        assert_eq!(surface.marks()[0].line_width, 3.0);
    }
}
