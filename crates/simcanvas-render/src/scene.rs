//! [`Surface`] over a Vello scene.
//!
//! Emulates Canvas2D path semantics: points are mapped to device space as
//! they are added, fills use the accumulated device path, and strokes are
//! emitted under the transform active at stroke time so line widths scale
//! the same way a browser canvas scales them.

use kurbo::{Affine, Arc, BezPath, Point, Stroke, Vec2};
use peniko::color::{Srgb, parse_color};
use peniko::{Color, Fill};
use simcanvas_core::Surface;
use smallvec::SmallVec;
use std::f64::consts::TAU;
use vello::Scene;

/// Flattening tolerance for arcs, in logical units.
const ARC_TOLERANCE: f64 = 0.1;

/// Number of fills and strokes encoded since the last clear.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaintCounts {
    pub fills: usize,
    pub strokes: usize,
}

#[derive(Debug, Clone)]
struct State {
    transform: Affine,
    stroke: Color,
    fill: Color,
    line_width: f64,
}

impl Default for State {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            stroke: Color::from_rgb8(0, 0, 0),
            fill: Color::from_rgb8(0, 0, 0),
            line_width: 1.0,
        }
    }
}

pub struct SceneSurface {
    scene: Scene,
    state: State,
    stack: SmallVec<[State; 4]>,
    path: BezPath,
    /// Device-space pen position and start of the open subpath.
    current: Option<Point>,
    subpath_start: Option<Point>,
    counts: PaintCounts,
}

impl Default for SceneSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneSurface {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            state: State::default(),
            stack: SmallVec::new(),
            path: BezPath::new(),
            current: None,
            subpath_start: None,
            counts: PaintCounts::default(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn into_scene(self) -> Scene {
        self.scene
    }

    pub fn counts(&self) -> PaintCounts {
        self.counts
    }

    pub fn transform(&self) -> Affine {
        self.state.transform
    }

    fn to_device(&self, x: f64, y: f64) -> Point {
        self.state.transform * Point::new(x, y)
    }

    fn push_move(&mut self, p: Point) {
        self.path.move_to(p);
        self.current = Some(p);
        self.subpath_start = Some(p);
    }
}

/// Parse a CSS color string, falling back to opaque black.
pub fn parse_css_color(css: &str) -> Color {
    match parse_color(css) {
        Ok(color) => color.to_alpha_color::<Srgb>(),
        Err(e) => {
            log::warn!("unparseable color {css:?} ({e:?}), using black");
            Color::from_rgb8(0, 0, 0)
        }
    }
}

impl Surface for SceneSurface {
    fn set_transform(&mut self, transform: Affine) {
        self.state.transform = transform;
    }

    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.state.transform = self.state.transform * Affine::translate((x, y));
    }

    fn rotate(&mut self, angle: f64) {
        self.state.transform = self.state.transform * Affine::rotate(angle);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.state.transform = self.state.transform * Affine::scale_non_uniform(sx, sy);
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        // An encoded scene can't be erased piecewise; any clear starts over.
        log::trace!("CLEAR ({x}, {y}) {width}x{height}");
        self.scene.reset();
        self.counts = PaintCounts::default();
    }

    fn begin_path(&mut self) {
        self.path = BezPath::new();
        self.current = None;
        self.subpath_start = None;
    }

    fn move_to(&mut self, x: f64, y: f64) {
        let p = self.to_device(x, y);
        self.push_move(p);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let p = self.to_device(x, y);
        if self.current.is_none() {
            self.push_move(p);
            return;
        }
        self.path.line_to(p);
        self.current = Some(p);
    }

    fn arc(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64) {
        let sweep = if end - start >= TAU {
            TAU
        } else {
            (end - start).rem_euclid(TAU)
        };
        let arc = Arc {
            center: Point::new(cx, cy),
            radii: Vec2::new(radius, radius),
            start_angle: start,
            sweep_angle: sweep,
            x_rotation: 0.0,
        };

        let from = self.to_device(cx + radius * start.cos(), cy + radius * start.sin());
        if self.current.is_some() {
            self.path.line_to(from);
        } else {
            self.push_move(from);
        }

        let transform = self.state.transform;
        for el in arc.append_iter(ARC_TOLERANCE) {
            self.path.push(transform * el);
        }
        let end_angle = start + sweep;
        self.current =
            Some(self.to_device(cx + radius * end_angle.cos(), cy + radius * end_angle.sin()));
    }

    fn close_path(&mut self) {
        if self.current.is_none() {
            return;
        }
        self.path.close_path();
        self.current = self.subpath_start;
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.state.stroke = parse_css_color(color);
    }

    fn set_fill_style(&mut self, color: &str) {
        self.state.fill = parse_css_color(color);
    }

    fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.state.line_width = width;
        }
    }

    fn stroke(&mut self) {
        if self.path.elements().is_empty() {
            return;
        }
        let transform = self.state.transform;
        let det = transform.determinant();
        if det == 0.0 || !det.is_finite() {
            log::debug!("skip stroke under singular transform {transform:?}");
            return;
        }
        // Back to logical space so the stroke width goes through `transform`
        let local = transform.inverse() * self.path.clone();
        let style = Stroke::new(self.state.line_width);
        self.scene
            .stroke(&style, transform, self.state.stroke, None, &local);
        self.counts.strokes += 1;
    }

    fn fill(&mut self) {
        if self.path.elements().is_empty() {
            return;
        }
        self.scene.fill(
            Fill::NonZero,
            Affine::IDENTITY,
            self.state.fill,
            None,
            &self.path,
        );
        self.counts.fills += 1;
    }
}
