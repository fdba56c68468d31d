//! Frame → surface drawing calls.
//!
//! The renderer installs a y-up transform once, then every draw is a plain
//! pass over the frame: normalized coordinates are scaled by the surface
//! size and handed to the [`Surface`]. Nothing is cleared implicitly.

use crate::error::{Error, Result};
use crate::model::{Frame, ShapeDescriptor};
use crate::surface::Surface;
use kurbo::Affine;
use std::f64::consts::TAU;

/// Arrow-head outline in local units, pointing along +x.
const ARROW_HEAD: [(f64, f64); 3] = [(-5.0, -5.0), (5.0, 0.0), (-5.0, 5.0)];

/// Line width for outlines that don't carry their own. Circles are stroked at
/// this width rather than inheriting whatever the previous shape left set.
const OUTLINE_WIDTH: f64 = 1.0;

/// What happened to the shapes of one [`Renderer::draw`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub painted: usize,
    /// Shapes with non-finite numbers.
    pub skipped: usize,
    /// Shapes with an unknown tag.
    pub ignored: usize,
}

/// Paints frames onto an owned surface of fixed pixel size.
pub struct Renderer<S: Surface> {
    surface: S,
    width: f64,
    height: f64,
}

impl<S: Surface> Renderer<S> {
    /// Take ownership of `surface` and install the y-up transform.
    pub fn new(surface: S, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        let mut renderer = Self {
            surface,
            width: width as f64,
            height: height as f64,
        };
        renderer.configure();
        Ok(renderer)
    }

    /// Map logical y = 0 to the bottom row and y = height to the top.
    ///
    /// Sets the transform absolutely, so calling it again changes nothing.
    pub fn configure(&mut self) {
        self.surface
            .set_transform(Affine::new([1.0, 0.0, 0.0, -1.0, 0.0, self.height]));
    }

    /// Paint every layer of `frame`, back to front.
    pub fn draw(&mut self, frame: &Frame) -> DrawStats {
        let mut stats = DrawStats::default();
        for shape in frame.shapes() {
            if !shape.is_finite() {
                log::debug!("SKIP {} with non-finite fields: {shape:?}", shape.tag());
                stats.skipped += 1;
                continue;
            }
            match shape {
                ShapeDescriptor::Circle {
                    x,
                    y,
                    r,
                    color,
                    filled,
                } => {
                    log::trace!("CIRCLE at ({x}, {y}) r={r} {color}");
                    draw_circle(
                        &mut self.surface,
                        x * self.width,
                        y * self.height,
                        *r,
                        color,
                        *filled,
                    );
                }
                ShapeDescriptor::Line {
                    from_x,
                    from_y,
                    to_x,
                    to_y,
                    width,
                    color,
                } => {
                    log::trace!("LINE ({from_x}, {from_y}) -> ({to_x}, {to_y}) {color}");
                    draw_line(
                        &mut self.surface,
                        (from_x * self.width, from_y * self.height),
                        (to_x * self.width, to_y * self.height),
                        *width,
                        color,
                    );
                }
                ShapeDescriptor::ArrowHead {
                    x,
                    y,
                    angle,
                    scale,
                    color,
                    filled,
                } => {
                    log::trace!("ARROW at ({x}, {y}) angle={angle} {color}");
                    draw_arrow_head(
                        &mut self.surface,
                        x * self.width,
                        y * self.height,
                        *angle,
                        *scale,
                        color,
                        *filled,
                    );
                }
                ShapeDescriptor::Unknown { tag } => {
                    log::trace!("IGNORE unknown shape {tag:?}");
                    stats.ignored += 1;
                    continue;
                }
            }
            stats.painted += 1;
        }
        stats
    }

    /// Blank the whole surface and drop any half-built path.
    pub fn reset(&mut self) {
        // Under the flip this rect still spans every pixel
        self.surface.clear_rect(0.0, 0.0, self.width, self.height);
        self.surface.begin_path();
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}

// ─── Drawing primitives ─────────────────────────────────────────────────

fn draw_circle<S: Surface>(surface: &mut S, cx: f64, cy: f64, radius: f64, color: &str, filled: bool) {
    surface.begin_path();
    surface.arc(cx, cy, radius, 0.0, TAU);
    surface.close_path();

    surface.set_line_width(OUTLINE_WIDTH);
    surface.set_stroke_style(color);
    surface.stroke();
    if filled {
        surface.set_fill_style(color);
        surface.fill();
    }
}

fn draw_line<S: Surface>(surface: &mut S, from: (f64, f64), to: (f64, f64), width: f64, color: &str) {
    surface.begin_path();
    surface.move_to(from.0, from.1);
    surface.line_to(to.0, to.1);
    surface.set_line_width(width);
    surface.set_stroke_style(color);
    surface.stroke();
}

fn draw_arrow_head<S: Surface>(
    surface: &mut S,
    x: f64,
    y: f64,
    angle: f64,
    scale: f64,
    color: &str,
    filled: bool,
) {
    surface.set_line_width(OUTLINE_WIDTH);
    surface.set_stroke_style(color);
    surface.set_fill_style(color);

    let mut local = surface.saved();
    local.translate(x, y);
    local.rotate(angle);
    local.scale(scale, scale);

    local.begin_path();
    let [first, rest @ ..] = ARROW_HEAD;
    local.move_to(first.0, first.1);
    for (px, py) in rest {
        local.line_to(px, py);
    }
    local.close_path();

    if filled {
        local.fill();
    }
    local.stroke();
}
