//! Canvas2D backend.
//!
//! Creates the `<canvas>` element inside the host page and forwards
//! [`Surface`] calls to its `CanvasRenderingContext2d`.

use crate::SurfaceError;
use simcanvas_core::{Affine, Surface, SurfaceConfig};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// A browser canvas context seen as a [`Surface`].
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    /// Create the element described by `config`, append it to its container
    /// and wrap its 2D context.
    pub fn create(config: &SurfaceConfig) -> Result<Self, SurfaceError> {
        config.validate()?;

        let window = web_sys::window().ok_or(SurfaceError::NoWindow)?;
        let document = window.document().ok_or(SurfaceError::NoDocument)?;
        let container = document
            .get_element_by_id(&config.container_id)
            .ok_or_else(|| SurfaceError::MissingContainer(config.container_id.clone()))?;

        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(dom_error("createElement"))?
            .dyn_into()
            .map_err(|_| SurfaceError::NotACanvas)?;
        canvas.set_id(&config.element_id);
        canvas.set_width(config.width);
        canvas.set_height(config.height);
        if let Some(style) = config.style_attr() {
            canvas
                .set_attribute("style", &style)
                .map_err(dom_error("setAttribute"))?;
        }
        container
            .append_child(&canvas)
            .map_err(dom_error("appendChild"))?;

        let ctx = canvas
            .get_context("2d")
            .map_err(dom_error("getContext"))?
            .ok_or(SurfaceError::NoContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SurfaceError::NoContext)?;

        log::debug!(
            "created canvas #{} ({}x{}) in #{}",
            config.element_id,
            config.width,
            config.height,
            config.container_id
        );
        Ok(Self::new(ctx))
    }

    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }
}

fn dom_error(op: &'static str) -> impl Fn(JsValue) -> SurfaceError {
    move |err| SurfaceError::Dom {
        op,
        message: format!("{err:?}"),
    }
}

/// Canvas2D only throws here for non-finite input, which the renderer
/// filters out; a failure is logged and the call dropped.
fn check(op: &str, result: Result<(), JsValue>) {
    if let Err(err) = result {
        log::debug!("{op} failed: {err:?}");
    }
}

impl Surface for CanvasSurface {
    fn set_transform(&mut self, transform: Affine) {
        let [a, b, c, d, e, f] = transform.as_coeffs();
        check("setTransform", self.ctx.set_transform(a, b, c, d, e, f));
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, x: f64, y: f64) {
        check("translate", self.ctx.translate(x, y));
    }

    fn rotate(&mut self, angle: f64) {
        check("rotate", self.ctx.rotate(angle));
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        check("scale", self.ctx.scale(sx, sy));
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.clear_rect(x, y, width, height);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn arc(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64) {
        check("arc", self.ctx.arc(cx, cy, radius, start, end));
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.ctx.set_stroke_style_str(color);
    }

    fn set_fill_style(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }
}
