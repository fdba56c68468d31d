//! WASM bridge for SimCanvas: the surface manager the simulation page talks to.
//!
//! Compiled via `wasm-pack build --target web`. The page constructs one
//! [`SimpleContinuousModule`] per canvas and hands it a frame on every tick.

mod canvas;

pub use canvas::CanvasSurface;

use simcanvas_core::{DrawStats, Renderer, Surface, SurfaceConfig, decode_frame};
use thiserror::Error;
use wasm_bindgen::prelude::*;

/// Why the drawing surface could not be set up.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("no global `window`")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("container element #{0} not found")]
    MissingContainer(String),
    #[error("{op} failed: {message}")]
    Dom { op: &'static str, message: String },
    #[error("created element is not a canvas")]
    NotACanvas,
    #[error("canvas has no 2d context")]
    NoContext,
    #[error(transparent)]
    Config(#[from] simcanvas_core::Error),
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// Owns one canvas element and the renderer bound to it.
#[wasm_bindgen]
pub struct SimpleContinuousModule {
    renderer: Renderer<CanvasSurface>,
    element_id: String,
}

#[wasm_bindgen]
impl SimpleContinuousModule {
    /// Create a `canvas_width × canvas_height` canvas with id `ids` inside
    /// `#elements`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas_width: u32,
        canvas_height: u32,
        ids: &str,
    ) -> Result<SimpleContinuousModule, JsValue> {
        Self::create(SurfaceConfig::new(canvas_width, canvas_height, ids)).map_err(to_js)
    }

    /// Same as the constructor, from a JSON `SurfaceConfig`.
    pub fn with_config(json: &str) -> Result<SimpleContinuousModule, JsValue> {
        let config = SurfaceConfig::from_json(json).map_err(to_js)?;
        Self::create(config).map_err(to_js)
    }

    /// Clear the canvas and paint `data` (layers of portrayals).
    ///
    /// Returns how many shapes could not be painted. Values with no JSON form
    /// (`undefined`, functions, symbols) only clear.
    pub fn render(&mut self, data: &JsValue) -> Result<u32, JsValue> {
        let json = js_sys::JSON::stringify(data)?
            .as_string()
            .unwrap_or_else(|| "null".to_string());
        self.render_json(&json)
    }

    /// [`render`](Self::render) for a frame already serialized as JSON.
    pub fn render_json(&mut self, json: &str) -> Result<u32, JsValue> {
        render_frame(&mut self.renderer, json).map_err(to_js)
    }

    /// Clear the canvas.
    pub fn reset(&mut self) {
        self.renderer.reset();
    }

    #[wasm_bindgen(getter)]
    pub fn element_id(&self) -> String {
        self.element_id.clone()
    }
}

impl SimpleContinuousModule {
    fn create(config: SurfaceConfig) -> Result<Self, SurfaceError> {
        console_error_panic_hook_setup();

        let surface = CanvasSurface::create(&config)?;
        let renderer = Renderer::new(surface, config.width, config.height)?;
        Ok(Self {
            renderer,
            element_id: config.element_id,
        })
    }
}

/// Reset, then decode `json` and paint it. Returns the number of shapes
/// dropped at decode time or skipped while drawing. The surface is left blank
/// when the frame can't be decoded.
fn render_frame<S: Surface>(renderer: &mut Renderer<S>, json: &str) -> simcanvas_core::Result<u32> {
    renderer.reset();
    let decoded = decode_frame(json)?;
    let DrawStats {
        painted,
        skipped,
        ignored,
    } = renderer.draw(&decoded.frame);

    let dropped = decoded.rejected + skipped;
    if dropped > 0 {
        log::warn!("frame painted {painted} shapes, dropped {dropped}");
    }
    log::trace!("frame done: {painted} painted, {ignored} unknown");
    Ok(u32::try_from(dropped).unwrap_or(u32::MAX))
}

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("SimCanvas WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
