use thiserror::Error;

/// Errors raised while building a renderer or decoding a frame.
///
/// Problems with a single shape never surface here: unknown shapes are
/// ignored and malformed ones are skipped and counted instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("surface dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("frame is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("frame must be an array or an object of layers, got {found}")]
    FrameLayout { found: &'static str },

    #[error("continuous space has an empty extent on the {axis} axis")]
    DegenerateSpace { axis: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;
