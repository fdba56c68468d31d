//! Surface creation settings.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// How the host should create and attach the drawing surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Pixel width of the surface.
    pub width: u32,
    /// Pixel height of the surface.
    pub height: u32,
    /// `id` given to the created element.
    pub element_id: String,
    /// `id` of the host element the surface is appended to.
    pub container_id: String,
    /// CSS border shorthand for the element; empty for none.
    pub border: String,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            element_id: "space-canvas".to_string(),
            container_id: "elements".to_string(),
            border: "1px dotted".to_string(),
        }
    }
}

impl SurfaceConfig {
    pub fn new(width: u32, height: u32, element_id: impl Into<String>) -> Self {
        Self {
            width,
            height,
            element_id: element_id.into(),
            ..Self::default()
        }
    }

    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Inline `style` attribute for the created element.
    pub fn style_attr(&self) -> Option<String> {
        (!self.border.is_empty()).then(|| format!("border:{}", self.border))
    }
}
