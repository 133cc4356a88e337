//! Canvas configuration.

use crate::gesture::DEFAULT_DRAG_THRESHOLD;
use crate::layer::{DEFAULT_LAYER_HEIGHT, DEFAULT_LAYER_WIDTH};
use kurbo::Size;
use peniko::Color;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid value: {0}")]
    Invalid(String),
}

/// Parse JSON text into a configuration type.
pub fn parse_json<T: DeserializeOwned>(json: &str) -> Result<T, ConfigError> {
    serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Read a configuration file into a string.
pub fn read_file(path: &Path) -> Result<String, ConfigError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
    log::info!("Loaded config from {}", path.display());
    Ok(json)
}

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// CSS `rgba()` notation.
    pub fn to_css(self) -> String {
        if self.a == 255 {
            format!("rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            let alpha = (f64::from(self.a) / 255.0 * 100.0).round() / 100.0;
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
        }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Marquee appearance while rubber-band selecting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarqueeStyle {
    pub fill: SerializableColor,
    pub stroke: SerializableColor,
    pub stroke_width: f64,
}

impl Default for MarqueeStyle {
    fn default() -> Self {
        Self {
            fill: SerializableColor::new(0, 0, 255, 26),
            stroke: SerializableColor::new(0, 0, 255, 51),
            stroke_width: 1.0,
        }
    }
}

/// Canvas settings. Every field has a default, so partial JSON works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Canvas width (also the viewBox width).
    pub width: f64,
    /// Canvas height (also the viewBox height).
    pub height: f64,
    pub background: SerializableColor,
    /// Size given to layers that don't specify one.
    pub layer_size: Size,
    pub selected_opacity: f64,
    pub unselected_opacity: f64,
    /// Pointer travel before a press turns into a drag.
    pub drag_threshold: f64,
    pub marquee: MarqueeStyle,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 500.0,
            background: SerializableColor::new(0xee, 0xee, 0xee, 255),
            layer_size: Size::new(DEFAULT_LAYER_WIDTH, DEFAULT_LAYER_HEIGHT),
            selected_opacity: 1.0,
            unselected_opacity: 0.5,
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
            marquee: MarqueeStyle::default(),
        }
    }
}

impl CanvasConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "canvas size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.layer_size.width > 0.0 && self.layer_size.height > 0.0) {
            return Err(ConfigError::Invalid("layer size must be positive".to_string()));
        }
        for (name, value) in [
            ("selected_opacity", self.selected_opacity),
            ("unselected_opacity", self.unselected_opacity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!("{name} must be within 0..=1")));
            }
        }
        if !(self.drag_threshold >= 0.0) {
            return Err(ConfigError::Invalid("drag_threshold must not be negative".to_string()));
        }
        Ok(())
    }

    pub fn opacity_for(&self, selected: bool) -> f64 {
        if selected {
            self.selected_opacity
        } else {
            self.unselected_opacity
        }
    }
}
