//! Layer definitions.

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default layer width in canvas units.
pub const DEFAULT_LAYER_WIDTH: f64 = 80.0;
/// Default layer height in canvas units.
pub const DEFAULT_LAYER_HEIGHT: f64 = 40.0;

fn default_layer_size() -> Size {
    Size::new(DEFAULT_LAYER_WIDTH, DEFAULT_LAYER_HEIGHT)
}

/// Identity of a layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(String);

impl LayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for LayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A rectangular layer on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    /// Top-left corner position.
    pub position: Point,
    /// Stacking rank. Lower values are painted later and sit in front.
    pub z: i32,
    /// CSS color used as the fill.
    pub color: String,
    #[serde(default = "default_layer_size")]
    pub size: Size,
}

impl Layer {
    /// Create a layer with the default size.
    pub fn new(id: impl Into<LayerId>, x: f64, y: f64, z: i32, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            position: Point::new(x, y),
            z,
            color: color.into(),
            size: default_layer_size(),
        }
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Check if a point lies inside the layer.
    pub fn hit_test(&self, point: Point) -> bool {
        self.bounds().contains(point)
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}
