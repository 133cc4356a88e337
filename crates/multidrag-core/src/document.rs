//! Layer document: the fixed set of layers shown on the canvas.

use crate::layer::{Layer, LayerId};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Document errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Duplicate layer id: {0}")]
    DuplicateLayer(LayerId),
}

/// All layers on the canvas, in creation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Layer>", into = "Vec<Layer>")]
pub struct LayerDocument {
    layers: Vec<Layer>,
}

impl Default for LayerDocument {
    fn default() -> Self {
        Self {
            layers: default_layers(),
        }
    }
}

/// The layers the canvas starts with.
pub fn default_layers() -> Vec<Layer> {
    vec![
        Layer::new("1", 10.0, 10.0, 0, "cyan"),
        Layer::new("2", 100.0, 100.0, 1, "orange"),
        Layer::new("3", 200.0, 200.0, 2, "green"),
    ]
}

impl TryFrom<Vec<Layer>> for LayerDocument {
    type Error = DocumentError;

    fn try_from(layers: Vec<Layer>) -> Result<Self, Self::Error> {
        Self::new(layers)
    }
}

impl From<LayerDocument> for Vec<Layer> {
    fn from(document: LayerDocument) -> Self {
        document.layers
    }
}

impl LayerDocument {
    /// Create a document, rejecting duplicate ids.
    pub fn new(layers: Vec<Layer>) -> Result<Self, DocumentError> {
        let mut seen = HashSet::new();
        for layer in &layers {
            if !seen.insert(&layer.id) {
                return Err(DocumentError::DuplicateLayer(layer.id.clone()));
            }
        }
        Ok(Self { layers })
    }

    pub fn get(&self, id: &LayerId) -> Option<&Layer> {
        self.layers.iter().find(|layer| &layer.id == id)
    }

    pub fn get_mut(&mut self, id: &LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|layer| &layer.id == id)
    }

    pub fn contains(&self, id: &LayerId) -> bool {
        self.get(id).is_some()
    }

    /// Layers back to front, i.e. in the order they are painted.
    ///
    /// Higher `z` is painted first, so the layer with the lowest `z` ends up
    /// in front. Ties keep creation order.
    pub fn paint_order(&self) -> Vec<&Layer> {
        let mut ordered: Vec<&Layer> = self.layers.iter().collect();
        ordered.sort_by_key(|layer| std::cmp::Reverse(layer.z));
        ordered
    }

    /// Layers under a point, front to back.
    pub fn layers_at_point(&self, point: Point) -> Vec<LayerId> {
        self.paint_order()
            .into_iter()
            .rev()
            .filter(|layer| layer.hit_test(point))
            .map(|layer| layer.id.clone())
            .collect()
    }

    /// The frontmost layer under a point.
    pub fn topmost_at(&self, point: Point) -> Option<LayerId> {
        self.layers_at_point(point).into_iter().next()
    }

    /// Layers whose bounds overlap a rectangle.
    pub fn layers_in_rect(&self, rect: Rect) -> Vec<LayerId> {
        self.layers
            .iter()
            .filter(|layer| {
                let overlap = rect.intersect(layer.bounds());
                overlap.width() > 0.0 && overlap.height() > 0.0
            })
            .map(|layer| layer.id.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }
}
