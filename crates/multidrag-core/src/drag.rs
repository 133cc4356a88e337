//! Group drag bookkeeping.

use crate::document::LayerDocument;
use crate::layer::LayerId;
use kurbo::{Point, Vec2};
use std::collections::HashMap;

/// Positions of the dragged layers at the moment the drag started.
///
/// New positions are always computed from this snapshot plus the total
/// pointer delta, so rounding never accumulates across move events.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSnapshot {
    /// Original positions (layer id -> top-left corner).
    pub positions: HashMap<LayerId, Point>,
}

impl DragSnapshot {
    /// Record the current position of every listed layer that exists.
    pub fn capture<'a>(
        document: &LayerDocument,
        ids: impl IntoIterator<Item = &'a LayerId>,
    ) -> Self {
        let positions = ids
            .into_iter()
            .filter_map(|id| document.get(id).map(|layer| (id.clone(), layer.position)))
            .collect();
        Self { positions }
    }

    /// Move every snapshotted layer to its start position plus `delta`.
    pub fn apply(&self, document: &mut LayerDocument, delta: Vec2) {
        for (id, &start) in &self.positions {
            if let Some(layer) = document.get_mut(id) {
                layer.position = start + delta;
            }
        }
    }

    /// Put every snapshotted layer back where it started.
    pub fn restore(&self, document: &mut LayerDocument) {
        self.apply(document, Vec2::ZERO);
    }
}
