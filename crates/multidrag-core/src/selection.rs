//! Selection set and rubber-band (marquee) selection.

use crate::document::LayerDocument;
use crate::layer::LayerId;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Minimum marquee extent (in canvas units) before it selects anything.
pub const MIN_MARQUEE_EXTENT: f64 = 2.0;

/// Which layers are selected.
///
/// Kept as a flag per layer id; a missing entry and `false` both mean
/// unselected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    flags: BTreeMap<LayerId, bool>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, id: &LayerId) -> bool {
        self.flags.get(id).copied().unwrap_or(false)
    }

    /// Flip the flag for `id`. Returns the new value.
    pub fn toggle(&mut self, id: &LayerId) -> bool {
        let flag = self.flags.entry(id.clone()).or_insert(false);
        *flag = !*flag;
        *flag
    }

    pub fn set(&mut self, id: &LayerId, selected: bool) {
        self.flags.insert(id.clone(), selected);
    }

    /// Make `id` the only selected layer.
    pub fn select_only(&mut self, id: &LayerId) {
        self.flags.clear();
        self.flags.insert(id.clone(), true);
    }

    pub fn clear(&mut self) {
        self.flags.clear();
    }

    /// Selected ids, sorted.
    pub fn selected_ids(&self) -> Vec<LayerId> {
        self.flags
            .iter()
            .filter(|&(_, &selected)| selected)
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Number of selected layers.
    pub fn count(&self) -> usize {
        self.flags.values().filter(|&&selected| selected).count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Apply an incremental rubber-band change.
    pub fn apply_change(&mut self, change: &SelectionChange) {
        for id in &change.added {
            self.set(id, true);
        }
        for id in &change.removed {
            self.set(id, false);
        }
    }
}

/// Layers that entered or left the marquee since the previous update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionChange {
    pub added: Vec<LayerId>,
    pub removed: Vec<LayerId>,
}

impl SelectionChange {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Marquee rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marquee {
    pub start: Point,
    pub current: Point,
}

impl Marquee {
    pub fn new(start: Point) -> Self {
        Self {
            start,
            current: start,
        }
    }

    /// Get the marquee as a normalized Rect.
    pub fn to_rect(&self) -> Rect {
        Rect::from_points(self.start, self.current)
    }

    /// Whether the marquee is large enough to select anything.
    pub fn is_meaningful(&self) -> bool {
        let rect = self.to_rect();
        rect.width() > MIN_MARQUEE_EXTENT && rect.height() > MIN_MARQUEE_EXTENT
    }
}

/// One rubber-band gesture.
#[derive(Debug, Clone)]
pub struct RubberBand {
    marquee: Marquee,
    /// Layers currently inside the marquee.
    covered: BTreeSet<LayerId>,
    /// Layers selected before the band started (only for additive bands).
    retained: BTreeSet<LayerId>,
}

impl RubberBand {
    /// Start a band at `start`. `retained` holds layers that stay selected
    /// even if the band passes over them and leaves again.
    pub fn new(start: Point, retained: impl IntoIterator<Item = LayerId>) -> Self {
        Self {
            marquee: Marquee::new(start),
            covered: BTreeSet::new(),
            retained: retained.into_iter().collect(),
        }
    }

    pub fn marquee(&self) -> &Marquee {
        &self.marquee
    }

    /// Move the band's free corner and report what changed.
    pub fn update(&mut self, current: Point, document: &LayerDocument) -> SelectionChange {
        self.marquee.current = current;
        let now: BTreeSet<LayerId> = if self.marquee.is_meaningful() {
            document
                .layers_in_rect(self.marquee.to_rect())
                .into_iter()
                .collect()
        } else {
            BTreeSet::new()
        };

        let added = now
            .difference(&self.covered)
            .filter(|id| !self.retained.contains(*id))
            .cloned()
            .collect();
        let removed = self
            .covered
            .difference(&now)
            .filter(|id| !self.retained.contains(*id))
            .cloned()
            .collect();
        self.covered = now;

        SelectionChange { added, removed }
    }
}
