//! Canvas state and the reducer that drives it.
//!
//! Every user interaction ends up as an [`Action`] applied to [`State`].
//! The reducer only does record keeping: it flips selection flags and moves
//! layers by a delta. Hit testing and gesture recognition happen before an
//! action is produced (see [`crate::interaction`]).

use crate::document::LayerDocument;
use crate::drag::DragSnapshot;
use crate::layer::LayerId;
use crate::selection::{Selection, SelectionChange};
use kurbo::Vec2;
use thiserror::Error;

/// Reducer errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("Unknown layer: {0}")]
    UnknownLayer(LayerId),
}

/// Something that happened to the canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A layer was clicked without dragging.
    Clicked { id: LayerId, additive: bool },
    /// A drag started on a layer.
    DragStarted { id: LayerId, additive: bool },
    /// The pointer moved by `delta` since the drag started.
    Dragged { delta: Vec2 },
    DragEnded,
    /// Drag aborted; layers go back to where they started.
    DragCancelled,
    /// The empty canvas was clicked.
    BackgroundClicked,
    /// The rubber band covered or uncovered layers.
    SelectionChanged(SelectionChange),
}

/// Everything the canvas renders from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    pub document: LayerDocument,
    pub selected: Selection,
    /// Present while a drag is in progress.
    pub drag_start: Option<DragSnapshot>,
}

impl State {
    pub fn new(document: LayerDocument) -> Self {
        Self {
            document,
            selected: Selection::new(),
            drag_start: None,
        }
    }

    pub fn is_selected(&self, id: &LayerId) -> bool {
        self.selected.is_selected(id)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_start.is_some()
    }

    fn ensure_layer(&self, id: &LayerId) -> Result<(), StateError> {
        if self.document.contains(id) {
            Ok(())
        } else {
            Err(StateError::UnknownLayer(id.clone()))
        }
    }

    /// Apply an action in place. On error the state is left untouched.
    pub fn apply(&mut self, action: Action) -> Result<(), StateError> {
        log::debug!("apply {action:?}");
        match action {
            Action::Clicked { id, additive } => {
                self.ensure_layer(&id)?;
                if additive {
                    self.selected.toggle(&id);
                } else if self.selected.is_selected(&id) && self.selected.count() == 1 {
                    self.selected.set(&id, false);
                } else {
                    self.selected.select_only(&id);
                }
            }
            Action::DragStarted { id, additive } => {
                self.ensure_layer(&id)?;
                if !self.selected.is_selected(&id) {
                    if additive {
                        self.selected.set(&id, true);
                    } else {
                        self.selected.select_only(&id);
                    }
                }
                let ids = self.selected.selected_ids();
                self.drag_start = Some(DragSnapshot::capture(&self.document, &ids));
            }
            Action::Dragged { delta } => {
                if let Some(snapshot) = &self.drag_start {
                    snapshot.apply(&mut self.document, delta);
                }
            }
            Action::DragEnded => {
                self.drag_start = None;
            }
            Action::DragCancelled => {
                if let Some(snapshot) = self.drag_start.take() {
                    snapshot.restore(&mut self.document);
                }
            }
            Action::BackgroundClicked => {
                self.selected.clear();
            }
            Action::SelectionChanged(change) => {
                if let Some(unknown) = change
                    .added
                    .iter()
                    .chain(&change.removed)
                    .find(|id| !self.document.contains(id))
                {
                    return Err(StateError::UnknownLayer(unknown.clone()));
                }
                self.selected.apply_change(&change);
            }
        }
        Ok(())
    }
}

/// Pure form of [`State::apply`]: returns the next state.
pub fn reduce(state: &State, action: Action) -> Result<State, StateError> {
    let mut next = state.clone();
    next.apply(action)?;
    Ok(next)
}
