//! Maps pointer gestures onto reducer actions.

use crate::gesture::{Gesture, GestureRecognizer, Modifiers, PointerEvent};
use crate::layer::LayerId;
use crate::selection::{Marquee, RubberBand};
use crate::state::{Action, State, StateError};
use kurbo::Point;

/// What the current press started on.
#[derive(Debug, Clone, PartialEq)]
enum PressTarget {
    Layer { id: LayerId, modifiers: Modifiers },
    Background { modifiers: Modifiers },
}

/// Owns the canvas state and turns raw pointer/key input into actions.
#[derive(Debug, Clone)]
pub struct Interaction {
    state: State,
    recognizer: GestureRecognizer,
    press: Option<PressTarget>,
    /// Present while a rubber band is being drawn.
    rubber_band: Option<RubberBand>,
}

impl Interaction {
    pub fn new(state: State, drag_threshold: f64) -> Self {
        Self {
            state,
            recognizer: GestureRecognizer::new(drag_threshold),
            press: None,
            rubber_band: None,
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Whether a rubber-band selection is in progress.
    pub fn selecting(&self) -> bool {
        self.rubber_band.is_some()
    }

    /// Current marquee, for rendering.
    pub fn marquee(&self) -> Option<&Marquee> {
        self.rubber_band.as_ref().map(RubberBand::marquee)
    }

    /// Handle a pointer event. Returns true if the canvas needs a redraw.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> Result<bool, StateError> {
        let mut redraw = false;
        for gesture in self.recognizer.handle_pointer_event(event) {
            redraw |= self.handle_gesture(gesture)?;
        }
        Ok(redraw)
    }

    /// Handle a key press. Only `Escape` does anything: it aborts a drag or
    /// a rubber band. A press that has not turned into a drag is left alone,
    /// so its release still counts as a click.
    pub fn handle_key(&mut self, key: &str) -> Result<bool, StateError> {
        if key != "Escape" || !self.recognizer.is_dragging() {
            return Ok(false);
        }
        self.cancel()
    }

    /// Abandon whatever gesture is in progress: a dragged group goes back
    /// to where it started and a rubber band is dropped. Used when the
    /// platform cancels the pointer and its release will never arrive.
    pub fn cancel(&mut self) -> Result<bool, StateError> {
        if !self.recognizer.is_pressed() {
            return Ok(false);
        }
        self.recognizer.cancel();
        self.press = None;
        if self.rubber_band.take().is_some() {
            log::debug!("rubber band cancelled");
            return Ok(true);
        }
        if self.state.is_dragging() {
            self.state.apply(Action::DragCancelled)?;
            return Ok(true);
        }
        Ok(false)
    }

    fn handle_gesture(&mut self, gesture: Gesture) -> Result<bool, StateError> {
        match gesture {
            Gesture::Press { position, modifiers } => {
                self.press = Some(match self.state.document.topmost_at(position) {
                    Some(id) => PressTarget::Layer { id, modifiers },
                    None => PressTarget::Background { modifiers },
                });
                Ok(false)
            }
            Gesture::Click { .. } => match self.press.take() {
                Some(PressTarget::Layer { id, modifiers }) => {
                    self.state.apply(Action::Clicked {
                        id,
                        additive: modifiers.is_additive(),
                    })?;
                    Ok(true)
                }
                Some(PressTarget::Background { .. }) => {
                    if self.state.selected.is_empty() {
                        return Ok(false);
                    }
                    self.state.apply(Action::BackgroundClicked)?;
                    Ok(true)
                }
                None => Ok(false),
            },
            Gesture::DragStart { origin, .. } => match self.press.clone() {
                Some(PressTarget::Layer { id, modifiers }) => {
                    self.state.apply(Action::DragStarted {
                        id,
                        additive: modifiers.is_additive(),
                    })?;
                    Ok(true)
                }
                Some(PressTarget::Background { modifiers }) => {
                    self.start_rubber_band(origin, modifiers)?;
                    Ok(true)
                }
                None => Ok(false),
            },
            Gesture::DragMove { position, delta, .. } => {
                if let Some(band) = &mut self.rubber_band {
                    let change = band.update(position, &self.state.document);
                    if !change.is_empty() {
                        self.state.apply(Action::SelectionChanged(change))?;
                    }
                    // The marquee itself moved
                    return Ok(true);
                }
                if self.state.is_dragging() {
                    self.state.apply(Action::Dragged { delta })?;
                    return Ok(true);
                }
                Ok(false)
            }
            Gesture::DragEnd { .. } => {
                self.press = None;
                if self.rubber_band.take().is_some() {
                    log::debug!(
                        "rubber band finished with {} selected",
                        self.state.selected.count()
                    );
                    return Ok(true);
                }
                if self.state.is_dragging() {
                    self.state.apply(Action::DragEnded)?;
                    return Ok(true);
                }
                Ok(false)
            }
        }
    }

    fn start_rubber_band(&mut self, origin: Point, modifiers: Modifiers) -> Result<(), StateError> {
        let retained = if modifiers.is_additive() {
            self.state.selected.selected_ids()
        } else {
            if !self.state.selected.is_empty() {
                self.state.apply(Action::BackgroundClicked)?;
            }
            Vec::new()
        };
        log::debug!("rubber band started at ({}, {})", origin.x, origin.y);
        self.rubber_band = Some(RubberBand::new(origin, retained));
        Ok(())
    }
}

impl Default for Interaction {
    fn default() -> Self {
        Self::new(State::default(), crate::gesture::DEFAULT_DRAG_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::MouseButton;

    fn id(s: &str) -> LayerId {
        LayerId::from(s)
    }

    fn press(interaction: &mut Interaction, x: f64, y: f64, modifiers: Modifiers) -> bool {
        interaction
            .handle_pointer_event(PointerEvent::Down {
                position: Point::new(x, y),
                button: MouseButton::Left,
                modifiers,
            })
            .unwrap()
    }

    fn move_to(interaction: &mut Interaction, x: f64, y: f64) -> bool {
        interaction
            .handle_pointer_event(PointerEvent::Move {
                position: Point::new(x, y),
            })
            .unwrap()
    }

    fn release(interaction: &mut Interaction, x: f64, y: f64) -> bool {
        interaction
            .handle_pointer_event(PointerEvent::Up {
                position: Point::new(x, y),
                button: MouseButton::Left,
            })
            .unwrap()
    }

    fn click(interaction: &mut Interaction, x: f64, y: f64, modifiers: Modifiers) -> bool {
        press(interaction, x, y, modifiers);
        release(interaction, x, y)
    }

    fn position(interaction: &Interaction, s: &str) -> Point {
        interaction.state().document.get(&id(s)).unwrap().position
    }

    #[test]
    fn test_click_selects_layer() {
        let mut interaction = Interaction::default();
        assert!(click(&mut interaction, 20.0, 20.0, Modifiers::default()));
        assert_eq!(interaction.state().selected.selected_ids(), vec![id("1")]);
    }

    #[test]
    fn test_shift_click_multi_selects() {
        let mut interaction = Interaction::default();
        click(&mut interaction, 20.0, 20.0, Modifiers::default());
        click(&mut interaction, 110.0, 110.0, Modifiers::SHIFT);
        assert_eq!(
            interaction.state().selected.selected_ids(),
            vec![id("1"), id("2")]
        );
    }

    #[test]
    fn test_small_jitter_is_still_a_click() {
        let mut interaction = Interaction::default();
        press(&mut interaction, 20.0, 20.0, Modifiers::default());
        move_to(&mut interaction, 21.0, 22.0);
        release(&mut interaction, 21.0, 22.0);

        assert!(interaction.state().is_selected(&id("1")));
        assert_eq!(position(&interaction, "1"), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_group_drag() {
        let mut interaction = Interaction::default();
        click(&mut interaction, 20.0, 20.0, Modifiers::default());
        click(&mut interaction, 110.0, 110.0, Modifiers::SHIFT);

        press(&mut interaction, 110.0, 110.0, Modifiers::default());
        assert!(move_to(&mut interaction, 130.0, 150.0));
        assert!(interaction.state().is_dragging());
        assert!(release(&mut interaction, 130.0, 150.0));

        assert!(!interaction.state().is_dragging());
        assert_eq!(position(&interaction, "1"), Point::new(30.0, 50.0));
        assert_eq!(position(&interaction, "2"), Point::new(120.0, 140.0));
        assert_eq!(position(&interaction, "3"), Point::new(200.0, 200.0));
        // Releasing a drag does not toggle the selection
        assert_eq!(
            interaction.state().selected.selected_ids(),
            vec![id("1"), id("2")]
        );
    }

    #[test]
    fn test_drag_unselected_layer_moves_only_it() {
        let mut interaction = Interaction::default();
        click(&mut interaction, 20.0, 20.0, Modifiers::default());

        press(&mut interaction, 210.0, 210.0, Modifiers::default());
        move_to(&mut interaction, 200.0, 230.0);
        release(&mut interaction, 200.0, 230.0);

        assert_eq!(position(&interaction, "3"), Point::new(190.0, 220.0));
        assert_eq!(position(&interaction, "1"), Point::new(10.0, 10.0));
        assert_eq!(interaction.state().selected.selected_ids(), vec![id("3")]);
    }

    #[test]
    fn test_background_click_deselects() {
        let mut interaction = Interaction::default();
        click(&mut interaction, 20.0, 20.0, Modifiers::default());
        assert!(click(&mut interaction, 450.0, 450.0, Modifiers::default()));
        assert!(interaction.state().selected.is_empty());

        // Nothing selected: nothing to redraw
        assert!(!click(&mut interaction, 450.0, 450.0, Modifiers::default()));
    }

    #[test]
    fn test_rubber_band_selects_and_keeps_selection() {
        let mut interaction = Interaction::default();
        press(&mut interaction, 0.0, 0.0, Modifiers::default());
        move_to(&mut interaction, 150.0, 150.0);
        assert!(interaction.selecting());
        assert!(interaction.marquee().is_some());
        assert_eq!(
            interaction.state().selected.selected_ids(),
            vec![id("1"), id("2")]
        );

        release(&mut interaction, 150.0, 150.0);
        assert!(!interaction.selecting());
        // The release that ends a band is not a background click
        assert_eq!(
            interaction.state().selected.selected_ids(),
            vec![id("1"), id("2")]
        );
    }

    #[test]
    fn test_rubber_band_shrinking_deselects() {
        let mut interaction = Interaction::default();
        press(&mut interaction, 0.0, 0.0, Modifiers::default());
        move_to(&mut interaction, 150.0, 150.0);
        move_to(&mut interaction, 50.0, 50.0);
        release(&mut interaction, 50.0, 50.0);
        assert_eq!(interaction.state().selected.selected_ids(), vec![id("1")]);
    }

    #[test]
    fn test_rubber_band_replaces_selection() {
        let mut interaction = Interaction::default();
        click(&mut interaction, 210.0, 210.0, Modifiers::default());

        press(&mut interaction, 0.0, 0.0, Modifiers::default());
        move_to(&mut interaction, 50.0, 50.0);
        release(&mut interaction, 50.0, 50.0);
        assert_eq!(interaction.state().selected.selected_ids(), vec![id("1")]);
    }

    #[test]
    fn test_additive_rubber_band_keeps_existing() {
        let mut interaction = Interaction::default();
        click(&mut interaction, 210.0, 210.0, Modifiers::default());

        press(&mut interaction, 0.0, 0.0, Modifiers::SHIFT);
        move_to(&mut interaction, 50.0, 50.0);
        release(&mut interaction, 50.0, 50.0);
        assert_eq!(
            interaction.state().selected.selected_ids(),
            vec![id("1"), id("3")]
        );
    }

    #[test]
    fn test_escape_cancels_drag() {
        let mut interaction = Interaction::default();
        press(&mut interaction, 110.0, 110.0, Modifiers::default());
        move_to(&mut interaction, 200.0, 110.0);
        assert_eq!(position(&interaction, "2"), Point::new(190.0, 100.0));

        assert!(interaction.handle_key("Escape").unwrap());
        assert_eq!(position(&interaction, "2"), Point::new(100.0, 100.0));
        assert!(!interaction.state().is_dragging());

        // The release after a cancel does nothing
        assert!(!release(&mut interaction, 200.0, 110.0));
        assert_eq!(position(&interaction, "2"), Point::new(100.0, 100.0));
    }

    #[test]
    fn test_escape_cancels_rubber_band() {
        let mut interaction = Interaction::default();
        press(&mut interaction, 0.0, 0.0, Modifiers::default());
        move_to(&mut interaction, 60.0, 60.0);
        assert!(interaction.handle_key("Escape").unwrap());
        assert!(!interaction.selecting());
        assert!(!interaction.handle_key("Escape").unwrap());
        assert!(!interaction.handle_key("a").unwrap());
    }

    #[test]
    fn test_escape_before_drag_keeps_click() {
        let mut interaction = Interaction::default();
        press(&mut interaction, 20.0, 20.0, Modifiers::default());
        assert!(!interaction.handle_key("Escape").unwrap());
        assert!(release(&mut interaction, 20.0, 20.0));
        assert_eq!(interaction.state().selected.selected_ids(), vec![id("1")]);
    }

    #[test]
    fn test_cancel_lost_release_during_drag() {
        let mut interaction = Interaction::default();
        press(&mut interaction, 110.0, 110.0, Modifiers::default());
        move_to(&mut interaction, 130.0, 110.0);
        assert!(interaction.cancel().unwrap());
        assert_eq!(position(&interaction, "2"), Point::new(100.0, 100.0));
        assert!(!interaction.state().is_dragging());

        // Hovering afterwards moves nothing
        assert!(!move_to(&mut interaction, 300.0, 300.0));
        assert_eq!(position(&interaction, "2"), Point::new(100.0, 100.0));

        // The next press is a fresh gesture
        assert!(click(&mut interaction, 20.0, 20.0, Modifiers::default()));
        assert_eq!(interaction.state().selected.selected_ids(), vec![id("1")]);
    }

    #[test]
    fn test_cancel_pending_press_and_band() {
        let mut interaction = Interaction::default();
        press(&mut interaction, 20.0, 20.0, Modifiers::default());
        assert!(!interaction.cancel().unwrap());
        assert!(!release(&mut interaction, 20.0, 20.0));
        assert!(interaction.state().selected.is_empty());

        press(&mut interaction, 0.0, 0.0, Modifiers::default());
        move_to(&mut interaction, 60.0, 60.0);
        assert!(interaction.cancel().unwrap());
        assert!(!interaction.selecting());
        assert!(!interaction.cancel().unwrap());
    }

    #[test]
    fn test_topmost_layer_wins() {
        use crate::document::LayerDocument;
        use crate::layer::Layer;

        let document = LayerDocument::new(vec![
            Layer::new("back", 0.0, 0.0, 1, "red"),
            Layer::new("front", 40.0, 0.0, 0, "blue"),
        ])
        .unwrap();
        let mut interaction = Interaction::new(State::new(document), 3.0);
        click(&mut interaction, 60.0, 20.0, Modifiers::default());
        assert_eq!(interaction.state().selected.selected_ids(), vec![id("front")]);
    }
}
