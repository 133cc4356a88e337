//! Pointer input and click/drag gesture recognition.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Default distance the pointer must travel before a press becomes a drag.
pub const DEFAULT_DRAG_THRESHOLD: f64 = 3.0;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Whether the gesture should extend the selection instead of replacing it.
    pub fn is_additive(&self) -> bool {
        self.shift || self.ctrl || self.meta
    }
}

/// Pointer event in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
    Move {
        position: Point,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
}

/// High-level gesture produced from pointer events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Left button pressed; not yet known whether this is a click or a drag.
    Press { position: Point, modifiers: Modifiers },
    /// Released without moving past the drag threshold.
    Click { position: Point, modifiers: Modifiers },
    /// Pointer crossed the drag threshold.
    DragStart { origin: Point, modifiers: Modifiers },
    /// Pointer moved during a drag. `delta` is measured from `origin`.
    DragMove { origin: Point, position: Point, delta: Vec2 },
    /// Released after dragging.
    DragEnd { origin: Point, position: Point },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Pressed { origin: Point, modifiers: Modifiers },
    Dragging { origin: Point },
}

/// Turns raw pointer events into clicks and drags.
#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    phase: Phase,
    threshold: f64,
    /// Last known pointer position.
    pub pointer_position: Point,
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(DEFAULT_DRAG_THRESHOLD)
    }
}

impl GestureRecognizer {
    pub fn new(threshold: f64) -> Self {
        Self {
            phase: Phase::Idle,
            threshold: threshold.max(0.0),
            pointer_position: Point::ZERO,
        }
    }

    /// Whether the left button is down.
    pub fn is_pressed(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    /// Abandon the current gesture; the next release is ignored.
    pub fn cancel(&mut self) {
        self.phase = Phase::Idle;
    }

    /// Process a pointer event. A single move can both cross the threshold
    /// and move, so up to two gestures are returned.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> Vec<Gesture> {
        match event {
            PointerEvent::Down {
                position,
                button,
                modifiers,
            } => {
                self.pointer_position = position;
                if button != MouseButton::Left || self.is_pressed() {
                    return Vec::new();
                }
                log::trace!("press at ({}, {})", position.x, position.y);
                self.phase = Phase::Pressed {
                    origin: position,
                    modifiers,
                };
                vec![Gesture::Press { position, modifiers }]
            }
            PointerEvent::Move { position } => {
                self.pointer_position = position;
                match self.phase {
                    Phase::Idle => Vec::new(),
                    Phase::Pressed { origin, modifiers } => {
                        if (position - origin).hypot() <= self.threshold {
                            return Vec::new();
                        }
                        log::trace!("drag threshold crossed");
                        self.phase = Phase::Dragging { origin };
                        vec![
                            Gesture::DragStart { origin, modifiers },
                            Gesture::DragMove {
                                origin,
                                position,
                                delta: position - origin,
                            },
                        ]
                    }
                    Phase::Dragging { origin } => vec![Gesture::DragMove {
                        origin,
                        position,
                        delta: position - origin,
                    }],
                }
            }
            PointerEvent::Up { position, button } => {
                self.pointer_position = position;
                if button != MouseButton::Left {
                    return Vec::new();
                }
                let phase = std::mem::replace(&mut self.phase, Phase::Idle);
                match phase {
                    Phase::Idle => Vec::new(),
                    Phase::Pressed { modifiers, .. } => {
                        vec![Gesture::Click { position, modifiers }]
                    }
                    Phase::Dragging { origin } => {
                        log::trace!("drag ended");
                        vec![Gesture::DragEnd { origin, position }]
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
            modifiers: Modifiers::default(),
        }
    }

    fn mv(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Move {
            position: Point::new(x, y),
        }
    }

    fn up(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Up {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    #[test]
    fn test_click_within_threshold() {
        let mut recognizer = GestureRecognizer::default();
        recognizer.handle_pointer_event(down(100.0, 100.0));
        assert!(recognizer.handle_pointer_event(mv(102.0, 101.0)).is_empty());
        assert!(!recognizer.is_dragging());

        let gestures = recognizer.handle_pointer_event(up(102.0, 101.0));
        assert!(matches!(gestures.as_slice(), [Gesture::Click { .. }]));
        assert!(!recognizer.is_pressed());
    }

    #[test]
    fn test_move_exactly_threshold_is_click() {
        let mut recognizer = GestureRecognizer::default();
        recognizer.handle_pointer_event(down(100.0, 100.0));
        assert!(recognizer.handle_pointer_event(mv(103.0, 100.0)).is_empty());
        assert!(!recognizer.is_dragging());
        let gestures = recognizer.handle_pointer_event(up(103.0, 100.0));
        assert!(matches!(gestures.as_slice(), [Gesture::Click { .. }]));
    }

    #[test]
    fn test_move_just_past_threshold_is_drag() {
        let mut recognizer = GestureRecognizer::default();
        recognizer.handle_pointer_event(down(100.0, 100.0));
        let gestures = recognizer.handle_pointer_event(mv(103.01, 100.0));
        assert!(matches!(
            gestures.as_slice(),
            [Gesture::DragStart { .. }, Gesture::DragMove { .. }]
        ));
        assert!(recognizer.is_dragging());
    }

    #[test]
    fn test_drag_past_threshold() {
        let mut recognizer = GestureRecognizer::default();
        recognizer.handle_pointer_event(down(100.0, 100.0));

        let gestures = recognizer.handle_pointer_event(mv(150.0, 120.0));
        assert_eq!(gestures.len(), 2);
        assert!(matches!(gestures[0], Gesture::DragStart { .. }));
        match gestures[1] {
            Gesture::DragMove { delta, .. } => {
                assert!((delta.x - 50.0).abs() < f64::EPSILON);
                assert!((delta.y - 20.0).abs() < f64::EPSILON);
            }
            other => panic!("Expected DragMove, got {other:?}"),
        }
        assert!(recognizer.is_dragging());

        let gestures = recognizer.handle_pointer_event(up(150.0, 120.0));
        assert!(matches!(gestures.as_slice(), [Gesture::DragEnd { .. }]));
    }

    #[test]
    fn test_delta_measured_from_origin() {
        let mut recognizer = GestureRecognizer::default();
        recognizer.handle_pointer_event(down(0.0, 0.0));
        recognizer.handle_pointer_event(mv(10.0, 0.0));
        let gestures = recognizer.handle_pointer_event(mv(25.0, 5.0));
        match gestures.as_slice() {
            [Gesture::DragMove { delta, .. }] => assert_eq!(*delta, Vec2::new(25.0, 5.0)),
            other => panic!("Expected one DragMove, got {other:?}"),
        }
    }

    #[test]
    fn test_right_button_ignored() {
        let mut recognizer = GestureRecognizer::default();
        let gestures = recognizer.handle_pointer_event(PointerEvent::Down {
            position: Point::new(1.0, 1.0),
            button: MouseButton::Right,
            modifiers: Modifiers::default(),
        });
        assert!(gestures.is_empty());
        assert!(!recognizer.is_pressed());
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut recognizer = GestureRecognizer::default();
        assert!(recognizer.handle_pointer_event(mv(40.0, 40.0)).is_empty());
        assert_eq!(recognizer.pointer_position, Point::new(40.0, 40.0));
    }

    #[test]
    fn test_cancel_swallows_release() {
        let mut recognizer = GestureRecognizer::default();
        recognizer.handle_pointer_event(down(0.0, 0.0));
        recognizer.handle_pointer_event(mv(30.0, 0.0));
        recognizer.cancel();
        assert!(recognizer.handle_pointer_event(up(30.0, 0.0)).is_empty());
    }

    #[test]
    fn test_modifiers_carried_to_click() {
        let mut recognizer = GestureRecognizer::default();
        recognizer.handle_pointer_event(PointerEvent::Down {
            position: Point::new(5.0, 5.0),
            button: MouseButton::Left,
            modifiers: Modifiers::SHIFT,
        });
        match recognizer.handle_pointer_event(up(5.0, 5.0)).as_slice() {
            [Gesture::Click { modifiers, .. }] => assert!(modifiers.is_additive()),
            other => panic!("Expected Click, got {other:?}"),
        }
    }
}
