//! MultiDrag Core Library
//!
//! Platform-agnostic layer model, selection reducer and gesture handling for
//! the MultiDrag canvas.

pub mod config;
pub mod document;
pub mod drag;
pub mod gesture;
pub mod interaction;
pub mod layer;
pub mod selection;
pub mod state;

pub use config::{CanvasConfig, ConfigError, MarqueeStyle, SerializableColor};
pub use document::{DocumentError, LayerDocument, default_layers};
pub use drag::DragSnapshot;
pub use gesture::{Gesture, GestureRecognizer, Modifiers, MouseButton, PointerEvent};
pub use interaction::Interaction;
pub use layer::{Layer, LayerId};
pub use selection::{Marquee, RubberBand, Selection, SelectionChange};
pub use state::{Action, State, StateError, reduce};
