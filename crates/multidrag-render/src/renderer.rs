//! Renderer trait abstraction.

use kurbo::Rect;
use multidrag_core::config::CanvasConfig;
use multidrag_core::state::State;
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Nothing has been rendered yet")]
    EmptyScene,
}

impl From<std::fmt::Error> for RendererError {
    fn from(err: std::fmt::Error) -> Self {
        RendererError::RenderFailed(err.to_string())
    }
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The state to render.
    pub state: &'a State,
    /// Canvas size, colors and opacities.
    pub config: &'a CanvasConfig,
    /// Rubber-band rectangle in canvas coordinates.
    pub selection_rect: Option<Rect>,
    /// Outline color for selected layers. `None` draws no outline.
    pub selection_outline: Option<Color>,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(state: &'a State, config: &'a CanvasConfig) -> Self {
        Self {
            state,
            config,
            selection_rect: None,
            selection_outline: None,
        }
    }

    /// Set the selection rectangle.
    pub fn with_selection_rect(mut self, rect: Option<Rect>) -> Self {
        self.selection_rect = rect;
        self
    }

    /// Outline selected layers with the given color.
    pub fn with_selection_outline(mut self, color: Option<Color>) -> Self {
        self.selection_outline = color;
        self
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Build the output for a frame from the given context.
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()>;
}
