//! Platform-independent application shell.

use multidrag_core::config::{self, CanvasConfig, ConfigError, SerializableColor};
use multidrag_core::document::{DocumentError, LayerDocument, default_layers};
use multidrag_core::gesture::PointerEvent;
use multidrag_core::interaction::Interaction;
use multidrag_core::layer::Layer;
use multidrag_core::state::{State, StateError};
use multidrag_render::{RenderContext, Renderer, RendererError, SvgRenderer};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Render(#[from] RendererError),
    #[error("Mount failed: {0}")]
    Mount(String),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    /// CSS selector of the element the canvas is mounted into.
    pub mount_selector: String,
    pub canvas: CanvasConfig,
    /// Initial layers. `None` uses the built-in set.
    pub layers: Option<Vec<Layer>>,
    /// Outline color for selected layers.
    pub selection_outline: Option<SerializableColor>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "MultiDrag".to_string(),
            mount_selector: "#app".to_string(),
            canvas: CanvasConfig::default(),
            layers: None,
            selection_outline: None,
        }
    }
}

impl AppConfig {
    /// Parse from JSON text.
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let config: Self = config::parse_json(json)?;
        config.canvas.validate()?;
        Ok(config)
    }

    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        Self::from_json(&config::read_file(path.as_ref())?)
    }

    /// Build the initial document.
    fn document(&self) -> Result<LayerDocument, DocumentError> {
        match &self.layers {
            Some(layers) => LayerDocument::new(layers.clone()),
            None => LayerDocument::new(
                default_layers()
                    .into_iter()
                    .map(|layer| layer.with_size(self.canvas.layer_size))
                    .collect(),
            ),
        }
    }
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    interaction: Interaction,
    renderer: SvgRenderer,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Create an application with the built-in layers and default config.
    pub fn new() -> Self {
        let config = AppConfig::default();
        let interaction = Interaction::new(State::default(), config.canvas.drag_threshold);
        Self {
            config,
            interaction,
            renderer: SvgRenderer::new(),
        }
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig) -> Result<Self, AppError> {
        config.canvas.validate()?;
        let document = config.document()?;
        log::info!("{}: {} layers", config.title, document.len());
        let interaction = Interaction::new(State::new(document), config.canvas.drag_threshold);
        Ok(Self {
            config,
            interaction,
            renderer: SvgRenderer::new(),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn state(&self) -> &State {
        self.interaction.state()
    }

    /// Whether a rubber-band selection is in progress.
    pub fn selecting(&self) -> bool {
        self.interaction.selecting()
    }

    /// Feed a pointer event. Returns true if the canvas must be redrawn.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Result<bool, AppError> {
        Ok(self.interaction.handle_pointer_event(event)?)
    }

    /// The platform dropped the pointer; abandon the current gesture.
    pub fn cancel_pointer(&mut self) -> Result<bool, AppError> {
        Ok(self.interaction.cancel()?)
    }

    /// Feed a key press. Returns true if the canvas must be redrawn.
    pub fn handle_key(&mut self, key: &str) -> Result<bool, AppError> {
        Ok(self.interaction.handle_key(key)?)
    }

    /// Render the current state to SVG markup.
    pub fn render(&mut self) -> Result<String, AppError> {
        let ctx = RenderContext::new(self.interaction.state(), &self.config.canvas)
            .with_selection_rect(self.interaction.marquee().map(|m| m.to_rect()))
            .with_selection_outline(self.config.selection_outline.map(Into::into));
        self.renderer.build_scene(&ctx)?;
        Ok(self.renderer.take_markup()?)
    }
}
