//! MultiDrag Render Library
//!
//! Renderer abstraction and implementations for MultiDrag.
//! The default implementation writes SVG markup.

mod renderer;
mod svg_impl;

pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};
pub use svg_impl::{SVG_NS, SvgRenderer, escape_attr};
