//! SVG renderer implementation.

use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError};
use kurbo::Rect;
use multidrag_core::config::{MarqueeStyle, SerializableColor};
use multidrag_core::layer::Layer;
use peniko::Color;
use std::fmt::Write;

/// SVG namespace URI.
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Escape a string for use inside a double-quoted XML attribute.
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn css(color: Color) -> String {
    SerializableColor::from(color).to_css()
}

/// Renders canvas state to SVG markup.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    markup: Option<String>,
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the markup of the last built scene.
    pub fn take_markup(&mut self) -> RenderResult<String> {
        self.markup.take().ok_or(RendererError::EmptyScene)
    }

    fn render_layer(
        out: &mut String,
        layer: &Layer,
        opacity: f64,
        outline: Option<Color>,
    ) -> std::fmt::Result {
        write!(
            out,
            r#"<rect data-layer-id="{}" fill="{}" fill-opacity="{}" width="{}" height="{}" x="{}" y="{}""#,
            escape_attr(layer.id.as_str()),
            escape_attr(&layer.color),
            opacity,
            layer.size.width,
            layer.size.height,
            layer.position.x,
            layer.position.y,
        )?;
        if let Some(color) = outline {
            write!(out, r#" stroke="{}" stroke-width="2""#, css(color))?;
        }
        out.write_str("/>")
    }

    fn render_selection_rect(out: &mut String, rect: Rect, style: &MarqueeStyle) -> std::fmt::Result {
        write!(
            out,
            r#"<rect class="selection" pointer-events="none" x="{}" y="{}" width="{}" height="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
            rect.x0,
            rect.y0,
            rect.width(),
            rect.height(),
            style.fill.to_css(),
            style.stroke.to_css(),
            style.stroke_width,
        )
    }
}

impl Renderer for SvgRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        let config = ctx.config;
        let mut out = String::new();

        write!(
            out,
            r#"<svg xmlns="{}" viewBox="0 0 {} {}" width="{}" height="{}" style="background: {}">"#,
            SVG_NS,
            config.width,
            config.height,
            config.width,
            config.height,
            config.background.to_css(),
        )?;

        for layer in ctx.state.document.paint_order() {
            let selected = ctx.state.is_selected(&layer.id);
            let outline = if selected { ctx.selection_outline } else { None };
            Self::render_layer(&mut out, layer, config.opacity_for(selected), outline)?;
        }

        if let Some(rect) = ctx.selection_rect {
            Self::render_selection_rect(&mut out, rect, &config.marquee)?;
        }

        out.push_str("</svg>");
        log::trace!("built svg scene ({} bytes)", out.len());
        self.markup = Some(out);
        Ok(())
    }
}
