//! Text shaping and layout from raw font bytes.
//!
//! One [`TextEngine`] is built per run from a single TTF/OTF file and shared
//! by every surface that draws text. Layouts are plain single-style runs;
//! the deck never needs wrapping or rich text.

use std::path::Path;

use anyhow::Context as _;

use crate::{
    color::Color,
    error::{EmberdeckError, EmberdeckResult},
};

/// RGBA8 brush color carried through Parley styles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Color> for TextBrushRgba8 {
    fn from(c: Color) -> Self {
        let [r, g, b, a] = c.to_rgba8();
        Self { r, g, b, a }
    }
}

/// Stateful helper for building Parley text layouts from raw font bytes.
pub struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl TextEngine {
    pub fn from_font_bytes(font_bytes: Vec<u8>) -> EmberdeckResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| EmberdeckError::asset("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| EmberdeckError::asset("registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font,
        })
    }

    pub fn load(path: &Path) -> EmberdeckResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("reading font from {}", path.display()))?;
        Self::from_font_bytes(bytes)
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Font handle for the raster backend's glyph runs.
    pub(crate) fn font(&self) -> &vello_cpu::peniko::FontData {
        &self.font
    }

    /// Shape and lay out plain single-line text at the given pixel size.
    pub fn layout(
        &mut self,
        text: &str,
        size_px: f32,
        color: Color,
    ) -> EmberdeckResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(EmberdeckError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrushRgba8::from(
            color,
        )));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}
