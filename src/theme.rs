//! Visual configuration: card geometry, palette, texture style, cache size.
//!
//! [`Theme::default`] is the stock look; every knob can be overridden from a
//! JSON file. All dimensions are pixels.

use std::path::Path;

use anyhow::Context as _;

use crate::{
    color::Color,
    error::{EmberdeckError, EmberdeckResult},
};

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Theme {
    pub card: CardMetrics,
    pub palette: Palette,
    pub texture: TextureStyle,
    /// Number of pre-generated background textures to cycle through.
    pub background_pool: usize,
    /// Region (in card pixels) where small-volume star bursts may land.
    pub star_region: StarRegion,
}

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CardMetrics {
    pub width: u32,
    pub height: u32,
    pub padding: f64,
    pub corner_radius: f64,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Palette {
    pub background: Color,
    pub paper: Color,
    pub panel: Color,
    /// Star colors, picked uniformly per star.
    pub stars: Vec<Color>,
}

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextureStyle {
    /// Random grain strokes per texture.
    pub grain_strokes: u32,
    /// Control points may land this far outside the canvas on every side.
    pub overscan: f64,
    pub grain_weight: f64,
    pub frame: bool,
    pub panel: bool,
    pub grain: bool,
}

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StarRegion {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            card: CardMetrics::default(),
            palette: Palette::default(),
            texture: TextureStyle::default(),
            background_pool: 3,
            star_region: StarRegion::default(),
        }
    }
}

impl Default for CardMetrics {
    fn default() -> Self {
        Self {
            width: 450,
            height: 750,
            padding: 30.0,
            corner_radius: 15.0,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::rgb8(0x00, 0x00, 0x00),
            paper: Color::rgb8(0xfb, 0xeb, 0xc1),
            panel: Color::rgb8(0x15, 0x31, 0x4a),
            stars: vec![
                Color::rgb8(166, 54, 62),
                Color::rgb8(219, 186, 83),
                Color::rgb8(81, 132, 123),
            ],
        }
    }
}

impl Default for TextureStyle {
    fn default() -> Self {
        Self {
            grain_strokes: 9000,
            overscan: 1000.0,
            grain_weight: 0.15,
            frame: true,
            panel: true,
            grain: true,
        }
    }
}

impl Default for StarRegion {
    fn default() -> Self {
        Self {
            x_min: 95.0,
            x_max: 325.0,
            y_min: 120.0,
            y_max: 300.0,
        }
    }
}

impl Theme {
    pub fn load(path: &Path) -> EmberdeckResult<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading theme from {}", path.display()))?;
        let theme: Theme = serde_json::from_str(&raw)
            .with_context(|| format!("parsing theme JSON {}", path.display()))?;
        theme.validate()?;
        Ok(theme)
    }

    pub fn validate(&self) -> EmberdeckResult<()> {
        if self.card.width == 0 || self.card.height == 0 {
            return Err(EmberdeckError::validation("card width/height must be > 0"));
        }
        if self.card.width > u32::from(u16::MAX) || self.card.height > u32::from(u16::MAX) {
            return Err(EmberdeckError::validation(
                "card width/height must fit in u16",
            ));
        }
        if !(self.card.padding.is_finite() && self.card.corner_radius.is_finite()) {
            return Err(EmberdeckError::validation(
                "card padding/corner_radius must be finite",
            ));
        }
        if self.background_pool == 0 {
            return Err(EmberdeckError::validation("background_pool must be > 0"));
        }
        if self.palette.stars.is_empty() {
            return Err(EmberdeckError::validation(
                "palette must define at least one star color",
            ));
        }
        if !(self.texture.overscan.is_finite() && self.texture.overscan >= 0.0) {
            return Err(EmberdeckError::validation(
                "texture overscan must be finite and >= 0",
            ));
        }
        if !self.texture.grain_weight.is_finite() {
            return Err(EmberdeckError::validation(
                "texture grain_weight must be finite",
            ));
        }
        let sr = &self.star_region;
        if !(sr.x_min.is_finite()
            && sr.x_max.is_finite()
            && sr.y_min.is_finite()
            && sr.y_max.is_finite())
        {
            return Err(EmberdeckError::validation("star_region must be finite"));
        }
        if sr.x_min > sr.x_max || sr.y_min > sr.y_max {
            return Err(EmberdeckError::validation(
                "star_region min must not exceed max",
            ));
        }
        Ok(())
    }
}
