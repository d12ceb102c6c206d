//! Background texture generation.
//!
//! A texture is a full card-sized raster: solid dark fill, a stroked
//! rounded-rect frame inset by the card padding, a filled center panel, and
//! a dense pass of translucent random Bezier strokes that reads as paper
//! grain. The grain pass is by far the dominant cost, which is why textures
//! are generated once and cached (see [`crate::background`]).

use kurbo::Point;

use crate::{
    color::Color,
    error::EmberdeckResult,
    pattern::uniform,
    surface::{Raster, Surface},
    theme::{TextureStyle, Theme},
};

const FRAME_WEIGHT: f64 = 5.0;
const PANEL_CORNER_RADIUS: f64 = 25.0;

/// Generate one card-sized background texture.
#[tracing::instrument(skip_all)]
pub fn generate<R: rand::Rng + ?Sized>(rng: &mut R, theme: &Theme) -> EmberdeckResult<Raster> {
    let card = theme.card;
    let mut surface = Surface::new(card.width, card.height)?;
    surface.fill(theme.palette.background);

    if theme.texture.frame {
        surface.stroke_rounded_rect(
            surface.center(),
            f64::from(card.width) - card.padding,
            f64::from(card.height) - card.padding,
            card.corner_radius,
            FRAME_WEIGHT,
            theme.palette.paper,
        );
    }

    if theme.texture.panel {
        // Panel is wider than tall: width comes from the card height and
        // height from the card width.
        surface.fill_rounded_rect(
            surface.center(),
            f64::from(card.height) / 3.0,
            f64::from(card.width) / 5.0,
            PANEL_CORNER_RADIUS,
            theme.palette.panel,
        );
    }

    if theme.texture.grain {
        paper_grain(&mut surface, rng, &theme.texture);
    }

    Ok(surface.finish())
}

/// Scatter the translucent grain strokes across the whole surface.
///
/// Standalone so the guide can overlay grain on a canvas of its own size.
pub fn paper_grain<R: rand::Rng + ?Sized>(
    surface: &mut Surface,
    rng: &mut R,
    style: &TextureStyle,
) {
    let w = f64::from(surface.width());
    let h = f64::from(surface.height());
    let pad = style.overscan;

    for _ in 0..style.grain_strokes {
        let color = Color::hsla(
            50.0,
            50.0,
            uniform(rng, 55.0, 95.0),
            uniform(rng, 1.0, 15.0),
        );
        let p0 = grain_point(rng, w, h, pad);
        let p1 = grain_point(rng, w, h, pad);
        let p2 = grain_point(rng, w, h, pad);
        let p3 = grain_point(rng, w, h, pad);
        surface.cubic(p0, p1, p2, p3, style.grain_weight, color);
    }
}

fn grain_point<R: rand::Rng + ?Sized>(rng: &mut R, w: f64, h: f64, pad: f64) -> Point {
    Point::new(uniform(rng, -pad, w + pad), uniform(rng, -pad, h + pad))
}
