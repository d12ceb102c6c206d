//! Legend image explaining the visual encoding.
//!
//! One wide canvas (4x card width, half card height) with four annotated
//! demonstrations driven straight through the pattern generator: burst size
//! vs message count, saturation vs late-reply rate, the star fallback for
//! quiet weeks, and the her/his placement convention. Finished with the
//! paper-grain pass and a stroked frame. Runs once at startup; no data
//! dependence.

use kurbo::Point;

use crate::{
    error::EmberdeckResult,
    pattern::{self, size_for_messages},
    surface::{Raster, Surface},
    text::TextEngine,
    texture,
    theme::Theme,
};

const TITLE_SIZE: f32 = 24.0;
const CAPTION_SIZE: f32 = 15.0;
const FRAME_WEIGHT: f64 = 3.0;
/// Horizontal spacing between demos inside a section.
const DEMO_SPACING: f64 = 150.0;

/// Compose the legend raster.
#[tracing::instrument(skip_all)]
pub fn create_guide<R: rand::Rng + ?Sized>(
    rng: &mut R,
    fonts: &mut TextEngine,
    theme: &Theme,
) -> EmberdeckResult<Raster> {
    theme.validate()?;

    let width = theme.card.width * 4;
    let height = theme.card.height / 2;
    let mut surface = Surface::new(width, height)?;
    surface.fill(theme.palette.background);

    let w = f64::from(width);
    surface.text_centered(
        fonts,
        "How to Read the Visualization",
        TITLE_SIZE,
        theme.palette.paper,
        Point::new(w / 2.0, 40.0),
    )?;

    size_section(&mut surface, rng, fonts, theme, Point::new(50.0, 100.0))?;
    saturation_section(
        &mut surface,
        rng,
        fonts,
        theme,
        Point::new(w / 4.0 + 100.0, 100.0),
    )?;
    stars_section(
        &mut surface,
        rng,
        fonts,
        theme,
        Point::new(w / 2.0 + 100.0, 100.0),
    )?;
    position_section(
        &mut surface,
        rng,
        fonts,
        theme,
        Point::new(w / 4.0 + f64::from(theme.card.width) * 2.0, 100.0),
    )?;

    texture::paper_grain(&mut surface, rng, &theme.texture);

    let center = surface.center();
    surface.stroke_rounded_rect(
        center,
        w - theme.card.padding / 1.5,
        f64::from(height) - theme.card.padding / 1.5,
        theme.card.corner_radius,
        FRAME_WEIGHT,
        theme.palette.paper,
    );

    Ok(surface.finish())
}

/// Three bursts at the message counts the size mapping pins down, drawn at
/// half size to fit the strip.
fn size_section<R: rand::Rng + ?Sized>(
    surface: &mut Surface,
    rng: &mut R,
    fonts: &mut TextEngine,
    theme: &Theme,
    origin: Point,
) -> EmberdeckResult<()> {
    let counts = [100.0, 800.0, 1500.0];
    for (i, count) in counts.iter().enumerate() {
        let cx = origin.x + i as f64 * DEMO_SPACING + 30.0;
        let size = size_for_messages(*count);
        pattern::draw_burst(
            surface,
            rng,
            Point::new(cx, origin.y + 100.0),
            size / 2.0,
            0.01,
        );
        surface.text_centered(
            fonts,
            &format!("{count} messages"),
            CAPTION_SIZE,
            theme.palette.paper,
            Point::new(cx, origin.y + 210.0),
        )?;
    }
    Ok(())
}

/// Same-size bursts across the late-reply range, washing out left to right.
fn saturation_section<R: rand::Rng + ?Sized>(
    surface: &mut Surface,
    rng: &mut R,
    fonts: &mut TextEngine,
    theme: &Theme,
    origin: Point,
) -> EmberdeckResult<()> {
    let late_rates = [0.01, 0.03, 0.05];
    for (i, rate) in late_rates.iter().enumerate() {
        let cx = origin.x + i as f64 * DEMO_SPACING + 35.0;
        pattern::draw_burst(surface, rng, Point::new(cx, origin.y + 100.0), 50.0, *rate);
        surface.text_centered(
            fonts,
            &format!("{}% late", (rate * 100.0).round() as u32),
            CAPTION_SIZE,
            theme.palette.paper,
            Point::new(cx, origin.y + 210.0),
        )?;
    }
    Ok(())
}

fn stars_section<R: rand::Rng + ?Sized>(
    surface: &mut Surface,
    rng: &mut R,
    fonts: &mut TextEngine,
    theme: &Theme,
    origin: Point,
) -> EmberdeckResult<()> {
    surface.text_left(
        fonts,
        "When we texted less than 200 messages",
        CAPTION_SIZE,
        theme.palette.paper,
        Point::new(origin.x, origin.y + 210.0),
    )?;
    surface.text_left(
        fonts,
        "20 messages = 1 star",
        CAPTION_SIZE,
        theme.palette.paper,
        Point::new(origin.x, origin.y + 230.0),
    )?;

    let offsets = [(100.0, 80.0), (150.0, 100.0), (200.0, 90.0)];
    let stars = &theme.palette.stars;
    for (i, (dx, dy)) in offsets.iter().enumerate() {
        let color = stars[i % stars.len()];
        pattern::draw_star(
            surface,
            rng,
            Point::new(origin.x + dx, origin.y + dy),
            color,
        );
    }
    Ok(())
}

fn position_section<R: rand::Rng + ?Sized>(
    surface: &mut Surface,
    rng: &mut R,
    fonts: &mut TextEngine,
    theme: &Theme,
    origin: Point,
) -> EmberdeckResult<()> {
    pattern::draw_burst(
        surface,
        rng,
        Point::new(origin.x + 50.0, origin.y + 70.0),
        90.0,
        0.01,
    );
    pattern::draw_burst(
        surface,
        rng,
        Point::new(origin.x + 250.0, origin.y + 160.0),
        90.0,
        0.01,
    );

    let labels: [(&str, f64, f64); 4] = [
        ("Upper firework:", 50.0, 50.0),
        ("Her messages", 50.0, 70.0),
        ("Lower firework:", 250.0, 180.0),
        ("My messages", 250.0, 200.0),
    ];
    for (label, dx, dy) in labels {
        surface.text_left(
            fonts,
            label,
            CAPTION_SIZE,
            theme.palette.paper,
            Point::new(origin.x + dx, origin.y + dy),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn small_theme() -> Theme {
        let mut theme = Theme::default();
        theme.card.width = 96;
        theme.card.height = 144;
        theme.texture.grain_strokes = 150;
        theme.texture.overscan = 40.0;
        theme
    }

    fn engine() -> TextEngine {
        let bytes = std::fs::read(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/assets/DejaVuSerif.ttf"
        ))
        .unwrap();
        TextEngine::from_font_bytes(bytes).unwrap()
    }

    #[test]
    fn guide_is_four_cards_wide_and_half_tall() {
        let theme = small_theme();
        let mut rng = StdRng::seed_from_u64(1);
        let mut fonts = engine();
        let guide = create_guide(&mut rng, &mut fonts, &theme).unwrap();
        assert_eq!(guide.width(), 96 * 4);
        assert_eq!(guide.height(), 72);
    }

    #[test]
    fn frame_is_drawn_over_the_grain() {
        let theme = small_theme();
        let mut rng = StdRng::seed_from_u64(2);
        let mut fonts = engine();
        let guide = create_guide(&mut rng, &mut fonts, &theme).unwrap();
        // Top frame edge runs through y = padding / 3 for these dimensions.
        let i = ((10 * guide.width() + 192) * 4) as usize;
        let d = guide.data();
        assert_eq!([d[i], d[i + 1], d[i + 2], d[i + 3]], [251, 235, 193, 255]);
    }

    #[test]
    fn guide_renders_deterministically_under_a_seed() {
        let theme = small_theme();
        let mut fonts = engine();
        let render = |seed: u64, fonts: &mut TextEngine| {
            let mut rng = StdRng::seed_from_u64(seed);
            create_guide(&mut rng, fonts, &theme)
                .unwrap()
                .data()
                .to_vec()
        };
        assert_eq!(render(7, &mut fonts), render(7, &mut fonts));
        assert_ne!(render(7, &mut fonts), render(8, &mut fonts));
    }
}
