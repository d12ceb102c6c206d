//! Generative pattern drawing: firework bursts and small star bursts.
//!
//! The burst is a Fermat-spiral phyllotaxis layout: seed `i` sits at angle
//! `i * GOLDEN_ANGLE` and normalized radius `sqrt(i / count)`, which packs
//! points evenly like sunflower seeds. Each seed becomes a short radial dash
//! with randomized reach, length and weight. Data enters through two pure
//! mappings: message count -> burst size, late-reply rate -> color
//! saturation. All randomness is drawn from a caller-supplied [`rand::Rng`].

use std::f64::consts::TAU;

use kurbo::Point;

use crate::{color::Color, surface::Surface};

/// Golden angle in radians; successive seeds rotate by this amount.
pub const GOLDEN_ANGLE: f64 = 2.3999632297286535;

const STAR_PRIMARY_RAYS: usize = 40;
const STAR_SECONDARY_RAYS: usize = 2;

/// Linear interpolation from `[in_start, in_end]` to `[out_start, out_end]`.
/// Not clamped: values outside the input domain extrapolate.
pub fn map_range(value: f64, in_start: f64, in_end: f64, out_start: f64, out_end: f64) -> f64 {
    out_start + (value - in_start) / (in_end - in_start) * (out_end - out_start)
}

/// Burst pixel size for a raw message count, clamped to [100, 270].
pub fn size_for_messages(count: f64) -> f64 {
    map_range(count, 100.0, 1500.0, 100.0, 270.0).clamp(100.0, 270.0)
}

/// Saturation scale in [0, 0.9] for a late-reply rate (0.01 = 1%).
/// Lower late-reply means a more saturated, vivid burst.
pub fn saturation_factor(late_reply_rate: f64) -> f64 {
    let late_pct = late_reply_rate * 100.0;
    let late_mapped = map_range(late_pct, 1.0, 5.0, 10.0, 100.0).clamp(10.0, 100.0);
    (100.0 - late_mapped) / 100.0
}

/// Uniform draw over `[lo, hi)`; a degenerate span yields `lo`.
pub(crate) fn uniform<R: rand::Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if !(hi > lo) {
        return lo;
    }
    rng.gen_range(lo..hi)
}

/// Draw one firework burst centered on `center`.
pub fn draw_burst<R: rand::Rng + ?Sized>(
    surface: &mut Surface,
    rng: &mut R,
    center: Point,
    size: f64,
    late_reply_rate: f64,
) {
    let scale = size / 100.0;
    let outer_count = segment_count(map_range(size, 32.0, 250.0, 200.0, 600.0));
    let center_count = segment_count(map_range(size, 32.0, 250.0, 50.0, 200.0));

    let draw_radius = size * 0.85;
    let gap = size * 0.05;
    let center_radius = size * 0.15;

    let color = burst_color(late_reply_rate);

    for i in 0..outer_count {
        let angle = i as f64 * GOLDEN_ANGLE;
        let r = (i as f64 / outer_count as f64).sqrt();

        let jitter = uniform(rng, 0.0, gap);
        let reach = (draw_radius - gap - jitter) * r;
        let tip = point_on(center, angle, reach);

        // Pull the tail a random fraction of the way back toward center.
        let pull = uniform(rng, 0.0, 0.2);
        let tail = Point::new(
            (1.0 - pull) * tip.x + pull * center.x,
            (1.0 - pull) * tip.y + pull * center.y,
        );

        let weight = uniform(rng, 1.0, 1.5) * scale;
        surface.line(tip, tail, weight, color);
    }

    for _ in 0..center_count {
        let angle = uniform(rng, 0.0, TAU);
        let dist = uniform(rng, 0.0, center_radius);
        let from = point_on(center, angle, dist);
        let weight = uniform(rng, 1.0, 1.5) * scale;
        surface.line(from, center, weight, color);
    }
}

/// Draw one small star burst in a single color.
pub fn draw_star<R: rand::Rng + ?Sized>(
    surface: &mut Surface,
    rng: &mut R,
    center: Point,
    color: Color,
) {
    for _ in 0..STAR_PRIMARY_RAYS {
        let angle = uniform(rng, 0.0, TAU);
        let radius = uniform(rng, 15.0, 22.0);
        let tip = point_on(center, angle, radius);
        let weight = uniform(rng, 0.0, 2.0);
        surface.line(tip, center, weight, color);

        for _ in 0..STAR_SECONDARY_RAYS {
            let angle = uniform(rng, 0.0, TAU);
            let radius = uniform(rng, 8.0, 15.0);
            let tip = point_on(center, angle, radius);
            let weight = uniform(rng, 1.0, 1.5);
            surface.line(tip, center, weight, color);
        }
    }
}

fn burst_color(late_reply_rate: f64) -> Color {
    Color::hsla(15.0, 85.0 * saturation_factor(late_reply_rate), 60.0, 100.0)
}

fn point_on(center: Point, angle: f64, radius: f64) -> Point {
    Point::new(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}

// Round, never negative. Extrapolation below the domain can go under zero;
// that degrades to an empty ring.
fn segment_count(value: f64) -> usize {
    if !value.is_finite() {
        return 0;
    }
    value.round().max(0.0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn map_range_interpolates_and_extrapolates() {
        assert_eq!(map_range(5.0, 0.0, 10.0, 0.0, 100.0), 50.0);
        assert_eq!(map_range(0.0, 0.0, 10.0, 20.0, 40.0), 20.0);
        // Outside the domain keeps the same slope.
        assert_eq!(map_range(15.0, 0.0, 10.0, 0.0, 100.0), 150.0);
        assert_eq!(map_range(-5.0, 0.0, 10.0, 0.0, 100.0), -50.0);
    }

    #[test]
    fn size_for_messages_hits_fixed_points() {
        assert_eq!(size_for_messages(100.0), 100.0);
        assert_eq!(size_for_messages(800.0), 185.0);
        assert_eq!(size_for_messages(1500.0), 270.0);
    }

    #[test]
    fn size_for_messages_clamps_and_is_monotone() {
        assert_eq!(size_for_messages(0.0), 100.0);
        assert_eq!(size_for_messages(1_000_000.0), 270.0);

        let mut prev = f64::NEG_INFINITY;
        for count in (100..=1500).step_by(25) {
            let size = size_for_messages(count as f64);
            assert!(size >= prev);
            assert!((100.0..=270.0).contains(&size));
            prev = size;
        }
    }

    #[test]
    fn saturation_factor_hits_fixed_points() {
        assert!((saturation_factor(0.01) - 0.9).abs() < 1e-12);
        assert!((saturation_factor(0.03) - 0.45).abs() < 1e-12);
        assert!((saturation_factor(0.05) - 0.0).abs() < 1e-12);
    }

    #[test]
    fn saturation_factor_clamps_and_is_monotone() {
        // Below 1% caps at the most saturated value.
        assert!((saturation_factor(0.0) - 0.9).abs() < 1e-12);
        // Above 5% stays fully washed out.
        assert_eq!(saturation_factor(0.2), 0.0);

        let mut prev = f64::INFINITY;
        for step in 0..=50 {
            let rate = 0.01 + (step as f64) * (0.04 / 50.0);
            let factor = saturation_factor(rate);
            assert!(factor <= prev);
            assert!((0.0..=0.9).contains(&factor));
            prev = factor;
        }
    }

    #[test]
    fn uniform_degenerate_span_returns_lower_bound() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(uniform(&mut rng, 5.0, 5.0), 5.0);
        assert_eq!(uniform(&mut rng, 5.0, 3.0), 5.0);
    }

    #[test]
    fn uniform_stays_in_half_open_range() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..1000 {
            let v = uniform(&mut rng, -2.0, 7.0);
            assert!((-2.0..7.0).contains(&v));
        }
    }

    #[test]
    fn burst_draws_pixels_for_normal_size() {
        let mut surface = Surface::new(200, 200).unwrap();
        surface.fill(Color::rgb8(0, 0, 0));
        let mut rng = StdRng::seed_from_u64(7);
        draw_burst(
            &mut surface,
            &mut rng,
            Point::new(100.0, 100.0),
            100.0,
            0.01,
        );
        let raster = surface.finish();
        let touched = raster
            .data()
            .chunks_exact(4)
            .filter(|px| px[0] != 0 || px[1] != 0 || px[2] != 0)
            .count();
        assert!(touched > 100);
    }

    #[test]
    fn burst_with_non_positive_size_degrades_to_nothing() {
        for size in [0.0, -50.0] {
            let mut surface = Surface::new(64, 64).unwrap();
            surface.fill(Color::rgb8(0, 0, 0));
            let mut rng = StdRng::seed_from_u64(3);
            draw_burst(&mut surface, &mut rng, Point::new(32.0, 32.0), size, 0.02);
            let raster = surface.finish();
            // Scale <= 0 kills every stroke weight, so the canvas is untouched.
            assert!(raster.data().chunks_exact(4).all(|px| px == [0, 0, 0, 255]));
        }
    }

    #[test]
    fn star_draws_near_its_center_only() {
        let mut surface = Surface::new(100, 100).unwrap();
        surface.fill(Color::rgb8(0, 0, 0));
        let mut rng = StdRng::seed_from_u64(11);
        draw_star(
            &mut surface,
            &mut rng,
            Point::new(50.0, 50.0),
            Color::rgb8(219, 186, 83),
        );
        let raster = surface.finish();

        let data = raster.data();
        let mut far_touched = false;
        for y in 0..100u32 {
            for x in 0..100u32 {
                let i = ((y * 100 + x) * 4) as usize;
                let lit = data[i] != 0 || data[i + 1] != 0 || data[i + 2] != 0;
                let dx = x as f64 - 50.0;
                let dy = y as f64 - 50.0;
                // Max primary ray radius is 22 plus stroke width.
                if lit && (dx * dx + dy * dy).sqrt() > 26.0 {
                    far_touched = true;
                }
            }
        }
        assert!(!far_touched);
    }

    #[test]
    fn seeded_bursts_are_reproducible() {
        let render = |seed: u64| {
            let mut surface = Surface::new(128, 128).unwrap();
            surface.fill(Color::rgb8(0, 0, 0));
            let mut rng = StdRng::seed_from_u64(seed);
            draw_burst(&mut surface, &mut rng, Point::new(64.0, 64.0), 80.0, 0.02);
            surface.finish().data().to_vec()
        };
        assert_eq!(render(42), render(42));
        assert_ne!(render(42), render(43));
    }
}
