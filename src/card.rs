//! Card composition: labeled background, branch rule, pattern placement.
//!
//! A card is one week's statistics rendered onto a cached background. Weeks
//! with a combined message count under 200 get a loose cluster of stars;
//! busier weeks get two fireworks, hers toward the top-left and his toward
//! the bottom-right. The branch rule and star count live here as pure
//! functions so the thresholds stay testable without rendering anything.

use kurbo::Point;
use rand::seq::SliceRandom as _;

use crate::{
    background::BackgroundCache,
    data::CardRecord,
    error::{EmberdeckError, EmberdeckResult},
    pattern::{self, map_range, size_for_messages, uniform},
    surface::{Raster, Surface},
    text::TextEngine,
    theme::Theme,
};

/// Combined message count at which cards switch from stars to bursts.
pub const BURST_THRESHOLD: f64 = 200.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatternKind {
    Stars,
    Bursts,
}

/// Branch rule: below the threshold the week was quiet, draw stars.
pub fn choose_pattern(record: &CardRecord) -> PatternKind {
    if record.content + record.content_her < BURST_THRESHOLD {
        PatternKind::Stars
    } else {
        PatternKind::Bursts
    }
}

/// Star count for a combined message count: interpolate [0,200] -> [1,10],
/// truncate, clamp. Roughly one star per 20 messages.
pub fn star_count_for(total_messages: f64) -> usize {
    let raw = map_range(total_messages, 0.0, BURST_THRESHOLD, 1.0, 10.0);
    raw.floor().clamp(1.0, 10.0) as usize
}

/// Renders finished cards from validated records, borrowing the shared
/// background cache and text engine from the host.
pub struct CardComposer<'a> {
    cache: &'a BackgroundCache,
    fonts: &'a mut TextEngine,
    theme: &'a Theme,
}

impl<'a> CardComposer<'a> {
    pub fn new(cache: &'a BackgroundCache, fonts: &'a mut TextEngine, theme: &'a Theme) -> Self {
        Self {
            cache,
            fonts,
            theme,
        }
    }

    #[tracing::instrument(skip_all, fields(week = %record.week))]
    pub fn create_card<R: rand::Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        record: &CardRecord,
    ) -> EmberdeckResult<Raster> {
        let background = self.cache.pick(rng, self.fonts, self.theme, &record.week)?;

        let mut surface = Surface::new(self.theme.card.width, self.theme.card.height)?;
        surface.blit(&background, Point::ORIGIN);

        match choose_pattern(record) {
            PatternKind::Stars => self.draw_stars(&mut surface, rng, record)?,
            PatternKind::Bursts => self.draw_bursts(&mut surface, rng, record),
        }

        Ok(surface.finish())
    }

    fn draw_stars<R: rand::Rng + ?Sized>(
        &self,
        surface: &mut Surface,
        rng: &mut R,
        record: &CardRecord,
    ) -> EmberdeckResult<()> {
        let count = star_count_for(record.content + record.content_her);
        let region = self.theme.star_region;

        for _ in 0..count {
            let color = *self
                .theme
                .palette
                .stars
                .choose(rng)
                .ok_or_else(|| EmberdeckError::validation("star palette is empty"))?;
            let position = Point::new(
                uniform(rng, region.x_min, region.x_max),
                uniform(rng, region.y_min, region.y_max),
            );
            pattern::draw_star(surface, rng, position, color);
        }
        Ok(())
    }

    fn draw_bursts<R: rand::Rng + ?Sized>(
        &self,
        surface: &mut Surface,
        rng: &mut R,
        record: &CardRecord,
    ) {
        let center = surface.center();
        let upper_size = size_for_messages(record.content_her);
        let lower_size = size_for_messages(record.content);

        // Her burst sits near the top-left, his near the bottom-right; the
        // ratios keep that placement for any card size.
        pattern::draw_burst(
            surface,
            rng,
            Point::new(center.x / 8.0, center.y / 12.0),
            upper_size,
            record.late_reply_her,
        );
        pattern::draw_burst(
            surface,
            rng,
            Point::new(center.x * 1.87, center.y * 1.92),
            lower_size,
            record.late_reply,
        );
    }
}
