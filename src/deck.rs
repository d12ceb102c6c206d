//! Deck pipeline: weekly rows in, finished card rasters out.

use rand::Rng;
use tracing::warn;

use crate::{
    background::BackgroundCache,
    card::CardComposer,
    data::{self, CardRecord, WeekTable},
    error::EmberdeckResult,
    surface::Raster,
    text::TextEngine,
    theme::Theme,
};

/// One rendered card together with the repaired record behind it.
#[derive(Clone, Debug)]
pub struct DeckCard {
    pub record: CardRecord,
    pub raster: Raster,
}

/// Row accounting for one deck render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeckStats {
    pub rows_total: usize,
    pub cards_rendered: usize,
    pub rows_skipped: usize,
}

/// Render every row of `table` into a card, in table order.
///
/// Rows missing a column outright are skipped with a warning. Bad cell
/// values are repaired to defaults during extraction and still render.
/// The background cache must be initialized before calling this.
#[tracing::instrument(skip_all, fields(rows = table.len()))]
pub fn render_deck<R: Rng + ?Sized>(
    rng: &mut R,
    cache: &BackgroundCache,
    fonts: &mut TextEngine,
    theme: &Theme,
    table: &WeekTable,
) -> EmberdeckResult<(Vec<DeckCard>, DeckStats)> {
    let mut stats = DeckStats {
        rows_total: table.len(),
        ..DeckStats::default()
    };
    let mut cards = Vec::with_capacity(table.len());
    let mut composer = CardComposer::new(cache, fonts, theme);

    for (index, row) in table.rows().enumerate() {
        let record = match data::extract_card_data(row) {
            Ok(record) => record,
            Err(err) => {
                warn!(row = index, %err, "skipping unreadable row");
                stats.rows_skipped += 1;
                continue;
            }
        };
        let raster = composer.create_card(rng, &record)?;
        cards.push(DeckCard { record, raster });
        stats.cards_rendered += 1;
    }

    Ok((cards, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    use crate::theme::StarRegion;

    const HEADER: &str = "content_Her,percent_late_reply_Her,content,percent_late_reply,week";

    fn small_theme() -> Theme {
        let mut theme = Theme::default();
        theme.card.width = 120;
        theme.card.height = 180;
        theme.texture.grain_strokes = 150;
        theme.texture.overscan = 40.0;
        theme.background_pool = 2;
        theme.star_region = StarRegion {
            x_min: 20.0,
            x_max: 100.0,
            y_min: 30.0,
            y_max: 120.0,
        };
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

    fn table(lines: &[&str]) -> WeekTable {
        let mut src = String::from(HEADER);
        for line in lines {
            src.push('\n');
            src.push_str(line);
        }
        WeekTable::from_reader(src.as_bytes()).unwrap()
    }

    fn cache(theme: &Theme, seed: u64) -> BackgroundCache {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut cache = BackgroundCache::new();
        cache.initialize(&mut rng, theme).unwrap();
        cache
    }

    #[test]
    fn renders_one_card_per_row() {
        let theme = small_theme();
        let cache = cache(&theme, 1);
        let mut fonts = engine();
        let table = table(&["64,0.01,89,0.02,1", "640,0.03,890,0.04,2"]);

        let mut rng = StdRng::seed_from_u64(2);
        let (cards, stats) = render_deck(&mut rng, &cache, &mut fonts, &theme, &table).unwrap();

        assert_eq!(cards.len(), 2);
        assert_eq!(
            stats,
            DeckStats {
                rows_total: 2,
                cards_rendered: 2,
                rows_skipped: 0,
            }
        );
        assert_eq!(cards[0].record.week, "1");
        assert_eq!(cards[1].record.week, "2");
        assert_eq!(cards[0].raster.width(), theme.card.width);
        assert_eq!(cards[0].raster.height(), theme.card.height);
    }

    #[test]
    fn short_rows_are_skipped_not_fatal() {
        let theme = small_theme();
        let cache = cache(&theme, 1);
        let mut fonts = engine();
        let table = table(&["64,0.01,89,0.02,1", "10,0.01,20", "640,0.03,890,0.04,3"]);

        let mut rng = StdRng::seed_from_u64(2);
        let (cards, stats) = render_deck(&mut rng, &cache, &mut fonts, &theme, &table).unwrap();

        assert_eq!(cards.len(), 2);
        assert_eq!(stats.rows_skipped, 1);
        let weeks: Vec<&str> = cards.iter().map(|c| c.record.week.as_str()).collect();
        assert_eq!(weeks, ["1", "3"]);
    }

    #[test]
    fn bad_cells_are_repaired_and_still_render() {
        let theme = small_theme();
        let cache = cache(&theme, 1);
        let mut fonts = engine();
        let table = table(&["NaN,0.02,500,bad,3"]);

        let mut rng = StdRng::seed_from_u64(2);
        let (cards, stats) = render_deck(&mut rng, &cache, &mut fonts, &theme, &table).unwrap();

        assert_eq!(stats.rows_skipped, 0);
        assert_eq!(cards[0].record.content_her, 0.0);
        assert_eq!(cards[0].record.content, 500.0);
    }

    #[test]
    fn cards_debug_print_their_week() {
        let theme = small_theme();
        let cache = cache(&theme, 1);
        let mut fonts = engine();
        let table = table(&["64,0.01,89,0.02,7"]);

        let mut rng = StdRng::seed_from_u64(2);
        let (cards, _) = render_deck(&mut rng, &cache, &mut fonts, &theme, &table).unwrap();

        let repr = format!("{:?}", cards[0]);
        assert!(repr.contains("DeckCard"));
        assert!(repr.contains("week: \"7\""));
    }

    #[test]
    fn deck_is_deterministic_under_a_seed() {
        let theme = small_theme();
        let cache = cache(&theme, 1);
        let mut fonts = engine();
        let rows = ["64,0.01,89,0.02,1", "640,0.03,890,0.04,2"];

        let render = |seed: u64, fonts: &mut TextEngine| {
            let table = table(&rows);
            let mut rng = StdRng::seed_from_u64(seed);
            let (cards, _) = render_deck(&mut rng, &cache, fonts, &theme, &table).unwrap();
            cards
                .into_iter()
                .map(|c| c.raster.data().to_vec())
                .collect::<Vec<_>>()
        };

        assert_eq!(render(9, &mut fonts), render(9, &mut fonts));
        assert_ne!(render(9, &mut fonts), render(10, &mut fonts));
    }

    #[test]
    fn uninitialized_cache_is_an_error() {
        let theme = small_theme();
        let cache = BackgroundCache::new();
        let mut fonts = engine();
        let table = table(&["64,0.01,89,0.02,1"]);

        let mut rng = StdRng::seed_from_u64(2);
        let err = render_deck(&mut rng, &cache, &mut fonts, &theme, &table).unwrap_err();
        assert!(err.to_string().contains("initialized"));
    }
}
