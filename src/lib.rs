//! Emberdeck turns weekly chat statistics into printable firework cards.
//!
//! Each row of a CSV table becomes one 450x750 card: a textured paper
//! background, the week label, and either two message bursts (her week on
//! top, his below) or a scatter of stars when the week stayed under 200
//! messages. A separate legend image explains the encoding.
//!
//! # Pipeline overview
//!
//! 1. **Load**: read the week table ([`WeekTable`]) and the theme ([`Theme`])
//! 2. **Warm up**: pre-render the shared background pool ([`BackgroundCache`])
//! 3. **Render**: one raster per row ([`render_deck`]), plus [`create_guide`]
//! 4. **Write**: PNG encoding happens in the binary, not here
//!
//! Rendering is CPU-only and deterministic for a given seed: every random
//! decision draws from the caller's [`rand::Rng`].
#![forbid(unsafe_code)]

pub mod background;
pub mod card;
pub mod color;
pub mod data;
pub mod deck;
pub mod error;
pub mod guide;
pub mod pattern;
pub mod surface;
pub mod text;
pub mod texture;
pub mod theme;

pub use background::BackgroundCache;
pub use card::{CardComposer, PatternKind, choose_pattern, star_count_for};
pub use color::Color;
pub use data::{CardRecord, WeekTable, extract_card_data};
pub use deck::{DeckCard, DeckStats, render_deck};
pub use error::{EmberdeckError, EmberdeckResult};
pub use guide::create_guide;
pub use pattern::{draw_burst, draw_star, saturation_factor, size_for_messages};
pub use surface::{Raster, Surface};
pub use text::TextEngine;
pub use theme::Theme;
