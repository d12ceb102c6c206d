//! Weekly chat-statistics table and per-row validation.
//!
//! The table is a headered CSV with one row per week. Field values are
//! repaired individually: an unparsable or non-finite number falls back to
//! its documented default with a warning, so a single bad cell never costs
//! the whole card. A row that is missing a column outright is an error and
//! gets skipped upstream.

use std::path::Path;

use anyhow::Context as _;
use tracing::warn;

use crate::error::{EmberdeckError, EmberdeckResult};

pub const COL_CONTENT_HER: &str = "content_Her";
pub const COL_LATE_REPLY_HER: &str = "percent_late_reply_Her";
pub const COL_CONTENT: &str = "content";
pub const COL_LATE_REPLY: &str = "percent_late_reply";
pub const COL_WEEK: &str = "week";

/// One validated week of chat statistics, ready to render.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CardRecord {
    /// Messages she sent this week.
    pub content_her: f64,
    /// Fraction of her replies that were late (0.01 = 1%).
    pub late_reply_her: f64,
    /// Messages I sent this week.
    pub content: f64,
    /// Fraction of my replies that were late.
    pub late_reply: f64,
    /// Week label, printed on the card.
    pub week: String,
}

/// Ordered weekly rows loaded from a headered CSV source.
pub struct WeekTable {
    headers: Vec<String>,
    records: Vec<csv::StringRecord>,
}

impl WeekTable {
    pub fn load(path: &Path) -> EmberdeckResult<Self> {
        let reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("opening week table {}", path.display()))?;
        Self::from_csv_reader(reader)
    }

    pub fn from_reader<R: std::io::Read>(rdr: R) -> EmberdeckResult<Self> {
        let reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);
        Self::from_csv_reader(reader)
    }

    fn from_csv_reader<R: std::io::Read>(mut reader: csv::Reader<R>) -> EmberdeckResult<Self> {
        let headers = reader
            .headers()
            .map_err(|e| EmberdeckError::data(format!("reading csv header: {e}")))?
            .iter()
            .map(str::to_owned)
            .collect();

        let mut records = Vec::new();
        for record in reader.records() {
            let record =
                record.map_err(|e| EmberdeckError::data(format!("reading csv record: {e}")))?;
            records.push(record);
        }

        Ok(Self { headers, records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.records.iter().map(move |record| Row {
            headers: &self.headers,
            record,
        })
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.records.get(index).map(|record| Row {
            headers: &self.headers,
            record,
        })
    }
}

/// Borrowed view of one table row with named-field lookup.
#[derive(Clone, Copy)]
pub struct Row<'a> {
    headers: &'a [String],
    record: &'a csv::StringRecord,
}

impl<'a> Row<'a> {
    pub fn get(&self, name: &str) -> Option<&'a str> {
        let index = self.headers.iter().position(|h| h == name)?;
        self.record.get(index)
    }
}

/// Validate one row into a [`CardRecord`], repairing bad fields in place.
pub fn extract_card_data(row: Row<'_>) -> EmberdeckResult<CardRecord> {
    let content_her = numeric_field(row, COL_CONTENT_HER, 0.0)?;
    let late_reply_her = numeric_field(row, COL_LATE_REPLY_HER, 0.0)?;
    let content = numeric_field(row, COL_CONTENT, 0.0)?;
    let late_reply = numeric_field(row, COL_LATE_REPLY, 0.0)?;
    let week = text_field(row, COL_WEEK, "0")?;

    Ok(CardRecord {
        content_her,
        late_reply_her,
        content,
        late_reply,
        week,
    })
}

fn numeric_field(row: Row<'_>, name: &str, default: f64) -> EmberdeckResult<f64> {
    let raw = row
        .get(name)
        .ok_or_else(|| EmberdeckError::data(format!("row is missing column '{name}'")))?;

    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => {
            warn!(
                column = name,
                value = raw,
                "invalid numeric field, using default"
            );
            Ok(default)
        }
    }
}

fn text_field(row: Row<'_>, name: &str, default: &str) -> EmberdeckResult<String> {
    let raw = row
        .get(name)
        .ok_or_else(|| EmberdeckError::data(format!("row is missing column '{name}'")))?;

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        warn!(column = name, "empty text field, using default");
        return Ok(default.to_owned());
    }
    Ok(trimmed.to_owned())
}
