#![forbid(unsafe_code)]

//! Label markup front end (headless).
//!
//! Pipeline: markup → [`parse_markup`] → native [`RawRecord`]s → [`decode`] →
//! [`iter_segments`] → [`compact`] → ordered [`StyleRun`]s over the plain text.

pub mod error;
pub mod iter;
pub mod markup;
pub mod record;
pub mod runs;
pub mod style;

pub use error::{Error, Result};
pub use iter::{AttrSegment, iter_segments};
pub use markup::{ParsedMarkup, UNITS_PER_POINT, parse_markup};
pub use record::{AttrKind, AttrValue, AttributeRecord, RawRecord, decode, decode_all};
pub use runs::compact;
pub use style::{Slant, StyleAttribute, StyleRun, StyleState};

use serde::Serialize;

/// Plain text plus the style runs that reproduce its formatting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledText {
    pub text: String,
    pub records: Vec<AttributeRecord>,
    pub runs: Vec<StyleRun>,
}

/// Runs the text and native records of an already parsed label through decoding and
/// compaction.
pub fn style_runs(text: String, raw: &[RawRecord]) -> StyledText {
    let records = decode_all(raw);
    let segments = iter_segments(&records, text.len());
    let runs = compact(&segments);
    StyledText {
        text,
        records,
        runs,
    }
}

pub fn parse_styled(markup: &str) -> Result<StyledText> {
    let ParsedMarkup { text, records } = parse_markup(markup)?;
    Ok(style_runs(text, &records))
}

#[cfg(test)]
mod tests;
