//! Page-level assembly.
//!
//! Each submodule walks one page layout, feeds candidate tables and cells to
//! the extraction engine, and assembles the typed page result the caller
//! serializes. Fetching the HTML is the caller's job; everything here is
//! pure computation over an already-parsed document.

pub mod horse;
pub mod result;
pub mod schedule;

pub use horse::{parse_horse_page, parse_horse_page_bytes, parse_horse_page_with_url, HorsePage};
pub use result::{
    parse_race_result_page, parse_race_result_page_bytes, parse_race_result_page_with_url,
    IncidentReport, Pedigree, RaceResultPage,
};
pub use schedule::{
    parse_schedule_page, parse_schedule_page_bytes, parse_schedule_page_with_url, race_days_by_month,
    race_days_by_venue, ScheduleLegend, SchedulePage,
};

use crate::dom::Document;
use crate::error::{Error, Result};

/// Parse raw HTML, rejecting blank input loudly. Malformed markup is fine;
/// an empty document is a caller bug.
pub(crate) fn parse_document(html: &str) -> Result<Document> {
    if html.trim().is_empty() {
        return Err(Error::EmptyDocument);
    }
    Ok(Document::from(html))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_input_fails_fast() {
        assert!(matches!(parse_document(""), Err(Error::EmptyDocument)));
        assert!(matches!(parse_document("  \n\t "), Err(Error::EmptyDocument)));
    }

    #[test]
    fn malformed_markup_still_parses() {
        assert!(parse_document("<table><tr><td>open").is_ok());
    }
}
