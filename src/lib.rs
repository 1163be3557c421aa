//! # hkjc-extract
//!
//! Heuristic extraction engine for Hong Kong racing pages.
//!
//! This library turns messy bilingual racing HTML (horse profiles, fixture
//! calendars, race results) into structured records by classifying tables,
//! resolving bilingual field labels to canonical names, and parsing the
//! composite calendar cells the fixture grid packs a whole race day into.
//!
//! ## Quick Start
//!
//! ```rust
//! use hkjc_extract::{parse_horse_page, FieldId};
//!
//! let html = r#"<html><body>
//! <h1>遨遊氣泡 (E436)</h1>
//! <table>
//! <tr><td>馬主</td><td>:</td><td>陳大文</td></tr>
//! <tr><td>現時評分</td><td>:</td><td>82</td></tr>
//! </table>
//! </body></html>"#;
//!
//! let page = parse_horse_page(html)?;
//! assert_eq!(page.basic_info.get_field(FieldId::HorseName), Some("遨遊氣泡"));
//! assert_eq!(page.basic_info.get("owner"), Some("陳大文"));
//! # Ok::<(), hkjc_extract::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Table Classification**: Horizontal and vertical key-value panels and
//!   record grids, detected per table from the markup itself
//! - **Bilingual Field Resolution**: Traditional/simplified Chinese and
//!   English labels mapped to one canonical vocabulary
//! - **Calendar Parsing**: Fixture-grid cells decomposed into per-race
//!   entries with venue, session, track, and grade tags
//! - **Tolerant By Construction**: Malformed markup degrades to partial
//!   output, never an error
//!
//! Extraction never fetches anything; callers hand in HTML (or raw bytes,
//! which go through charset detection) and get typed results back.

mod error;
mod patterns;

/// DOM operations adapter over `dom_query`.
pub mod dom;

/// Chinese numeral and month-name conversion.
pub mod numerals;

/// Canonical field resolution and the first-valid-wins field map.
pub mod fields;

/// Compound label/value splitting (`父系 / 母系` rows).
pub mod compound;

/// Generic table classification and extraction.
pub mod table;

/// Calendar cell parsing for the fixture grid.
pub mod calendar;

/// Free-text fact extraction (pedigree lines, legends, notices).
pub mod freetext;

/// URL utilities for entity ids and page-identity query parameters.
pub mod url_utils;

/// Character encoding detection and transcoding.
pub mod encoding;

/// Page-level assembly for the three supported page layouts.
pub mod pages;

/// JSON and CSV rendering of extraction results.
pub mod export;

// Public API - re-exports
pub use calendar::{parse_cell, CalendarDay, RaceEntry};
pub use error::{Error, Result};
pub use fields::{FieldId, FieldMap};
pub use pages::{
    parse_horse_page, parse_horse_page_bytes, parse_horse_page_with_url, parse_race_result_page,
    parse_race_result_page_bytes, parse_race_result_page_with_url, parse_schedule_page,
    parse_schedule_page_bytes, parse_schedule_page_with_url, HorsePage, IncidentReport, Pedigree,
    RaceResultPage, ScheduleLegend, SchedulePage,
};
pub use table::{extract_table, RecordRow, TableExtraction};
