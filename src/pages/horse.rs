//! Horse information page.
//!
//! One page per horse: a name/code heading, attribute tables in assorted
//! key-value layouts, a form-record grid, and an equipment legend. Every
//! `<table>` goes through the generic extractor; key-value results merge
//! into one attribute map under first-valid-value-wins, record results with
//! a date or venue column are kept as form records.

use serde::Serialize;

use crate::dom::{self, Document};
use crate::error::Result;
use crate::fields::{FieldId, FieldMap};
use crate::freetext;
use crate::patterns::{LABELED_HORSE_NAME, NAME_WITH_CODE};
use crate::table::{extract_table, RecordRow, TableExtraction};
use crate::url_utils::query_param;
use crate::{encoding, pages};

/// Everything extracted from one horse page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HorsePage {
    /// Horse id from the page URL (`horseid=`), when the caller supplied one.
    pub horse_id: Option<String>,
    pub source_url: Option<String>,
    /// Attribute map: canonical fields plus preserved unknown labels.
    pub basic_info: FieldMap,
    /// One row per past race.
    pub race_records: Vec<RecordRow>,
    /// Equipment code → bilingual description.
    pub equipment_legend: FieldMap,
}

/// Parse a horse information page.
pub fn parse_horse_page(html: &str) -> Result<HorsePage> {
    let doc = pages::parse_document(html)?;
    Ok(extract(&doc, None))
}

/// Parse a horse page, taking the horse id from the source URL.
pub fn parse_horse_page_with_url(html: &str, url: &str) -> Result<HorsePage> {
    let doc = pages::parse_document(html)?;
    let mut page = extract(&doc, Some(url));
    page.horse_id = query_param(url, "horseid");
    Ok(page)
}

/// Parse a horse page from raw bytes with charset detection.
pub fn parse_horse_page_bytes(html: &[u8]) -> Result<HorsePage> {
    parse_horse_page(&encoding::transcode_to_utf8(html))
}

fn extract(doc: &Document, url: Option<&str>) -> HorsePage {
    let mut page = HorsePage {
        source_url: url.map(str::to_string),
        ..HorsePage::default()
    };

    extract_name_and_code(doc, &mut page.basic_info);

    for table in dom::each(&doc.select("table")) {
        match extract_table(&table) {
            TableExtraction::KeyValues(map) => page.basic_info.merge_absent(&map),
            TableExtraction::Records(rows) => {
                // Form records always carry a date or venue column; other
                // record grids on the page (e.g. entries) are not form.
                page.race_records.extend(
                    rows.into_iter()
                        .filter(|r| r.get_field(FieldId::Date).is_some()
                            || r.get_field(FieldId::Venue).is_some()),
                );
            }
            TableExtraction::Empty => {}
        }
    }

    page.equipment_legend = freetext::equipment_legend(doc);

    if cfg!(debug_assertions) {
        eprintln!(
            "DEBUG: horse page: {} attributes, {} form records, {} legend entries",
            page.basic_info.len(),
            page.race_records.len(),
            page.equipment_legend.len()
        );
    }

    page
}

/// Horse name and brand code from headings, e.g. `遨遊氣泡 (E436)`, with a
/// page-text fallback for the `馬名: …` labelled form.
fn extract_name_and_code(doc: &Document, info: &mut FieldMap) {
    for heading in dom::each(&doc.select("h1, h2, h3, h4, h5, h6")) {
        let text = dom::trimmed_text(&heading);
        if let Some(caps) = NAME_WITH_CODE.captures(&text) {
            info.set_if_absent(FieldId::HorseName.as_str(), caps[1].trim());
            info.set_if_absent(FieldId::HorseCode.as_str(), &caps[2]);
            return;
        }
    }

    let page_text = dom::page_text(doc);
    if let Some(caps) = NAME_WITH_CODE.captures(&page_text) {
        info.set_if_absent(FieldId::HorseName.as_str(), caps[1].trim());
        info.set_if_absent(FieldId::HorseCode.as_str(), &caps[2]);
    } else if let Some(caps) = LABELED_HORSE_NAME.captures(&page_text) {
        info.set_if_absent(FieldId::HorseName.as_str(), caps[1].trim());
    }
}
