//! Race result page.
//!
//! One page per race: a heading naming the venue, a race-info panel, the
//! finishing-order grid, sometimes an incident report table and a pedigree
//! panel for the winner. Tables are routed by their own text: incident and
//! pedigree tables get dedicated walkers, everything else goes through the
//! generic extractor.

use serde::Serialize;

use crate::dom::{self, Document, Selection};
use crate::error::Result;
use crate::fields::{FieldId, FieldMap};
use crate::freetext;
use crate::patterns::{CLASS_PHRASE, DISTANCE_METERS, RACE_TIME};
use crate::table::{extract_table, RecordRow, TableExtraction};
use crate::url_utils::{entity_ids_from_href, query_param};
use crate::{encoding, pages};

/// One row of the stewards' incident report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IncidentReport {
    pub position: Option<String>,
    pub horse_number: Option<String>,
    pub horse_id: Option<String>,
    pub horse_name: Option<String>,
    pub description: String,
}

/// Winner pedigree panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Pedigree {
    pub horse_id: Option<String>,
    pub horse_name: Option<String>,
    pub sire: Option<String>,
    pub dam: Option<String>,
}

impl Pedigree {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sire.is_none() && self.dam.is_none() && self.horse_name.is_none()
    }
}

/// Everything extracted from one race result page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RaceResultPage {
    /// Race identity from the page URL, when the caller supplied one.
    pub race_date: Option<String>,
    pub racecourse: Option<String>,
    pub race_no: Option<String>,
    pub source_url: Option<String>,
    /// Race-level attributes: distance, class, going, prize, start time.
    pub race_info: FieldMap,
    /// Starter grids other than the finishing order (entries, declarations).
    pub horses: Vec<RecordRow>,
    /// The finishing-order grid, one row per runner.
    pub finishing_order: Vec<RecordRow>,
    pub incident_reports: Vec<IncidentReport>,
    pub pedigree: Pedigree,
}

/// Parse a race result page.
pub fn parse_race_result_page(html: &str) -> Result<RaceResultPage> {
    let doc = pages::parse_document(html)?;
    Ok(extract(&doc, None))
}

/// Parse a race result page, taking the race identity from the source URL
/// (`RaceDate`, `Racecourse`, `RaceNo`).
pub fn parse_race_result_page_with_url(html: &str, url: &str) -> Result<RaceResultPage> {
    let doc = pages::parse_document(html)?;
    let mut page = extract(&doc, Some(url));
    page.race_date = query_param(url, "RaceDate").or_else(|| query_param(url, "racedate"));
    page.race_no = query_param(url, "RaceNo").or_else(|| query_param(url, "raceno"));
    if let Some(course) = query_param(url, "Racecourse").or_else(|| query_param(url, "racecourse"))
    {
        page.racecourse = Some(course);
    }
    Ok(page)
}

/// Parse a race result page from raw bytes with charset detection.
pub fn parse_race_result_page_bytes(html: &[u8]) -> Result<RaceResultPage> {
    parse_race_result_page(&encoding::transcode_to_utf8(html))
}

/// Table-routing keywords. Checked against the table's own text.
const INCIDENT_KEYWORDS: &[&str] = &["競賽事件報告", "竞赛事件报告", "Incident Report"];
const PEDIGREE_KEYWORDS: &[&str] = &["血統", "血统", "Pedigree", "父系"];
const FINISH_KEYWORDS: &[&str] = &["完成時間", "完成时间", "Finish Time"];

/// Venue names as they appear in page headings.
const VENUE_NAMES: &[&str] = &["沙田", "跑馬地", "跑马地"];

fn extract(doc: &Document, url: Option<&str>) -> RaceResultPage {
    let mut page = RaceResultPage {
        source_url: url.map(str::to_string),
        ..RaceResultPage::default()
    };

    page.racecourse = venue_from_headings(doc);

    for table in dom::each(&doc.select("table")) {
        let table_text = dom::text_content(&table);

        if INCIDENT_KEYWORDS.iter().any(|k| table_text.contains(k)) {
            page.incident_reports.extend(extract_incidents(&table));
            continue;
        }
        if page.pedigree.is_empty() && PEDIGREE_KEYWORDS.iter().any(|k| table_text.contains(k)) {
            if let Some(pedigree) = extract_pedigree(&table) {
                page.pedigree = pedigree;
                continue;
            }
        }

        match extract_table(&table) {
            TableExtraction::KeyValues(map) => page.race_info.merge_absent(&map),
            TableExtraction::Records(rows) => {
                if FINISH_KEYWORDS.iter().any(|k| table_text.contains(k)) {
                    page.finishing_order.extend(rows);
                } else {
                    page.horses.extend(rows);
                }
            }
            TableExtraction::Empty => {}
        }
    }

    enrich_race_info(&dom::page_text(doc), &mut page.race_info);

    if cfg!(debug_assertions) {
        eprintln!(
            "DEBUG: result page: {} info fields, {} runners, {} incidents",
            page.race_info.len(),
            page.finishing_order.len(),
            page.incident_reports.len()
        );
    }

    page
}

/// Venue from the first heading that names a racecourse. Heading text like
/// `第一場賽事 : 沙田` keeps only the part after the colon's venue mention.
fn venue_from_headings(doc: &Document) -> Option<String> {
    for heading in dom::each(&doc.select("h1, h2, h3, h4, h5, h6, caption")) {
        let text = dom::trimmed_text(&heading);
        if let Some(venue) = VENUE_NAMES.iter().find(|v| text.contains(*v)) {
            return Some((*venue).to_string());
        }
    }
    None
}

/// Race facts that live in page prose rather than a table: distance in
/// meters, class phrase, and the advertised start time. First-valid-wins
/// against whatever the tables already supplied.
fn enrich_race_info(page_text: &str, info: &mut FieldMap) {
    if let Some(caps) = DISTANCE_METERS.captures(page_text) {
        info.set_if_absent("distance_meters", &caps[1]);
    }
    if let Some(m) = CLASS_PHRASE.find(page_text) {
        info.set_if_absent(FieldId::RaceClass.as_str(), m.as_str());
    }
    if let Some(m) = RACE_TIME.find(page_text) {
        info.set_if_absent(FieldId::RaceTime.as_str(), m.as_str());
    }
}

/// Incident rows: position, horse number, the horse link, and the incident
/// description in the last cell. Header-ish and descriptionless rows are
/// skipped.
fn extract_incidents(table: &Selection) -> Vec<IncidentReport> {
    let mut incidents = Vec::new();

    for row in dom::each(&table.select("tr")) {
        let cells = dom::each(&row.select("td, th"));
        if cells.len() < 3 {
            continue;
        }

        let first = dom::trimmed_text(&cells[0]);
        let second = dom::trimmed_text(&cells[1]);
        // Data rows lead with the finishing position as a number.
        if first.is_empty() || !first.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }

        let Some(last) = cells.last() else {
            continue;
        };
        let description = dom::trimmed_text(last);
        if description.is_empty() {
            continue;
        }

        let mut incident = IncidentReport {
            position: Some(first),
            horse_number: second
                .chars()
                .all(|c| c.is_ascii_digit())
                .then_some(second)
                .filter(|s| !s.is_empty()),
            description,
            ..IncidentReport::default()
        };

        for anchor in dom::each(&row.select("a[href]")) {
            let Some(href) = dom::get_attribute(&anchor, "href") else {
                continue;
            };
            for (key, id) in entity_ids_from_href(&href) {
                if key == "horse_id" && incident.horse_id.is_none() {
                    incident.horse_id = Some(id);
                    let name = dom::trimmed_text(&anchor);
                    if !name.is_empty() {
                        incident.horse_name = Some(name);
                    }
                }
            }
        }

        incidents.push(incident);
    }

    incidents
}

/// Pedigree panel: labelled sire/dam lines with a sibling-cell fallback, and
/// the horse link when the panel carries one.
fn extract_pedigree(table: &Selection) -> Option<Pedigree> {
    let text = dom::text_content(&table);
    let cell_texts: Vec<String> = dom::each(&table.select("td, th"))
        .iter()
        .map(dom::trimmed_text)
        .collect();

    let mut pedigree = Pedigree {
        sire: freetext::extract_labeled(&text, "父系")
            .or_else(|| freetext::extract_labeled(&text, "Sire")),
        dam: freetext::extract_labeled(&text, "母系")
            .or_else(|| freetext::extract_labeled(&text, "Dam")),
        ..Pedigree::default()
    };
    if pedigree.sire.is_none() && pedigree.dam.is_none() {
        pedigree.sire = freetext::first_sibling_value(&cell_texts, "父系");
    }

    for anchor in dom::each(&table.select("a[href]")) {
        let Some(href) = dom::get_attribute(&anchor, "href") else {
            continue;
        };
        for (key, id) in entity_ids_from_href(&href) {
            if key == "horse_id" {
                pedigree.horse_id = Some(id);
                let name = dom::trimmed_text(&anchor);
                if !name.is_empty() {
                    pedigree.horse_name = Some(name);
                }
            }
        }
        if pedigree.horse_id.is_some() {
            break;
        }
    }

    (!pedigree.is_empty()).then_some(pedigree)
}
