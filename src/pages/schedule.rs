//! Race schedule (fixture) page.
//!
//! The fixture page is a month grid: a year/month caption row, a weekday
//! header, then one cell per day. Race days carry venue/session/track
//! icons and inline per-race tokens; the rest are bare day numbers. The
//! page also carries a legend block and free-text notices.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::calendar::{parse_cell, CalendarDay};
use crate::dom::{self, Document};
use crate::error::Result;
use crate::freetext;
use crate::numerals::year_to_number;
use crate::patterns::{CHINESE_MONTH, YEAR_TEXT};
use crate::{encoding, pages};

/// A calendar grid row needs at least this many cells (one per weekday).
const MIN_GRID_CELLS: usize = 7;

/// Legend of the symbols the grid uses, as found on this page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScheduleLegend {
    pub venues: BTreeSet<String>,
    pub race_types: BTreeSet<String>,
    pub track_types: BTreeSet<String>,
    pub race_classes: BTreeSet<String>,
    /// Single-letter mark → its meaning.
    pub special_marks: BTreeMap<String, String>,
}

/// Everything extracted from one fixture page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchedulePage {
    pub source_url: Option<String>,
    /// Month names seen on the page, first-seen order.
    pub months: Vec<String>,
    pub race_days: Vec<CalendarDay>,
    pub legend: ScheduleLegend,
    pub notices: Vec<String>,
}

/// Parse a fixture page.
pub fn parse_schedule_page(html: &str) -> Result<SchedulePage> {
    let doc = pages::parse_document(html)?;
    Ok(extract(&doc, None))
}

/// Parse a fixture page, recording its source URL.
pub fn parse_schedule_page_with_url(html: &str, url: &str) -> Result<SchedulePage> {
    let doc = pages::parse_document(html)?;
    Ok(extract(&doc, Some(url)))
}

/// Parse a fixture page from raw bytes with charset detection.
pub fn parse_schedule_page_bytes(html: &[u8]) -> Result<SchedulePage> {
    parse_schedule_page(&encoding::transcode_to_utf8(html))
}

/// Race days of one month.
#[must_use]
pub fn race_days_by_month<'a>(days: &'a [CalendarDay], month: &str) -> Vec<&'a CalendarDay> {
    days.iter()
        .filter(|d| d.month.as_deref() == Some(month))
        .collect()
}

/// Race days run at one venue.
#[must_use]
pub fn race_days_by_venue<'a>(days: &'a [CalendarDay], venue: &str) -> Vec<&'a CalendarDay> {
    days.iter().filter(|d| d.venues.contains(venue)).collect()
}

fn extract(doc: &Document, url: Option<&str>) -> SchedulePage {
    let page_text = dom::page_text(doc);
    let page = SchedulePage {
        source_url: url.map(str::to_string),
        months: extract_months(doc),
        race_days: extract_race_days(doc),
        legend: extract_legend(&page_text),
        notices: freetext::notices(&page_text),
    };

    if cfg!(debug_assertions) {
        eprintln!(
            "DEBUG: schedule page: {} months, {} race days, {} notices",
            page.months.len(),
            page.race_days.len(),
            page.notices.len()
        );
    }

    page
}

/// Month names from selectors, captions, and grid headers, deduplicated in
/// first-seen order.
fn extract_months(doc: &Document) -> Vec<String> {
    let mut months = Vec::new();
    for elem in dom::each(&doc.select("option, caption, th, a, span, div")) {
        let text = dom::trimmed_text(&elem);
        if let Some(m) = CHINESE_MONTH.find(&text) {
            let month = m.as_str().to_string();
            if !months.contains(&month) {
                months.push(month);
            }
        }
    }
    months
}

/// Walk every calendar grid, tracking year/month context from caption rows
/// (`二0二六年一月`), and parse each day-numbered cell.
fn extract_race_days(doc: &Document) -> Vec<CalendarDay> {
    let mut race_days = Vec::new();

    for table in dom::each(&doc.select("table")) {
        let rows = dom::each(&table.select("tr"));

        // Not a month grid unless some row is a full week wide.
        let is_grid = rows
            .iter()
            .any(|row| row.select("td, th").nodes().len() >= MIN_GRID_CELLS);
        if !is_grid {
            continue;
        }

        let mut year: Option<String> = None;
        let mut month: Option<String> = None;

        for row in &rows {
            let row_text = dom::trimmed_text(row);

            if let Some(m) = YEAR_TEXT.find(&row_text) {
                if let Some(y) = year_to_number(m.as_str()) {
                    year = Some(y);
                }
            }
            if let Some(m) = CHINESE_MONTH.find(&row_text) {
                month = Some(m.as_str().to_string());
                // Caption row, no day cells.
                continue;
            }

            for cell in dom::each(&row.select("td, th")) {
                let Some(day) = leading_day_number(&dom::trimmed_text(&cell)) else {
                    continue;
                };
                if let Some(race_day) =
                    parse_cell(&cell, day, month.as_deref(), year.as_deref())
                {
                    race_days.push(race_day);
                }
            }
        }
    }

    race_days
}

/// Day number of a cell: its first whitespace-delimited token, when that
/// token is purely numeric and a plausible day of month.
fn leading_day_number(cell_text: &str) -> Option<u32> {
    let token = cell_text.split_whitespace().next()?;
    if !token.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let day: u32 = token.parse().ok()?;
    (1..=31).contains(&day).then_some(day)
}

/// Legend categories recognized in page prose, with script variants.
const LEGEND_VENUES: &[(&str, &[&str])] = &[("跑马地", &["跑馬地", "跑马地"]), ("沙田", &["沙田"])];
const LEGEND_RACE_TYPES: &[(&str, &[&str])] = &[
    ("日赛", &["日賽", "日赛"]),
    ("黄昏赛", &["黄昏賽", "黄昏赛"]),
    ("夜赛", &["夜賽", "夜赛"]),
];
const LEGEND_TRACK_TYPES: &[(&str, &[&str])] = &[
    ("草地", &["草地"]),
    ("混合赛道", &["混合賽道", "混合赛道"]),
    ("全天候跑道", &["全天候"]),
];
const LEGEND_RACE_CLASSES: &[(&str, &[&str])] = &[
    ("一级赛", &["一級賽", "一级赛"]),
    ("二级赛", &["二級賽", "二级赛"]),
    ("三级赛", &["三級賽", "三级赛"]),
    ("四岁", &["四歲", "四岁"]),
];
const LEGEND_SPECIAL_MARKS: &[(&str, &str)] = &[
    ("C", "盃賽"),
    ("P", "獲得優先出賽權"),
    ("S", "特別參賽條件"),
];

fn collect_present(page_text: &str, table: &[(&str, &[&str])]) -> BTreeSet<String> {
    table
        .iter()
        .filter(|(_, variants)| variants.iter().any(|v| page_text.contains(v)))
        .map(|(canonical, _)| (*canonical).to_string())
        .collect()
}

fn extract_legend(page_text: &str) -> ScheduleLegend {
    let special_marks = LEGEND_SPECIAL_MARKS
        .iter()
        .filter(|(mark, meaning)| page_text.contains(mark) || page_text.contains(meaning))
        .map(|(mark, meaning)| ((*mark).to_string(), (*meaning).to_string()))
        .collect();

    ScheduleLegend {
        venues: collect_present(page_text, LEGEND_VENUES),
        race_types: collect_present(page_text, LEGEND_RACE_TYPES),
        track_types: collect_present(page_text, LEGEND_TRACK_TYPES),
        race_classes: collect_present(page_text, LEGEND_RACE_CLASSES),
        special_marks,
    }
}
