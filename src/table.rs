//! Generic table extraction.
//!
//! Source pages use `<table>` for everything: attribute panels, race-record
//! grids, legends, and plain layout. Classification inspects the rows and
//! decides between three layouts:
//!
//! - **horizontal key-value** — row 0 holds bilingual attribute headers,
//!   row 1 holds the single data row;
//! - **vertical key-value** — each row is one (label, value) pair, with an
//!   optional literal-colon middle cell;
//! - **tabular record list** — a wide keyword-bearing header row followed by
//!   one record per row.
//!
//! Malformed or unclassifiable tables yield [`TableExtraction::Empty`],
//! never an error: inconsistent markup is the expected common case.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::compound::split_pair;
use crate::dom::{self, Selection};
use crate::fields::{is_valid_value, FieldId, FieldMap};
use crate::url_utils::entity_ids_from_href;

/// Header keywords marking a horizontal attribute table's first row.
const ATTRIBUTE_HEADER_KEYWORDS: &[&str] = &[
    "馬名", "編號", "性別", "年齡", "毛色", "父系", "母系", "Horse Name", "Code", "Sex", "Age",
    "Colour", "Sire", "Dam",
];

/// Header keywords marking a record-list header row.
const RECORD_HEADER_KEYWORDS: &[&str] = &[
    "日期", "場地", "距離", "班次", "名次", "Date", "Venue", "Distance", "Class", "Position",
];

/// A record-list header row must have at least this many cells.
const MIN_RECORD_HEADER_CELLS: usize = 6;

/// A record data row must have at least this many cells.
const MIN_RECORD_ROW_CELLS: usize = 3;

/// One row of a record table: insertion-ordered mapping from canonical or
/// raw header label to cell text, plus entity ids merged in from anchor
/// hrefs found anywhere in the row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordRow {
    fields: Vec<(String, String)>,
    /// Cell values beyond the header count, kept rather than silently
    /// dropped.
    extras: Vec<String>,
}

impl RecordRow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// First valid value wins, same contract as [`FieldMap::set_if_absent`].
    pub fn set_if_absent(&mut self, key: &str, value: &str) -> bool {
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() || !is_valid_value(value) || self.get(key).is_some() {
            return false;
        }
        self.fields.push((key.to_string(), value.to_string()));
        true
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn get_field(&self, id: FieldId) -> Option<&str> {
        self.get(id.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Named fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Cell values that had no matching header column.
    #[must_use]
    pub fn extras(&self) -> &[String] {
        &self.extras
    }

    fn push_extra(&mut self, value: &str) {
        let value = value.trim();
        if is_valid_value(value) {
            self.extras.push(value.to_string());
        }
    }
}

impl Serialize for RecordRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let extra = usize::from(!self.extras.is_empty());
        let mut map = serializer.serialize_map(Some(self.fields.len() + extra))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        if !self.extras.is_empty() {
            map.serialize_entry("extras", &self.extras)?;
        }
        map.end()
    }
}

/// Result of classifying and extracting one table.
#[derive(Debug, Clone, PartialEq)]
pub enum TableExtraction {
    /// No rows, or no classification rule accepted the table.
    Empty,
    /// Key-value layout (horizontal or vertical), reduced to one field map.
    KeyValues(FieldMap),
    /// Record-list layout: one row per entity instance.
    Records(Vec<RecordRow>),
}

impl Serialize for TableExtraction {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            TableExtraction::Empty => serializer.serialize_seq(Some(0))?.end(),
            TableExtraction::KeyValues(map) => map.serialize(serializer),
            TableExtraction::Records(rows) => rows.serialize(serializer),
        }
    }
}

/// Classify a table and extract it.
///
/// Never fails: structurally insufficient tables come back as
/// [`TableExtraction::Empty`].
#[must_use]
pub fn extract_table(table: &Selection) -> TableExtraction {
    let rows = dom::each(&table.select("tr"));
    if rows.is_empty() {
        return TableExtraction::Empty;
    }

    // A wide keyword-bearing row anywhere in the table marks a record list;
    // its presence also disqualifies the other two readings. Checked first
    // because record headers often carry attribute keywords too (a starters
    // grid has a 馬名 column).
    let record_header = find_record_header(&rows);

    let first_row_text = dom::trimmed_text(&rows[0]);
    let horizontal = rows.len() >= 2
        && record_header != Some(0)
        && ATTRIBUTE_HEADER_KEYWORDS
            .iter()
            .any(|k| first_row_text.contains(k));
    if horizontal {
        return wrap_key_values(extract_horizontal(&rows));
    }

    if let Some(header_index) = record_header {
        return extract_records(&rows, header_index);
    }

    wrap_key_values(extract_vertical(&rows))
}

fn wrap_key_values(map: FieldMap) -> TableExtraction {
    if map.is_empty() {
        TableExtraction::Empty
    } else {
        TableExtraction::KeyValues(map)
    }
}

/// Cells of a row, in document order.
fn row_cells<'a>(row: &Selection<'a>) -> Vec<Selection<'a>> {
    dom::each(&row.select("td, th"))
}

/// Row 0 = headers, row 1 = the single data row, paired positionally.
/// Headers or values beyond the shorter side are ignored.
fn extract_horizontal(rows: &[Selection]) -> FieldMap {
    let headers = row_cells(&rows[0]);
    let values = row_cells(&rows[1]);

    let mut map = FieldMap::new();
    for (header, cell) in headers.iter().zip(values.iter()) {
        let label = dom::trimmed_text(header);
        let value = dom::anchor_first_text(cell);
        store_pair(&mut map, &label, &value);
    }
    map
}

/// Each row is one (label, value) pair. A 3-cell row whose middle cell is a
/// literal colon reads as (cell 0, cell 2); any other row of 2 or more
/// cells reads as (cell 0, cell 1). Narrower rows are skipped.
fn extract_vertical(rows: &[Selection]) -> FieldMap {
    let mut map = FieldMap::new();
    for row in rows {
        let cells = row_cells(row);
        if cells.len() < 2 {
            continue;
        }

        let label = dom::trimmed_text(&cells[0]);
        let middle = dom::trimmed_text(&cells[1]);
        let value = if cells.len() >= 3 && matches!(middle.as_str(), ":" | "：") {
            dom::anchor_first_text(&cells[2])
        } else {
            dom::anchor_first_text(&cells[1])
        };
        store_pair(&mut map, &label, &value);
    }
    map
}

/// Split a raw pair, resolve each sub-label, and write under first-valid-
/// value-wins.
fn store_pair(map: &mut FieldMap, label: &str, value: &str) {
    for (sub_label, sub_value) in split_pair(label, value) {
        map.set_if_absent(&FieldId::resolve_key(&sub_label), &sub_value);
    }
}

/// Index of the first row wide enough to be a record header and carrying a
/// record keyword.
fn find_record_header(rows: &[Selection]) -> Option<usize> {
    rows.iter().position(|row| {
        if row_cells(row).len() < MIN_RECORD_HEADER_CELLS {
            return false;
        }
        let text = dom::trimmed_text(row);
        RECORD_HEADER_KEYWORDS.iter().any(|k| text.contains(k))
    })
}

fn looks_like_repeated_header(row_text: &str) -> bool {
    RECORD_HEADER_KEYWORDS.iter().any(|k| row_text.contains(k))
}

/// Extract every data row below the header row.
fn extract_records(rows: &[Selection], header_index: usize) -> TableExtraction {
    let headers: Vec<String> = row_cells(&rows[header_index])
        .iter()
        .map(dom::trimmed_text)
        .collect();

    let mut records = Vec::new();
    for row in &rows[header_index + 1..] {
        let cells = row_cells(row);
        if cells.len() < MIN_RECORD_ROW_CELLS {
            continue;
        }
        if looks_like_repeated_header(&dom::trimmed_text(row)) {
            continue;
        }

        let mut record = RecordRow::new();
        for (i, cell) in cells.iter().enumerate() {
            let value = dom::anchor_first_text(cell);
            match headers.get(i) {
                Some(header) if !header.is_empty() => {
                    record.set_if_absent(&FieldId::resolve_key(header), &value);
                }
                _ => record.push_extra(&value),
            }
        }

        // Entity ids ride along on anchors anywhere in the row, regardless
        // of column. A horseid anchor also carries the horse's display name.
        for anchor in dom::each(&row.select("a[href]")) {
            let Some(href) = dom::get_attribute(&anchor, "href") else {
                continue;
            };
            for (key, id) in entity_ids_from_href(&href) {
                record.set_if_absent(key, &id);
                if key == "horse_id" {
                    record.set_if_absent("horse_name", &dom::trimmed_text(&anchor));
                }
            }
        }

        if !record.is_empty() {
            records.push(record);
        }
    }

    if records.is_empty() {
        TableExtraction::Empty
    } else {
        TableExtraction::Records(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    fn extract(html: &str) -> TableExtraction {
        let doc = Document::from(html);
        extract_table(&doc.select("table"))
    }

    #[test]
    fn horizontal_table_resolves_canonical_fields() {
        let html = "<table>\
            <tr><td>馬名</td><td>編號</td><td>性別</td><td>年齡</td><td>毛色</td></tr>\
            <tr><td>遨遊氣泡</td><td>E436</td><td>閹</td><td>7</td><td>棗</td></tr>\
            </table>";
        match extract(html) {
            TableExtraction::KeyValues(map) => {
                assert_eq!(map.get("horse_name"), Some("遨遊氣泡"));
                assert_eq!(map.get("horse_code"), Some("E436"));
                assert_eq!(map.get("sex"), Some("閹"));
                assert_eq!(map.get("age"), Some("7"));
                assert_eq!(map.get("colour"), Some("棗"));
            }
            other => panic!("expected KeyValues, got {other:?}"),
        }
    }

    #[test]
    fn vertical_table_skips_literal_colon_cells() {
        let html = "<table>\
            <tr><td>馬主</td><td>:</td><td>陳大文</td></tr>\
            <tr><td>練馬師</td><td>:</td><td><a href='/t?trainerid=YPF'>容天鵬</a></td></tr>\
            <tr><td>備註</td><td>自購新馬</td></tr>\
            </table>";
        match extract(html) {
            TableExtraction::KeyValues(map) => {
                assert_eq!(map.get("owner"), Some("陳大文"));
                assert_eq!(map.get("trainer"), Some("容天鵬"));
                // Unknown label preserved verbatim, not lost
                assert_eq!(map.get("備註"), Some("自購新馬"));
            }
            other => panic!("expected KeyValues, got {other:?}"),
        }
    }

    #[test]
    fn vertical_table_splits_compound_rows() {
        let html = "<table>\
            <tr><td>父系 / 母系</td><td>:</td><td>Sire A / Dam B</td></tr>\
            </table>";
        match extract(html) {
            TableExtraction::KeyValues(map) => {
                assert_eq!(map.get("sire"), Some("Sire A"));
                assert_eq!(map.get("dam"), Some("Dam B"));
            }
            other => panic!("expected KeyValues, got {other:?}"),
        }
    }

    #[test]
    fn record_table_keys_rows_by_header_and_injects_ids() {
        let html = "<table>\
            <tr><td>日期</td><td>場地</td><td>距離</td><td>班次</td><td>名次</td><td>騎師</td><td>練馬師</td></tr>\
            <tr><td>18/01/26</td><td>沙田</td><td>1200</td><td>4</td><td>1</td>\
                <td>潘頓</td><td><a href='/t?trainerid=YPF'>容天鵬</a></td></tr>\
            </table>";
        match extract(html) {
            TableExtraction::Records(rows) => {
                assert_eq!(rows.len(), 1);
                let row = &rows[0];
                assert_eq!(row.get("date"), Some("18/01/26"));
                assert_eq!(row.get("venue"), Some("沙田"));
                assert_eq!(row.get("distance"), Some("1200"));
                assert_eq!(row.get("class"), Some("4"));
                assert_eq!(row.get("position"), Some("1"));
                assert_eq!(row.get("jockey"), Some("潘頓"));
                assert_eq!(row.get("trainer"), Some("容天鵬"));
                assert_eq!(row.get("trainer_id"), Some("YPF"));
            }
            other => panic!("expected Records, got {other:?}"),
        }
    }

    #[test]
    fn six_column_header_still_reads_as_records() {
        let html = "<table>\
            <tr><td>日期</td><td>場地</td><td>距離</td><td>班次</td><td>名次</td><td>騎師</td></tr>\
            <tr><td>18/01/26</td><td>沙田</td><td>1200</td><td>4</td><td>1</td><td>潘頓</td></tr>\
            </table>";
        match extract(html) {
            TableExtraction::Records(rows) => {
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].get("date"), Some("18/01/26"));
                assert_eq!(rows[0].get("jockey"), Some("潘頓"));
            }
            other => panic!("expected Records, got {other:?}"),
        }
    }

    #[test]
    fn record_table_skips_repeated_headers_and_keeps_excess_cells() {
        let html = "<table>\
            <tr><td>日期</td><td>場地</td><td>距離</td><td>班次</td><td>名次</td><td>騎師</td><td>練馬師</td></tr>\
            <tr><td>日期</td><td>場地</td><td>距離</td><td>班次</td><td>名次</td><td>騎師</td><td>練馬師</td></tr>\
            <tr><td>18/01/26</td><td>沙田</td><td>1200</td><td>4</td><td>1</td><td>潘頓</td><td>容天鵬</td><td>多出</td></tr>\
            </table>";
        match extract(html) {
            TableExtraction::Records(rows) => {
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].extras(), &["多出".to_string()]);
            }
            other => panic!("expected Records, got {other:?}"),
        }
    }

    #[test]
    fn empty_and_unclassifiable_tables_yield_empty() {
        assert_eq!(extract("<table></table>"), TableExtraction::Empty);
        assert_eq!(
            extract("<table><tr><td>lone</td></tr></table>"),
            TableExtraction::Empty
        );
        // Placeholder-only values never produce a map
        assert_eq!(
            extract("<table><tr><td>性別</td><td>--</td></tr></table>"),
            TableExtraction::Empty
        );
    }

    #[test]
    fn extraction_is_idempotent() {
        let html = "<table>\
            <tr><td>日期</td><td>場地</td><td>距離</td><td>班次</td><td>名次</td><td>騎師</td><td>練馬師</td></tr>\
            <tr><td>18/01/26</td><td>沙田</td><td>1200</td><td>4</td><td>1</td><td>潘頓</td><td>容天鵬</td></tr>\
            </table>";
        let doc = Document::from(html);
        let table = doc.select("table");
        assert_eq!(extract_table(&table), extract_table(&table));
    }
}
