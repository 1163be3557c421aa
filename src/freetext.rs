//! Free-text fact extraction.
//!
//! Some facts never appear in a clean table layout: pedigree lines
//! (`父系: Deep Field`), equipment legends (`BO : 只戴單邊眼罩`), and
//! cancellation notices buried in page prose. Extraction is regex-first with
//! a deliberately permissive sibling-cell fallback.

use regex::Regex;

use crate::dom::{self, Document};
use crate::fields::FieldMap;
use crate::patterns::{EQUIPMENT_CODE, NOTICE_PATTERNS};

/// Extract a labelled value: `<label>[：:]<value up to end of line>`.
///
/// The label is matched literally (regex-escaped). Returns the trimmed
/// value, or `None` when the pattern does not occur.
#[must_use]
pub fn extract_labeled(text: &str, label: &str) -> Option<String> {
    let pattern = format!("{}[：:]\\s*([^\n]+)", regex::escape(label));
    let re = Regex::new(&pattern).ok()?;
    let caps = re.captures(text)?;
    let value = caps[1].trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Fallback when the labelled-colon pattern fails: the first non-empty cell
/// text that does not itself contain the label word.
///
/// Intentionally permissive; its accuracy against real documents is an open
/// question recorded in DESIGN.md.
#[must_use]
pub fn first_sibling_value(cell_texts: &[String], label: &str) -> Option<String> {
    cell_texts
        .iter()
        .map(|t| t.trim())
        .find(|t| !t.is_empty() && !t.contains(label))
        .map(str::to_string)
}

/// Labelled extraction with the sibling-cell fallback.
#[must_use]
pub fn labeled_or_sibling(text: &str, cell_texts: &[String], label: &str) -> Option<String> {
    extract_labeled(text, label).or_else(|| first_sibling_value(cell_texts, label))
}

/// Keywords marking a table as an equipment legend.
const EQUIPMENT_TABLE_KEYWORDS: &[&str] = &["眼罩", "Equipment", "B :", "BO :"];

/// Extract the equipment legend (code → bilingual description) from the
/// first table that carries legend keywords. First description per code
/// wins; an empty map means no legend was found.
#[must_use]
pub fn equipment_legend(doc: &Document) -> FieldMap {
    for table in dom::each(&doc.select("table")) {
        let table_text = dom::text_content(&table);
        if !EQUIPMENT_TABLE_KEYWORDS
            .iter()
            .any(|k| table_text.contains(k))
        {
            continue;
        }

        let mut legend = FieldMap::new();
        for row in dom::each(&table.select("tr")) {
            let row_text = dom::text_content(&row);
            for caps in EQUIPMENT_CODE.captures_iter(&row_text) {
                legend.set_if_absent(caps[1].trim(), caps[2].trim());
            }
        }
        if !legend.is_empty() {
            return legend;
        }
    }
    FieldMap::new()
}

/// Cancellation / postponement notices found in page prose, deduplicated in
/// first-seen order.
#[must_use]
pub fn notices(page_text: &str) -> Vec<String> {
    let mut found = Vec::new();
    for pattern in NOTICE_PATTERNS.iter() {
        for m in pattern.find_iter(page_text) {
            let notice = m.as_str().trim().to_string();
            if !notice.is_empty() && !found.contains(&notice) {
                found.push(notice);
            }
        }
    }
    found
}
