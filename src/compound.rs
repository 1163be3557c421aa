//! Compound `/`-joined key/value splitting.
//!
//! Key-value tables frequently pack several attributes into one row:
//! label `父系 / 母系` with value `Sire A / Dam B`. Splitting pairs the
//! sub-labels and sub-values positionally, with a deterministic fallback
//! ladder when the counts disagree.

use crate::fields::is_valid_value;

/// Split a compound label/value pair into aligned sub-pairs.
///
/// Rules, in order:
/// 1. No `/` in the label: the pair passes through unchanged (when valid).
/// 2. Label and value split to equal counts: pair positionally.
/// 3. Counts differ but the value contains `/`: pair positionally up to the
///    shorter side, unmatched trailing labels are discarded.
/// 4. Value has no `/`: the whole value is paired with the first sub-label
///    only. This fallback is a documented source ambiguity; see DESIGN.md.
///
/// Placeholder values (`:`, `：`, `-`, `--`) are dropped at every stage.
#[must_use]
pub fn split_pair(label: &str, value: &str) -> Vec<(String, String)> {
    let label = label.trim();
    let value = value.trim();

    if !label.contains('/') {
        if !label.is_empty() && is_valid_value(value) {
            return vec![(label.to_string(), value.to_string())];
        }
        return Vec::new();
    }

    let labels: Vec<&str> = label.split('/').map(str::trim).collect();
    let values: Vec<&str> = value.split('/').map(str::trim).collect();

    if labels.len() == values.len() {
        return zip_valid(&labels, &values);
    }

    if value.contains('/') {
        return zip_valid(&labels, &values);
    }

    // Single undivided value against several labels: attach it to the first
    // sub-label only.
    match labels.first() {
        Some(first) if !first.is_empty() && is_valid_value(value) => {
            vec![((*first).to_string(), value.to_string())]
        }
        _ => Vec::new(),
    }
}

/// Pair labels and values positionally up to the shorter side, skipping
/// empty labels and placeholder values.
fn zip_valid(labels: &[&str], values: &[&str]) -> Vec<(String, String)> {
    labels
        .iter()
        .zip(values.iter())
        .filter(|(l, v)| !l.is_empty() && is_valid_value(v))
        .map(|(l, v)| ((*l).to_string(), (*v).to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_pair_passes_through() {
        assert_eq!(
            split_pair("馬名", "遨遊氣泡"),
            vec![("馬名".to_string(), "遨遊氣泡".to_string())]
        );
    }

    #[test]
    fn matching_counts_pair_positionally() {
        assert_eq!(
            split_pair("父系 / 母系", "Sire A / Dam B"),
            vec![
                ("父系".to_string(), "Sire A".to_string()),
                ("母系".to_string(), "Dam B".to_string()),
            ]
        );
    }

    #[test]
    fn extra_labels_are_discarded() {
        assert_eq!(
            split_pair("出生地 / 馬齡 / 毛色", "NZ / 7"),
            vec![
                ("出生地".to_string(), "NZ".to_string()),
                ("馬齡".to_string(), "7".to_string()),
            ]
        );
    }

    #[test]
    fn undivided_value_attaches_to_first_label() {
        assert_eq!(
            split_pair("現時評分 / 季初評分", "62"),
            vec![("現時評分".to_string(), "62".to_string())]
        );
    }

    #[test]
    fn placeholder_sub_values_are_dropped() {
        assert_eq!(
            split_pair("父系 / 母系", "Sire A / --"),
            vec![("父系".to_string(), "Sire A".to_string())]
        );
        assert!(split_pair("性別", "--").is_empty());
        assert!(split_pair("性別 / 年齡", ":").is_empty());
    }

    #[test]
    fn slash_without_spaces_still_splits() {
        assert_eq!(
            split_pair("性別/年齡", "閹/7"),
            vec![
                ("性別".to_string(), "閹".to_string()),
                ("年齡".to_string(), "7".to_string()),
            ]
        );
    }
}
