//! Output rendering: JSON and CSV strings.
//!
//! Rendering is string-in, string-out; writing to disk or stdout is the
//! caller's job. JSON keeps insertion order via the manual `Serialize`
//! impls; CSV flattens records over the sorted union of their columns so
//! rows from differently-shaped tables line up.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::calendar::CalendarDay;
use crate::error::Result;
use crate::table::RecordRow;

/// Pretty-printed JSON for any extraction result.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Render record rows as CSV.
///
/// Columns are the sorted union of every row's field names; rows missing a
/// column emit an empty cell. Rows with unheadered cell values get a
/// trailing `extras` column, joined with `", "`.
#[must_use]
pub fn record_rows_to_csv(rows: &[RecordRow]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let columns: BTreeSet<&str> = rows.iter().flat_map(|r| r.iter().map(|(k, _)| k)).collect();
    let has_extras = rows.iter().any(|r| !r.extras().is_empty());

    let mut header: Vec<&str> = columns.iter().copied().collect();
    if has_extras {
        header.push("extras");
    }

    let mut out = String::new();
    push_row(&mut out, header.iter().map(|c| (*c).to_string()));

    for row in rows {
        let mut values: Vec<String> = columns
            .iter()
            .map(|c| row.get(c).unwrap_or_default().to_string())
            .collect();
        if has_extras {
            values.push(row.extras().join(", "));
        }
        push_row(&mut out, values.into_iter());
    }

    out
}

/// Fixed column order for calendar CSV. Per-race columns describe the day's
/// first race; days with more races keep them in JSON only.
const CALENDAR_COLUMNS: &[&str] = &[
    "date",
    "day",
    "month",
    "year",
    "venues",
    "race_types",
    "track_types",
    "race_classes",
    "special_marks",
    "prize_money",
    "notes",
    "race_number",
    "class",
    "grade",
    "distance",
    "distance_meters",
    "has_cup_mark",
    "score_range",
    "score_min",
    "score_max",
];

/// Render calendar days as CSV with a fixed schema.
#[must_use]
pub fn calendar_days_to_csv(days: &[CalendarDay]) -> String {
    let mut out = String::new();
    push_row(&mut out, CALENDAR_COLUMNS.iter().map(|c| (*c).to_string()));

    for day in days {
        let first_race = day.races.first();
        let race_field = |f: fn(&crate::calendar::RaceEntry) -> String| {
            first_race.map(f).unwrap_or_default()
        };

        let values = vec![
            day.date.clone().unwrap_or_default(),
            day.day.to_string(),
            day.month.clone().unwrap_or_default(),
            day.year.clone().unwrap_or_default(),
            join_set(&day.venues),
            join_set(&day.race_types),
            join_set(&day.track_types),
            join_set(&day.race_classes),
            join_set(&day.special_marks),
            day.prize_money.join(", "),
            day.notes.join(", "),
            race_field(|r| r.race_number.to_string()),
            race_field(|r| r.class.clone().unwrap_or_default()),
            race_field(|r| r.grade.clone().unwrap_or_default()),
            race_field(|r| r.distance.clone()),
            race_field(|r| r.distance_meters.to_string()),
            race_field(|r| if r.has_cup_mark { "是" } else { "否" }.to_string()),
            race_field(|r| r.score_range.clone()),
            race_field(|r| r.score_min.to_string()),
            race_field(|r| r.score_max.to_string()),
        ];
        push_row(&mut out, values.into_iter());
    }

    out
}

fn join_set(set: &BTreeSet<String>) -> String {
    set.iter().cloned().collect::<Vec<_>>().join(", ")
}

fn push_row(out: &mut String, values: impl Iterator<Item = String>) {
    let mut first = true;
    for value in values {
        if !first {
            out.push(',');
        }
        first = false;
        out.push_str(&escape_csv(&value));
    }
    out.push('\n');
}

/// Quote a field when it contains a delimiter, quote, or newline, doubling
/// embedded quotes.
fn escape_csv(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
