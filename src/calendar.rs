//! Calendar cell parsing.
//!
//! A month-grid fixture table packs a whole race day into one cell: the day
//! number, venue/session/track/grade icons, and inline per-race tokens like
//! `1400(1)-C 100-80`. Parsing turns one cell into a [`CalendarDay`] with
//! zero or more [`RaceEntry`] records. Cells with no racing signal are
//! suppressed entirely.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dom::{self, Selection};
use crate::numerals::month_to_number;
use crate::patterns::{CLASS_PHRASE, DISTANCE_METERS, PRIZE_DOLLARS, PRIZE_YUAN, RACE_TOKEN};

/// One race parsed from an embedded cell token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceEntry {
    /// 1-based ordinal of this race within its cell.
    pub race_number: u32,
    /// Class phrase from the same block, e.g. `第二班`, kept verbatim.
    pub class: Option<String>,
    /// Graded-race tag from the same block, e.g. `一级赛`.
    pub grade: Option<String>,
    /// Track tag from the same block, e.g. `草地`.
    pub track_type: Option<String>,
    /// Raw distance token, e.g. `1400(1)-C`.
    pub distance: String,
    pub distance_meters: u32,
    /// The `(n)` suffix on the distance token.
    pub distance_race_number: u32,
    /// Whether the token carried the `-C` cup mark.
    pub has_cup_mark: bool,
    /// Raw score range as written, e.g. `100-80`.
    pub score_range: String,
    pub score_min: u32,
    pub score_max: u32,
    /// The original matched fragment.
    pub text: String,
}

/// One race day distilled from a calendar cell.
///
/// Emitted only when at least one of the five tag sets is non-empty; a cell
/// bearing nothing but its day number is not a race day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub day: u32,
    pub month: Option<String>,
    pub year: Option<String>,
    /// ISO date, present only when both year and a recognized month are
    /// known and form a real calendar date. No guessing.
    pub date: Option<String>,
    pub venues: BTreeSet<String>,
    pub race_types: BTreeSet<String>,
    pub track_types: BTreeSet<String>,
    pub race_classes: BTreeSet<String>,
    pub special_marks: BTreeSet<String>,
    pub prize_money: Vec<String>,
    pub notes: Vec<String>,
    pub races: Vec<RaceEntry>,
}

/// Which tag set an icon feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IconKind {
    Venue,
    RaceType,
    TrackType,
    RaceClass,
}

/// Icon-to-tag table: (kind, src substring, alt/title aliases, canonical tag).
/// Canonical tags use the simplified forms the downstream records carry.
/// Unrecognized icons are ignored, not errored.
const ICON_TAGS: &[(IconKind, &str, &[&str], &str)] = &[
    (IconKind::Venue, "hv-ch", &["跑馬地", "跑马地"], "跑马地"),
    (IconKind::Venue, "st-ch", &["沙田"], "沙田"),
    (IconKind::RaceType, "day", &["日賽", "日赛"], "日赛"),
    (IconKind::RaceType, "dusk", &["黄昏賽", "黄昏赛"], "黄昏赛"),
    (IconKind::RaceType, "night", &["夜賽", "夜赛"], "夜赛"),
    (IconKind::TrackType, "turf", &["草地"], "草地"),
    (IconKind::TrackType, "mixed", &["混合"], "混合赛道"),
    (IconKind::TrackType, "awt", &["全天候"], "全天候跑道"),
    (IconKind::RaceClass, "class_g1", &["一級賽", "一级赛"], "一级赛"),
    (IconKind::RaceClass, "class_g2", &["二級賽", "二级赛"], "二级赛"),
    (IconKind::RaceClass, "class_g3", &["三級賽", "三级赛"], "三级赛"),
    (IconKind::RaceClass, "class_4yo", &["四歲", "四岁"], "四岁"),
];

/// Single-letter designations scanned as plain substrings of the cell text.
const SPECIAL_MARKS: [char; 3] = ['C', 'P', 'S'];

/// Map one image element to its tag, if the icon is known.
fn classify_icon(img: &Selection) -> Option<(IconKind, &'static str)> {
    let src = dom::get_attribute(img, "src")
        .unwrap_or_default()
        .to_lowercase();
    let alt = dom::get_attribute(img, "alt").unwrap_or_default();
    let title = dom::get_attribute(img, "title").unwrap_or_default();

    ICON_TAGS
        .iter()
        .find(|(_, src_part, aliases, _)| {
            src.contains(src_part) || aliases.iter().any(|a| alt.contains(a) || title.contains(a))
        })
        .map(|(kind, _, _, tag)| (*kind, *tag))
}

/// Parse one `<meters>(<n>)[-C] <max>-<min>` capture into a race entry.
/// Returns `None` when a number overflows; the caller keeps the fragment in
/// `notes` instead.
fn parse_race_token(caps: &regex::Captures, race_number: u32) -> Option<RaceEntry> {
    let distance_meters: u32 = caps[1].parse().ok()?;
    let distance_race_number: u32 = caps[2].parse().ok()?;
    let has_cup_mark = caps.get(3).is_some();
    let score_max: u32 = caps[4].parse().ok()?;
    let score_min: u32 = caps[5].parse().ok()?;

    let text = caps[0].trim().to_string();
    let distance = text
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string();

    Some(RaceEntry {
        race_number,
        class: None,
        grade: None,
        track_type: None,
        distance,
        distance_meters,
        distance_race_number,
        has_cup_mark,
        score_range: format!("{score_max}-{score_min}"),
        score_min,
        score_max,
        text,
    })
}

/// Class phrase (`第N班`) found on a block's icons or in its text, numeral
/// kept verbatim.
fn block_class_phrase(block: &Selection) -> Option<String> {
    for img in dom::each(&block.select("img")) {
        for attr in ["alt", "title"] {
            if let Some(value) = dom::get_attribute(&img, attr) {
                if let Some(m) = CLASS_PHRASE.find(&value) {
                    return Some(m.as_str().to_string());
                }
            }
        }
    }
    CLASS_PHRASE
        .find(&dom::text_content(block))
        .map(|m| m.as_str().to_string())
}

/// Parse one composite calendar cell into a race day.
///
/// `month`/`year` are the grid context the caller tracked from surrounding
/// rows; either may be unknown.
#[must_use]
pub fn parse_cell(
    cell: &Selection,
    day: u32,
    month: Option<&str>,
    year: Option<&str>,
) -> Option<CalendarDay> {
    let mut out = CalendarDay {
        day,
        month: month.map(str::to_string),
        year: year.map(str::to_string),
        date: iso_date(day, month, year),
        ..CalendarDay::default()
    };

    // Icons anywhere in the cell feed the day-level tag sets.
    for img in dom::each(&cell.select("img")) {
        if let Some((kind, tag)) = classify_icon(&img) {
            let set = match kind {
                IconKind::Venue => &mut out.venues,
                IconKind::RaceType => &mut out.race_types,
                IconKind::TrackType => &mut out.track_types,
                IconKind::RaceClass => &mut out.race_classes,
            };
            set.insert(tag.to_string());
        }
    }

    let cell_text = dom::text_content(cell).to_string();

    // Presence test, not word-boundary: `-C` suffixes count too.
    for mark in SPECIAL_MARKS {
        if cell_text.contains(mark) {
            out.special_marks.insert(mark.to_string());
        }
    }

    for pattern in [&PRIZE_DOLLARS, &PRIZE_YUAN] {
        for m in pattern.find_iter(&cell_text) {
            let token = m.as_str().to_string();
            if !out.prize_money.contains(&token) {
                out.prize_money.push(token);
            }
        }
    }

    if let Some(m) = CLASS_PHRASE.find(&cell_text) {
        out.race_classes.insert(m.as_str().to_string());
    }

    // Per-race tokens are grouped by display block so each race picks up the
    // class/grade/track icons it sits next to.
    let mut blocks = dom::each(&cell.select("p"));
    if blocks.is_empty() {
        blocks.push(cell.clone());
    }
    let mut race_number = 0u32;
    let mut consumed: Vec<String> = Vec::new();
    for block in &blocks {
        let class = block_class_phrase(block);
        let mut grade = None;
        let mut track_type = None;
        for img in dom::each(&block.select("img")) {
            match classify_icon(&img) {
                Some((IconKind::RaceClass, tag)) if grade.is_none() => {
                    grade = Some(tag.to_string());
                }
                Some((IconKind::TrackType, tag)) if track_type.is_none() => {
                    track_type = Some(tag.to_string());
                }
                _ => {}
            }
        }

        let block_text = dom::text_content(block);
        for caps in RACE_TOKEN.captures_iter(&block_text) {
            race_number += 1;
            consumed.push(caps[0].to_string());
            if let Some(mut entry) = parse_race_token(&caps, race_number) {
                entry.class.clone_from(&class);
                entry.grade.clone_from(&grade);
                entry.track_type.clone_from(&track_type);
                out.races.push(entry);
            }
        }
    }

    // Tokens sitting in direct cell text outside every block would otherwise
    // be lost: the notes pass below strips all well-formed tokens.
    for caps in RACE_TOKEN.captures_iter(&cell_text) {
        if let Some(seen) = consumed.iter().position(|t| *t == caps[0]) {
            consumed.swap_remove(seen);
            continue;
        }
        race_number += 1;
        if let Some(entry) = parse_race_token(&caps, race_number) {
            out.races.push(entry);
        }
    }

    // Whatever text the race tokens didn't consume becomes notes.
    let leftover = RACE_TOKEN.replace_all(&cell_text, " ");
    // Distance mentions are normalized to `<digits>米` whatever spacing the
    // page used.
    for caps in DISTANCE_METERS.captures_iter(&leftover) {
        push_note(&mut out.notes, &format!("{}米", &caps[1]));
    }
    let day_token = day.to_string();
    for token in leftover.split_whitespace() {
        if token == day_token
            || matches!(token, "C" | "P" | "S")
            || token.chars().all(|c| c.is_ascii_digit())
        {
            continue;
        }
        push_note(&mut out.notes, token);
    }

    let has_signal = !(out.venues.is_empty()
        && out.race_types.is_empty()
        && out.track_types.is_empty()
        && out.race_classes.is_empty()
        && out.special_marks.is_empty());
    has_signal.then_some(out)
}

fn push_note(notes: &mut Vec<String>, note: &str) {
    if !note.is_empty() && !notes.iter().any(|n| n == note) {
        notes.push(note.to_string());
    }
}

/// `{year}-{month:02}-{day:02}`, only for real calendar dates.
fn iso_date(day: u32, month: Option<&str>, year: Option<&str>) -> Option<String> {
    let year: i32 = year?.parse().ok()?;
    let month = month_to_number(month?)?;
    NaiveDate::from_ymd_opt(year, month, day)?;
    Some(format!("{year}-{month:02}-{day:02}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    // Bare `<td>` fragments get dropped by the HTML parser; cells need a
    // real table around them.
    fn cell_doc(td: &str) -> Document {
        Document::from(format!("<table><tr>{td}</tr></table>"))
    }

    fn cell(doc: &Document) -> Selection<'_> {
        doc.select("td")
    }

    #[test]
    fn night_meeting_cell_yields_day_with_race() {
        let html = "<td>\
            <p><span>11</span><img src='/hv.gif' alt='跑馬地'><img src='/night.gif' alt='夜賽'></p>\
            <p><img src='/class_g1.gif' alt='一級賽'>1400(1)-C 100-80</p>\
            </td>";
        let doc = cell_doc(html);
        let day = parse_cell(&cell(&doc), 11, Some("一月"), Some("2026")).expect("race day");

        assert_eq!(day.day, 11);
        assert_eq!(day.date.as_deref(), Some("2026-01-11"));
        assert!(day.venues.contains("跑马地"));
        assert!(day.race_types.contains("夜赛"));
        assert!(day.race_classes.contains("一级赛"));
        // `-C` in the race token reads as a cup mark at day level too
        assert!(day.special_marks.contains("C"));

        assert_eq!(day.races.len(), 1);
        let race = &day.races[0];
        assert_eq!(race.race_number, 1);
        assert_eq!(race.distance, "1400(1)-C");
        assert_eq!(race.distance_meters, 1400);
        assert_eq!(race.distance_race_number, 1);
        assert!(race.has_cup_mark);
        assert_eq!(race.score_range, "100-80");
        assert_eq!(race.score_max, 100);
        assert_eq!(race.score_min, 80);
        assert_eq!(race.grade.as_deref(), Some("一级赛"));
        assert_eq!(race.text, "1400(1)-C 100-80");
    }

    #[test]
    fn class_icon_attaches_to_race_in_same_block() {
        let html = "<td>\
            <p><span>3</span><img src='/st.gif' alt='沙田'><img src='/day.gif' alt='日賽'><img src='/turf.gif' alt='草地'></p>\
            <p><img src='/class2.gif' alt='第二班'>1200(1) 85-60</p>\
            </td>";
        let doc = cell_doc(html);
        let day = parse_cell(&cell(&doc), 3, Some("一月"), Some("2026")).expect("race day");

        assert_eq!(day.venues.iter().collect::<Vec<_>>(), ["沙田"]);
        assert!(day.race_types.contains("日赛"));
        assert!(day.track_types.contains("草地"));

        let race = &day.races[0];
        assert_eq!(race.class.as_deref(), Some("第二班"));
        assert_eq!(race.grade, None);
        assert!(!race.has_cup_mark);
        assert_eq!(race.score_range, "85-60");
    }

    #[test]
    fn bare_day_number_is_not_a_race_day() {
        let doc = cell_doc("<td>14</td>");
        assert_eq!(parse_cell(&cell(&doc), 14, Some("一月"), Some("2026")), None);
    }

    #[test]
    fn date_is_omitted_without_full_context() {
        let html = "<td><img src='/st.gif' alt='沙田'>5</td>";
        let doc = cell_doc(html);
        let no_year = parse_cell(&cell(&doc), 5, Some("一月"), None).expect("day");
        assert_eq!(no_year.date, None);
        let bad_month = parse_cell(&cell(&doc), 5, Some("无效"), Some("2026")).expect("day");
        assert_eq!(bad_month.date, None);
    }

    #[test]
    fn impossible_dates_are_not_fabricated() {
        let html = "<td><img src='/st.gif' alt='沙田'>31</td>";
        let doc = cell_doc(html);
        let day = parse_cell(&cell(&doc), 31, Some("二月"), Some("2026")).expect("day");
        assert_eq!(day.date, None);
    }

    #[test]
    fn malformed_race_tokens_land_in_notes() {
        let html = "<td><img src='/hv.gif' alt='跑馬地'>8 1400() 推介賽</td>";
        let doc = cell_doc(html);
        let day = parse_cell(&cell(&doc), 8, None, None).expect("day");
        assert!(day.races.is_empty());
        assert!(day.notes.iter().any(|n| n == "1400()"));
        assert!(day.notes.iter().any(|n| n == "推介賽"));
    }

    #[test]
    fn prize_money_and_distance_mentions_are_collected() {
        let html = "<td><img src='/st.gif' alt='沙田'>3 $1,000,000 1200米 500,000元</td>";
        let doc = cell_doc(html);
        let day = parse_cell(&cell(&doc), 3, None, None).expect("day");
        assert_eq!(
            day.prize_money,
            vec!["$1,000,000".to_string(), "500,000元".to_string()]
        );
        assert!(day.notes.iter().any(|n| n == "1200米"));
    }

    #[test]
    fn spaced_distance_mentions_are_normalized() {
        let html = "<td><img src='/st.gif' alt='沙田'>3 1200 米</td>";
        let doc = cell_doc(html);
        let day = parse_cell(&cell(&doc), 3, None, None).expect("day");
        assert!(day.notes.iter().any(|n| n == "1200米"));
        assert!(!day.notes.iter().any(|n| n == "1200 米"));
    }

    #[test]
    fn tokens_in_direct_cell_text_are_still_parsed() {
        let html =
            "<td><p><span>11</span><img src='/hv.gif' alt='跑馬地'></p> 1400(1)-C 100-80</td>";
        let doc = cell_doc(html);
        let day = parse_cell(&cell(&doc), 11, Some("一月"), Some("2026")).expect("day");
        assert_eq!(day.races.len(), 1);
        assert_eq!(day.races[0].distance_meters, 1400);
        assert_eq!(day.races[0].distance_race_number, 1);
        assert!(day.races[0].has_cup_mark);
        // Consumed by the race entry, not echoed into notes
        assert!(day.notes.is_empty());
    }

    #[test]
    fn parse_is_idempotent() {
        let html = "<td>\
            <p><span>11</span><img src='/hv.gif' alt='跑馬地'></p>\
            <p>1400(1)-C 100-80 1650(2) 80-60</p>\
            </td>";
        let doc = cell_doc(html);
        let sel = cell(&doc);
        let a = parse_cell(&sel, 11, Some("一月"), Some("2026"));
        let b = parse_cell(&sel, 11, Some("一月"), Some("2026"));
        assert_eq!(a, b);
        let day = a.expect("day");
        assert_eq!(day.races.len(), 2);
        assert_eq!(day.races[1].race_number, 2);
    }
}
