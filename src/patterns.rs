//! Compiled regex patterns for racing-page extraction.
//!
//! All patterns are compiled once at startup using `LazyLock`. Patterns are
//! organized by the extraction concern they serve. The source pages mix
//! traditional and simplified Chinese with English, so most patterns carry
//! both script variants.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Entity identification
// =============================================================================

/// Horse name followed by its brand code, e.g. `遨遊氣泡 (E436)`.
pub static NAME_WITH_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^(\n]+)\s*\(([A-Z]\d+)\)").expect("NAME_WITH_CODE regex"));

/// Explicitly labelled horse name, e.g. `馬名: 遨遊氣泡`.
pub static LABELED_HORSE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"馬名[：:]\s*([^\n]+)").expect("LABELED_HORSE_NAME regex"));

/// Entity-id query parameters found in anchor hrefs.
pub static HORSE_ID_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"horseid=([^&\s]+)").expect("HORSE_ID_PARAM regex"));
pub static JOCKEY_ID_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"jockeyid=([^&\s]+)").expect("JOCKEY_ID_PARAM regex"));
pub static TRAINER_ID_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"trainerid=([^&\s]+)").expect("TRAINER_ID_PARAM regex"));

// =============================================================================
// Calendar cell tokens
// =============================================================================

/// Per-race token embedded in a calendar cell:
/// `<meters>(<race number>)[-C] <score max>-<score min>`,
/// e.g. `1400(1)-C 100-80`.
pub static RACE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\((\d+)\)(-C)?\s+(\d+)-(\d+)").expect("RACE_TOKEN regex")
});

/// Monetary tokens: `$1,000,000` or `800,000元`.
pub static PRIZE_DOLLARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$[\d,]+").expect("PRIZE_DOLLARS regex"));
pub static PRIZE_YUAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\d,]+元").expect("PRIZE_YUAN regex"));

/// Chinese class phrase, numeral kept verbatim: `第五班`.
pub static CLASS_PHRASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"第[一二三四五六七八九十]+班").expect("CLASS_PHRASE regex"));

/// Bare distance mention: `1200米` / `1200 米`.
pub static DISTANCE_METERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*米").expect("DISTANCE_METERS regex"));

// =============================================================================
// Date and time
// =============================================================================

/// Chinese month name, e.g. `一月`, `十二月`.
pub static CHINESE_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[一二三四五六七八九十]+月").expect("CHINESE_MONTH regex"));

/// Year written in Arabic or Chinese numerals: `2026年`, `二0二六年`, `二零二六年`.
pub static YEAR_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"二[0〇零一二三四五六七八九十]+年|\d{4}年").expect("YEAR_TEXT regex")
});

/// A literal 4-digit Arabic year run.
pub static FOUR_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}").expect("FOUR_DIGITS regex"));

/// Clock time with meridiem, e.g. `2:45 PM`.
pub static RACE_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\d{1,2}:\d{2}\s*(?:AM|PM)").expect("RACE_TIME regex"));

// =============================================================================
// Free-text facts
// =============================================================================

/// Equipment legend entry: `BO : 只戴單邊眼罩` (full- or half-width colon).
pub static EQUIPMENT_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Z]+(?:\s+[A-Z]+)?)\s*[：:]\s*([^\n]+)").expect("EQUIPMENT_CODE regex")
});

/// Cancellation / postponement notices in page prose.
pub static NOTICE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"原定於[^\n]*?取消",
        r"原定于[^\n]*?取消",
        r"延期",
        r"改期",
        r"注意[^\n]*?事項",
        r"注意[^\n]*?事项",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("NOTICE_PATTERNS regex"))
    .collect()
});

// =============================================================================
// Text cleaning
// =============================================================================

/// Runs of whitespace, collapsed to a single space during normalization.
pub static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE_RUN regex"));
