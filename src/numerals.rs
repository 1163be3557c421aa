//! Chinese numeral conversion.
//!
//! The schedule pages write months as `一月`..`十二月` and years in mixed
//! Arabic/Chinese digits (`2026年`, `二0二六年`, `二零二六年`). Conversion is
//! lookup-table based and total: unrecognized input yields `None`, never an
//! error.

use crate::patterns::FOUR_DIGITS;

/// Month names in calendar order; index + 1 is the month number.
const MONTHS: [&str; 12] = [
    "一月", "二月", "三月", "四月", "五月", "六月", "七月", "八月", "九月", "十月", "十一月",
    "十二月",
];

/// Convert a Chinese month name to its 1-12 number.
#[must_use]
pub fn month_to_number(month: &str) -> Option<u32> {
    MONTHS
        .iter()
        .position(|m| *m == month)
        .and_then(|i| u32::try_from(i + 1).ok())
}

/// Map one CJK digit character to its ASCII digit.
fn cjk_digit(ch: char) -> Option<char> {
    match ch {
        '零' | '〇' => Some('0'),
        '一' => Some('1'),
        '二' => Some('2'),
        '三' => Some('3'),
        '四' => Some('4'),
        '五' => Some('5'),
        '六' => Some('6'),
        '七' => Some('7'),
        '八' => Some('8'),
        '九' => Some('9'),
        _ => None,
    }
}

/// Convert a year fragment to a 4-digit Arabic string.
///
/// A literal 4-digit run anywhere in the input wins. Otherwise every
/// character is mapped through the CJK digit table (Arabic digits pass
/// through) and the first 4 collected digits form the year; fewer than 4
/// digits yields `None`.
#[must_use]
pub fn year_to_number(text: &str) -> Option<String> {
    if let Some(m) = FOUR_DIGITS.find(text) {
        return Some(m.as_str().to_string());
    }

    let digits: String = text
        .chars()
        .filter_map(|ch| {
            if ch.is_ascii_digit() {
                Some(ch)
            } else {
                cjk_digit(ch)
            }
        })
        .take(4)
        .collect();

    if digits.len() == 4 {
        Some(digits)
    } else {
        None
    }
}
