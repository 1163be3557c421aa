//! URL utilities: entity-id and query-parameter extraction.
//!
//! Anchor hrefs on result and form pages carry linked entity ids as query
//! parameters (`horseid=HK_2020_E436`, `jockeyid=PZ`, `trainerid=YPF`).
//! Hrefs are frequently relative, so absolute URLs go through `url::Url`
//! and everything else falls back to a regex scan.

use url::Url;

use crate::patterns::{HORSE_ID_PARAM, JOCKEY_ID_PARAM, TRAINER_ID_PARAM};

/// Entity-id fields recognized in hrefs, as (param pattern, output key).
type IdPattern = (&'static std::sync::LazyLock<regex::Regex>, &'static str);

static ID_PATTERNS: [IdPattern; 3] = [
    (&HORSE_ID_PARAM, "horse_id"),
    (&JOCKEY_ID_PARAM, "jockey_id"),
    (&TRAINER_ID_PARAM, "trainer_id"),
];

/// Extract every recognized entity id from an href.
///
/// Returns `(output key, id)` pairs, e.g. `("trainer_id", "YPF")`.
#[must_use]
pub fn entity_ids_from_href(href: &str) -> Vec<(&'static str, String)> {
    ID_PATTERNS
        .iter()
        .filter_map(|(pattern, key)| {
            pattern
                .captures(href)
                .map(|caps| (*key, caps[1].to_string()))
        })
        .collect()
}

/// Value of a query parameter in a page URL, percent-decoded.
///
/// Parameter names are matched exactly (the source site mixes `racedate`
/// and `Racecourse` casings). Relative URLs fall back to a plain scan.
#[must_use]
pub fn query_param(url: &str, name: &str) -> Option<String> {
    if let Ok(parsed) = Url::parse(url) {
        return parsed
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned());
    }

    // Relative URL: scan the query string by hand.
    let query = url.split_once('?').map_or(url, |(_, q)| q);
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == name && !v.is_empty()).then(|| v.to_string())
    })
}
