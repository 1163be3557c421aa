//! Canonical field resolution and the first-valid-wins field map.
//!
//! Source pages label the same attribute many ways across languages and page
//! generations (`馬名`, `马名`, `Horse Name`). Resolution is a single linear
//! scan over an ordered synonym table with substring containment; table
//! order encodes priority, so more specific labels (`外祖父` / "Maternal
//! Grandsire", `場地狀況` / "Track Condition") sit above the looser labels
//! they contain.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Canonical identifier for a recognized racing attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    HorseName,
    HorseCode,
    Sex,
    Age,
    Colour,
    MaternalGrandsire,
    Sire,
    Dam,
    Trainer,
    Owner,
    ImportSource,
    Birthplace,
    CurrentRating,
    SeasonStartRating,
    Date,
    TrackCondition,
    Venue,
    Distance,
    RaceClass,
    Position,
    Jockey,
    Draw,
    Weight,
    FinishTime,
    RaceTime,
    Track,
    Odds,
    Rating,
    Equipment,
}

/// Ordered synonym table. First match in table order wins, so entries whose
/// synonyms contain another entry's synonym as a substring must come first:
/// `MaternalGrandsire` before `Sire`, `CurrentRating`/`SeasonStartRating`
/// before `Rating`, `TrackCondition` before `Venue` and `Track`,
/// `FinishTime` before `RaceTime`.
const SYNONYMS: &[(FieldId, &[&str])] = &[
    (FieldId::HorseName, &["馬名", "马名", "Horse Name"]),
    (FieldId::HorseCode, &["編號", "编号", "Horse Code", "Code"]),
    (FieldId::Sex, &["性別", "性别", "Sex", "Gender"]),
    (FieldId::Age, &["年齡", "年龄", "馬齡", "马龄", "Age"]),
    (FieldId::Colour, &["毛色", "Colour", "Color"]),
    (FieldId::MaternalGrandsire, &["外祖父", "Maternal Grandsire"]),
    (FieldId::Sire, &["父系", "Sire"]),
    (FieldId::Dam, &["母系", "Dam"]),
    (FieldId::Trainer, &["練馬師", "练马师", "Trainer"]),
    (FieldId::Owner, &["馬主", "马主", "Owner"]),
    (FieldId::ImportSource, &["進口來源", "进口来源", "Import Source"]),
    (
        FieldId::Birthplace,
        &["出生地", "Birthplace", "Place of Birth"],
    ),
    (FieldId::CurrentRating, &["現時評分", "现时评分", "Current Rating"]),
    (
        FieldId::SeasonStartRating,
        &["季初評分", "季初评分", "Season Start Rating", "Initial Rating"],
    ),
    (FieldId::Date, &["日期", "Date"]),
    (
        FieldId::TrackCondition,
        &["場地狀況", "场地状况", "Track Condition", "Going"],
    ),
    (FieldId::Venue, &["場地", "场地", "Venue"]),
    (FieldId::Distance, &["距離", "距离", "Distance"]),
    (FieldId::RaceClass, &["班次", "Class"]),
    (FieldId::Position, &["名次", "Position", "Placing"]),
    (FieldId::Jockey, &["騎師", "骑师", "Jockey"]),
    (FieldId::Draw, &["檔位", "档位", "Draw"]),
    (FieldId::Weight, &["體重", "体重", "Weight"]),
    (
        FieldId::FinishTime,
        &["完成時間", "完成时间", "Finish Time"],
    ),
    (FieldId::RaceTime, &["時間", "时间", "Time"]),
    (FieldId::Track, &["跑道", "Track", "Course"]),
    (FieldId::Odds, &["賠率", "赔率", "Odds"]),
    (FieldId::Rating, &["評分", "评分", "Rating"]),
    (FieldId::Equipment, &["裝備", "装备", "Equipment"]),
];

impl FieldId {
    /// Canonical snake_case name used as the output key.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FieldId::HorseName => "horse_name",
            FieldId::HorseCode => "horse_code",
            FieldId::Sex => "sex",
            FieldId::Age => "age",
            FieldId::Colour => "colour",
            FieldId::MaternalGrandsire => "maternal_grandsire",
            FieldId::Sire => "sire",
            FieldId::Dam => "dam",
            FieldId::Trainer => "trainer",
            FieldId::Owner => "owner",
            FieldId::ImportSource => "import_source",
            FieldId::Birthplace => "birthplace",
            FieldId::CurrentRating => "current_rating",
            FieldId::SeasonStartRating => "season_start_rating",
            FieldId::Date => "date",
            FieldId::TrackCondition => "track_condition",
            FieldId::Venue => "venue",
            FieldId::Distance => "distance",
            FieldId::RaceClass => "class",
            FieldId::Position => "position",
            FieldId::Jockey => "jockey",
            FieldId::Draw => "draw",
            FieldId::Weight => "weight",
            FieldId::FinishTime => "finish_time",
            FieldId::RaceTime => "time",
            FieldId::Track => "track",
            FieldId::Odds => "odds",
            FieldId::Rating => "rating",
            FieldId::Equipment => "equipment",
        }
    }

    /// Resolve a raw bilingual label to a canonical field.
    ///
    /// Substring containment, not exact match: `現時評分 Current Rating`
    /// resolves to `CurrentRating`. Returns `None` for labels outside the
    /// table; callers keep those under the raw label rather than dropping
    /// them.
    #[must_use]
    pub fn resolve(label: &str) -> Option<FieldId> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        SYNONYMS
            .iter()
            .find(|(_, names)| names.iter().any(|n| label.contains(n)))
            .map(|(id, _)| *id)
    }

    /// Resolve a label to its canonical output key, keeping the raw label
    /// verbatim when the table has no match.
    #[must_use]
    pub fn resolve_key(label: &str) -> String {
        match FieldId::resolve(label) {
            Some(id) => id.as_str().to_string(),
            None => label.trim().to_string(),
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Placeholder values the source pages use for "no data". These are invalid
/// at every stage and never stored.
#[must_use]
pub fn is_valid_value(value: &str) -> bool {
    !value.is_empty() && !matches!(value, ":" | "：" | "-" | "--")
}

/// Insertion-ordered map from canonical field name (or raw label) to a
/// single string value.
///
/// Writes go through [`FieldMap::set_if_absent`]: the first valid value for
/// a key wins for the whole extraction pass, later writes are ignored. The
/// map is created fresh per extraction call and never shared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    entries: Vec<(String, String)>,
}

impl FieldMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key` unless the key is already set or the value
    /// is a placeholder. Returns whether the value was stored.
    pub fn set_if_absent(&mut self, key: &str, value: &str) -> bool {
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() || !is_valid_value(value) || self.get(key).is_some() {
            return false;
        }
        self.entries.push((key.to_string(), value.to_string()));
        true
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Lookup by canonical field.
    #[must_use]
    pub fn get_field(&self, id: FieldId) -> Option<&str> {
        self.get(id.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Absorb another map, keeping existing values (first valid value wins
    /// across tables within one page pass).
    pub fn merge_absent(&mut self, other: &FieldMap) {
        for (k, v) in other.iter() {
            self.set_if_absent(k, v);
        }
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
