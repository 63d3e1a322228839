use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::ScenarioSource;
use crate::category::{CategoryFilter, category_label};
use crate::error::LoadError;

/// Words per minute used for the reading-time estimate.
const READING_WPM: usize = 200;

/// Stable identifier of a scenario; the only handle used across sessions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct ScenarioId(pub u32);

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ScenarioId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// The three fixed consequence paragraphs of a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Consequences {
    #[serde(default)]
    pub internet: String,
    #[serde(default)]
    pub people: String,
    #[serde(default)]
    pub technology: String,
}

/// One "what if" card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub id: ScenarioId,
    #[serde(default)]
    pub category: String,
    pub title: String,
    #[serde(default)]
    pub intro: String,
    #[serde(default)]
    pub changed: Vec<String>,
    #[serde(default)]
    pub disappeared: Vec<String>,
    #[serde(default)]
    pub consequences: Consequences,
    #[serde(default)]
    pub conclusion: String,
}

impl ScenarioRecord {
    /// Display label for this record's category.
    #[must_use]
    pub fn category_label(&self) -> &'static str {
        category_label(&self.category)
    }

    /// Estimated reading time in whole minutes, never less than one.
    #[must_use]
    pub fn reading_minutes(&self) -> usize {
        let words: usize = [
            self.title.as_str(),
            self.intro.as_str(),
            self.conclusion.as_str(),
            self.consequences.internet.as_str(),
            self.consequences.people.as_str(),
            self.consequences.technology.as_str(),
        ]
        .into_iter()
        .chain(self.changed.iter().map(String::as_str))
        .chain(self.disappeared.iter().map(String::as_str))
        .map(|text| text.split_whitespace().count())
        .sum();
        words.div_ceil(READING_WPM).max(1)
    }
}

/// Immutable scenario collection for one session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScenarioStore {
    records: Vec<ScenarioRecord>,
}

impl ScenarioStore {
    /// Build a store from already parsed records.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::DuplicateId`] when two records share an id.
    pub fn from_records(records: Vec<ScenarioRecord>) -> Result<Self, LoadError> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id) {
                return Err(LoadError::DuplicateId(record.id));
            }
        }
        Ok(Self { records })
    }

    /// Parse the scenario document (a JSON array of records).
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not have the expected shape or ids repeat.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let records: Vec<ScenarioRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    /// Fetch and parse the document through a platform source.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Unreachable`] when the source fails, or a parse error.
    pub fn load<S: ScenarioSource>(source: &S) -> Result<Self, LoadError> {
        let text = source
            .fetch_document()
            .map_err(|err| LoadError::Unreachable(err.to_string()))?;
        Self::from_json(&text)
    }

    /// Small collection compiled into the binary so the app works with no network.
    #[must_use]
    pub fn bundled() -> Self {
        Self::from_json(include_str!("../data/fallback_scenarios.json")).unwrap_or_default()
    }

    /// Keep a successfully loaded store, otherwise fall back to [`Self::bundled`].
    #[must_use]
    pub fn load_or_fallback(result: Result<Self, LoadError>) -> Self {
        match result {
            Ok(store) if !store.is_empty() => store,
            Ok(_) => {
                log::warn!("scenario document is empty, using bundled scenarios");
                Self::bundled()
            }
            Err(err) => {
                log::warn!("{err}; using bundled scenarios");
                Self::bundled()
            }
        }
    }

    #[must_use]
    pub fn records(&self) -> &[ScenarioRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ScenarioRecord> {
        self.records.get(index)
    }

    /// Records matching `category`, in collection order.
    #[must_use]
    pub fn filter(&self, category: &CategoryFilter) -> Vec<&ScenarioRecord> {
        self.records
            .iter()
            .filter(|record| category.matches(&record.category))
            .collect()
    }

    /// Ids matching `category`, in collection order.
    #[must_use]
    pub fn filter_ids(&self, category: &CategoryFilter) -> Vec<ScenarioId> {
        self.filter(category).into_iter().map(|r| r.id).collect()
    }

    #[must_use]
    pub fn find_by_id(&self, id: ScenarioId) -> Option<&ScenarioRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    #[must_use]
    pub fn position_of(&self, id: ScenarioId) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: ScenarioId) -> bool {
        self.position_of(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = ScenarioId> + '_ {
        self.records.iter().map(|record| record.id)
    }

    /// Distinct category tags in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = Vec::new();
        for record in &self.records {
            if !tags.contains(&record.category.as_str()) {
                tags.push(record.category.as_str());
            }
        }
        tags
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn record(id: u32, category: &str) -> ScenarioRecord {
        ScenarioRecord {
            id: ScenarioId(id),
            category: category.to_string(),
            title: format!("Scenario {id}"),
            intro: String::new(),
            changed: Vec::new(),
            disappeared: Vec::new(),
            consequences: Consequences::default(),
            conclusion: String::new(),
        }
    }

    /// Ids 1..=5 tagged tech, society, tech, nature, human.
    pub fn five() -> ScenarioStore {
        ScenarioStore::from_records(vec![
            record(1, "tech"),
            record(2, "society"),
            record(3, "tech"),
            record(4, "nature"),
            record(5, "human"),
        ])
        .unwrap()
    }

    pub fn sized(n: u32) -> ScenarioStore {
        ScenarioStore::from_records((0..n).map(|i| record(100 + i, "tech")).collect()).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{five, record};
    use super::*;
    use std::convert::Infallible;

    #[test]
    fn filter_keeps_exact_matches_in_order() {
        let store = five();
        let tech = CategoryFilter::Tag("tech".into());
        assert_eq!(store.filter_ids(&tech), vec![ScenarioId(1), ScenarioId(3)]);
        assert_eq!(store.filter(&CategoryFilter::All).len(), 5);
        assert!(
            store
                .filter_ids(&CategoryFilter::Tag("space".into()))
                .is_empty()
        );
    }

    #[test]
    fn filter_is_idempotent() {
        let store = five();
        for tag in ["all", "tech", "society", "nature", "human", "space"] {
            let filter = CategoryFilter::parse(tag);
            let once: Vec<ScenarioRecord> = store.filter(&filter).into_iter().cloned().collect();
            let again = ScenarioStore::from_records(once.clone()).unwrap();
            let twice: Vec<ScenarioRecord> =
                again.filter(&filter).into_iter().cloned().collect();
            assert_eq!(once, twice, "filter {tag} not idempotent");
        }
    }

    #[test]
    fn find_by_id_and_position() {
        let store = five();
        assert_eq!(store.find_by_id(ScenarioId(4)).unwrap().category, "nature");
        assert_eq!(store.position_of(ScenarioId(5)), Some(4));
        assert!(store.find_by_id(ScenarioId(99)).is_none());
    }

    #[test]
    fn missing_optional_fields_degrade_to_defaults() {
        let store = ScenarioStore::from_json(r#"[{"id": 7, "title": "Bare"}]"#).unwrap();
        let record = store.find_by_id(ScenarioId(7)).unwrap();
        assert_eq!(record.category, "");
        assert_eq!(record.category_label(), "Miscellaneous");
        assert!(record.changed.is_empty());
        assert_eq!(record.consequences, Consequences::default());
    }

    #[test]
    fn rejects_malformed_and_duplicate_documents() {
        assert!(matches!(
            ScenarioStore::from_json("{\"not\": \"a list\"}"),
            Err(LoadError::Parse(_))
        ));
        assert!(matches!(
            ScenarioStore::from_records(vec![record(1, "tech"), record(1, "nature")]),
            Err(LoadError::DuplicateId(ScenarioId(1)))
        ));
    }

    #[test]
    fn fallback_replaces_failed_or_empty_loads() {
        let bundled = ScenarioStore::bundled();
        assert!(!bundled.is_empty());

        let failed = ScenarioStore::load_or_fallback(Err(LoadError::Unreachable("offline".into())));
        assert_eq!(failed, bundled);

        let empty = ScenarioStore::load_or_fallback(Ok(ScenarioStore::default()));
        assert_eq!(empty, bundled);

        let kept = ScenarioStore::load_or_fallback(Ok(five()));
        assert_eq!(kept.len(), 5);
    }

    struct OfflineSource;

    impl ScenarioSource for OfflineSource {
        type Error = std::io::Error;

        fn fetch_document(&self) -> Result<String, Self::Error> {
            Err(std::io::Error::other("network down"))
        }
    }

    struct InlineSource(&'static str);

    impl ScenarioSource for InlineSource {
        type Error = Infallible;

        fn fetch_document(&self) -> Result<String, Self::Error> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn load_maps_source_failures_to_unreachable() {
        let err = ScenarioStore::load(&OfflineSource).unwrap_err();
        assert!(matches!(err, LoadError::Unreachable(msg) if msg.contains("network down")));

        let store = ScenarioStore::load(&InlineSource(r#"[{"id":1,"title":"x"}]"#)).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn categories_follow_first_appearance() {
        assert_eq!(
            five().categories(),
            vec!["tech", "society", "nature", "human"]
        );
    }

    #[test]
    fn reading_time_rounds_up_and_has_a_floor() {
        let mut r = record(1, "tech");
        assert_eq!(r.reading_minutes(), 1);
        r.intro = "word ".repeat(401);
        assert_eq!(r.reading_minutes(), 3);
    }
}
