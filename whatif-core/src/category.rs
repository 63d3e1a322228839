use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Tags the shipped data set uses, in the order the category bar shows them.
pub const KNOWN_CATEGORIES: [&str; 4] = ["tech", "society", "nature", "human"];

/// Literal used for the unfiltered view in URLs, storage and the category bar.
pub const ALL_TAG: &str = "all";

/// Label shown for records whose tag is missing or not recognised.
pub const DEFAULT_CATEGORY_LABEL: &str = "Miscellaneous";

/// Active category filter of a browsing session.
///
/// Stored as the bare tag; only the exact literal `all` reads back as
/// [`CategoryFilter::All`], so blank or padded data tags survive a reload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Tag(String),
}

impl CategoryFilter {
    /// Parse a tag as it arrives from the UI; blank input and `all` mean no filter.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let tag = raw.trim();
        if tag.is_empty() || tag.eq_ignore_ascii_case(ALL_TAG) {
            Self::All
        } else {
            Self::Tag(tag.to_string())
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_TAG,
            Self::Tag(tag) => tag,
        }
    }

    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Whether a record carrying `category` belongs to this filter.
    #[must_use]
    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Tag(tag) => tag == category,
        }
    }
}

impl<'de> Deserialize<'de> for CategoryFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(if raw == ALL_TAG {
            Self::All
        } else {
            Self::Tag(raw)
        })
    }
}

impl From<CategoryFilter> for String {
    fn from(value: CategoryFilter) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-readable label for a category tag.
#[must_use]
pub fn category_label(tag: &str) -> &'static str {
    match tag {
        "tech" => "Technology",
        "society" => "Society",
        "nature" => "Nature",
        "human" => "Human",
        _ => DEFAULT_CATEGORY_LABEL,
    }
}

/// Label for a category-bar pill: known tags get their display name, an
/// unknown tag shows itself and only the missing tag reads as the default.
#[must_use]
pub fn filter_label(tag: &str) -> Cow<'_, str> {
    if tag.is_empty() || KNOWN_CATEGORIES.contains(&tag) {
        Cow::Borrowed(category_label(tag))
    } else {
        Cow::Borrowed(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_treats_blank_and_all_as_unfiltered() {
        assert_eq!(CategoryFilter::parse(""), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse(" ALL "), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse("tech"),
            CategoryFilter::Tag("tech".to_string())
        );
    }

    #[test]
    fn unknown_tags_use_default_label() {
        assert_eq!(category_label("nature"), "Nature");
        assert_eq!(category_label(""), DEFAULT_CATEGORY_LABEL);
        assert_eq!(category_label("cooking"), DEFAULT_CATEGORY_LABEL);
    }

    #[test]
    fn pill_labels_stay_distinct() {
        assert_eq!(filter_label("tech"), "Technology");
        assert_eq!(filter_label(""), DEFAULT_CATEGORY_LABEL);
        assert_eq!(filter_label("cooking"), "cooking");
        assert_ne!(filter_label("cooking"), filter_label("space"));
    }

    #[test]
    fn serializes_as_plain_tag() {
        let json = serde_json::to_string(&CategoryFilter::Tag("human".into())).unwrap();
        assert_eq!(json, "\"human\"");
        let back: CategoryFilter = serde_json::from_str("\"all\"").unwrap();
        assert!(back.is_all());
    }

    #[test]
    fn stored_tags_are_kept_verbatim() {
        for raw in ["", " tech ", "All"] {
            let filter = CategoryFilter::Tag(raw.to_string());
            let json = serde_json::to_string(&filter).unwrap();
            let back: CategoryFilter = serde_json::from_str(&json).unwrap();
            assert_eq!(back, filter, "tag {raw:?}");
        }
    }
}
