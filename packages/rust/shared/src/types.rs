//! Core domain types for the document catalog.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// DocumentEntry
// ---------------------------------------------------------------------------

/// A catalog row, keyed by `title`.
///
/// The four enrichment fields are `None` until the enrichment pipeline has
/// written them. `tags` and `authors` are persisted as JSON array text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEntry {
    pub title: String,
    pub link: String,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub doc_type: Option<String>,
    pub authors: Option<Vec<String>>,
}

impl DocumentEntry {
    /// A fresh, unenriched entry.
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            description: None,
            tags: None,
            doc_type: None,
            authors: None,
        }
    }

    /// An entry is enriched iff both description and tags are non-empty.
    ///
    /// Partial states (description without tags, or the reverse) count as
    /// unenriched and are reprocessed on the next access.
    pub fn is_enriched(&self) -> bool {
        let has_description = self.description.as_deref().is_some_and(|d| !d.is_empty());
        let has_tags = self.tags.as_ref().is_some_and(|t| !t.is_empty());
        has_description && has_tags
    }

    /// Replace all four enrichment fields with a summarizer result.
    pub fn with_summary(self, summary: Summary) -> Self {
        Self {
            description: summary.description,
            tags: summary.tags,
            doc_type: summary.doc_type,
            authors: summary.authors,
            ..self
        }
    }
}

// ---------------------------------------------------------------------------
// EntryView
// ---------------------------------------------------------------------------

/// The JSON shape returned by `GET /entry`.
///
/// Missing arrays render as `[]`, missing scalars as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryView {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Link")]
    pub link: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub doc_type: Option<String>,
    pub authors: Vec<String>,
}

impl From<DocumentEntry> for EntryView {
    fn from(entry: DocumentEntry) -> Self {
        Self {
            title: entry.title,
            link: entry.link,
            description: entry.description,
            tags: entry.tags.unwrap_or_default(),
            doc_type: entry.doc_type,
            authors: entry.authors.unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Structured metadata parsed from the summarizer's JSON object.
///
/// Keys the model leaves out deserialize to `None` rather than failing.
/// Values are taken as the model gave them: a bare string where a list is
/// expected becomes a one-element list, `null` list items are dropped, and
/// any other non-string value is kept as its JSON text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub authors: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub doc_type: Option<String>,
}

/// A string as-is, any other non-null value as its JSON text.
fn value_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_text(Value::deserialize(deserializer)?))
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::Array(items) => Some(items.into_iter().filter_map(value_text).collect()),
        scalar => value_text(scalar).map(|s| vec![s]),
    })
}

// ---------------------------------------------------------------------------
// SeedItem
// ---------------------------------------------------------------------------

/// One object from a seed JSON array file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedItem {
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "Link", default)]
    pub link: Option<String>,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
    #[serde(rename = "Tags", default)]
    pub tags: Option<Vec<String>>,
    #[serde(rename = "doc_type", default)]
    pub doc_type: Option<String>,
    #[serde(rename = "Authors", default)]
    pub authors: Option<Vec<String>>,
}

impl SeedItem {
    /// Convert into a catalog entry. Items without a title or link are unusable.
    pub fn into_entry(self) -> Option<DocumentEntry> {
        let title = self.title.filter(|t| !t.trim().is_empty())?;
        let link = self.link?;
        Some(DocumentEntry {
            title,
            link,
            description: self.description,
            tags: self.tags,
            doc_type: self.doc_type,
            authors: self.authors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_entry_is_not_enriched() {
        let entry = DocumentEntry::new("Paper A", "http://x/a");
        assert!(!entry.is_enriched());
    }

    #[test]
    fn description_without_tags_is_not_enriched() {
        let mut entry = DocumentEntry::new("Paper A", "http://x/a");
        entry.description = Some("D".into());
        assert!(!entry.is_enriched());

        entry.tags = Some(vec![]);
        assert!(!entry.is_enriched());

        entry.tags = Some(vec!["x".into()]);
        assert!(entry.is_enriched());
    }

    #[test]
    fn empty_description_is_not_enriched() {
        let mut entry = DocumentEntry::new("Paper A", "http://x/a");
        entry.description = Some(String::new());
        entry.tags = Some(vec!["x".into()]);
        assert!(!entry.is_enriched());

        // Whitespace still counts as a description.
        entry.description = Some("   ".into());
        assert!(entry.is_enriched());
    }

    #[test]
    fn entry_view_json_shape() {
        let entry = DocumentEntry::new("Paper A", "http://x/a");
        let json = serde_json::to_value(EntryView::from(entry)).expect("serialize");
        assert_eq!(json["Title"], "Paper A");
        assert_eq!(json["Link"], "http://x/a");
        assert!(json["description"].is_null());
        assert_eq!(json["tags"], serde_json::json!([]));
        assert!(json["doc_type"].is_null());
        assert_eq!(json["authors"], serde_json::json!([]));
    }

    #[test]
    fn summary_tolerates_missing_keys() {
        let summary: Summary = serde_json::from_str(r#"{"description":"D"}"#).expect("parse");
        assert_eq!(summary.description.as_deref(), Some("D"));
        assert!(summary.tags.is_none());
        assert!(summary.authors.is_none());
        assert!(summary.doc_type.is_none());
    }

    #[test]
    fn summary_keeps_loosely_typed_values() {
        let summary: Summary = serde_json::from_str(
            r#"{"description":42,"tags":["x",null,"y"],"authors":"Jane Doe, John Roe","doc_type":true}"#,
        )
        .expect("parse");
        assert_eq!(summary.description.as_deref(), Some("42"));
        assert_eq!(summary.tags, Some(vec!["x".to_string(), "y".to_string()]));
        assert_eq!(summary.authors, Some(vec!["Jane Doe, John Roe".to_string()]));
        assert_eq!(summary.doc_type.as_deref(), Some("true"));
    }

    #[test]
    fn summary_list_items_keep_json_text() {
        let summary: Summary =
            serde_json::from_str(r#"{"authors":[{"name":"Z"}],"tags":null}"#).expect("parse");
        assert_eq!(summary.authors, Some(vec![r#"{"name":"Z"}"#.to_string()]));
        assert!(summary.tags.is_none());
    }

    #[test]
    fn with_summary_overwrites_all_fields() {
        let mut entry = DocumentEntry::new("Paper A", "http://x/a");
        entry.doc_type = Some("old".into());
        let entry = entry.with_summary(Summary {
            description: Some("D".into()),
            tags: Some(vec!["x".into(), "y".into()]),
            authors: Some(vec!["Z".into()]),
            doc_type: None,
        });
        assert_eq!(entry.description.as_deref(), Some("D"));
        assert_eq!(entry.doc_type, None);
        assert_eq!(entry.title, "Paper A");
    }

    #[test]
    fn seed_item_field_mapping() {
        let json = r#"{"Title":"T","Link":"http://x","Description":null,"Tags":["a"],"doc_type":"review","Authors":null}"#;
        let item: SeedItem = serde_json::from_str(json).expect("parse");
        let entry = item.into_entry().expect("usable");
        assert_eq!(entry.title, "T");
        assert_eq!(entry.tags, Some(vec!["a".to_string()]));
        assert_eq!(entry.doc_type.as_deref(), Some("review"));
        assert!(entry.authors.is_none());
    }

    #[test]
    fn seed_item_without_title_is_skipped() {
        let item: SeedItem = serde_json::from_str(r#"{"Link":"http://x"}"#).expect("parse");
        assert!(item.into_entry().is_none());
    }
}
