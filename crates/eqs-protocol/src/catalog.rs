use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One queryable table in a platform catalog.
///
/// `text` is itself a JSON document carrying the table description and the
/// schema-level field names; see [`EntryInfo`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Free descriptive text for the path.
    #[serde(rename = "ReferenceText", default)]
    pub reference_text: String,
    /// JSON blob with `Description` and `Fields`.
    #[serde(rename = "Text", default)]
    pub text: String,
}

impl CatalogEntry {
    pub fn new(reference_text: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            reference_text: reference_text.into(),
            text: text.into(),
        }
    }

    /// Build an entry whose `Text` blob encodes the given description and fields.
    pub fn with_info(reference_text: impl Into<String>, description: &str, fields: &[&str]) -> Self {
        let info = EntryInfo {
            description: description.to_string(),
            fields: fields.iter().map(|f| (*f).to_string()).collect(),
        };
        Self {
            reference_text: reference_text.into(),
            text: info.to_text(),
        }
    }

    /// Decode the embedded `Text` blob.
    ///
    /// A blob that is not valid JSON yields an empty [`EntryInfo`].
    pub fn info(&self) -> EntryInfo {
        EntryInfo::parse(&self.text)
    }
}

/// Decoded form of [`CatalogEntry::text`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryInfo {
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "Fields", default)]
    pub fields: Vec<String>,
}

impl EntryInfo {
    pub fn parse(text: &str) -> Self {
        Self::try_parse(text).unwrap_or_default()
    }

    /// Like [`EntryInfo::parse`], but tells a malformed blob apart from an empty one.
    pub fn try_parse(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }

    pub fn to_text(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Word → keys whose path or leading text contains that word.
pub type InvertedIndex = HashMap<String, Vec<String>>;

/// A platform catalog: key → entry, plus the derived inverted index.
///
/// The raw JSON source only carries `Table`; the index is built once after
/// loading and travels with the catalog in binary snapshots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(rename = "Table")]
    pub table: HashMap<String, CatalogEntry>,
    #[serde(rename = "InvertedIndex", default)]
    pub inverted_index: InvertedIndex,
}

impl Catalog {
    pub fn new(table: HashMap<String, CatalogEntry>) -> Self {
        Self {
            table,
            inverted_index: InvertedIndex::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&CatalogEntry> {
        self.table.get(key)
    }

    pub fn is_indexed(&self) -> bool {
        !self.inverted_index.is_empty()
    }

    /// Keys indexed under `word`, or an empty slice.
    pub fn postings(&self, word: &str) -> &[String] {
        self.inverted_index
            .get(word)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether any key lives under a `.sros.` path segment.
    pub fn is_sros(&self) -> bool {
        self.table.keys().any(|k| k.contains(".sros."))
    }
}

impl FromIterator<(String, CatalogEntry)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (String, CatalogEntry)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
