use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Which government a country formally recognizes as "China".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecognitionKind {
    China,
    Taiwan,
}

impl RecognitionKind {
    pub const ALL: [RecognitionKind; 2] = [RecognitionKind::China, RecognitionKind::Taiwan];

    pub fn legend_label(self) -> &'static str {
        match self {
            RecognitionKind::China => "Recognizes PRC (Beijing)",
            RecognitionKind::Taiwan => "Recognizes ROC (Taiwan)",
        }
    }

    pub fn status_sentence(self) -> &'static str {
        match self {
            RecognitionKind::China => "Recognizes the People\u{2019}s Republic of China",
            RecognitionKind::Taiwan => "Recognizes the Republic of China (Taiwan)",
        }
    }

    pub fn list_label(self) -> &'static str {
        match self {
            RecognitionKind::China => "Recognizes the PRC (Beijing)",
            RecognitionKind::Taiwan => "Recognizes Taiwan",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionEntry {
    #[serde(alias = "isoAlpha3")]
    pub iso_code: String,
    pub name: String,
    pub recognition: RecognitionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_change_event: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub citation_ids: Vec<String>,
}

impl RecognitionEntry {
    /// `since` as a calendar date. Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
    pub fn since_date(&self) -> Option<NaiveDate> {
        self.since.as_deref().and_then(parse_calendar_date)
    }
}

pub(crate) fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

fn is_iso_code(code: &str) -> bool {
    (2..=3).contains(&code.len()) && code.bytes().all(|b| b.is_ascii_uppercase())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionDataset {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub updated: String,
    #[serde(default)]
    pub source_index: String,
    pub entries: Vec<RecognitionEntry>,
}

impl RecognitionDataset {
    pub fn parse(text: &str) -> Result<Self, SchemaError> {
        let dataset: Self = serde_json::from_str(text)?;
        dataset.validate()?;
        Ok(dataset)
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut seen = HashSet::with_capacity(self.entries.len());
        for (index, entry) in self.entries.iter().enumerate() {
            if !is_iso_code(&entry.iso_code) {
                return Err(SchemaError::InvalidIsoCode {
                    index,
                    code: entry.iso_code.clone(),
                });
            }
            if entry.name.trim().is_empty() {
                return Err(SchemaError::EmptyName { index });
            }
            if !seen.insert(entry.iso_code.as_str()) {
                return Err(SchemaError::DuplicateIso(entry.iso_code.clone()));
            }
            if let Some(since) = entry.since.as_deref()
                && parse_calendar_date(since).is_none()
            {
                return Err(SchemaError::InvalidDate {
                    index,
                    value: since.to_string(),
                });
            }
            if entry.citation_ids.iter().any(|id| id.trim().is_empty()) {
                return Err(SchemaError::EmptyCitationId { index });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub title: String,
    pub publisher: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Outbound link shown in the tooltip for an entry's first resolvable citation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationLink {
    pub url: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CitationsIndex(BTreeMap<String, Citation>);

impl CitationsIndex {
    pub fn parse(text: &str) -> Result<Self, SchemaError> {
        let index: Self = serde_json::from_str(text)?;
        index.validate()?;
        Ok(index)
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        for (id, citation) in &self.0 {
            if citation.title.trim().is_empty() {
                return Err(SchemaError::EmptyTitle { id: id.clone() });
            }
            let valid = url::Url::parse(&citation.url)
                .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
                .unwrap_or(false);
            if !valid {
                return Err(SchemaError::InvalidUrl {
                    id: id.clone(),
                    url: citation.url.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Citation> {
        self.0.get(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The first id in `ids` that resolves to a citation with a URL.
    pub fn first_link(&self, ids: &[String]) -> Option<CitationLink> {
        ids.iter()
            .filter_map(|id| self.0.get(id))
            .find(|c| !c.url.is_empty())
            .map(|c| CitationLink {
                url: c.url.clone(),
                label: c.title.clone(),
            })
    }
}

impl FromIterator<(String, Citation)> for CitationsIndex {
    fn from_iter<I: IntoIterator<Item = (String, Citation)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleColors {
    pub china: String,
    pub taiwan: String,
    pub neutral: String,
    pub hover_stroke: String,
    pub ocean: String,
}

impl StyleColors {
    pub fn for_kind(&self, kind: RecognitionKind) -> &str {
        match kind {
            RecognitionKind::China => &self.china,
            RecognitionKind::Taiwan => &self.taiwan,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleTokens {
    pub colors: StyleColors,
}

impl StyleTokens {
    pub fn parse(text: &str) -> Result<Self, SchemaError> {
        let tokens: Self = serde_json::from_str(text)?;
        tokens.validate()?;
        Ok(tokens)
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        let c = &self.colors;
        for (name, value) in [
            ("china", &c.china),
            ("taiwan", &c.taiwan),
            ("neutral", &c.neutral),
            ("hoverStroke", &c.hover_stroke),
            ("ocean", &c.ocean),
        ] {
            if value.trim().is_empty() {
                return Err(SchemaError::EmptyColor(name));
            }
        }
        Ok(())
    }
}

/// Entries keyed by ISO code, keeping document order for iteration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryIndex {
    entries: Vec<RecognitionEntry>,
    by_iso: HashMap<String, usize>,
}

impl EntryIndex {
    pub fn new(entries: Vec<RecognitionEntry>) -> Self {
        let mut by_iso = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            by_iso.entry(entry.iso_code.clone()).or_insert(i);
        }
        Self { entries, by_iso }
    }

    pub fn get(&self, iso: &str) -> Option<&RecognitionEntry> {
        self.by_iso.get(iso).map(|&i| &self.entries[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecognitionEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count_of(&self, kind: RecognitionKind) -> usize {
        self.entries.iter().filter(|e| e.recognition == kind).count()
    }
}

/// Everything the map needs from the three JSON documents, validated.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionBundle {
    pub version: String,
    pub updated: String,
    pub entries: EntryIndex,
    pub citations: CitationsIndex,
    pub colors: StyleColors,
}

impl RecognitionBundle {
    pub fn new(dataset: RecognitionDataset, citations: CitationsIndex, tokens: StyleTokens) -> Self {
        Self {
            version: dataset.version,
            updated: dataset.updated,
            entries: EntryIndex::new(dataset.entries),
            citations,
            colors: tokens.colors,
        }
    }

    pub fn citation_for(&self, entry: &RecognitionEntry) -> Option<CitationLink> {
        self.citations.first_link(&entry.citation_ids)
    }
}
