use std::collections::HashMap;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use recognition_map_shared::config::{
    CITATIONS_FILE, DATASET_FILE, GEOMETRY_FILE, MapConfig, STYLE_TOKENS_FILE,
};
use recognition_map_shared::{
    CitationsIndex, CountryGeometry, EntryIndex, RecognitionDataset, RecognitionKind, Resource,
    SchemaError, StyleTokens,
};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("failed to read {resource} at {}: {source}", path.display())]
    Read {
        resource: Resource,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid {resource} in {}: {source}", path.display())]
    Invalid {
        resource: Resource,
        path: PathBuf,
        #[source]
        source: SchemaError,
    },
}

/// One resource as served: the exact bytes on disk plus a strong validator.
#[derive(Debug, Clone)]
pub struct DataFile {
    pub bytes: Bytes,
    pub etag: String,
}

impl DataFile {
    fn new(bytes: Bytes) -> Self {
        let etag = format!("\"{:08x}-{:x}\"", crc32fast::hash(&bytes), bytes.len());
        Self { bytes, etag }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentSummary {
    pub version: String,
    pub updated: String,
    pub entries: usize,
    pub recognizes_china: usize,
    pub recognizes_taiwan: usize,
    pub citations: usize,
    pub features: usize,
    pub unresolved_citations: usize,
}

/// The four map resources, validated once at startup and immutable afterwards.
#[derive(Debug)]
pub struct ContentStore {
    files: HashMap<&'static str, DataFile>,
    summary: ContentSummary,
}

impl ContentStore {
    pub async fn load(dir: &Path) -> Result<Self, ContentError> {
        let dataset_bytes = read(dir, DATASET_FILE, Resource::Dataset).await?;
        let citations_bytes = read(dir, CITATIONS_FILE, Resource::Citations).await?;
        let tokens_bytes = read(dir, STYLE_TOKENS_FILE, Resource::StyleTokens).await?;
        let geometry_bytes = read(dir, GEOMETRY_FILE, Resource::Geometry).await?;

        let dataset = validate(dir, DATASET_FILE, Resource::Dataset, &dataset_bytes, |text| {
            RecognitionDataset::parse(text)
        })?;
        let citations = validate(dir, CITATIONS_FILE, Resource::Citations, &citations_bytes, |text| {
            CitationsIndex::parse(text)
        })?;
        validate(dir, STYLE_TOKENS_FILE, Resource::StyleTokens, &tokens_bytes, |text| {
            StyleTokens::parse(text)
        })?;
        let iso_keys = MapConfig::default().iso_keys;
        let geometry = validate(dir, GEOMETRY_FILE, Resource::Geometry, &geometry_bytes, |text| {
            CountryGeometry::parse(text, &iso_keys)
        })?;

        let mut unresolved_citations = 0;
        for entry in &dataset.entries {
            for id in &entry.citation_ids {
                if citations.get(id).is_none() {
                    unresolved_citations += 1;
                    tracing::warn!(iso = %entry.iso_code, citation = %id, "unresolved citation id");
                }
            }
            if geometry.get(&entry.iso_code).is_none() {
                tracing::warn!(iso = %entry.iso_code, "dataset entry has no matching geometry");
            }
        }

        let entries = EntryIndex::new(dataset.entries);
        let summary = ContentSummary {
            version: dataset.version,
            updated: dataset.updated,
            entries: entries.len(),
            recognizes_china: entries.count_of(RecognitionKind::China),
            recognizes_taiwan: entries.count_of(RecognitionKind::Taiwan),
            citations: citations.len(),
            features: geometry.len(),
            unresolved_citations,
        };

        let files = HashMap::from([
            (DATASET_FILE, DataFile::new(dataset_bytes)),
            (CITATIONS_FILE, DataFile::new(citations_bytes)),
            (STYLE_TOKENS_FILE, DataFile::new(tokens_bytes)),
            (GEOMETRY_FILE, DataFile::new(geometry_bytes)),
        ]);

        Ok(Self { files, summary })
    }

    pub fn file(&self, name: &str) -> Option<&DataFile> {
        self.files.get(name)
    }

    pub fn summary(&self) -> &ContentSummary {
        &self.summary
    }
}

async fn read(dir: &Path, name: &str, resource: Resource) -> Result<Bytes, ContentError> {
    let path = dir.join(name);
    tokio::fs::read(&path)
        .await
        .map(Bytes::from)
        .map_err(|source| ContentError::Read {
            resource,
            path,
            source,
        })
}

fn validate<T>(
    dir: &Path,
    name: &str,
    resource: Resource,
    bytes: &[u8],
    parse: impl FnOnce(&str) -> Result<T, SchemaError>,
) -> Result<T, ContentError> {
    let invalid = |source| ContentError::Invalid {
        resource,
        path: dir.join(name),
        source,
    };
    let text = std::str::from_utf8(bytes).map_err(|e| invalid(SchemaError::Json(e.to_string())))?;
    parse(text).map_err(invalid)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;

    static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

    pub fn dataset() -> serde_json::Value {
        json!({
            "version": "2024.2",
            "updated": "2024-06-01",
            "entries": [
                {
                    "isoCode": "PRY",
                    "name": "Paraguay",
                    "recognition": "taiwan",
                    "since": "1957-07-08",
                    "citationIds": ["mofa-pry"]
                },
                {
                    "isoCode": "BRA",
                    "name": "Brazil",
                    "recognition": "china",
                    "sinceYear": 1974,
                    "citationIds": ["missing"]
                }
            ]
        })
    }

    pub fn citations() -> serde_json::Value {
        json!({
            "mofa-pry": {
                "title": "Paraguay diplomatic allies",
                "publisher": "Ministry of Foreign Affairs",
                "url": "https://en.mofa.gov.tw/AlliesIndex.aspx"
            }
        })
    }

    pub fn tokens() -> serde_json::Value {
        json!({
            "colors": {
                "china": "#d94841",
                "taiwan": "#2f6fdf",
                "neutral": "#3b4a5a",
                "hoverStroke": "#ffffff",
                "ocean": "#0b1d2a"
            }
        })
    }

    pub fn geometry() -> serde_json::Value {
        let square = |x: f64, y: f64| {
            json!([[[x, y], [x + 4.0, y], [x + 4.0, y + 4.0], [x, y + 4.0], [x, y]]])
        };
        json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "iso_a3": "PRY", "name": "Paraguay" },
                    "geometry": { "type": "Polygon", "coordinates": square(-60.0, -25.0) }
                },
                {
                    "type": "Feature",
                    "properties": { "iso_a3": "BRA", "name": "Brazil" },
                    "geometry": { "type": "Polygon", "coordinates": square(-50.0, -15.0) }
                }
            ]
        })
    }

    /// A fresh directory under the system temp dir holding the given documents.
    pub fn write_dir(docs: [(&str, String); 4]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "recognition-map-server-{}-{}",
            std::process::id(),
            NEXT_DIR.fetch_add(1, Ordering::Relaxed)
        ));
        std::fs::create_dir_all(&dir).expect("create fixture dir");
        for (name, body) in docs {
            std::fs::write(dir.join(name), body).expect("write fixture");
        }
        dir
    }

    pub fn valid_dir() -> PathBuf {
        write_dir([
            (DATASET_FILE, dataset().to_string()),
            (CITATIONS_FILE, citations().to_string()),
            (STYLE_TOKENS_FILE, tokens().to_string()),
            (GEOMETRY_FILE, geometry().to_string()),
        ])
    }

    pub fn cleanup(dir: &Path) {
        let _ = std::fs::remove_dir_all(dir);
    }
}
