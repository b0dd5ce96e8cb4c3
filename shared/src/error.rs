use std::fmt;

use thiserror::Error;

/// A document parsed but violated the recognition data contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("malformed JSON: {0}")]
    Json(String),
    #[error("entry {index}: {code:?} is not a 2- or 3-letter uppercase ISO code")]
    InvalidIsoCode { index: usize, code: String },
    #[error("entry {index}: display name is empty")]
    EmptyName { index: usize },
    #[error("ISO code {0} appears more than once")]
    DuplicateIso(String),
    #[error("entry {index}: {value:?} is not a calendar date")]
    InvalidDate { index: usize, value: String },
    #[error("entry {index}: citation id is empty")]
    EmptyCitationId { index: usize },
    #[error("citation {id}: title is empty")]
    EmptyTitle { id: String },
    #[error("citation {id}: {url:?} is not an absolute http(s) URL")]
    InvalidUrl { id: String, url: String },
    #[error("style token colors.{0} is empty")]
    EmptyColor(&'static str),
    #[error("malformed GeoJSON: {0}")]
    GeoJson(String),
    #[error("geometry document is not a FeatureCollection")]
    NotFeatureCollection,
    #[error("geometry has no country with an ISO code and an outline")]
    NoFeatures,
}

impl From<serde_json::Error> for SchemaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Which of the map's remote documents a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Dataset,
    Citations,
    StyleTokens,
    Geometry,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Resource::Dataset => "recognition dataset",
            Resource::Citations => "citations index",
            Resource::StyleTokens => "style tokens",
            Resource::Geometry => "country geometry",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadErrorKind {
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {0}")]
    Status(u16),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Loading one of the map's resources failed; the map cannot render.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to load {resource} from {url}: {kind}")]
pub struct LoadError {
    pub resource: Resource,
    pub url: String,
    #[source]
    pub kind: LoadErrorKind,
}

impl LoadError {
    pub fn new(resource: Resource, url: impl Into<String>, kind: impl Into<LoadErrorKind>) -> Self {
        Self {
            resource,
            url: url.into(),
            kind: kind.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_names_the_failing_resource() {
        let err = LoadError::new(
            Resource::Citations,
            "/data/citations.json",
            LoadErrorKind::Status(404),
        );
        assert_eq!(
            err.to_string(),
            "failed to load citations index from /data/citations.json: HTTP 404"
        );
    }

    #[test]
    fn schema_errors_convert_into_load_errors() {
        let err = LoadError::new(
            Resource::Dataset,
            "/data/recognition.json",
            SchemaError::DuplicateIso("PRY".into()),
        );
        assert!(matches!(err.kind, LoadErrorKind::Schema(SchemaError::DuplicateIso(_))));
        assert!(err.to_string().ends_with("ISO code PRY appears more than once"));
    }
}
