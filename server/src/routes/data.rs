use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::config::DATA_CACHE_CONTROL;
use crate::state::AppState;

/// Serve one of the validated map resources straight from memory.
pub async fn data_file(
    State(state): State<AppState>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Response {
    let Some(file) = state.content.file(&name) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    if if_none_match_matches(&headers, &file.etag) {
        return not_modified_response(&file.etag);
    }

    let mut response = Response::new(Body::from(file.bytes.clone()));
    let content_type = if name.ends_with(".geo.json") {
        "application/geo+json"
    } else {
        "application/json"
    };
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    insert_validators(headers, &file.etag);
    response
}

fn not_modified_response(etag: &str) -> Response {
    let mut response = StatusCode::NOT_MODIFIED.into_response();
    insert_validators(response.headers_mut(), etag);
    response
}

fn insert_validators(headers: &mut HeaderMap, etag: &str) {
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(DATA_CACHE_CONTROL),
    );
    if let Ok(etag_header) = HeaderValue::from_str(etag) {
        headers.insert(header::ETAG, etag_header);
    }
}

fn normalize_etag(candidate: &str) -> &str {
    candidate.strip_prefix("W/").unwrap_or(candidate).trim()
}

fn if_none_match_matches(headers: &HeaderMap, etag: &str) -> bool {
    let Some(value) = headers.get(header::IF_NONE_MATCH) else {
        return false;
    };
    let Ok(raw) = value.to_str() else {
        return false;
    };

    raw.split(',').any(|candidate| {
        let candidate = candidate.trim();
        candidate == "*" || normalize_etag(candidate) == normalize_etag(etag)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::IF_NONE_MATCH,
            HeaderValue::from_str(value).expect("header value"),
        );
        headers
    }

    #[test]
    fn if_none_match_accepts_lists_and_weak_forms() {
        let etag = "\"1a2b3c4d-2f\"";
        assert!(if_none_match_matches(&headers_with(etag), etag));
        assert!(if_none_match_matches(
            &headers_with("\"other\", W/\"1a2b3c4d-2f\""),
            etag
        ));
        assert!(if_none_match_matches(&headers_with("*"), etag));
        assert!(!if_none_match_matches(&headers_with("\"other\""), etag));
        assert!(!if_none_match_matches(&HeaderMap::new(), etag));
    }
}
