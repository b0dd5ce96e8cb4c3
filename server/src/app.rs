use std::path::Path;

use axum::{
    Router,
    extract::Request,
    http::{HeaderValue, header},
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;

use crate::routes;
use crate::state::AppState;

pub(crate) fn build_app(state: AppState, static_dir: &Path) -> Router {
    let static_assets = Router::new()
        .fallback_service(
            ServeDir::new(static_dir)
                .precompressed_br()
                .precompressed_gzip(),
        )
        .layer(middleware::from_fn(set_static_cache_control));

    let app = Router::new()
        .route("/data/{file}", get(routes::data::data_file))
        .route("/api/health", get(routes::health::health));

    app.layer(CompressionLayer::new())
        .fallback_service(static_assets)
        .with_state(state)
}

async fn set_static_cache_control(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let mut response = next.run(request).await;

    if response.status().is_success()
        && let Some(cache_control) = cache_control_for_path(&path)
    {
        response.headers_mut().insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static(cache_control),
        );
    }

    response
}

fn cache_control_for_path(path: &str) -> Option<&'static str> {
    if is_hashed_bundle_asset(path) {
        return Some("public, max-age=31536000, immutable");
    }

    if path.starts_with("/fonts/") || path.ends_with(".ico") || path.ends_with(".svg") {
        return Some("public, max-age=86400");
    }

    None
}

fn is_hashed_bundle_asset(path: &str) -> bool {
    let file = Path::new(path);
    let Some(ext) = file.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    if !matches!(ext, "wasm" | "js" | "css") {
        return false;
    }
    let Some(filename) = file.file_name().and_then(|name| name.to_str()) else {
        return false;
    };

    filename
        .split(['-', '_', '.'])
        .any(|segment| segment.len() >= 8 && segment.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use recognition_map_shared::config::{DATASET_FILE, GEOMETRY_FILE};
    use tower::ServiceExt;

    use super::*;
    use crate::content::ContentStore;
    use crate::content::fixtures::{cleanup, valid_dir};

    async fn test_app() -> (Router, std::path::PathBuf) {
        let dir = valid_dir();
        std::fs::write(dir.join("index.html"), "<!doctype html><div id=\"app\"></div>")
            .expect("write index");
        let content = ContentStore::load(&dir).await.expect("valid content");
        (build_app(AppState::new(content), &dir), dir)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    #[tokio::test]
    async fn serves_resources_with_revalidation_headers() {
        let (app, dir) = test_app().await;
        let response = app
            .oneshot(get_request(&format!("/data/{DATASET_FILE}")))
            .await
            .expect("response");
        cleanup(&dir);

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::CACHE_CONTROL], "no-cache");
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        assert!(headers.contains_key(header::ETAG));
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(json["version"], "2024.2");
    }

    #[tokio::test]
    async fn matching_etag_yields_not_modified() {
        let (app, dir) = test_app().await;
        let uri = format!("/data/{GEOMETRY_FILE}");
        let first = app
            .clone()
            .oneshot(get_request(&uri))
            .await
            .expect("first response");
        let etag = first.headers()[header::ETAG].clone();
        assert_eq!(first.headers()[header::CONTENT_TYPE], "application/geo+json");

        let second = app
            .oneshot(
                Request::builder()
                    .uri(&uri)
                    .header(header::IF_NONE_MATCH, etag.clone())
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("second response");
        cleanup(&dir);

        assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(second.headers()[header::ETAG], etag);
        let body = to_bytes(second.into_body(), usize::MAX)
            .await
            .expect("body");
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn unknown_resource_is_not_found() {
        let (app, dir) = test_app().await;
        let response = app
            .oneshot(get_request("/data/passwords.json"))
            .await
            .expect("response");
        cleanup(&dir);

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_reports_content_summary() {
        let (app, dir) = test_app().await;
        let response = app
            .oneshot(get_request("/api/health"))
            .await
            .expect("response");
        cleanup(&dir);

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(json["status"], "ok");
        assert_eq!(json["dataset"]["version"], "2024.2");
        assert_eq!(json["dataset"]["entries"], 2);
        assert_eq!(json["dataset"]["recognizes_taiwan"], 1);
        assert_eq!(json["dataset"]["features"], 2);
        assert_eq!(json["dataset"]["unresolved_citations"], 1);
    }

    #[tokio::test]
    async fn falls_back_to_static_client() {
        let (app, dir) = test_app().await;
        let response = app
            .oneshot(get_request("/index.html"))
            .await
            .expect("response");
        cleanup(&dir);

        assert_eq!(response.status(), StatusCode::OK);
        assert!(!response.headers().contains_key(header::CACHE_CONTROL));
    }

    #[test]
    fn immutable_cache_for_hashed_bundle_assets() {
        assert_eq!(
            cache_control_for_path("/recognition-map-client-71578f6b278221f3_bg.wasm"),
            Some("public, max-age=31536000, immutable")
        );
        assert_eq!(
            cache_control_for_path("/input-a93762ff3bf6d63a.css"),
            Some("public, max-age=31536000, immutable")
        );
    }

    #[test]
    fn short_cache_for_unhashed_static_assets() {
        assert_eq!(
            cache_control_for_path("/fonts/inter-regular.woff2"),
            Some("public, max-age=86400")
        );
        assert_eq!(cache_control_for_path("/favicon.ico"), Some("public, max-age=86400"));
    }

    #[test]
    fn no_cache_header_override_for_html_or_unhashed_bundles() {
        assert_eq!(cache_control_for_path("/"), None);
        assert_eq!(cache_control_for_path("/index.html"), None);
        assert_eq!(cache_control_for_path("/recognition-map-client.js"), None);
    }
}
