use axum::Json;
use axum::extract::State;

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let summary = state.content.summary();
    Json(serde_json::json!({
        "status": "ok",
        "server_version": env!("CARGO_PKG_VERSION"),
        "dataset": summary,
    }))
}
