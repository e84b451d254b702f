/*
 * Responsibility
 * - GET /health (疎通用)
 * - 認証 middleware を通しても素通りすることの確認にも使う
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
