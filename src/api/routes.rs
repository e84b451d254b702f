/*
 * Responsibility
 * - URL 構造の定義
 * - どのルートが認証必須かは handler 側の extractor（AuthUser / MaybeUser）で決まる
 */
use axum::{Router, routing::get};

use crate::api::handlers::{
    debug::headers,
    health::health,
    pages::{chat, home, start_auth},
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/chat", get(chat))
        .route("/startAuth", get(start_auth))
        .route("/headers", get(headers))
}
