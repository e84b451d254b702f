/*
 * Responsibility
 * - デモの画面系ルート
 *   - GET /          匿名でも見えるトップ（ログイン状態で出し分け）
 *   - GET /chat      認証必須。chat ページ（静的 HTML）を返す
 *   - GET /startAuth 認証必須。プロキシの login エンドポイントへ誘導する
 */
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect};

use crate::api::extractors::{AuthUser, MaybeUser};
use crate::error::AppError;
use crate::services::auth::app_service::login_redirect_target;
use crate::state::AppState;

pub async fn home(MaybeUser(principal): MaybeUser) -> impl IntoResponse {
    match principal {
        Some(principal) => {
            let name = principal.name().unwrap_or("unknown");
            Html(format!(
                "<h1>Hello {name}</h1> <a href=\"/chat\">start chat</a><br/>\
                 <a href=\"/.auth/logout?post_logout_redirect_uri=/\">Logout</a>"
            ))
        }
        None => Html("<a href=\"/startAuth\">Login</a>".to_string()),
    }
}

pub async fn chat(AuthUser(_principal): AuthUser) -> Result<Html<String>, AppError> {
    let html = tokio::fs::read_to_string("static/chat.html")
        .await
        .map_err(|err| {
            tracing::warn!(error = ?err, "failed to read chat page");
            AppError::Internal
        })?;
    Ok(Html(html))
}

/// 明示的なログイン開始。challenge と同じ login URL を使い、
/// 戻り先（state）には Referer を入れる（原則トップか chat ページ）
pub async fn start_auth(
    AuthUser(_principal): AuthUser,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Redirect {
    let referer = headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("/");

    Redirect::to(&login_redirect_target(referer, &state.auth_options))
}
