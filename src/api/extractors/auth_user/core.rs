use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::services::auth::app_service::{self, ChallengeAction, Principal};
use crate::state::AppState;

/// Handler で認証済み Principal を受け取るための extractor
///
/// middleware が Principal を request.extensions() に insert 済みである前提。
/// 見つからない場合の rejection が challenge そのもの：
/// 302 設定なら元のパスを `state` に載せて login へ redirect、
/// それ以外は設定されたステータスコードを返す
pub struct AuthUser(pub Principal);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ChallengeAction;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(principal) = parts.extensions.get::<Principal>() {
            return Ok(AuthUser(principal.clone()));
        }

        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");

        Err(app_service::challenge(path_and_query, &state.auth_options))
    }
}

/// 匿名アクセスも許すページ用。Principal があれば Some で渡す
pub struct MaybeUser(pub Option<Principal>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(parts.extensions.get::<Principal>().cloned()))
    }
}
