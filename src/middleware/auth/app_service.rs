//! App Service 認証 scheme → Principal を extensions に入れる
//!
//! - authenticate はヘッダの decode だけなので全リクエストで実行する
//! - Success なら Principal を request extensions に格納する
//! - NoResult は素通し（この scheme は排他的権限を主張しない）。
//!   認証必須ルートでの challenge は extractor の rejection 側で行う

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::services::auth::app_service::{self, AuthOutcome};
use crate::state::AppState;

/// Router 全体に App Service 認証を掛ける。
///
/// 例：
/// ```ignore
/// let app = api::routes();
/// let app = middleware::auth::app_service::apply(app, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, authenticate_middleware))
}

async fn authenticate_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match app_service::authenticate(req.headers(), &state.auth_options) {
        AuthOutcome::Success(principal) => {
            tracing::debug!(name = ?principal.name(), "app service principal decoded");
            // middleware → extractor への受け渡し
            req.extensions_mut().insert(principal);
        }
        AuthOutcome::NoResult => {
            // 未認証のまま進める。保護ルートに届いた時点で challenge になる
        }
    }

    next.run(req).await
}
