/*
 * Responsibility
 * - Config読み込み → 依存生成 → Router 組み立て
 * - Middleware の適用 (App Service 認証 / HTTP infra)
 * - axum::serve() で起動
 */
use std::{panic, process};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{api, config::Config, middleware, state::AppState};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,appservice_auth_demo=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panics via tracing so they don't get "lost"
        // (stderr can be hidden depending on how the process is launched.)
        tracing::error!(?info, "panic");

        // In development, fail fast. In production, keep the server running.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    let abort_on_panic = !config.app_env.is_production();
    init_panic_hook(abort_on_panic);

    tracing::info!(
        "starting demo client in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = AppState::new(config.auth_options());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: AppState) -> Router {
    let app = api::routes();
    // 認証 scheme はルーティングの外側（全ルート）に掛ける
    let app = middleware::auth::app_service::apply(app, state.clone());
    let app = app.with_state(state);
    middleware::http::apply(app)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use tower::util::ServiceExt;

    use super::*;
    use crate::services::auth::app_service::{
        AppServiceAuthOptions, CLIENT_PRINCIPAL_HEADER, IDP_HEADER,
    };

    fn test_state(options: AppServiceAuthOptions) -> AppState {
        AppState::new(AppServiceAuthOptions {
            challenge_query: "resource=https://api.example.com".to_string(),
            ..options
        })
    }

    fn principal_header() -> String {
        BASE64.encode(
            r#"{"auth_typ":"authlete","claims":[
                {"typ":"iss","val":"https://x"},
                {"typ":"http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier","val":"1003"}
            ]}"#,
        )
    }

    #[tokio::test]
    async fn health_does_not_require_auth() {
        let app = build_router(test_state(AppServiceAuthOptions::default()));
        let res = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn protected_route_without_principal_redirects_to_login() {
        let app = build_router(test_state(AppServiceAuthOptions::default()));
        let res = app
            .oneshot(Request::get("/chat?x=1").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::FOUND);
        let location = res.headers()[header::LOCATION].to_str().unwrap();
        assert!(location.starts_with("/.auth/login/authlete?state=%2Fchat%3Fx%3D1&"));
    }

    #[tokio::test]
    async fn status_mode_returns_bare_status_without_location() {
        let app = build_router(test_state(AppServiceAuthOptions {
            missing_auth_status: StatusCode::UNAUTHORIZED,
            ..Default::default()
        }));
        let res = app
            .oneshot(Request::get("/headers").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(!res.headers().contains_key(header::LOCATION));
    }

    #[tokio::test]
    async fn home_greets_the_decoded_principal() {
        let app = build_router(test_state(AppServiceAuthOptions::default()));
        let res = app
            .oneshot(
                Request::get("/")
                    .header(IDP_HEADER, "authlete")
                    .header(CLIENT_PRINCIPAL_HEADER, principal_header())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let body = axum::body::to_bytes(res.into_body(), 64 * 1024).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("Hello 1003"));
    }

    #[tokio::test]
    async fn home_offers_login_when_anonymous() {
        let app = build_router(test_state(AppServiceAuthOptions::default()));
        let res = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let body = axum::body::to_bytes(res.into_body(), 64 * 1024).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("/startAuth"));
    }

    #[tokio::test]
    async fn headers_endpoint_reflects_inbound_headers() {
        let app = build_router(test_state(AppServiceAuthOptions::default()));
        let res = app
            .oneshot(
                Request::get("/headers")
                    .header(IDP_HEADER, "authlete")
                    .header(CLIENT_PRINCIPAL_HEADER, principal_header())
                    .header("x-custom", "value-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let body = axum::body::to_bytes(res.into_body(), 64 * 1024).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("x-custom: value-1"));
    }
}
