/*
 * Responsibility
 * - middleware の公開インターフェース (re-export)
 * - auth (App Service 認証), http (Request-Id / Trace / Timeout)
 */
pub mod auth;
pub mod http;
