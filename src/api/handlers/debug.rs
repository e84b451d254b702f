/*
 * Responsibility
 * - GET /headers (認証必須)
 * - プロキシが実際に注入してくるヘッダを目視確認するためのデバッグ用
 */
use std::fmt::Write as _;

use axum::http::HeaderMap;

use crate::api::extractors::AuthUser;

pub async fn headers(AuthUser(_principal): AuthUser, headers: HeaderMap) -> String {
    let mut out = String::new();
    for (name, value) in &headers {
        let value = value.to_str().unwrap_or("<binary>");
        let _ = writeln!(out, "{name}: {value}");
    }
    out
}
