/*
 * Responsibility
 * - ドメインロジック（HTTP/Router 非依存に近い層）の公開ポイント
 */
pub mod auth;
