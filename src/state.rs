/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 * - auth_options は起動時に固定し、以降は read-only（同期不要）
 */
use std::sync::Arc;

use crate::services::auth::app_service::AppServiceAuthOptions;

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth_options: Arc<AppServiceAuthOptions>,
}

impl AppState {
    pub fn new(auth_options: AppServiceAuthOptions) -> Self {
        Self {
            auth_options: Arc::new(auth_options),
        }
    }
}
