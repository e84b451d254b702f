/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, RESOURCE_IDENTIFIER, claim type 上書きなど)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - ここで一度だけ読み、以降はプロセス内 read-only
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use axum::http::StatusCode;

use crate::services::auth::app_service::AppServiceAuthOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    /// ツール API（MCP サーバ）の URI。challenge の `resource=` クエリにも使う
    pub resource_identifier: String,

    /// Some なら claim type のデフォルトを上書きする
    pub name_claim_type: Option<String>,
    pub role_claim_type: Option<String>,

    /// 未認証時のステータス。302 以外を設定すると redirect しなくなる
    pub missing_auth_status: StatusCode,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let resource_identifier = std::env::var("RESOURCE_IDENTIFIER")
            .map_err(|_| ConfigError::Missing("RESOURCE_IDENTIFIER"))?;

        // URI として解釈できない resource は login クエリを壊すので起動時に弾く
        url::Url::parse(&resource_identifier)
            .map_err(|_| ConfigError::Invalid("RESOURCE_IDENTIFIER"))?;

        let name_claim_type = std::env::var("AUTH_NAME_CLAIM_TYPE")
            .ok()
            .filter(|s| !s.is_empty());

        let role_claim_type = std::env::var("AUTH_ROLE_CLAIM_TYPE")
            .ok()
            .filter(|s| !s.is_empty());

        let missing_auth_status = match std::env::var("AUTH_MISSING_STATUS_CODE") {
            Err(_) => StatusCode::FOUND,
            Ok(raw) => raw
                .parse::<u16>()
                .ok()
                .and_then(|code| StatusCode::from_u16(code).ok())
                .ok_or(ConfigError::Invalid("AUTH_MISSING_STATUS_CODE"))?,
        };

        Ok(Self {
            addr,
            app_env,
            resource_identifier,
            name_claim_type,
            role_claim_type,
            missing_auth_status,
        })
    }

    /// Config → scheme 設定。challenge クエリはここで組み立てて固定する
    pub fn auth_options(&self) -> AppServiceAuthOptions {
        AppServiceAuthOptions {
            missing_auth_status: self.missing_auth_status,
            challenge_query: format!("resource={}", self.resource_identifier),
            name_claim_type: self.name_claim_type.clone(),
            role_claim_type: self.role_claim_type.clone(),
        }
    }
}
