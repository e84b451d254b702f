/*
 * Responsibility
 * - App Service 認証で使う「型（契約）」の定義
 * - middleware / extractor はこの型だけを見る。decode のロジックは core 側の責務
 *
 * Notes
 * - Claim / ClientIdentity / Principal はリクエスト毎に生成し、共有しない
 * - AppServiceAuthOptions はプロセス起動時に一度だけ構築する (AppState 経由で Arc 共有)
 */

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

/// リバースプロキシが注入する「IdP マーカー」ヘッダ
///
/// 存在チェックのみに使う。値そのものは見ない（プロキシはセッションが
/// 無くても投機的に付けてくることがある）。
pub const IDP_HEADER: &str = "x-ms-client-principal-idp";

/// base64(JSON) エンコードされた claims ペイロードのヘッダ
pub const CLIENT_PRINCIPAL_HEADER: &str = "x-ms-client-principal";

/// プロキシのログインエンドポイントのプロバイダ名
/// (`/.auth/login/<provider>`)
pub const LOGIN_PROVIDER: &str = "authlete";

/// App Service 認証は subject を nameidentifier claim に変換するので、
/// name claim type のデフォルトはそれに合わせる
pub const DEFAULT_NAME_CLAIM_TYPE: &str =
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier";

pub const DEFAULT_ROLE_CLAIM_TYPE: &str =
    "http://schemas.microsoft.com/ws/2008/06/identity/claims/role";

/// 1 つの claim。同じ type の claim が複数あってもよい（例: role）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub claim_type: String,
    pub value: String,
}

impl Claim {
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }
}

/// ヘッダから復元した identity（claims の順序は入力のまま保持する）
///
/// - `name_claim_type` / `role_claim_type` はデプロイ毎に差し替え可能
/// - claims が 0 件でも「identity は存在する」扱い
#[derive(Debug, Clone)]
pub struct ClientIdentity {
    claims: Vec<Claim>,
    name_claim_type: String,
    role_claim_type: String,
}

impl ClientIdentity {
    pub fn new(
        claims: Vec<Claim>,
        name_claim_type: Option<&str>,
        role_claim_type: Option<&str>,
    ) -> Self {
        Self {
            claims,
            name_claim_type: name_claim_type.unwrap_or(DEFAULT_NAME_CLAIM_TYPE).to_string(),
            role_claim_type: role_claim_type.unwrap_or(DEFAULT_ROLE_CLAIM_TYPE).to_string(),
        }
    }

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    pub fn name_claim_type(&self) -> &str {
        &self.name_claim_type
    }

    pub fn role_claim_type(&self) -> &str {
        &self.role_claim_type
    }

    /// name claim type に一致する最初の claim の値
    pub fn name(&self) -> Option<&str> {
        self.claims
            .iter()
            .find(|c| c.claim_type == self.name_claim_type)
            .map(|c| c.value.as_str())
    }

    /// role claim type に一致する claim の値すべて（順序保持）
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.claims
            .iter()
            .filter(|c| c.claim_type == self.role_claim_type)
            .map(|c| c.value.as_str())
    }
}

/// 認証済みの呼び出し主体。リクエスト毎に生成し、リクエスト終了で破棄する
#[derive(Debug, Clone)]
pub struct Principal {
    identity: ClientIdentity,
}

impl Principal {
    pub fn new(identity: ClientIdentity) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &ClientIdentity {
        &self.identity
    }

    pub fn name(&self) -> Option<&str> {
        self.identity.name()
    }

    pub fn claims(&self) -> &[Claim] {
        self.identity.claims()
    }

    pub fn is_in_role(&self, role: &str) -> bool {
        self.identity.roles().any(|r| r == role)
    }
}

/// scheme の設定。起動時に Config から一度だけ構築する
#[derive(Debug, Clone)]
pub struct AppServiceAuthOptions {
    /// 未認証時のレスポンス。302 なら login へ redirect、それ以外は素のステータス
    pub missing_auth_status: StatusCode,
    /// login redirect に付加するクエリ（例: `resource=<identifier>`）
    pub challenge_query: String,
    pub name_claim_type: Option<String>,
    pub role_claim_type: Option<String>,
}

impl Default for AppServiceAuthOptions {
    fn default() -> Self {
        Self {
            missing_auth_status: StatusCode::FOUND,
            challenge_query: String::new(),
            name_claim_type: None,
            role_claim_type: None,
        }
    }
}

/// authenticate の結果
///
/// NoResult は「失敗」ではない。この scheme はリクエストの排他的権限を
/// 主張しないので、後続の scheme に委ねる（チェーン構成を想定した契約）
#[derive(Debug)]
pub enum AuthOutcome {
    Success(Principal),
    NoResult,
}

/// challenge の結果。HTTP への書き出しは axum 側（IntoResponse）に寄せ、
/// 構築そのものは純粋に保つ
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeAction {
    /// login エンドポイントへの redirect（302 + Location）
    Redirect(String),
    /// body なしの素のステータスコード
    Status(StatusCode),
}

impl IntoResponse for ChallengeAction {
    fn into_response(self) -> Response {
        match self {
            ChallengeAction::Redirect(target) => {
                (StatusCode::FOUND, [(header::LOCATION, target)]).into_response()
            }
            ChallengeAction::Status(status) => status.into_response(),
        }
    }
}
