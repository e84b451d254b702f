/*!
 * App Service external-provider authentication
 *
 * Responsibility:
 * - プロキシ注入ヘッダの decode（core::decode_client_principal）
 * - authenticate / challenge の 2 操作（core）
 * - 型（契約）は types に分離する
 *
 * Public API:
 * - authenticate / challenge / decode_client_principal
 * - Principal / ClientIdentity / Claim / AppServiceAuthOptions
 * - AuthOutcome / ChallengeAction
 */

mod core;
mod types;

pub use self::core::{authenticate, challenge, decode_client_principal, login_redirect_target};
pub use self::types::{
    AppServiceAuthOptions, AuthOutcome, CLIENT_PRINCIPAL_HEADER, ChallengeAction, Claim,
    ClientIdentity, IDP_HEADER, Principal,
};
