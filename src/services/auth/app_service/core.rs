//! App Service authentication - core logic.
//!
//! This module is intentionally "core-only": it does not know about Axum
//! extractors or the router. Middleware calls `authenticate` and (when a
//! protected route saw no principal) `challenge`.
//!
//! Trust model: the upstream reverse proxy has already authenticated the
//! caller and injects two headers. The marker header alone is NOT proof of
//! identity - the proxy may inject it speculatively even without a user
//! session - so only a successfully decoded claims payload produces a
//! principal. Every decode failure degrades to "absent", never to an error.

use axum::http::{HeaderMap, StatusCode};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;
use tracing::debug;

use super::types::{
    AppServiceAuthOptions, AuthOutcome, CLIENT_PRINCIPAL_HEADER, ChallengeAction, Claim,
    ClientIdentity, IDP_HEADER, LOGIN_PROVIDER, Principal,
};

/// Escape set for the `state` query parameter: everything except the
/// RFC 3986 unreserved characters.
const STATE_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Decoded shape of the claims header:
/// `{"auth_typ":...,"claims":[{"typ":...,"val":...},...],"name_typ":...,"role_typ":...}`
///
/// Only `claims` matters here; other fields are ignored. Entries missing
/// `typ` or `val` are dropped without affecting the rest.
#[derive(Debug, Deserialize)]
struct ClientPrincipalPayload {
    claims: Vec<RawClaim>,
}

#[derive(Debug, Deserialize)]
struct RawClaim {
    #[serde(default)]
    typ: Option<String>,
    #[serde(default)]
    val: Option<String>,
}

/// Decode the proxy-injected headers into a [`ClientIdentity`].
///
/// Returns `None` ("absent") when:
/// - the marker header is missing or empty,
/// - the claims header is missing,
/// - the claims header is not base64 / not UTF-8 / not the expected JSON,
/// - the JSON object has no `claims` array.
///
/// Zero surviving claims still yields `Some` - an empty identity counts as
/// present. Pure: same header bytes, same result.
pub fn decode_client_principal(
    headers: &HeaderMap,
    name_claim_type: Option<&str>,
    role_claim_type: Option<&str>,
) -> Option<ClientIdentity> {
    let idp = headers.get(IDP_HEADER).and_then(|v| v.to_str().ok())?;
    if idp.is_empty() {
        return None;
    }

    let encoded = headers
        .get(CLIENT_PRINCIPAL_HEADER)
        .and_then(|v| v.to_str().ok())?;

    let decoded = match BASE64.decode(encoded) {
        Ok(bytes) => bytes,
        Err(err) => {
            debug!(error = ?err, "client principal header is not valid base64");
            return None;
        }
    };

    let text = match String::from_utf8(decoded) {
        Ok(text) => text,
        Err(err) => {
            debug!(error = ?err, "client principal payload is not valid utf-8");
            return None;
        }
    };

    let payload = match serde_json::from_str::<ClientPrincipalPayload>(&text) {
        Ok(payload) => payload,
        Err(err) => {
            debug!(error = ?err, "client principal payload is not the expected json");
            return None;
        }
    };

    let claims = payload
        .claims
        .into_iter()
        .filter_map(|raw| match (raw.typ, raw.val) {
            (Some(typ), Some(val)) => Some(Claim::new(typ, val)),
            _ => None,
        })
        .collect();

    Some(ClientIdentity::new(claims, name_claim_type, role_claim_type))
}

/// Authenticate the request from its headers.
///
/// Decodable headers become `Success(Principal)`; anything else is
/// `NoResult` so a later scheme in the chain may still succeed. This never
/// fails - malformed payloads are treated as "no identity".
pub fn authenticate(headers: &HeaderMap, options: &AppServiceAuthOptions) -> AuthOutcome {
    match decode_client_principal(
        headers,
        options.name_claim_type.as_deref(),
        options.role_claim_type.as_deref(),
    ) {
        Some(identity) => AuthOutcome::Success(Principal::new(identity)),
        None => AuthOutcome::NoResult,
    }
}

/// Proxy login URL with `state` carrying where to send the user afterwards:
/// `/.auth/login/<provider>?state=<escaped>&<configured query>`.
pub fn login_redirect_target(return_to: &str, options: &AppServiceAuthOptions) -> String {
    let state = utf8_percent_encode(return_to, STATE_ESCAPE);
    format!(
        "/.auth/login/{LOGIN_PROVIDER}?state={state}&{}",
        options.challenge_query
    )
}

/// Build the challenge for an unauthenticated request to a protected route.
///
/// In the default redirect mode (302) the original path+query is carried in
/// the `state` parameter so the login flow can send the user back. Any other
/// configured status is emitted as-is, with no redirect.
pub fn challenge(path_and_query: &str, options: &AppServiceAuthOptions) -> ChallengeAction {
    if options.missing_auth_status == StatusCode::FOUND {
        ChallengeAction::Redirect(login_redirect_target(path_and_query, options))
    } else {
        ChallengeAction::Status(options.missing_auth_status)
    }
}
