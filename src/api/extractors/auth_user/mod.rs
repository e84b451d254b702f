/*!
 * Authenticated principal extractor
 *
 * Responsibility:
 * - 認証済みリクエストの Principal を handler に提供する
 * - 未認証時の challenge（redirect / status）を rejection として返す
 *
 * Public API:
 * - AuthUser
 * - MaybeUser
 */

mod core;

pub use self::core::{AuthUser, MaybeUser};
