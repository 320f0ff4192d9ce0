//! Owner key generation.
//!
//! An owner key is the opaque per-video capability token issued at ingest
//! and checked (via the `X-Owner-Key` header) on every privileged
//! operation. It is stored as-is; possession of the token is the
//! credential.

use rand::Rng;

/// Length of a generated owner key, in alphanumeric characters.
pub const KEY_LENGTH: usize = 48;

/// Generate a new random owner key.
pub fn generate_owner_key() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(KEY_LENGTH)
        .map(char::from)
        .collect()
}
