//! Token authentication for the method envelope.
//!
//! The expected token is a lower-case hex SHA-512 digest derived from the
//! caller's identity. Regular callers hash `account + login + SALT`; the
//! admin login hashes the current local hour (`YYYYMMDDHH`) and the admin
//! salt, so admin tokens roll over once per hour.
//!
//! The admin digest is computed at check time and compared once; a
//! request racing an hour boundary between derivation and comparison is
//! accepted behavior and must not be widened with grace periods.

use crate::request::MethodRequest;
use chrono::Local;
use sha2::{Digest, Sha512};

/// Shared secret mixed into regular caller tokens.
pub const SALT: &str = "Otus";

/// The privileged login name.
pub const ADMIN_LOGIN: &str = "admin";

/// Shared secret mixed into the hour-granular admin token.
pub const ADMIN_SALT: &str = "42";

/// Computes the lower-case hex SHA-512 digest of `input`.
///
/// Exposed so clients and tests can mint valid tokens.
#[must_use]
pub fn token_digest(input: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Checks the envelope's token against the expected digest.
///
/// The result never reveals which half of the credential check failed;
/// callers surface any `false` as a plain FORBIDDEN.
#[must_use]
pub fn check_auth(request: &MethodRequest) -> bool {
    let expected = if request.is_admin() {
        let hour = Local::now().format("%Y%m%d%H").to_string();
        token_digest(&format!("{hour}{ADMIN_SALT}"))
    } else {
        let account = request.account().unwrap_or_default();
        let login = request.login().unwrap_or_default();
        token_digest(&format!("{account}{login}{SALT}"))
    };
    request.token() == Some(expected.as_str())
}

/// Derives the token a regular caller must present.
#[must_use]
pub fn user_token(account: &str, login: &str) -> String {
    token_digest(&format!("{account}{login}{SALT}"))
}

/// Derives the token the admin caller must present for the current hour.
#[must_use]
pub fn admin_token() -> String {
    let hour = Local::now().format("%Y%m%d%H").to_string();
    token_digest(&format!("{hour}{ADMIN_SALT}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};

    fn envelope(pairs: &[(&str, Value)]) -> MethodRequest {
        let body: Map<String, Value> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect();
        MethodRequest::new(&body)
    }

    #[test]
    fn test_digest_is_lowercase_hex_sha512() {
        let digest = token_digest("horns&hoofsvasyaOtus");
        assert_eq!(digest.len(), 128);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_user_token_accepted() {
        let request = envelope(&[
            ("account", json!("horns&hoofs")),
            ("login", json!("vasya")),
            ("token", json!(user_token("horns&hoofs", "vasya"))),
        ]);
        assert!(check_auth(&request));
    }

    #[test]
    fn test_absent_account_defaults_to_empty() {
        let request = envelope(&[
            ("login", json!("vasya")),
            ("token", json!(user_token("", "vasya"))),
        ]);
        assert!(check_auth(&request));
    }

    #[test]
    fn test_wrong_or_empty_token_rejected() {
        for token in [json!("123"), json!("")] {
            let request = envelope(&[
                ("account", json!("horns&hoofs")),
                ("login", json!("h&f")),
                ("token", token),
            ]);
            assert!(!check_auth(&request));
        }
    }

    #[test]
    fn test_admin_token_uses_the_hour_digest() {
        let request = envelope(&[
            ("login", json!("admin")),
            ("token", json!(admin_token())),
        ]);
        assert!(check_auth(&request));
    }

    #[test]
    fn test_admin_rejects_user_style_token() {
        let request = envelope(&[
            ("account", json!("horns&hoofs")),
            ("login", json!("admin")),
            ("token", json!(user_token("horns&hoofs", "admin"))),
        ]);
        assert!(!check_auth(&request));
    }
}
