//! Session resolution from the stored bearer token.
//!
//! The token is a JWT issued by the backend. The client reads its claims
//! without verifying the signature (the issuing backend and the TLS channel
//! are trusted for that) and only checks the expiry locally, at decode
//! time. A token that cannot be decoded, carries an unknown role, or has
//! expired is discarded from storage so the next start does not retry it.

pub mod store;

pub use store::TokenStore;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use serde::Deserialize;
use tracing::debug;

use crate::models::Role;

/// Claims carried by the backend's tokens.
#[derive(Debug, Deserialize)]
struct Claims {
    /// Numeric user id.
    id: i64,
    /// Subject claim, set to the account email.
    sub: String,
    /// Role, with or without the `ROLE_` prefix.
    role: String,
    /// Expiry, seconds since the epoch.
    exp: i64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    avatar: Option<String>,
}

/// The authenticated user as derived from the token.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: i64,
    pub email: String,
    pub role: Role,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Resolve the current session from the store.
///
/// A missing token yields `None`. A token that decodes but is unusable also
/// yields `None` *and is removed from the store*. Never panics and never
/// returns an error.
pub fn resolve(store: &TokenStore) -> Option<Session> {
    let token = store.load()?;
    match session_from_token(&token) {
        Some(session) => Some(session),
        None => {
            store.clear();
            None
        }
    }
}

/// Decode a bearer token into a session without touching storage.
pub fn session_from_token(token: &str) -> Option<Session> {
    let claims = decode_claims(token)?;

    if claims.exp <= Utc::now().timestamp() {
        debug!("token is expired");
        return None;
    }

    let role = match Role::from_claim(&claims.role) {
        Some(role) => role,
        None => {
            debug!(role = %claims.role, "token carries an unknown role");
            return None;
        }
    };

    Some(Session {
        user_id: claims.id,
        email: claims.sub,
        role,
        display_name: claims.name,
        avatar_url: claims.avatar,
    })
}

/// Decode the payload segment of a JWT. No signature check.
fn decode_claims(token: &str) -> Option<Claims> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next()) {
        (Some(_header), Some(payload)) => payload,
        _ => return None,
    };
    // Some issuers pad their base64url; the decoder here does not expect it.
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_token(claims: serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
        format!("{header}.{payload}.signature-not-checked")
    }

    fn future_exp() -> i64 {
        Utc::now().timestamp() + 3600
    }

    #[test]
    fn valid_token_yields_a_session() {
        let token = make_token(json!({
            "id": 12,
            "sub": "lina@example.com",
            "role": "ROLE_PROVIDER",
            "name": "Lina",
            "exp": future_exp(),
        }));
        let session = session_from_token(&token).unwrap();
        assert_eq!(session.user_id, 12);
        assert_eq!(session.email, "lina@example.com");
        assert_eq!(session.role, Role::Provider);
        assert_eq!(session.display_name.as_deref(), Some("Lina"));
    }

    #[test]
    fn unprefixed_role_claim_is_accepted() {
        let token = make_token(json!({
            "id": 1, "sub": "a@b.c", "role": "admin", "exp": future_exp(),
        }));
        assert_eq!(session_from_token(&token).unwrap().role, Role::Admin);
    }

    #[test]
    fn expired_token_resolves_to_no_session_and_is_cleared() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("session.token"));
        let token = make_token(json!({
            "id": 1,
            "sub": "a@b.c",
            "role": "ROLE_CLIENT",
            "exp": Utc::now().timestamp() - 60,
        }));
        store.save(&token).unwrap();

        assert_eq!(resolve(&store), None);
        assert!(!store.exists());
    }

    #[test]
    fn unknown_role_resolves_to_no_session_and_is_cleared() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("session.token"));
        let token = make_token(json!({
            "id": 1, "sub": "a@b.c", "role": "ROLE_SUPERUSER", "exp": future_exp(),
        }));
        store.save(&token).unwrap();

        assert_eq!(resolve(&store), None);
        assert!(!store.exists());
    }

    #[test]
    fn garbage_token_resolves_to_no_session_and_is_cleared() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("session.token"));
        store.save("not-a-jwt").unwrap();

        assert_eq!(resolve(&store), None);
        assert!(!store.exists());
    }

    #[test]
    fn missing_token_resolves_to_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("session.token"));
        assert_eq!(resolve(&store), None);
    }

    #[test]
    fn padded_payload_segment_still_decodes() {
        let payload = base64::engine::general_purpose::URL_SAFE.encode(
            json!({"id": 2, "sub": "x@y.z", "role": "CLIENT", "exp": future_exp()})
                .to_string()
                .as_bytes(),
        );
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256"}"#);
        let token = format!("{header}.{payload}.sig");
        assert!(session_from_token(&token).is_some());
    }
}
