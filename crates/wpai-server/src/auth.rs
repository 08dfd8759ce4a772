//! Access gate: shared-credential authentication.
//!
//! The credential is stored once in the settings store and generated on first
//! start. Every route sits behind [`auth_middleware`], which compares the
//! `x-wpai-token` header against it in constant time. When no credential is
//! initialized, every request is rejected (fail-closed).

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use rand::distributions::Alphanumeric;
use rand::Rng;
use subtle::ConstantTimeEq;

use wpai_storage::{SettingsStore, StorageError};

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the shared credential.
pub const TOKEN_HEADER: &str = "x-wpai-token";

/// Settings key the credential is persisted under.
pub const TOKEN_OPTION: &str = "wpai_api_token";

const TOKEN_LEN: usize = 32;

/// The shared credential, initialized once per process.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Credential").field(&"[redacted]").finish()
    }
}

impl Credential {
    /// Loads the stored credential, generating and persisting a fresh one if
    /// none exists yet. A stored credential is never replaced.
    pub fn load_or_init<S: SettingsStore + ?Sized>(store: &mut S) -> Result<Self, StorageError> {
        if let Some(existing) = store.get_string(TOKEN_OPTION)? {
            if !existing.is_empty() {
                return Ok(Credential(existing));
            }
        }

        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LEN)
            .map(char::from)
            .collect();
        store.set_option(TOKEN_OPTION, serde_json::Value::String(token.clone()))?;
        tracing::info!("generated new API credential");
        Ok(Credential(token))
    }

    /// Exposes the raw credential (for operators printing it out).
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Checks a caller-supplied credential against this one.
    pub fn authorize(&self, supplied: &str) -> bool {
        authorize(&self.0, supplied)
    }
}

/// Fail-closed constant-time credential comparison.
///
/// Both inputs are padded to the longer length before comparing so the
/// running time depends on neither the content nor which input is shorter.
pub fn authorize(stored: &str, supplied: &str) -> bool {
    if stored.is_empty() || supplied.is_empty() {
        return false;
    }

    let max_len = stored.len().max(supplied.len());
    let mut a = vec![0u8; max_len];
    let mut b = vec![0u8; max_len];
    a[..stored.len()].copy_from_slice(stored.as_bytes());
    b[..supplied.len()].copy_from_slice(supplied.as_bytes());

    let lengths_equal = (stored.len() as u64).ct_eq(&(supplied.len() as u64));
    let contents_equal = a.ct_eq(&b);
    (lengths_equal & contents_equal).into()
}

/// Middleware rejecting requests without a matching `x-wpai-token` header.
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let supplied = request
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let authorized = state
        .credential
        .as_ref()
        .map(|credential| credential.authorize(supplied))
        .unwrap_or(false);

    if !authorized {
        tracing::debug!(path = %request.uri().path(), "rejected request without valid token");
        return ApiError::Unauthorized.into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use wpai_storage::InMemoryStore;

    #[test]
    fn compare_matches_only_identical_tokens() {
        assert!(authorize("secret", "secret"));
        assert!(!authorize("secret", "Secret"));
        assert!(!authorize("secret", "secre"));
        assert!(!authorize("secret", "secrets"));
        assert!(!authorize("secret\0", "secret"));
    }

    #[test]
    fn empty_values_fail_closed() {
        assert!(!authorize("", ""));
        assert!(!authorize("secret", ""));
        assert!(!authorize("", "secret"));
    }

    #[test]
    fn credential_is_generated_once() {
        let mut store = InMemoryStore::new();
        let first = Credential::load_or_init(&mut store).unwrap();
        let second = Credential::load_or_init(&mut store).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.expose().len(), TOKEN_LEN);
        assert!(first.authorize(second.expose()));
    }

    #[test]
    fn existing_credential_is_kept() {
        let mut store = InMemoryStore::new();
        store
            .set_option(TOKEN_OPTION, serde_json::json!("operator-chosen"))
            .unwrap();
        let credential = Credential::load_or_init(&mut store).unwrap();
        assert_eq!(credential.expose(), "operator-chosen");
    }

    #[test]
    fn debug_output_is_redacted() {
        let credential = Credential("hunter2".into());
        assert!(!format!("{:?}", credential).contains("hunter2"));
    }
}
