// src/session.rs

//! Signed-in user state.
//!
//! The bearer token is kept in the session store and decoded client-side to
//! recover who the user is and what they may open. A token that cannot be
//! decoded, or has expired, is dropped and the user is treated as signed out.
//! The selected UI language lives in the durable store.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};

use crate::error::{AppError, Result};
use crate::models::{Claims, Config, LocaleConfig, Role, SessionConfig};
use crate::storage::KeyValueStore;

/// Who the bearer token says the user is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub expires_at: DateTime<Utc>,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
            expires_at: DateTime::from_timestamp(claims.exp as i64, 0).unwrap_or_default(),
        }
    }
}

/// Access rule attached to a screen or command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    Public,
    /// Only while signed out (sign-in, register)
    GuestOnly,
    Authenticated,
    /// Employees and admins
    Staff,
    Admin,
}

/// Decode token claims without verifying the signature; expiry is checked.
pub fn decode_claims(token: &str) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_aud = false;
    let data = jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(data.claims)
}

#[derive(Debug, Clone)]
struct Credential {
    token: String,
    identity: Identity,
}

/// Credential and language owner shared by the API client and front ends.
pub struct SessionState {
    session_store: Arc<dyn KeyValueStore>,
    durable_store: Arc<dyn KeyValueStore>,
    keys: SessionConfig,
    locale: LocaleConfig,
    current: RwLock<Option<Credential>>,
}

impl SessionState {
    pub fn new(
        config: &Config,
        session_store: Arc<dyn KeyValueStore>,
        durable_store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            session_store,
            durable_store,
            keys: config.session.clone(),
            locale: config.locale.clone(),
            current: RwLock::new(None),
        }
    }

    /// Reload the stored token, dropping it if it no longer decodes.
    pub async fn restore(&self) -> Result<Option<Identity>> {
        match self.session_store.get(&self.keys.token_key).await? {
            Some(token) => self.accept_token(&token).await,
            None => {
                self.set_current(None);
                Ok(None)
            }
        }
    }

    /// Store a freshly issued token. Returns `None` when it does not decode,
    /// in which case the session is left signed out.
    pub async fn accept_token(&self, token: &str) -> Result<Option<Identity>> {
        match decode_claims(token) {
            Ok(claims) => {
                let identity = Identity::from(claims);
                self.session_store.set(&self.keys.token_key, token).await?;
                self.set_current(Some(Credential {
                    token: token.to_string(),
                    identity: identity.clone(),
                }));
                log::debug!("Session active for user {}", identity.user_id);
                Ok(Some(identity))
            }
            Err(e) => {
                log::debug!("Discarding unusable credential: {}", e);
                self.logout().await?;
                Ok(None)
            }
        }
    }

    /// Forget the credential.
    pub async fn logout(&self) -> Result<()> {
        self.set_current(None);
        self.session_store.remove(&self.keys.token_key).await
    }

    fn set_current(&self, credential: Option<Credential>) {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = credential;
    }

    fn live_credential(&self) -> Option<Credential> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        guard
            .as_ref()
            .filter(|c| c.identity.expires_at > Utc::now())
            .cloned()
    }

    /// Bearer token, if signed in and not expired.
    pub fn token(&self) -> Option<String> {
        self.live_credential().map(|c| c.token)
    }

    pub fn identity(&self) -> Option<Identity> {
        self.live_credential().map(|c| c.identity)
    }

    pub fn is_logged_in(&self) -> bool {
        self.live_credential().is_some()
    }

    pub fn user_id(&self) -> Option<String> {
        self.identity().map(|i| i.user_id)
    }

    pub fn email(&self) -> Option<String> {
        self.identity().and_then(|i| i.email)
    }

    pub fn role(&self) -> Option<Role> {
        self.identity().and_then(|i| i.role)
    }

    pub fn can_access(&self, access: RouteAccess) -> bool {
        match access {
            RouteAccess::Public => true,
            RouteAccess::GuestOnly => !self.is_logged_in(),
            RouteAccess::Authenticated => self.is_logged_in(),
            RouteAccess::Staff => self.role().is_some_and(|r| r.is_staff()),
            RouteAccess::Admin => self.role() == Some(Role::Admin),
        }
    }

    /// Like `can_access`, with an error describing the refusal.
    pub fn require(&self, access: RouteAccess) -> Result<()> {
        if self.can_access(access) {
            return Ok(());
        }
        match access {
            RouteAccess::GuestOnly => Err(AppError::forbidden("already signed in")),
            _ if !self.is_logged_in() => Err(AppError::NotAuthenticated),
            _ => Err(AppError::forbidden(format!("{access:?} role required"))),
        }
    }

    /// Selected language, falling back to the configured default.
    pub async fn language(&self) -> Result<String> {
        let stored = self.durable_store.get(&self.keys.language_key).await?;
        Ok(stored
            .filter(|l| self.locale.supports(l))
            .unwrap_or_else(|| self.locale.default_language.clone()))
    }

    pub async fn set_language(&self, language: &str) -> Result<()> {
        if !self.locale.supports(language) {
            return Err(AppError::validation(format!(
                "unsupported language '{}' (supported: {})",
                language,
                self.locale.supported.join(", ")
            )));
        }
        self.durable_store
            .set(&self.keys.language_key, language)
            .await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::json;

    pub(crate) fn token_for(sub: &str, role: &str, ttl_secs: i64) -> String {
        let claims = json!({
            "sub": sub,
            "email": format!("{sub}@example.com"),
            "role": role,
            "exp": (Utc::now().timestamp() + ttl_secs),
        });
        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"server-secret"),
        )
        .unwrap()
    }

    fn session() -> (SessionState, Arc<MemoryStorage>, Arc<MemoryStorage>) {
        let session_store = Arc::new(MemoryStorage::new());
        let durable_store = Arc::new(MemoryStorage::new());
        let state = SessionState::new(
            &Config::default(),
            session_store.clone(),
            durable_store.clone(),
        );
        (state, session_store, durable_store)
    }

    #[test]
    fn test_decode_claims_without_secret() {
        let claims = decode_claims(&token_for("42", "CLIENT", 3600)).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.role, Some(Role::Client));
    }

    #[test]
    fn test_decode_rejects_expired_and_garbage() {
        assert!(decode_claims(&token_for("42", "CLIENT", -3600)).is_err());
        assert!(decode_claims("not-a-token").is_err());
    }

    #[tokio::test]
    async fn test_accept_token_persists_and_exposes_identity() {
        let (state, session_store, _) = session();
        let token = token_for("7", "EMPLOYEE", 3600);

        let identity = state.accept_token(&token).await.unwrap().unwrap();
        assert_eq!(identity.user_id, "7");
        assert_eq!(identity.email.as_deref(), Some("7@example.com"));
        assert_eq!(state.email().as_deref(), Some("7@example.com"));
        assert_eq!(state.token().as_deref(), Some(token.as_str()));
        assert_eq!(
            session_store.get("auth_token").await.unwrap().as_deref(),
            Some(token.as_str())
        );
        assert!(state.can_access(RouteAccess::Staff));
        assert!(!state.can_access(RouteAccess::Admin));
        assert!(!state.can_access(RouteAccess::GuestOnly));
    }

    #[tokio::test]
    async fn test_malformed_stored_token_signs_out_silently() {
        let (state, session_store, _) = session();
        session_store.set("auth_token", "garbage").await.unwrap();

        let identity = state.restore().await.unwrap();
        assert!(identity.is_none());
        assert!(!state.is_logged_in());
        assert!(session_store.get("auth_token").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_restore_valid_token() {
        let (state, session_store, _) = session();
        session_store
            .set("auth_token", &token_for("9", "ADMIN", 3600))
            .await
            .unwrap();

        let identity = state.restore().await.unwrap().unwrap();
        assert_eq!(identity.role, Some(Role::Admin));
        assert!(state.can_access(RouteAccess::Admin));
    }

    #[tokio::test]
    async fn test_require_errors() {
        let (state, _, _) = session();
        assert!(matches!(
            state.require(RouteAccess::Authenticated),
            Err(AppError::NotAuthenticated)
        ));
        assert!(state.require(RouteAccess::GuestOnly).is_ok());

        state
            .accept_token(&token_for("1", "CLIENT", 3600))
            .await
            .unwrap();
        assert!(matches!(
            state.require(RouteAccess::Staff),
            Err(AppError::Forbidden(_))
        ));
        assert!(state.require(RouteAccess::Authenticated).is_ok());
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let (state, session_store, _) = session();
        state
            .accept_token(&token_for("1", "CLIENT", 3600))
            .await
            .unwrap();
        state.logout().await.unwrap();

        assert!(!state.is_logged_in());
        assert!(state.token().is_none());
        assert!(session_store.get("auth_token").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_language_round_trip_and_fallback() {
        let (state, _, durable_store) = session();
        assert_eq!(state.language().await.unwrap(), "en");

        state.set_language("ro").await.unwrap();
        assert_eq!(state.language().await.unwrap(), "ro");
        assert_eq!(
            durable_store.get("language").await.unwrap().as_deref(),
            Some("ro")
        );

        assert!(state.set_language("xx").await.is_err());
        durable_store.set("language", "xx").await.unwrap();
        assert_eq!(state.language().await.unwrap(), "en");
    }
}
