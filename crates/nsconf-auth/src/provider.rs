//! Identity-provider seam.
//!
//! The OIDC protocol lives outside this crate. A provider only has to
//! report its current state and start redirects; everything else here
//! reads [`AuthSnapshot`]s.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use tracing::info;

use crate::claims::Identity;
use crate::error::{AuthError, AuthResult};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Point-in-time view of the identity provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthSnapshot {
    pub is_loading: bool,
    pub is_authenticated: bool,
    pub user: Option<Identity>,
    /// Raw provider error message, if the last operation failed.
    pub error: Option<String>,
    /// Name of a navigation (redirect, popup) already in flight.
    pub active_navigator: Option<String>,
}

impl AuthSnapshot {
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Self::default()
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn signed_in(user: Identity) -> Self {
        Self {
            is_authenticated: true,
            user: Some(user),
            ..Self::default()
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }
}

/// External identity provider.
pub trait IdentityProvider: Send + Sync {
    fn snapshot(&self) -> AuthSnapshot;

    /// Start the sign-in redirect. Completion is reported through later snapshots.
    fn signin_redirect(&self) -> BoxFuture<'_, AuthResult<()>>;

    fn signout_redirect(&self) -> BoxFuture<'_, AuthResult<()>>;
}

/// Provider with a fixed snapshot, used by the CLI and tests.
///
/// A sign-in redirect marks a navigator as active; a sign-out drops the user.
#[derive(Debug, Default)]
pub struct StaticProvider {
    state: Mutex<AuthSnapshot>,
    signin_requests: AtomicU32,
    authority: String,
}

impl StaticProvider {
    pub fn new(snapshot: AuthSnapshot) -> Self {
        Self {
            state: Mutex::new(snapshot),
            signin_requests: AtomicU32::new(0),
            authority: String::new(),
        }
    }

    /// Signed-in provider built from a claims document
    /// (`{"profile": {...}}`).
    pub fn from_claims_json(json: &str) -> AuthResult<Self> {
        let identity: Identity = serde_json::from_str(json)
            .map_err(|e| AuthError::Other(format!("invalid claims document: {e}")))?;
        Ok(Self::new(AuthSnapshot::signed_in(identity)))
    }

    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into();
        self
    }

    pub fn signin_requests(&self) -> u32 {
        self.signin_requests.load(Ordering::Relaxed)
    }

    fn update(&self, f: impl FnOnce(&mut AuthSnapshot)) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut state);
    }
}

impl IdentityProvider for StaticProvider {
    fn snapshot(&self) -> AuthSnapshot {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn signin_redirect(&self) -> BoxFuture<'_, AuthResult<()>> {
        Box::pin(async move {
            self.signin_requests.fetch_add(1, Ordering::Relaxed);
            self.update(|s| s.active_navigator = Some("signinRedirect".to_string()));
            info!(authority = %self.authority, "sign-in redirect requested");
            Ok(())
        })
    }

    fn signout_redirect(&self) -> BoxFuture<'_, AuthResult<()>> {
        Box::pin(async move {
            self.update(|s| *s = AuthSnapshot::signed_out());
            info!(authority = %self.authority, "sign-out redirect requested");
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn signin_marks_navigator_active() {
        let provider = StaticProvider::new(AuthSnapshot::signed_out());
        provider.signin_redirect().await.unwrap();
        assert_eq!(provider.signin_requests(), 1);
        assert_eq!(
            provider.snapshot().active_navigator.as_deref(),
            Some("signinRedirect")
        );
    }

    #[tokio::test]
    async fn signout_drops_user() {
        let provider =
            StaticProvider::from_claims_json(r#"{"profile":{"groups":["/cicd_dev"]}}"#).unwrap();
        assert!(provider.snapshot().is_authenticated);
        provider.signout_redirect().await.unwrap();
        let snapshot = provider.snapshot();
        assert!(!snapshot.is_authenticated);
        assert!(snapshot.user.is_none());
    }

    #[test]
    fn bad_claims_document_is_an_error() {
        assert!(StaticProvider::from_claims_json("42").is_err());
    }
}
