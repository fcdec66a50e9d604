//! Route guard: decides whether protected pages may render.
//!
//! The guard is driven purely by provider snapshots: no polling, no retry.
//! Entering `Unauthenticated` requests one sign-in redirect; the request is
//! not repeated until the guard has left that state and come back.

use tracing::{debug, info};

use crate::claims::AccessPolicy;
use crate::provider::AuthSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessState {
    /// Provider is still loading the user.
    CheckingAuth,
    /// No signed-in user; a sign-in redirect is (or was) requested.
    Unauthenticated,
    /// Signed in without the required group.
    Unauthorized,
    /// Signed in with the required group.
    Authorized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardDecision {
    pub state: AccessState,
    /// Caller should start a sign-in redirect now.
    pub request_signin: bool,
}

#[derive(Debug)]
pub struct RouteGuard {
    policy: AccessPolicy,
    state: Option<AccessState>,
    signin_requested: bool,
}

impl RouteGuard {
    pub fn new(policy: AccessPolicy) -> Self {
        Self {
            policy,
            state: None,
            signin_requested: false,
        }
    }

    pub fn state(&self) -> Option<AccessState> {
        self.state
    }

    /// Feed the latest provider snapshot.
    pub fn observe(&mut self, snapshot: &AuthSnapshot) -> GuardDecision {
        let next = if snapshot.is_loading {
            AccessState::CheckingAuth
        } else if !snapshot.is_authenticated || snapshot.user.is_none() {
            AccessState::Unauthenticated
        } else if self.policy.permits(snapshot.user.as_ref()) {
            AccessState::Authorized
        } else {
            AccessState::Unauthorized
        };

        if next != AccessState::Unauthenticated {
            self.signin_requested = false;
        }

        let request_signin = next == AccessState::Unauthenticated
            && !self.signin_requested
            && snapshot.active_navigator.is_none();
        if request_signin {
            self.signin_requested = true;
            info!("no authenticated user, requesting sign-in redirect");
        }

        if self.state != Some(next) {
            debug!(from = ?self.state, to = ?next, "route guard transition");
            if next == AccessState::Unauthorized {
                info!(
                    required_group = %self.policy.required_group,
                    "user lacks required group"
                );
            }
            self.state = Some(next);
        }

        GuardDecision {
            state: next,
            request_signin,
        }
    }
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new(AccessPolicy::default())
    }
}
