//! nsconf-auth: who may open the namespace pages.
//!
//! # Components
//!
//! - **`claims`**: identity/profile claims and the group-membership check
//! - **`guard`**: route guard state machine (checking, sign-in, denied, allowed)
//! - **`gate`**: application-level gate over provider loading/error states
//! - **`provider`**: identity-provider seam and a static implementation
//! - **`error`**: authentication error classification

pub mod claims;
pub mod error;
pub mod gate;
pub mod guard;
pub mod provider;

pub use claims::{get_user_groups, has_required_group, AccessPolicy, Identity, REQUIRED_GROUP};
pub use error::{AuthError, AuthResult, Recovery};
pub use gate::{AppGate, AppView};
pub use guard::{AccessState, GuardDecision, RouteGuard};
pub use provider::{AuthSnapshot, BoxFuture, IdentityProvider, StaticProvider};
