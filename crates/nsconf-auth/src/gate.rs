//! Application-level gate, evaluated before any route.

use crate::error::AuthError;
use crate::provider::AuthSnapshot;

/// What the application shell should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppView {
    Loading,
    Error(AuthError),
    Ready,
}

/// Maps provider loading and error states to a shell view.
#[derive(Debug, Default, Clone, Copy)]
pub struct AppGate;

impl AppGate {
    pub fn view(&self, snapshot: &AuthSnapshot) -> AppView {
        if snapshot.is_loading {
            return AppView::Loading;
        }
        match &snapshot.error {
            Some(message) => AppView::Error(AuthError::from_message(message.as_str())),
            None => AppView::Ready,
        }
    }
}
