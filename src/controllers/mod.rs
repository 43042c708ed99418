//! Page controllers
//!
//! Each page owns a small state machine: `Idle -> Loading -> Idle | Error`.
//! Controllers expose synchronous `begin_*`/`finish_*` transitions, so the
//! browser UI can keep state in a signal and update it around a spawned
//! future, plus async drivers that run a whole flow (used by the CLI and
//! tests).
//!
//! Failures never propagate as `Err`: they land in [`Phase::Error`] as a
//! banner message, and the returned [`Flow`] tells the caller whether to
//! navigate away.

pub mod auth;
pub mod billing;
pub mod chat;
pub mod profile;

pub use auth::{AuthMode, AuthState};
pub use billing::{BillingState, ChartPoint, DateRange, DetailState, DimensionKind, RangeError};
pub use chat::{build_context, ChatState, PendingQuery};
pub use profile::ProfileState;

use crate::auth::Route;
use crate::error::ApiError;

/// Request lifecycle of a controller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    /// Banner message of the last failure
    Error(String),
}

impl Phase {
    pub fn is_loading(&self) -> bool {
        matches!(self, Phase::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Phase::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Record a failure and decide where to go next.
    ///
    /// The API client has already cleared the session on a 401.
    pub fn fail(&mut self, err: &ApiError, fallback: &str) -> Flow {
        let message = err.banner(fallback);
        tracing::debug!(error = %err, banner = %message, "controller action failed");
        *self = Phase::Error(message);

        if err.is_unauthorized() {
            Flow::Redirect(Route::SignIn)
        } else {
            Flow::Stay
        }
    }
}

/// Navigation requested by a controller transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Stay,
    Redirect(Route),
}

impl Flow {
    pub fn redirect(&self) -> Option<Route> {
        match self {
            Flow::Stay => None,
            Flow::Redirect(route) => Some(*route),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fail_sets_banner() {
        let mut phase = Phase::Loading;
        let flow = phase.fail(
            &ApiError::Status {
                status: 500,
                message: None,
            },
            "Failed to fetch profile",
        );

        assert_eq!(flow, Flow::Stay);
        assert_eq!(phase.error(), Some("Failed to fetch profile"));
    }

    #[test]
    fn test_unauthorized_redirects_to_sign_in() {
        let mut phase = Phase::Loading;
        let flow = phase.fail(&ApiError::Unauthorized { message: None }, "x");

        assert_eq!(flow.redirect(), Some(Route::SignIn));
        assert!(!phase.is_loading());
    }
}
