//! Route guard
//!
//! Decides, before a page renders, whether the visitor may see it.

use crate::session::Session;

/// Pages of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Sign-in / sign-up page at the root
    SignIn,
    /// Profile and billing dashboard
    Profile,
    /// Chat interface
    Chat,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::SignIn => "/",
            Route::Profile => "/profiles",
            Route::Chat => "/chat",
        }
    }

    /// Whether the page needs a valid credential
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::SignIn)
    }

    pub fn from_path(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "" => Some(Route::SignIn),
            "/profiles" => Some(Route::Profile),
            p if p == "/chat" || p.starts_with("/chat/") => Some(Route::Chat),
            _ => None,
        }
    }
}

/// Outcome of a guard check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(Route),
}

/// Check whether `route` may render for the current session.
///
/// Protected pages require a held, unexpired credential.
pub fn check(route: Route, session: &Session) -> Access {
    if !route.is_protected() || session.is_authenticated() {
        Access::Allow
    } else {
        tracing::debug!(path = route.path(), "guard redirecting to sign-in");
        Access::Redirect(Route::SignIn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::testing::token_expiring_in;
    use crate::session::MemoryTokenStore;

    #[test]
    fn test_sign_in_page_always_allowed() {
        assert_eq!(check(Route::SignIn, &Session::in_memory()), Access::Allow);
    }

    #[test]
    fn test_protected_pages_need_valid_token() {
        let session = Session::in_memory();
        assert_eq!(check(Route::Chat, &session), Access::Redirect(Route::SignIn));

        session.sign_in(&token_expiring_in(600)).unwrap();
        assert_eq!(check(Route::Chat, &session), Access::Allow);
        assert_eq!(check(Route::Profile, &session), Access::Allow);
    }

    #[test]
    fn test_expired_token_redirects() {
        let session = Session::new(MemoryTokenStore::with_token(&token_expiring_in(-1)));
        assert_eq!(check(Route::Profile, &session), Access::Redirect(Route::SignIn));
    }

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::from_path("/"), Some(Route::SignIn));
        assert_eq!(Route::from_path("/profiles/"), Some(Route::Profile));
        assert_eq!(Route::from_path("/chat"), Some(Route::Chat));
        assert_eq!(Route::from_path("/billing"), None);
        assert_eq!(Route::Chat.path(), "/chat");
    }
}
