//! Session Context
//!
//! A single bearer credential, held by a [`TokenStore`] and shared through an
//! explicitly injected [`Session`] handle. Components never read storage on
//! their own; they ask the session.

#[cfg(feature = "native")]
mod file;

#[cfg(feature = "native")]
pub use file::FileTokenStore;

use std::cell::RefCell;
use std::rc::Rc;

use crate::auth::token;
use crate::error::SessionError;

/// Persistent storage for exactly one credential string.
///
/// Implementations only store; expiry is the validator's concern.
pub trait TokenStore {
    /// Current credential, if any
    fn get(&self) -> Option<String>;

    /// Store a credential, replacing any previous one
    fn set(&self, token: &str) -> Result<(), SessionError>;

    /// Remove the stored credential
    fn clear(&self) -> Result<(), SessionError>;
}

/// Process-local store, used for ephemeral sessions and in tests
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RefCell<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a credential
    pub fn with_token(token: &str) -> Self {
        Self {
            token: RefCell::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    fn set(&self, token: &str) -> Result<(), SessionError> {
        *self.token.borrow_mut() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        self.token.borrow_mut().take();
        Ok(())
    }
}

/// Shared handle to the current session
#[derive(Clone)]
pub struct Session {
    store: Rc<dyn TokenStore>,
}

impl Session {
    pub fn new(store: impl TokenStore + 'static) -> Self {
        Self {
            store: Rc::new(store),
        }
    }

    /// Session backed by an in-memory store with no credential
    pub fn in_memory() -> Self {
        Self::new(MemoryTokenStore::new())
    }

    /// Raw credential, regardless of expiry
    pub fn token(&self) -> Option<String> {
        self.store.get().filter(|t| !t.is_empty())
    }

    /// Whether a credential is held and has not expired
    pub fn is_authenticated(&self) -> bool {
        self.token()
            .map(|t| token::is_valid_token(&t))
            .unwrap_or(false)
    }

    /// Begin a session with a freshly issued credential
    pub fn sign_in(&self, token: &str) -> Result<(), SessionError> {
        self.store.set(token)?;
        tracing::debug!("session credential stored");
        Ok(())
    }

    /// End the session. Safe to call when no credential is held.
    pub fn sign_out(&self) -> Result<(), SessionError> {
        self.store.clear()?;
        tracing::debug!("session credential cleared");
        Ok(())
    }

    /// Forced logout after the backend rejected the credential.
    ///
    /// Storage failures are logged rather than returned: the caller is already
    /// handling an error and will redirect either way.
    pub fn expire(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "failed to clear credential after unauthorized response");
        } else {
            tracing::warn!("credential rejected by backend, session cleared");
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("has_token", &self.token().is_some())
            .finish()
    }
}
