//! `localStorage` token store

use chatbot::error::SessionError;
use chatbot::session::TokenStore;

/// Storage key holding the credential
pub const TOKEN_KEY: &str = "token";

/// Keeps the credential in the origin's `localStorage`
#[derive(Debug, Clone)]
pub struct LocalStorageTokenStore {
    key: &'static str,
}

impl Default for LocalStorageTokenStore {
    fn default() -> Self {
        Self { key: TOKEN_KEY }
    }
}

fn local_storage() -> Result<web_sys::Storage, SessionError> {
    web_sys::window()
        .ok_or_else(|| SessionError::Unavailable("no window".to_string()))?
        .local_storage()
        .map_err(|_| SessionError::Unavailable("localStorage access denied".to_string()))?
        .ok_or_else(|| SessionError::Unavailable("localStorage not supported".to_string()))
}

impl TokenStore for LocalStorageTokenStore {
    fn get(&self) -> Option<String> {
        local_storage().ok()?.get_item(self.key).ok().flatten()
    }

    fn set(&self, token: &str) -> Result<(), SessionError> {
        local_storage()?
            .set_item(self.key, token)
            .map_err(|_| SessionError::Unavailable("failed to write token".to_string()))
    }

    fn clear(&self) -> Result<(), SessionError> {
        local_storage()?
            .remove_item(self.key)
            .map_err(|_| SessionError::Unavailable("failed to remove token".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatbot::session::Session;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_session_persists_in_local_storage() {
        let session = Session::new(LocalStorageTokenStore::default());
        session.sign_in("abc.def.ghi").unwrap();

        // A second store over the same origin sees the token
        assert_eq!(LocalStorageTokenStore::default().get().as_deref(), Some("abc.def.ghi"));

        session.sign_out().unwrap();
        assert_eq!(LocalStorageTokenStore::default().get(), None);
    }

    #[wasm_bindgen_test]
    fn test_expire_removes_token() {
        let session = Session::new(LocalStorageTokenStore::default());
        session.sign_in("abc.def.ghi").unwrap();
        session.expire();
        assert!(LocalStorageTokenStore::default().get().is_none());
    }
}
