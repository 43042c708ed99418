//! Browser API Access
//!
//! Wires the shared API client to the browser: fetch-based transport and a
//! `localStorage`-backed token store. Also file downloads.

pub mod download;
pub mod storage;
pub mod transport;

use chatbot::api::{resolve_base_url, ApiClient, Endpoints};
use chatbot::session::Session;

pub use download::save_file;
pub use storage::LocalStorageTokenStore;
pub use transport::GlooTransport;

/// API client used throughout the UI
pub type Client = ApiClient<GlooTransport>;

/// Backend base URL, fixed at build time through `CHATBOT_API_BASE_URL`
pub fn get_api_base() -> String {
    resolve_base_url(option_env!("CHATBOT_API_BASE_URL"))
}

/// Session persisted in `localStorage` and a client bound to it
pub fn create_client() -> Client {
    let session = Session::new(LocalStorageTokenStore::default());
    ApiClient::new(GlooTransport, Endpoints::new(&get_api_base()), session)
}
