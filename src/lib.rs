//! # Chatbot
//!
//! Client for the chatbot backend: sign-in/sign-up, a profile and billing
//! dashboard, and threaded chat. The same core drives the `chatbot` CLI and
//! the browser UI in `chatbot-ui`.
//!
//! ## Modules
//!
//! - [`session`]: Token store and the injected session context
//! - [`auth`]: Credential validation and the route guard
//! - [`api`]: Typed REST client over a pluggable HTTP transport
//! - [`controllers`]: Page state machines (auth, profile, billing, chat)
//! - [`export`]: CSV export of usage summaries
//! - [`config`]: CLI configuration (native builds only)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatbot::api::{ApiClient, Endpoints, ReqwestTransport};
//! use chatbot::controllers::ChatState;
//! use chatbot::session::{FileTokenStore, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = Session::new(FileTokenStore::new(FileTokenStore::default_path()));
//!     let client = ApiClient::new(
//!         ReqwestTransport::new(30)?,
//!         Endpoints::new("http://localhost:8080"),
//!         session,
//!     );
//!
//!     let mut chat = ChatState::default();
//!     chat.load_threads(&client).await;
//!     for thread in &chat.threads {
//!         println!("{} {}", thread.id, thread.name);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
#[cfg(feature = "native")]
pub mod config;
pub mod controllers;
pub mod error;
pub mod export;
pub mod session;

// Re-export top-level types for convenience
pub use api::{ApiClient, Endpoints, HttpTransport};

pub use auth::{check, is_valid_token, Access, Route};

pub use controllers::{
    AuthMode, AuthState, BillingState, ChatState, DateRange, DetailState, DimensionKind, Flow,
    Phase, ProfileState,
};

pub use error::{ApiError, ApiResult, SessionError};

pub use export::{usage_csv, ExportError};

pub use session::{MemoryTokenStore, Session, TokenStore};

#[cfg(feature = "native")]
pub use config::{Config, ConfigError};
