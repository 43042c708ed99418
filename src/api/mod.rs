//! Chatbot REST API client
//!
//! Typed access to the backend, shared by the CLI and the browser UI.
//!
//! # Endpoints
//!
//! ## Auth
//! - `POST /user/signin` - Exchange credentials for a token
//! - `POST /user` - Register an account and organization
//!
//! ## Profile
//! - `GET /user/profile` - Profile snapshot
//!
//! ## Chat
//! - `GET /chat/thread` - List threads
//! - `POST /chat/thread` - Create a thread
//! - `GET /chat/thread/:id` - Thread name and messages
//! - `POST /chat/thread/:id/query` - Send a message, get the reply
//!
//! ## Billing
//! - `GET /billing/usage` - Current-period usage summary
//! - `GET /billing/usage/range/:start/:end` - Date-filtered usage
//!
//! Every call except the two auth endpoints carries
//! `Authorization: Bearer <token>`; a 401 from any of them clears the session.
//!
//! # Example
//!
//! ```rust,ignore
//! use chatbot::api::{ApiClient, Endpoints, ReqwestTransport};
//! use chatbot::session::Session;
//!
//! let client = ApiClient::new(
//!     ReqwestTransport::new(30)?,
//!     Endpoints::new("http://localhost:8080"),
//!     Session::in_memory(),
//! );
//! let threads = client.list_threads().await?;
//! ```

pub mod client;
pub mod dto;
pub mod endpoints;
#[cfg(feature = "native")]
pub mod http;
pub mod transport;

pub use client::ApiClient;
pub use dto::*;
pub use endpoints::{resolve_base_url, Endpoints, DEFAULT_API_BASE};
#[cfg(feature = "native")]
pub use http::ReqwestTransport;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Method};
