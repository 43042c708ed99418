//! Pages
//!
//! Top-level page components for each route.

pub mod chat;
pub mod home;
pub mod profiles;

pub use chat::Chat;
pub use home::Home;
pub use profiles::Profiles;
