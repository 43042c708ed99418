//! Authentication
//!
//! Client-side credential checks and the route guard built on them.

pub mod guard;
pub mod token;

pub use guard::{check, Access, Route};
pub use token::{decode_claims, is_valid_token, validate_at, Claims, TokenError};
