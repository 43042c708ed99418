//! State Management
//!
//! Global application state. Page state lives in controller structs held in
//! signals by each page.

pub mod global;

pub use global::{provide_global_state, use_flow_navigator, use_global_state, GlobalState};
