//! Chatbot Web Client
//!
//! Browser front end for the chatbot backend, built with Leptos (WASM).
//!
//! # Features
//!
//! - Sign in and sign up
//! - Profile and billing dashboard with CSV export and a usage chart
//! - Threaded chat with the assistant
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. Page state lives in the controllers of the `chatbot` crate,
//! held in signals; requests go through the shared API client over the
//! browser fetch API.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Mount the app to the document body
    mount_to_body(|| view! { <app::App /> });
}
