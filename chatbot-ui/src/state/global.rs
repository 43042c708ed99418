//! Global Application State
//!
//! The API client (and with it the session) plus toast messages, provided
//! as context to every component.

use leptos::*;

use chatbot::controllers::Flow;

use crate::api::{create_client, Client};

/// Global application state provided to all components
#[derive(Clone)]
pub struct GlobalState {
    /// API client bound to the browser session
    pub client: Client,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let state = GlobalState {
        client: create_client(),
        error: create_rw_signal(None),
        success: create_rw_signal(None),
    };

    provide_context(state);
}

/// Global state from context
pub fn use_global_state() -> GlobalState {
    use_context::<GlobalState>().expect("GlobalState not found")
}

impl GlobalState {
    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(3000, move || {
            success_signal.set(None);
        })
        .forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        web_sys::console::error_1(&message.into());
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        })
        .forget();
    }

    /// End the session and go to the sign-in page
    pub fn sign_out(&self) {
        if let Err(e) = self.client.session().sign_out() {
            web_sys::console::warn_1(&format!("Failed to clear token: {}", e).into());
        }
    }
}

/// Navigation callback for controller outcomes.
///
/// Must be created inside a component under the router.
pub fn use_flow_navigator() -> impl Fn(Flow) + Clone + 'static {
    let navigate = leptos_router::use_navigate();
    move |flow: Flow| {
        if let Some(route) = flow.redirect() {
            navigate(route.path(), Default::default());
        }
    }
}
