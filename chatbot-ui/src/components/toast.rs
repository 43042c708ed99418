//! Toast Notification Component
//!
//! Shows success and error messages.

use leptos::*;

use crate::state::use_global_state;

/// Transient success/error notice in the corner; the global state clears
/// it after a timeout.
#[component]
pub fn Toast() -> impl IntoView {
    let state = use_global_state();

    let (error, success) = (state.error, state.success);

    move || {
        notice(error.get(), success.get()).map(|(bg, msg)| view! {
            <div
                role="status"
                class=format!("fixed bottom-6 right-4 z-50 {} text-white text-sm font-medium px-4 py-3 rounded-lg shadow-lg", bg)
            >
                {msg}
            </div>
        })
    }
}

/// Background class and text of the notice to show; errors take precedence
fn notice(error: Option<String>, success: Option<String>) -> Option<(&'static str, String)> {
    error
        .map(|msg| ("bg-red-600", msg))
        .or_else(|| success.map(|msg| ("bg-green-600", msg)))
}

/// Inline error banner bound to a page's own error
#[component]
pub fn ErrorBanner(
    #[prop(into)]
    message: Signal<Option<String>>,
) -> impl IntoView {
    move || {
        message.get().map(|msg| view! {
            <div class="mb-6 flex items-start space-x-3 bg-red-50 border border-red-200 text-red-700 px-4 py-3 rounded-lg">
                <span class="font-semibold">"Error"</span>
                <span class="text-sm">{msg}</span>
            </div>
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_notice_wins_over_success() {
        assert_eq!(
            notice(Some("Failed".to_string()), Some("Saved".to_string())),
            Some(("bg-red-600", "Failed".to_string()))
        );
        assert_eq!(
            notice(None, Some("Saved".to_string())),
            Some(("bg-green-600", "Saved".to_string()))
        );
        assert_eq!(notice(None, None), None);
    }
}
