//! Loading Component
//!
//! Loading spinners.

use leptos::*;

/// Full-page loading spinner
#[component]
pub fn Loading() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center py-12">
            <div class="loading-spinner w-8 h-8" />
        </div>
    }
}

/// Inline loading spinner
#[component]
pub fn InlineLoading() -> impl IntoView {
    view! {
        <span class="inline-block loading-spinner w-4 h-4" />
    }
}

/// "Assistant is typing" indicator for the chat
#[component]
pub fn TypingIndicator() -> impl IntoView {
    view! {
        <div class="flex justify-start">
            <div class="bg-gray-100 rounded-2xl px-4 py-3 flex space-x-1 animate-pulse">
                <span class="w-2 h-2 bg-gray-400 rounded-full" />
                <span class="w-2 h-2 bg-gray-400 rounded-full" />
                <span class="w-2 h-2 bg-gray-400 rounded-full" />
            </div>
        </div>
    }
}
