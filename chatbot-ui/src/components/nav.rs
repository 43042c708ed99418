//! Navigation Component
//!
//! Header navigation bar with page links and sign out.

use leptos::*;
use leptos_router::*;

use chatbot::auth::Route as AppRoute;

use crate::state::use_global_state;

/// Navigation header component
#[component]
pub fn Nav() -> impl IntoView {
    let state = use_global_state();
    let navigate = use_navigate();

    let sign_out = move |_| {
        state.sign_out();
        navigate(AppRoute::SignIn.path(), Default::default());
    };

    view! {
        <nav class="bg-white border-b border-gray-200">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    // Logo and brand
                    <A href=AppRoute::Chat.path() class="flex items-center space-x-3">
                        <span class="text-2xl">"💬"</span>
                        <span class="text-xl font-semibold">"AI Chat"</span>
                    </A>

                    // Navigation links
                    <div class="flex items-center space-x-1">
                        <NavLink href=AppRoute::Profile.path() label="Profile" />
                        <NavLink href=AppRoute::Chat.path() label="Chat" />
                        <button
                            on:click=sign_out
                            class="ml-2 px-4 py-2 rounded-lg text-gray-600 hover:text-gray-900 hover:bg-gray-100 transition-colors"
                        >
                            "Sign Out"
                        </button>
                    </div>
                </div>
            </div>
        </nav>
    }
}

/// Individual navigation link
#[component]
fn NavLink(
    href: &'static str,
    label: &'static str,
) -> impl IntoView {
    view! {
        <A
            href=href
            class="px-4 py-2 rounded-lg text-gray-600 hover:text-gray-900 hover:bg-gray-100 transition-colors"
            active_class="bg-gray-100 text-gray-900"
        >
            {label}
        </A>
    }
}
