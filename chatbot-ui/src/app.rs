//! App Root Component
//!
//! Main application component with routing, the route guard and global
//! providers.

use leptos::*;
use leptos_router::*;

use chatbot::auth::{check, Access, Route as AppRoute};

use crate::components::{Nav, Toast};
use crate::pages::{Chat, Home, Profiles};
use crate::state::{provide_global_state, use_global_state};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    // Provide global state to all components
    provide_global_state();

    view! {
        <Router>
            <div class="min-h-screen bg-gray-50 text-gray-900 flex flex-col">
                <Routes>
                    <Route path="/" view=Home />
                    <Route
                        path="/profiles"
                        view=|| view! { <Guarded route=AppRoute::Profile><Profiles /></Guarded> }
                    />
                    <Route
                        path="/chat"
                        view=|| view! { <Guarded route=AppRoute::Chat><Chat /></Guarded> }
                    />
                    <Route path="/*any" view=NotFound />
                </Routes>

                // Toast notifications
                <Toast />
            </div>
        </Router>
    }
}

/// Renders a protected page only for a held, unexpired token; everyone else
/// is sent to sign in before any content renders.
#[component]
fn Guarded(route: AppRoute, children: Children) -> impl IntoView {
    let state = use_global_state();

    match check(route, state.client.session()) {
        Access::Allow => view! {
            <Nav />
            <main class="flex-1 container mx-auto px-4 py-8">
                {children()}
            </main>
        }
        .into_view(),
        Access::Redirect(to) => view! { <Redirect path=to.path() /> }.into_view(),
    }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-[60vh] text-center">
            <div class="text-6xl mb-4">"🔍"</div>
            <h1 class="text-3xl font-bold mb-2">"Page Not Found"</h1>
            <p class="text-gray-500 mb-6">"The page you're looking for doesn't exist."</p>
            <A
                href="/"
                class="px-6 py-3 bg-blue-600 hover:bg-blue-700 text-white rounded-lg font-medium transition-colors"
            >
                "Go to Sign In"
            </A>
        </div>
    }
}
