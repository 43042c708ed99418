//! Home Page
//!
//! Sign-in and sign-up tabs.

use leptos::*;

use chatbot::api::{SignInRequest, SignUpRequest};
use chatbot::controllers::auth::{sign_in, sign_up};
use chatbot::controllers::{AuthMode, AuthState, Flow};

use crate::components::ErrorBanner;
use crate::state::{use_flow_navigator, use_global_state};

/// Authentication page component
#[component]
pub fn Home() -> impl IntoView {
    let auth = create_rw_signal(AuthState::default());

    let mode = create_memo(move |_| auth.with(|a| a.mode));
    let error = Signal::derive(move || auth.with(|a| a.phase.error().map(str::to_string)));

    view! {
        <div class="flex-1 flex items-center justify-center px-4 py-12">
            <div class="w-full max-w-md bg-white rounded-xl shadow-sm border border-gray-200 p-8">
                <div class="text-center mb-8">
                    <div class="text-4xl mb-2">"💬"</div>
                    <h1 class="text-2xl font-bold">"AI Chat"</h1>
                </div>

                // Tabs
                <div class="grid grid-cols-2 gap-2 mb-6">
                    <TabButton label="Sign In" auth=auth target=AuthMode::SignIn />
                    <TabButton label="Sign Up" auth=auth target=AuthMode::SignUp />
                </div>

                <ErrorBanner message=error />

                {move || match mode.get() {
                    AuthMode::SignIn => view! { <SignInForm auth=auth /> }.into_view(),
                    AuthMode::SignUp => view! { <SignUpForm auth=auth /> }.into_view(),
                }}
            </div>
        </div>
    }
}

#[component]
fn TabButton(
    label: &'static str,
    auth: RwSignal<AuthState>,
    target: AuthMode,
) -> impl IntoView {
    view! {
        <button
            type="button"
            on:click=move |_| auth.update(|a| a.switch_mode(target))
            class=move || {
                let base = "py-2 rounded-lg text-sm font-medium transition-colors";
                if auth.with(|a| a.mode == target) {
                    format!("{} bg-blue-600 text-white", base)
                } else {
                    format!("{} bg-gray-100 text-gray-600 hover:text-gray-900", base)
                }
            }
        >
            {label}
        </button>
    }
}

#[component]
fn SignInForm(auth: RwSignal<AuthState>) -> impl IntoView {
    let state = use_global_state();
    let navigate = use_flow_navigator();

    let email = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let request = SignInRequest {
            email: email.get_untracked(),
            password: password.get_untracked(),
        };
        let client = state.client.clone();
        let navigate = navigate.clone();

        auth.update(|a| a.begin());
        spawn_local(async move {
            let result = sign_in(&client, &request).await;
            let flow = auth.try_update(|a| a.finish(result)).unwrap_or(Flow::Stay);
            navigate(flow);
        });
    };

    view! {
        <form on:submit=on_submit class="space-y-4">
            <TextField label="Email" kind="email" value=email />
            <TextField label="Password" kind="password" value=password />
            <SubmitButton auth=auth label="Sign In" />
        </form>
    }
}

#[component]
fn SignUpForm(auth: RwSignal<AuthState>) -> impl IntoView {
    let state = use_global_state();
    let navigate = use_flow_navigator();

    let name = create_rw_signal(String::new());
    let email = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let company_description = create_rw_signal(String::new());
    let company_url = create_rw_signal(String::new());
    let legal_company_name = create_rw_signal(String::new());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let request = SignUpRequest {
            name: name.get_untracked(),
            email: email.get_untracked(),
            password: password.get_untracked(),
            company_description: company_description.get_untracked(),
            company_url: company_url.get_untracked(),
            legal_company_name: legal_company_name.get_untracked(),
        };
        let client = state.client.clone();
        let navigate = navigate.clone();

        auth.update(|a| a.begin());
        spawn_local(async move {
            let result = sign_up(&client, &request).await;
            let flow = auth.try_update(|a| a.finish(result)).unwrap_or(Flow::Stay);
            navigate(flow);
        });
    };

    view! {
        <form on:submit=on_submit class="space-y-4">
            <TextField label="Name" kind="text" value=name />
            <TextField label="Email" kind="email" value=email />
            <TextField label="Password" kind="password" value=password />
            <TextField label="Legal Company Name" kind="text" value=legal_company_name />
            <TextField label="Company Website" kind="url" value=company_url />
            <TextField label="Company Description" kind="text" value=company_description />
            <SubmitButton auth=auth label="Create Account" />
        </form>
    }
}

#[component]
fn TextField(
    label: &'static str,
    kind: &'static str,
    value: RwSignal<String>,
) -> impl IntoView {
    view! {
        <label class="block">
            <span class="block text-sm text-gray-600 mb-1">{label}</span>
            <input
                type=kind
                required=kind != "url"
                class="w-full border border-gray-300 rounded-lg px-3 py-2 focus:outline-none focus:ring-2 focus:ring-blue-500"
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        </label>
    }
}

#[component]
fn SubmitButton(auth: RwSignal<AuthState>, label: &'static str) -> impl IntoView {
    let loading = move || auth.with(|a| a.phase.is_loading());

    view! {
        <button
            type="submit"
            disabled=loading
            class="w-full bg-blue-600 hover:bg-blue-700 disabled:bg-gray-400
                   disabled:cursor-not-allowed text-white rounded-lg py-3 font-semibold
                   transition-colors flex items-center justify-center space-x-2"
        >
            {move || if loading() {
                view! {
                    <div class="loading-spinner w-5 h-5" />
                    <span>"Please wait..."</span>
                }.into_view()
            } else {
                view! { <span>{label}</span> }.into_view()
            }}
        </button>
    }
}
