//! Chat Page
//!
//! Thread sidebar, message history and composer.

use leptos::*;

use chatbot::api::{Message, MessageKind};
use chatbot::controllers::chat::thread_name_or_default;
use chatbot::controllers::{ChatState, Flow};

use crate::api::Client;
use crate::components::{ErrorBanner, ThreadList, TypingIndicator};
use crate::state::{use_flow_navigator, use_global_state};

/// Delay before the one-shot re-scroll after switching threads
const RESCROLL_DELAY_MS: u32 = 100;

/// Chat page component
#[component]
pub fn Chat() -> impl IntoView {
    let state = use_global_state();
    let navigate = use_flow_navigator();

    let chat = create_rw_signal(ChatState::default());
    let input = create_rw_signal(String::new());
    let messages_ref = create_node_ref::<html::Div>();

    let scroll_to_bottom = move || {
        if let Some(el) = messages_ref.get_untracked() {
            el.set_scroll_top(el.scroll_height());
        }
    };

    // Keep the newest message in view
    create_effect(move |_| {
        chat.with(|c| c.messages.len());
        scroll_to_bottom();
    });

    // Fetch threads on mount
    let client_for_effect = state.client.clone();
    let navigate_for_effect = navigate.clone();
    create_effect(move |_| {
        let client = client_for_effect.clone();
        let navigate = navigate_for_effect.clone();
        spawn_local(async move {
            navigate(refresh_threads(&client, chat).await);
        });
    });

    let client_for_select = state.client.clone();
    let navigate_for_select = navigate.clone();
    let on_select = Callback::new(move |thread_id: String| {
        let client = client_for_select.clone();
        let navigate = navigate_for_select.clone();
        spawn_local(async move {
            navigate(open_thread(&client, chat, &thread_id).await);
            // Content height settles after render
            gloo_timers::callback::Timeout::new(RESCROLL_DELAY_MS, scroll_to_bottom).forget();
        });
    });

    let client_for_create = state.client.clone();
    let navigate_for_create = navigate.clone();
    let on_create = Callback::new(move |(name, description): (String, String)| {
        let client = client_for_create.clone();
        let navigate = navigate_for_create.clone();

        chat.update(|c| c.begin_create());
        spawn_local(async move {
            let result = client
                .create_thread(&thread_name_or_default(&name), &description)
                .await;
            let thread_id = match chat.try_update(|c| c.finish_create(result, &description)) {
                Some(Ok(id)) => id,
                Some(Err(flow)) => return navigate(flow),
                None => return,
            };

            let flow = refresh_threads(&client, chat).await;
            if flow.redirect().is_some() {
                return navigate(flow);
            }
            navigate(open_thread(&client, chat, &thread_id).await);
        });
    });

    let client_for_send = state.client.clone();
    let send = move || {
        let text = input.get_untracked();
        let Some(query) = chat.try_update(|c| c.begin_send(&text)).flatten() else {
            return;
        };
        input.set(String::new());

        let client = client_for_send.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            let result = client
                .query_thread(&query.thread_id, &query.message, &query.context)
                .await;
            let flow = chat
                .try_update(|c| c.finish_send(&query.thread_id, result))
                .unwrap_or(Flow::Stay);
            navigate(flow);
        });
    };
    let send_on_enter = send.clone();

    let threads = Signal::derive(move || chat.with(|c| c.threads.clone()));
    let selected = Signal::derive(move || chat.with(|c| c.selected.clone()));
    let error = Signal::derive(move || chat.with(|c| c.phase.error().map(str::to_string)));
    let loading = move || chat.with(|c| c.phase.is_loading());
    let awaiting_reply = move || {
        chat.with(|c| {
            c.phase.is_loading() && c.messages.last().is_some_and(|m| m.kind == MessageKind::Query)
        })
    };

    view! {
        <div class="flex h-[calc(100vh-10rem)] bg-white rounded-xl border border-gray-200 overflow-hidden">
            <ThreadList
                threads=threads
                selected=selected
                on_select=on_select
                on_create=on_create
            />

            <section class="flex-1 flex flex-col">
                <header class="px-6 py-4 border-b border-gray-200">
                    <h1 class="text-lg font-semibold truncate">
                        {move || chat.with(|c| {
                            if c.selected.is_some() {
                                c.thread_name.clone()
                            } else {
                                "Select or create a chat".to_string()
                            }
                        })}
                    </h1>
                </header>

                <div class="px-6 pt-4">
                    <ErrorBanner message=error />
                </div>

                <div node_ref=messages_ref class="flex-1 overflow-y-auto px-6 py-4 space-y-3">
                    {move || {
                        chat.with(|c| c.messages.clone())
                            .into_iter()
                            .map(|message| view! { <MessageBubble message=message /> })
                            .collect_view()
                    }}
                    <Show when=awaiting_reply>
                        <TypingIndicator />
                    </Show>
                </div>

                <form
                    class="border-t border-gray-200 p-4 flex space-x-2"
                    on:submit=move |ev: web_sys::SubmitEvent| {
                        ev.prevent_default();
                        send();
                    }
                >
                    <textarea
                        rows="2"
                        placeholder="Type a message..."
                        class="flex-1 border border-gray-300 rounded-lg px-3 py-2 resize-none"
                        prop:value=move || input.get()
                        prop:disabled=move || selected.with(Option::is_none)
                        on:input=move |ev| input.set(event_target_value(&ev))
                        on:keydown=move |ev: web_sys::KeyboardEvent| {
                            // Enter sends, Shift+Enter breaks the line
                            if ev.key() == "Enter" && !ev.shift_key() {
                                ev.prevent_default();
                                send_on_enter();
                            }
                        }
                    />
                    <button
                        type="submit"
                        disabled=move || loading() || selected.with(Option::is_none)
                        class="px-5 rounded-lg bg-blue-600 hover:bg-blue-700 disabled:bg-gray-400 text-white font-medium"
                    >
                        "Send"
                    </button>
                </form>
            </section>
        </div>
    }
}

#[component]
fn MessageBubble(message: Message) -> impl IntoView {
    let (row, bubble) = match message.kind {
        MessageKind::Query => ("flex justify-end", "bg-blue-600 text-white"),
        MessageKind::Response => ("flex justify-start", "bg-gray-100 text-gray-900"),
    };

    view! {
        <div class=row>
            <div class=format!("max-w-[75%] rounded-2xl px-4 py-2 whitespace-pre-wrap {}", bubble)>
                {message.content}
                <div class="text-xs opacity-60 mt-1">
                    {message.created_at.with_timezone(&chrono::Local).format("%H:%M").to_string()}
                </div>
            </div>
        </div>
    }
}

async fn refresh_threads(client: &Client, chat: RwSignal<ChatState>) -> Flow {
    chat.update(|c| c.begin_threads());
    let result = client.list_threads().await;
    chat.try_update(|c| c.finish_threads(result))
        .unwrap_or(Flow::Stay)
}

/// Select a thread and replace the visible history with its messages
async fn open_thread(client: &Client, chat: RwSignal<ChatState>, thread_id: &str) -> Flow {
    chat.update(|c| c.begin_select(thread_id));
    let result = client.thread(thread_id).await;
    chat.try_update(|c| c.finish_select(result))
        .unwrap_or(Flow::Stay)
}
