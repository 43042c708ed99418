//! Thread Sidebar Component
//!
//! Lists chat threads and hosts the new-chat dialog.

use leptos::*;

use chatbot::api::Thread;

/// Sidebar listing the user's threads
#[component]
pub fn ThreadList(
    #[prop(into)]
    threads: Signal<Vec<Thread>>,
    #[prop(into)]
    selected: Signal<Option<String>>,
    on_select: Callback<String>,
    /// Called with `(name, description)`
    on_create: Callback<(String, String)>,
) -> impl IntoView {
    let (dialog_open, set_dialog_open) = create_signal(false);

    view! {
        <aside class="w-72 shrink-0 bg-white border-r border-gray-200 flex flex-col">
            <div class="p-4 border-b border-gray-200">
                <button
                    on:click=move |_| set_dialog_open.set(true)
                    class="w-full bg-blue-600 hover:bg-blue-700 text-white rounded-lg py-2 font-medium transition-colors"
                >
                    "+ New Chat"
                </button>
            </div>

            <ul class="flex-1 overflow-y-auto p-2 space-y-1">
                {move || {
                    let threads = threads.get();
                    if threads.is_empty() {
                        return view! {
                            <li class="text-sm text-gray-500 text-center py-6">"No chats yet"</li>
                        }
                        .into_view();
                    }

                    threads
                        .into_iter()
                        .map(|thread| {
                            let id = thread.id.clone();
                            let id_for_class = thread.id.clone();
                            let is_active = move || selected.with(|s| s.as_deref() == Some(id_for_class.as_str()));
                            view! {
                                <li>
                                    <button
                                        on:click=move |_| on_select.call(id.clone())
                                        class=move || {
                                            let base = "w-full text-left px-3 py-2 rounded-lg text-sm truncate transition-colors";
                                            if is_active() {
                                                format!("{} bg-blue-50 text-blue-700 font-medium", base)
                                            } else {
                                                format!("{} text-gray-700 hover:bg-gray-100", base)
                                            }
                                        }
                                    >
                                        {thread.name}
                                    </button>
                                </li>
                            }
                        })
                        .collect_view()
                }}
            </ul>

            <Show when=move || dialog_open.get()>
                <NewThreadDialog
                    on_close=Callback::new(move |_: ()| set_dialog_open.set(false))
                    on_create=on_create
                />
            </Show>
        </aside>
    }
}

/// Modal asking for a thread name and description
#[component]
fn NewThreadDialog(
    on_close: Callback<()>,
    on_create: Callback<(String, String)>,
) -> impl IntoView {
    let name = create_rw_signal(String::new());
    let description = create_rw_signal(String::new());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        on_create.call((name.get_untracked(), description.get_untracked()));
        on_close.call(());
    };

    view! {
        <div class="fixed inset-0 z-40 bg-black/40 flex items-center justify-center">
            <form on:submit=on_submit class="bg-white rounded-xl shadow-lg w-full max-w-md p-6 space-y-4">
                <h2 class="text-lg font-semibold">"New Chat"</h2>

                <label class="block">
                    <span class="block text-sm text-gray-600 mb-1">"Name"</span>
                    <input
                        type="text"
                        placeholder="New Chat"
                        class="w-full border border-gray-300 rounded-lg px-3 py-2"
                        prop:value=move || name.get()
                        on:input=move |ev| name.set(event_target_value(&ev))
                    />
                </label>

                <label class="block">
                    <span class="block text-sm text-gray-600 mb-1">"Description"</span>
                    <textarea
                        rows="3"
                        class="w-full border border-gray-300 rounded-lg px-3 py-2"
                        prop:value=move || description.get()
                        on:input=move |ev| description.set(event_target_value(&ev))
                    />
                </label>

                <div class="flex justify-end space-x-2">
                    <button
                        type="button"
                        on:click=move |_| on_close.call(())
                        class="px-4 py-2 rounded-lg text-gray-600 hover:bg-gray-100"
                    >
                        "Cancel"
                    </button>
                    <button
                        type="submit"
                        class="px-4 py-2 rounded-lg bg-blue-600 hover:bg-blue-700 text-white font-medium"
                    >
                        "Create"
                    </button>
                </div>
            </form>
        </div>
    }
}
