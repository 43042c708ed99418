//! Usage Detail Dialog
//!
//! Per-dimension usage over a chosen date range, charted.

use leptos::*;

use chatbot::controllers::billing::format_total;
use chatbot::controllers::{DateRange, DetailState};

use crate::components::{ErrorBanner, Loading, UsageChart};

/// Modal showing one dimension's usage
#[component]
pub fn UsageDetailDialog(
    #[prop(into)]
    detail: Signal<DetailState>,
    on_apply: Callback<DateRange>,
    on_close: Callback<()>,
) -> impl IntoView {
    let initial = detail.with_untracked(|d| d.range);
    let start = create_rw_signal(initial.start_input());
    let end = create_rw_signal(initial.end_input());
    let (range_error, set_range_error) = create_signal(None::<String>);

    let kind = detail.with_untracked(|d| d.kind());

    let apply = move |_| match DateRange::parse(&start.get_untracked(), &end.get_untracked()) {
        Ok(range) => {
            set_range_error.set(None);
            on_apply.call(range);
        }
        Err(e) => set_range_error.set(Some(e.to_string())),
    };

    let error = Signal::derive(move || {
        range_error
            .get()
            .or_else(|| detail.with(|d| d.phase.error().map(str::to_string)))
    });
    let points = Signal::derive(move || detail.with(|d| d.chart_points()));

    view! {
        <div class="fixed inset-0 z-40 bg-black/40 flex items-center justify-center px-4">
            <div class="bg-white rounded-xl shadow-lg w-full max-w-3xl p-6 space-y-4">
                <div class="flex items-center justify-between">
                    <div>
                        <span
                            class="text-xs font-semibold uppercase tracking-wide"
                            style=format!("color: {}", kind.color())
                        >
                            {kind.label()}
                        </span>
                        <h2 class="text-lg font-semibold">{move || detail.with(|d| d.dimension.clone())}</h2>
                    </div>
                    <button
                        on:click=move |_| on_close.call(())
                        class="text-gray-400 hover:text-gray-700 text-xl"
                    >
                        "✕"
                    </button>
                </div>

                // Range controls
                <div class="flex flex-wrap items-end gap-3">
                    <DateInput label="Start" value=start />
                    <DateInput label="End" value=end />
                    <button
                        on:click=apply
                        class="px-4 py-2 rounded-lg bg-blue-600 hover:bg-blue-700 text-white font-medium"
                    >
                        "Apply"
                    </button>
                </div>

                <ErrorBanner message=error />

                {move || if detail.with(|d| d.phase.is_loading()) {
                    view! { <Loading /> }.into_view()
                } else {
                    view! {
                        <UsageChart points=points color=kind.color() />
                        <ul class="max-h-48 overflow-y-auto divide-y divide-gray-100 text-sm">
                            {detail.with(|d| d.records.clone())
                                .into_iter()
                                .map(|record| {
                                    let day = record
                                        .start_time
                                        .map(|t| t.format("%Y-%m-%d").to_string())
                                        .unwrap_or_default();
                                    view! {
                                        <li class="flex justify-between py-2">
                                            <span class="text-gray-600">{day}</span>
                                            <span class="font-medium">{format_total(record.total)}</span>
                                        </li>
                                    }
                                })
                                .collect_view()}
                        </ul>
                    }
                    .into_view()
                }}
            </div>
        </div>
    }
}

#[component]
fn DateInput(label: &'static str, value: RwSignal<String>) -> impl IntoView {
    view! {
        <label class="block">
            <span class="block text-sm text-gray-600 mb-1">{label}</span>
            <input
                type="date"
                class="border border-gray-300 rounded-lg px-3 py-2"
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        </label>
    }
}
