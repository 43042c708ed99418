//! Profiles Page
//!
//! Account profile and billing & usage, as two tabs.

use leptos::*;

use chatbot::api::{UsagePeriod, UsageRecord, UserProfile};
use chatbot::controllers::billing::format_total;
use chatbot::controllers::profile::{avatar_url, or_not_provided, website_label};
use chatbot::controllers::{BillingState, DateRange, DetailState, DimensionKind, Flow, ProfileState};
use chatbot::export::{file_name, usage_csv, CSV_MIME_TYPE};

use crate::api::{save_file, Client};
use crate::components::{ErrorBanner, InlineLoading, Loading, UsageDetailDialog};
use crate::state::{use_flow_navigator, use_global_state};

#[derive(Clone, Copy, PartialEq)]
enum Tab {
    Profile,
    Billing,
}

/// Profile and billing page component
#[component]
pub fn Profiles() -> impl IntoView {
    let (tab, set_tab) = create_signal(Tab::Profile);

    view! {
        <div class="space-y-6">
            <div class="flex space-x-2 border-b border-gray-200">
                <TabButton label="Profile" current=tab target=Tab::Profile on_click=move |_| set_tab.set(Tab::Profile) />
                <TabButton label="Billing & Usage" current=tab target=Tab::Billing on_click=move |_| set_tab.set(Tab::Billing) />
            </div>

            {move || match tab.get() {
                Tab::Profile => view! { <ProfileTab /> }.into_view(),
                Tab::Billing => view! { <BillingTab /> }.into_view(),
            }}
        </div>
    }
}

#[component]
fn TabButton(
    label: &'static str,
    current: ReadSignal<Tab>,
    target: Tab,
    on_click: impl Fn(web_sys::MouseEvent) + 'static,
) -> impl IntoView {
    view! {
        <button
            on:click=on_click
            class=move || {
                let base = "px-4 py-2 -mb-px border-b-2 text-sm font-medium transition-colors";
                if current.get() == target {
                    format!("{} border-blue-600 text-blue-600", base)
                } else {
                    format!("{} border-transparent text-gray-500 hover:text-gray-900", base)
                }
            }
        >
            {label}
        </button>
    }
}

// ============================================
// PROFILE
// ============================================

#[component]
fn ProfileTab() -> impl IntoView {
    let state = use_global_state();
    let navigate = use_flow_navigator();
    let profile = create_rw_signal(ProfileState::default());

    // Fetch once per visit
    create_effect(move |_| {
        let client = state.client.clone();
        let navigate = navigate.clone();
        profile.update(|p| p.begin());
        spawn_local(async move {
            let result = client.profile().await;
            let flow = profile.try_update(|p| p.finish(result)).unwrap_or(Flow::Stay);
            navigate(flow);
        });
    });

    let error = Signal::derive(move || profile.with(|p| p.phase.error().map(str::to_string)));

    view! {
        <ErrorBanner message=error />
        {move || {
            if profile.with(|p| p.phase.is_loading()) {
                return view! { <Loading /> }.into_view();
            }
            profile
                .with(|p| p.profile.clone())
                .map(|user| view! { <ProfileCard user=user /> })
                .into_view()
        }}
    }
}

#[component]
fn ProfileCard(user: UserProfile) -> impl IntoView {
    let website = if user.org_url.trim().is_empty() {
        None
    } else {
        Some((user.org_url.clone(), website_label(&user.org_url)))
    };

    view! {
        <section class="bg-white rounded-xl border border-gray-200 p-6 space-y-6">
            <div class="flex items-center space-x-4">
                <img src=avatar_url(&user.name) alt="" class="w-16 h-16 rounded-full" />
                <div>
                    <h1 class="text-2xl font-bold">{or_not_provided(&user.name).to_string()}</h1>
                    <p class="text-gray-500">{or_not_provided(&user.email).to_string()}</p>
                </div>
            </div>

            <dl class="grid grid-cols-1 md:grid-cols-2 gap-4">
                <Field label="Organisation" value=or_not_provided(&user.org_name).to_string() />
                <Field label="Role" value=or_not_provided(&user.role_type).to_string() />
                <Field label="Plan" value=or_not_provided(&user.plan_name).to_string() />
                <div>
                    <dt class="text-sm text-gray-500">"Website"</dt>
                    <dd class="font-medium">
                        {match website {
                            Some((href, label)) => view! {
                                <a href=href target="_blank" rel="noopener" class="text-blue-600 hover:underline">{label}</a>
                            }.into_view(),
                            None => or_not_provided("").to_string().into_view(),
                        }}
                    </dd>
                </div>
            </dl>

            <div>
                <h2 class="text-sm text-gray-500 mb-1">"Description"</h2>
                <p class="whitespace-pre-wrap">{or_not_provided(&user.org_description).to_string()}</p>
            </div>
        </section>
    }
}

#[component]
fn Field(label: &'static str, value: String) -> impl IntoView {
    view! {
        <div>
            <dt class="text-sm text-gray-500">{label}</dt>
            <dd class="font-medium">{value}</dd>
        </div>
    }
}

// ============================================
// BILLING & USAGE
// ============================================

#[component]
fn BillingTab() -> impl IntoView {
    let state = use_global_state();
    let navigate = use_flow_navigator();
    let billing = create_rw_signal(BillingState::default());

    // Summary fetched once
    let client_for_effect = state.client.clone();
    let navigate_for_effect = navigate.clone();
    create_effect(move |_| {
        let client = client_for_effect.clone();
        let navigate = navigate_for_effect.clone();
        billing.update(|b| b.begin());
        spawn_local(async move {
            let result = client.usage().await;
            let flow = billing.try_update(|b| b.finish(result)).unwrap_or(Flow::Stay);
            navigate(flow);
        });
    });

    let client_for_open = state.client.clone();
    let navigate_for_open = navigate.clone();
    let on_open = Callback::new(move |dimension: String| {
        let client = client_for_open.clone();
        let navigate = navigate_for_open.clone();
        billing.update(|b| {
            b.open_detail(&dimension, today());
        });
        spawn_local(async move {
            navigate(load_detail(&client, billing).await);
        });
    });

    let client_for_apply = state.client.clone();
    let navigate_for_apply = navigate.clone();
    let on_apply = Callback::new(move |range: DateRange| {
        let client = client_for_apply.clone();
        let navigate = navigate_for_apply.clone();
        billing.update(|b| {
            if let Some(detail) = b.detail.as_mut() {
                detail.range = range;
            }
        });
        spawn_local(async move {
            navigate(load_detail(&client, billing).await);
        });
    });

    let on_close = Callback::new(move |_: ()| billing.update(|b| b.close_detail()));

    let state_for_export = state.clone();
    let export = move |_| {
        let result = billing.with_untracked(|b| b.summary.as_ref().map(export_csv));
        match result {
            Some(Ok(())) => state_for_export.show_success("Usage report downloaded"),
            Some(Err(e)) => state_for_export.show_error(&e),
            None => state_for_export.show_error("Nothing to export"),
        }
    };

    let error = Signal::derive(move || billing.with(|b| b.phase.error().map(str::to_string)));
    let records = Signal::derive(move || billing.with(|b| b.records().to_vec()));
    let period = Signal::derive(move || billing.with(|b| b.summary.as_ref().map(period_label)));

    // Remount the dialog only when a different dimension opens
    let open_dimension = create_memo(move |_| {
        billing.with(|b| b.detail.as_ref().map(|d| d.dimension.clone()))
    });
    let detail = Signal::derive(move || {
        billing.with(|b| {
            b.detail
                .clone()
                .unwrap_or_else(|| DetailState::new("", DateRange::month_to_date(today())))
        })
    });

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-2xl font-bold">"Billing & Usage"</h1>
                    <p class="text-gray-500 text-sm">
                        {move || period.get().unwrap_or_default()}
                    </p>
                </div>
                <button
                    on:click=export
                    class="px-4 py-2 rounded-lg bg-blue-600 hover:bg-blue-700 disabled:bg-gray-400 text-white font-medium flex items-center space-x-2"
                    disabled=move || billing.with(|b| b.phase.is_loading())
                >
                    <Show when=move || billing.with(|b| b.phase.is_loading())>
                        <InlineLoading />
                    </Show>
                    <span>"Download CSV"</span>
                </button>
            </div>

            <ErrorBanner message=error />

            <Show
                when=move || !billing.with(|b| b.phase.is_loading())
                fallback=|| view! { <Loading /> }
            >
                <UsageOverview records=records on_open=on_open />
                <UsageTable records=records on_open=on_open />
            </Show>

            {move || open_dimension.get().map(|_| view! {
                <UsageDetailDialog detail=detail on_apply=on_apply on_close=on_close />
            })}
        </div>
    }
}

/// One card per dimension, coloured by its kind
#[component]
fn UsageOverview(
    #[prop(into)]
    records: Signal<Vec<UsageRecord>>,
    on_open: Callback<String>,
) -> impl IntoView {
    view! {
        <div class="grid grid-cols-2 md:grid-cols-4 gap-4">
            {move || {
                records
                    .get()
                    .into_iter()
                    .map(|record| {
                        let kind = DimensionKind::classify(&record.dimension);
                        let dimension = record.dimension.clone();
                        view! {
                            <button
                                on:click=move |_| on_open.call(dimension.clone())
                                class="text-left bg-white rounded-xl border border-gray-200 p-4 hover:shadow-sm transition-shadow"
                            >
                                <span
                                    class="text-xs font-semibold uppercase tracking-wide"
                                    style=format!("color: {}", kind.color())
                                >
                                    {kind.label()}
                                </span>
                                <div class="text-sm text-gray-600 truncate">{record.dimension}</div>
                                <div class="text-2xl font-bold mt-1">{format_total(record.total)}</div>
                            </button>
                        }
                    })
                    .collect_view()
            }}
        </div>
    }
}

#[component]
fn UsageTable(
    #[prop(into)]
    records: Signal<Vec<UsageRecord>>,
    on_open: Callback<String>,
) -> impl IntoView {
    view! {
        <section class="bg-white rounded-xl border border-gray-200">
            <h2 class="px-6 py-4 border-b border-gray-200 font-semibold">"Usage Details"</h2>
            <ul class="divide-y divide-gray-100">
                {move || {
                    let records = records.get();
                    if records.is_empty() {
                        return view! {
                            <li class="px-6 py-8 text-center text-gray-500">"No usage this period"</li>
                        }
                        .into_view();
                    }
                    records
                        .into_iter()
                        .map(|record| {
                            let dimension = record.dimension.clone();
                            view! {
                                <li
                                    on:click=move |_| on_open.call(dimension.clone())
                                    class="px-6 py-3 flex justify-between cursor-pointer hover:bg-gray-50"
                                >
                                    <span>{record.dimension}</span>
                                    <span class="font-medium">{format_total(record.total)}</span>
                                </li>
                            }
                        })
                        .collect_view()
                }}
            </ul>
        </section>
    }
}

/// Fetch the open detail view's range; no-op when nothing is open
async fn load_detail(client: &Client, billing: RwSignal<BillingState>) -> Flow {
    let Some(Some((start, end))) = billing.try_update(|b| b.detail.as_mut().map(DetailState::begin))
    else {
        return Flow::Stay;
    };

    let result = client.usage_range(start, end).await;
    billing
        .try_update(|b| b.detail.as_mut().map(|d| d.finish(result)))
        .flatten()
        .unwrap_or(Flow::Stay)
}

fn export_csv(period: &UsagePeriod) -> Result<(), String> {
    let csv = usage_csv(period).map_err(|e| e.to_string())?;
    save_file(&file_name(period, today()), &csv, CSV_MIME_TYPE)
}

fn period_label(period: &UsagePeriod) -> String {
    let range = DateRange::of_period(period, today());
    format!("{} to {}", range.start_input(), range.end_input())
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
