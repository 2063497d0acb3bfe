use dioxus::prelude::*;
use time::OffsetDateTime;

use crate::{
    app::{fetch_listing, force_refresh_listing, load_more_listing, Route},
    domain::{
        summarize_commodity, AppState, CommoditySummary, PriceQuery, PriceSource, ScoreWeights,
    },
    infra::api::ApiClient,
    ui::{
        components::{
            notice::Notices,
            score_meter::ScoreMeter,
            source_badge::SourceBadge,
        },
        theme,
    },
};

#[component]
pub fn PricesPage() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let notices = use_context::<Notices>();
    let client = use_context::<Option<ApiClient>>();

    let mut loading_more = use_signal(|| false);
    let mut refreshing = use_signal(|| false);

    let query = state.with(|st| st.query.clone());
    let groups = state.with(|st| {
        st.metadata
            .as_ref()
            .map(|meta| meta.groups.clone())
            .unwrap_or_default()
    });
    let pending = state.with(|st| st.listing_pending());
    let error = state.with(|st| st.listing_error.clone());
    let pagination = state.with(|st| st.pagination);
    let summaries: Vec<(CommoditySummary, Option<String>)> = state.with(|st| {
        st.listing
            .iter()
            .map(|prices| {
                let group = prices.group_id.and_then(|id| {
                    st.metadata
                        .as_ref()
                        .and_then(|meta| meta.group_name(id))
                        .map(str::to_string)
                });
                (summarize_commodity(prices, &ScoreWeights::DEFAULT), group)
            })
            .collect()
    });
    let is_today = query.date >= OffsetDateTime::now_utc().date();

    let mut set_query = move |next: PriceQuery| state.with_mut(|st| st.query = next);

    let on_load_more = {
        let client = client.clone();
        move |_| {
            if loading_more() {
                return;
            }
            loading_more.set(true);
            let client = client.clone();
            spawn(async move {
                load_more_listing(state, notices, client).await;
                loading_more.set(false);
            });
        }
    };

    let on_refresh = {
        let client = client.clone();
        move |_| {
            if refreshing() {
                return;
            }
            refreshing.set(true);
            let client = client.clone();
            spawn(async move {
                force_refresh_listing(state, notices, client).await;
                refreshing.set(false);
            });
        }
    };

    let on_retry = {
        let client = client.clone();
        move |_| {
            let query = state.with(|st| st.query.clone());
            spawn(fetch_listing(state, notices, client.clone(), query));
        }
    };

    rsx! {
        div { class: "stack",
            header { class: "page-header",
                div {
                    h2 { "Goods Prices" }
                    p { class: "muted small", "Modal prices reported by mandis via eNAM and AGMARK." }
                }
                button {
                    class: "{theme::btn_ghost()}",
                    disabled: refreshing(),
                    onclick: on_refresh,
                    if refreshing() { "Refreshing…" } else { "⟳ Force refresh" }
                }
            }

            div { class: "date-stepper",
                button {
                    class: "{theme::btn_ghost()}",
                    onclick: {
                        let query = query.clone();
                        move |_| set_query(query.previous_day())
                    },
                    "◀"
                }
                span { class: "strong", "{query.date_label()}" }
                button {
                    class: "{theme::btn_ghost()}",
                    disabled: is_today,
                    onclick: {
                        let query = query.clone();
                        move |_| set_query(query.next_day())
                    },
                    "▶"
                }
            }

            input {
                class: "{theme::input_class()}",
                r#type: "search",
                placeholder: "Search commodities…",
                value: "{query.search}",
                oninput: {
                    let query = query.clone();
                    move |evt: FormEvent| set_query(query.with_search(evt.value()))
                },
            }

            div { class: "pill-row",
                button {
                    class: theme::pill(query.group_id.is_none()),
                    onclick: {
                        let query = query.clone();
                        move |_| set_query(query.with_group(None))
                    },
                    "All"
                }
                for group in groups {
                    button {
                        key: "{group.id}",
                        class: theme::pill(query.group_id == Some(group.id)),
                        onclick: {
                            let query = query.clone();
                            move |_| set_query(query.with_group(Some(group.id)))
                        },
                        "{group.name}"
                    }
                }
            }

            label { class: "toggle",
                input {
                    r#type: "checkbox",
                    checked: query.only_with_prices,
                    onchange: {
                        let query = query.clone();
                        move |_| set_query(query.toggled_only_with_prices())
                    },
                }
                span { "Only commodities with prices" }
            }

            if pending {
                div { class: "panel muted", "Loading prices…" }
            } else if let Some(message) = error {
                div { class: "panel error-card",
                    p { "{message}" }
                    button { class: "{theme::btn_primary()}", onclick: on_retry, "Retry" }
                }
            } else if summaries.is_empty() {
                div { class: "panel muted", "No commodities found for this date and filter." }
            } else {
                div { class: "stack-tight",
                    for (summary, group) in summaries {
                        CommodityCard { key: "{summary.commodity_id}", summary, group }
                    }
                }
                if pagination.has_more {
                    button {
                        class: "{theme::btn_primary()} wide",
                        disabled: loading_more(),
                        onclick: on_load_more,
                        if loading_more() { "Loading…" } else { "Load more" }
                    }
                } else {
                    p { class: "muted small center", "Showing all {pagination.total} commodities" }
                }
            }
        }
    }
}

#[component]
fn CommodityCard(summary: CommoditySummary, group: Option<String>) -> Element {
    let nav = use_navigator();
    let id = summary.commodity_id;
    let markets = match summary.market_count {
        1 => "1 market".to_string(),
        n => format!("{n} markets"),
    };

    rsx! {
        div {
            class: "commodity-card clickable",
            onclick: move |_| { nav.push(Route::Details { id }); },
            div { class: "commodity-card-head",
                div {
                    p { class: "strong", "{summary.name}" }
                    p { class: "muted small",
                        if let Some(group) = group { "{group} · " }
                        "{markets}"
                    }
                }
                p { class: if summary.has_data() { "price" } else { "price muted" }, "{summary.price_display()}" }
            }
            div { class: "badge-row",
                if summary.has_enam {
                    SourceBadge { source: PriceSource::Enam }
                }
                if summary.has_agmark {
                    SourceBadge { source: PriceSource::Agmark }
                }
            }
            if summary.has_enam {
                ScoreMeter { score: summary.trade_score }
            }
        }
    }
}
