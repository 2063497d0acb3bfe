use dioxus::prelude::*;

use crate::{
    app::{fetch_history, persist_user_state, Route, CACHE_TTL},
    domain::{
        apply_markup, distinct_states, districts_in_state, format_price, group_by_unit,
        price_summary, sort_records, AppState, CacheResource, CommodityId, PriceSource,
        RecordFilter, ScoreWeights, Selection, SortField, HISTORY_PRICE_MARKUP,
    },
    infra::api::{ApiClient, CacheStatus},
    ui::{
        components::{
            kpi_card::KpiCard, market_table::MarketTable, price_chart::PriceChart,
            score_meter::ScoreMeter,
        },
        theme,
    },
};

#[component]
pub fn DetailsPage(id: CommodityId) -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let client = use_context::<Option<ApiClient>>();
    let nav = use_navigator();

    let mut source = use_signal(|| None::<PriceSource>);
    let mut state_filter = use_signal(|| None::<String>);
    let mut district_filter = use_signal(|| None::<String>);
    let mut search = use_signal(String::new);

    let history_resource = use_resource(move || {
        let client = client.clone();
        async move {
            if !state
                .peek()
                .is_stale(&CacheResource::History(id), CACHE_TTL)
            {
                return Ok(CacheStatus::Cached);
            }
            fetch_history(state, client, id).await
        }
    });

    let Some(commodity) = state.with(|st| st.commodity(id).cloned()) else {
        return rsx! {
            div { class: "panel stack-tight",
                p { "This commodity is not part of the loaded listing." }
                button {
                    class: "{theme::btn_primary()}",
                    onclick: move |_| { nav.push(Route::Prices {}); },
                    "Back to prices"
                }
            }
        };
    };

    let records = commodity.records.clone();
    let filter = RecordFilter {
        source: source(),
        state: state_filter(),
        district: district_filter(),
        search: search(),
    };
    let Selection {
        records: filtered,
        context: score_context,
        commodity_score: score,
    } = filter.select(&records, &ScoreWeights::DEFAULT);
    let summary = price_summary(&filtered);
    let has_enam = records.iter().any(|record| record.is_enam());
    let sort = state.with(|st| st.market_sort);

    let mut groups = group_by_unit(&filtered);
    for group in &mut groups {
        sort_records(&mut group.records, sort);
    }

    let states = distinct_states(&records);
    let districts = state_filter()
        .map(|selected| districts_in_state(&records, &selected))
        .unwrap_or_default();

    let history = state.with(|st| {
        st.history
            .get(&id)
            .map(|points| apply_markup(points, HISTORY_PRICE_MARKUP))
    });
    let history_error = history_resource
        .read()
        .as_ref()
        .and_then(|result| result.as_ref().err().cloned());

    let on_sort = move |field: SortField| {
        state.with_mut(|st| st.market_sort = st.market_sort.select(field));
        persist_user_state(&state);
    };

    let summary_value = |pick: fn(f64, f64, f64) -> f64| {
        format_price(summary.map(|s| pick(s.average, s.min, s.max)))
    };

    rsx! {
        div { class: "stack",
            header { class: "page-header",
                div {
                    button {
                        class: "link",
                        onclick: move |_| { nav.push(Route::Prices {}); },
                        "← All commodities"
                    }
                    h2 { "{commodity.name}" }
                    p { class: "muted small", "{records.len()} reports · {filtered.len()} shown" }
                }
            }

            section { class: "grid-3",
                KpiCard {
                    title: "Average".to_string(),
                    value: summary_value(|avg, _, _| avg),
                    description: summary.map(|s| format!("{} markets with prices", s.valid_count)),
                }
                KpiCard { title: "Lowest".to_string(), value: summary_value(|_, min, _| min), description: None }
                KpiCard { title: "Highest".to_string(), value: summary_value(|_, _, max| max), description: None }
            }

            if has_enam {
                div { class: "panel", ScoreMeter { score } }
            }

            section { class: "panel",
                match history {
                    Some(points) => rsx! { PriceChart { points } },
                    None => match history_error {
                        Some(message) => rsx! {
                            div { class: "error-card",
                                p { "{message}" }
                                button {
                                    class: "{theme::btn_ghost()}",
                                    onclick: move |_| history_resource.clone().restart(),
                                    "Retry"
                                }
                            }
                        },
                        None => rsx! { p { class: "muted", "Loading price history…" } },
                    },
                }
            }

            section { class: "panel stack-tight",
                div { class: "pill-row",
                    button {
                        class: theme::pill(source().is_none()),
                        onclick: move |_| source.set(None),
                        "All sources"
                    }
                    button {
                        class: theme::pill(source() == Some(PriceSource::Enam)),
                        onclick: move |_| source.set(Some(PriceSource::Enam)),
                        "eNAM"
                    }
                    button {
                        class: theme::pill(source() == Some(PriceSource::Agmark)),
                        onclick: move |_| source.set(Some(PriceSource::Agmark)),
                        "AGMARK"
                    }
                }
                div { class: "filter-row",
                    select {
                        class: "{theme::input_class()}",
                        value: state_filter().unwrap_or_default(),
                        onchange: move |evt: FormEvent| {
                            let value = evt.value();
                            state_filter.set((!value.is_empty()).then_some(value));
                            district_filter.set(None);
                        },
                        option { value: "", "All states" }
                        for name in states {
                            option { key: "{name}", value: "{name}", "{name}" }
                        }
                    }
                    select {
                        class: "{theme::input_class()}",
                        disabled: state_filter().is_none(),
                        value: district_filter().unwrap_or_default(),
                        onchange: move |evt: FormEvent| {
                            let value = evt.value();
                            district_filter.set((!value.is_empty()).then_some(value));
                        },
                        option { value: "", "All districts" }
                        for name in districts {
                            option { key: "{name}", value: "{name}", "{name}" }
                        }
                    }
                    input {
                        class: "{theme::input_class()}",
                        r#type: "search",
                        placeholder: "Market, district or variety…",
                        value: "{search}",
                        oninput: move |evt: FormEvent| search.set(evt.value()),
                    }
                }
            }

            if groups.is_empty() {
                div { class: "panel muted", "No markets match the current filters." }
            }
            for group in groups {
                section { key: "{group.unit}", class: "panel stack-tight",
                    div { class: "unit-head",
                        h3 { class: "label", "Per {group.unit}" }
                        span { class: "strong", "Avg {format_price(group.average)}" }
                    }
                    MarketTable {
                        records: group.records,
                        score_context,
                        sort,
                        on_sort,
                    }
                }
            }
        }
    }
}
