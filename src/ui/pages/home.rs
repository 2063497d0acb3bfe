use dioxus::prelude::*;

use crate::{
    app::Route,
    domain::{summarize_commodity, AppState, CommoditySummary, ScoreWeights},
    ui::components::{kpi_card::KpiCard, score_meter::ScoreMeter},
    util::assets,
};

const TOP_MOVERS: usize = 3;

#[component]
pub fn HomePage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let nav = use_navigator();

    let (commodity_count, group_count) = state.with(|st| {
        st.metadata
            .as_ref()
            .map(|meta| (meta.commodities.len(), meta.groups.len()))
            .unwrap_or_default()
    });
    let date_label = state.with(|st| st.query.date_label());
    let summaries: Vec<CommoditySummary> = state.with(|st| {
        st.listing
            .iter()
            .map(|prices| summarize_commodity(prices, &ScoreWeights::DEFAULT))
            .collect()
    });
    let priced = summaries.iter().filter(|s| s.has_data()).count();
    let listed = state.with(|st| st.pagination.total.max(st.listing.len() as u32));

    let article_count = assets::articles().len();
    let mut top = summaries
        .into_iter()
        .filter(|s| s.trade_score > 0.0)
        .collect::<Vec<_>>();
    top.sort_by(|a, b| b.trade_score.total_cmp(&a.trade_score));
    top.truncate(TOP_MOVERS);

    rsx! {
        div { class: "stack",
            section { class: "hero",
                h2 { "Namaste 👋" }
                p { class: "muted", "Daily mandi prices, eNAM trade activity and the paperwork side of exporting in one place." }
            }

            section { class: "grid-3",
                KpiCard {
                    title: "Commodities tracked".to_string(),
                    value: commodity_count.to_string(),
                    description: Some(format!("{group_count} commodity groups")),
                }
                KpiCard {
                    title: "Listed today".to_string(),
                    value: listed.to_string(),
                    description: Some(format!("Prices for {date_label}")),
                }
                KpiCard {
                    title: "With prices".to_string(),
                    value: priced.to_string(),
                    description: Some("Loaded commodities reporting a modal price".to_string()),
                }
            }

            if !top.is_empty() {
                section { class: "panel",
                    h3 { class: "label", "Most active on eNAM" }
                    for summary in top {
                        div {
                            key: "{summary.commodity_id}",
                            class: "top-row clickable",
                            onclick: move |_| { nav.push(Route::Details { id: summary.commodity_id }); },
                            div { class: "top-row-head",
                                span { class: "strong", "{summary.name}" }
                                span { "{summary.price_display()}" }
                            }
                            ScoreMeter { score: summary.trade_score, compact: true }
                        }
                    }
                }
            }

            section { class: "grid-2",
                ToolCard { icon: "🌾", title: "Goods prices", text: "Browse today's mandi rates by commodity group.".to_string(), route: Route::Prices {} }
                ToolCard { icon: "💱", title: "Currency", text: "Compare the RBI reference rate with your bank's card rate.".to_string(), route: Route::Currency {} }
                ToolCard { icon: "📦", title: "Freight calculator", text: "Work out CBM, chargeable weight and LCL vs FCL.".to_string(), route: Route::Freight {} }
                ToolCard { icon: "📚", title: "Knowledge hub", text: format!("{article_count} guides on Incoterms and export documents."), route: Route::Knowledge {} }
            }
        }
    }
}

#[component]
fn ToolCard(icon: &'static str, title: &'static str, text: String, route: Route) -> Element {
    let nav = use_navigator();
    rsx! {
        button {
            class: "tool-card",
            onclick: move |_| { nav.push(route.clone()); },
            span { class: "tool-icon", "{icon}" }
            div {
                p { class: "strong", "{title}" }
                p { class: "muted small", "{text}" }
            }
        }
    }
}
