use dioxus::prelude::*;

use crate::{
    app::fetch_exchange_rates,
    domain::{convert, AppState, ExchangeRates},
    infra::api::{ApiClient, CacheStatus},
    ui::{
        components::notice::{notify, NoticeLevel, Notices},
        theme,
    },
};

#[component]
pub fn CurrencyPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let notices = use_context::<Notices>();
    let client = use_context::<Option<ApiClient>>();

    let mut amount = use_signal(|| "1".to_string());

    let mut rates_resource = use_resource(move || fetch_exchange_rates(state, client.clone()));

    let rates = state
        .with(|st| st.exchange_rates.clone())
        .unwrap_or_else(ExchangeRates::fallback);
    let conversion = convert(&amount(), &rates);
    let markup = format!("+{:.2}%", conversion.markup_pct);
    let extra_cost = format!("+₹{:.2}", conversion.difference);

    let (loading, error) = match &*rates_resource.read() {
        None => (true, None),
        Some(Ok(_)) => (false, None),
        Some(Err(message)) => (false, Some(message.clone())),
    };

    let on_refresh = move |_| {
        rates_resource.restart();
        notify(notices, NoticeLevel::Info, "Fetching latest exchange rates…");
    };

    let stale = matches!(&*rates_resource.read(), Some(Ok(CacheStatus::Stale)));
    let updated = rates
        .last_updated
        .clone()
        .or_else(|| rates.rbi.date.clone())
        .unwrap_or_else(|| "unknown".to_string());

    rsx! {
        div { class: "stack",
            header { class: "page-header",
                div {
                    h2 { "Currency Converter" }
                    p { class: "muted small", "USD to INR at the RBI reference rate and a bank card rate." }
                }
                button {
                    class: "{theme::btn_ghost()}",
                    disabled: loading,
                    onclick: on_refresh,
                    if loading { "Loading…" } else { "⟳ Refresh rates" }
                }
            }

            if let Some(message) = error {
                div { class: "panel error-card", p { "{message}" } }
            }
            if stale {
                p { class: "muted small", "Rates could not be refreshed; showing the last known values." }
            }

            section { class: "panel stack-tight",
                label { class: "{theme::label_class()}", r#for: "usd-amount", "Amount (USD)" }
                div { class: "amount-row",
                    span { class: "amount-prefix", "$" }
                    input {
                        id: "usd-amount",
                        class: "{theme::input_class()} amount-input",
                        r#type: "text",
                        inputmode: "decimal",
                        placeholder: "Enter amount",
                        value: "{amount}",
                        oninput: move |evt: FormEvent| amount.set(evt.value()),
                    }
                }
                p { class: "muted small", "Updated: {updated}" }
            }

            section { class: "grid-2",
                RateCard {
                    title: "RBI Reference".to_string(),
                    rate: rates.rbi.usd_inr,
                    value: conversion.rbi_value,
                    highlight: false,
                }
                RateCard {
                    title: "HDFC Bank Rate".to_string(),
                    rate: rates.bank.usd_inr,
                    value: conversion.bank_value,
                    highlight: true,
                }
            }

            section { class: "panel stack-tight",
                h3 { class: "{theme::label_class()}", "Rate Analysis" }
                div { class: "analysis-row",
                    span { "Bank Markup" }
                    span { class: "strong warn", "{markup}" }
                }
                div { class: "analysis-row",
                    span { "Additional Cost" }
                    span { class: "strong warn", "{extra_cost}" }
                }
                p { class: "muted small",
                    "* Rates are indicative. Actual bank rates may vary at the time of transaction."
                }
            }
        }
    }
}

#[component]
fn RateCard(title: String, rate: f64, value: f64, highlight: bool) -> Element {
    let rate = format!("1 USD = ₹{rate:.4}");
    let value = format!("₹{value:.2}");
    rsx! {
        div {
            class: if highlight { "panel kpi rate-card rate-card-bank" } else { "panel kpi rate-card" },
            h3 { class: "{theme::label_class()}", "{title}" }
            p { class: "muted small", "{rate}" }
            p { class: "kpi-value", "{value}" }
        }
    }
}
