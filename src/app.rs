use std::time::Duration;

use dioxus::{prelude::*, signals::Signal};

use crate::{
    domain::{AppState, CacheResource, CommodityId, PriceQuery},
    infra::api::{ApiClient, CacheStatus},
    ui::{
        components::notice::{notify, notify_status, Notice, NoticeLevel, NoticeStack, Notices},
        pages::{
            ArticlePage, CurrencyPage, DetailsPage, FreightPage, HomePage, KnowledgePage,
            PricesPage,
        },
        shell::Shell,
    },
    util::{
        assets,
        persistence::{load_persisted_state, save_persisted_state},
    },
};

/// Age after which per-commodity history is fetched again.
pub const CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Delay between asking the backend to re-scrape and reading the result.
const REFRESH_SETTLE: Duration = Duration::from_secs(1);

#[derive(Routable, Clone, PartialEq)]
pub enum Route {
    #[route("/")]
    Home {},
    #[route("/prices")]
    Prices {},
    #[route("/prices/:id")]
    Details { id: CommodityId },
    #[route("/currency")]
    Currency {},
    #[route("/freight")]
    Freight {},
    #[route("/knowledge")]
    Knowledge {},
    #[route("/knowledge/:id")]
    Reader { id: String },
}

#[component]
pub fn App() -> Element {
    let mut state = use_signal(AppState::default);
    use_hook(move || {
        if let Some(saved) = load_persisted_state() {
            state.with_mut(|st| st.apply_persisted(saved));
        }
    });
    use_context_provider(|| state);

    let notices: Notices = use_signal(Vec::<Notice>::new);
    use_context_provider(|| notices);

    let client = use_hook(|| match ApiClient::from_env() {
        Ok(client) => Some(client),
        Err(err) => {
            tracing::error!("failed to initialise API client: {err}");
            None
        }
    });
    use_context_provider(|| client.clone());

    let _metadata = use_resource({
        let client = client.clone();
        move || fetch_metadata(state, notices, client.clone())
    });

    // Refetch page 1 whenever the query snapshot changes.
    let query = use_memo(move || state.read().query.clone());
    let _listing = use_resource({
        let client = client.clone();
        move || {
            let query = query();
            fetch_listing(state, notices, client.clone(), query)
        }
    });

    rsx! {
        document::Link { rel: "icon", href: assets::logo_data_uri() }
        document::Style { "{assets::main_css()}" }
        Router::<Route> {}
        NoticeStack {}
    }
}

pub fn persist_user_state(state: &Signal<AppState>) {
    let snapshot = state.with(|st| st.to_persisted());
    if let Err(err) = save_persisted_state(&snapshot) {
        tracing::warn!("failed to persist user state: {err}");
    }
}

async fn fetch_metadata(
    mut state: Signal<AppState>,
    notices: Notices,
    client: Option<ApiClient>,
) -> Option<CacheStatus> {
    let client = client?;
    match client.get_metadata().await {
        Ok(payload) => {
            state.with_mut(|st| {
                st.metadata = Some(payload.data.clone());
                st.cache
                    .record_fetch(CacheResource::Metadata, payload.fetched_at);
            });
            notify_status(notices, &payload.status, "commodity groups");
            Some(payload.status)
        }
        Err(err) => {
            tracing::warn!("metadata unavailable: {err}");
            notify(
                notices,
                NoticeLevel::Error,
                format!("Failed to load commodity groups: {err}"),
            );
            None
        }
    }
}

/// Loads page 1 for `query`, replacing the listing.
///
/// Results for a query that was superseded while in flight are dropped.
pub async fn fetch_listing(
    mut state: Signal<AppState>,
    notices: Notices,
    client: Option<ApiClient>,
    query: PriceQuery,
) {
    let Some(client) = client else {
        state.with_mut(|st| st.fail_listing(query, "The price API client is unavailable."));
        return;
    };

    let result = client.get_prices(&query, 1).await;
    if state.with(|st| st.query != query) {
        tracing::debug!(date = %query.date_label(), "discarding prices for a superseded query");
        return;
    }

    match result {
        Ok(payload) => {
            let status = payload.status;
            let fetched_at = payload.fetched_at;
            let page = payload.data;
            state.with_mut(|st| {
                st.cache
                    .record_fetch(CacheResource::Prices(query.cache_key()), fetched_at);
                st.replace_listing(query, page.items, page.pagination);
            });
            notify_status(notices, &status, "prices");
        }
        Err(err) => {
            tracing::warn!(date = %query.date_label(), "price listing failed: {err}");
            state.with_mut(|st| st.fail_listing(query, format!("Connection error: {err}")));
        }
    }
}

/// Appends the next page while the backend reports more.
pub async fn load_more_listing(
    mut state: Signal<AppState>,
    notices: Notices,
    client: Option<ApiClient>,
) {
    let Some(client) = client else { return };
    let (query, pagination) = state.with(|st| (st.loaded_query.clone(), st.pagination));
    let Some(query) = query else { return };
    if !pagination.has_more {
        return;
    }

    let next = pagination.page + 1;
    match client.get_prices(&query, next).await {
        Ok(payload) => {
            if state.with(|st| st.loaded_query.as_ref() != Some(&query)) {
                return;
            }
            let page = payload.data;
            state.with_mut(|st| st.append_page(page.items, page.pagination));
        }
        Err(err) => {
            tracing::warn!(page = next, "failed to load more prices: {err}");
            notify(notices, NoticeLevel::Error, format!("Failed to load more: {err}"));
        }
    }
}

/// Asks the backend to re-scrape the selected date, then reloads page 1.
pub async fn force_refresh_listing(
    state: Signal<AppState>,
    notices: Notices,
    client: Option<ApiClient>,
) {
    let query = state.with(|st| st.query.clone());
    if let Some(ref client) = client {
        match client.trigger_refresh(&query.date_label()).await {
            Ok(()) => {
                notify(notices, NoticeLevel::Info, "Refresh requested; reloading prices...");
                tokio::time::sleep(REFRESH_SETTLE).await;
            }
            Err(err) => {
                tracing::warn!("refresh trigger failed: {err}");
            }
        }
    }
    fetch_listing(state, notices, client, query.clone()).await;
    if state.with(|st| st.loaded_query.as_ref() == Some(&query) && st.listing_error.is_none()) {
        notify(
            notices,
            NoticeLevel::Success,
            format!("Prices for {} are up to date.", query.date_label()),
        );
    }
}

pub async fn fetch_history(
    mut state: Signal<AppState>,
    client: Option<ApiClient>,
    commodity_id: CommodityId,
) -> Result<CacheStatus, String> {
    let client = client.ok_or_else(|| "The price API client is unavailable.".to_string())?;
    let payload = client
        .get_history(commodity_id)
        .await
        .map_err(|err| format!("Could not load price history: {err}"))?;
    state.with_mut(|st| {
        st.cache
            .record_fetch(CacheResource::History(commodity_id), payload.fetched_at);
        st.history.insert(commodity_id, payload.data);
    });
    Ok(payload.status)
}

pub async fn fetch_exchange_rates(
    mut state: Signal<AppState>,
    client: Option<ApiClient>,
) -> Result<CacheStatus, String> {
    let client = client.ok_or_else(|| "The price API client is unavailable.".to_string())?;
    match client.get_exchange_rates().await {
        Ok(payload) => {
            state.with_mut(|st| {
                st.cache
                    .record_fetch(CacheResource::ExchangeRates, payload.fetched_at);
                st.exchange_rates = Some(payload.data);
            });
            Ok(payload.status)
        }
        Err(err) => {
            tracing::warn!("exchange rates unavailable: {err}");
            Err("Could not fetch latest rates. Showing indicative rates instead.".to_string())
        }
    }
}

#[component]
pub fn Home() -> Element {
    rsx! { Shell { HomePage {} } }
}

#[component]
pub fn Prices() -> Element {
    rsx! { Shell { PricesPage {} } }
}

#[component]
pub fn Details(id: CommodityId) -> Element {
    rsx! { Shell { DetailsPage { id } } }
}

#[component]
pub fn Currency() -> Element {
    rsx! { Shell { CurrencyPage {} } }
}

#[component]
pub fn Freight() -> Element {
    rsx! { Shell { FreightPage {} } }
}

#[component]
pub fn Knowledge() -> Element {
    rsx! { Shell { KnowledgePage {} } }
}

#[component]
pub fn Reader(id: String) -> Element {
    rsx! { Shell { ArticlePage { id } } }
}
