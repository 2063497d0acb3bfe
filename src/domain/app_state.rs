use std::{
    collections::HashMap,
    time::{Duration, SystemTime},
};

use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date, OffsetDateTime};

use super::aggregation::SortState;
use super::currency::ExchangeRates;
use super::entities::{CommodityId, CommodityPrices, HistoryPoint, Metadata, Pagination};
use super::freight::FreightSheet;

/// Page size requested from the prices endpoint.
pub const PAGE_SIZE: u32 = 20;

/// Filters of the goods-prices listing.
///
/// Every change produces a new snapshot; the listing refetches from page 1
/// whenever the snapshot differs from the one it was loaded for.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PriceQuery {
    pub date: Date,
    pub search: String,
    pub group_id: Option<i64>,
    pub only_with_prices: bool,
}

impl PriceQuery {
    pub fn today() -> Self {
        Self::for_date(OffsetDateTime::now_utc().date())
    }

    pub fn for_date(date: Date) -> Self {
        Self {
            date,
            search: String::new(),
            group_id: None,
            only_with_prices: false,
        }
    }

    pub fn previous_day(&self) -> Self {
        Self {
            date: self.date.previous_day().unwrap_or(self.date),
            ..self.clone()
        }
    }

    pub fn next_day(&self) -> Self {
        Self {
            date: self.date.next_day().unwrap_or(self.date),
            ..self.clone()
        }
    }

    pub fn with_search(&self, search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ..self.clone()
        }
    }

    pub fn with_group(&self, group_id: Option<i64>) -> Self {
        Self {
            group_id,
            ..self.clone()
        }
    }

    pub fn toggled_only_with_prices(&self) -> Self {
        Self {
            only_with_prices: !self.only_with_prices,
            ..self.clone()
        }
    }

    /// `YYYY-MM-DD`, the format the API expects.
    pub fn date_label(&self) -> String {
        format_date(self.date)
    }

    /// Stable key used for caching responses of this query.
    pub fn cache_key(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.date_label(),
            self.search.trim().to_lowercase(),
            self.group_id.map(|id| id.to_string()).unwrap_or_default(),
            self.only_with_prices
        )
    }
}

pub fn format_date(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| date.to_string())
}

#[derive(Clone, Debug)]
pub struct AppState {
    pub metadata: Option<Metadata>,
    pub query: PriceQuery,
    /// Query the current listing was loaded for.
    pub loaded_query: Option<PriceQuery>,
    pub listing: Vec<CommodityPrices>,
    pub pagination: Pagination,
    /// Message of the last failed listing load, cleared by the next success.
    pub listing_error: Option<String>,
    pub history: HashMap<CommodityId, Vec<HistoryPoint>>,
    pub exchange_rates: Option<ExchangeRates>,
    pub freight: FreightSheet,
    pub market_sort: SortState,
    pub cache: CacheTimestamps,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            metadata: None,
            query: PriceQuery::today(),
            loaded_query: None,
            listing: Vec::new(),
            pagination: Pagination::default(),
            listing_error: None,
            history: HashMap::new(),
            exchange_rates: None,
            freight: FreightSheet::default(),
            market_sort: SortState::default(),
            cache: CacheTimestamps::default(),
        }
    }
}

impl AppState {
    pub fn is_stale(&self, resource: &CacheResource, ttl: Duration) -> bool {
        self.cache.is_stale(resource, ttl)
    }

    pub fn commodity(&self, id: CommodityId) -> Option<&CommodityPrices> {
        self.listing.iter().find(|item| item.commodity_id == id)
    }

    /// Replaces the listing with the first page of a new query.
    pub fn replace_listing(
        &mut self,
        query: PriceQuery,
        items: Vec<CommodityPrices>,
        pagination: Pagination,
    ) {
        self.listing = items;
        self.pagination = pagination;
        self.loaded_query = Some(query);
        self.listing_error = None;
    }

    /// Records a failed first-page load so the screen stops waiting for it.
    pub fn fail_listing(&mut self, query: PriceQuery, message: impl Into<String>) {
        self.listing.clear();
        self.pagination = Pagination::default();
        self.loaded_query = Some(query);
        self.listing_error = Some(message.into());
    }

    /// True while the listing shown does not belong to the current query.
    pub fn listing_pending(&self) -> bool {
        self.loaded_query.as_ref() != Some(&self.query)
    }

    /// Appends a further page, skipping commodities already listed.
    pub fn append_page(&mut self, items: Vec<CommodityPrices>, pagination: Pagination) {
        for item in items {
            if self.commodity(item.commodity_id).is_none() {
                self.listing.push(item);
            }
        }
        self.pagination = pagination;
    }

    pub fn apply_persisted(&mut self, persisted: PersistedState) {
        self.freight = persisted.freight.normalized();
        self.market_sort = persisted.market_sort;
    }

    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            freight: self.freight.clone(),
            market_sort: self.market_sort,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct CacheTimestamps {
    entries: HashMap<CacheResource, SystemTime>,
}

impl CacheTimestamps {
    pub fn record_fetch(&mut self, resource: CacheResource, fetched_at: SystemTime) {
        self.entries.insert(resource, fetched_at);
    }

    pub fn fetched_at(&self, resource: &CacheResource) -> Option<SystemTime> {
        self.entries.get(resource).copied()
    }

    pub fn is_stale(&self, resource: &CacheResource, ttl: Duration) -> bool {
        self.fetched_at(resource)
            .map(|time| time.elapsed().map(|elapsed| elapsed > ttl).unwrap_or(true))
            .unwrap_or(true)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CacheResource {
    Metadata,
    Prices(String),
    History(CommodityId),
    ExchangeRates,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub freight: FreightSheet,
    #[serde(default)]
    pub market_sort: SortState,
}
