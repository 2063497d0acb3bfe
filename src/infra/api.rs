//! Asynchronous client for the mandi price API.
//!
//! - Typed accessors for metadata, paginated prices, history and exchange rates.
//! - A 60-minute in-memory cache with stale fallbacks; metadata additionally
//!   falls back to the on-disk copy kept by [`super::cache`].

use std::{
    collections::HashMap,
    path::PathBuf,
    sync::Arc,
    time::{Duration, SystemTime},
};

use reqwest::{Client, Url};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::domain::numeric::{parse_number, parse_optional};
use crate::domain::{
    Commodity, CommodityGroup, CommodityId, CommodityPrices, ExchangeRates, HistoryPoint,
    Metadata, Pagination, PricePage, PriceQuery, PriceRecord, PriceSource, RateQuote,
    HISTORY_DAYS, PAGE_SIZE,
};
use crate::infra::cache::{
    default_cache_dir, load_metadata_cache, save_metadata_cache, MetadataCache,
};

pub const DEFAULT_BASE_URL: &str = "https://vaarunya-mobile-app.vercel.app/api/";
pub const BASE_URL_ENV: &str = "MANDI_API_BASE";
const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);
const USER_AGENT: &str = concat!("mandi-desk/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api error: {0}")]
    Api(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheStatus {
    Fresh,
    Cached,
    Stale,
}

#[derive(Clone, Debug)]
pub struct CachedPayload<T> {
    pub data: T,
    pub fetched_at: SystemTime,
    pub status: CacheStatus,
}

impl<T> CachedPayload<T> {
    fn new(data: T, fetched_at: SystemTime, status: CacheStatus) -> Self {
        Self {
            data,
            fetched_at,
            status,
        }
    }
}

#[derive(Default)]
struct ApiCache {
    metadata: Option<Cached<Metadata>>,
    prices: HashMap<String, Cached<PricePage>>,
    history: HashMap<CommodityId, Cached<Vec<HistoryPoint>>>,
    exchange_rates: Option<Cached<ExchangeRates>>,
}

impl ApiCache {
    fn clear_prices(&mut self) {
        self.prices.clear();
    }

    /// Drops price pages older than `ttl` so per-keystroke queries do not pile up.
    fn evict_expired_prices(&mut self, ttl: Duration) {
        self.prices.retain(|_, entry| entry.is_fresh(ttl));
    }
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    #[serde(default)]
    success: Option<bool>,
    data: Option<T>,
    #[serde(default)]
    pagination: Option<PaginationDto>,
    #[serde(default, alias = "error")]
    message: Option<String>,
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    cache: Arc<Mutex<ApiCache>>,
    ttl: Duration,
    cache_dir: PathBuf,
}

impl ApiClient {
    pub fn new() -> Result<Self, ApiError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Uses `MANDI_API_BASE` when set, the public endpoint otherwise.
    pub fn from_env() -> Result<Self, ApiError> {
        match std::env::var(BASE_URL_ENV) {
            Ok(base) if !base.trim().is_empty() => {
                tracing::info!(base = %base.trim(), "using API base from environment");
                Self::with_base_url(base.trim())
            }
            _ => Self::new(),
        }
    }

    pub fn with_base_url(base: &str) -> Result<Self, ApiError> {
        // `Url::join` drops the last segment unless the base ends with a slash.
        let base_url = if base.ends_with('/') {
            Url::parse(base)?
        } else {
            Url::parse(&format!("{base}/"))?
        };
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            base_url,
            cache: Arc::new(Mutex::new(ApiCache::default())),
            ttl: DEFAULT_TTL,
            cache_dir: default_cache_dir(),
        })
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Directory holding the offline metadata copy.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    pub async fn get_metadata(&self) -> Result<CachedPayload<Metadata>, ApiError> {
        if let Some(payload) = self.cached_metadata().await {
            return Ok(payload);
        }

        let url = self.url("metadata")?;
        match self.fetch_data::<MetadataDto>(self.http.get(url)).await {
            Ok((dto, _)) => {
                let metadata = Metadata::from(dto);
                tracing::info!(
                    commodities = metadata.commodities.len(),
                    groups = metadata.groups.len(),
                    "loaded metadata"
                );
                if let Err(e) = save_metadata_cache(
                    &self.cache_dir,
                    &MetadataCache::new(metadata.clone()),
                ) {
                    tracing::warn!("failed to save metadata cache: {e}");
                }
                Ok(self.store_metadata(metadata, SystemTime::now(), CacheStatus::Fresh).await)
            }
            Err(error) => {
                tracing::warn!("metadata request failed: {error}");
                if let Some(stale) = self.cached_metadata_stale().await {
                    return Ok(stale);
                }
                if let Some(disk) = load_metadata_cache(&self.cache_dir) {
                    tracing::info!(age = %disk.age_string(), "serving metadata from disk cache");
                    let fetched_at = disk.fetched_at();
                    return Ok(self
                        .store_metadata(disk.metadata, fetched_at, CacheStatus::Stale)
                        .await);
                }
                Err(error)
            }
        }
    }

    /// One page of the goods-prices listing for `query`.
    pub async fn get_prices(
        &self,
        query: &PriceQuery,
        page: u32,
    ) -> Result<CachedPayload<PricePage>, ApiError> {
        let key = format!("{}#{page}", query.cache_key());
        if let Some(payload) = self.cached_prices(&key).await {
            tracing::debug!(%key, "serving cached prices");
            return Ok(payload);
        }

        let mut url = self.url("prices")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("date", &query.date_label())
                .append_pair("search", query.search.trim());
            if let Some(group_id) = query.group_id {
                pairs.append_pair("groupId", &group_id.to_string());
            }
            pairs
                .append_pair("onlyWithPrices", &query.only_with_prices.to_string())
                .append_pair("page", &page.to_string())
                .append_pair("limit", &PAGE_SIZE.to_string());
        }

        tracing::debug!(%url, "requesting prices");
        match self
            .fetch_data::<serde_json::Value>(self.http.get(url))
            .await
        {
            Ok((raw, pagination)) => {
                let items = parse_price_entries(raw);
                let pagination = pagination
                    .map(Pagination::from)
                    .unwrap_or(Pagination {
                        page,
                        has_more: false,
                        total: items.len() as u32,
                    });
                tracing::info!(
                    date = %query.date_label(),
                    page,
                    items = items.len(),
                    has_more = pagination.has_more,
                    "loaded prices"
                );
                let data = PricePage { items, pagination };
                Ok(self.store_prices(key, data).await)
            }
            Err(error) => {
                tracing::warn!(%key, "price request failed: {error}");
                if let Some(stale) = self.cached_prices_stale(&key).await {
                    return Ok(stale);
                }
                Err(error)
            }
        }
    }

    pub async fn get_history(
        &self,
        commodity_id: CommodityId,
    ) -> Result<CachedPayload<Vec<HistoryPoint>>, ApiError> {
        {
            let cache = self.cache.lock().await;
            if let Some(payload) = cache
                .history
                .get(&commodity_id)
                .and_then(|entry| entry.if_fresh(self.ttl))
            {
                return Ok(payload);
            }
        }

        let mut url = self.url("prices/history")?;
        url.query_pairs_mut()
            .append_pair("cmdt_id", &commodity_id.to_string())
            .append_pair("days", &HISTORY_DAYS.to_string());

        match self
            .fetch_data::<Vec<HistoryPointDto>>(self.http.get(url))
            .await
        {
            Ok((points, _)) => {
                let data: Vec<HistoryPoint> = points.into_iter().map(HistoryPoint::from).collect();
                tracing::debug!(commodity_id, points = data.len(), "loaded price history");
                let fetched_at = SystemTime::now();
                self.cache
                    .lock()
                    .await
                    .history
                    .insert(commodity_id, Cached::new(data.clone(), fetched_at));
                Ok(CachedPayload::new(data, fetched_at, CacheStatus::Fresh))
            }
            Err(error) => {
                tracing::warn!(commodity_id, "history request failed: {error}");
                let cache = self.cache.lock().await;
                if let Some(stale) = cache.history.get(&commodity_id).map(Cached::stale) {
                    return Ok(stale);
                }
                Err(error)
            }
        }
    }

    pub async fn get_exchange_rates(&self) -> Result<CachedPayload<ExchangeRates>, ApiError> {
        {
            let cache = self.cache.lock().await;
            if let Some(payload) = cache
                .exchange_rates
                .as_ref()
                .and_then(|entry| entry.if_fresh(self.ttl))
            {
                return Ok(payload);
            }
        }

        let url = self.url("exchange-rates")?;
        match self.fetch_data::<ExchangeRatesDto>(self.http.get(url)).await {
            Ok((dto, _)) => {
                let rates = ExchangeRates::from(dto);
                tracing::info!(
                    rbi = rates.rbi.usd_inr,
                    bank = rates.bank.usd_inr,
                    "loaded exchange rates"
                );
                let fetched_at = SystemTime::now();
                self.cache.lock().await.exchange_rates =
                    Some(Cached::new(rates.clone(), fetched_at));
                Ok(CachedPayload::new(rates, fetched_at, CacheStatus::Fresh))
            }
            Err(error) => {
                tracing::warn!("exchange rate request failed: {error}");
                let cache = self.cache.lock().await;
                if let Some(stale) = cache.exchange_rates.as_ref().map(Cached::stale) {
                    return Ok(stale);
                }
                Err(error)
            }
        }
    }

    /// Asks the backend to re-scrape prices for `date` and drops cached pages.
    pub async fn trigger_refresh(&self, date: &str) -> Result<(), ApiError> {
        let url = self.url("fetch/trigger")?;
        tracing::info!(date, "triggering price refresh");
        self.http
            .post(url)
            .json(&serde_json::json!({ "date": date }))
            .send()
            .await?
            .error_for_status()?;
        self.cache.lock().await.clear_prices();
        Ok(())
    }

    async fn cached_metadata(&self) -> Option<CachedPayload<Metadata>> {
        let cache = self.cache.lock().await;
        cache
            .metadata
            .as_ref()
            .and_then(|entry| entry.if_fresh(self.ttl))
    }

    async fn cached_metadata_stale(&self) -> Option<CachedPayload<Metadata>> {
        let cache = self.cache.lock().await;
        cache.metadata.as_ref().map(Cached::stale)
    }

    async fn cached_prices(&self, key: &str) -> Option<CachedPayload<PricePage>> {
        let cache = self.cache.lock().await;
        cache
            .prices
            .get(key)
            .and_then(|entry| entry.if_fresh(self.ttl))
    }

    async fn cached_prices_stale(&self, key: &str) -> Option<CachedPayload<PricePage>> {
        let cache = self.cache.lock().await;
        cache.prices.get(key).map(Cached::stale)
    }

    async fn store_metadata(
        &self,
        data: Metadata,
        fetched_at: SystemTime,
        status: CacheStatus,
    ) -> CachedPayload<Metadata> {
        let payload = CachedPayload::new(data.clone(), fetched_at, status);
        let mut cache = self.cache.lock().await;
        cache.metadata = Some(Cached::new(data, fetched_at));
        payload
    }

    async fn store_prices(&self, key: String, data: PricePage) -> CachedPayload<PricePage> {
        let fetched_at = SystemTime::now();
        let payload = CachedPayload::new(data.clone(), fetched_at, CacheStatus::Fresh);
        let mut cache = self.cache.lock().await;
        cache.evict_expired_prices(self.ttl);
        cache.prices.insert(key, Cached::new(data, fetched_at));
        payload
    }

    async fn fetch_data<T>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<(T, Option<PaginationDto>), ApiError>
    where
        T: DeserializeOwned,
    {
        let response = builder.send().await?.error_for_status()?;
        let envelope: ApiEnvelope<T> = response.json().await?;
        let ApiEnvelope {
            success,
            data,
            pagination,
            message,
        } = envelope;

        if success == Some(false) {
            return Err(ApiError::Api(
                message.unwrap_or_else(|| "request was not successful".into()),
            ));
        }
        data.map(|data| (data, pagination))
            .ok_or_else(|| ApiError::Api(message.unwrap_or_else(|| "response missing data".into())))
    }

    fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }
}

struct Cached<T> {
    value: T,
    fetched_at: SystemTime,
}

impl<T: Clone> Cached<T> {
    fn new(value: T, fetched_at: SystemTime) -> Self {
        Self { value, fetched_at }
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at
            .elapsed()
            .map(|elapsed| elapsed <= ttl)
            .unwrap_or(false)
    }

    fn if_fresh(&self, ttl: Duration) -> Option<CachedPayload<T>> {
        if self.is_fresh(ttl) {
            Some(CachedPayload::new(
                self.value.clone(),
                self.fetched_at,
                CacheStatus::Cached,
            ))
        } else {
            None
        }
    }

    fn stale(&self) -> CachedPayload<T> {
        CachedPayload::new(self.value.clone(), self.fetched_at, CacheStatus::Stale)
    }
}

#[derive(Debug, Deserialize)]
struct MetadataDto {
    #[serde(default)]
    cmdt_data: Vec<CommodityDto>,
    #[serde(default)]
    cmdt_group_data: Vec<GroupDto>,
}

#[derive(Debug, Deserialize)]
struct CommodityDto {
    #[serde(deserialize_with = "id_from_json")]
    cmdt_id: i64,
    #[serde(default)]
    cmdt_name: Option<String>,
    #[serde(default, deserialize_with = "optional_id_from_json")]
    cmdt_group_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct GroupDto {
    #[serde(deserialize_with = "id_from_json")]
    id: i64,
    #[serde(default)]
    cmdt_grp_name: Option<String>,
}

impl From<MetadataDto> for Metadata {
    fn from(dto: MetadataDto) -> Self {
        Self {
            commodities: dto
                .cmdt_data
                .into_iter()
                .map(|c| Commodity {
                    id: c.cmdt_id,
                    name: c.cmdt_name.unwrap_or_else(|| "Unknown".to_string()),
                    group_id: c.cmdt_group_id,
                })
                .collect(),
            groups: dto
                .cmdt_group_data
                .into_iter()
                .map(|g| CommodityGroup {
                    id: g.id,
                    name: g.cmdt_grp_name.unwrap_or_else(|| "Other".to_string()),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PaginationDto {
    #[serde(default)]
    page: Option<u32>,
    #[serde(default, alias = "has_more", rename = "hasMore")]
    has_more: Option<bool>,
    #[serde(default)]
    total: Option<u32>,
}

impl From<PaginationDto> for Pagination {
    fn from(dto: PaginationDto) -> Self {
        Self {
            page: dto.page.unwrap_or(1),
            has_more: dto.has_more.unwrap_or(false),
            total: dto.total.unwrap_or(0),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CommodityPricesDto {
    #[serde(default, deserialize_with = "optional_id_from_json")]
    cmdt_id: Option<i64>,
    #[serde(default)]
    cmdt_name: Option<String>,
    #[serde(default, deserialize_with = "optional_id_from_json")]
    cmdt_group_id: Option<i64>,
    #[serde(default)]
    records: Vec<PriceRecordDto>,
}

#[derive(Debug, Deserialize)]
struct PriceRecordDto {
    #[serde(default)]
    market_name: Option<String>,
    #[serde(default)]
    district_name: Option<String>,
    #[serde(default)]
    state_name: Option<String>,
    #[serde(default)]
    variety_name: Option<String>,
    #[serde(default, deserialize_with = "text_from_json")]
    model_price: Option<String>,
    #[serde(default, deserialize_with = "text_from_json")]
    min_price: Option<String>,
    #[serde(default, deserialize_with = "text_from_json")]
    max_price: Option<String>,
    #[serde(default)]
    unit_name_price: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default, deserialize_with = "text_from_json")]
    commodity_arrivals: Option<String>,
    #[serde(default, deserialize_with = "text_from_json")]
    commodity_traded: Option<String>,
}

impl From<PriceRecordDto> for PriceRecord {
    fn from(dto: PriceRecordDto) -> Self {
        let model_price_label = dto.model_price.unwrap_or_default();
        Self {
            market_name: dto.market_name.unwrap_or_else(|| "Unknown market".to_string()),
            district_name: dto.district_name.unwrap_or_default(),
            state_name: dto.state_name.unwrap_or_default(),
            variety_name: dto.variety_name.filter(|v| !v.trim().is_empty()),
            model_price: parse_number(&model_price_label),
            model_price_label,
            min_price: dto.min_price.as_deref().map(parse_number),
            max_price: dto.max_price.as_deref().map(parse_number),
            unit_name_price: dto.unit_name_price.filter(|u| !u.trim().is_empty()),
            source: PriceSource::from_label(dto.source.as_deref()),
            arrivals: parse_optional(dto.commodity_arrivals.as_deref()),
            traded: parse_optional(dto.commodity_traded.as_deref()),
        }
    }
}

impl CommodityPricesDto {
    fn into_domain(self, fallback_id: Option<i64>) -> Option<CommodityPrices> {
        let commodity_id = self.cmdt_id.or(fallback_id)?;
        Some(CommodityPrices {
            commodity_id,
            name: self
                .cmdt_name
                .unwrap_or_else(|| format!("Commodity {commodity_id}")),
            group_id: self.cmdt_group_id,
            records: self.records.into_iter().map(PriceRecord::from).collect(),
        })
    }
}

/// Accepts either an array of entries or a map keyed by commodity id.
/// Entries that fail to parse are skipped rather than failing the page.
/// Map entries come back in ascending numeric id order; non-numeric keys go last.
fn parse_price_entries(value: serde_json::Value) -> Vec<CommodityPrices> {
    match value {
        serde_json::Value::Array(entries) => entries
            .into_iter()
            .filter_map(|entry| parse_price_entry(entry, None))
            .collect(),
        serde_json::Value::Object(map) => {
            let mut keyed: Vec<(Option<i64>, serde_json::Value)> = map
                .into_iter()
                .map(|(key, entry)| (key.trim().parse().ok(), entry))
                .collect();
            keyed.sort_by_key(|(id, _)| (id.is_none(), *id));
            keyed
                .into_iter()
                .filter_map(|(id, entry)| parse_price_entry(entry, id))
                .collect()
        }
        _ => Vec::new(),
    }
}

fn parse_price_entry(entry: serde_json::Value, fallback_id: Option<i64>) -> Option<CommodityPrices> {
    match serde_json::from_value::<CommodityPricesDto>(entry) {
        Ok(dto) => dto.into_domain(fallback_id),
        Err(e) => {
            tracing::debug!("skipping malformed price entry: {e}");
            None
        }
    }
}

#[derive(Debug, Deserialize)]
struct HistoryPointDto {
    #[serde(default)]
    date: Option<String>,
    #[serde(default, deserialize_with = "text_from_json")]
    price: Option<String>,
}

impl From<HistoryPointDto> for HistoryPoint {
    fn from(dto: HistoryPointDto) -> Self {
        Self {
            date: dto.date.unwrap_or_default(),
            price: parse_optional(dto.price.as_deref()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ExchangeRatesDto {
    #[serde(default)]
    rbi: Option<RateQuoteDto>,
    #[serde(default, alias = "bank")]
    hdfc: Option<RateQuoteDto>,
    #[serde(default, rename = "lastUpdated", alias = "last_updated")]
    last_updated: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RateQuoteDto {
    #[serde(default, rename = "USD", deserialize_with = "text_from_json")]
    usd: Option<String>,
    #[serde(default)]
    date: Option<String>,
}

impl From<RateQuoteDto> for RateQuote {
    fn from(dto: RateQuoteDto) -> Self {
        Self {
            usd_inr: parse_optional(dto.usd.as_deref()),
            date: dto.date,
        }
    }
}

impl From<ExchangeRatesDto> for ExchangeRates {
    fn from(dto: ExchangeRatesDto) -> Self {
        Self {
            rbi: dto.rbi.map(RateQuote::from).unwrap_or_default(),
            bank: dto.hdfc.map(RateQuote::from).unwrap_or_default(),
            last_updated: dto.last_updated,
        }
    }
}

/// Text of a string or number field; `null` becomes `None`.
fn text_from_json<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct TextOrNumber;

    impl<'de> serde::de::Visitor<'de> for TextOrNumber {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string, number or null")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(value))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_bool<E>(self, _value: bool) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(TextOrNumber)
}

fn optional_id_from_json<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(text_from_json(deserializer)?.and_then(|text| text.trim().parse::<i64>().ok()))
}

fn id_from_json<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    optional_id_from_json(deserializer)?
        .ok_or_else(|| serde::de::Error::custom("expected an integer id"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use time::macros::date;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("mandi-desk-test-{}", uuid::Uuid::new_v4()))
    }

    fn client(server: &MockServer) -> ApiClient {
        ApiClient::with_base_url(&server.url("/api"))
            .unwrap()
            .with_cache_dir(scratch_dir())
    }

    #[test]
    fn record_dto_parses_numbers_defensively() {
        let dto: PriceRecordDto = serde_json::from_value(json!({
            "market_name": "Azadpur",
            "district_name": "North Delhi",
            "state_name": "Delhi",
            "model_price": "2,450",
            "min_price": 2100,
            "max_price": null,
            "unit_name_price": "Rs./Quintal",
            "source": "eNAM",
            "commodity_arrivals": "120.5",
            "commodity_traded": "n/a"
        }))
        .unwrap();
        let record = PriceRecord::from(dto);
        assert_eq!(record.model_price, 2450.0);
        assert_eq!(record.model_price_label, "2,450");
        assert_eq!(record.min_price, Some(2100.0));
        assert_eq!(record.max_price, None);
        assert_eq!(record.source, PriceSource::Enam);
        assert_eq!(record.arrivals, 120.5);
        assert_eq!(record.traded, 0.0);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let dto: PriceRecordDto = serde_json::from_value(json!({})).unwrap();
        let record = PriceRecord::from(dto);
        assert_eq!(record.source, PriceSource::Agmark);
        assert!(!record.has_valid_price());
        assert_eq!(record.unit_name_price, None);
    }

    #[test]
    fn price_entries_accept_array_or_map() {
        let array = parse_price_entries(json!([
            { "cmdt_id": 1, "cmdt_name": "Onion", "records": [] },
            { "cmdt_name": "No id" },
            { "cmdt_id": "2", "cmdt_name": "Potato", "records": [{ "model_price": "900" }] }
        ]));
        assert_eq!(array.len(), 2);
        assert_eq!(array[1].commodity_id, 2);
        assert_eq!(array[1].records[0].model_price, 900.0);

        let map = parse_price_entries(json!({
            "17": { "cmdt_name": "Wheat", "records": [] }
        }));
        assert_eq!(map.len(), 1);
        assert_eq!(map[0].commodity_id, 17);

        let ordered = parse_price_entries(json!({
            "10": { "cmdt_name": "Maize", "records": [] },
            "latest": { "cmdt_id": 4, "cmdt_name": "Garlic", "records": [] },
            "9": { "cmdt_name": "Gram", "records": [] }
        }));
        let ids: Vec<CommodityId> = ordered.iter().map(|entry| entry.commodity_id).collect();
        assert_eq!(ids, vec![9, 10, 4]);

        assert!(parse_price_entries(json!("oops")).is_empty());
    }

    #[test]
    fn exchange_rates_map_bank_quote() {
        let dto: ExchangeRatesDto = serde_json::from_value(json!({
            "rbi": { "USD": 83.1, "date": "2024-02-03" },
            "hdfc": { "USD": "84.0" },
            "lastUpdated": "2024-02-03T10:00:00Z"
        }))
        .unwrap();
        let rates = ExchangeRates::from(dto);
        assert_eq!(rates.rbi.usd_inr, 83.1);
        assert_eq!(rates.bank.usd_inr, 84.0);
        assert_eq!(rates.bank.date, None);
        assert_eq!(rates.last_updated.as_deref(), Some("2024-02-03T10:00:00Z"));
    }

    #[tokio::test]
    async fn metadata_is_served_from_cache_within_ttl() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/metadata");
                then.status(200).json_body(json!({
                    "success": true,
                    "data": {
                        "cmdt_data": [{ "cmdt_id": 1, "cmdt_name": "Onion", "cmdt_group_id": 3 }],
                        "cmdt_group_data": [{ "id": 3, "cmdt_grp_name": "Vegetables" }]
                    }
                }));
            })
            .await;

        let client = client(&server);
        let first = client.get_metadata().await.unwrap();
        assert_eq!(first.status, CacheStatus::Fresh);
        assert_eq!(first.data.group_name(3), Some("Vegetables"));

        let second = client.get_metadata().await.unwrap();
        assert_eq!(second.status, CacheStatus::Cached);
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn failed_metadata_falls_back_to_disk_copy() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/metadata");
                then.status(500);
            })
            .await;

        let dir = scratch_dir();
        let saved = Metadata {
            commodities: vec![Commodity {
                id: 7,
                name: "Tomato".to_string(),
                group_id: Some(3),
            }],
            groups: vec![CommodityGroup {
                id: 3,
                name: "Vegetables".to_string(),
            }],
        };
        let disk = MetadataCache::new(saved.clone());
        save_metadata_cache(&dir, &disk).unwrap();

        let client = ApiClient::with_base_url(&server.url("/api"))
            .unwrap()
            .with_cache_dir(&dir);
        let payload = client.get_metadata().await.unwrap();
        mock.assert_hits_async(1).await;
        assert_eq!(payload.status, CacheStatus::Stale);
        assert_eq!(payload.data, saved);
        assert_eq!(payload.fetched_at, disk.fetched_at());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn failed_metadata_without_any_copy_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/metadata");
                then.status(503);
            })
            .await;

        assert!(client(&server).get_metadata().await.is_err());
    }

    #[tokio::test]
    async fn storing_prices_evicts_expired_pages() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/prices");
                then.status(200).json_body(json!({
                    "data": [{ "cmdt_id": 5, "cmdt_name": "Maize", "records": [] }]
                }));
            })
            .await;

        let client = client(&server).with_ttl(Duration::from_millis(20));
        let day = PriceQuery::for_date(date!(2024 - 02 - 03));
        for search in ["o", "on", "oni"] {
            client.get_prices(&day.with_search(search), 1).await.unwrap();
        }
        assert_eq!(client.cache.lock().await.prices.len(), 3);

        tokio::time::sleep(Duration::from_millis(40)).await;
        let latest = day.with_search("onion");
        client.get_prices(&latest, 1).await.unwrap();

        let cache = client.cache.lock().await;
        assert_eq!(cache.prices.len(), 1);
        assert!(cache.prices.contains_key(&format!("{}#1", latest.cache_key())));
    }

    #[tokio::test]
    async fn prices_send_query_and_read_pagination() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/prices")
                    .query_param("date", "2024-02-03")
                    .query_param("search", "onion")
                    .query_param("groupId", "3")
                    .query_param("onlyWithPrices", "true")
                    .query_param("page", "2")
                    .query_param("limit", "20");
                then.status(200).json_body(json!({
                    "data": [{ "cmdt_id": 1, "cmdt_name": "Onion", "records": [] }],
                    "pagination": { "page": 2, "hasMore": true, "total": 45 }
                }));
            })
            .await;

        let query = PriceQuery::for_date(date!(2024 - 02 - 03))
            .with_search("onion")
            .with_group(Some(3))
            .toggled_only_with_prices();
        let payload = client(&server).get_prices(&query, 2).await.unwrap();
        mock.assert_async().await;
        assert_eq!(payload.data.items.len(), 1);
        assert_eq!(
            payload.data.pagination,
            Pagination {
                page: 2,
                has_more: true,
                total: 45
            }
        );
    }

    #[tokio::test]
    async fn failed_refetch_serves_stale_prices() {
        let server = MockServer::start_async().await;
        let ok = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/prices");
                then.status(200).json_body(json!({
                    "data": [{ "cmdt_id": 5, "cmdt_name": "Maize", "records": [] }]
                }));
            })
            .await;

        let client = client(&server).with_ttl(Duration::ZERO);
        let query = PriceQuery::for_date(date!(2024 - 02 - 03));
        let first = client.get_prices(&query, 1).await.unwrap();
        assert_eq!(first.status, CacheStatus::Fresh);

        ok.delete_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/prices");
                then.status(500);
            })
            .await;

        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = client.get_prices(&query, 1).await.unwrap();
        assert_eq!(second.status, CacheStatus::Stale);
        assert_eq!(second.data.items[0].commodity_id, 5);
    }

    #[tokio::test]
    async fn unsuccessful_envelope_is_an_api_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/exchange-rates");
                then.status(200)
                    .json_body(json!({ "success": false, "message": "rates unavailable" }));
            })
            .await;

        let error = client(&server).get_exchange_rates().await.unwrap_err();
        assert!(matches!(error, ApiError::Api(ref msg) if msg == "rates unavailable"));
    }

    #[tokio::test]
    async fn history_requests_thirty_days() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/prices/history")
                    .query_param("cmdt_id", "9")
                    .query_param("days", "30");
                then.status(200).json_body(json!({
                    "data": [{ "date": "2024-02-01", "price": "1,000" }, { "date": "2024-02-02", "price": 1100 }]
                }));
            })
            .await;

        let payload = client(&server).get_history(9).await.unwrap();
        mock.assert_async().await;
        let prices: Vec<f64> = payload.data.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![1000.0, 1100.0]);
    }

    #[tokio::test]
    async fn trigger_refresh_posts_date() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/fetch/trigger")
                    .json_body(json!({ "date": "2024-02-03" }));
                then.status(200).json_body(json!({ "success": true }));
            })
            .await;

        client(&server).trigger_refresh("2024-02-03").await.unwrap();
        mock.assert_async().await;
    }
}
