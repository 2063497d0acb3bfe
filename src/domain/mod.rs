//! Pure price, freight and article logic. Nothing in here performs I/O.

pub mod aggregation;
pub mod app_state;
pub mod article;
pub mod currency;
pub mod entities;
pub mod freight;
pub mod history;
pub mod numeric;

pub use aggregation::{
    distinct_states, districts_in_state, format_price, group_by_unit,
    price_summary, record_trade_score, sort_records, summarize_commodity, CommoditySummary,
    RecordFilter, ScoreBand, ScoreContext, ScoreWeights, Selection, SortField, SortState,
};
pub use app_state::{AppState, CacheResource, PersistedState, PriceQuery, PAGE_SIZE};
pub use article::{find_article, section_label, Article, ContentBlock};
pub use currency::{convert, ExchangeRates, RateQuote};
pub use entities::{
    Commodity, CommodityGroup, CommodityId, CommodityPrices, HistoryPoint, Metadata, Pagination,
    PricePage, PriceRecord, PriceSource,
};
pub use freight::{DimensionUnit, FreightSheet, PackageField};
pub use history::{apply_markup, chart_geometry, trend, ChartLayout, HISTORY_DAYS, HISTORY_PRICE_MARKUP};
