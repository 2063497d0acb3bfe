use serde::{Deserialize, Serialize};

/// Identifier for commodities returned by the price API.
pub type CommodityId = i64;

/// Reporting channel for a price observation.
///
/// Only `eNAM` is recognised by name; every other label (including a missing
/// one) is treated as AGMARK.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceSource {
    Enam,
    #[default]
    Agmark,
}

impl PriceSource {
    pub fn from_label(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("eNAM") => PriceSource::Enam,
            _ => PriceSource::Agmark,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PriceSource::Enam => "eNAM",
            PriceSource::Agmark => "AGMARK",
        }
    }
}

/// One reported price observation for a market.
///
/// Numeric fields are already parsed defensively (see [`super::numeric`]);
/// `model_price_label` keeps the text exactly as reported for display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub market_name: String,
    pub district_name: String,
    pub state_name: String,
    pub variety_name: Option<String>,
    pub model_price_label: String,
    pub model_price: f64,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub unit_name_price: Option<String>,
    pub source: PriceSource,
    pub arrivals: f64,
    pub traded: f64,
}

impl PriceRecord {
    /// True when the modal price parsed to a usable, positive value.
    pub fn has_valid_price(&self) -> bool {
        self.model_price.is_finite() && self.model_price > 0.0
    }

    pub fn is_enam(&self) -> bool {
        self.source == PriceSource::Enam
    }

    /// Records with neither arrivals nor traded volume carry no liquidity signal.
    pub fn has_volume(&self) -> bool {
        self.arrivals > 0.0 || self.traded > 0.0
    }

    pub fn location_label(&self) -> String {
        match (self.district_name.is_empty(), self.state_name.is_empty()) {
            (false, false) => format!("{}, {}", self.district_name, self.state_name),
            (false, true) => self.district_name.clone(),
            (true, false) => self.state_name.clone(),
            (true, true) => "Unknown location".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Commodity {
    pub id: CommodityId,
    pub name: String,
    pub group_id: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommodityGroup {
    pub id: i64,
    pub name: String,
}

/// Reference data refreshed on every metadata fetch.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub commodities: Vec<Commodity>,
    pub groups: Vec<CommodityGroup>,
}

impl Metadata {
    pub fn group_name(&self, group_id: i64) -> Option<&str> {
        self.groups
            .iter()
            .find(|group| group.id == group_id)
            .map(|group| group.name.as_str())
    }
}

/// All records reported for one commodity on the selected date.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommodityPrices {
    pub commodity_id: CommodityId,
    pub name: String,
    pub group_id: Option<i64>,
    pub records: Vec<PriceRecord>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub has_more: bool,
    pub total: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            has_more: false,
            total: 0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PricePage {
    pub items: Vec<CommodityPrices>,
    pub pagination: Pagination,
}

/// A single point of the price history series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub date: String,
    pub price: f64,
}
