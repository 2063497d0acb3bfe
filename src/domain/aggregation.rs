//! Price aggregation and trade scoring over the records of one commodity.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::entities::{CommodityId, CommodityPrices, PriceRecord, PriceSource};
use super::numeric::format_grouped;

/// Display text used whenever a commodity has no valid price.
pub const NO_DATA_LABEL: &str = "N/A";

/// Bucket label for records that do not report a price unit.
pub const DEFAULT_UNIT_LABEL: &str = "Unit";

/// Relative weights of the trade score components.
///
/// The 60/20/20 split is a product constant with no documented derivation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreWeights {
    pub liquidity: f64,
    pub volume: f64,
    pub stability: f64,
}

impl ScoreWeights {
    pub const DEFAULT: ScoreWeights = ScoreWeights {
        liquidity: 0.6,
        volume: 0.2,
        stability: 0.2,
    };
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceSummary {
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub valid_count: usize,
}

/// Average/min/max over the records whose modal price parsed to a positive value.
///
/// Returns `None` ("no data") when nothing valid remains.
pub fn price_summary(records: &[PriceRecord]) -> Option<PriceSummary> {
    let prices: Vec<f64> = records
        .iter()
        .filter(|record| record.has_valid_price())
        .map(|record| record.model_price)
        .collect();

    if prices.is_empty() {
        return None;
    }

    let sum: f64 = prices.iter().sum();
    let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(PriceSummary {
        average: sum / prices.len() as f64,
        min,
        max,
        valid_count: prices.len(),
    })
}

pub fn average_price(records: &[PriceRecord]) -> Option<f64> {
    price_summary(records).map(|summary| summary.average)
}

/// `₹1,234` for a real price, [`NO_DATA_LABEL`] otherwise.
pub fn format_price(value: Option<f64>) -> String {
    match value {
        Some(price) if price.is_finite() && price > 0.0 => format!("₹{}", format_grouped(price)),
        _ => NO_DATA_LABEL.to_string(),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnitGroup {
    pub unit: String,
    pub records: Vec<PriceRecord>,
    pub average: Option<f64>,
}

/// Buckets records by their price unit, in order of first appearance.
pub fn group_by_unit(records: &[PriceRecord]) -> Vec<UnitGroup> {
    let mut groups: Vec<UnitGroup> = Vec::new();

    for record in records {
        let unit = record
            .unit_name_price
            .as_deref()
            .map(str::trim)
            .filter(|unit| !unit.is_empty())
            .unwrap_or(DEFAULT_UNIT_LABEL);

        match groups.iter_mut().find(|group| group.unit == unit) {
            Some(group) => group.records.push(record.clone()),
            None => groups.push(UnitGroup {
                unit: unit.to_string(),
                records: vec![record.clone()],
                average: None,
            }),
        }
    }

    for group in &mut groups {
        group.average = average_price(&group.records);
    }

    groups
}

/// Peer statistics every per-record score is measured against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreContext {
    pub max_traded: f64,
    pub average_price: f64,
}

impl ScoreContext {
    pub fn from_records(records: &[PriceRecord]) -> Self {
        let max_traded = records
            .iter()
            .map(|record| record.traded)
            .filter(|traded| traded.is_finite())
            .fold(0.0, f64::max);

        Self {
            max_traded,
            average_price: average_price(records).unwrap_or(0.0),
        }
    }
}

/// 0–100 trade score for a single record. Non-eNAM records always score 0.
pub fn record_trade_score(record: &PriceRecord, ctx: &ScoreContext, weights: &ScoreWeights) -> f64 {
    if !record.is_enam() {
        return 0.0;
    }

    let arrivals = record.arrivals;
    let traded = record.traded;

    let liquidity = if arrivals > 0.0 {
        (traded / arrivals).min(1.0)
    } else if traded > 0.0 {
        1.0
    } else {
        0.0
    };

    let volume = if ctx.max_traded > 0.0 {
        traded / ctx.max_traded
    } else {
        0.0
    };

    let stability = if ctx.average_price > 0.0 {
        1.0 - ((record.model_price - ctx.average_price).abs() / ctx.average_price).min(1.0)
    } else {
        1.0
    };

    let score = (weights.liquidity * liquidity
        + weights.volume * volume
        + weights.stability * stability)
        * 100.0;

    if score.is_finite() {
        score.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Mean score over the eNAM records that report any volume; 0 when there are none.
pub fn commodity_trade_score(records: &[PriceRecord], weights: &ScoreWeights) -> f64 {
    let ctx = ScoreContext::from_records(records);
    let scores: Vec<f64> = records
        .iter()
        .filter(|record| record.is_enam() && record.has_volume())
        .map(|record| record_trade_score(record, &ctx, weights))
        .collect();

    if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

/// Colour band used by the score meter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreBand {
    Strong,
    Active,
    Moderate,
    Thin,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            ScoreBand::Strong
        } else if score >= 40.0 {
            ScoreBand::Active
        } else if score >= 20.0 {
            ScoreBand::Moderate
        } else {
            ScoreBand::Thin
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Strong => "Strong",
            ScoreBand::Active => "Active",
            ScoreBand::Moderate => "Moderate",
            ScoreBand::Thin => "Thin",
        }
    }
}

/// Narrowing applied on the details screen.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordFilter {
    pub source: Option<PriceSource>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub search: String,
}

impl RecordFilter {
    pub fn matches(&self, record: &PriceRecord) -> bool {
        if let Some(source) = self.source {
            if record.source != source {
                return false;
            }
        }
        if let Some(ref state) = self.state {
            if !record.state_name.eq_ignore_ascii_case(state) {
                return false;
            }
        }
        if let Some(ref district) = self.district {
            if !record.district_name.eq_ignore_ascii_case(district) {
                return false;
            }
        }

        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            record.market_name.as_str(),
            record.district_name.as_str(),
            record.state_name.as_str(),
            record.variety_name.as_deref().unwrap_or_default(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn apply(&self, records: &[PriceRecord]) -> Vec<PriceRecord> {
        records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect()
    }

    /// Narrows `records` and scores what is left against its own peers.
    pub fn select(&self, records: &[PriceRecord], weights: &ScoreWeights) -> Selection {
        let records = self.apply(records);
        let context = ScoreContext::from_records(&records);
        let commodity_score = commodity_trade_score(&records, weights);
        Selection {
            records,
            context,
            commodity_score,
        }
    }
}

/// Records that survived a [`RecordFilter`], with scores over that subset only.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    pub records: Vec<PriceRecord>,
    pub context: ScoreContext,
    pub commodity_score: f64,
}

/// Distinct state names, sorted case-insensitively.
pub fn distinct_states(records: &[PriceRecord]) -> Vec<String> {
    distinct(records.iter().map(|record| record.state_name.as_str()))
}

/// Distinct districts within one state.
pub fn districts_in_state(records: &[PriceRecord], state: &str) -> Vec<String> {
    distinct(
        records
            .iter()
            .filter(|record| record.state_name.eq_ignore_ascii_case(state))
            .map(|record| record.district_name.as_str()),
    )
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let set: BTreeSet<(String, String)> = values
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| (value.to_lowercase(), value.to_string()))
        .collect();
    let mut seen = BTreeSet::new();
    set.into_iter()
        .filter(|(key, _)| seen.insert(key.clone()))
        .map(|(_, value)| value)
        .collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortField {
    #[default]
    Price,
    Market,
}

impl SortField {
    pub fn label(&self) -> &'static str {
        match self {
            SortField::Price => "Price",
            SortField::Market => "Market",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortState {
    /// Selecting the active field flips its direction; a new field starts ascending.
    pub fn select(self, field: SortField) -> SortState {
        if self.field == field {
            let direction = match self.direction {
                SortDirection::Ascending => SortDirection::Descending,
                SortDirection::Descending => SortDirection::Ascending,
            };
            SortState { field, direction }
        } else {
            SortState {
                field,
                direction: SortDirection::Ascending,
            }
        }
    }
}

/// Stable sort; records with equal keys keep their relative order in both directions.
///
/// Market names compare by `to_lowercase()`, so "lasalgaon" and "Lasalgaon" tie.
/// There is no locale collation.
pub fn sort_records(records: &mut [PriceRecord], sort: SortState) {
    records.sort_by(|a, b| {
        let ord = match sort.field {
            SortField::Price => a
                .model_price
                .partial_cmp(&b.model_price)
                .unwrap_or(Ordering::Equal),
            SortField::Market => a
                .market_name
                .to_lowercase()
                .cmp(&b.market_name.to_lowercase()),
        };
        match sort.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}

/// Everything the listing card needs for one commodity.
#[derive(Clone, Debug, PartialEq)]
pub struct CommoditySummary {
    pub commodity_id: CommodityId,
    pub name: String,
    pub price: Option<PriceSummary>,
    pub has_enam: bool,
    pub has_agmark: bool,
    pub trade_score: f64,
    pub market_count: usize,
}

impl CommoditySummary {
    pub fn has_data(&self) -> bool {
        self.price.is_some()
    }

    pub fn price_display(&self) -> String {
        format_price(self.price.map(|summary| summary.average))
    }
}

pub fn summarize_commodity(prices: &CommodityPrices, weights: &ScoreWeights) -> CommoditySummary {
    let records = &prices.records;
    CommoditySummary {
        commodity_id: prices.commodity_id,
        name: prices.name.clone(),
        price: price_summary(records),
        has_enam: records.iter().any(|record| record.source == PriceSource::Enam),
        has_agmark: records.iter().any(|record| record.source == PriceSource::Agmark),
        trade_score: commodity_trade_score(records, weights),
        market_count: records.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(market: &str, price: f64, source: PriceSource, arrivals: f64, traded: f64) -> PriceRecord {
        PriceRecord {
            market_name: market.to_string(),
            district_name: "Nashik".to_string(),
            state_name: "Maharashtra".to_string(),
            variety_name: None,
            model_price_label: price.to_string(),
            model_price: price,
            min_price: None,
            max_price: None,
            unit_name_price: Some("Rs./Quintal".to_string()),
            source,
            arrivals,
            traded,
        }
    }

    #[test]
    fn all_invalid_prices_report_no_data() {
        let records = vec![
            record("Lasalgaon", 0.0, PriceSource::Agmark, 0.0, 0.0),
            record("Pimpalgaon", -5.0, PriceSource::Agmark, 0.0, 0.0),
        ];
        assert!(price_summary(&records).is_none());
        assert_eq!(format_price(average_price(&records)), NO_DATA_LABEL);
        assert!(price_summary(&[]).is_none());
    }

    #[test]
    fn summary_ignores_invalid_prices() {
        let records = vec![
            record("A", 1000.0, PriceSource::Agmark, 0.0, 0.0),
            record("B", 0.0, PriceSource::Agmark, 0.0, 0.0),
            record("C", 2000.0, PriceSource::Agmark, 0.0, 0.0),
        ];
        let summary = price_summary(&records).unwrap();
        assert_eq!(summary.average, 1500.0);
        assert_eq!(summary.min, 1000.0);
        assert_eq!(summary.max, 2000.0);
        assert_eq!(summary.valid_count, 2);
        assert_eq!(format_price(Some(summary.average)), "₹1,500");
    }

    #[test]
    fn unit_groups_average_independently() {
        let mut kg = record("A", 40.0, PriceSource::Agmark, 0.0, 0.0);
        kg.unit_name_price = Some("Rs./Kg".to_string());
        let mut missing = record("B", 10.0, PriceSource::Agmark, 0.0, 0.0);
        missing.unit_name_price = None;
        let records = vec![
            record("C", 3000.0, PriceSource::Agmark, 0.0, 0.0),
            kg,
            record("D", 5000.0, PriceSource::Agmark, 0.0, 0.0),
            missing,
        ];

        let groups = group_by_unit(&records);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].unit, "Rs./Quintal");
        assert_eq!(groups[0].average, Some(4000.0));
        assert_eq!(groups[1].unit, "Rs./Kg");
        assert_eq!(groups[1].average, Some(40.0));
        assert_eq!(groups[2].unit, DEFAULT_UNIT_LABEL);
    }

    #[test]
    fn perfect_enam_record_scores_one_hundred() {
        let records = vec![record("Azadpur", 2500.0, PriceSource::Enam, 100.0, 100.0)];
        let ctx = ScoreContext::from_records(&records);
        let score = record_trade_score(&records[0], &ctx, &ScoreWeights::DEFAULT);
        assert!((score - 100.0).abs() < 1e-9, "score was {score}");
        assert!((commodity_trade_score(&records, &ScoreWeights::DEFAULT) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn agmark_records_never_score() {
        let records = vec![record("Azadpur", 2500.0, PriceSource::Agmark, 100.0, 100.0)];
        let ctx = ScoreContext::from_records(&records);
        assert_eq!(record_trade_score(&records[0], &ctx, &ScoreWeights::DEFAULT), 0.0);
        assert_eq!(commodity_trade_score(&records, &ScoreWeights::DEFAULT), 0.0);
    }

    #[test]
    fn records_without_volume_are_excluded_from_average() {
        let records = vec![
            record("Active", 2000.0, PriceSource::Enam, 100.0, 100.0),
            record("Idle", 2000.0, PriceSource::Enam, 0.0, 0.0),
        ];
        let ctx = ScoreContext::from_records(&records);
        let idle = record_trade_score(&records[1], &ctx, &ScoreWeights::DEFAULT);
        // stability alone: 0.2 * 1.0
        assert!((idle - 20.0).abs() < 1e-9);

        let commodity = commodity_trade_score(&records, &ScoreWeights::DEFAULT);
        assert!((commodity - 100.0).abs() < 1e-9, "idle record must not dilute: {commodity}");
    }

    #[test]
    fn score_components_follow_formula() {
        let records = vec![
            record("Big", 100.0, PriceSource::Enam, 200.0, 100.0),
            record("Small", 300.0, PriceSource::Enam, 0.0, 50.0),
        ];
        let ctx = ScoreContext::from_records(&records);
        assert_eq!(ctx.max_traded, 100.0);
        assert_eq!(ctx.average_price, 200.0);

        // L = 0.5, V = 1, C = 1 - 100/200 = 0.5
        let big = record_trade_score(&records[0], &ctx, &ScoreWeights::DEFAULT);
        assert!((big - 60.0).abs() < 1e-9);

        // L = 1 (traded without arrivals), V = 0.5, C = 0.5
        let small = record_trade_score(&records[1], &ctx, &ScoreWeights::DEFAULT);
        assert!((small - 80.0).abs() < 1e-9);
    }

    #[test]
    fn zero_average_price_keeps_stability_full() {
        let records = vec![record("NoPrice", 0.0, PriceSource::Enam, 10.0, 5.0)];
        let ctx = ScoreContext::from_records(&records);
        assert_eq!(ctx.average_price, 0.0);
        let score = record_trade_score(&records[0], &ctx, &ScoreWeights::DEFAULT);
        // L = 0.5, V = 1, C = 1
        assert!((score - 70.0).abs() < 1e-9);
    }

    #[test]
    fn sorting_same_field_twice_reverses_and_stays_stable() {
        let mut records = vec![
            record("bravo", 1.0, PriceSource::Agmark, 0.0, 0.0),
            record("Alpha", 2.0, PriceSource::Agmark, 0.0, 0.0),
            record("alpha", 3.0, PriceSource::Agmark, 0.0, 0.0),
            record("Charlie", 4.0, PriceSource::Agmark, 0.0, 0.0),
        ];

        let sort = SortState::default().select(SortField::Market);
        assert_eq!(sort.direction, SortDirection::Ascending);
        sort_records(&mut records, sort);
        let prices: Vec<f64> = records.iter().map(|r| r.model_price).collect();
        assert_eq!(prices, vec![2.0, 3.0, 1.0, 4.0]);

        let sort = sort.select(SortField::Market);
        assert_eq!(sort.direction, SortDirection::Descending);
        sort_records(&mut records, sort);
        let prices: Vec<f64> = records.iter().map(|r| r.model_price).collect();
        // equal keys "Alpha"/"alpha" keep their previous relative order
        assert_eq!(prices, vec![4.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn switching_field_resets_direction() {
        let sort = SortState {
            field: SortField::Market,
            direction: SortDirection::Descending,
        };
        let next = sort.select(SortField::Price);
        assert_eq!(next.field, SortField::Price);
        assert_eq!(next.direction, SortDirection::Ascending);
    }

    #[test]
    fn filter_combines_source_location_and_search() {
        let mut other_state = record("Indore", 10.0, PriceSource::Enam, 0.0, 0.0);
        other_state.state_name = "Madhya Pradesh".to_string();
        other_state.district_name = "Indore".to_string();
        let records = vec![
            record("Lasalgaon", 10.0, PriceSource::Enam, 0.0, 0.0),
            record("Pimpalgaon", 10.0, PriceSource::Agmark, 0.0, 0.0),
            other_state,
        ];

        let filter = RecordFilter {
            source: Some(PriceSource::Enam),
            state: Some("maharashtra".to_string()),
            ..Default::default()
        };
        let filtered = filter.apply(&records);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].market_name, "Lasalgaon");

        let search = RecordFilter {
            search: "PIMP".to_string(),
            ..Default::default()
        };
        assert_eq!(search.apply(&records).len(), 1);

        assert_eq!(distinct_states(&records), vec!["Madhya Pradesh", "Maharashtra"]);
        assert_eq!(districts_in_state(&records, "Maharashtra"), vec!["Nashik"]);
    }

    #[test]
    fn peer_maxima_follow_the_filtered_markets() {
        let busy = record("Lasalgaon", 1000.0, PriceSource::Enam, 100.0, 100.0);
        let mut quiet = record("Indore", 1000.0, PriceSource::Enam, 10.0, 10.0);
        quiet.state_name = "Madhya Pradesh".to_string();
        quiet.district_name = "Indore".to_string();
        let records = vec![busy, quiet];

        let filter = RecordFilter {
            state: Some("Madhya Pradesh".to_string()),
            ..Default::default()
        };
        let selection = filter.select(&records, &ScoreWeights::DEFAULT);

        assert_eq!(selection.records.len(), 1);
        assert_eq!(selection.context.max_traded, 10.0);
        let score = record_trade_score(&selection.records[0], &selection.context, &ScoreWeights::DEFAULT);
        assert!((score - 100.0).abs() < 1e-9);
        assert!((selection.commodity_score - 100.0).abs() < 1e-9);

        // Against every market the quiet one would lose most of its volume share.
        let unfiltered = ScoreContext::from_records(&records);
        assert!(record_trade_score(&selection.records[0], &unfiltered, &ScoreWeights::DEFAULT) < 100.0);
    }

    #[test]
    fn market_sort_ignores_case() {
        let mut records = vec![
            record("pimpalgaon", 1.0, PriceSource::Agmark, 0.0, 0.0),
            record("Lasalgaon", 2.0, PriceSource::Agmark, 0.0, 0.0),
            record("lasalgaon", 3.0, PriceSource::Agmark, 0.0, 0.0),
        ];
        let sort = SortState {
            field: SortField::Market,
            direction: SortDirection::Ascending,
        };
        sort_records(&mut records, sort);
        let prices: Vec<f64> = records.iter().map(|record| record.model_price).collect();
        assert_eq!(prices, vec![2.0, 3.0, 1.0]);
    }

    #[test]
    fn summary_reports_sources_and_bands() {
        let prices = CommodityPrices {
            commodity_id: 7,
            name: "Onion".to_string(),
            group_id: Some(1),
            records: vec![
                record("A", 1200.0, PriceSource::Enam, 100.0, 100.0),
                record("B", 1200.0, PriceSource::Agmark, 0.0, 0.0),
            ],
        };
        let summary = summarize_commodity(&prices, &ScoreWeights::DEFAULT);
        assert!(summary.has_enam && summary.has_agmark);
        assert_eq!(summary.market_count, 2);
        assert_eq!(summary.price_display(), "₹1,200");
        assert_eq!(ScoreBand::from_score(summary.trade_score), ScoreBand::Strong);
        assert_eq!(ScoreBand::from_score(45.0), ScoreBand::Active);
        assert_eq!(ScoreBand::from_score(19.9), ScoreBand::Thin);
    }
}
