use dioxus::prelude::*;

use crate::domain::{
    format_price, record_trade_score, PriceRecord, ScoreContext, ScoreWeights, SortField,
    SortState,
};
use crate::ui::components::{score_meter::ScoreMeter, source_badge::SourceBadge};

/// Market rows of one unit group, already filtered and sorted by the caller.
#[component]
pub fn MarketTable(
    records: Vec<PriceRecord>,
    score_context: ScoreContext,
    sort: SortState,
    on_sort: EventHandler<SortField>,
) -> Element {
    if records.is_empty() {
        return rsx! {
            p { class: "muted small", "No markets match the current filters." }
        };
    }

    let header = |field: SortField| {
        let arrow = if sort.field == field {
            sort.direction.arrow()
        } else {
            ""
        };
        format!("{} {arrow}", field.label())
    };

    rsx! {
        table { class: "market-table",
            thead {
                tr {
                    th {
                        button { class: "th-sort", onclick: move |_| on_sort.call(SortField::Market), "{header(SortField::Market)}" }
                    }
                    th { "Location" }
                    th { class: "num",
                        button { class: "th-sort", onclick: move |_| on_sort.call(SortField::Price), "{header(SortField::Price)}" }
                    }
                    th { class: "num", "Min / Max" }
                    th { "Source" }
                }
            }
            tbody {
                for (idx, record) in records.into_iter().enumerate() {
                    MarketRow { key: "{idx}-{record.market_name}", record, score_context }
                }
            }
        }
    }
}

#[component]
fn MarketRow(record: PriceRecord, score_context: ScoreContext) -> Element {
    let price = if record.has_valid_price() {
        format_price(Some(record.model_price))
    } else if record.model_price_label.trim().is_empty() {
        format_price(None)
    } else {
        record.model_price_label.clone()
    };
    let range = match (record.min_price, record.max_price) {
        (Some(min), Some(max)) => format!("{} – {}", format_price(Some(min)), format_price(Some(max))),
        (Some(min), None) => format_price(Some(min)),
        (None, Some(max)) => format_price(Some(max)),
        (None, None) => "—".to_string(),
    };
    let score = record
        .is_enam()
        .then(|| record_trade_score(&record, &score_context, &ScoreWeights::DEFAULT));

    rsx! {
        tr {
            td {
                p { class: "strong", "{record.market_name}" }
                if let Some(variety) = record.variety_name.as_ref() {
                    p { class: "muted small", "{variety}" }
                }
            }
            td { class: "muted", "{record.location_label()}" }
            td { class: "num strong", "{price}" }
            td { class: "num muted small", "{range}" }
            td {
                SourceBadge { source: record.source }
                if let Some(score) = score {
                    ScoreMeter { score, compact: true }
                }
            }
        }
    }
}
