pub mod content_block;
pub mod kpi_card;
pub mod market_table;
pub mod notice;
pub mod price_chart;
pub mod score_meter;
pub mod source_badge;
