use dioxus::prelude::*;

use crate::domain::{chart_geometry, format_price, trend, ChartLayout, HistoryPoint};
use crate::ui::theme;

/// Line chart of a price series drawn as inline SVG.
#[component]
pub fn PriceChart(points: Vec<HistoryPoint>) -> Element {
    let layout = ChartLayout::default();
    let Some(geometry) = chart_geometry(&points, &layout) else {
        return rsx! {
            div { class: "chart-empty muted", "No price history for this commodity yet." }
        };
    };

    let trend = trend(&points);
    let view_box = format!("0 0 {} {}", layout.width, layout.height);
    let top_guide = layout.padding_top;
    let bottom_guide = layout.height - layout.padding_bottom;
    let max_label = format_price(Some(geometry.max_price));
    let min_label = format_price(Some(geometry.min_price));
    let first_date = geometry.points.first().map(|p| p.date.clone()).unwrap_or_default();
    let last_date = geometry.points.last().map(|p| p.date.clone()).unwrap_or_default();

    rsx! {
        div { class: "chart",
            div { class: "chart-head",
                span { class: "label", "Last {points.len()} days" }
                if let Some(trend) = trend {
                    span { class: "{theme::trend_class(trend.rising)}",
                        "{trend.arrow()} {trend.change_pct:.1}%"
                    }
                }
            }
            svg {
                view_box: "{view_box}",
                width: "100%",
                preserve_aspect_ratio: "none",
                line { class: "chart-guide", x1: "0", x2: "{layout.width}", y1: "{top_guide}", y2: "{top_guide}" }
                line { class: "chart-guide", x1: "0", x2: "{layout.width}", y1: "{bottom_guide}", y2: "{bottom_guide}" }
                path { class: "chart-area", d: "{geometry.area_path}" }
                path { class: "chart-line", d: "{geometry.line_path}" }
                for point in geometry.points.iter() {
                    circle {
                        key: "{point.date}",
                        class: "chart-dot",
                        cx: "{point.x}",
                        cy: "{point.y}",
                        r: "2.5",
                        title { "{point.date}: {format_price(Some(point.price))}" }
                    }
                }
            }
            div { class: "chart-foot muted small",
                span { "{first_date}" }
                span { "High {max_label} · Low {min_label}" }
                span { "{last_date}" }
            }
        }
    }
}
