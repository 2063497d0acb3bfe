use dioxus::prelude::*;

use crate::domain::ScoreBand;
use crate::ui::theme;

/// Horizontal 0-100 bar for a trade score, coloured by band.
#[component]
pub fn ScoreMeter(score: f64, #[props(default)] compact: bool) -> Element {
    let clamped = if score.is_finite() {
        score.clamp(0.0, 100.0)
    } else {
        0.0
    };
    let band = ScoreBand::from_score(clamped);
    let width = format!("{clamped:.0}%");

    rsx! {
        div {
            class: if compact { "meter meter-compact" } else { "meter" },
            div { class: "meter-head",
                span { class: "label", "Trade Score" }
                span { class: "meter-value {theme::band_class(band)}", "{clamped:.0} · {band.label()}" }
            }
            div { class: "meter-track",
                div { class: "meter-fill {theme::band_class(band)}", style: "width: {width}" }
            }
        }
    }
}
