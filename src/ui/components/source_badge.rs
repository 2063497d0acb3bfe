use dioxus::prelude::*;

use crate::domain::PriceSource;
use crate::ui::theme;

#[component]
pub fn SourceBadge(source: PriceSource) -> Element {
    rsx! {
        span { class: "{theme::source_class(source)}", "{source.label()}" }
    }
}
