use dioxus::prelude::*;

use crate::ui::theme;

#[component]
pub fn KpiCard(title: String, value: String, description: Option<String>) -> Element {
    rsx! {
        div {
            class: "{theme::panel()} kpi",
            h3 { class: "{theme::label_class()}", "{title}" }
            p { class: "kpi-value", "{value}" }
            if let Some(desc) = description {
                p { class: "muted small", "{desc}" }
            }
        }
    }
}
