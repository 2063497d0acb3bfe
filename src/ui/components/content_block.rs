use dioxus::prelude::*;

use crate::domain::ContentBlock;

#[component]
pub fn ContentBlockView(block: ContentBlock) -> Element {
    match block {
        ContentBlock::Paragraph(text) => rsx! { p { class: "article-paragraph", "{text}" } },
        ContentBlock::Bullet(text) => rsx! {
            div { class: "article-bullet",
                span { class: "article-bullet-dot", "•" }
                span { "{text}" }
            }
        },
        ContentBlock::Callout { icon, text } => rsx! {
            div { class: "article-callout",
                span { class: "article-callout-icon", "{icon}" }
                span { "{text}" }
            }
        },
        ContentBlock::Numbered { index, text } => rsx! {
            div { class: "article-numbered",
                span { class: "article-number", "{index}" }
                span { "{text}" }
            }
        },
    }
}
