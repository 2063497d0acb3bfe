use dioxus::prelude::*;

use crate::{app::Route, domain::Article, util::assets};

#[component]
pub fn KnowledgePage() -> Element {
    let articles = assets::articles();

    rsx! {
        div { class: "stack",
            header { class: "page-header",
                div {
                    h2 { "Knowledge Hub" }
                    p { class: "muted small", "Learn the essentials of international trade" }
                }
            }
            if articles.is_empty() {
                div { class: "panel muted", "The article catalogue could not be loaded." }
            }
            for article in articles.iter().cloned() {
                ArticleCard { key: "{article.id}", article }
            }
            div { class: "panel muted center", "📖 More articles coming soon" }
        }
    }
}

#[component]
fn ArticleCard(article: Article) -> Element {
    let nav = use_navigator();
    let id = article.id.clone();

    rsx! {
        div {
            class: "panel article-card clickable",
            style: "border-left-color: {article.accent}",
            onclick: move |_| { nav.push(Route::Reader { id: id.clone() }); },
            span { class: "badge", style: "color: {article.accent}", "{article.category}" }
            h3 { class: "strong", "{article.title}" }
            p { class: "muted small clamp-2", "{article.subtitle}" }
            div { class: "unit-head small",
                span { class: "muted", "🕒 {article.read_time}" }
                span { class: "link", "Read →" }
            }
        }
    }
}
