use dioxus::prelude::*;

use crate::{
    app::Route,
    domain::{find_article, section_label},
    ui::{components::content_block::ContentBlockView, theme},
    util::assets,
};

#[component]
pub fn ArticlePage(id: String) -> Element {
    let nav = use_navigator();
    let mut toc_expanded = use_signal(|| false);

    let Some(article) = find_article(assets::articles(), &id) else {
        return rsx! {
            div { class: "panel stack-tight center",
                p { "Article not found" }
                button {
                    class: "{theme::btn_primary()}",
                    onclick: move |_| { nav.push(Route::Knowledge {}); },
                    "Go Back"
                }
            }
        };
    };

    let accent = article.accent.clone();
    let hero_style = match &article.cover_image {
        Some(url) => format!(
            "background-color: {accent}; background-image: linear-gradient(rgba(0,0,0,0.35), rgba(0,0,0,0.75)), url('{url}')"
        ),
        None => format!("background-color: {accent}"),
    };
    let section_count = article.sections.len();

    let mut scroll_to = move |index: usize| {
        toc_expanded.set(false);
        document::eval(&format!(
            "document.getElementById('section-{index}')?.scrollIntoView({{ behavior: 'smooth' }});"
        ));
    };

    rsx! {
        article { class: "stack",
            section { class: "article-hero", style: "{hero_style}",
                button {
                    class: "link article-back",
                    onclick: move |_| { nav.push(Route::Knowledge {}); },
                    "← Knowledge Hub"
                }
                span { class: "badge article-category", "{article.category}" }
                h2 { "{article.title}" }
                p { "{article.subtitle}" }
                p { class: "small", "🕒 {article.read_time} · {section_count} sections" }
            }

            nav { class: "panel toc",
                button {
                    class: "toc-head",
                    style: "color: {accent}",
                    onclick: move |_| toc_expanded.toggle(),
                    span { "📖 Table of Contents" }
                    span { if toc_expanded() { "▲" } else { "▼" } }
                }
                if toc_expanded() {
                    ul { class: "toc-list",
                        for (index, section) in article.sections.iter().enumerate() {
                            li {
                                key: "{index}",
                                class: "toc-item clickable",
                                onclick: move |_| scroll_to(index),
                                span { class: "toc-dot", style: "background-color: {accent}" }
                                span { "{section.title}" }
                            }
                        }
                    }
                }
            }

            for (index, chapter) in article.sections.iter().enumerate() {
                section {
                    key: "{index}",
                    id: "section-{index}",
                    class: "panel stack-tight article-section",
                    p { class: "label", style: "color: {accent}", "{section_label(index)}" }
                    h3 { "{chapter.title}" }
                    for (block_index, block) in chapter.blocks().into_iter().enumerate() {
                        ContentBlockView { key: "{block_index}", block }
                    }
                    if let Some(image) = &chapter.image {
                        figure { class: "article-figure",
                            img { src: "{image}", alt: "{chapter.title}", loading: "lazy" }
                            if let Some(caption) = &chapter.image_caption {
                                figcaption { class: "muted small", "{caption}" }
                            }
                        }
                    }
                }
            }
        }
    }
}
