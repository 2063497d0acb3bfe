use dioxus::prelude::*;

use crate::app::Route;
use crate::ui::theme;
use crate::util::{
    assets,
    version::{version_label, APP_NAME},
};

#[component]
pub fn Shell(children: Element) -> Element {
    let current_route = use_route::<Route>();
    let nav = use_navigator();

    rsx! {
        div { class: "app-shell",
            header { class: "app-header",
                div { class: "app-header-inner",
                    div { class: "brand",
                        img { class: "brand-logo", src: assets::logo_data_uri(), alt: "" }
                        div {
                            h1 { class: "brand-title", "{APP_NAME}" }
                            p { class: "muted small", "Mandi prices & export tools · {version_label()}" }
                        }
                    }
                    nav { class: "app-nav",
                        NavButton { active: matches!(current_route, Route::Home {}), onclick: move |_| { nav.push(Route::Home {}); }, label: "🏠 Home" }
                        NavButton { active: matches!(current_route, Route::Prices {} | Route::Details { .. }), onclick: move |_| { nav.push(Route::Prices {}); }, label: "🌾 Prices" }
                        NavButton { active: matches!(current_route, Route::Currency {}), onclick: move |_| { nav.push(Route::Currency {}); }, label: "💱 Currency" }
                        NavButton { active: matches!(current_route, Route::Freight {}), onclick: move |_| { nav.push(Route::Freight {}); }, label: "📦 Freight" }
                        NavButton { active: matches!(current_route, Route::Knowledge {} | Route::Reader { .. }), onclick: move |_| { nav.push(Route::Knowledge {}); }, label: "📚 Knowledge" }
                    }
                }
            }
            main { class: "app-main",
                {children}
            }
        }
    }
}

#[component]
fn NavButton(active: bool, onclick: EventHandler<()>, label: &'static str) -> Element {
    rsx! {
        button {
            class: "{theme::nav_button(active)}",
            onclick: move |_| onclick.call(()),
            "{label}"
        }
    }
}
