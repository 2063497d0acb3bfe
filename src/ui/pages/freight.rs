use dioxus::prelude::*;

use crate::{
    app::persist_user_state,
    domain::{
        freight::{LoadMode, PackageItem, TransportMode},
        numeric::format_grouped,
        AppState, DimensionUnit, FreightSheet, PackageField,
    },
    ui::theme,
};

#[component]
pub fn FreightPage() -> Element {
    let state = use_context::<Signal<AppState>>();

    let sheet = state.with(|st| st.freight.clone());
    let totals = sheet.totals();
    let weights = sheet.chargeable_weights();
    let recommendation = sheet.recommendation();
    let display_unit = sheet.display_unit;
    let can_remove = sheet.items().len() > 1;

    let total_cbm = format!("{:.4}", totals.total_cbm);
    let total_cft = format!("{:.2}", totals.total_cft);
    let total_weight = format!("{:.1} Kg", totals.total_weight_kg);
    let input_volume = format!(
        "{} {} (Input Volume)",
        format_grouped(totals.input_volume),
        display_unit.cubic_label()
    );
    let lcl_cost = format!("${:.2}", recommendation.lcl_cost);
    let fcl_cost = format!("${:.2}", recommendation.fcl_cost);
    let mode_class = match recommendation.mode {
        LoadMode::Fcl => "rec-value rec-fcl",
        LoadMode::Lcl => "rec-value rec-lcl",
    };

    rsx! {
        div { class: "stack",
            header { class: "page-header",
                div {
                    h2 { "CBM Calculator" }
                    p { class: "muted small", "Shipment volume, chargeable weight and LCL vs FCL." }
                }
            }

            section { class: "panel stack-tight",
                h3 { class: "{theme::label_class()}", "Global Configuration" }
                div { class: "pill-row",
                    for unit in DimensionUnit::ALL {
                        button {
                            key: "{unit.label()}",
                            class: theme::pill(unit == display_unit),
                            onclick: move |_| edit_sheet(state, |sheet| sheet.set_display_unit(unit)),
                            "{unit.label()}"
                        }
                    }
                }
            }

            section { class: "stack-tight",
                div { class: "unit-head",
                    h3 { class: "{theme::label_class()}", "Packages / Items" }
                    button {
                        class: "{theme::btn_primary()}",
                        onclick: move |_| edit_sheet(state, |sheet| {
                            sheet.add_item();
                        }),
                        "+ Add"
                    }
                }
                for (index, item) in sheet.items().iter().cloned().enumerate() {
                    PackageRow {
                        key: "{item.id}",
                        index: index + 1,
                        item,
                        removable: can_remove,
                    }
                }
            }

            section { class: "panel stack-tight",
                div { class: "grid-2",
                    div { class: "kpi center",
                        p { class: "kpi-value", "{total_cbm}" }
                        p { class: "{theme::label_class()}", "Total CBM" }
                    }
                    div { class: "kpi center",
                        p { class: "kpi-value", "{total_cft}" }
                        p { class: "{theme::label_class()}", "Total CFT" }
                    }
                }
                p { class: "muted small center", "Actual weight: {total_weight}" }
                if display_unit != DimensionUnit::Meter {
                    p { class: "muted small center", "ⓘ {input_volume}" }
                }
            }

            h3 { class: "{theme::label_class()}", "Chargeable Weights" }
            section { class: "grid-3",
                for weight in weights {
                    div {
                        key: "{weight.mode.label()}",
                        class: "panel kpi center {mode_class_for(weight.mode)}",
                        p { class: "strong", "{mode_icon(weight.mode)} {weight.mode.label()}" }
                        p { class: "kpi-value", {format!("{:.1} Kg", weight.chargeable_kg)} }
                        p { class: "muted small", {format!("Vol: {:.1}kg", weight.volumetric_kg)} }
                    }
                }
            }

            section { class: "panel stack-tight",
                h3 { class: "strong", "✓ Logistics Suggestion" }
                div { class: "grid-2",
                    div {
                        p { class: "{theme::label_class()}", "Freight Mode" }
                        p { class: mode_class, "{recommendation.mode.label()}" }
                    }
                    div {
                        p { class: "{theme::label_class()}", "Container Size" }
                        p { class: "rec-value", "{recommendation.container.label()}" }
                    }
                }
                div { class: "grid-2 cost-compare",
                    div {
                        p { class: "{theme::label_class()}", "LCL Est. Cost" }
                        p { class: "strong", "{lcl_cost}" }
                    }
                    div {
                        p { class: "{theme::label_class()}", "FCL 20ft Rate" }
                        p { class: "strong", "{fcl_cost}" }
                    }
                }
                div { class: "grid-2",
                    label { class: "stack-tight",
                        span { class: "{theme::label_class()}", "LCL/CBM ($)" }
                        input {
                            class: "{theme::input_class()}",
                            inputmode: "decimal",
                            value: "{sheet.lcl_rate_per_cbm}",
                            oninput: move |evt: FormEvent| {
                                let value = evt.value();
                                edit_sheet(state, |sheet| sheet.lcl_rate_per_cbm = value);
                            },
                        }
                    }
                    label { class: "stack-tight",
                        span { class: "{theme::label_class()}", "FCL 20ft ($)" }
                        input {
                            class: "{theme::input_class()}",
                            inputmode: "decimal",
                            value: "{sheet.fcl_rate}",
                            oninput: move |evt: FormEvent| {
                                let value = evt.value();
                                edit_sheet(state, |sheet| sheet.fcl_rate = value);
                            },
                        }
                    }
                }
            }
        }
    }
}

/// Applies an edit to the calculator and saves it right away.
fn edit_sheet(mut state: Signal<AppState>, apply: impl FnOnce(&mut FreightSheet)) {
    state.with_mut(|st| apply(&mut st.freight));
    persist_user_state(&state);
}

fn mode_icon(mode: TransportMode) -> &'static str {
    match mode {
        TransportMode::Air => "✈",
        TransportMode::Sea => "⛴",
        TransportMode::Road => "🚚",
    }
}

fn mode_class_for(mode: TransportMode) -> &'static str {
    match mode {
        TransportMode::Air => "mode-air",
        TransportMode::Sea => "mode-sea",
        TransportMode::Road => "mode-road",
    }
}

#[component]
fn PackageRow(index: usize, item: PackageItem, removable: bool) -> Element {
    let state = use_context::<Signal<AppState>>();
    let unit = item.unit.label();

    let remove_id = item.id.clone();
    let on_remove = move |_| {
        edit_sheet(state, |sheet| {
            sheet.remove_item(&remove_id);
        });
    };

    rsx! {
        div { class: "panel package-row",
            div { class: "unit-head",
                span { class: "package-index", "{index}" }
                button {
                    class: "{theme::btn_ghost()}",
                    disabled: !removable,
                    title: "Remove package",
                    onclick: on_remove,
                    "🗑"
                }
            }
            div { class: "grid-3",
                PackageInput { id: item.id.clone(), field: PackageField::Length, label: format!("L ({unit})"), value: item.length.clone(), placeholder: "0".to_string() }
                PackageInput { id: item.id.clone(), field: PackageField::Width, label: format!("B ({unit})"), value: item.width.clone(), placeholder: "0".to_string() }
                PackageInput { id: item.id.clone(), field: PackageField::Height, label: format!("H ({unit})"), value: item.height.clone(), placeholder: "0".to_string() }
            }
            div { class: "grid-2",
                PackageInput { id: item.id.clone(), field: PackageField::Quantity, label: "Quantity".to_string(), value: item.quantity.clone(), placeholder: "1".to_string() }
                PackageInput { id: item.id.clone(), field: PackageField::WeightPerPkg, label: "Wt / Package (Kg)".to_string(), value: item.weight_per_pkg.clone(), placeholder: "0.00".to_string() }
            }
        }
    }
}

#[component]
fn PackageInput(
    id: String,
    field: PackageField,
    label: String,
    value: String,
    placeholder: String,
) -> Element {
    let state = use_context::<Signal<AppState>>();

    rsx! {
        label { class: "stack-tight",
            span { class: "{theme::label_class()}", "{label}" }
            input {
                class: "{theme::input_class()}",
                inputmode: "decimal",
                placeholder: "{placeholder}",
                value: "{value}",
                oninput: move |evt: FormEvent| {
                    let value = evt.value();
                    edit_sheet(state, |sheet| sheet.update_item(&id, field, value));
                },
            }
        }
    }
}
