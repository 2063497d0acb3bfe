//! Class helpers shared by pages so variants stay consistent.

use crate::domain::{PriceSource, ScoreBand};

// ============================================
// BUTTON STYLES
// ============================================

pub fn btn_primary() -> &'static str {
    "btn btn-primary"
}

pub fn btn_ghost() -> &'static str {
    "btn btn-ghost"
}

pub fn pill(active: bool) -> &'static str {
    if active {
        "pill pill-active"
    } else {
        "pill"
    }
}

pub fn nav_button(active: bool) -> &'static str {
    if active {
        "nav-btn nav-btn-active"
    } else {
        "nav-btn"
    }
}

// ============================================
// INPUT / PANEL STYLES
// ============================================

pub fn input_class() -> &'static str {
    "input"
}

pub fn panel() -> &'static str {
    "panel"
}

pub fn label_class() -> &'static str {
    "label"
}

// ============================================
// DATA-DEPENDENT ACCENTS
// ============================================

pub fn band_class(band: ScoreBand) -> &'static str {
    match band {
        ScoreBand::Strong => "band-strong",
        ScoreBand::Active => "band-active",
        ScoreBand::Moderate => "band-moderate",
        ScoreBand::Thin => "band-thin",
    }
}

pub fn source_class(source: PriceSource) -> &'static str {
    match source {
        PriceSource::Enam => "badge badge-enam",
        PriceSource::Agmark => "badge badge-agmark",
    }
}

pub fn trend_class(rising: bool) -> &'static str {
    if rising {
        "trend trend-up"
    } else {
        "trend trend-down"
    }
}
