//! Transient status notices shown in the corner of every screen.
//!
//! Repeated notices collapse into one entry with a counter, so a flapping
//! connection does not bury the screen in identical warnings.

use std::time::Duration;

use dioxus::prelude::*;

use crate::infra::api::CacheStatus;
use crate::util::generate_id;

const NOTICE_LIFETIME: Duration = Duration::from_secs(6);
const MAX_NOTICES: usize = 4;

pub type Notices = Signal<Vec<Notice>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeLevel {
    fn class(self) -> &'static str {
        match self {
            NoticeLevel::Info => "notice notice-info",
            NoticeLevel::Success => "notice notice-success",
            NoticeLevel::Warning => "notice notice-warning",
            NoticeLevel::Error => "notice notice-error",
        }
    }

    fn icon(self) -> &'static str {
        match self {
            NoticeLevel::Info => "ℹ️",
            NoticeLevel::Success => "✅",
            NoticeLevel::Warning => "⚠️",
            NoticeLevel::Error => "⛔",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub id: String,
    pub level: NoticeLevel,
    pub text: String,
    /// How many times this exact notice was raised while on screen.
    pub repeats: u32,
}

impl Notice {
    pub fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self {
            id: generate_id("notice"),
            level,
            text: text.into(),
            repeats: 1,
        }
    }

    /// Warning for data that came from a fallback copy; `None` for live or in-TTL data.
    pub fn for_status(status: &CacheStatus, subject: &str) -> Option<Self> {
        match status {
            CacheStatus::Stale => Some(Self::new(
                NoticeLevel::Warning,
                format!("Showing saved {subject}; the latest data could not be loaded."),
            )),
            CacheStatus::Fresh | CacheStatus::Cached => None,
        }
    }
}

/// Adds `notice`, folding it into an identical visible one if present.
/// The oldest entry gives way once the stack is full.
pub fn enqueue(entries: &mut Vec<Notice>, notice: Notice) {
    if let Some(pos) = entries
        .iter()
        .position(|entry| entry.level == notice.level && entry.text == notice.text)
    {
        let mut existing = entries.remove(pos);
        existing.repeats += 1;
        entries.push(existing);
        return;
    }

    if entries.len() >= MAX_NOTICES {
        entries.remove(0);
    }
    entries.push(notice);
}

pub fn notify(mut notices: Notices, level: NoticeLevel, text: impl Into<String>) {
    let notice = Notice::new(level, text);
    notices.with_mut(|entries| enqueue(entries, notice));
}

/// Raises the fallback warning for `status`, if it calls for one.
pub fn notify_status(mut notices: Notices, status: &CacheStatus, subject: &str) {
    if let Some(notice) = Notice::for_status(status, subject) {
        notices.with_mut(|entries| enqueue(entries, notice));
    }
}

fn dismiss(mut notices: Notices, id: &str) {
    notices.with_mut(|entries| entries.retain(|entry| entry.id != id));
}

#[component]
pub fn NoticeStack() -> Element {
    let notices = use_context::<Notices>();
    let entries = notices();
    if entries.is_empty() {
        return rsx! {};
    }

    rsx! {
        div { class: "notice-stack", role: "status",
            ul {
                for notice in entries {
                    NoticeCard { key: "{notice.id}", notice, notices }
                }
            }
        }
    }
}

#[component]
fn NoticeCard(notice: Notice, notices: Notices) -> Element {
    let id = notice.id.clone();
    use_future(move || {
        let id = id.clone();
        async move {
            tokio::time::sleep(NOTICE_LIFETIME).await;
            dismiss(notices, &id);
        }
    });

    rsx! {
        li { class: notice.level.class(),
            span { class: "notice-icon", "{notice.level.icon()}" }
            p { "{notice.text}" }
            if notice.repeats > 1 {
                span { class: "badge notice-count", "×{notice.repeats}" }
            }
            button {
                class: "notice-close",
                aria_label: "Dismiss",
                onclick: move |_| dismiss(notices, &notice.id),
                "✕"
            }
        }
    }
}
