use std::sync::atomic::{AtomicUsize, Ordering};

pub mod assets;
pub mod logging;
pub mod persistence;
pub mod version;

static ID_COUNTER: AtomicUsize = AtomicUsize::new(1);

/// Process-unique id for transient UI items such as notices.
pub fn generate_id(prefix: &str) -> String {
    let value = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{value}")
}
