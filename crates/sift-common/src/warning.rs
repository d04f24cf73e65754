//! Deduplicated warnings routed through `tracing`.
//!
//! The parser, the noise table and the selector compiler never fail on bad
//! input; they degrade and keep going. Each distinct degradation is reported
//! once per process so a large, consistently broken page does not flood the
//! log.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Report a recoverable problem (emitted once per unique message).
///
/// The event is logged at `WARN` level with the component as a field.
///
/// # Example
/// ```ignore
/// warn_once("Selector", "ignored unrecognized fragment '>'");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_emit = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_emit {
        tracing::warn!(component, "{message}");
    }
}

/// Forget all recorded warnings (call before processing an unrelated document).
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

/// Returns true if `message` has already been reported for `component`.
#[must_use]
pub fn was_warned(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|set| set.contains(&key))
}
