use std::sync::OnceLock;

static DEBUG_ENABLED: OnceLock<bool> = OnceLock::new();

/// True when HAAR_DEBUG is set to anything but "0" or empty.
pub(crate) fn debug_enabled() -> bool {
    *DEBUG_ENABLED.get_or_init(|| {
        matches!(std::env::var("HAAR_DEBUG"), Ok(v) if !v.is_empty() && v != "0")
    })
}
