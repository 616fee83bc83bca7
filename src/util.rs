use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Canonical web origin used for absolutizing permalinks and building
/// request URLs.
pub const WWW_BASE: &str = "https://www.reddit.com";

static INIT_ONCE: std::sync::Once = std::sync::Once::new();
pub fn init_tracing_once() {
    INIT_ONCE.call_once(|| {
        let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let _ = tracing_subscriber::fmt().with_env_filter(env_filter).try_init();
    });
}

/// Convert a raw `created_utc` value (integer or fractional epoch seconds)
/// into an RFC3339 UTC string. Returns `None` for anything unparsable.
pub fn iso_utc_from_epoch(raw: Option<&Value>) -> Option<String> {
    let secs = raw?.as_f64()?;
    let dt = OffsetDateTime::from_unix_timestamp(secs as i64).ok()?;
    dt.format(&Rfc3339).ok()
}

/// The API returns site-relative permalinks ("/r/..."). Rebase them onto the
/// canonical origin; already-absolute values pass through unchanged.
pub fn absolutize_permalink(permalink: &str) -> String {
    if permalink.starts_with('/') {
        format!("{WWW_BASE}{permalink}")
    } else {
        permalink.to_string()
    }
}
