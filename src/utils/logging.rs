use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the application.
///
/// `RUST_LOG` wins when set; otherwise `default_level` is used. With `json`
/// enabled each event is emitted as one JSON object per line.
pub fn init(default_level: &str, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(default_level));

    // try_init so tests can call this repeatedly without panicking
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

/// Filter for the configured level. Accepts a bare level name or a full
/// directive list such as `comment_hub=debug,tungstenite=warn`; anything
/// unparseable falls back to `info`.
pub(crate) fn default_filter(level: &str) -> EnvFilter {
    if level.contains(['=', ',']) {
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
    } else {
        EnvFilter::new(normalize_level(level))
    }
}

pub(crate) fn normalize_level(level: &str) -> &'static str {
    match level.to_lowercase().as_str() {
        "error" => "error",
        "warn" | "warning" => "warn",
        "debug" => "debug",
        "trace" => "trace",
        _ => "info",
    }
}

