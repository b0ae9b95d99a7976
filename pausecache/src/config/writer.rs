//! `ConfigFile` → commented INI text.

use super::settings::ConfigFile;

/// Render `config` as the commented INI written to `config.ini`.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[cache]
; Preview tier used when a read does not name one:
;   partial - previews may be truncated (cheaper)
;   full    - previews are guaranteed complete
default_tier = {}
; Log hit/coalescing statistics on shutdown (true/false)
log_stats = {}

[fixture]
; Artificial latency in milliseconds added to every response served from a
; recording. Useful to observe request coalescing. (default: 0)
latency_ms = {}

[logging]
; Log file location (default: ~/.pausecache/pausecache.log)
file = {}
"#,
        config.cache.default_tier,
        config.cache.log_stats,
        config.fixture.latency_ms,
        config.logging.file.to_string_lossy(),
    )
}
