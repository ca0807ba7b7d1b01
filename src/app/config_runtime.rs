//! Merges CLI flags, the config file and built-in defaults into run settings.
//!
//! Precedence is CLI flag > config file > built-in default.

use std::path::PathBuf;

use tooldex_core::api::{
    DEFAULT_COMPLETION_MODEL, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_READ_TIMEOUT_SECS,
};
use tooldex_core::discovery::DEFAULT_LOGO_SERVICE_URL;
use tooldex_core::rate_limiter::{
    DEFAULT_COMPLETION_DELAY_MS, DEFAULT_LOGO_DELAY_MS, DEFAULT_SEARCH_DELAY_MS,
};
use tooldex_core::{FileConfig, RateLimiter, VerbositySetting};

use crate::cli::GlobalArgs;

pub(crate) const DEFAULT_TOOLS_FILE: &str = "ai-tools.json";

/// Effective settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RunSettings {
    pub(crate) tools_file: PathBuf,
    /// `None` means the public endpoint.
    pub(crate) search_base_url: Option<String>,
    /// `None` means the public endpoint.
    pub(crate) completion_base_url: Option<String>,
    pub(crate) completion_model: String,
    pub(crate) logo_service_url: String,
    pub(crate) search_delay_ms: u64,
    pub(crate) completion_delay_ms: u64,
    pub(crate) logo_delay_ms: u64,
    pub(crate) connect_timeout_secs: u64,
    pub(crate) read_timeout_secs: u64,
    pub(crate) log_level: &'static str,
    pub(crate) show_progress: bool,
}

impl RunSettings {
    pub(crate) fn rate_limiter(&self) -> RateLimiter {
        RateLimiter::for_services(
            self.search_delay_ms,
            self.completion_delay_ms,
            self.logo_delay_ms,
        )
    }
}

pub(crate) fn resolve_settings(global: &GlobalArgs, file: &FileConfig) -> RunSettings {
    RunSettings {
        tools_file: global
            .tools_file
            .clone()
            .or_else(|| file.tools_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TOOLS_FILE)),
        search_base_url: file.search_base_url.clone(),
        completion_base_url: file.completion_base_url.clone(),
        completion_model: file
            .completion_model
            .clone()
            .unwrap_or_else(|| DEFAULT_COMPLETION_MODEL.to_string()),
        logo_service_url: file
            .logo_service_url
            .clone()
            .unwrap_or_else(|| DEFAULT_LOGO_SERVICE_URL.to_string()),
        search_delay_ms: file.search_delay_ms.unwrap_or(DEFAULT_SEARCH_DELAY_MS),
        completion_delay_ms: file
            .completion_delay_ms
            .unwrap_or(DEFAULT_COMPLETION_DELAY_MS),
        logo_delay_ms: file.logo_delay_ms.unwrap_or(DEFAULT_LOGO_DELAY_MS),
        connect_timeout_secs: file
            .connect_timeout_secs
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
        read_timeout_secs: file.read_timeout_secs.unwrap_or(DEFAULT_READ_TIMEOUT_SECS),
        log_level: resolve_default_log_level(global, file.verbosity),
        show_progress: !is_quiet(global, file.verbosity),
    }
}

/// Log level used when `RUST_LOG` is unset.
///
/// Priority: `-q` > `-v`/`-vv` > config `verbosity` > info.
pub(crate) fn resolve_default_log_level(
    global: &GlobalArgs,
    configured: Option<VerbositySetting>,
) -> &'static str {
    if global.quiet {
        return "error";
    }
    match global.verbose {
        0 => {}
        1 => return "debug",
        _ => return "trace",
    }
    match configured {
        Some(VerbositySetting::Quiet) => "error",
        Some(VerbositySetting::Verbose) => "debug",
        Some(VerbositySetting::Debug) => "trace",
        Some(VerbositySetting::Default) | None => "info",
    }
}

fn is_quiet(global: &GlobalArgs, configured: Option<VerbositySetting>) -> bool {
    global.quiet || (global.verbose == 0 && configured == Some(VerbositySetting::Quiet))
}
