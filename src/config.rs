//! Configuration file loading and API credentials.
//!
//! Settings come from an optional line-oriented `key = value` file at
//! `$XDG_CONFIG_HOME/tooldex/config.toml` (or `$HOME/.config/tooldex/config.toml`).
//! API keys are read from the environment only and never from the file.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use url::Url;

/// Environment variable holding the search API key.
pub const SEARCH_KEY_VAR: &str = "BRAVE_API_KEY";
/// Environment variable holding the completion API key.
pub const COMPLETION_KEY_VAR: &str = "GROQ_API_KEY";

const MAX_DELAY_MS: u64 = 60_000;

/// Errors produced while loading configuration or credentials.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line is not of the form `key = value`.
    #[error("invalid config syntax on line {line}: expected key = value")]
    Syntax { line: usize },

    #[error("unknown configuration key: '{key}' on line {line}")]
    UnknownKey { key: String, line: usize },

    /// A value could not be parsed for its key.
    #[error("invalid `{key}` value on line {line}: {reason}")]
    InvalidValue {
        key: String,
        line: usize,
        reason: String,
    },

    /// A parsed value is outside the accepted range.
    #[error("invalid config value for `{key}`: {value}. Expected {expected}")]
    OutOfRange {
        key: &'static str,
        value: String,
        expected: &'static str,
    },

    /// A required API key is missing or blank.
    #[error(
        "missing API key: {var} is not set\n  Suggestion: export {var}=<your key> before running this command"
    )]
    MissingCredential { var: &'static str },
}

/// File-backed defaults. Every field is optional; CLI flags override them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileConfig {
    /// Path of the tools JSON file.
    pub tools_file: Option<PathBuf>,
    /// Search API base URL override.
    pub search_base_url: Option<String>,
    /// Completion API base URL override.
    pub completion_base_url: Option<String>,
    /// Completion model name.
    pub completion_model: Option<String>,
    /// Logo service URL template containing `{domain}`.
    pub logo_service_url: Option<String>,
    /// Minimum interval between search calls.
    pub search_delay_ms: Option<u64>,
    /// Minimum interval between completion calls.
    pub completion_delay_ms: Option<u64>,
    /// Minimum interval between logo probes.
    pub logo_delay_ms: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
    pub read_timeout_secs: Option<u64>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
}

impl FileConfig {
    /// Validates values against runtime constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_delay_ms("search_delay_ms", self.search_delay_ms)?;
        validate_delay_ms("completion_delay_ms", self.completion_delay_ms)?;
        validate_delay_ms("logo_delay_ms", self.logo_delay_ms)?;
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;
        validate_base_url("search_base_url", self.search_base_url.as_deref())?;
        validate_base_url("completion_base_url", self.completion_base_url.as_deref())?;

        if let Some(template) = self.logo_service_url.as_deref() {
            if !template.contains("{domain}") {
                return Err(ConfigError::OutOfRange {
                    key: "logo_service_url",
                    value: template.to_string(),
                    expected: "a URL template containing {domain}",
                });
            }
            let sample = template.replace("{domain}", "example.com");
            validate_base_url("logo_service_url", Some(sample.as_str()))?;
        }

        if let Some(model) = self.completion_model.as_deref()
            && model.trim().is_empty()
        {
            return Err(ConfigError::OutOfRange {
                key: "completion_model",
                value: String::new(),
                expected: "a non-empty model name",
            });
        }

        Ok(())
    }
}

fn validate_delay_ms(key: &'static str, value: Option<u64>) -> Result<(), ConfigError> {
    match value {
        Some(value) if value > MAX_DELAY_MS => Err(ConfigError::OutOfRange {
            key,
            value: value.to_string(),
            expected: "range 0..=60000",
        }),
        _ => Ok(()),
    }
}

fn validate_timeout_secs(key: &'static str, value: Option<u64>) -> Result<(), ConfigError> {
    match value {
        Some(value) if !(1..=3600).contains(&value) => Err(ConfigError::OutOfRange {
            key,
            value: value.to_string(),
            expected: "range 1..=3600",
        }),
        _ => Ok(()),
    }
}

fn validate_base_url(key: &'static str, value: Option<&str>) -> Result<(), ConfigError> {
    let Some(value) = value else {
        return Ok(());
    };
    let valid = Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
        .unwrap_or(false);
    if valid {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            key,
            value: value.to_string(),
            expected: "an absolute http(s) URL",
        })
    }
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Verbose => "verbose",
            Self::Quiet => "quiet",
            Self::Debug => "debug",
        }
    }
}

/// Loaded config metadata.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
}

impl LoadedConfig {
    #[must_use]
    pub fn loaded_from_file(&self) -> bool {
        self.config.is_some()
    }

    /// File config, or all-defaults when no file was loaded.
    #[must_use]
    pub fn file_config(&self) -> FileConfig {
        self.config.clone().unwrap_or_default()
    }
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/tooldex/config.toml`
/// 2. `$HOME/.config/tooldex/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("tooldex")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("tooldex")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from the default path if present.
///
/// # Errors
///
/// Returns [`ConfigError`] when the file exists but cannot be read, parsed or
/// validated.
pub fn load_default_file_config() -> Result<LoadedConfig, ConfigError> {
    let path = resolve_default_config_path();
    let Some(path_ref) = path.as_deref() else {
        return Ok(LoadedConfig { path, config: None });
    };

    if !path_ref.exists() {
        debug!(path = %path_ref.display(), "No config file");
        return Ok(LoadedConfig { path, config: None });
    }

    let config = load_file_config(path_ref)?;
    Ok(LoadedConfig {
        path,
        config: Some(config),
    })
}

/// Reads and parses the config file at `path`.
///
/// # Errors
///
/// Returns [`ConfigError`] on read, parse or validation failure.
pub fn load_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config_str(&raw)?;
    debug!(path = %path.display(), "Loaded config file");
    Ok(config)
}

/// Parses the `key = value` config subset.
///
/// # Errors
///
/// Returns [`ConfigError`] for syntax errors, unknown keys, unparseable or
/// out-of-range values.
pub fn parse_config_str(raw: &str) -> Result<FileConfig, ConfigError> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_no = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            return Err(ConfigError::Syntax { line: line_no });
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let invalid = |reason: String| ConfigError::InvalidValue {
            key: key.to_string(),
            line: line_no,
            reason,
        };

        match key {
            "tools_file" => {
                cfg.tools_file = Some(PathBuf::from(parse_string_literal(value).map_err(invalid)?));
            }
            "search_base_url" => {
                cfg.search_base_url = Some(parse_string_literal(value).map_err(invalid)?);
            }
            "completion_base_url" => {
                cfg.completion_base_url = Some(parse_string_literal(value).map_err(invalid)?);
            }
            "completion_model" => {
                cfg.completion_model = Some(parse_string_literal(value).map_err(invalid)?);
            }
            "logo_service_url" => {
                cfg.logo_service_url = Some(parse_string_literal(value).map_err(invalid)?);
            }
            "search_delay_ms" => {
                cfg.search_delay_ms = Some(parse_integer_u64(value).map_err(invalid)?);
            }
            "completion_delay_ms" => {
                cfg.completion_delay_ms = Some(parse_integer_u64(value).map_err(invalid)?);
            }
            "logo_delay_ms" => {
                cfg.logo_delay_ms = Some(parse_integer_u64(value).map_err(invalid)?);
            }
            "connect_timeout_secs" => {
                cfg.connect_timeout_secs = Some(parse_integer_u64(value).map_err(invalid)?);
            }
            "read_timeout_secs" => {
                cfg.read_timeout_secs = Some(parse_integer_u64(value).map_err(invalid)?);
            }
            "verbosity" => {
                let parsed = parse_string_literal(value).map_err(invalid)?;
                cfg.verbosity = Some(parse_verbosity(&parsed).map_err(invalid)?);
            }
            unknown => {
                return Err(ConfigError::UnknownKey {
                    key: unknown.to_string(),
                    line: line_no,
                });
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String, String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        return Err("expected double-quoted string".to_string());
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer_u64(raw_value: &str) -> Result<u64, String> {
    let token = raw_value.trim();
    if token.is_empty() {
        return Err("expected integer value".to_string());
    }
    let value = token.parse::<i128>().map_err(|e| e.to_string())?;
    if value < 0 {
        return Err("expected non-negative integer".to_string());
    }
    u64::try_from(value).map_err(|_| "integer value out of range for u64".to_string())
}

fn parse_verbosity(value: &str) -> Result<VerbositySetting, String> {
    match value {
        "default" => Ok(VerbositySetting::Default),
        "verbose" => Ok(VerbositySetting::Verbose),
        "quiet" => Ok(VerbositySetting::Quiet),
        "debug" => Ok(VerbositySetting::Debug),
        other => Err(format!(
            "'{other}' is not one of: default, verbose, quiet, debug"
        )),
    }
}

// ==================== Credentials ====================

/// API keys read from the environment. Blank values count as missing.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    search_api_key: Option<String>,
    completion_api_key: Option<String>,
}

impl Credentials {
    /// Reads `BRAVE_API_KEY` and `GROQ_API_KEY`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds credentials from an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        Self {
            search_api_key: read(SEARCH_KEY_VAR),
            completion_api_key: read(COMPLETION_KEY_VAR),
        }
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredential`] when `BRAVE_API_KEY` is unset.
    pub fn require_search(&self) -> Result<&str, ConfigError> {
        self.search_api_key
            .as_deref()
            .ok_or(ConfigError::MissingCredential {
                var: SEARCH_KEY_VAR,
            })
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredential`] when `GROQ_API_KEY` is unset.
    pub fn require_completion(&self) -> Result<&str, ConfigError> {
        self.completion_api_key
            .as_deref()
            .ok_or(ConfigError::MissingCredential {
                var: COMPLETION_KEY_VAR,
            })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("search_api_key", &self.search_api_key.as_ref().map(|_| "<redacted>"))
            .field(
                "completion_api_key",
                &self.completion_api_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
