//! CLI entry point for the tooldex tool.

use std::process::ExitCode;

use tooldex_core::ConfigError;

mod app;
mod cli;
mod commands;

/// Process outcome mapped onto the exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    /// Exit code 0.
    Success,
    /// Runtime failure, exit code 1.
    Failure,
    /// Invalid configuration or missing credential, exit code 2.
    Config,
}

impl From<ProcessExit> for ExitCode {
    fn from(exit: ProcessExit) -> Self {
        match exit {
            ProcessExit::Success => ExitCode::SUCCESS,
            ProcessExit::Failure => ExitCode::from(1),
            ProcessExit::Config => ExitCode::from(2),
        }
    }
}

fn exit_for_error(error: &anyhow::Error) -> ProcessExit {
    if error.downcast_ref::<ConfigError>().is_some() {
        ProcessExit::Config
    } else {
        ProcessExit::Failure
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    match app::runtime::run_tooldex().await {
        Ok(exit) => exit.into(),
        Err(error) => {
            eprintln!("Error: {error:#}");
            exit_for_error(&error).into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_missing_credential_maps_to_config_exit() {
        let error = anyhow::Error::new(ConfigError::MissingCredential {
            var: "BRAVE_API_KEY",
        });
        assert_eq!(exit_for_error(&error), ProcessExit::Config);
    }

    #[test]
    fn test_config_error_with_context_maps_to_config_exit() {
        let result: Result<(), ConfigError> = Err(ConfigError::Syntax { line: 3 });
        let error = result.context("failed to load config file").unwrap_err();
        assert_eq!(exit_for_error(&error), ProcessExit::Config);
    }

    #[test]
    fn test_other_errors_map_to_failure_exit() {
        let error = anyhow::anyhow!("disk full");
        assert_eq!(exit_for_error(&error), ProcessExit::Failure);
    }
}
