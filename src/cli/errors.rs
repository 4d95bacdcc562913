//! CLI error types

use std::io;

use thiserror::Error;

use crate::claim::ClaimError;
use crate::config::ConfigError;
use crate::effect::EffectError;
use crate::lifecycle::LifecycleError;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Claim(#[from] ClaimError),

    #[error("{0}")]
    Lifecycle(#[from] LifecycleError),

    #[error("{0}")]
    Effect(#[from] EffectError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),

    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CliError {
    /// Stable error code for scripting
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(e) => e.code().code(),
            CliError::Claim(e) => e.code().code(),
            CliError::Lifecycle(e) => e.code().code(),
            CliError::Effect(e) => e.code().code(),
            CliError::Io { .. } | CliError::Output(_) => "CTG_CLI_IO",
            CliError::Json { .. } | CliError::Encode(_) => "CTG_CLI_JSON",
        }
    }
}
