//! Engine configuration
//!
//! A single JSON object; every field is optional:
//!
//! ```json
//! {
//!     "max_elections_per_call": 1,
//!     "verify_replay": true,
//!     "log_lifecycle": true
//! }
//! ```
//!
//! Configuration is validated on load. Invalid configuration is FATAL.

use std::fmt;
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::observation::Severity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Elections accepted by one lifecycle call (default 1)
    #[serde(default = "default_max_elections_per_call")]
    pub max_elections_per_call: usize,

    /// Replay history from inception and compare version hashes before
    /// applying an election (default true)
    #[serde(default = "default_true")]
    pub verify_replay: bool,

    /// Emit structured workflow logs (default true)
    #[serde(default = "default_true")]
    pub log_lifecycle: bool,
}

fn default_max_elections_per_call() -> usize {
    1
}
fn default_true() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_elections_per_call: default_max_elections_per_call(),
            verify_replay: true,
            log_lifecycle: true,
        }
    }
}

impl EngineConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::invalid(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Parse and validate configuration text
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: EngineConfig = serde_json::from_str(content)
            .map_err(|e| ConfigError::invalid(format!("invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.election_limit().map(|_| ())
    }

    /// `max_elections_per_call`, rejected when zero
    pub fn election_limit(&self) -> ConfigResult<NonZeroUsize> {
        NonZeroUsize::new(self.max_elections_per_call)
            .ok_or_else(|| ConfigError::invalid("max_elections_per_call must be >= 1"))
    }

    /// Configuration with logging switched off
    pub fn quiet() -> Self {
        Self {
            log_lifecycle: false,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorCode {
    CtgConfigInvalid,
}

impl ConfigErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigErrorCode::CtgConfigInvalid => "CTG_CONFIG_INVALID",
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    code: ConfigErrorCode,
    message: String,
}

impl ConfigError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            code: ConfigErrorCode::CtgConfigInvalid,
            message: message.into(),
        }
    }

    pub fn code(&self) -> ConfigErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for ConfigError {}

pub type ConfigResult<T> = Result<T, ConfigError>;
