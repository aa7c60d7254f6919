//! Translator options
//!
//! Options are built in code or read from the `[translator]` table of a TOML
//! file:
//!
//! ```toml
//! [translator]
//! runtime_name = "rt"
//! debug = true
//! error_mode = "panic"
//! emit_mode = "run-immediately"
//! runtime_entry = "require('ember-runtime')"
//! diagnostic_format = "terminal"
//! ```

use std::path::Path;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::runtime::Runtime;

/// What the driver does after a statement fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorMode {
    /// Report the failure and go on with the next statement
    #[default]
    Tolerant,
    /// Stop after the first failure
    Panic,
}

/// Shape of the emitted program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmitMode {
    /// Bare statements using the runtime object from the enclosing scope
    #[default]
    Script,
    /// `function (runtime) { ... }`
    Callable,
    /// `(function (runtime) { ... })(<runtime_entry>)`
    RunImmediately,
}

/// How failed statements are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticFormat {
    /// `file:line:col: error: message [code]`
    #[default]
    Simple,
    /// Header, location arrow, notes and help, followed by a summary
    Terminal,
    /// One JSON object per diagnostic and a summary object
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranslatorOptions {
    /// Name of the runtime object in emitted code
    pub runtime_name: String,
    /// Emit `/* line:col */` comments and positions for name resolution
    pub debug: bool,
    /// Arithmetic mode outside any `checked`/`unchecked` block
    pub checked: bool,
    pub error_mode: ErrorMode,
    pub emit_mode: EmitMode,
    /// Expression producing the runtime object in run-immediately mode
    pub runtime_entry: String,
    pub diagnostic_format: DiagnosticFormat,
}

impl Default for TranslatorOptions {
    fn default() -> Self {
        Self {
            runtime_name: Runtime::DEFAULT_NAME.to_string(),
            debug: false,
            checked: true,
            error_mode: ErrorMode::default(),
            emit_mode: EmitMode::default(),
            runtime_entry: Runtime::DEFAULT_NAME.to_string(),
            diagnostic_format: DiagnosticFormat::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid translator configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("runtime name '{0}' is not a valid identifier")]
    InvalidRuntimeName(String),
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    translator: Option<TranslatorOptions>,
}

impl TranslatorOptions {
    /// Options from TOML text. A missing `[translator]` table gives the
    /// defaults; other tables are ignored.
    pub fn from_toml(text: &str) -> std::result::Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text)?;
        let options = file.translator.unwrap_or_default();
        options.validate()?;
        Ok(options)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read {}: {}", path.display(), e))?;
        let options = Self::from_toml(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path.display(), e))?;
        log::debug!("loaded translator options from {}", path.display());
        Ok(options)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if ember_target::printer::is_identifier(&self.runtime_name) {
            Ok(())
        } else {
            Err(ConfigError::InvalidRuntimeName(self.runtime_name.clone()))
        }
    }

    pub fn runtime(&self) -> Runtime {
        Runtime::new(&self.runtime_name)
    }
}
