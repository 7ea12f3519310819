//! Pipeline configuration, read from an optional TOML file.
//!
//! ```toml
//! base_url = "https://www.terraform.io"
//! source_languages = ["hcl", "terraform", "tf"]
//! languages = ["typescript", "python", "csharp", "go", "java", "pcl", "yaml"]
//!
//! [converter]
//! program = "hcl2lang"
//! args = ["--language", "{language}"]
//! timeout_secs = 60
//! ```

use crate::error::ConfigError;
use crate::render::snippets::LANGUAGE_PRIORITY;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.terraform.io";
const DEFAULT_SOURCE_LANGUAGES: &[&str] = &["hcl", "terraform", "tf"];
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Prefix for site-relative `/docs/...` links.
    pub base_url: String,
    /// Fence info strings that mark an example in the source language.
    pub source_languages: Vec<String>,
    /// Target languages requested from the converter.
    pub languages: Vec<String>,
    pub converter: Option<ConverterConfig>,
}

/// External program that renders one example in one target language.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConverterConfig {
    pub program: String,
    /// `{language}` and `{example}` are substituted per call.
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            source_languages: DEFAULT_SOURCE_LANGUAGES.iter().map(|s| s.to_string()).collect(),
            languages: LANGUAGE_PRIORITY.iter().map(|s| s.to_string()).collect(),
            converter: None,
        }
    }
}

impl ConverterConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Read and parse a TOML config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(invalid(format!(
                "base_url must start with http:// or https://, got `{}`",
                self.base_url
            )));
        }
        check_identifiers("languages", &self.languages)?;
        check_identifiers("source_languages", &self.source_languages)?;

        if let Some(ref converter) = self.converter {
            if converter.program.trim().is_empty() {
                return Err(invalid("converter.program must not be empty"));
            }
            if converter.timeout_secs == 0 {
                return Err(invalid("converter.timeout_secs must be greater than zero"));
            }
        }
        Ok(())
    }
}

fn check_identifiers(field: &str, values: &[String]) -> Result<(), ConfigError> {
    if values.is_empty() {
        return Err(invalid(format!("{} must not be empty", field)));
    }
    let mut seen = HashSet::new();
    for value in values {
        if value.trim().is_empty() || value.chars().any(char::is_whitespace) {
            return Err(invalid(format!("{} contains an invalid identifier `{}`", field, value)));
        }
        if !seen.insert(value.as_str()) {
            return Err(invalid(format!("{} lists `{}` more than once", field, value)));
        }
    }
    Ok(())
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(message.into())
}
