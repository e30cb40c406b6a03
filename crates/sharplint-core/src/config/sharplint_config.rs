//! Configuration types for sharplint

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::diagnostics::Severity;
use crate::error::SharplintError;
use crate::result::Result;

/// Default include pattern for source discovery
pub const DEFAULT_INCLUDE: &str = "**/*.cs";

/// Default bound on autofix passes per file
pub const DEFAULT_MAX_PASSES: usize = 10;

/// Root of a sharplint configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SharplintConfig {
    /// JSON schema reference for editor support
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[schemars(description = "Linter configuration")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linter: Option<LinterConfiguration>,

    #[schemars(description = "Autofix configuration")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<FixConfiguration>,

    #[schemars(description = "Source file selection")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<FilesConfiguration>,
}

/// Linter configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinterConfiguration {
    /// Enable/disable linter
    #[schemars(description = "Enable or disable the linter")]
    pub enabled: Option<bool>,

    /// Per-rule severity, keyed by rule id (`SA1012`, ...)
    #[schemars(description = "Rule severity configuration keyed by rule id")]
    pub rules: Option<BTreeMap<String, RuleSeverity>>,
}

impl Default for LinterConfiguration {
    fn default() -> Self {
        Self {
            enabled: Some(true),
            rules: None,
        }
    }
}

/// Rule severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    /// Disable the rule
    Off,
    /// Informational message
    Info,
    /// Warning (doesn't fail the run)
    Warn,
    /// Error (fails the run)
    Error,
}

impl RuleSeverity {
    /// Diagnostic severity, `None` when the rule is off
    pub fn to_severity(self) -> Option<Severity> {
        match self {
            RuleSeverity::Off => None,
            RuleSeverity::Info => Some(Severity::Info),
            RuleSeverity::Warn => Some(Severity::Warning),
            RuleSeverity::Error => Some(Severity::Error),
        }
    }
}

/// Autofix configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FixConfiguration {
    /// Upper bound on analyze/fix passes per file
    #[schemars(description = "Maximum number of autofix passes per file")]
    pub max_passes: Option<usize>,
}

impl Default for FixConfiguration {
    fn default() -> Self {
        Self {
            max_passes: Some(DEFAULT_MAX_PASSES),
        }
    }
}

/// Files configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilesConfiguration {
    /// Glob patterns to include
    #[schemars(description = "Glob patterns for files to include")]
    pub include: Option<Vec<String>>,

    /// Glob patterns to exclude
    #[schemars(description = "Glob patterns for files to exclude")]
    pub exclude: Option<Vec<String>>,
}

impl Default for FilesConfiguration {
    fn default() -> Self {
        Self {
            include: Some(vec![DEFAULT_INCLUDE.to_string()]),
            exclude: Some(Vec::new()),
        }
    }
}

impl SharplintConfig {
    /// Load a configuration file
    ///
    /// `.toml` files are read as TOML, everything else as JSON with comments.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| SharplintError::io_error(path, e))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            _ => Self::from_json_str(&content),
        }
        .map_err(|e| {
            SharplintError::config_error(format!(
                "Failed to load config from '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Parse JSON or JSONC (comments, trailing commas)
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self =
            json5::from_str(content).map_err(|e| SharplintError::config_error(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| SharplintError::config_error(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration written by `config init`
    pub fn recommended() -> Self {
        Self {
            schema: None,
            linter: Some(LinterConfiguration::default()),
            fix: Some(FixConfiguration::default()),
            files: Some(FilesConfiguration::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_passes() == 0 {
            return Err(SharplintError::config_error(
                "fix.maxPasses must be at least 1",
            ));
        }
        for pattern in self.include_patterns().iter().chain(&self.exclude_patterns()) {
            glob::Pattern::new(pattern).map_err(|e| {
                SharplintError::config_error(format!("Invalid glob pattern '{pattern}': {e}"))
            })?;
        }
        Ok(())
    }

    pub fn linter_enabled(&self) -> bool {
        self.linter
            .as_ref()
            .and_then(|linter| linter.enabled)
            .unwrap_or(true)
    }

    /// Configured severity for a rule id, `None` when not configured
    pub fn rule_severity(&self, rule_id: &str) -> Option<RuleSeverity> {
        self.linter
            .as_ref()
            .and_then(|linter| linter.rules.as_ref())
            .and_then(|rules| rules.get(rule_id).copied())
    }

    pub fn max_passes(&self) -> usize {
        self.fix
            .as_ref()
            .and_then(|fix| fix.max_passes)
            .unwrap_or(DEFAULT_MAX_PASSES)
    }

    pub fn include_patterns(&self) -> Vec<String> {
        self.files
            .as_ref()
            .and_then(|files| files.include.clone())
            .filter(|patterns| !patterns.is_empty())
            .unwrap_or_else(|| vec![DEFAULT_INCLUDE.to_string()])
    }

    pub fn exclude_patterns(&self) -> Vec<String> {
        self.files
            .as_ref()
            .and_then(|files| files.exclude.clone())
            .unwrap_or_default()
    }

    /// JSON schema of the configuration file format
    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(SharplintConfig)).unwrap_or_default()
    }
}
