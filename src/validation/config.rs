//! Validator configuration
//!
//! Configuration is plain data: it can be built in code with the `with_*`
//! methods or read from a TOML file.
//!
//! ```toml
//! check_naming = true
//! allow_same_layer_references = false
//!
//! [[types]]
//! name = "CostCenter"
//! layer = "business"
//!
//! [[rules]]
//! source_type = "CostCenter"
//! predicate = "funds-goals"
//! target_type = "Goal"
//! cardinality = "N:N"
//! direction = "upward-only"
//! ```

use crate::catalog::{RuleDefinition, TypeDefinition};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading or checking a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// TOML syntax or schema error
    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// IO error with path context
    #[error("IO error with {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A value is syntactically fine but not acceptable
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl ConfigError {
    /// Create an IO error with path context
    pub fn io_with_path(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            ConfigError::Parse(e) => format!(
                "Invalid configuration: {e}\n\nHint: Check the TOML syntax and the names of the keys."
            ),
            ConfigError::Io { path, source } => format!(
                "Cannot read configuration {}: {source}\n\nHint: Check that the file exists and the path is correct.",
                path.display()
            ),
            ConfigError::InvalidValue(msg) => format!(
                "Invalid configuration value: {msg}\n\nHint: Custom types need a PascalCase name and rules need a source type, predicate and target type."
            ),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Settings for one validation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Normalize and validate references on the rayon pool (needs the `parallel` feature)
    #[serde(default)]
    pub parallel: bool,
    /// Report predicates spelled against the convention of their encoding
    #[serde(default = "default_true")]
    pub check_naming: bool,
    /// Re-issue every warning as an error
    #[serde(default)]
    pub promote_warnings: bool,
    /// Let upward-only rules point at entities in the source's own layer
    #[serde(default = "default_true")]
    pub allow_same_layer_references: bool,
    /// Custom entity types added to the builtin catalog
    #[serde(default)]
    pub types: Vec<TypeDefinition>,
    /// Custom rules added to the builtin catalog
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            check_naming: true,
            promote_warnings: false,
            allow_same_layer_references: true,
            types: Vec::new(),
            rules: Vec::new(),
        }
    }
}

impl ValidatorConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::io_with_path(path, e))?;
        Self::from_toml_str(&content)
    }

    /// Enable parallel normalization and validation
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Enable or disable naming convention checks
    pub fn with_check_naming(mut self, check_naming: bool) -> Self {
        self.check_naming = check_naming;
        self
    }

    /// Treat warnings as errors
    pub fn with_promote_warnings(mut self, promote: bool) -> Self {
        self.promote_warnings = promote;
        self
    }

    /// Allow or forbid same-layer targets for upward-only rules
    pub fn with_same_layer_references(mut self, allow: bool) -> Self {
        self.allow_same_layer_references = allow;
        self
    }

    /// Add a custom entity type
    pub fn with_type(mut self, definition: TypeDefinition) -> Self {
        self.types.push(definition);
        self
    }

    /// Add a custom rule
    pub fn with_rule(mut self, definition: RuleDefinition) -> Self {
        self.rules.push(definition);
        self
    }

    /// Validate the configuration.
    ///
    /// Only checks what can be decided without the catalog; conflicts with
    /// builtin types and rules surface when the catalog is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen_types = HashSet::new();
        for ty in &self.types {
            if !ty.name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
                || !ty.name.chars().all(|c| c.is_ascii_alphanumeric())
            {
                return Err(ConfigError::InvalidValue(format!(
                    "entity type name '{}' must be PascalCase",
                    ty.name
                )));
            }
            if !seen_types.insert(ty.name.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "entity type '{}' is declared twice",
                    ty.name
                )));
            }
        }

        for rule in &self.rules {
            if rule.source_type.is_empty()
                || rule.predicate.is_empty()
                || rule.target_type.is_empty()
            {
                return Err(ConfigError::InvalidValue(format!(
                    "rule ({}, {}) -> {} has an empty field",
                    rule.source_type, rule.predicate, rule.target_type
                )));
            }
        }

        Ok(())
    }
}
