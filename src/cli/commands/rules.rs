//! Rules command implementation

use crate::catalog::RuleCatalog;
use crate::cli::error::CliError;
use crate::cli::output::{OutputFormat, format_rules};
use crate::validation::ValidatorConfig;
use std::path::Path;

/// Handle the rules command
pub fn handle_rules(
    source_type: Option<&str>,
    config_path: Option<&Path>,
    format: OutputFormat,
) -> Result<(), CliError> {
    let config = match config_path {
        Some(path) => ValidatorConfig::from_file(path)?,
        None => ValidatorConfig::default(),
    };
    let catalog = RuleCatalog::from_config(&config)?;

    if let Some(source_type) = source_type {
        if catalog.type_layer(source_type).is_none() {
            return Err(CliError::InvalidArgument(format!(
                "Unknown entity type: {}",
                source_type
            )));
        }
    }

    match format {
        OutputFormat::Text => print!("{}", format_rules(&catalog, source_type)),
        OutputFormat::Json => {
            let rules: Vec<_> = catalog
                .rules()
                .filter(|r| source_type.is_none_or(|t| r.source_type == t))
                .collect();
            println!("{}", serde_json::to_string_pretty(&rules)?);
        }
    }
    Ok(())
}
