//! Validate command implementation

use crate::cli::error::CliError;
use crate::cli::output::{OutputFormat, format_text_report};
use crate::model::ModelLoader;
use crate::models::ArchitectureModel;
use crate::validation::{ModelValidator, ValidationReport, ValidatorConfig};
use std::path::{Path, PathBuf};

/// Arguments for the `validate` command
#[derive(Debug, Clone, Default)]
pub struct ValidateArgs {
    /// Layer document paths; `-` reads stdin
    pub inputs: Vec<String>,
    /// TOML configuration file
    pub config: Option<PathBuf>,
    pub format: OutputFormat,
    /// Treat warnings as errors
    pub strict: bool,
    /// Validate on the rayon pool
    pub parallel: bool,
}

/// Load all inputs from files or stdin
fn load_inputs(loader: &ModelLoader<'_>, inputs: &[String]) -> Result<ArchitectureModel, CliError> {
    let mut model = ArchitectureModel::new();
    for input in inputs {
        let documents = if input == "-" {
            loader.load_reader(std::io::stdin().lock(), "<stdin>")?
        } else {
            loader.load_file(Path::new(input))?
        };
        model.documents.extend(documents);
    }
    Ok(model)
}

/// Run validation and return the report without printing it
pub fn run_validate(args: &ValidateArgs) -> Result<ValidationReport, CliError> {
    if args.inputs.is_empty() {
        return Err(CliError::InvalidArgument(
            "At least one input file is required".to_string(),
        ));
    }

    let mut config = match &args.config {
        Some(path) => ValidatorConfig::from_file(path)?,
        None => ValidatorConfig::default(),
    };
    if args.strict {
        config = config.with_promote_warnings(true);
    }
    if args.parallel {
        config = config.with_parallel(true);
    }

    let validator = ModelValidator::new(config)?;
    let model = load_inputs(&ModelLoader::new(validator.catalog()), &args.inputs)?;
    Ok(validator.validate(model).report)
}

/// Handle the validate command; returns whether the model is valid
pub fn handle_validate(args: &ValidateArgs) -> Result<bool, CliError> {
    let report = run_validate(args)?;
    match args.format {
        OutputFormat::Text => print!("{}", format_text_report(&report)),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }
    Ok(report.valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_run_validate_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "layer: business\nentities:\n  - id: svc-1\n    type: BusinessService\n    motivation.supports-goals: goal-x\n"
        )
        .unwrap();

        let report = run_validate(&ValidateArgs {
            inputs: vec![file.path().display().to_string()],
            ..Default::default()
        })
        .unwrap();
        assert!(!report.valid);
        assert_eq!(report.issues.len(), 1);
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let err = run_validate(&ValidateArgs {
            inputs: vec!["/nonexistent/model.yaml".to_string()],
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, CliError::Load(_)));
        assert_eq!(err.exit_code(), 2);
    }
}
