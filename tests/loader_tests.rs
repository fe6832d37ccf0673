//! Tests for loading layer documents from disk

use arch_model_sdk::catalog::RuleCatalog;
use arch_model_sdk::model::{ModelLoadError, ModelLoader};
use arch_model_sdk::models::{EncodingPattern, Layer};
use arch_model_sdk::validation::{ModelValidator, ValidatorConfig};
use std::fs;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

mod file_tests {
    use super::*;

    #[test]
    fn test_load_files_merges_documents() {
        let dir = TempDir::new().unwrap();
        let motivation = write(
            &dir,
            "motivation.yaml",
            "layer: motivation\nentities:\n  - id: goal-1\n    type: Goal\n",
        );
        let business = write(
            &dir,
            "business.json",
            r#"{"layer": "business", "entities": [
                {"id": "svc-1", "type": "BusinessService", "x-supports-goals": ["goal-1"]}
            ]}"#,
        );

        let catalog = RuleCatalog::builtin();
        let model = ModelLoader::new(&catalog)
            .load_files(&[motivation, business])
            .unwrap();
        assert_eq!(model.documents.len(), 2);
        assert_eq!(model.entity_count(), 2);
        assert_eq!(model.documents[1].layer, Layer::Business);
        assert_eq!(
            model.documents[1].declarations[0].pattern,
            EncodingPattern::Extension
        );

        let outcome = ModelValidator::new(ValidatorConfig::default())
            .unwrap()
            .validate(model);
        assert!(outcome.report.valid, "{:?}", outcome.report.issues);
        assert_eq!(outcome.graph.targets("svc-1", "supports-goals"), vec!["goal-1"]);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let catalog = RuleCatalog::builtin();
        let err = ModelLoader::new(&catalog)
            .load_files(&[dir.path().join("absent.yaml")])
            .unwrap_err();
        assert!(matches!(err, ModelLoadError::Io { .. }));
        assert!(err.to_string().contains("absent.yaml"));
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "broken.yaml", "layer: business\nentities: [\n");
        let catalog = RuleCatalog::builtin();
        let err = ModelLoader::new(&catalog).load_file(&path).unwrap_err();
        assert!(matches!(err, ModelLoadError::Parse { .. }));
        assert!(err.user_message().contains("broken.yaml"));
    }
}

mod reader_tests {
    use super::*;

    #[test]
    fn test_load_reader() {
        let content = "layer: technology\nentities:\n  - id: node-1\n    type: Node\n    x-governed-by-principles: []\n";
        let catalog = RuleCatalog::builtin();
        let docs = ModelLoader::new(&catalog)
            .load_reader(content.as_bytes(), "<stdin>")
            .unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].entities[0].id, "node-1");
        assert_eq!(docs[0].declarations.len(), 1);
    }

    #[test]
    fn test_custom_types_from_config() {
        let config = ValidatorConfig::from_toml_str(
            r#"
[[types]]
name = "DataProduct"
layer = "data-model"

[[rules]]
source_type = "DataProduct"
predicate = "supports-goals"
target_type = "Goal"
"#,
        )
        .unwrap();
        let validator = ModelValidator::new(config).unwrap();
        let loader = ModelLoader::new(validator.catalog());

        let mut model = arch_model_sdk::models::ArchitectureModel::new();
        model.documents.extend(
            loader
                .load_str(
                    "layer: motivation\nentities:\n  - id: goal-1\n    type: Goal\n",
                    "motivation.yaml",
                )
                .unwrap(),
        );
        model.documents.extend(
            loader
                .load_str(
                    "layer: data-model\nentities:\n  - id: dp-1\n    type: DataProduct\n    motivation.supports-goals: goal-1\n",
                    "data-model.yaml",
                )
                .unwrap(),
        );

        let outcome = validator.validate(model);
        assert!(outcome.report.valid, "{:?}", outcome.report.issues);
        assert_eq!(outcome.graph.edge_count(), 1);
    }
}
