//! Architecture layers and their fixed total order

use serde::{Deserialize, Serialize};

/// One of the eleven architectural strata.
///
/// Variants are declared in strategic order: `Motivation` is the most
/// strategic layer and `Apm` the most operational one. The derived `Ord`
/// follows this order and is what direction checks compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layer {
    Motivation,
    Business,
    Security,
    Application,
    Technology,
    Api,
    DataModel,
    Datastore,
    Ux,
    Navigation,
    Apm,
}

impl Layer {
    /// All layers in order
    pub const ALL: [Layer; 11] = [
        Layer::Motivation,
        Layer::Business,
        Layer::Security,
        Layer::Application,
        Layer::Technology,
        Layer::Api,
        Layer::DataModel,
        Layer::Datastore,
        Layer::Ux,
        Layer::Navigation,
        Layer::Apm,
    ];

    /// Get the layer name as used in dot-notation prefixes
    pub fn name(&self) -> &'static str {
        match self {
            Self::Motivation => "motivation",
            Self::Business => "business",
            Self::Security => "security",
            Self::Application => "application",
            Self::Technology => "technology",
            Self::Api => "api",
            Self::DataModel => "data-model",
            Self::Datastore => "datastore",
            Self::Ux => "ux",
            Self::Navigation => "navigation",
            Self::Apm => "apm",
        }
    }

    /// Position in the total order (0-based, Motivation = 0)
    pub fn position(&self) -> usize {
        *self as usize
    }

    /// Strict lowercase parse used for encoding prefixes.
    ///
    /// Unlike `FromStr` this does not accept aliases or mixed case, so that
    /// a field like `Business.owner` is never mistaken for a reference.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|layer| layer.name() == prefix)
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Layer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "motivation" | "1" => Ok(Self::Motivation),
            "business" | "2" => Ok(Self::Business),
            "security" | "3" => Ok(Self::Security),
            "application" | "4" => Ok(Self::Application),
            "technology" | "5" => Ok(Self::Technology),
            "api" | "6" => Ok(Self::Api),
            "data-model" | "datamodel" | "7" => Ok(Self::DataModel),
            "datastore" | "8" => Ok(Self::Datastore),
            "ux" | "9" => Ok(Self::Ux),
            "navigation" | "10" => Ok(Self::Navigation),
            "apm" | "11" => Ok(Self::Apm),
            _ => Err(format!("Unknown layer: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_order() {
        assert!(Layer::Motivation < Layer::Business);
        assert!(Layer::Technology > Layer::Motivation);
        assert!(Layer::Api < Layer::DataModel);
        assert_eq!(Layer::Motivation.position(), 0);
        assert_eq!(Layer::Apm.position(), 10);
        for pair in Layer::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_layer_parse() {
        assert_eq!("motivation".parse::<Layer>().unwrap(), Layer::Motivation);
        assert_eq!("Data_Model".parse::<Layer>().unwrap(), Layer::DataModel);
        assert_eq!("7".parse::<Layer>().unwrap(), Layer::DataModel);
        assert!("presentation".parse::<Layer>().is_err());
    }

    #[test]
    fn test_layer_prefix_is_strict() {
        assert_eq!(Layer::from_prefix("data-model"), Some(Layer::DataModel));
        assert_eq!(Layer::from_prefix("Business"), None);
        assert_eq!(Layer::from_prefix("datamodel"), None);
    }

    #[test]
    fn test_layer_serde_names() {
        let json = serde_json::to_string(&Layer::DataModel).unwrap();
        assert_eq!(json, "\"data-model\"");
        let parsed: Layer = serde_json::from_str("\"apm\"").unwrap();
        assert_eq!(parsed, Layer::Apm);
    }
}
