//! Predicate naming helpers.
//!
//! Canonical predicates are kebab-case. Nested groups write them in
//! camelCase, extension and dot-notation fields in kebab-case; these helpers
//! convert between the two and check a raw spelling against its convention.

use crate::models::{EncodingPattern, Layer};
use once_cell::sync::Lazy;
use regex::Regex;

static KEBAB_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").unwrap());

static CAMEL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z][a-zA-Z0-9]*$").unwrap());

// Ids and URI-like references: no whitespace, no quoting or list punctuation
static IDENTIFIER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_$#./:~@%+=?&-]+$").unwrap());

/// Insert `-` before every uppercase letter except in first position, then
/// lowercase everything.
///
/// # Examples
///
/// ```
/// use arch_model_sdk::validation::naming::uncamel;
///
/// assert_eq!(uncamel("supportsGoals"), "supports-goals");
/// assert_eq!(uncamel("Goal"), "goal");
/// ```
pub fn uncamel(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Lenient kebab-case conversion used for extension and dot-notation fields
pub fn to_kebab(s: &str) -> String {
    uncamel(s).replace('_', "-")
}

pub fn is_kebab_case(s: &str) -> bool {
    KEBAB_REGEX.is_match(s)
}

/// Lower camelCase; a single lowercase word also qualifies
pub fn is_camel_case(s: &str) -> bool {
    CAMEL_REGEX.is_match(s)
}

/// Whether a native field value looks like an entity id or URI reference
pub fn looks_like_identifier(s: &str) -> bool {
    IDENTIFIER_REGEX.is_match(s)
}

/// The part of a raw field name that spells the predicate
pub fn predicate_suffix(raw: &str, pattern: EncodingPattern) -> &str {
    match pattern {
        EncodingPattern::Extension => raw.strip_prefix("x-").unwrap_or(raw),
        EncodingPattern::DotNotation => raw.split_once('.').map_or(raw, |(_, rest)| rest),
        EncodingPattern::Nested => raw.rsplit_once('.').map_or(raw, |(_, rest)| rest),
        EncodingPattern::Native => raw,
    }
}

/// Layer named by the encoding itself, if any (dot prefix or nested group)
pub fn layer_prefix(raw: &str, pattern: EncodingPattern) -> Option<Layer> {
    match pattern {
        EncodingPattern::DotNotation => raw
            .split_once('.')
            .and_then(|(prefix, _)| Layer::from_prefix(prefix)),
        EncodingPattern::Nested => raw
            .rsplit_once('.')
            .and_then(|(group, _)| Layer::from_prefix(group)),
        EncodingPattern::Extension | EncodingPattern::Native => None,
    }
}

/// Canonical kebab-case predicate for a raw field name
pub fn canonical_predicate(raw: &str, pattern: EncodingPattern) -> String {
    let suffix = predicate_suffix(raw, pattern);
    match pattern {
        EncodingPattern::Extension | EncodingPattern::DotNotation => to_kebab(suffix),
        EncodingPattern::Nested => uncamel(suffix),
        EncodingPattern::Native => suffix.to_string(),
    }
}

/// Check the raw spelling against the convention of its encoding.
///
/// Returns the name of the expected convention when the spelling breaks it.
pub fn naming_violation(raw: &str, pattern: EncodingPattern) -> Option<&'static str> {
    let suffix = predicate_suffix(raw, pattern);
    match pattern {
        EncodingPattern::Extension | EncodingPattern::DotNotation if !is_kebab_case(suffix) => {
            Some("kebab-case")
        }
        EncodingPattern::Nested if !is_camel_case(suffix) => Some("camelCase"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uncamel() {
        assert_eq!(uncamel("supportsGoals"), "supports-goals");
        assert_eq!(uncamel("governedByPrinciples"), "governed-by-principles");
        assert_eq!(uncamel("composes"), "composes");
        assert_eq!(uncamel("operationId"), "operation-id");
    }

    #[test]
    fn test_to_kebab() {
        assert_eq!(to_kebab("supports-goals"), "supports-goals");
        assert_eq!(to_kebab("supports_goals"), "supports-goals");
        assert_eq!(to_kebab("supportsGoals"), "supports-goals");
    }

    #[test]
    fn test_case_checks() {
        assert!(is_kebab_case("supports-goals"));
        assert!(is_kebab_case("composes"));
        assert!(!is_kebab_case("supportsGoals"));
        assert!(!is_kebab_case("supports--goals"));
        assert!(!is_kebab_case("-goals"));

        assert!(is_camel_case("supportsGoals"));
        assert!(is_camel_case("composes"));
        assert!(!is_camel_case("supports-goals"));
        assert!(!is_camel_case("SupportsGoals"));
    }

    #[test]
    fn test_identifier_shape() {
        assert!(looks_like_identifier("op-create-customer"));
        assert!(looks_like_identifier("#/components/schemas/Customer"));
        assert!(!looks_like_identifier("create a customer"));
        assert!(!looks_like_identifier(""));
        assert!(!looks_like_identifier("a,b"));
    }

    #[test]
    fn test_canonical_predicate_per_pattern() {
        assert_eq!(
            canonical_predicate("x-supports-goals", EncodingPattern::Extension),
            "supports-goals"
        );
        assert_eq!(
            canonical_predicate("motivation.supports-goals", EncodingPattern::DotNotation),
            "supports-goals"
        );
        assert_eq!(
            canonical_predicate("motivation.supportsGoals", EncodingPattern::Nested),
            "supports-goals"
        );
        assert_eq!(
            canonical_predicate("operationId", EncodingPattern::Native),
            "operationId"
        );
    }

    #[test]
    fn test_layer_prefix() {
        assert_eq!(
            layer_prefix("motivation.supports-goals", EncodingPattern::DotNotation),
            Some(Layer::Motivation)
        );
        assert_eq!(
            layer_prefix("relationships.supportsGoals", EncodingPattern::Nested),
            None
        );
        assert_eq!(
            layer_prefix("x-supports-goals", EncodingPattern::Extension),
            None
        );
    }

    #[test]
    fn test_naming_violation() {
        assert_eq!(
            naming_violation("x-supportsGoals", EncodingPattern::Extension),
            Some("kebab-case")
        );
        assert_eq!(
            naming_violation("motivation.supports-goals", EncodingPattern::Nested),
            Some("camelCase")
        );
        assert_eq!(
            naming_violation("motivation.supportsGoals", EncodingPattern::Nested),
            None
        );
        assert_eq!(naming_violation("$ref", EncodingPattern::Native), None);
    }
}
