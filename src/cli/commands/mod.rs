//! CLI command implementations

pub mod rules;
pub mod validate;

pub use rules::handle_rules;
pub use validate::{ValidateArgs, handle_validate};
