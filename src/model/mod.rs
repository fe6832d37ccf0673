//! Model loading and registration
//!
//! Provides the loader that turns layer documents into an
//! [`ArchitectureModel`](crate::models::ArchitectureModel) and the registry
//! that owns entities during a validation run.

pub mod loader;
pub mod registry;

pub use loader::{ModelLoadError, ModelLoader};
pub use registry::{DuplicateIdError, EntityRegistry};
