//! # packwright
//!
//! Offline schema compiler for versioned data packages. A package declares a
//! linear chain of versions, each expressed as deltas against the previous
//! one; packwright folds the chain into frozen per-version definition sets,
//! checks the deltas for drift, and emits Rust source artifacts: a data type
//! catalog with its six-shape read/write operation matrix, per-version entity
//! declarations and the wire bindings and upgrade functions that go with
//! them. The `wire` module is the runtime the generated code binds against: a
//! keyed-section binary format with deterministic layout and tri-state read
//! outcomes.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use packwright::model::Package;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let text = std::fs::read_to_string("package.json")?;
//! let package: Package = serde_json::from_str(&text)?;
//! let output = packwright::gencode::generate(&package)?;
//! packwright::emit::write_artifacts(&package.output, &output.manifest, &output.artifacts)?;
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod emit;
pub mod error;
pub mod gencode;
pub mod model;
pub mod resolve;
pub mod wire;

pub use catalog::TypeCatalog;
pub use emit::{Artifact, GenerationManifest};
pub use error::{Result, SchemaError};
pub use gencode::{generate, GeneratedOutput};
pub use model::{Definition, Delta, Package, Version};
pub use resolve::{resolve, ResolvedChain};
