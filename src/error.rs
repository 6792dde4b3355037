//! Error types for schema resolution and generation
//!
//! These cover the generation-time error domain only. Wire-level problems
//! (truncation, key mismatch, scope over/under-consumption) are reported
//! through [`crate::wire::ReadStatus`] and never surface as a `SchemaError`.

use thiserror::Error;

/// Result type for schema compiler operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Schema resolution and generation errors. All are fatal for the package:
/// generation is all-or-nothing and no partial artifacts are considered valid.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("duplicate type discriminant {discriminant:#04x} for variant '{variant}' (already assigned to '{existing}')")]
    DuplicateDiscriminant {
        variant: String,
        existing: String,
        discriminant: u8,
    },

    #[error("variant '{variant}' delegates to undefined item type '{item_type}'")]
    UndefinedItemType { variant: String, item_type: String },

    #[error("unknown type '{type_name}' referenced by variable '{variable}' of '{definition}'")]
    UnknownType {
        definition: String,
        variable: String,
        type_name: String,
    },

    #[error("version '{version}': delta '{name}' declared New but it already exists in the previous version")]
    NewAlreadyExists { version: String, name: String },

    #[error("version '{version}': delta '{name}' declared {kind} but no such definition exists in the previous version")]
    UnknownPrevious {
        version: String,
        name: String,
        kind: &'static str,
    },

    #[error("version '{version}': definition '{name}' received more than one delta")]
    DuplicateDelta { version: String, name: String },

    #[error("version '{version}': definition '{name}' from the previous version received no delta (every known definition must be accounted for)")]
    UnaccountedDefinition { version: String, name: String },

    #[error("version '{version}': mapping for '{definition}' references unknown {side} variable '{variable}'")]
    UnknownMappingVariable {
        version: String,
        definition: String,
        side: &'static str,
        variable: String,
    },

    #[error("version '{version}': '{definition}' depends on unresolved name '{dependency}'")]
    UnresolvedDependency {
        version: String,
        definition: String,
        dependency: String,
    },

    #[error("version '{version}': dependency cycle involving {members:?}")]
    DependencyCycle {
        version: String,
        members: Vec<String>,
    },

    #[error("version '{version}': template '{template}' of '{definition}' expects {expected} type arguments, got {actual}")]
    TemplateArity {
        version: String,
        definition: String,
        template: String,
        expected: usize,
        actual: usize,
    },

    #[error("version '{version}': template '{template}' of '{definition}' instantiated with unknown type '{type_name}'")]
    UnknownTemplateArgument {
        version: String,
        definition: String,
        template: String,
        type_name: String,
    },

    #[error("package '{package}' declares no versions")]
    EmptyPackage { package: String },

    #[error("version '{version}': previous version is '{declared}' but the chain's preceding version is '{actual}'")]
    BrokenChain {
        version: String,
        declared: String,
        actual: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
