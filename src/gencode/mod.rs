//! Code generation
//!
//! Turns a [`TypeCatalog`] and a resolved version chain into ordered source
//! artifacts. Output comes in declaration/implementation pairs: the catalog
//! unit emits the discriminant enum and limit constants alongside the
//! read/write operation matrix, and the entity unit emits per-version type
//! declarations alongside their reader, writer and upgrade bindings.

pub mod entities;
pub mod matrix;

use tracing::{debug, info};

use crate::catalog::TypeCatalog;
use crate::emit::{Artifact, GenerationManifest};
use crate::error::Result;
use crate::model::Package;
use crate::resolve::{resolve, ResolvedChain};

/// Complete output of one generation run.
#[derive(Debug, Clone)]
pub struct GeneratedOutput {
    pub artifacts: Vec<Artifact>,
    pub manifest: GenerationManifest,
    pub chain: ResolvedChain,
}

/// Generate all artifacts for a package against the builtin catalog.
pub fn generate(package: &Package) -> Result<GeneratedOutput> {
    let catalog = TypeCatalog::builtin()?;
    generate_with_catalog(package, &catalog)
}

/// Generate all artifacts for a package against an explicit catalog. Artifact
/// order is fixed by catalog declaration order and version chain order, so a
/// second run over the same inputs is byte-identical.
pub fn generate_with_catalog(package: &Package, catalog: &TypeCatalog) -> Result<GeneratedOutput> {
    info!(package = %package.name, versions = package.versions.len(), "generating");
    let chain = resolve(package, catalog)?;

    let artifacts = vec![
        matrix::data_types_artifact(catalog, &package.name),
        matrix::value_ops_artifact(catalog, &package.name),
        entities::types_artifact(&chain, catalog)?,
        entities::io_artifact(&chain, catalog)?,
    ];
    for artifact in &artifacts {
        debug!(artifact = %artifact.name, lines = artifact.lines.len(), "built artifact");
    }

    let manifest = GenerationManifest::new(&package.name, &artifacts);
    Ok(GeneratedOutput {
        artifacts,
        manifest,
        chain,
    })
}

/// "TestEntityA" -> "test_entity_a", "Fvec3" -> "fvec3", "Hash256" -> "hash256".
pub(crate) fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for ch in name.chars() {
        if ch.is_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
            prev_lower = false;
        } else {
            out.push(ch);
            prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        }
    }
    out
}

/// "bool" -> "Bool", "i32" -> "I32", "Fvec3" stays "Fvec3".
pub(crate) fn camel_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("TestEntityA"), "test_entity_a");
        assert_eq!(snake_case("Fvec3"), "fvec3");
        assert_eq!(snake_case("ItemRef"), "item_ref");
        assert_eq!(snake_case("Hash256"), "hash256");
        assert_eq!(snake_case("bool"), "bool");
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("bool"), "Bool");
        assert_eq!(camel_case("i32"), "I32");
        assert_eq!(camel_case("Fvec3"), "Fvec3");
    }
}
