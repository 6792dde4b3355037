//! Version chain resolution over a three-version package.

mod common;

use std::sync::Arc;

use packwright::catalog::TypeCatalog;
use packwright::error::SchemaError;
use packwright::model::{Definition, Delta, Package, Variable};
use packwright::resolve::{resolve, FieldSource, Provenance};

use common::sample_package;

#[test]
fn test_chain_resolves_every_version() {
    let catalog = TypeCatalog::builtin().unwrap();
    let chain = resolve(&sample_package(), &catalog).unwrap();

    assert_eq!(chain.versions.len(), 3);
    assert_eq!(
        chain.versions[0].names().collect::<Vec<_>>(),
        ["TestItemA", "TestEntityA"]
    );
    // New definitions append after carried ones, keeping emission order stable.
    assert_eq!(
        chain.versions[1].names().collect::<Vec<_>>(),
        ["TestItemA", "TestEntityA", "TestEntityB"]
    );
    assert_eq!(
        chain.versions[2].names().collect::<Vec<_>>(),
        ["TestItemA", "TestEntityA", "TestEntityB"]
    );
}

#[test]
fn test_identical_shares_previous_snapshot() {
    let catalog = TypeCatalog::builtin().unwrap();
    let chain = resolve(&sample_package(), &catalog).unwrap();

    let v1_0 = chain.version("v1_0").unwrap();
    let v1_2 = chain.version("v1_2").unwrap();
    // An Identical delta carries the same frozen definition, not a copy.
    assert!(Arc::ptr_eq(
        &v1_0.get("TestEntityA").unwrap().definition,
        &v1_2.get("TestEntityA").unwrap().definition,
    ));
    assert!(matches!(
        v1_2.get("TestEntityA").unwrap().provenance,
        Provenance::Identical
    ));
}

#[test]
fn test_rename_mapping_builds_transcription_plan() {
    let catalog = TypeCatalog::builtin().unwrap();
    let chain = resolve(&sample_package(), &catalog).unwrap();

    let entry = chain.latest().get("TestEntityB").unwrap();
    let Provenance::Modified { plan } = &entry.provenance else {
        panic!("expected a modified entry");
    };
    assert_eq!(plan.fields.len(), 1);
    assert_eq!(plan.fields[0].0, "Name2");
    assert_eq!(
        plan.fields[0].1,
        FieldSource::Copied {
            from: "Name".into()
        }
    );
    assert!(plan.dropped.is_empty());

    // The version before the rename still sees the old shape.
    let old = chain.version("v1_1").unwrap().get("TestEntityB").unwrap();
    assert_eq!(old.definition.definition.variables[0].name, "Name");
}

#[test]
fn test_unaccounted_definition_is_rejected() {
    let catalog = TypeCatalog::builtin().unwrap();
    let mut package = sample_package();
    // Drop the Identical delta for TestItemA from v1_1.
    package.versions[1].deltas.remove(0);

    let err = resolve(&package, &catalog).unwrap_err();
    assert!(matches!(
        err,
        SchemaError::UnaccountedDefinition { ref name, .. } if name == "TestItemA"
    ));
}

#[test]
fn test_identical_for_unknown_definition_is_rejected() {
    let catalog = TypeCatalog::builtin().unwrap();
    let mut package = sample_package();
    package.versions[1].deltas.push(Delta::Identical {
        name: "NoSuchEntity".into(),
    });

    let err = resolve(&package, &catalog).unwrap_err();
    assert!(matches!(
        err,
        SchemaError::UnknownPrevious { ref name, kind: "Identical", .. } if name == "NoSuchEntity"
    ));
}

#[test]
fn test_new_for_existing_definition_is_rejected() {
    let catalog = TypeCatalog::builtin().unwrap();
    let mut package = sample_package();
    package.versions[1].deltas[0] = Delta::New {
        definition: Definition::item("TestItemA")
            .with_variables(vec![Variable::new("String", "Name")]),
    };

    let err = resolve(&package, &catalog).unwrap_err();
    assert!(matches!(
        err,
        SchemaError::NewAlreadyExists { ref name, .. } if name == "TestItemA"
    ));
}

#[test]
fn test_broken_chain_link_is_rejected() {
    let catalog = TypeCatalog::builtin().unwrap();
    let mut package = sample_package();
    package.versions[2].previous = Some("v1_0".into());

    let err = resolve(&package, &catalog).unwrap_err();
    assert!(matches!(err, SchemaError::BrokenChain { .. }));
}

#[test]
fn test_unknown_mapping_variable_is_rejected() {
    let catalog = TypeCatalog::builtin().unwrap();
    let mut package = sample_package();
    if let Delta::Modified { mappings, .. } = &mut package.versions[2].deltas[2] {
        if let packwright::model::MigrationMapping::Rename { from, .. } = &mut mappings[0] {
            *from = "NoSuchVariable".into();
        }
    }

    let err = resolve(&package, &catalog).unwrap_err();
    assert!(matches!(
        err,
        SchemaError::UnknownMappingVariable { side: "source", .. }
    ));
}

#[test]
fn test_empty_package_is_rejected() {
    let catalog = TypeCatalog::builtin().unwrap();
    let package = Package::new("Empty", "generated", vec![]);
    assert!(matches!(
        resolve(&package, &catalog).unwrap_err(),
        SchemaError::EmptyPackage { .. }
    ));
}
