//! End-to-end generation over the sample package.

mod common;

use packwright::emit::write_artifacts;
use packwright::gencode::generate;

use common::sample_package;

#[test]
fn test_generate_produces_paired_artifacts() {
    let output = generate(&sample_package()).unwrap();
    let names: Vec<&str> = output
        .artifacts
        .iter()
        .map(|a| a.name.as_str())
        .collect();
    assert_eq!(
        names,
        [
            "data_types.rs",
            "value_ops.rs",
            "test_pack_a_types.rs",
            "test_pack_a_io.rs",
        ]
    );
    assert_eq!(output.manifest.artifacts.len(), 4);
}

#[test]
fn test_generation_is_deterministic() {
    let first = generate(&sample_package()).unwrap();
    let second = generate(&sample_package()).unwrap();
    assert_eq!(first.manifest.artifacts, second.manifest.artifacts);
}

#[test]
fn test_artifacts_cover_catalog_and_entities() {
    let output = generate(&sample_package()).unwrap();
    let text = |name: &str| {
        output
            .artifacts
            .iter()
            .find(|a| a.name == name)
            .unwrap()
            .contents()
    };

    let data_types = text("data_types.rs");
    assert!(data_types.contains("pub enum DataType {"));
    assert!(data_types.contains("Fvec3 = 0x69,"));
    assert!(data_types.contains("I16vec2 = 0x52,"));
    assert!(data_types.contains("U64vec4 = 0x78,"));

    let ops = text("value_ops.rs");
    assert!(ops.contains("pub fn read_string_idx_vec_opt("));
    assert!(ops.contains("pub fn write_item_ref("));

    let types = text("test_pack_a_types.rs");
    assert!(types.contains("pub struct TestEntityA {"));
    assert!(types.contains("pub mod v1_2 {"));

    let io = text("test_pack_a_io.rs");
    assert!(io.contains("pub fn write_test_entity_a("));
    assert!(io.contains("pub fn upgrade_test_entity_b_v1_1_to_v1_2("));
    // The version feeding that upgrade keeps a read binding in its own shape.
    assert!(io.contains("pub fn read_test_entity_b_v1_1("));
}

#[test]
fn test_written_artifacts_match_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let output = generate(&sample_package()).unwrap();
    write_artifacts(dir.path(), &output.manifest, &output.artifacts).unwrap();

    for entry in &output.manifest.artifacts {
        let written = std::fs::read_to_string(dir.path().join(&entry.name)).unwrap();
        assert_eq!(
            packwright::emit::Checksum::from_bytes(written.as_bytes()),
            entry.checksum,
            "{} drifted from its manifest entry",
            entry.name
        );
    }

    let manifest_text = std::fs::read_to_string(dir.path().join("manifest.json")).unwrap();
    let reread: packwright::emit::GenerationManifest =
        serde_json::from_str(&manifest_text).unwrap();
    assert_eq!(reread.artifacts, output.manifest.artifacts);
}
