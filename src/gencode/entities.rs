//! Entity emission
//!
//! Emits the entity unit of a resolved chain: one declaration artifact with a
//! module per version (template aliases plus definition structs, latest
//! re-exported at the top level), and one implementation artifact with the
//! reader/writer bindings of the latest version, read-only bindings for the
//! versions that feed an upgrade, and the upgrade functions derived from each
//! modified definition's transcription plan.

use crate::catalog::TypeCatalog;
use crate::emit::{banner, Artifact};
use crate::error::Result;
use crate::model::{DefKind, Variable};
use crate::resolve::{
    IncludeStyle, Provenance, ResolvedChain, ResolvedDefinition, ResolvedTemplate,
};

use super::snake_case;

/// How a variable of a definition is represented on the wire.
enum FieldKind<'a> {
    /// A catalog type, handled by the operation matrix
    Leaf { op: String },
    /// An instantiated template container, stored as a sections array
    Table(&'a ResolvedTemplate),
    /// Another definition, stored as a nested section
    Nested { type_name: &'a str },
}

fn classify<'a>(
    def: &'a ResolvedDefinition,
    variable: &'a Variable,
    catalog: &TypeCatalog,
) -> FieldKind<'a> {
    if let Some(template) = def.templates.iter().find(|t| t.name == variable.type_name) {
        return FieldKind::Table(template);
    }
    if let Some(info) = catalog.get(&variable.type_name) {
        return FieldKind::Leaf {
            op: snake_case(&info.implementing_type),
        };
    }
    // freeze() already checked the type, so this is a dependency definition.
    FieldKind::Nested {
        type_name: &variable.type_name,
    }
}

fn field_type(def: &ResolvedDefinition, variable: &Variable, catalog: &TypeCatalog) -> String {
    let base = if def.templates.iter().any(|t| t.name == variable.type_name) {
        variable.type_name.clone()
    } else if let Some(info) = catalog.get(&variable.type_name) {
        info.rust_type.clone()
    } else {
        variable.type_name.clone()
    };
    if variable.optional {
        format!("Option<{base}>")
    } else {
        base
    }
}

fn version_module(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect::<String>()
        .to_lowercase()
}

/// The declaration artifact: per-version modules of structs and aliases.
pub fn types_artifact(chain: &ResolvedChain, catalog: &TypeCatalog) -> Result<Artifact> {
    let mut a = Artifact::new(format!("{}_types.rs", snake_case(&chain.package)));
    a.extend(banner(&chain.package));
    a.push("#![allow(non_camel_case_types)]");
    a.push("#![allow(unused_imports)]");
    a.blank();
    a.push("use packwright::wire::{EntityRef, Hash256, ItemRef, ItemTable, Quat};");
    a.push("use uuid::Uuid;");

    for version in &chain.versions {
        let module = version_module(&version.name);
        a.blank();
        a.push(format!("/// Definitions frozen for version `{}`.", version.name));
        a.push(format!("pub mod {module} {{"));
        a.push("    use super::*;");

        for entry in &version.entries {
            let def = &entry.definition;
            let name = &def.definition.name;
            a.blank();
            if !def.dependencies.is_empty() {
                let requires: Vec<String> = def
                    .dependencies
                    .iter()
                    .map(|d| {
                        let style = match d.style {
                            IncludeStyle::Include => "include",
                            IncludeStyle::ForwardDeclare => "forward",
                        };
                        format!("{} ({style})", d.name)
                    })
                    .collect();
                a.push(format!("    // requires: {}", requires.join(", ")));
            }
            for template in &def.templates {
                a.push(format!("    {}", template.rust_decl));
            }
            let kind = match def.definition.kind {
                DefKind::Entity => "entity",
                DefKind::Item => "item",
            };
            a.push(format!("    /// `{name}` ({kind})"));
            a.push("    #[derive(Debug, Clone, Default, PartialEq)]");
            a.push(format!("    pub struct {name} {{"));
            for variable in &def.definition.variables {
                a.push(format!(
                    "        pub {}: {},",
                    snake_case(&variable.name),
                    field_type(def, variable, catalog)
                ));
            }
            a.push("    }");
        }
        a.push("}");
    }

    a.blank();
    a.push(format!(
        "pub use {}::*;",
        version_module(&chain.latest().name)
    ));
    Ok(a)
}

/// Where a read binding's types and callee names live. Latest-version
/// bindings use bare names; bindings for an earlier version qualify types
/// with the version module and suffix function names with it.
#[derive(Clone, Copy, Default)]
struct ReadScope<'a> {
    /// "" or "v1_1::"
    qualifier: &'a str,
    /// "" or "_v1_1"
    suffix: &'a str,
}

/// The implementation artifact: wire bindings for the latest version, read
/// bindings for the versions feeding an upgrade, and the upgrade functions
/// across the chain.
pub fn io_artifact(chain: &ResolvedChain, catalog: &TypeCatalog) -> Result<Artifact> {
    let pkg = snake_case(&chain.package);
    let mut a = Artifact::new(format!("{pkg}_io.rs"));
    a.extend(banner(&chain.package));
    a.push("#![allow(unused_imports)]");
    a.blank();
    a.push("use packwright::wire::{EntityReader, EntityWriter, ItemTable};");
    a.push("use packwright::wire::{ItemBegin, SectionBegin, SectionsArrayBegin};");
    a.push("use packwright::wire::{EntityRef, Hash256, ItemRef, Quat};");
    a.push("use uuid::Uuid;");
    a.blank();
    a.push(format!("use super::{pkg}_types::*;"));
    a.push("use super::value_ops::*;");

    let latest = chain.latest();
    for entry in &latest.entries {
        let def = &entry.definition;
        let name = &def.definition.name;
        let fn_name = snake_case(name);

        a.blank();
        a.push(format!(
            "pub fn write_{fn_name}(writer: &mut EntityWriter, value: &{name}) -> bool {{"
        ));
        a.push(format!("    writer.begin_section(\"{name}\");"));
        a.push(format!(
            "    if !write_{fn_name}_fields(writer, value) {{"
        ));
        a.push("        return false;");
        a.push("    }");
        a.push("    writer.end_section();");
        a.push("    true");
        a.push("}");
        a.blank();
        a.push(format!(
            "pub fn write_{fn_name}_fields(writer: &mut EntityWriter, value: &{name}) -> bool {{"
        ));
        for variable in &def.definition.variables {
            write_field(&mut a, def, variable, catalog);
        }
        a.push("    true");
        a.push("}");

        read_binding(&mut a, def, catalog, ReadScope::default());
    }

    // Versions that feed an upgrade still need their read side, so archived
    // data can be decoded in its own shape before being carried forward.
    for inx in feeder_versions(chain) {
        let version = &chain.versions[inx];
        let module = version_module(&version.name);
        let qualifier = format!("{module}::");
        let suffix = format!("_{module}");
        let scope = ReadScope {
            qualifier: &qualifier,
            suffix: &suffix,
        };
        a.blank();
        a.push(format!(
            "// read bindings for `{}` data awaiting upgrade",
            version.name
        ));
        for entry in &version.entries {
            read_binding(&mut a, &entry.definition, catalog, scope);
        }
    }

    upgrade_fns(&mut a, chain);
    Ok(a)
}

/// Indices of versions whose data can still arrive on disk: every
/// predecessor of a version that modified at least one definition.
fn feeder_versions(chain: &ResolvedChain) -> Vec<usize> {
    let mut feeders: Vec<usize> = chain
        .versions
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, v)| {
            v.entries
                .iter()
                .any(|e| matches!(e.provenance, Provenance::Modified { .. }))
        })
        .map(|(inx, _)| inx - 1)
        .collect();
    feeders.dedup();
    feeders
}

fn read_binding(a: &mut Artifact, def: &ResolvedDefinition, catalog: &TypeCatalog, scope: ReadScope<'_>) {
    let name = &def.definition.name;
    let fn_name = snake_case(name);
    let ReadScope { qualifier, suffix } = scope;

    a.blank();
    a.push(format!(
        "pub fn read_{fn_name}{suffix}(reader: &mut EntityReader<'_>, value: &mut {qualifier}{name}) -> bool {{"
    ));
    a.push(format!(
        "    match reader.begin_section(\"{name}\", false) {{"
    ));
    a.push("        SectionBegin::Present(mut section) => {");
    a.push(format!(
        "            if !read_{fn_name}{suffix}_fields(&mut section, value) {{"
    ));
    a.push("                return false;");
    a.push("            }");
    a.push("            reader.end_section(section)");
    a.push("        }");
    a.push("        _ => false,");
    a.push("    }");
    a.push("}");
    a.blank();
    a.push(format!(
        "pub fn read_{fn_name}{suffix}_fields(reader: &mut EntityReader<'_>, value: &mut {qualifier}{name}) -> bool {{"
    ));
    for variable in &def.definition.variables {
        read_field(a, def, variable, catalog, scope);
    }
    a.push("    true");
    a.push("}");
}

fn write_field(
    a: &mut Artifact,
    def: &ResolvedDefinition,
    variable: &Variable,
    catalog: &TypeCatalog,
) {
    let key = &variable.name;
    let field = snake_case(&variable.name);
    match classify(def, variable, catalog) {
        FieldKind::Leaf { op } => {
            if variable.optional {
                a.push(format!(
                    "    write_{op}_opt(writer, \"{key}\", value.{field}.as_ref());"
                ));
            } else {
                a.push(format!(
                    "    write_{op}(writer, \"{key}\", &value.{field});"
                ));
            }
        }
        FieldKind::Table(template) => {
            let key_op = snake_case(&template_key_type(template));
            let item = snake_case(&template_item_type(template));
            if variable.optional {
                a.push(format!("    match value.{field}.as_ref() {{"));
                a.push("        Some(table) => {");
                write_table_body(a, key, "table", &key_op, &item, 12);
                a.push("        }");
                a.push(format!("        None => writer.write_null(\"{key}\"),"));
                a.push("    }");
            } else {
                write_table_body(a, key, &format!("value.{field}"), &key_op, &item, 4);
            }
        }
        FieldKind::Nested { type_name } => {
            let inner = snake_case(type_name);
            if variable.optional {
                a.push(format!("    match value.{field}.as_ref() {{"));
                a.push("        Some(inner) => {");
                a.push(format!("            writer.begin_section(\"{key}\");"));
                a.push(format!(
                    "            if !write_{inner}_fields(writer, inner) {{"
                ));
                a.push("                return false;");
                a.push("            }");
                a.push("            writer.end_section();");
                a.push("        }");
                a.push(format!("        None => writer.write_null(\"{key}\"),"));
                a.push("    }");
            } else {
                a.push(format!("    writer.begin_section(\"{key}\");"));
                a.push(format!(
                    "    if !write_{inner}_fields(writer, &value.{field}) {{"
                ));
                a.push("        return false;");
                a.push("    }");
                a.push("    writer.end_section();");
            }
        }
    }
}

fn write_table_body(a: &mut Artifact, key: &str, expr: &str, key_op: &str, item: &str, indent: usize) {
    let pad = " ".repeat(indent);
    a.push(format!("{pad}if !{expr}.validate() {{"));
    a.push(format!("{pad}    return false;"));
    a.push(format!("{pad}}}"));
    a.push(format!(
        "{pad}writer.begin_sections_array(\"{key}\", {expr}.len() as u64);"
    ));
    a.push(format!("{pad}for (key, item) in {expr}.iter() {{"));
    a.push(format!("{pad}    writer.begin_array_element(true);"));
    a.push(format!(
        "{pad}    write_{key_op}(writer, \"Key\", key);"
    ));
    a.push(format!("{pad}    match item {{"));
    a.push(format!("{pad}        Some(item) => {{"));
    a.push(format!("{pad}            writer.begin_section(\"Item\");"));
    a.push(format!(
        "{pad}            if !write_{item}_fields(writer, item) {{"
    ));
    a.push(format!("{pad}                return false;"));
    a.push(format!("{pad}            }}"));
    a.push(format!("{pad}            writer.end_section();"));
    a.push(format!("{pad}        }}"));
    a.push(format!("{pad}        None => writer.write_null(\"Item\"),"));
    a.push(format!("{pad}    }}"));
    a.push(format!("{pad}    writer.end_array_element();"));
    a.push(format!("{pad}}}"));
    a.push(format!("{pad}writer.end_sections_array();"));
}

fn read_field(
    a: &mut Artifact,
    def: &ResolvedDefinition,
    variable: &Variable,
    catalog: &TypeCatalog,
    scope: ReadScope<'_>,
) {
    let ReadScope { qualifier, suffix } = scope;
    let key = &variable.name;
    let field = snake_case(&variable.name);
    match classify(def, variable, catalog) {
        FieldKind::Leaf { op } => {
            let opt = if variable.optional { "_opt" } else { "" };
            a.push(format!(
                "    if !read_{op}{opt}(reader, \"{key}\", &mut value.{field}).did_not_fail() {{"
            ));
            a.push("        return false;");
            a.push("    }");
        }
        FieldKind::Table(template) => {
            let ctor = if template.zero_keys_allowed {
                "ItemTable::with_zero_keys()"
            } else {
                "ItemTable::new()"
            };
            let key_ty = template_key_type(template);
            let key_op = snake_case(&key_ty);
            let item_ty = template_item_type(template);
            let item_op = snake_case(&item_ty);
            let null_allowed = variable.optional;
            a.push(format!(
                "    match reader.begin_sections_array(\"{key}\", {null_allowed}) {{"
            ));
            if variable.optional {
                a.push(format!(
                    "        SectionsArrayBegin::Absent => value.{field} = None,"
                ));
            }
            a.push("        SectionsArrayBegin::Present { reader: mut elems, count } => {");
            a.push(format!("            let mut table = {ctor};"));
            a.push("            for inx in 0..count {");
            a.push("                match elems.begin_array_element(inx, false) {");
            a.push("                    ItemBegin::Data(mut element) => {");
            a.push(format!(
                "                        let mut key = {key_ty}::default();"
            ));
            a.push(format!(
                "                        if !read_{key_op}(&mut element, \"Key\", &mut key).did_not_fail() {{"
            ));
            a.push("                            return false;");
            a.push("                        }");
            a.push("                        match element.begin_section(\"Item\", true) {");
            a.push("                            SectionBegin::Absent => {");
            a.push("                                table.insert_empty(key);");
            a.push("                            }");
            a.push("                            SectionBegin::Present(mut section) => {");
            a.push(format!(
                "                                let mut item = {qualifier}{item_ty}::default();"
            ));
            a.push(format!(
                "                                if !read_{item_op}{suffix}_fields(&mut section, &mut item) {{"
            ));
            a.push("                                    return false;");
            a.push("                                }");
            a.push("                                if !element.end_section(section) {");
            a.push("                                    return false;");
            a.push("                                }");
            a.push("                                table.insert(key, item);");
            a.push("                            }");
            a.push("                            SectionBegin::Fail => return false,");
            a.push("                        }");
            a.push("                        if !elems.end_array_element(inx, element) {");
            a.push("                            return false;");
            a.push("                        }");
            a.push("                    }");
            a.push("                    _ => return false,");
            a.push("                }");
            a.push("            }");
            a.push("            if !reader.end_sections_array(elems) {");
            a.push("                return false;");
            a.push("            }");
            a.push("            if !table.validate() {");
            a.push("                return false;");
            a.push("            }");
            if variable.optional {
                a.push(format!("            value.{field} = Some(table);"));
            } else {
                a.push(format!("            value.{field} = table;"));
            }
            a.push("        }");
            a.push("        _ => return false,");
            a.push("    }");
        }
        FieldKind::Nested { type_name } => {
            let inner = snake_case(type_name);
            let null_allowed = variable.optional;
            a.push(format!(
                "    match reader.begin_section(\"{key}\", {null_allowed}) {{"
            ));
            if variable.optional {
                a.push(format!("        SectionBegin::Absent => value.{field} = None,"));
                a.push("        SectionBegin::Present(mut section) => {");
                a.push(format!(
                    "            let mut inner = {qualifier}{type_name}::default();"
                ));
                a.push(format!(
                    "            if !read_{inner}{suffix}_fields(&mut section, &mut inner) {{"
                ));
                a.push("                return false;");
                a.push("            }");
                a.push("            if !reader.end_section(section) {");
                a.push("                return false;");
                a.push("            }");
                a.push(format!("            value.{field} = Some(inner);"));
                a.push("        }");
            } else {
                a.push("        SectionBegin::Present(mut section) => {");
                a.push(format!(
                    "            if !read_{inner}{suffix}_fields(&mut section, &mut value.{field}) {{"
                ));
                a.push("                return false;");
                a.push("            }");
                a.push("            if !reader.end_section(section) {");
                a.push("                return false;");
                a.push("            }");
                a.push("        }");
            }
            a.push("        _ => return false,");
            a.push("    }");
        }
    }
}

/// One upgrade function per `Modified` definition in each version, built from
/// its transcription plan.
fn upgrade_fns(a: &mut Artifact, chain: &ResolvedChain) {
    for (inx, version) in chain.versions.iter().enumerate().skip(1) {
        let prev_mod = version_module(&chain.versions[inx - 1].name);
        let this_mod = version_module(&version.name);
        for entry in &version.entries {
            let Provenance::Modified { plan } = &entry.provenance else {
                continue;
            };
            let name = &entry.definition.definition.name;
            let fn_name = snake_case(name);
            a.blank();
            if !plan.dropped.is_empty() {
                a.push(format!("// dropped from {prev_mod}: {}", plan.dropped.join(", ")));
            }
            a.push(format!(
                "pub fn upgrade_{fn_name}_{prev_mod}_to_{this_mod}(prev: {prev_mod}::{name}) -> {this_mod}::{name} {{"
            ));
            a.push(format!("    {this_mod}::{name} {{"));
            for (field, source) in &plan.fields {
                let expr = match source {
                    crate::resolve::FieldSource::Copied { from } => {
                        format!("prev.{}", snake_case(from))
                    }
                    crate::resolve::FieldSource::Defaulted => "Default::default()".to_string(),
                };
                a.push(format!("        {}: {expr},", snake_case(field)));
            }
            a.push("    }");
            a.push("}");
        }
    }
}

fn template_key_type(template: &ResolvedTemplate) -> String {
    template_types(template).0
}

fn template_item_type(template: &ResolvedTemplate) -> String {
    template_types(template).1
}

/// Recover the two instantiation types from the frozen alias declaration.
fn template_types(template: &ResolvedTemplate) -> (String, String) {
    let args = template
        .rust_decl
        .split_once('<')
        .and_then(|(_, rest)| rest.split_once('>'))
        .map(|(args, _)| args)
        .unwrap_or_default();
    let mut parts = args.split(',').map(|s| s.trim().to_string());
    let key = parts.next().unwrap_or_default();
    let value = parts.next().unwrap_or_default();
    (key, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Definition, Delta, Dependency, MigrationMapping, Package, Template, TemplateFlag,
        TemplateKind, Version,
    };
    use crate::resolve::resolve;

    fn sample_package() -> Package {
        let item_a = Definition::item("TestItemA").with_variables(vec![
            Variable::new("String", "Name"),
            Variable::optional("String", "OptionalText"),
        ]);
        let entity_a = Definition::entity("TestEntityA")
            .with_dependencies(vec![Dependency::new("TestItemA", true)])
            .with_templates(vec![Template::new(
                "test_table",
                TemplateKind::ItemTable,
                vec!["ItemRef", "TestItemA"],
            )
            .with_flags(vec![TemplateFlag::ZeroKeys])])
            .with_variables(vec![
                Variable::optional("test_table", "TestVariableA"),
                Variable::new("String", "Name"),
                Variable::optional("String", "OptionalText"),
            ]);
        let entity_b =
            Definition::entity("TestEntityB").with_variables(vec![Variable::new("String", "Name")]);
        let entity_b_moved = Definition::entity("TestEntityB")
            .with_variables(vec![Variable::new("String", "Name2")]);

        Package::new(
            "TestPackA",
            "generated",
            vec![
                Version::root(
                    "v1_0",
                    vec![
                        Delta::New {
                            definition: item_a,
                        },
                        Delta::New {
                            definition: entity_a,
                        },
                    ],
                ),
                Version::next(
                    "v1_1",
                    "v1_0",
                    vec![
                        Delta::Identical {
                            name: "TestItemA".into(),
                        },
                        Delta::Identical {
                            name: "TestEntityA".into(),
                        },
                        Delta::New {
                            definition: entity_b,
                        },
                    ],
                ),
                Version::next(
                    "v1_2",
                    "v1_1",
                    vec![
                        Delta::Identical {
                            name: "TestItemA".into(),
                        },
                        Delta::Identical {
                            name: "TestEntityA".into(),
                        },
                        Delta::Modified {
                            definition: entity_b_moved,
                            mappings: vec![MigrationMapping::Rename {
                                to: "Name2".into(),
                                from: "Name".into(),
                            }],
                        },
                    ],
                ),
            ],
        )
    }

    fn sample_chain() -> (crate::resolve::ResolvedChain, TypeCatalog) {
        let catalog = TypeCatalog::builtin().unwrap();
        let chain = resolve(&sample_package(), &catalog).unwrap();
        (chain, catalog)
    }

    #[test]
    fn test_types_artifact_has_version_modules() {
        let (chain, catalog) = sample_chain();
        let text = types_artifact(&chain, &catalog).unwrap().contents();
        assert!(text.contains("pub mod v1_0 {"));
        assert!(text.contains("pub mod v1_1 {"));
        assert!(text.contains("pub mod v1_2 {"));
        assert!(text.contains("pub use v1_2::*;"));
        assert!(text.contains("pub type test_table = ItemTable<ItemRef, TestItemA>;"));
        assert!(text.contains("pub test_variable_a: Option<test_table>,"));
        assert!(text.contains("pub name2: String,"));
    }

    #[test]
    fn test_io_artifact_binds_latest_version() {
        let (chain, catalog) = sample_chain();
        let text = io_artifact(&chain, &catalog).unwrap().contents();
        assert!(text.contains("pub fn write_test_entity_a(writer: &mut EntityWriter"));
        assert!(text.contains("pub fn read_test_entity_b(reader: &mut EntityReader"));
        // The table variable round-trips through a sections array.
        assert!(text.contains("writer.begin_sections_array(\"TestVariableA\""));
        assert!(text.contains("reader.begin_sections_array(\"TestVariableA\", true)"));
    }

    #[test]
    fn test_io_artifact_reads_versions_feeding_upgrades() {
        let (chain, catalog) = sample_chain();
        let text = io_artifact(&chain, &catalog).unwrap().contents();
        // v1_1 feeds the v1_2 upgrade of TestEntityB, so its definitions get
        // read bindings in their own shape.
        assert!(text.contains(
            "pub fn read_test_entity_b_v1_1(reader: &mut EntityReader<'_>, value: &mut v1_1::TestEntityB) -> bool {"
        ));
        assert!(text.contains("read_test_item_a_v1_1_fields("));
        // Old shapes are decode-only; nothing writes them back out.
        assert!(!text.contains("write_test_entity_b_v1_1"));
        // v1_0 feeds nothing: no definition was modified going into v1_1.
        assert!(!text.contains("read_test_entity_a_v1_0"));
    }

    #[test]
    fn test_table_io_writes_key_for_every_slot() {
        let (chain, catalog) = sample_chain();
        let text = io_artifact(&chain, &catalog).unwrap().contents();
        // The key precedes the payload, and an empty slot still carries one.
        assert!(text.contains("write_item_ref(writer, \"Key\", key);"));
        assert!(text.contains("None => writer.write_null(\"Item\"),"));
        assert!(text.contains("table.insert_empty(key);"));
    }

    #[test]
    fn test_generated_io_enforces_table_key_policy() {
        let (chain, catalog) = sample_chain();
        let text = io_artifact(&chain, &catalog).unwrap().contents();
        // Writers refuse a table that violates its key policy, and readers
        // re-check after filling from the wire.
        assert!(text.contains("if !table.validate() {"));
        assert!(text.contains(
            "pub fn write_test_entity_a(writer: &mut EntityWriter, value: &TestEntityA) -> bool {"
        ));
        assert!(text.contains(
            "pub fn write_test_entity_a_fields(writer: &mut EntityWriter, value: &TestEntityA) -> bool {"
        ));
    }

    #[test]
    fn test_upgrade_fn_follows_rename_mapping() {
        let (chain, catalog) = sample_chain();
        let text = io_artifact(&chain, &catalog).unwrap().contents();
        assert!(text.contains(
            "pub fn upgrade_test_entity_b_v1_1_to_v1_2(prev: v1_1::TestEntityB) -> v1_2::TestEntityB {"
        ));
        assert!(text.contains("name2: prev.name,"));
        // Nothing was dropped in that rename.
        assert!(!text.contains("// dropped from v1_1"));
    }

    #[test]
    fn test_template_types_recovered_from_alias() {
        let template = ResolvedTemplate {
            name: "test_table".into(),
            rust_decl: "pub type test_table = ItemTable<ItemRef, TestItemA>;".into(),
            zero_keys_allowed: true,
        };
        assert_eq!(template_key_type(&template), "ItemRef");
        assert_eq!(template_item_type(&template), "TestItemA");
    }
}
