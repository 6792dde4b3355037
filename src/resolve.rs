//! Version resolution
//!
//! Folds a package's version chain into one fully resolved definition set per
//! version, plus the migration plan carrying each modified definition from its
//! previous shape. The fold is non-mutating: earlier snapshots are never
//! rewritten, and an `Identical` delta shares its previous snapshot's
//! definition structure instead of copying it.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use petgraph::algo::kosaraju_scc;
use petgraph::graph::DiGraph;
use tracing::debug;

use crate::catalog::TypeCatalog;
use crate::error::{Result, SchemaError};
use crate::model::{
    Definition, Delta, Dependency, MigrationMapping, Package, Template, TemplateFlag, Version,
};

/// Forward-declare-vs-include decision for a dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeStyle {
    Include,
    ForwardDeclare,
}

#[derive(Debug, Clone)]
pub struct ResolvedDependency {
    pub name: String,
    pub style: IncludeStyle,
}

/// A template instantiated into a concrete container definition.
#[derive(Debug, Clone)]
pub struct ResolvedTemplate {
    pub name: String,
    pub rust_decl: String,
    /// Whether the container treats the zero key as a valid sentinel
    pub zero_keys_allowed: bool,
}

/// Where a variable of a modified definition takes its value from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSource {
    /// Transcribed from the named variable of the previous version
    Copied { from: String },
    /// Not present before; takes the type's default
    Defaulted,
}

/// Explicit old-to-new field transcription plan for a `Modified` delta. This
/// is what upgrade-code generation consumes.
#[derive(Debug, Clone)]
pub struct TranscriptionPlan {
    /// One entry per variable of the new shape, in declaration order
    pub fields: Vec<(String, FieldSource)>,
    /// Variables of the old shape with no destination; their values drop
    pub dropped: Vec<String>,
}

/// How a definition arrived in a resolved version.
#[derive(Debug, Clone)]
pub enum Provenance {
    New,
    Identical,
    Modified { plan: TranscriptionPlan },
}

/// One definition, frozen for one version.
#[derive(Debug)]
pub struct ResolvedDefinition {
    pub definition: Definition,
    pub dependencies: Vec<ResolvedDependency>,
    pub templates: Vec<ResolvedTemplate>,
}

#[derive(Debug, Clone)]
pub struct ResolvedEntry {
    /// Shared with the previous snapshot when the delta was `Identical`
    pub definition: Arc<ResolvedDefinition>,
    pub provenance: Provenance,
}

/// The fully materialized definition set for one version.
#[derive(Debug, Clone)]
pub struct ResolvedVersion {
    pub name: String,
    /// Entries in first-appearance order; the order is emission order
    pub entries: Vec<ResolvedEntry>,
}

impl ResolvedVersion {
    pub fn get(&self, name: &str) -> Option<&ResolvedEntry> {
        self.entries
            .iter()
            .find(|e| e.definition.definition.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .map(|e| e.definition.definition.name.as_str())
    }
}

/// The resolved chain: one immutable snapshot per version, in chain order.
#[derive(Debug, Clone)]
pub struct ResolvedChain {
    pub package: String,
    pub versions: Vec<ResolvedVersion>,
}

impl ResolvedChain {
    pub fn latest(&self) -> &ResolvedVersion {
        // resolve() rejects empty packages, so the chain is never empty
        &self.versions[self.versions.len() - 1]
    }

    pub fn version(&self, name: &str) -> Option<&ResolvedVersion> {
        self.versions.iter().find(|v| v.name == name)
    }
}

/// Resolve a package's version chain against a type catalog.
pub fn resolve(package: &Package, catalog: &TypeCatalog) -> Result<ResolvedChain> {
    if package.versions.is_empty() {
        return Err(SchemaError::EmptyPackage {
            package: package.name.clone(),
        });
    }

    let mut versions: Vec<ResolvedVersion> = Vec::with_capacity(package.versions.len());

    for (inx, version) in package.versions.iter().enumerate() {
        check_chain_link(version, inx, package)?;
        let resolved = resolve_version(version, versions.last(), catalog)?;
        debug!(
            version = %resolved.name,
            definitions = resolved.entries.len(),
            "resolved version"
        );
        versions.push(resolved);
    }

    Ok(ResolvedChain {
        package: package.name.clone(),
        versions,
    })
}

fn check_chain_link(version: &Version, inx: usize, package: &Package) -> Result<()> {
    let expected = if inx == 0 {
        None
    } else {
        Some(package.versions[inx - 1].name.as_str())
    };
    if version.previous.as_deref() != expected {
        return Err(SchemaError::BrokenChain {
            version: version.name.clone(),
            declared: version.previous.clone().unwrap_or_else(|| "<none>".into()),
            actual: expected.unwrap_or("<none>").to_string(),
        });
    }
    Ok(())
}

fn resolve_version(
    version: &Version,
    previous: Option<&ResolvedVersion>,
    catalog: &TypeCatalog,
) -> Result<ResolvedVersion> {
    let mut entries: Vec<ResolvedEntry> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    let mut deltas_by_name: HashMap<&str, &Delta> = HashMap::new();
    for delta in &version.deltas {
        if !seen.insert(delta.name()) {
            return Err(SchemaError::DuplicateDelta {
                version: version.name.clone(),
                name: delta.name().to_string(),
            });
        }
        deltas_by_name.insert(delta.name(), delta);
    }

    // Keep the previous version's order for carried definitions, then append
    // new ones in delta order, so emission order stays stable across versions.
    // Every previously known definition must be accounted for by exactly one
    // delta; this is how schema drift is caught early.
    let mut prev_names: HashSet<&str> = HashSet::new();
    if let Some(prev) = previous {
        for prev_entry in &prev.entries {
            let name = prev_entry.definition.definition.name.as_str();
            prev_names.insert(name);
            let delta = deltas_by_name.get(name).ok_or_else(|| {
                SchemaError::UnaccountedDefinition {
                    version: version.name.clone(),
                    name: name.to_string(),
                }
            })?;
            entries.push(apply_carried_delta(version, delta, prev_entry, catalog)?);
        }
    }

    for delta in &version.deltas {
        if prev_names.contains(delta.name()) {
            continue;
        }
        match delta {
            Delta::New { definition } => {
                entries.push(ResolvedEntry {
                    definition: Arc::new(freeze(version, definition, catalog)?),
                    provenance: Provenance::New,
                });
            }
            Delta::Identical { name } => {
                return Err(SchemaError::UnknownPrevious {
                    version: version.name.clone(),
                    name: name.clone(),
                    kind: "Identical",
                });
            }
            Delta::Modified { definition, .. } => {
                return Err(SchemaError::UnknownPrevious {
                    version: version.name.clone(),
                    name: definition.name.clone(),
                    kind: "Modified",
                });
            }
        }
    }

    let resolved = ResolvedVersion {
        name: version.name.clone(),
        entries,
    };
    check_dependencies(version, &resolved)?;
    Ok(resolved)
}

/// Apply a delta that targets a definition known to the previous version.
fn apply_carried_delta(
    version: &Version,
    delta: &Delta,
    prev: &ResolvedEntry,
    catalog: &TypeCatalog,
) -> Result<ResolvedEntry> {
    match delta {
        Delta::New { definition } => Err(SchemaError::NewAlreadyExists {
            version: version.name.clone(),
            name: definition.name.clone(),
        }),
        Delta::Identical { .. } => Ok(ResolvedEntry {
            // Shares the previous snapshot's structure; never copies it.
            definition: Arc::clone(&prev.definition),
            provenance: Provenance::Identical,
        }),
        Delta::Modified {
            definition,
            mappings,
        } => {
            let plan = build_plan(version, &prev.definition.definition, definition, mappings)?;
            Ok(ResolvedEntry {
                definition: Arc::new(freeze(version, definition, catalog)?),
                provenance: Provenance::Modified { plan },
            })
        }
    }
}

/// Build the explicit old-to-new transcription plan for a modified definition.
fn build_plan(
    version: &Version,
    old: &Definition,
    new: &Definition,
    mappings: &[MigrationMapping],
) -> Result<TranscriptionPlan> {
    let mut renamed_to: HashMap<&str, &str> = HashMap::new();
    for mapping in mappings {
        let MigrationMapping::Rename { to, from } = mapping;
        if new.variable(to).is_none() {
            return Err(SchemaError::UnknownMappingVariable {
                version: version.name.clone(),
                definition: new.name.clone(),
                side: "destination",
                variable: to.clone(),
            });
        }
        if old.variable(from).is_none() {
            return Err(SchemaError::UnknownMappingVariable {
                version: version.name.clone(),
                definition: new.name.clone(),
                side: "source",
                variable: from.clone(),
            });
        }
        renamed_to.insert(to.as_str(), from.as_str());
    }

    let mut copied_from: HashSet<&str> = HashSet::new();
    let mut fields = Vec::with_capacity(new.variables.len());
    for variable in &new.variables {
        let source = if let Some(&from) = renamed_to.get(variable.name.as_str()) {
            copied_from.insert(from);
            FieldSource::Copied { from: from.into() }
        } else if old.variable(&variable.name).is_some() {
            copied_from.insert(variable.name.as_str());
            FieldSource::Copied {
                from: variable.name.clone(),
            }
        } else {
            // Unmapped added variable takes a default.
            FieldSource::Defaulted
        };
        fields.push((variable.name.clone(), source));
    }

    // Unmapped removed variables are dropped.
    let dropped = old
        .variables
        .iter()
        .filter(|v| !copied_from.contains(v.name.as_str()))
        .map(|v| v.name.clone())
        .collect();

    Ok(TranscriptionPlan { fields, dropped })
}

/// Freeze a definition: resolve include styles, instantiate templates and
/// check every variable type.
fn freeze(
    version: &Version,
    definition: &Definition,
    catalog: &TypeCatalog,
) -> Result<ResolvedDefinition> {
    let dependencies = definition
        .dependencies
        .iter()
        .map(|d| resolve_dependency(d))
        .collect();

    let templates = definition
        .templates
        .iter()
        .map(|t| instantiate_template(version, definition, t, catalog))
        .collect::<Result<Vec<_>>>()?;

    for variable in &definition.variables {
        let is_template = definition.templates.iter().any(|t| t.name == variable.type_name);
        let is_definition = definition
            .dependencies
            .iter()
            .any(|d| d.name == variable.type_name);
        if !is_template && !is_definition && !catalog.contains(&variable.type_name) {
            return Err(SchemaError::UnknownType {
                definition: definition.name.clone(),
                variable: variable.name.clone(),
                type_name: variable.type_name.clone(),
            });
        }
    }

    Ok(ResolvedDefinition {
        definition: definition.clone(),
        dependencies,
        templates,
    })
}

fn resolve_dependency(dependency: &Dependency) -> ResolvedDependency {
    ResolvedDependency {
        name: dependency.name.clone(),
        style: if dependency.include_in_header {
            IncludeStyle::Include
        } else {
            IncludeStyle::ForwardDeclare
        },
    }
}

fn instantiate_template(
    version: &Version,
    definition: &Definition,
    template: &Template,
    catalog: &TypeCatalog,
) -> Result<ResolvedTemplate> {
    let expected = template.kind.arity();
    if template.types.len() != expected {
        return Err(SchemaError::TemplateArity {
            version: version.name.clone(),
            definition: definition.name.clone(),
            template: template.name.clone(),
            expected,
            actual: template.types.len(),
        });
    }
    for type_name in &template.types {
        let is_dependency = definition.dependencies.iter().any(|d| &d.name == type_name);
        if !is_dependency && !catalog.contains(type_name) {
            return Err(SchemaError::UnknownTemplateArgument {
                version: version.name.clone(),
                definition: definition.name.clone(),
                template: template.name.clone(),
                type_name: type_name.clone(),
            });
        }
    }
    let rust_decl = format!(
        "pub type {} = {}<{}>;",
        template.name,
        template.kind.rust_name(),
        template.types.join(", ")
    );
    Ok(ResolvedTemplate {
        name: template.name.clone(),
        rust_decl,
        zero_keys_allowed: template.flags.contains(&TemplateFlag::ZeroKeys),
    })
}

/// Dependency-name resolution and cycle detection over one resolved set.
fn check_dependencies(version: &Version, resolved: &ResolvedVersion) -> Result<()> {
    let names: HashSet<&str> = resolved.names().collect();
    for entry in &resolved.entries {
        for dep in &entry.definition.dependencies {
            if !names.contains(dep.name.as_str()) {
                return Err(SchemaError::UnresolvedDependency {
                    version: version.name.clone(),
                    definition: entry.definition.definition.name.clone(),
                    dependency: dep.name.clone(),
                });
            }
        }
    }

    let mut graph: DiGraph<&str, ()> = DiGraph::new();
    let mut nodes = HashMap::new();
    for entry in &resolved.entries {
        let name = entry.definition.definition.name.as_str();
        nodes.insert(name, graph.add_node(name));
    }
    for entry in &resolved.entries {
        let from = nodes[entry.definition.definition.name.as_str()];
        for dep in &entry.definition.dependencies {
            graph.add_edge(from, nodes[dep.name.as_str()], ());
        }
    }

    for scc in kosaraju_scc(&graph) {
        let cyclic = scc.len() > 1
            || (scc.len() == 1 && graph.contains_edge(scc[0], scc[0]));
        if cyclic {
            let mut members: Vec<String> =
                scc.iter().map(|&n| graph[n].to_string()).collect();
            members.sort();
            return Err(SchemaError::DependencyCycle {
                version: version.name.clone(),
                members,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Variable;

    fn catalog() -> TypeCatalog {
        TypeCatalog::builtin().unwrap()
    }

    fn single_version_package(deltas: Vec<Delta>) -> Package {
        Package::new("TestPack", "out", vec![Version::root("v1_0", deltas)])
    }

    #[test]
    fn test_root_resolves_new_definitions() {
        let package = single_version_package(vec![Delta::New {
            definition: Definition::item("ItemA")
                .with_variables(vec![Variable::new("String", "Name")]),
        }]);
        let chain = resolve(&package, &catalog()).unwrap();
        assert_eq!(chain.latest().entries.len(), 1);
        assert!(chain.latest().get("ItemA").is_some());
    }

    #[test]
    fn test_unknown_variable_type_rejected() {
        let package = single_version_package(vec![Delta::New {
            definition: Definition::item("ItemA")
                .with_variables(vec![Variable::new("NotAType", "Name")]),
        }]);
        match resolve(&package, &catalog()) {
            Err(SchemaError::UnknownType { type_name, .. }) => {
                assert_eq!(type_name, "NotAType")
            }
            other => panic!("expected UnknownType, got {other:?}"),
        }
    }

    #[test]
    fn test_identical_without_previous_rejected() {
        let package = single_version_package(vec![Delta::Identical {
            name: "Ghost".to_string(),
        }]);
        assert!(matches!(
            resolve(&package, &catalog()),
            Err(SchemaError::UnknownPrevious { kind: "Identical", .. })
        ));
    }

    #[test]
    fn test_unaccounted_definition_rejected() {
        let package = Package::new(
            "TestPack",
            "out",
            vec![
                Version::root(
                    "v1_0",
                    vec![Delta::New {
                        definition: Definition::item("ItemA")
                            .with_variables(vec![Variable::new("String", "Name")]),
                    }],
                ),
                // v1_1 forgets to account for ItemA
                Version::next("v1_1", "v1_0", vec![]),
            ],
        );
        assert!(matches!(
            resolve(&package, &catalog()),
            Err(SchemaError::UnaccountedDefinition { .. })
        ));
    }

    #[test]
    fn test_duplicate_delta_rejected() {
        let package = Package::new(
            "TestPack",
            "out",
            vec![
                Version::root(
                    "v1_0",
                    vec![Delta::New {
                        definition: Definition::item("ItemA")
                            .with_variables(vec![Variable::new("String", "Name")]),
                    }],
                ),
                Version::next(
                    "v1_1",
                    "v1_0",
                    vec![
                        Delta::Identical { name: "ItemA".into() },
                        Delta::Identical { name: "ItemA".into() },
                    ],
                ),
            ],
        );
        assert!(matches!(
            resolve(&package, &catalog()),
            Err(SchemaError::DuplicateDelta { .. })
        ));
    }

    #[test]
    fn test_mutual_dependency_rejected() {
        let package = single_version_package(vec![
            Delta::New {
                definition: Definition::entity("A")
                    .with_dependencies(vec![Dependency::new("B", true)])
                    .with_variables(vec![Variable::new("String", "Name")]),
            },
            Delta::New {
                definition: Definition::entity("B")
                    .with_dependencies(vec![Dependency::new("A", true)])
                    .with_variables(vec![Variable::new("String", "Name")]),
            },
        ]);
        match resolve(&package, &catalog()) {
            Err(SchemaError::DependencyCycle { members, .. }) => {
                assert_eq!(members, vec!["A".to_string(), "B".to_string()])
            }
            other => panic!("expected DependencyCycle, got {other:?}"),
        }
    }

    #[test]
    fn test_self_dependency_rejected() {
        let package = single_version_package(vec![Delta::New {
            definition: Definition::entity("A")
                .with_dependencies(vec![Dependency::new("A", true)])
                .with_variables(vec![Variable::new("String", "Name")]),
        }]);
        assert!(matches!(
            resolve(&package, &catalog()),
            Err(SchemaError::DependencyCycle { .. })
        ));
    }

    #[test]
    fn test_broken_chain_rejected() {
        let package = Package::new(
            "TestPack",
            "out",
            vec![
                Version::root("v1_0", vec![]),
                Version::next("v1_1", "v0_9", vec![]),
            ],
        );
        assert!(matches!(
            resolve(&package, &catalog()),
            Err(SchemaError::BrokenChain { .. })
        ));
    }

    #[test]
    fn test_template_arity_checked() {
        let package = single_version_package(vec![Delta::New {
            definition: Definition::entity("A")
                .with_templates(vec![Template::new(
                    "bad_table",
                    crate::model::TemplateKind::ItemTable,
                    vec!["ItemRef"],
                )])
                .with_variables(vec![Variable::new("bad_table", "Table")]),
        }]);
        assert!(matches!(
            resolve(&package, &catalog()),
            Err(SchemaError::TemplateArity { expected: 2, actual: 1, .. })
        ));
    }

    #[test]
    fn test_template_arguments_must_name_known_types() {
        // Right arity, but the item argument is neither a base type nor a
        // declared dependency.
        let package = single_version_package(vec![Delta::New {
            definition: Definition::entity("A")
                .with_templates(vec![Template::new(
                    "bad_table",
                    crate::model::TemplateKind::ItemTable,
                    vec!["ItemRef", "NoSuchItem"],
                )])
                .with_variables(vec![Variable::new("bad_table", "Table")]),
        }]);
        match resolve(&package, &catalog()) {
            Err(SchemaError::UnknownTemplateArgument { type_name, template, .. }) => {
                assert_eq!(type_name, "NoSuchItem");
                assert_eq!(template, "bad_table");
            }
            other => panic!("expected unknown template argument, got {other:?}"),
        }
    }
}
