//! In-memory schema model
//!
//! Pure data: a `Package` is an ordered chain of `Version`s, each holding
//! entity/item deltas built from variables, dependencies and template
//! instantiations. Nothing here validates anything — the resolver owns all
//! invariant checking.

use serde::{Deserialize, Serialize};

/// Whether a definition is an entity (content-hash identity, referenced via
/// `EntityRef`) or an item (lighter `ItemRef` identity, typically a table
/// element).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefKind {
    Entity,
    Item,
}

impl DefKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefKind::Entity => "entity",
            DefKind::Item => "item",
        }
    }
}

/// One field of a definition. `optional` means the value may be entirely
/// absent from the wire data, which is distinct from present-but-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub type_name: String,
    pub name: String,
    #[serde(default)]
    pub optional: bool,
}

impl Variable {
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
            optional: false,
        }
    }

    pub fn optional(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
            optional: true,
        }
    }
}

/// Reference to another definition. `include_in_header` controls whether
/// generated code gets a full include or a forward declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub name: String,
    #[serde(default)]
    pub include_in_header: bool,
}

impl Dependency {
    pub fn new(name: impl Into<String>, include_in_header: bool) -> Self {
        Self {
            name: name.into(),
            include_in_header,
        }
    }
}

/// The closed set of container templates a definition may instantiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    /// Keyed table of items: two type arguments, key then value.
    ItemTable,
}

impl TemplateKind {
    pub fn arity(&self) -> usize {
        match self {
            TemplateKind::ItemTable => 2,
        }
    }

    pub fn rust_name(&self) -> &'static str {
        match self {
            TemplateKind::ItemTable => "ItemTable",
        }
    }
}

/// Behavior flags on a template instantiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateFlag {
    /// The table's zero key is a valid sentinel rather than an error.
    ZeroKeys,
}

/// A named container instantiation, e.g. a keyed table of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Local type name this instantiation is bound to
    pub name: String,
    pub kind: TemplateKind,
    /// Type arguments, in template parameter order
    pub types: Vec<String>,
    #[serde(default)]
    pub flags: Vec<TemplateFlag>,
}

impl Template {
    pub fn new(name: impl Into<String>, kind: TemplateKind, types: Vec<&str>) -> Self {
        Self {
            name: name.into(),
            kind,
            types: types.into_iter().map(String::from).collect(),
            flags: Vec::new(),
        }
    }

    pub fn with_flags(mut self, flags: Vec<TemplateFlag>) -> Self {
        self.flags = flags;
        self
    }
}

/// How a modified definition's new variable derives from the previous
/// version's resolved variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum MigrationMapping {
    /// The new variable `to` takes its value from the old variable `from`.
    Rename { to: String, from: String },
}

/// A full entity/item definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    pub name: String,
    pub kind: DefKind,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
    #[serde(default)]
    pub templates: Vec<Template>,
    pub variables: Vec<Variable>,
}

impl Definition {
    pub fn entity(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DefKind::Entity,
            dependencies: Vec::new(),
            templates: Vec::new(),
            variables: Vec::new(),
        }
    }

    pub fn item(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DefKind::Item,
            dependencies: Vec::new(),
            templates: Vec::new(),
            variables: Vec::new(),
        }
    }

    pub fn with_dependencies(mut self, dependencies: Vec<Dependency>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn with_templates(mut self, templates: Vec<Template>) -> Self {
        self.templates = templates;
        self
    }

    pub fn with_variables(mut self, variables: Vec<Variable>) -> Self {
        self.variables = variables;
        self
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }
}

/// A per-version delta for one definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "delta", rename_all = "snake_case")]
pub enum Delta {
    /// A definition absent from the previous version.
    New { definition: Definition },
    /// The previous version's definition carries forward unchanged.
    Identical { name: String },
    /// A changed definition plus the mappings deriving it from the previous
    /// version's resolved variables.
    Modified {
        definition: Definition,
        #[serde(default)]
        mappings: Vec<MigrationMapping>,
    },
}

impl Delta {
    /// Name of the definition this delta targets.
    pub fn name(&self) -> &str {
        match self {
            Delta::New { definition } => &definition.name,
            Delta::Identical { name } => name,
            Delta::Modified { definition, .. } => &definition.name,
        }
    }
}

/// One version in the chain. `previous` is `None` only for the chain root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Version {
    pub name: String,
    pub previous: Option<String>,
    pub deltas: Vec<Delta>,
}

impl Version {
    pub fn root(name: impl Into<String>, deltas: Vec<Delta>) -> Self {
        Self {
            name: name.into(),
            previous: None,
            deltas,
        }
    }

    pub fn next(
        name: impl Into<String>,
        previous: impl Into<String>,
        deltas: Vec<Delta>,
    ) -> Self {
        Self {
            name: name.into(),
            previous: Some(previous.into()),
            deltas,
        }
    }
}

/// A package: a name, an output target and a strictly linear version chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    /// Output directory the emitter writes artifacts under
    pub output: String,
    pub versions: Vec<Version>,
}

impl Package {
    pub fn new(name: impl Into<String>, output: impl Into<String>, versions: Vec<Version>) -> Self {
        Self {
            name: name.into(),
            output: output.into(),
            versions,
        }
    }

    pub fn latest(&self) -> Option<&Version> {
        self.versions.last()
    }
}
