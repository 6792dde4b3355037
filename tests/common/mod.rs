//! Shared fixture: a three-version package exercising every delta kind.

use packwright::model::{
    Definition, Delta, Dependency, MigrationMapping, Package, Template, TemplateFlag, TemplateKind,
    Variable, Version,
};

/// v1_0 declares an item and an entity holding a keyed table of it; v1_1 adds
/// a second entity; v1_2 renames that entity's variable through a mapping.
pub fn sample_package() -> Package {
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
    let entity_b_renamed =
        Definition::entity("TestEntityB").with_variables(vec![Variable::new("String", "Name2")]);

    Package::new(
        "TestPackA",
        "generated",
        vec![
            Version::root(
                "v1_0",
                vec![
                    Delta::New { definition: item_a },
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
                        definition: entity_b_renamed,
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
