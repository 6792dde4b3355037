//! Type catalog
//!
//! Registers the base type families and their concrete variants, and derives
//! the per-variant metadata the generator consumes: representation type,
//! element count, stable numeric discriminant and the zero/inf/sup constant
//! triple. Declaration order is permanent: it fixes both the discriminants and
//! the emission order, and the discriminants are persisted in the wire format.
//! Reordering an existing registration is a wire-compatibility break.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};

/// Shape of a concrete variant, used to derive constant triples compositionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariantShape {
    Scalar,
    Vector { dim: usize },
    Matrix { dim: usize },
    Quaternion,
}

/// A concrete variant of a base type family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    /// Name used in generated identifiers (e.g. "Fvec3")
    pub implementing_type: String,
    /// Concrete Rust type expression (e.g. "[f32; 3]")
    pub rust_type: String,
    /// Underlying representation/element type name
    pub item_type: String,
    /// Number of elements per object (e.g. 3 for a 3-vector)
    pub num_items_per_object: usize,
    /// When set, the wire encoding is entirely delegated to `item_type`'s
    /// codec, with element-wise conversion at the boundary
    pub overrides_type: bool,
    pub shape: VariantShape,
}

impl Variant {
    pub fn scalar(name: &str) -> Self {
        Self {
            implementing_type: name.to_string(),
            rust_type: name.to_string(),
            item_type: name.to_string(),
            num_items_per_object: 1,
            overrides_type: false,
            shape: VariantShape::Scalar,
        }
    }

    pub fn named_scalar(name: &str, rust_type: &str) -> Self {
        Self {
            implementing_type: name.to_string(),
            rust_type: rust_type.to_string(),
            item_type: name.to_string(),
            num_items_per_object: 1,
            overrides_type: false,
            shape: VariantShape::Scalar,
        }
    }

    pub fn vector(name: &str, item_type: &str, dim: usize) -> Self {
        Self {
            implementing_type: name.to_string(),
            rust_type: format!("[{item_type}; {dim}]"),
            item_type: item_type.to_string(),
            num_items_per_object: dim,
            overrides_type: false,
            shape: VariantShape::Vector { dim },
        }
    }

    pub fn matrix(name: &str, item_type: &str, dim: usize) -> Self {
        Self {
            implementing_type: name.to_string(),
            rust_type: format!("[[{item_type}; {dim}]; {dim}]"),
            item_type: item_type.to_string(),
            num_items_per_object: dim * dim,
            overrides_type: false,
            shape: VariantShape::Matrix { dim },
        }
    }

    pub fn quaternion(name: &str, item_type: &str) -> Self {
        Self {
            implementing_type: name.to_string(),
            rust_type: format!("Quat<{item_type}>"),
            item_type: item_type.to_string(),
            num_items_per_object: 4,
            overrides_type: false,
            shape: VariantShape::Quaternion,
        }
    }

    /// A variant whose codec is delegated entirely to `item_type`.
    pub fn delegated(name: &str, rust_type: &str, item_type: &str) -> Self {
        Self {
            implementing_type: name.to_string(),
            rust_type: rust_type.to_string(),
            item_type: item_type.to_string(),
            num_items_per_object: 1,
            overrides_type: true,
            shape: VariantShape::Scalar,
        }
    }
}

/// A base type family: a name plus an ordered list of concrete variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseType {
    pub name: String,
    pub variants: Vec<Variant>,
}

impl BaseType {
    pub fn new(name: &str, variants: Vec<Variant>) -> Self {
        Self {
            name: name.to_string(),
            variants,
        }
    }
}

/// Zero / limit-inferior / limit-superior constant expressions for a variant.
/// `sup` is absent for unbounded types (strings).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstTriple {
    pub zero: String,
    pub inf: String,
    pub sup: Option<String>,
}

impl ConstTriple {
    fn bounded(zero: &str, inf: &str, sup: &str) -> Self {
        Self {
            zero: zero.to_string(),
            inf: inf.to_string(),
            sup: Some(sup.to_string()),
        }
    }

    fn unbounded(zero: &str, inf: &str) -> Self {
        Self {
            zero: zero.to_string(),
            inf: inf.to_string(),
            sup: None,
        }
    }

    /// Repeat this triple `n` times into an array expression. Vectors splat
    /// their scalar's triple; matrices splat the vector triple again.
    fn splat(&self, n: usize) -> Self {
        let repeat = |expr: &str| {
            let parts = vec![expr.to_string(); n];
            format!("[{}]", parts.join(", "))
        };
        Self {
            zero: repeat(&self.zero),
            inf: repeat(&self.inf),
            sup: self.sup.as_deref().map(repeat),
        }
    }
}

/// Derived metadata for one concrete variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeInfo {
    pub base_type: String,
    pub implementing_type: String,
    pub rust_type: String,
    pub item_type: String,
    pub num_items_per_object: usize,
    /// Stable wire discriminant: `((base_ordinal + 1) << 4) + (variant_ordinal + 1)`
    pub discriminant: u8,
    pub overrides_type: bool,
    pub shape: VariantShape,
    pub triple: ConstTriple,
}

/// The registered type catalog: base families in declaration order plus the
/// derived metadata table.
#[derive(Debug, Clone)]
pub struct TypeCatalog {
    base_types: Vec<BaseType>,
    infos: Vec<TypeInfo>,
    by_name: HashMap<String, usize>,
}

impl TypeCatalog {
    /// Register a list of base type families, deriving all metadata. Fails on
    /// duplicate discriminants or a delegating variant whose `item_type` is
    /// not itself registered earlier in declaration order.
    pub fn register(base_types: Vec<BaseType>) -> Result<Self> {
        let mut infos: Vec<TypeInfo> = Vec::new();
        let mut by_name: HashMap<String, usize> = HashMap::new();
        let mut by_discriminant: HashMap<u8, String> = HashMap::new();

        for (base_inx, base) in base_types.iter().enumerate() {
            for (variant_inx, variant) in base.variants.iter().enumerate() {
                let discriminant = (((base_inx + 1) << 4) + (variant_inx + 1)) as u8;
                if let Some(existing) = by_discriminant.get(&discriminant) {
                    return Err(SchemaError::DuplicateDiscriminant {
                        variant: variant.implementing_type.clone(),
                        existing: existing.clone(),
                        discriminant,
                    });
                }
                by_discriminant.insert(discriminant, variant.implementing_type.clone());

                // Delegating variants must reference an already-registered type.
                if variant.overrides_type && !by_name.contains_key(&variant.item_type) {
                    return Err(SchemaError::UndefinedItemType {
                        variant: variant.implementing_type.clone(),
                        item_type: variant.item_type.clone(),
                    });
                }

                let triple = derive_triple(variant, &infos, &by_name)?;
                let info = TypeInfo {
                    base_type: base.name.clone(),
                    implementing_type: variant.implementing_type.clone(),
                    rust_type: variant.rust_type.clone(),
                    item_type: variant.item_type.clone(),
                    num_items_per_object: variant.num_items_per_object,
                    discriminant,
                    overrides_type: variant.overrides_type,
                    shape: variant.shape,
                    triple,
                };
                by_name.insert(info.implementing_type.clone(), infos.len());
                infos.push(info);
            }
        }

        Ok(Self {
            base_types,
            infos,
            by_name,
        })
    }

    /// The full pds family set, in its permanent declaration order.
    pub fn builtin() -> Result<Self> {
        let scalar_vec = |family: &str, dim: usize| {
            let mut variants = Vec::new();
            for bits in [8, 16, 32, 64] {
                variants.push(Variant::vector(
                    &format!("I{bits}vec{dim}"),
                    &format!("i{bits}"),
                    dim,
                ));
            }
            for bits in [8, 16, 32, 64] {
                variants.push(Variant::vector(
                    &format!("U{bits}vec{dim}"),
                    &format!("u{bits}"),
                    dim,
                ));
            }
            variants.push(Variant::vector(&format!("Fvec{dim}"), "f32", dim));
            variants.push(Variant::vector(&format!("Dvec{dim}"), "f64", dim));
            BaseType::new(family, variants)
        };
        let matrix = |family: &str, dim: usize| {
            BaseType::new(
                family,
                vec![
                    Variant::matrix(&format!("Fmat{dim}"), "f32", dim),
                    Variant::matrix(&format!("Dmat{dim}"), "f64", dim),
                ],
            )
        };

        Self::register(vec![
            BaseType::new("bool", vec![Variant::scalar("bool")]),
            BaseType::new(
                "int",
                vec![
                    Variant::scalar("i8"),
                    Variant::scalar("i16"),
                    Variant::scalar("i32"),
                    Variant::scalar("i64"),
                ],
            ),
            BaseType::new(
                "uint",
                vec![
                    Variant::scalar("u8"),
                    Variant::scalar("u16"),
                    Variant::scalar("u32"),
                    Variant::scalar("u64"),
                ],
            ),
            BaseType::new(
                "float",
                vec![Variant::scalar("f32"), Variant::scalar("f64")],
            ),
            scalar_vec("vec2", 2),
            scalar_vec("vec3", 3),
            scalar_vec("vec4", 4),
            matrix("mat2", 2),
            matrix("mat3", 3),
            matrix("mat4", 4),
            BaseType::new(
                "quat",
                vec![
                    Variant::quaternion("Fquat", "f32"),
                    Variant::quaternion("Dquat", "f64"),
                ],
            ),
            BaseType::new(
                "uuid",
                vec![
                    Variant::named_scalar("Uuid", "Uuid"),
                    Variant::delegated("ItemRef", "ItemRef", "Uuid"),
                ],
            ),
            BaseType::new(
                "hash",
                vec![
                    Variant::named_scalar("Hash256", "Hash256"),
                    Variant::delegated("EntityRef", "EntityRef", "Hash256"),
                ],
            ),
            BaseType::new("string", vec![Variant::named_scalar("String", "String")]),
        ])
    }

    pub fn base_types(&self) -> &[BaseType] {
        &self.base_types
    }

    /// Variant metadata in declaration order.
    pub fn infos(&self) -> &[TypeInfo] {
        &self.infos
    }

    pub fn get(&self, implementing_type: &str) -> Option<&TypeInfo> {
        self.by_name.get(implementing_type).map(|&i| &self.infos[i])
    }

    pub fn contains(&self, implementing_type: &str) -> bool {
        self.by_name.contains_key(implementing_type)
    }
}

/// Leaf constant triples for the scalar and atomic types. Vector, matrix and
/// quaternion triples are derived from these by splatting.
fn leaf_triple(name: &str) -> Option<ConstTriple> {
    let t = match name {
        "bool" => ConstTriple::bounded("false", "false", "true"),
        "i8" | "i16" | "i32" | "i64" => {
            ConstTriple::bounded("0", &format!("{name}::MIN"), &format!("{name}::MAX"))
        }
        "u8" | "u16" | "u32" | "u64" => {
            ConstTriple::bounded("0", "0", &format!("{name}::MAX"))
        }
        "f32" | "f64" => {
            ConstTriple::bounded("0.0", &format!("{name}::MIN"), &format!("{name}::MAX"))
        }
        "String" => ConstTriple::unbounded("String::new()", "String::new()"),
        "Uuid" => ConstTriple::bounded("Uuid::nil()", "Uuid::nil()", "Uuid::max()"),
        "Hash256" => ConstTriple::bounded("Hash256::ZERO", "Hash256::ZERO", "Hash256::MAX"),
        _ => return None,
    };
    Some(t)
}

fn derive_triple(
    variant: &Variant,
    infos: &[TypeInfo],
    by_name: &HashMap<String, usize>,
) -> Result<ConstTriple> {
    if variant.overrides_type {
        // Delegated types convert the representation type's triple at the
        // boundary, the same way their codec does.
        let inner = by_name
            .get(&variant.item_type)
            .map(|&i| &infos[i])
            .ok_or_else(|| SchemaError::UndefinedItemType {
                variant: variant.implementing_type.clone(),
                item_type: variant.item_type.clone(),
            })?;
        let name = &variant.implementing_type;
        return Ok(ConstTriple {
            zero: format!("{name}({})", inner.triple.zero),
            inf: format!("{name}({})", inner.triple.inf),
            sup: inner.triple.sup.as_ref().map(|s| format!("{name}({s})")),
        });
    }

    let element = leaf_triple(&variant.item_type).ok_or_else(|| SchemaError::UndefinedItemType {
        variant: variant.implementing_type.clone(),
        item_type: variant.item_type.clone(),
    })?;

    Ok(match variant.shape {
        VariantShape::Scalar => element,
        VariantShape::Vector { dim } => element.splat(dim),
        VariantShape::Quaternion => {
            let inner = element.splat(4);
            ConstTriple {
                zero: format!("Quat({})", inner.zero),
                inf: format!("Quat({})", inner.inf),
                sup: inner.sup.map(|s| format!("Quat({s})")),
            }
        }
        // Matrix triples derive from the vector triple, recursively.
        VariantShape::Matrix { dim } => element.splat(dim).splat(dim),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_discriminants_unique() {
        let catalog = TypeCatalog::builtin().unwrap();
        let mut seen = HashSet::new();
        for info in catalog.infos() {
            assert!(
                seen.insert(info.discriminant),
                "duplicate discriminant {:#04x} for {}",
                info.discriminant,
                info.implementing_type
            );
        }
    }

    #[test]
    fn test_builtin_discriminants_stable() {
        let a = TypeCatalog::builtin().unwrap();
        let b = TypeCatalog::builtin().unwrap();
        for (x, y) in a.infos().iter().zip(b.infos()) {
            assert_eq!(x.implementing_type, y.implementing_type);
            assert_eq!(x.discriminant, y.discriminant);
        }
    }

    #[test]
    fn test_discriminant_formula() {
        let catalog = TypeCatalog::builtin().unwrap();
        // First family, first variant
        assert_eq!(catalog.get("bool").unwrap().discriminant, 0x11);
        // Second family ("int"), third variant
        assert_eq!(catalog.get("i32").unwrap().discriminant, 0x23);
    }

    #[test]
    fn test_vector_triple_splats_scalar() {
        let catalog = TypeCatalog::builtin().unwrap();
        let info = catalog.get("Fvec3").unwrap();
        assert_eq!(info.triple.zero, "[0.0, 0.0, 0.0]");
        assert_eq!(info.triple.inf, "[f32::MIN, f32::MIN, f32::MIN]");
    }

    #[test]
    fn test_vector_families_cover_all_integer_widths() {
        let catalog = TypeCatalog::builtin().unwrap();
        for dim in [2, 3, 4] {
            for bits in [8, 16, 32, 64] {
                let signed = catalog.get(&format!("I{bits}vec{dim}")).unwrap();
                assert_eq!(signed.rust_type, format!("[i{bits}; {dim}]"));
                let unsigned = catalog.get(&format!("U{bits}vec{dim}")).unwrap();
                assert_eq!(unsigned.rust_type, format!("[u{bits}; {dim}]"));
            }
        }
        // Float vectors sit after the eight integer variants of each family.
        assert_eq!(catalog.get("Fvec3").unwrap().discriminant, 0x69);
        assert_eq!(catalog.get("Dvec4").unwrap().discriminant, 0x7A);
    }

    #[test]
    fn test_matrix_triple_derives_from_vector() {
        let catalog = TypeCatalog::builtin().unwrap();
        let info = catalog.get("Fmat2").unwrap();
        assert_eq!(info.triple.zero, "[[0.0, 0.0], [0.0, 0.0]]");
        assert_eq!(info.num_items_per_object, 4);
    }

    #[test]
    fn test_string_has_no_sup() {
        let catalog = TypeCatalog::builtin().unwrap();
        assert!(catalog.get("String").unwrap().triple.sup.is_none());
    }

    #[test]
    fn test_delegated_variant_references_item_type() {
        let catalog = TypeCatalog::builtin().unwrap();
        let info = catalog.get("EntityRef").unwrap();
        assert!(info.overrides_type);
        assert_eq!(info.item_type, "Hash256");
        assert_eq!(info.triple.zero, "EntityRef(Hash256::ZERO)");
    }

    #[test]
    fn test_duplicate_discriminant_rejected() {
        // A family with more than 16 variants wraps into the next family's
        // discriminant space: family 0 variant 16 and family 1 variant 0 both
        // yield 0x21.
        let variants: Vec<Variant> = (0..17)
            .map(|i| Variant::vector(&format!("T{i}"), "i32", 1))
            .collect();
        let result = TypeCatalog::register(vec![
            BaseType::new("wide", variants),
            BaseType::new("next", vec![Variant::vector("Clash", "i32", 1)]),
        ]);
        match result {
            Err(SchemaError::DuplicateDiscriminant { discriminant, .. }) => {
                assert_eq!(discriminant, 0x21)
            }
            other => panic!("expected DuplicateDiscriminant, got {other:?}"),
        }
    }

    #[test]
    fn test_delegation_to_unknown_type_rejected() {
        let result = TypeCatalog::register(vec![BaseType::new(
            "broken",
            vec![Variant::delegated("Ref", "Ref", "Missing")],
        )]);
        match result {
            Err(SchemaError::UndefinedItemType { item_type, .. }) => {
                assert_eq!(item_type, "Missing")
            }
            other => panic!("expected UndefinedItemType, got {other:?}"),
        }
    }
}
