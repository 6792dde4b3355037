//! Type matrix emission
//!
//! Emits the catalog unit: a `DataType` discriminant enum with the limit
//! constants of every concrete variant, and the operation matrix of six
//! read/write pairs per variant (value, optional value, sequence, optional
//! sequence, indexed sequence, optional indexed sequence). Ordinary variants
//! delegate to the generic runtime operations; delegating variants wrap their
//! representation type's operations and convert at the boundary.

use crate::catalog::{TypeCatalog, TypeInfo};
use crate::emit::{banner, Artifact};

use super::{camel_case, snake_case};

/// The declaration artifact of the catalog unit: discriminants and limits.
pub fn data_types_artifact(catalog: &TypeCatalog, package: &str) -> Artifact {
    let mut a = Artifact::new("data_types.rs");
    a.extend(banner(package));
    a.push("use packwright::wire::{EntityRef, Hash256, ItemRef, Quat};");
    a.push("use uuid::Uuid;");
    a.blank();

    a.push("/// Wire discriminant of every concrete data type, in registration order.");
    a.push("#[derive(Debug, Clone, Copy, PartialEq, Eq)]");
    a.push("#[repr(u8)]");
    a.push("pub enum DataType {");
    for info in catalog.infos() {
        a.push(format!(
            "    {} = 0x{:02X},",
            camel_case(&info.implementing_type),
            info.discriminant
        ));
    }
    a.push("}");
    a.blank();

    a.push("impl DataType {");
    a.push("    pub const fn discriminant(self) -> u8 {");
    a.push("        self as u8");
    a.push("    }");
    a.blank();
    a.push("    pub const fn from_discriminant(value: u8) -> Option<Self> {");
    a.push("        match value {");
    for info in catalog.infos() {
        a.push(format!(
            "            0x{:02X} => Some(Self::{}),",
            info.discriminant,
            camel_case(&info.implementing_type)
        ));
    }
    a.push("            _ => None,");
    a.push("        }");
    a.push("    }");
    a.push("}");
    a.blank();

    a.push("/// Zero and limit constants per data type. `SUP` is omitted for");
    a.push("/// unbounded types.");
    a.push("pub mod limits {");
    a.push("    use super::*;");
    for info in catalog.infos() {
        let prefix = snake_case(&info.implementing_type).to_uppercase();
        a.blank();
        a.push(format!(
            "    pub const {prefix}_ZERO: {} = {};",
            info.rust_type, info.triple.zero
        ));
        a.push(format!(
            "    pub const {prefix}_INF: {} = {};",
            info.rust_type, info.triple.inf
        ));
        if let Some(sup) = &info.triple.sup {
            a.push(format!(
                "    pub const {prefix}_SUP: {} = {sup};",
                info.rust_type
            ));
        }
    }
    a.push("}");
    a
}

/// The implementation artifact of the catalog unit: the operation matrix.
pub fn value_ops_artifact(catalog: &TypeCatalog, package: &str) -> Artifact {
    let mut a = Artifact::new("value_ops.rs");
    a.extend(banner(package));
    a.push("#![allow(clippy::ptr_arg)]");
    a.blank();
    a.push("use packwright::wire::{EntityReader, EntityWriter, IdxVec, ReadStatus};");
    a.push("use packwright::wire::{EntityRef, Hash256, ItemRef, Quat};");
    a.push("use uuid::Uuid;");

    for info in catalog.infos() {
        a.blank();
        a.push(format!(
            "// --- {} (0x{:02X}) ---",
            info.implementing_type, info.discriminant
        ));
        a.blank();
        if info.overrides_type {
            delegated_ops(&mut a, info);
        } else {
            direct_ops(&mut a, info);
        }
    }
    a
}

/// Six read and six write operations delegating straight to the runtime.
fn direct_ops(a: &mut Artifact, info: &TypeInfo) {
    let name = snake_case(&info.implementing_type);
    let ty = &info.rust_type;

    for (suffix, dest) in [
        ("", format!("&mut {ty}")),
        ("_opt", format!("&mut Option<{ty}>")),
        ("_vec", format!("&mut Vec<{ty}>")),
        ("_vec_opt", format!("&mut Option<Vec<{ty}>>")),
        ("_idx_vec", format!("&mut IdxVec<{ty}>")),
        ("_idx_vec_opt", format!("&mut Option<IdxVec<{ty}>>")),
    ] {
        let method = match suffix {
            "" => "read_value",
            "_opt" => "read_optional_value",
            "_vec" => "read_array",
            "_vec_opt" => "read_optional_array",
            "_idx_vec" => "read_idx_array",
            _ => "read_optional_idx_array",
        };
        a.push(format!(
            "pub fn read_{name}{suffix}(reader: &mut EntityReader<'_>, key: &str, dest: {dest}) -> ReadStatus {{"
        ));
        a.push(format!("    reader.{method}(key, dest)"));
        a.push("}");
        a.blank();
    }

    a.push(format!(
        "pub fn write_{name}(writer: &mut EntityWriter, key: &str, value: &{ty}) {{"
    ));
    a.push("    writer.write_value(key, value);");
    a.push("}");
    a.blank();
    a.push(format!(
        "pub fn write_{name}_opt(writer: &mut EntityWriter, key: &str, value: Option<&{ty}>) {{"
    ));
    a.push("    writer.write_optional_value(key, value);");
    a.push("}");
    a.blank();
    a.push(format!(
        "pub fn write_{name}_vec(writer: &mut EntityWriter, key: &str, values: &[{ty}]) {{"
    ));
    a.push("    writer.write_array(key, values);");
    a.push("}");
    a.blank();
    a.push(format!(
        "pub fn write_{name}_vec_opt(writer: &mut EntityWriter, key: &str, values: Option<&[{ty}]>) {{"
    ));
    a.push("    writer.write_optional_array(key, values);");
    a.push("}");
    a.blank();
    a.push(format!(
        "pub fn write_{name}_idx_vec(writer: &mut EntityWriter, key: &str, value: &IdxVec<{ty}>) -> bool {{"
    ));
    a.push("    writer.write_idx_array(key, value)");
    a.push("}");
    a.blank();
    a.push(format!(
        "pub fn write_{name}_idx_vec_opt(writer: &mut EntityWriter, key: &str, value: Option<&IdxVec<{ty}>>) -> bool {{"
    ));
    a.push("    writer.write_optional_idx_array(key, value)");
    a.push("}");
}

/// Operations for a delegating variant: call the representation type's
/// operations and convert element-wise at the boundary. The wire bytes are
/// identical to the representation type's.
fn delegated_ops(a: &mut Artifact, info: &TypeInfo) {
    let name = snake_case(&info.implementing_type);
    let inner = snake_case(&info.item_type);
    let ty = &info.rust_type;
    let inner_ty = &info.item_type;

    a.push(format!(
        "pub fn read_{name}(reader: &mut EntityReader<'_>, key: &str, dest: &mut {ty}) -> ReadStatus {{"
    ));
    a.push(format!("    let mut raw = {inner_ty}::default();"));
    a.push(format!("    let status = read_{inner}(reader, key, &mut raw);"));
    a.push("    if status.did_not_fail() {");
    a.push(format!("        *dest = {ty}::from(raw);"));
    a.push("    }");
    a.push("    status");
    a.push("}");
    a.blank();

    a.push(format!(
        "pub fn read_{name}_opt(reader: &mut EntityReader<'_>, key: &str, dest: &mut Option<{ty}>) -> ReadStatus {{"
    ));
    a.push("    let mut raw = None;");
    a.push(format!(
        "    let status = read_{inner}_opt(reader, key, &mut raw);"
    ));
    a.push("    if status.did_not_fail() {");
    a.push(format!("        *dest = raw.map({ty}::from);"));
    a.push("    }");
    a.push("    status");
    a.push("}");
    a.blank();

    a.push(format!(
        "pub fn read_{name}_vec(reader: &mut EntityReader<'_>, key: &str, dest: &mut Vec<{ty}>) -> ReadStatus {{"
    ));
    a.push("    let mut raw = Vec::new();");
    a.push(format!(
        "    let status = read_{inner}_vec(reader, key, &mut raw);"
    ));
    a.push("    if status.did_not_fail() {");
    a.push(format!(
        "        *dest = raw.into_iter().map({ty}::from).collect();"
    ));
    a.push("    }");
    a.push("    status");
    a.push("}");
    a.blank();

    a.push(format!(
        "pub fn read_{name}_vec_opt(reader: &mut EntityReader<'_>, key: &str, dest: &mut Option<Vec<{ty}>>) -> ReadStatus {{"
    ));
    a.push("    let mut raw = None;");
    a.push(format!(
        "    let status = read_{inner}_vec_opt(reader, key, &mut raw);"
    ));
    a.push("    if status.did_not_fail() {");
    a.push(format!(
        "        *dest = raw.map(|v| v.into_iter().map({ty}::from).collect());"
    ));
    a.push("    }");
    a.push("    status");
    a.push("}");
    a.blank();

    a.push(format!(
        "pub fn read_{name}_idx_vec(reader: &mut EntityReader<'_>, key: &str, dest: &mut IdxVec<{ty}>) -> ReadStatus {{"
    ));
    a.push("    let mut raw = IdxVec::default();");
    a.push(format!(
        "    let status = read_{inner}_idx_vec(reader, key, &mut raw);"
    ));
    a.push("    if status.did_not_fail() {");
    a.push(format!(
        "        *dest = IdxVec::new(raw.values.into_iter().map({ty}::from).collect(), raw.index);"
    ));
    a.push("    }");
    a.push("    status");
    a.push("}");
    a.blank();

    a.push(format!(
        "pub fn read_{name}_idx_vec_opt(reader: &mut EntityReader<'_>, key: &str, dest: &mut Option<IdxVec<{ty}>>) -> ReadStatus {{"
    ));
    a.push("    let mut raw = None;");
    a.push(format!(
        "    let status = read_{inner}_idx_vec_opt(reader, key, &mut raw);"
    ));
    a.push("    if status.did_not_fail() {");
    a.push(format!(
        "        *dest = raw.map(|v| IdxVec::new(v.values.into_iter().map({ty}::from).collect(), v.index));"
    ));
    a.push("    }");
    a.push("    status");
    a.push("}");
    a.blank();

    a.push(format!(
        "pub fn write_{name}(writer: &mut EntityWriter, key: &str, value: &{ty}) {{"
    ));
    a.push(format!(
        "    write_{inner}(writer, key, &{inner_ty}::from(*value));"
    ));
    a.push("}");
    a.blank();
    a.push(format!(
        "pub fn write_{name}_opt(writer: &mut EntityWriter, key: &str, value: Option<&{ty}>) {{"
    ));
    a.push(format!("    let raw = value.map(|v| {inner_ty}::from(*v));"));
    a.push(format!("    write_{inner}_opt(writer, key, raw.as_ref());"));
    a.push("}");
    a.blank();
    a.push(format!(
        "pub fn write_{name}_vec(writer: &mut EntityWriter, key: &str, values: &[{ty}]) {{"
    ));
    a.push(format!(
        "    let raw: Vec<{inner_ty}> = values.iter().map(|v| {inner_ty}::from(*v)).collect();"
    ));
    a.push(format!("    write_{inner}_vec(writer, key, &raw);"));
    a.push("}");
    a.blank();
    a.push(format!(
        "pub fn write_{name}_vec_opt(writer: &mut EntityWriter, key: &str, values: Option<&[{ty}]>) {{"
    ));
    a.push(format!(
        "    let raw: Option<Vec<{inner_ty}>> = values.map(|vs| vs.iter().map(|v| {inner_ty}::from(*v)).collect());"
    ));
    a.push(format!(
        "    write_{inner}_vec_opt(writer, key, raw.as_deref());"
    ));
    a.push("}");
    a.blank();
    a.push(format!(
        "pub fn write_{name}_idx_vec(writer: &mut EntityWriter, key: &str, value: &IdxVec<{ty}>) -> bool {{"
    ));
    a.push(format!(
        "    let raw = IdxVec::new(value.values.iter().map(|v| {inner_ty}::from(*v)).collect(), value.index.clone());"
    ));
    a.push(format!("    write_{inner}_idx_vec(writer, key, &raw)"));
    a.push("}");
    a.blank();
    a.push(format!(
        "pub fn write_{name}_idx_vec_opt(writer: &mut EntityWriter, key: &str, value: Option<&IdxVec<{ty}>>) -> bool {{"
    ));
    a.push("    match value {");
    a.push(format!(
        "        Some(v) => write_{name}_idx_vec(writer, key, v),"
    ));
    a.push("        None => {");
    a.push("            writer.write_null(key);");
    a.push("            true");
    a.push("        }");
    a.push("    }");
    a.push("}");
}
