//! Value codec contract
//!
//! One capability contract per concrete type: a stable discriminant, the
//! zero/inf/sup triple, and element-wise encode/decode. The container-shape
//! operations in the reader and writer are generic over this contract, so the
//! six operations per type never hand-duplicate wire logic.
//!
//! Delegating types (`ItemRef`, `EntityRef`) reuse their representation
//! type's discriminant and payload encoding, converting at the boundary —
//! they are wire-identical to the type they delegate to.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::stream::{ReadStream, WriteStream};

/// Capability contract for a wire-serializable value type.
pub trait ValueCodec: Sized {
    /// Catalog name of the implementing type
    const TYPE_NAME: &'static str;
    /// Wire discriminant; delegating types carry their representation type's
    const DISCRIMINANT: u8;

    fn zero() -> Self;
    fn inf() -> Self;
    /// Limit superior; absent for unbounded types (strings)
    fn sup() -> Option<Self>;

    fn write_payload(&self, w: &mut WriteStream);
    fn read_payload(r: &mut ReadStream<'_>) -> Option<Self>;
}

// ---------------------------------------------------------------------------
// identifier types

/// 256-bit content hash; the representation type behind `EntityRef`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    pub const ZERO: Hash256 = Hash256([0; 32]);
    pub const MAX: Hash256 = Hash256([0xFF; 32]);
}

/// Lightweight item identifier; representationally a `Uuid`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct ItemRef(pub Uuid);

impl ItemRef {
    pub const ZERO: ItemRef = ItemRef(Uuid::nil());
    pub const MAX: ItemRef = ItemRef(Uuid::max());

    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for ItemRef {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<ItemRef> for Uuid {
    fn from(value: ItemRef) -> Self {
        value.0
    }
}

/// Content-hash entity identifier; representationally a `Hash256`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct EntityRef(pub Hash256);

impl EntityRef {
    pub const ZERO: EntityRef = EntityRef(Hash256::ZERO);
    pub const MAX: EntityRef = EntityRef(Hash256::MAX);
}

impl From<Hash256> for EntityRef {
    fn from(value: Hash256) -> Self {
        Self(value)
    }
}

impl From<EntityRef> for Hash256 {
    fn from(value: EntityRef) -> Self {
        value.0
    }
}

/// Quaternion over `f32` or `f64`. A distinct type from the 4-vector so it
/// keeps its own discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Quat<T>(pub [T; 4]);

// ---------------------------------------------------------------------------
// scalar codecs

macro_rules! scalar_codec {
    ($t:ty, $name:expr, $disc:expr, $write:ident, $read:ident, $zero:expr, $inf:expr, $sup:expr) => {
        impl ValueCodec for $t {
            const TYPE_NAME: &'static str = $name;
            const DISCRIMINANT: u8 = $disc;

            fn zero() -> Self {
                $zero
            }
            fn inf() -> Self {
                $inf
            }
            fn sup() -> Option<Self> {
                Some($sup)
            }

            fn write_payload(&self, w: &mut WriteStream) {
                w.$write(*self);
            }
            fn read_payload(r: &mut ReadStream<'_>) -> Option<Self> {
                r.$read()
            }
        }
    };
}

impl ValueCodec for bool {
    const TYPE_NAME: &'static str = "bool";
    const DISCRIMINANT: u8 = 0x11;

    fn zero() -> Self {
        false
    }
    fn inf() -> Self {
        false
    }
    fn sup() -> Option<Self> {
        Some(true)
    }

    fn write_payload(&self, w: &mut WriteStream) {
        w.write_u8(u8::from(*self));
    }
    fn read_payload(r: &mut ReadStream<'_>) -> Option<Self> {
        match r.read_u8()? {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        }
    }
}

scalar_codec!(i8, "i8", 0x21, write_i8, read_i8, 0, i8::MIN, i8::MAX);
scalar_codec!(i16, "i16", 0x22, write_i16, read_i16, 0, i16::MIN, i16::MAX);
scalar_codec!(i32, "i32", 0x23, write_i32, read_i32, 0, i32::MIN, i32::MAX);
scalar_codec!(i64, "i64", 0x24, write_i64, read_i64, 0, i64::MIN, i64::MAX);
scalar_codec!(u8, "u8", 0x31, write_u8, read_u8, 0, 0, u8::MAX);
scalar_codec!(u16, "u16", 0x32, write_u16, read_u16, 0, 0, u16::MAX);
scalar_codec!(u32, "u32", 0x33, write_u32, read_u32, 0, 0, u32::MAX);
scalar_codec!(u64, "u64", 0x34, write_u64, read_u64, 0, 0, u64::MAX);
scalar_codec!(f32, "f32", 0x41, write_f32, read_f32, 0.0, f32::MIN, f32::MAX);
scalar_codec!(f64, "f64", 0x42, write_f64, read_f64, 0.0, f64::MIN, f64::MAX);

// ---------------------------------------------------------------------------
// vector and matrix codecs

macro_rules! array_codec {
    ($elem:ty, $n:expr, $name:expr, $disc:expr) => {
        impl ValueCodec for [$elem; $n] {
            const TYPE_NAME: &'static str = $name;
            const DISCRIMINANT: u8 = $disc;

            fn zero() -> Self {
                [<$elem as ValueCodec>::zero(); $n]
            }
            fn inf() -> Self {
                [<$elem as ValueCodec>::inf(); $n]
            }
            fn sup() -> Option<Self> {
                <$elem as ValueCodec>::sup().map(|s| [s; $n])
            }

            fn write_payload(&self, w: &mut WriteStream) {
                for v in self {
                    v.write_payload(w);
                }
            }
            fn read_payload(r: &mut ReadStream<'_>) -> Option<Self> {
                let mut out = Self::zero();
                for slot in &mut out {
                    *slot = <$elem as ValueCodec>::read_payload(r)?;
                }
                Some(out)
            }
        }
    };
}

array_codec!(i8, 2, "I8vec2", 0x51);
array_codec!(i16, 2, "I16vec2", 0x52);
array_codec!(i32, 2, "I32vec2", 0x53);
array_codec!(i64, 2, "I64vec2", 0x54);
array_codec!(u8, 2, "U8vec2", 0x55);
array_codec!(u16, 2, "U16vec2", 0x56);
array_codec!(u32, 2, "U32vec2", 0x57);
array_codec!(u64, 2, "U64vec2", 0x58);
array_codec!(f32, 2, "Fvec2", 0x59);
array_codec!(f64, 2, "Dvec2", 0x5A);
array_codec!(i8, 3, "I8vec3", 0x61);
array_codec!(i16, 3, "I16vec3", 0x62);
array_codec!(i32, 3, "I32vec3", 0x63);
array_codec!(i64, 3, "I64vec3", 0x64);
array_codec!(u8, 3, "U8vec3", 0x65);
array_codec!(u16, 3, "U16vec3", 0x66);
array_codec!(u32, 3, "U32vec3", 0x67);
array_codec!(u64, 3, "U64vec3", 0x68);
array_codec!(f32, 3, "Fvec3", 0x69);
array_codec!(f64, 3, "Dvec3", 0x6A);
array_codec!(i8, 4, "I8vec4", 0x71);
array_codec!(i16, 4, "I16vec4", 0x72);
array_codec!(i32, 4, "I32vec4", 0x73);
array_codec!(i64, 4, "I64vec4", 0x74);
array_codec!(u8, 4, "U8vec4", 0x75);
array_codec!(u16, 4, "U16vec4", 0x76);
array_codec!(u32, 4, "U32vec4", 0x77);
array_codec!(u64, 4, "U64vec4", 0x78);
array_codec!(f32, 4, "Fvec4", 0x79);
array_codec!(f64, 4, "Dvec4", 0x7A);

array_codec!([f32; 2], 2, "Fmat2", 0x81);
array_codec!([f64; 2], 2, "Dmat2", 0x82);
array_codec!([f32; 3], 3, "Fmat3", 0x91);
array_codec!([f64; 3], 3, "Dmat3", 0x92);
array_codec!([f32; 4], 4, "Fmat4", 0xA1);
array_codec!([f64; 4], 4, "Dmat4", 0xA2);

macro_rules! quat_codec {
    ($t:ty, $name:expr, $disc:expr) => {
        impl ValueCodec for Quat<$t> {
            const TYPE_NAME: &'static str = $name;
            const DISCRIMINANT: u8 = $disc;

            fn zero() -> Self {
                Quat(<[$t; 4] as ValueCodec>::zero())
            }
            fn inf() -> Self {
                Quat(<[$t; 4] as ValueCodec>::inf())
            }
            fn sup() -> Option<Self> {
                <[$t; 4] as ValueCodec>::sup().map(Quat)
            }

            fn write_payload(&self, w: &mut WriteStream) {
                self.0.write_payload(w);
            }
            fn read_payload(r: &mut ReadStream<'_>) -> Option<Self> {
                <[$t; 4] as ValueCodec>::read_payload(r).map(Quat)
            }
        }
    };
}

quat_codec!(f32, "Fquat", 0xB1);
quat_codec!(f64, "Dquat", 0xB2);

// ---------------------------------------------------------------------------
// atomic codecs

impl ValueCodec for Uuid {
    const TYPE_NAME: &'static str = "Uuid";
    const DISCRIMINANT: u8 = 0xC1;

    fn zero() -> Self {
        Uuid::nil()
    }
    fn inf() -> Self {
        Uuid::nil()
    }
    fn sup() -> Option<Self> {
        Some(Uuid::max())
    }

    fn write_payload(&self, w: &mut WriteStream) {
        w.write_bytes(self.as_bytes());
    }
    fn read_payload(r: &mut ReadStream<'_>) -> Option<Self> {
        let bytes = r.read_bytes(16)?;
        Uuid::from_slice(bytes).ok()
    }
}

impl ValueCodec for Hash256 {
    const TYPE_NAME: &'static str = "Hash256";
    const DISCRIMINANT: u8 = 0xD1;

    fn zero() -> Self {
        Hash256::ZERO
    }
    fn inf() -> Self {
        Hash256::ZERO
    }
    fn sup() -> Option<Self> {
        Some(Hash256::MAX)
    }

    fn write_payload(&self, w: &mut WriteStream) {
        w.write_bytes(&self.0);
    }
    fn read_payload(r: &mut ReadStream<'_>) -> Option<Self> {
        let bytes = r.read_bytes(32)?;
        let mut out = [0u8; 32];
        out.copy_from_slice(bytes);
        Some(Hash256(out))
    }
}

// Delegating codecs construct-and-copy through the representation type and
// carry its discriminant, so they are wire-identical to it.

impl ValueCodec for ItemRef {
    const TYPE_NAME: &'static str = "ItemRef";
    const DISCRIMINANT: u8 = Uuid::DISCRIMINANT;

    fn zero() -> Self {
        ItemRef::from(Uuid::zero())
    }
    fn inf() -> Self {
        ItemRef::from(Uuid::inf())
    }
    fn sup() -> Option<Self> {
        Uuid::sup().map(ItemRef::from)
    }

    fn write_payload(&self, w: &mut WriteStream) {
        Uuid::from(*self).write_payload(w);
    }
    fn read_payload(r: &mut ReadStream<'_>) -> Option<Self> {
        Uuid::read_payload(r).map(ItemRef::from)
    }
}

impl ValueCodec for EntityRef {
    const TYPE_NAME: &'static str = "EntityRef";
    const DISCRIMINANT: u8 = Hash256::DISCRIMINANT;

    fn zero() -> Self {
        EntityRef::from(Hash256::zero())
    }
    fn inf() -> Self {
        EntityRef::from(Hash256::inf())
    }
    fn sup() -> Option<Self> {
        Hash256::sup().map(EntityRef::from)
    }

    fn write_payload(&self, w: &mut WriteStream) {
        Hash256::from(*self).write_payload(w);
    }
    fn read_payload(r: &mut ReadStream<'_>) -> Option<Self> {
        Hash256::read_payload(r).map(EntityRef::from)
    }
}

impl ValueCodec for String {
    const TYPE_NAME: &'static str = "String";
    const DISCRIMINANT: u8 = 0xE1;

    fn zero() -> Self {
        String::new()
    }
    fn inf() -> Self {
        String::new()
    }
    fn sup() -> Option<Self> {
        None
    }

    fn write_payload(&self, w: &mut WriteStream) {
        w.write_u64(self.len() as u64);
        w.write_bytes(self.as_bytes());
    }
    fn read_payload(r: &mut ReadStream<'_>) -> Option<Self> {
        let len = r.read_u64()? as usize;
        let bytes = r.read_bytes(len)?;
        String::from_utf8(bytes.to_vec()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TypeCatalog;

    fn roundtrip<T: ValueCodec + PartialEq + std::fmt::Debug>(value: T) {
        let mut w = WriteStream::new();
        value.write_payload(&mut w);
        let bytes = w.into_bytes();
        let mut r = ReadStream::new(&bytes);
        assert_eq!(T::read_payload(&mut r), Some(value));
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_payload_roundtrips() {
        roundtrip(true);
        roundtrip(-12345i32);
        roundtrip(u64::MAX);
        roundtrip(1.25f64);
        roundtrip([1i32, -2, 3]);
        roundtrip([1u16, 2]);
        roundtrip([-1i64, 2, 3, 4]);
        roundtrip([[1.0f32, 2.0], [3.0, 4.0]]);
        roundtrip(Quat([0.0f64, 0.0, 0.0, 1.0]));
        roundtrip("hello".to_string());
        roundtrip(Uuid::from_u128(0xDEADBEEF));
        roundtrip(Hash256([7; 32]));
        roundtrip(ItemRef(Uuid::from_u128(42)));
        roundtrip(EntityRef(Hash256([9; 32])));
    }

    #[test]
    fn test_bool_rejects_junk() {
        let bytes = [2u8];
        let mut r = ReadStream::new(&bytes);
        assert_eq!(bool::read_payload(&mut r), None);
    }

    #[test]
    fn test_truncated_payload_fails() {
        let mut w = WriteStream::new();
        "hello".to_string().write_payload(&mut w);
        let bytes = w.into_bytes();
        let mut r = ReadStream::new(&bytes[..bytes.len() - 1]);
        assert_eq!(String::read_payload(&mut r), None);
    }

    #[test]
    fn test_delegating_codecs_share_wire_encoding() {
        assert_eq!(ItemRef::DISCRIMINANT, Uuid::DISCRIMINANT);
        assert_eq!(EntityRef::DISCRIMINANT, Hash256::DISCRIMINANT);

        let id = Uuid::from_u128(0xABCD);
        let mut a = WriteStream::new();
        id.write_payload(&mut a);
        let mut b = WriteStream::new();
        ItemRef(id).write_payload(&mut b);
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_codec_discriminants_match_catalog() {
        let catalog = TypeCatalog::builtin().unwrap();
        assert_eq!(bool::DISCRIMINANT, catalog.get("bool").unwrap().discriminant);
        assert_eq!(i32::DISCRIMINANT, catalog.get("i32").unwrap().discriminant);
        assert_eq!(
            <[f32; 3]>::DISCRIMINANT,
            catalog.get("Fvec3").unwrap().discriminant
        );
        assert_eq!(
            <[i16; 2]>::DISCRIMINANT,
            catalog.get("I16vec2").unwrap().discriminant
        );
        assert_eq!(
            <[u64; 4]>::DISCRIMINANT,
            catalog.get("U64vec4").unwrap().discriminant
        );
        assert_eq!(
            <[[f64; 4]; 4]>::DISCRIMINANT,
            catalog.get("Dmat4").unwrap().discriminant
        );
        assert_eq!(
            Quat::<f32>::DISCRIMINANT,
            catalog.get("Fquat").unwrap().discriminant
        );
        assert_eq!(Uuid::DISCRIMINANT, catalog.get("Uuid").unwrap().discriminant);
        assert_eq!(
            String::DISCRIMINANT,
            catalog.get("String").unwrap().discriminant
        );
        // Delegating variants carry their representation type's discriminant.
        assert_eq!(
            ItemRef::DISCRIMINANT,
            catalog.get("Uuid").unwrap().discriminant
        );
    }
}
