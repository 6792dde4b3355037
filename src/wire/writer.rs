//! Entity writer
//!
//! Structural mirror of the reader: begin/end section and sections-array
//! operations bracket nested writes, and absence is written explicitly as a
//! null block rather than omitted. Section byte sizes are reserved at begin
//! and back-patched at end, so the matching reader can bound child traversal.

use super::codec::ValueCodec;
use super::stream::WriteStream;
use super::{BlockKind, IdxVec};

const HAS_INDEX: u8 = 0x01;

#[derive(Debug)]
enum Scope {
    Section { size_slot: u64 },
    SectionsArray { size_slot: u64 },
    ArrayElement { size_slot: u64 },
}

/// Writes one entity tree into an in-memory buffer. Holds mutable traversal
/// state (the open scope stack) and is single-caller by construction.
#[derive(Debug, Default)]
pub struct EntityWriter {
    stream: WriteStream,
    scopes: Vec<Scope>,
}

impl EntityWriter {
    pub fn new() -> Self {
        Self::default()
    }

    fn write_header(&mut self, kind: BlockKind, key: &str) {
        debug_assert!(key.len() <= u8::MAX as usize, "key too long: {key}");
        self.stream.write_u8(kind as u8);
        self.stream.write_u8(key.len() as u8);
        self.stream.write_bytes(key.as_bytes());
    }

    /// Explicitly absent value, array or section for `key`.
    pub fn write_null(&mut self, key: &str) {
        self.write_header(BlockKind::Null, key);
    }

    pub fn write_value<T: ValueCodec>(&mut self, key: &str, value: &T) {
        self.write_header(BlockKind::Value, key);
        self.stream.write_u8(T::DISCRIMINANT);
        value.write_payload(&mut self.stream);
    }

    pub fn write_optional_value<T: ValueCodec>(&mut self, key: &str, value: Option<&T>) {
        match value {
            Some(v) => self.write_value(key, v),
            None => self.write_null(key),
        }
    }

    pub fn write_array<T: ValueCodec>(&mut self, key: &str, values: &[T]) {
        self.write_array_impl(key, values, None);
    }

    pub fn write_optional_array<T: ValueCodec>(&mut self, key: &str, values: Option<&[T]>) {
        match values {
            Some(v) => self.write_array(key, v),
            None => self.write_null(key),
        }
    }

    /// Write an indexed sequence. Returns false (writing nothing) when the
    /// index is not length-matched to the values.
    pub fn write_idx_array<T: ValueCodec>(&mut self, key: &str, value: &IdxVec<T>) -> bool {
        if value.index.len() != value.values.len() {
            return false;
        }
        self.write_array_impl(key, &value.values, Some(&value.index));
        true
    }

    pub fn write_optional_idx_array<T: ValueCodec>(
        &mut self,
        key: &str,
        value: Option<&IdxVec<T>>,
    ) -> bool {
        match value {
            Some(v) => self.write_idx_array(key, v),
            None => {
                self.write_null(key);
                true
            }
        }
    }

    fn write_array_impl<T: ValueCodec>(&mut self, key: &str, values: &[T], index: Option<&[i32]>) {
        self.write_header(BlockKind::Array, key);
        self.stream.write_u8(T::DISCRIMINANT);
        self.stream
            .write_u8(if index.is_some() { HAS_INDEX } else { 0 });
        self.stream.write_u64(values.len() as u64);
        for v in values {
            v.write_payload(&mut self.stream);
        }
        if let Some(index) = index {
            self.stream.write_u64(index.len() as u64);
            for i in index {
                self.stream.write_i32(*i);
            }
        }
    }

    /// Open a nested section for `key`. Must be closed with
    /// [`EntityWriter::end_section`].
    pub fn begin_section(&mut self, key: &str) {
        self.write_header(BlockKind::Section, key);
        let size_slot = self.stream.reserve_u64();
        self.scopes.push(Scope::Section { size_slot });
    }

    pub fn end_section(&mut self) {
        match self.scopes.pop() {
            Some(Scope::Section { size_slot }) => self.patch_scope(size_slot),
            other => panic!("end_section without matching begin_section: {other:?}"),
        }
    }

    /// Open a sections array with `count` presence-marked element slots.
    pub fn begin_sections_array(&mut self, key: &str, count: u64) {
        self.write_header(BlockKind::SectionsArray, key);
        let size_slot = self.stream.reserve_u64();
        self.stream.write_u64(count);
        self.scopes.push(Scope::SectionsArray { size_slot });
    }

    /// Open one element slot. `has_data` false writes an empty slot and the
    /// matching end call must be skipped.
    pub fn begin_array_element(&mut self, has_data: bool) {
        debug_assert!(
            matches!(self.scopes.last(), Some(Scope::SectionsArray { .. })),
            "array element outside a sections array"
        );
        self.stream.write_u8(u8::from(has_data));
        if has_data {
            let size_slot = self.stream.reserve_u64();
            self.scopes.push(Scope::ArrayElement { size_slot });
        }
    }

    pub fn end_array_element(&mut self) {
        match self.scopes.pop() {
            Some(Scope::ArrayElement { size_slot }) => self.patch_scope(size_slot),
            other => panic!("end_array_element without matching begin: {other:?}"),
        }
    }

    pub fn end_sections_array(&mut self) {
        match self.scopes.pop() {
            Some(Scope::SectionsArray { size_slot }) => self.patch_scope(size_slot),
            other => panic!("end_sections_array without matching begin: {other:?}"),
        }
    }

    fn patch_scope(&mut self, size_slot: u64) {
        let size = self.stream.position() - (size_slot + 8);
        self.stream.patch_u64(size_slot, size);
    }

    /// Finish writing and take the buffer. Panics if a scope is still open.
    pub fn finish(self) -> Vec<u8> {
        assert!(self.scopes.is_empty(), "unclosed scope at finish");
        self.stream.into_bytes()
    }
}
