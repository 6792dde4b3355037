//! Entity reader
//!
//! A reader is scoped to `[position, end_position)` and never reads past its
//! end. Sections hand out child readers scoped to the section's byte range;
//! ending a section validates that the child consumed exactly its range.
//! Leaf reads are tri-state ([`ReadStatus`]): success, success-empty (key
//! legitimately absent, destination reset) or fail (key/type mismatch,
//! truncation, or scope violation).

use super::codec::ValueCodec;
use super::stream::ReadStream;
use super::{BlockKind, IdxVec, ReadStatus};

const HAS_INDEX: u8 = 0x01;

/// Outcome of [`EntityReader::begin_section`]. `Absent` is success: the
/// caller must not call the matching end operation.
#[derive(Debug)]
pub enum SectionBegin<'a> {
    Present(EntityReader<'a>),
    Absent,
    Fail,
}

/// Outcome of [`EntityReader::begin_sections_array`]. `Absent` is success
/// with zero elements.
#[derive(Debug)]
pub enum SectionsArrayBegin<'a> {
    Present { reader: EntityReader<'a>, count: u64 },
    Absent,
    Fail,
}

/// Outcome of [`EntityReader::begin_array_element`]. `Empty` is returned only
/// when the caller accepts empty elements.
#[derive(Debug)]
pub enum ItemBegin<'a> {
    Data(EntityReader<'a>),
    Empty,
    Fail,
}

/// Reads one entity tree out of an in-memory buffer. Holds mutable traversal
/// state and is single-caller; distinct readers over distinct buffers are
/// fully independent.
#[derive(Debug)]
pub struct EntityReader<'a> {
    stream: ReadStream<'a>,
    /// Element cursor, present only for sections-array child readers
    next_element: u64,
}

impl<'a> EntityReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            stream: ReadStream::new(buf),
            next_element: 0,
        }
    }

    fn child(&self, start: usize, end: usize) -> EntityReader<'a> {
        EntityReader {
            stream: self.stream.scoped(start, end),
            next_element: 0,
        }
    }

    /// True once the reader has consumed exactly its scoped range.
    pub fn at_end(&self) -> bool {
        self.stream.remaining() == 0
    }

    /// Read a block header and match it against the expected key. Returns the
    /// block kind, or `None` on truncation or key mismatch.
    fn read_header(&mut self, key: &str) -> Option<BlockKind> {
        let kind = BlockKind::from_u8(self.stream.read_u8()?)?;
        let key_len = self.stream.read_u8()? as usize;
        let found = self.stream.read_bytes(key_len)?;
        if found != key.as_bytes() {
            return None;
        }
        Some(kind)
    }

    // -- leaf values --------------------------------------------------------

    pub fn read_value<T: ValueCodec>(&mut self, key: &str, dest: &mut T) -> ReadStatus {
        match self.read_header(key) {
            Some(BlockKind::Value) => {}
            // A required value may not be absent.
            _ => return ReadStatus::Fail,
        }
        match self.read_value_body(dest) {
            true => ReadStatus::Success,
            false => ReadStatus::Fail,
        }
    }

    pub fn read_optional_value<T: ValueCodec>(
        &mut self,
        key: &str,
        dest: &mut Option<T>,
    ) -> ReadStatus {
        match self.read_header(key) {
            Some(BlockKind::Value) => {}
            Some(BlockKind::Null) => {
                *dest = None;
                return ReadStatus::SuccessEmpty;
            }
            _ => return ReadStatus::Fail,
        }
        let mut value = T::zero();
        if self.read_value_body(&mut value) {
            *dest = Some(value);
            ReadStatus::Success
        } else {
            ReadStatus::Fail
        }
    }

    fn read_value_body<T: ValueCodec>(&mut self, dest: &mut T) -> bool {
        if self.stream.read_u8() != Some(T::DISCRIMINANT) {
            return false;
        }
        match T::read_payload(&mut self.stream) {
            Some(value) => {
                *dest = value;
                true
            }
            None => false,
        }
    }

    // -- sequences ----------------------------------------------------------

    pub fn read_array<T: ValueCodec>(&mut self, key: &str, dest: &mut Vec<T>) -> ReadStatus {
        match self.read_header(key) {
            Some(BlockKind::Array) => {}
            _ => return ReadStatus::Fail,
        }
        match self.read_array_body(dest, None) {
            true => ReadStatus::Success,
            false => ReadStatus::Fail,
        }
    }

    pub fn read_optional_array<T: ValueCodec>(
        &mut self,
        key: &str,
        dest: &mut Option<Vec<T>>,
    ) -> ReadStatus {
        match self.read_header(key) {
            Some(BlockKind::Array) => {}
            Some(BlockKind::Null) => {
                *dest = None;
                return ReadStatus::SuccessEmpty;
            }
            _ => return ReadStatus::Fail,
        }
        let mut values = Vec::new();
        if self.read_array_body(&mut values, None) {
            *dest = Some(values);
            ReadStatus::Success
        } else {
            ReadStatus::Fail
        }
    }

    pub fn read_idx_array<T: ValueCodec>(&mut self, key: &str, dest: &mut IdxVec<T>) -> ReadStatus {
        match self.read_header(key) {
            Some(BlockKind::Array) => {}
            _ => return ReadStatus::Fail,
        }
        let mut index = Vec::new();
        if self.read_array_body(&mut dest.values, Some(&mut index)) {
            dest.index = index;
            ReadStatus::Success
        } else {
            ReadStatus::Fail
        }
    }

    pub fn read_optional_idx_array<T: ValueCodec>(
        &mut self,
        key: &str,
        dest: &mut Option<IdxVec<T>>,
    ) -> ReadStatus {
        match self.read_header(key) {
            Some(BlockKind::Array) => {}
            Some(BlockKind::Null) => {
                *dest = None;
                return ReadStatus::SuccessEmpty;
            }
            _ => return ReadStatus::Fail,
        }
        let mut value = IdxVec::default();
        let mut index = Vec::new();
        if self.read_array_body(&mut value.values, Some(&mut index)) {
            value.index = index;
            *dest = Some(value);
            ReadStatus::Success
        } else {
            ReadStatus::Fail
        }
    }

    /// Shared array body: discriminant, flags, values, optional index. The
    /// caller's expectation of an index must match the wire flags, and an
    /// index must be length-matched to the values.
    fn read_array_body<T: ValueCodec>(
        &mut self,
        dest: &mut Vec<T>,
        dest_index: Option<&mut Vec<i32>>,
    ) -> bool {
        if self.stream.read_u8() != Some(T::DISCRIMINANT) {
            return false;
        }
        let flags = match self.stream.read_u8() {
            Some(f) => f,
            None => return false,
        };
        let has_index = flags & HAS_INDEX != 0;
        if has_index != dest_index.is_some() {
            return false;
        }

        let count = match self.stream.read_u64() {
            Some(c) => c,
            None => return false,
        };
        dest.clear();
        for _ in 0..count {
            match T::read_payload(&mut self.stream) {
                Some(v) => dest.push(v),
                None => return false,
            }
        }

        if let Some(dest_index) = dest_index {
            let index_count = match self.stream.read_u64() {
                Some(c) => c,
                None => return false,
            };
            if index_count != count {
                return false;
            }
            dest_index.clear();
            for _ in 0..index_count {
                match self.stream.read_i32() {
                    Some(i) => dest_index.push(i),
                    None => return false,
                }
            }
        }
        true
    }

    // -- sections -----------------------------------------------------------

    /// Begin reading a nested section. On `Present` the caller reads through
    /// the child and must close it with [`EntityReader::end_section`]; on
    /// `Absent` no end call is made. A null section is `Fail` unless
    /// `null_allowed`.
    pub fn begin_section(&mut self, key: &str, null_allowed: bool) -> SectionBegin<'a> {
        match self.read_header(key) {
            Some(BlockKind::Section) => {}
            Some(BlockKind::Null) if null_allowed => return SectionBegin::Absent,
            _ => return SectionBegin::Fail,
        }
        let size = match self.stream.read_u64() {
            Some(s) => s as usize,
            None => return SectionBegin::Fail,
        };
        let start = self.stream.position();
        if size > self.stream.remaining() {
            return SectionBegin::Fail;
        }
        SectionBegin::Present(self.child(start, start + size))
    }

    /// Validate that the child consumed exactly its scoped range, then step
    /// over it.
    pub fn end_section(&mut self, child: EntityReader<'a>) -> bool {
        if !child.at_end() {
            return false;
        }
        self.stream.advance_to(child.stream.end_position());
        true
    }

    /// Begin reading a sections array. `Absent` means zero elements and no
    /// end call.
    pub fn begin_sections_array(
        &mut self,
        key: &str,
        null_allowed: bool,
    ) -> SectionsArrayBegin<'a> {
        match self.read_header(key) {
            Some(BlockKind::SectionsArray) => {}
            Some(BlockKind::Null) if null_allowed => return SectionsArrayBegin::Absent,
            _ => return SectionsArrayBegin::Fail,
        }
        let size = match self.stream.read_u64() {
            Some(s) => s as usize,
            None => return SectionsArrayBegin::Fail,
        };
        let start = self.stream.position();
        if size > self.stream.remaining() {
            return SectionsArrayBegin::Fail;
        }
        let mut reader = self.child(start, start + size);
        let count = match reader.stream.read_u64() {
            Some(c) => c,
            None => return SectionsArrayBegin::Fail,
        };
        SectionsArrayBegin::Present { reader, count }
    }

    /// Begin element `index` of a sections array (called on the array's child
    /// reader). Elements must be visited in order. An empty element is `Fail`
    /// when the caller does not accept empty elements.
    pub fn begin_array_element(&mut self, index: u64, allow_empty: bool) -> ItemBegin<'a> {
        if index != self.next_element {
            return ItemBegin::Fail;
        }
        let present = match self.stream.read_u8() {
            Some(p) => p,
            None => return ItemBegin::Fail,
        };
        match present {
            0 if allow_empty => {
                self.next_element += 1;
                ItemBegin::Empty
            }
            0 => ItemBegin::Fail,
            1 => {
                let size = match self.stream.read_u64() {
                    Some(s) => s as usize,
                    None => return ItemBegin::Fail,
                };
                let start = self.stream.position();
                if size > self.stream.remaining() {
                    return ItemBegin::Fail;
                }
                ItemBegin::Data(self.child(start, start + size))
            }
            _ => ItemBegin::Fail,
        }
    }

    pub fn end_array_element(&mut self, index: u64, child: EntityReader<'a>) -> bool {
        if index != self.next_element || !child.at_end() {
            return false;
        }
        self.stream.advance_to(child.stream.end_position());
        self.next_element += 1;
        true
    }

    /// Validate and close a sections array (called on the parent reader).
    pub fn end_sections_array(&mut self, child: EntityReader<'a>) -> bool {
        if !child.at_end() {
            return false;
        }
        self.stream.advance_to(child.stream.end_position());
        true
    }
}
