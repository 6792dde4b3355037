//! Runtime wire protocol
//!
//! The nested, keyed-section binary format the generated operations embody.
//! Every value, array and section is a block: a kind byte, a length-prefixed
//! key, then a kind-specific payload. Absence is always written explicitly as
//! a `Null` block, so a reader can tell "absent in this instance" (a runtime
//! concern) from "key never existed in this schema version" (a generation-time
//! concern).
//!
//! Readers and writers execute synchronously over in-memory buffers on a
//! single call stack. One instance holds mutable traversal state and is not
//! safe for shared use; distinct instances over distinct buffers need no
//! coordination.

pub mod codec;
pub mod reader;
pub mod stream;
pub mod table;
pub mod writer;

pub use codec::{EntityRef, Hash256, ItemRef, Quat, ValueCodec};
pub use reader::{EntityReader, ItemBegin, SectionBegin, SectionsArrayBegin};
pub use stream::{ReadStream, WriteStream};
pub use table::ItemTable;
pub use writer::EntityWriter;

use serde::{Deserialize, Serialize};

/// Block kinds on the wire. A `Null` block carries only its key and marks an
/// explicitly absent value, array or section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BlockKind {
    Null = 0x00,
    Value = 0x01,
    Array = 0x02,
    Section = 0x03,
    SectionsArray = 0x04,
}

impl BlockKind {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0x00 => Some(Self::Null),
            0x01 => Some(Self::Value),
            0x02 => Some(Self::Array),
            0x03 => Some(Self::Section),
            0x04 => Some(Self::SectionsArray),
            _ => None,
        }
    }
}

/// Tri-state outcome of a leaf read.
///
/// `SuccessEmpty` means the key was legitimately absent and the destination
/// was reset, not populated — explicitly not an error. Callers collapse
/// `Success` and `SuccessEmpty` with [`ReadStatus::did_not_fail`]; the
/// empty/non-empty distinction lives in the destination container's own state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStatus {
    Success,
    SuccessEmpty,
    Fail,
}

impl ReadStatus {
    pub fn did_not_fail(self) -> bool {
        self != ReadStatus::Fail
    }
}

/// A value sequence paired with an explicit order/provenance index, used when
/// declared order or identity must survive serialization independently of
/// storage order. On the wire the index is length-matched to the values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdxVec<T> {
    pub values: Vec<T>,
    pub index: Vec<i32>,
}

// Not derived: the derive would bound `T: Default`, and an empty sequence
// needs no default element.
impl<T> Default for IdxVec<T> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            index: Vec::new(),
        }
    }
}

impl<T> IdxVec<T> {
    pub fn new(values: Vec<T>, index: Vec<i32>) -> Self {
        Self { values, index }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
