//! Little-endian byte cursors
//!
//! `WriteStream` grows a buffer and supports back-patching the u64 size slots
//! that section blocks reserve. `ReadStream` is a bounds-checked cursor over a
//! borrowed buffer; every read is checked against the scope's end position and
//! returns `None` instead of reading past it.

/// Growable little-endian write buffer.
#[derive(Debug, Default)]
pub struct WriteStream {
    buf: Vec<u8>,
}

impl WriteStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> u64 {
        self.buf.len() as u64
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i8(&mut self, v: i8) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i16(&mut self, v: i16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i64(&mut self, v: i64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_f32(&mut self, v: f32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Reserve a u64 slot to be patched once its final value is known.
    pub fn reserve_u64(&mut self) -> u64 {
        let at = self.position();
        self.write_u64(0);
        at
    }

    /// Patch a previously reserved u64 slot.
    pub fn patch_u64(&mut self, at: u64, v: u64) {
        let at = at as usize;
        self.buf[at..at + 8].copy_from_slice(&v.to_le_bytes());
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}

/// Bounds-checked read cursor scoped to `[pos, end)`.
#[derive(Debug, Clone, Copy)]
pub struct ReadStream<'a> {
    buf: &'a [u8],
    pos: usize,
    end: usize,
}

impl<'a> ReadStream<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            end: buf.len(),
        }
    }

    /// A child cursor over `[start, end)` of the same buffer.
    pub fn scoped(&self, start: usize, end: usize) -> Self {
        Self {
            buf: self.buf,
            pos: start,
            end,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn end_position(&self) -> usize {
        self.end
    }

    pub fn remaining(&self) -> usize {
        self.end - self.pos
    }

    pub fn advance_to(&mut self, pos: usize) {
        debug_assert!(pos >= self.pos && pos <= self.end);
        self.pos = pos;
    }

    pub fn read_bytes(&mut self, n: usize) -> Option<&'a [u8]> {
        if self.remaining() < n {
            return None;
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Some(slice)
    }

    pub fn read_u8(&mut self) -> Option<u8> {
        self.read_bytes(1).map(|b| b[0])
    }

    pub fn read_u16(&mut self) -> Option<u16> {
        self.read_bytes(2).map(|b| u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&mut self) -> Option<u32> {
        self.read_bytes(4)
            .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_u64(&mut self) -> Option<u64> {
        self.read_bytes(8).map(|b| {
            u64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]])
        })
    }

    pub fn read_i8(&mut self) -> Option<i8> {
        self.read_u8().map(|v| v as i8)
    }

    pub fn read_i16(&mut self) -> Option<i16> {
        self.read_u16().map(|v| v as i16)
    }

    pub fn read_i32(&mut self) -> Option<i32> {
        self.read_u32().map(|v| v as i32)
    }

    pub fn read_i64(&mut self) -> Option<i64> {
        self.read_u64().map(|v| v as i64)
    }

    pub fn read_f32(&mut self) -> Option<f32> {
        self.read_u32().map(f32::from_bits)
    }

    pub fn read_f64(&mut self) -> Option<f64> {
        self.read_u64().map(f64::from_bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read_scalars() {
        let mut w = WriteStream::new();
        w.write_u8(7);
        w.write_i32(-42);
        w.write_f64(1.5);
        let bytes = w.into_bytes();

        let mut r = ReadStream::new(&bytes);
        assert_eq!(r.read_u8(), Some(7));
        assert_eq!(r.read_i32(), Some(-42));
        assert_eq!(r.read_f64(), Some(1.5));
        assert_eq!(r.read_u8(), None);
    }

    #[test]
    fn test_scoped_cursor_is_bounded() {
        let bytes = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let r = ReadStream::new(&bytes);
        let mut child = r.scoped(2, 4);
        assert_eq!(child.read_u8(), Some(3));
        assert_eq!(child.read_u8(), Some(4));
        // At end of scope: further reads fail even though the buffer goes on.
        assert_eq!(child.read_u8(), None);
    }

    #[test]
    fn test_patch_u64() {
        let mut w = WriteStream::new();
        let slot = w.reserve_u64();
        w.write_u8(0xAB);
        w.patch_u64(slot, 1);
        let bytes = w.into_bytes();
        let mut r = ReadStream::new(&bytes);
        assert_eq!(r.read_u64(), Some(1));
        assert_eq!(r.read_u8(), Some(0xAB));
    }
}
