use crate::SerializeField;

/// Width of a VM word (stack values, variable slots, immediates) in bytes.
pub const WORD_SIZE: usize = 8;

impl SerializeField for u8 {
    fn serialize_field(&self, buf: &mut [u8], offset: &mut usize) {
        debug_assert!(*offset < buf.len(), "u8 field does not fit at offset {}", offset);
        if *offset < buf.len() {
            buf[*offset] = *self;
            *offset += 1;
        }
    }
}

impl SerializeField for u64 {
    fn serialize_field(&self, buf: &mut [u8], offset: &mut usize) {
        let bytes = self.to_le_bytes();
        debug_assert!(
            *offset + WORD_SIZE <= buf.len(),
            "word field does not fit at offset {}",
            offset
        );
        if *offset + WORD_SIZE <= buf.len() {
            buf[*offset..*offset + WORD_SIZE].copy_from_slice(&bytes);
            *offset += WORD_SIZE;
        }
    }
}

impl SerializeField for i64 {
    fn serialize_field(&self, buf: &mut [u8], offset: &mut usize) {
        (*self as u64).serialize_field(buf, offset)
    }
}

impl SerializeField for [u8] {
    fn serialize_field(&self, buf: &mut [u8], offset: &mut usize) {
        debug_assert!(
            *offset + self.len() <= buf.len(),
            "{}-byte field does not fit at offset {}",
            self.len(),
            offset
        );
        if *offset + self.len() <= buf.len() {
            buf[*offset..*offset + self.len()].copy_from_slice(self);
            *offset += self.len();
        }
    }
}

/// Reads a little-endian word at `offset`, or `None` if fewer than eight bytes remain.
pub fn read_word_le(bytes: &[u8], offset: usize) -> Option<u64> {
    let end = offset.checked_add(WORD_SIZE)?;
    let raw: [u8; WORD_SIZE] = bytes.get(offset..end)?.try_into().ok()?;
    Some(u64::from_le_bytes(raw))
}
