use std::collections::TryReserveError;

use types::{read_word_le, WORD_SIZE};

/// The single addressable memory space of one VM.
///
/// Addresses are byte offsets into the region. Every accessor checks bounds and
/// reports a miss through its return value, so there is no unchecked path into
/// the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRegion {
    bytes: Box<[u8]>,
}

impl MemoryRegion {
    pub fn zeroed(len: usize) -> Self {
        Self {
            bytes: vec![0u8; len].into_boxed_slice(),
        }
    }

    /// Fallible allocation: reports allocator refusal instead of aborting.
    pub fn try_zeroed(len: usize) -> Result<Self, TryReserveError> {
        let mut bytes = Vec::new();
        bytes.try_reserve_exact(len)?;
        bytes.resize(len, 0);
        Ok(Self {
            bytes: bytes.into_boxed_slice(),
        })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn contains(&self, addr: usize) -> bool {
        addr < self.bytes.len()
    }

    /// True when `[addr, addr + len)` lies entirely inside the region.
    pub fn contains_range(&self, addr: usize, len: usize) -> bool {
        matches!(addr.checked_add(len), Some(end) if end <= self.bytes.len())
    }

    pub fn read_u8(&self, addr: usize) -> Option<u8> {
        self.bytes.get(addr).copied()
    }

    pub fn write_u8(&mut self, addr: usize, value: u8) -> bool {
        match self.bytes.get_mut(addr) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn read_u64_le(&self, addr: usize) -> Option<u64> {
        read_word_le(&self.bytes, addr)
    }

    pub fn write_u64_le(&mut self, addr: usize, value: u64) -> bool {
        if !self.contains_range(addr, WORD_SIZE) {
            return false;
        }
        self.bytes[addr..addr + WORD_SIZE].copy_from_slice(&value.to_le_bytes());
        true
    }

    /// Bytes from `addr` to the end of the region; `None` past the end.
    pub fn slice_from(&self, addr: usize) -> Option<&[u8]> {
        self.bytes.get(addr..)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
