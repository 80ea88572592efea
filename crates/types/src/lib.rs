#![no_std]

extern crate alloc;

pub mod array_list;
pub use array_list::{ArrayList, DEFAULT_CAPACITY};

pub mod primitives;
pub use primitives::*;

pub mod task_id;
pub use task_id::TaskId;

// used for serialization
pub trait SerializeField {
    /// Appends `self` into `buf` at `*offset`, advancing the offset.
    fn serialize_field(&self, buf: &mut [u8], offset: &mut usize);
}
