//! Loader for VMIL images.
//!
//! This crate:
//! - reads a VMIL image sequentially from a [`ByteStream`],
//! - validates every header-derived offset against the image size,
//! - hands back a runnable [`vm::VM`] that owns its memory region.

pub mod error;
pub mod loader;
pub mod stream;

pub use error::{HeaderField, LayoutViolation, LoadError};
pub use loader::{LoadConfig, Loader, HEADER_LEN};
pub use stream::{open_for_sequential_read, ByteStream, Chunk, FileStream, ReadStream};
