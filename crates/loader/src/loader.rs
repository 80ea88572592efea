use types::{TaskId, WORD_SIZE};
use vm::{Layout, MemoryRegion, VM};

use crate::error::{HeaderField, LayoutViolation, LoadError};
use crate::stream::{ByteStream, Chunk, ReadStream};

/// Size of the fixed header: image length, variable count, error displacement.
pub const HEADER_LEN: usize = 3 * WORD_SIZE;

const DEFAULT_MAX_IMAGE_LEN: u64 = 16 * 1024 * 1024;

/// Limits applied while loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadConfig {
    /// Largest memory region an image may request.
    pub max_image_len: u64,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            max_image_len: DEFAULT_MAX_IMAGE_LEN,
        }
    }
}

/// Turns a VMIL byte stream into a runnable VM.
///
/// Image layout (all fields little-endian `u64`):
///
/// ```text
/// 0   image length         bytes to allocate for the memory region
/// 8   variable count       8-byte slots at the start of the region
/// 16  error displacement   fault handler offset from the entry point
/// 24  code                 copied to the entry point (variable count * 8)
/// ```
#[derive(Debug, Clone, Default)]
pub struct Loader {
    pub config: LoadConfig,
}

impl Loader {
    pub fn new(config: LoadConfig) -> Self {
        Self { config }
    }

    /// Reads one image from `stream` and builds an Active VM with priority 1.
    ///
    /// Header checks run in stream order, so a stream that is both short and
    /// malformed reports whichever problem comes first. On any error the
    /// partially built region is dropped.
    pub fn load<S>(&self, stream: &mut S, id: TaskId) -> Result<VM, LoadError>
    where
        S: ByteStream + ?Sized,
    {
        let image_len = read_field(stream, HeaderField::ImageLength)?;
        tracing::debug!(task = %id, image_len, "image header");
        if image_len == 0 || image_len > self.config.max_image_len {
            return Err(LoadError::AllocationFailure {
                requested: image_len,
            });
        }

        let var_count = read_field(stream, HeaderField::VariableCount)?;
        let table_len = var_count
            .checked_mul(WORD_SIZE as u64)
            .filter(|&len| len <= image_len)
            .ok_or(LoadError::InvalidImageLayout(
                LayoutViolation::VariableTableExceedsImage,
            ))?;
        tracing::debug!(task = %id, var_count, "variable table");

        let error_displacement = read_field(stream, HeaderField::ErrorDisplacement)?;
        let error = table_len
            .checked_add(error_displacement)
            .filter(|&addr| addr < image_len)
            .ok_or(LoadError::InvalidImageLayout(
                LayoutViolation::ErrorAddressOutOfBounds,
            ))?;
        tracing::debug!(task = %id, error_displacement, "error handler");

        let mut memory = allocate(image_len)?;
        let entry = table_len as usize;
        if !memory.contains(entry) {
            return Err(LoadError::InvalidImageLayout(
                LayoutViolation::EntryPointOutOfBounds,
            ));
        }

        let code_len = copy_code(stream, &mut memory, entry)?;
        tracing::debug!(task = %id, entry, code_len, "code loaded");

        let layout = Layout {
            var_count,
            entry,
            error: error as usize,
        };
        VM::new(id, memory, layout).ok_or(LoadError::InvalidImageLayout(
            LayoutViolation::EntryPointOutOfBounds,
        ))
    }

    /// Loads an image held in memory.
    pub fn load_bytes(&self, image: &[u8], id: TaskId) -> Result<VM, LoadError> {
        self.load(&mut ReadStream::new(image), id)
    }
}

fn read_field<S>(stream: &mut S, field: HeaderField) -> Result<u64, LoadError>
where
    S: ByteStream + ?Sized,
{
    let mut buf = [0u8; WORD_SIZE];
    match stream.read_exact(&mut buf)? {
        Chunk::Full => Ok(u64::from_le_bytes(buf)),
        Chunk::EndOfStream => Err(LoadError::UnexpectedEndOfStream { field }),
    }
}

fn allocate(image_len: u64) -> Result<MemoryRegion, LoadError> {
    let failure = LoadError::AllocationFailure {
        requested: image_len,
    };
    let len = match usize::try_from(image_len) {
        Ok(len) => len,
        Err(_) => return Err(failure),
    };
    MemoryRegion::try_zeroed(len).map_err(|_| failure)
}

/// Copies the rest of the stream into the region from `entry` on, one byte
/// at a time. A byte with no room left is a layout error, not a truncation.
fn copy_code<S>(stream: &mut S, memory: &mut MemoryRegion, entry: usize) -> Result<usize, LoadError>
where
    S: ByteStream + ?Sized,
{
    let mut target = entry;
    let mut byte = [0u8; 1];
    loop {
        match stream.read_exact(&mut byte)? {
            Chunk::EndOfStream => break,
            Chunk::Full => {
                if !memory.write_u8(target, byte[0]) {
                    return Err(LoadError::InvalidImageLayout(
                        LayoutViolation::CodeExceedsImage,
                    ));
                }
                target += 1;
            }
        }
    }
    Ok(target - entry)
}
