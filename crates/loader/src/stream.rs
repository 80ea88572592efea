use std::fs::File;
use std::io::{self, BufReader, ErrorKind, Read};
use std::path::Path;

/// Result of a fixed-size read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chunk {
    /// The buffer was filled completely.
    Full,
    /// The stream ended before the buffer was filled.
    EndOfStream,
}

/// Sequential byte source handed to the loader by the file layer.
///
/// The loader only ever reads forward; there is no seeking.
pub trait ByteStream {
    /// Fills `buf` completely, or reports `EndOfStream` if the stream runs out first.
    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<Chunk>;

    /// Releases the underlying handle. Further reads report `EndOfStream`.
    fn close(&mut self) {}
}

/// Adapts any [`Read`] into a [`ByteStream`].
#[derive(Debug)]
pub struct ReadStream<R> {
    inner: Option<R>,
}

impl<R: Read> ReadStream<R> {
    pub fn new(inner: R) -> Self {
        Self { inner: Some(inner) }
    }
}

impl<R: Read> ByteStream for ReadStream<R> {
    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<Chunk> {
        let Some(inner) = self.inner.as_mut() else {
            return Ok(Chunk::EndOfStream);
        };
        match inner.read_exact(buf) {
            Ok(()) => Ok(Chunk::Full),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(Chunk::EndOfStream),
            Err(e) => Err(e),
        }
    }

    fn close(&mut self) {
        self.inner = None;
    }
}

pub type FileStream = ReadStream<BufReader<File>>;

/// Opens `path` for a single forward pass.
pub fn open_for_sequential_read(path: impl AsRef<Path>) -> io::Result<FileStream> {
    let file = File::open(path.as_ref())?;
    Ok(ReadStream::new(BufReader::new(file)))
}
