use std::fmt;
use std::io;

use thiserror::Error;

/// Header fields, in stream order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    ImageLength,
    VariableCount,
    ErrorDisplacement,
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HeaderField::ImageLength => "image length",
            HeaderField::VariableCount => "variable count",
            HeaderField::ErrorDisplacement => "error displacement",
        })
    }
}

/// Which layout rule an image broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutViolation {
    /// `variableCount * 8` exceeds the image length.
    VariableTableExceedsImage,
    /// `variableCount * 8 + errorDisplacement` is not below the image length.
    ErrorAddressOutOfBounds,
    /// The entry point is not inside the region.
    EntryPointOutOfBounds,
    /// The stream holds more code than fits after the entry point.
    CodeExceedsImage,
}

impl fmt::Display for LayoutViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LayoutViolation::VariableTableExceedsImage => "variable table exceeds image",
            LayoutViolation::ErrorAddressOutOfBounds => "error handler address out of bounds",
            LayoutViolation::EntryPointOutOfBounds => "entry point out of bounds",
            LayoutViolation::CodeExceedsImage => "code does not fit in image",
        })
    }
}

/// Reasons a load is aborted. Any memory allocated for the image is released.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unexpected end of stream while reading {field}")]
    UnexpectedEndOfStream { field: HeaderField },

    #[error("invalid image layout: {0}")]
    InvalidImageLayout(LayoutViolation),

    #[error("cannot allocate {requested} bytes for image")]
    AllocationFailure { requested: u64 },

    #[error("stream read failed: {0}")]
    Io(#[from] io::Error),
}
