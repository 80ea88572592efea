use loader::{LayoutViolation, HEADER_LEN};
use thiserror::Error;
use types::{read_word_le, SerializeField, WORD_SIZE};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("image header arithmetic overflows")]
    Overflow,

    #[error("invalid image layout: {0}")]
    Layout(LayoutViolation),
}

/// The three header words at the start of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    pub image_len: u64,
    pub variables: u64,
    pub error_displacement: u64,
}

impl ImageHeader {
    /// Splits a raw image into its header and code. `None` if the header is short.
    pub fn parse(image: &[u8]) -> Option<(Self, &[u8])> {
        let header = Self {
            image_len: read_word_le(image, 0)?,
            variables: read_word_le(image, WORD_SIZE)?,
            error_displacement: read_word_le(image, 2 * WORD_SIZE)?,
        };
        Some((header, &image[HEADER_LEN..]))
    }
}

/// Wraps assembled code in an image header.
///
/// The builder refuses layouts the loader would reject, so every image it
/// produces loads.
#[derive(Debug, Clone)]
pub struct ImageBuilder {
    code: Vec<u8>,
    variables: u64,
    error_displacement: u64,
    image_len: Option<u64>,
}

impl ImageBuilder {
    pub fn new(code: Vec<u8>) -> Self {
        Self {
            code,
            variables: 0,
            error_displacement: 0,
            image_len: None,
        }
    }

    /// Number of 8-byte variable slots ahead of the code.
    pub fn variables(mut self, count: u64) -> Self {
        self.variables = count;
        self
    }

    /// Fault handler offset, relative to the entry point.
    pub fn error_displacement(mut self, displacement: u64) -> Self {
        self.error_displacement = displacement;
        self
    }

    /// Region size. Defaults to the smallest size that holds the variable
    /// table, the code plus one spare byte, and the error address.
    pub fn image_len(mut self, len: u64) -> Self {
        self.image_len = Some(len);
        self
    }

    pub fn build(&self) -> Result<Vec<u8>, ImageError> {
        let table = self
            .variables
            .checked_mul(WORD_SIZE as u64)
            .ok_or(ImageError::Overflow)?;
        let code_end = table
            .checked_add(self.code.len() as u64)
            .ok_or(ImageError::Overflow)?;
        let error = table
            .checked_add(self.error_displacement)
            .ok_or(ImageError::Overflow)?;

        let image_len = match self.image_len {
            Some(len) => len,
            None => code_end
                .max(error)
                .checked_add(1)
                .ok_or(ImageError::Overflow)?,
        };

        if table > image_len {
            return Err(ImageError::Layout(LayoutViolation::VariableTableExceedsImage));
        }
        if error >= image_len {
            return Err(ImageError::Layout(LayoutViolation::ErrorAddressOutOfBounds));
        }
        if code_end > image_len {
            return Err(ImageError::Layout(LayoutViolation::CodeExceedsImage));
        }

        let mut out = vec![0u8; HEADER_LEN + self.code.len()];
        let mut offset = 0;
        image_len.serialize_field(&mut out, &mut offset);
        self.variables.serialize_field(&mut out, &mut offset);
        self.error_displacement.serialize_field(&mut out, &mut offset);
        self.code.as_slice().serialize_field(&mut out, &mut offset);
        debug_assert_eq!(offset, out.len());

        tracing::debug!(
            image_len,
            variables = self.variables,
            error_displacement = self.error_displacement,
            code_len = self.code.len(),
            "image built"
        );
        Ok(out)
    }
}
