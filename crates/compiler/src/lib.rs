pub mod assembler;
pub use assembler::*;

pub mod image;
pub use image::*;
