//! papyrus-convert
//!
//! Document format conversion by shelling out to an office converter
//! (`unoconv`) or, for PDF sources, a dedicated PDF converter.

pub mod converter;
pub mod error;

pub use converter::{Converter, ConverterConfig, Invocation};
pub use error::ConvertError;
