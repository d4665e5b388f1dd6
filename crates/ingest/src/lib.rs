pub mod classify;
pub mod document;

pub use classify::classify;
pub use document::{extract, ExtractionError};
