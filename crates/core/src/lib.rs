pub mod config;
pub mod document;
pub mod error;
pub mod records;
pub mod task;

pub use config::Config;
pub use document::*;
pub use error::*;
pub use records::*;
pub use task::*;
