pub mod invoker;
pub mod parse;
pub mod prompt;
pub mod provider;
pub mod providers;

pub use invoker::{GenerationFailure, GenerationInvoker};
pub use parse::{parse_and_validate, ParseFailure};
pub use provider::{LlmError, LlmProvider, Message, Role};
