//! Configuration loading, validation and types.

pub mod env;
pub mod lang;
pub mod parser;
pub mod types;
pub mod validate;

pub use lang::Lang;
pub use parser::{load_or_create_config, load_or_create_lang};
pub use types::*;
pub use validate::validate_config;
