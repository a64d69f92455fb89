//! Command implementations.

pub mod config;
pub mod extract;
pub mod fields;
pub mod summarize;

pub use self::config::execute_config;
pub use self::extract::execute_extract;
pub use self::fields::execute_fields;
pub use self::summarize::execute_summarize;
