//! CLI commands module.

pub mod validate;

pub use validate::ValidateCommand;
