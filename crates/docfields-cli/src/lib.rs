//! docfields CLI library.
//!
//! Configuration loading, provider selection and the batch entry point used
//! by the `docfields` binary.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;

pub use cli::Cli;
pub use config::Config;
pub use error::{CliError, Result};
