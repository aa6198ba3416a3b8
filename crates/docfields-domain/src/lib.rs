//! docfields Domain Layer
//!
//! Core types shared by every other crate in the workspace: the document
//! records read from and written to disk, the registry of expected fields per
//! document type, and the trait through which the remote model is called.
//!
//! ## Key Concepts
//!
//! - **Doctype**: a document category (e.g. `passport`) that selects which
//!   fields to extract
//! - **Label Registry**: the static table of doctype -> ordered field names
//! - **Extraction Result**: field name -> extracted value for one document
//! - **LLM Provider**: the opaque `generate(prompt) -> text` capability
//!
//! ## Architecture
//!
//! This crate holds no I/O and no network code. Infrastructure
//! implementations live in `docfields-llm` and `docfields-extractor`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod labels;
pub mod record;
pub mod traits;

// Re-exports for convenience
pub use labels::{LabelError, LabelRegistry};
pub use record::{DocumentRecord, ExtractionResult, OutputRecord};
