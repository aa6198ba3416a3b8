//! docfields Extractor
//!
//! Turns OCR'd document records into structured field mappings using an LLM.
//!
//! # Overview
//!
//! For every record file under the input root the driver looks up the fields
//! expected for the record's doctype, asks the model for them, recovers a
//! mapping from whatever the model replied and writes the augmented record
//! under the output root.
//!
//! # Architecture
//!
//! ```text
//! record.json → LabelRegistry → PromptBuilder → LLM → recover → reconcile → output/record.json
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use docfields_domain::LabelRegistry;
//! use docfields_extractor::{BatchConfig, BatchDriver};
//! use docfields_llm::GeminiProvider;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = GeminiProvider::with_api_key("my-api-key")?;
//! let config = BatchConfig::new("copied_docs", "predictions");
//!
//! let driver = BatchDriver::new(llm, LabelRegistry::builtin(), config);
//! let report = driver.process_documents()?;
//!
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod batch;
mod config;
mod error;
mod extractor;
mod output;
mod parser;
mod prompt;
mod types;


pub use batch::BatchDriver;
pub use config::{BatchConfig, KeyPolicy};
pub use error::ExtractorError;
pub use extractor::FieldExtractor;
pub use parser::{reconcile, recover, Recovered, RecoveryStage};
pub use prompt::{build_prompt, PromptBuilder};
pub use types::{BatchReport, FileOutcome};
