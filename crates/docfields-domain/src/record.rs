//! Record module - the per-document input and output files

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Mapping from field name to extracted value for one document.
///
/// Values are JSON values rather than plain strings so that a model reply can
/// be passed through verbatim when key reconciliation is disabled. After
/// reconciliation every value is a string.
pub type ExtractionResult = Map<String, Value>;

/// A document as produced by the upstream OCR step
///
/// # Examples
///
/// ```
/// use docfields_domain::DocumentRecord;
///
/// let record: DocumentRecord = serde_json::from_str(
///     r#"{"id": "1", "doctype": "passport", "text": "Passport of Ali Khan"}"#,
/// ).unwrap();
/// assert_eq!(record.doctype, "passport");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Document identifier, copied unchanged into the output
    pub id: String,

    /// Document type; a missing value never matches a registry entry
    #[serde(default)]
    pub doctype: String,

    /// Raw OCR text
    #[serde(default)]
    pub text: String,
}

/// A document record augmented with the model's extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    /// Document identifier
    pub id: String,

    /// Document type
    pub doctype: String,

    /// Raw OCR text
    pub text: String,

    /// Extracted fields
    pub response: ExtractionResult,
}

impl OutputRecord {
    /// Combine an input record with its extraction result
    pub fn from_document(document: DocumentRecord, response: ExtractionResult) -> Self {
        Self {
            id: document.id,
            doctype: document.doctype,
            text: document.text,
            response,
        }
    }
}
