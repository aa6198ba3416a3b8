//! Parse LLM output into an extraction result
//!
//! Recovery is an ordered fallback chain: strict parse of the whole reply,
//! then a parse of the widest `{ ... }` span, then an all-empty result. A
//! malformed reply therefore never fails a document.

use docfields_domain::ExtractionResult;
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// Which step of the fallback chain produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryStage {
    /// The whole reply was a JSON object
    Strict,
    /// A JSON object was found inside surrounding text
    Lenient,
    /// Nothing parsed; every key maps to `""`
    Fallback,
}

/// A recovered reply together with how it was obtained
#[derive(Debug, Clone, PartialEq)]
pub struct Recovered {
    /// Field mapping
    pub fields: ExtractionResult,
    /// Stage that produced `fields`
    pub stage: RecoveryStage,
}

/// Why a recovery stage handed over to the next one
#[derive(Debug)]
enum StageFailure {
    Syntax(serde_json::Error),
    NotAnObject,
    NoBraceSpan,
}

impl fmt::Display for StageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageFailure::Syntax(e) => write!(f, "invalid JSON: {}", e),
            StageFailure::NotAnObject => write!(f, "JSON value is not an object"),
            StageFailure::NoBraceSpan => write!(f, "no {{...}} span in reply"),
        }
    }
}

/// Recover a field mapping from a raw model reply
///
/// A parsed object is returned as-is: it may lack some of `keys` or carry
/// extra ones. Use [`reconcile`] to force it onto the label set.
pub fn recover(response: &str, keys: &[String]) -> Recovered {
    let strict_failure = match parse_object(response) {
        Ok(fields) => {
            return Recovered {
                fields,
                stage: RecoveryStage::Strict,
            }
        }
        Err(e) => e,
    };
    debug!("Strict parse failed: {}", strict_failure);

    match brace_span(response).ok_or(StageFailure::NoBraceSpan).and_then(parse_object) {
        Ok(fields) => {
            return Recovered {
                fields,
                stage: RecoveryStage::Lenient,
            }
        }
        Err(e) => debug!("Lenient parse failed: {}", e),
    }

    Recovered {
        fields: empty_fields(keys),
        stage: RecoveryStage::Fallback,
    }
}

/// Force `fields` onto exactly `keys`, in label order
///
/// Missing keys become `""`, extra keys are dropped. Strings are kept,
/// `null` becomes `""` and any other value is rendered as compact JSON.
pub fn reconcile(mut fields: ExtractionResult, keys: &[String]) -> ExtractionResult {
    let mut reconciled = ExtractionResult::new();
    for key in keys {
        let value = match fields.remove(key) {
            Some(Value::String(s)) => s,
            Some(Value::Null) => String::new(),
            Some(other) => other.to_string(),
            None => {
                debug!("Reply is missing field '{}'", key);
                String::new()
            }
        };
        reconciled.insert(key.clone(), Value::String(value));
    }
    if !fields.is_empty() {
        let extras: Vec<&str> = fields.keys().map(String::as_str).collect();
        debug!("Dropping unexpected fields: {}", extras.join(", "));
    }
    reconciled
}

fn parse_object(text: &str) -> Result<ExtractionResult, StageFailure> {
    match serde_json::from_str::<Value>(text).map_err(StageFailure::Syntax)? {
        Value::Object(map) => Ok(map),
        _ => Err(StageFailure::NotAnObject),
    }
}

/// The widest span running from the first `{` to the last `}`
fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn empty_fields(keys: &[String]) -> ExtractionResult {
    keys.iter()
        .map(|k| (k.clone(), Value::String(String::new())))
        .collect()
}
