//! Single-document extraction: prompt, remote call, recovery

use crate::config::KeyPolicy;
use crate::error::ExtractorError;
use crate::parser::{reconcile, recover, Recovered, RecoveryStage};
use crate::prompt::PromptBuilder;
use docfields_domain::traits::LlmProvider;
use docfields_domain::DocumentRecord;
use tracing::{debug, warn};

/// Extracts the labelled fields of one document through an LLM
pub struct FieldExtractor<L> {
    llm_provider: L,
    key_policy: KeyPolicy,
}

impl<L> FieldExtractor<L>
where
    L: LlmProvider,
    L::Error: std::fmt::Display,
{
    /// Create a new FieldExtractor
    pub fn new(llm_provider: L, key_policy: KeyPolicy) -> Self {
        Self {
            llm_provider,
            key_policy,
        }
    }

    /// Extract `keys` from `document`
    ///
    /// # Errors
    ///
    /// Only a failed remote call is an error; an unusable reply degrades to
    /// empty fields.
    pub fn extract(
        &self,
        document: &DocumentRecord,
        keys: &[String],
    ) -> Result<Recovered, ExtractorError> {
        let prompt = PromptBuilder::new(&document.text, &document.doctype, keys).build();
        debug!("Prompt length: {} chars", prompt.len());

        let reply = self
            .llm_provider
            .generate(&prompt)
            .map_err(|e| ExtractorError::Llm(e.to_string()))?;
        debug!("LLM response length: {} chars", reply.len());

        let mut recovered = recover(&reply, keys);
        if recovered.stage != RecoveryStage::Strict {
            warn!(
                "Reply for document '{}' was not a bare JSON object ({:?} recovery)",
                document.id, recovered.stage
            );
        }

        if self.key_policy == KeyPolicy::Reconcile {
            recovered.fields = reconcile(recovered.fields, keys);
        }
        Ok(recovered)
    }
}
