//! Trait definitions for external interactions
//!
//! These traits define the boundary between the batch pipeline and the remote
//! model. Implementations live in `docfields-llm`.

/// Trait for LLM provider operations
///
/// Calls are blocking: the batch pipeline issues one request at a time and
/// waits for the reply before moving on.
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a text completion for the prompt
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;
}

impl<T: LlmProvider + ?Sized> LlmProvider for &T {
    type Error = T::Error;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        (**self).generate(prompt)
    }
}
