//! Answer generator trait for producing grounded free-text answers.

use async_trait::async_trait;

use crate::error::Result;

/// An external language model that turns a composed prompt into an answer.
///
/// Implementations wrap a specific completion backend. Provider failures
/// surface as [`QaError::Generation`](crate::QaError::Generation); a blank
/// response is treated by the orchestrator as a generation failure, never as
/// a valid empty answer.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// The provider name, used in logs and error messages.
    fn name(&self) -> &str;

    /// Generate an answer for the given prompt at the given sampling
    /// temperature.
    ///
    /// The engine supplies the temperature from
    /// [`QaConfig`](crate::QaConfig); providers that cannot honor it may
    /// ignore it.
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String>;
}
