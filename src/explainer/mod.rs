//! Natural-language explanations of source code from a hosted language model

mod openai;

pub use openai::OpenAiExplainer;

use crate::error::ExplainError;
use crate::indexer::SourceLanguage;

/// Produces a natural-language explanation for a piece of source code
#[async_trait::async_trait]
pub trait Explainer: Send + Sync {
    /// Explain one function written in `language`. Exactly one model request per call.
    async fn explain(
        &self,
        func_text: &str,
        language: SourceLanguage,
    ) -> Result<String, ExplainError>;

    /// Get the model name
    fn model_name(&self) -> &str;
}

/// Build the instruction sent to the model for one function
pub fn build_prompt(language: &str, func_text: &str) -> String {
    format!(
        "You are an expert {} programmer, please explain the following code:\n{}",
        language, func_text
    )
}
