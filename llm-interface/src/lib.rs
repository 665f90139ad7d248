pub mod openai;
pub mod summary;


use research_core::CoreError;
use std::future::Future;

pub use openai::{OpenAiProvider, OPENAI_MODEL};
pub use summary::{build_prompt, summarize, NO_DATA_MESSAGE, SAMPLE_SIZE};

pub trait LlmProvider {
    fn name(&self) -> &str;

    /// Sends `prompt` as a single user turn and returns the raw reply text.
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String, CoreError>> + Send;
}
