use crate::LlmProvider;
use research_core::{CoreError, InsightRecord};
use tracing::info;

pub const NO_DATA_MESSAGE: &str = "No data to summarize.";

/// Records sent to the model, taken from the front in collection order.
pub const SAMPLE_SIZE: usize = 50;

const PROMPT_HEADER: &str = "Analyze the following Reddit user comments and extract:
1. Top 5 pain points
2. Key desires
3. Product opportunities
4. 5 ad hooks using their language

Data:
";

pub fn build_prompt<'a>(texts: impl IntoIterator<Item = &'a str>) -> String {
    let sample = texts.into_iter().collect::<Vec<_>>().join("\n");
    format!("{}{}", PROMPT_HEADER, sample)
}

/// Asks the model for pain points, desires, opportunities and ad hooks found
/// in the first [`SAMPLE_SIZE`] records. No request is made for an empty set.
pub async fn summarize<P: LlmProvider>(
    records: &[InsightRecord],
    provider: &P,
) -> Result<String, CoreError> {
    if records.is_empty() {
        return Ok(NO_DATA_MESSAGE.to_string());
    }

    let sample = &records[..records.len().min(SAMPLE_SIZE)];
    let prompt = build_prompt(sample.iter().map(|record| record.text.as_str()));

    info!(
        "Summarizing {} of {} records with {}",
        sample.len(),
        records.len(),
        provider.name()
    );
    provider.complete(&prompt).await
}
