use chrono::{DateTime, Utc};
use research_core::{InsightRecord, RunReport};
use text_analysis::{aggregate, polarity};
use tracing::debug;
use uuid::Uuid;

/// Attaches a polarity score to every record, computed from its original text.
pub fn score_sentiment(records: Vec<InsightRecord>) -> Vec<InsightRecord> {
    if records.is_empty() {
        return records;
    }

    debug!("Scoring sentiment for {} records", records.len());
    records
        .into_iter()
        .map(|record| {
            let score = polarity(&record.text);
            record.with_sentiment(score)
        })
        .collect()
}

pub fn build_report(
    run_id: Uuid,
    started_at: DateTime<Utc>,
    records: Vec<InsightRecord>,
) -> RunReport {
    let records = score_sentiment(records);
    let frequencies = if records.is_empty() {
        Vec::new()
    } else {
        aggregate(&records)
    };

    RunReport {
        run_id,
        started_at,
        records,
        frequencies,
    }
}
