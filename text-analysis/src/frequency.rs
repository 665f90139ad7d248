use research_core::{FrequencyTable, InsightRecord, TokenCount};
use std::collections::HashMap;
use tracing::debug;

pub const TOP_TOKENS: usize = 20;

/// Counts whitespace-separated tokens across the records' original text and
/// returns the most frequent ones. Ties keep first-appearance order.
pub fn aggregate(records: &[InsightRecord]) -> FrequencyTable {
    let joined = records
        .iter()
        .map(|record| record.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    top_tokens(joined.split_whitespace(), TOP_TOKENS)
}

pub fn top_tokens<'a>(tokens: impl IntoIterator<Item = &'a str>, limit: usize) -> FrequencyTable {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut table: Vec<TokenCount> = Vec::new();

    for token in tokens {
        match positions.get(token) {
            Some(&index) => table[index].count += 1,
            None => {
                positions.insert(token, table.len());
                table.push(TokenCount {
                    token: token.to_string(),
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable, so equal counts stay in first-seen order
    debug!("Counted {} distinct tokens", table.len());
    table.sort_by(|a, b| b.count.cmp(&a.count));
    table.truncate(limit);
    table
}
