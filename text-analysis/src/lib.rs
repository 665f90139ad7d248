//! Text processing for collected forum content: normalization and keyword
//! matching, polarity scoring and token frequency.

pub mod frequency;
pub mod normalize;
pub mod sentiment;

pub use frequency::{aggregate, top_tokens, TOP_TOKENS};
pub use normalize::{contains_any_keyword, normalize};
pub use sentiment::{polarity, SentimentScorer};
