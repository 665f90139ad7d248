use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub const DEFAULT_USER_AGENT: &str = "market_research_app";
pub const MIN_POST_LIMIT: u32 = 10;
pub const MAX_POST_LIMIT: u32 = 200;
pub const DEFAULT_POST_LIMIT: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordSource {
    Post,
    Comment,
}

impl fmt::Display for RecordSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordSource::Post => write!(f, "post"),
            RecordSource::Comment => write!(f, "comment"),
        }
    }
}

/// One matched post or comment. `text` is always the original, unnormalized
/// text as returned by the forum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightRecord {
    pub source: RecordSource,
    pub community: String,
    pub text: String,
    pub score: i64,
    pub url: String,
    pub sentiment: Option<f64>,
}

impl InsightRecord {
    pub fn post(community: &str, post: &ForumPost) -> Self {
        Self {
            source: RecordSource::Post,
            community: community.to_string(),
            text: post.title.clone(),
            score: post.score,
            url: post.url.clone(),
            sentiment: None,
        }
    }

    pub fn comment(community: &str, post: &ForumPost, comment: &ForumComment) -> Self {
        Self {
            source: RecordSource::Comment,
            community: community.to_string(),
            text: comment.body.clone(),
            score: comment.score,
            url: post.url.clone(),
            sentiment: None,
        }
    }

    pub fn with_sentiment(mut self, sentiment: f64) -> Self {
        self.sentiment = Some(sentiment);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ForumPost {
    pub id: String,
    pub community: String,
    pub title: String,
    pub selftext: Option<String>,
    pub score: i64,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct ForumComment {
    pub body: String,
    pub score: i64,
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

impl RedditCredentials {
    pub fn new(client_id: String, client_secret: String, user_agent: String) -> Self {
        Self {
            client_id,
            client_secret,
            user_agent,
        }
    }
}

// Keep the secret out of logs.
impl fmt::Debug for RedditCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedditCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub credentials: RedditCredentials,
    pub communities: Vec<String>,
    pub keywords: Vec<String>,
    pub post_limit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCount {
    pub token: String,
    pub count: usize,
}

pub type FrequencyTable = Vec<TokenCount>;

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub records: Vec<InsightRecord>,
    pub frequencies: FrequencyTable,
}

impl RunReport {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
