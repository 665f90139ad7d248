use crate::comments::{flatten_comments, CommentNode};
use research_core::{CoreError, ForumComment, ForumPost, RedditApiError};
use reqwest::{Client, Response, StatusCode};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use url::Url;

pub const REDDIT_API_BASE: &str = "https://oauth.reddit.com/";

/// Reddit caps a single listing page at 100 items.
const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditListing<C> {
    pub kind: String,
    pub data: RedditListingData<C>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditListingData<C> {
    pub children: Vec<C>,
    pub after: Option<String>,
    pub before: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditListingChild<T> {
    pub kind: String,
    pub data: T,
}

pub type PostListing = RedditListing<RedditListingChild<RedditPostData>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditPostData {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    pub subreddit: String,
    pub url: String,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub num_comments: u32,
    #[serde(default)]
    pub stickied: bool,
    #[serde(default)]
    pub is_self: bool,
}

#[derive(Debug)]
pub struct RedditApiClient {
    http_client: Client,
    api_base: Url,
    user_agent: String,
}

impl RedditApiClient {
    pub fn new(user_agent: String) -> Result<Self, CoreError> {
        Self::with_base_url(user_agent, REDDIT_API_BASE)
    }

    pub fn with_base_url(user_agent: String, api_base: &str) -> Result<Self, CoreError> {
        let api_base = parse_base_url(api_base)?;

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http_client,
            api_base,
            user_agent,
        })
    }

    pub fn http_client(&self) -> &Client {
        &self.http_client
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub async fn make_request(
        &self,
        endpoint: &str,
        access_token: &str,
        query_params: &[(&str, &str)],
    ) -> Result<Response, CoreError> {
        let url = self.api_base.join(endpoint).map_err(|e| CoreError::InvalidInput {
            message: format!("invalid endpoint {}: {}", endpoint, e),
        })?;
        let start_time = Instant::now();

        info!("Making Reddit API request: GET {}", endpoint);
        let response = self
            .http_client
            .get(url)
            .bearer_auth(access_token)
            .query(&[("raw_json", "1")])
            .query(query_params)
            .send()
            .await
            .map_err(|e| {
                error!("Network error for GET {}: {}", endpoint, e);
                if e.is_timeout() {
                    CoreError::RedditApi(RedditApiError::RequestTimeout)
                } else {
                    CoreError::Network(e)
                }
            })?;

        let status = response.status();
        debug!(
            "GET {} answered {} in {:?}",
            endpoint,
            status,
            start_time.elapsed()
        );

        if status.is_success() {
            return Ok(response);
        }

        error!("Request failed with status: {} for {}", status, endpoint);
        Err(CoreError::RedditApi(status_error(&response, endpoint)))
    }

    pub async fn get_subreddit_posts(
        &self,
        access_token: &str,
        subreddit: &str,
        limit: u32,
        after: Option<&str>,
    ) -> Result<PostListing, CoreError> {
        let endpoint = format!("r/{}/hot", subreddit_path(subreddit));
        let limit_str = limit.to_string();
        let mut params = vec![("limit", limit_str.as_str())];
        if let Some(after_val) = after {
            params.push(("after", after_val));
        }

        let response = self
            .make_request(&endpoint, access_token, &params)
            .await
            .map_err(|e| match e {
                CoreError::RedditApi(RedditApiError::UnexpectedStatus {
                    status_code: 404, ..
                }) => CoreError::RedditApi(RedditApiError::SubredditNotFound {
                    subreddit: subreddit.to_string(),
                }),
                other => other,
            })?;

        let listing: PostListing = response.json().await.map_err(|e| {
            error!("Failed to parse subreddit posts: {}", e);
            CoreError::RedditApi(RedditApiError::InvalidResponse {
                details: format!("Failed to parse posts for r/{}", subreddit),
            })
        })?;

        debug!(
            "Retrieved {} posts from r/{}",
            listing.data.children.len(),
            subreddit
        );
        Ok(listing)
    }

    /// Walks the hot listing page by page until `limit` posts are gathered or
    /// the listing runs out.
    pub async fn get_hot_posts(
        &self,
        access_token: &str,
        subreddit: &str,
        limit: u32,
    ) -> Result<Vec<RedditPostData>, CoreError> {
        let wanted = limit as usize;
        let mut posts = Vec::with_capacity(wanted);
        let mut after: Option<String> = None;

        while posts.len() < wanted {
            let page_size = (wanted - posts.len()).min(MAX_PAGE_SIZE as usize) as u32;
            let listing = self
                .get_subreddit_posts(access_token, subreddit, page_size, after.as_deref())
                .await?;

            let received = listing.data.children.len();
            posts.extend(listing.data.children.into_iter().map(|child| child.data));

            match listing.data.after {
                Some(next) if received > 0 => after = Some(next),
                _ => break,
            }
        }

        posts.truncate(wanted);
        info!("Retrieved {} hot posts from r/{}", posts.len(), subreddit);
        Ok(posts)
    }

    /// Fetches a post's comment tree as already loaded by Reddit and flattens
    /// it breadth-first. `more` placeholders are discarded.
    pub async fn get_post_comments(
        &self,
        access_token: &str,
        post_id: &str,
    ) -> Result<Vec<ForumComment>, CoreError> {
        let endpoint = format!("comments/{}", post_id);
        let response = self.make_request(&endpoint, access_token, &[]).await?;

        let (_post, comments): (IgnoredAny, RedditListing<CommentNode>) =
            response.json().await.map_err(|e| {
                error!("Failed to parse comments for {}: {}", post_id, e);
                CoreError::RedditApi(RedditApiError::InvalidResponse {
                    details: format!("Failed to parse comments for post {}", post_id),
                })
            })?;

        let flattened = flatten_comments(comments.data.children);
        debug!("Post {} has {} loaded comments", post_id, flattened.len());
        Ok(flattened)
    }
}

fn status_error(response: &Response, endpoint: &str) -> RedditApiError {
    let status = response.status();
    match status {
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok())
                .unwrap_or(60);
            warn!("Rate limited, retry after {} seconds", retry_after);
            RedditApiError::RateLimitExceeded { retry_after }
        }
        StatusCode::UNAUTHORIZED => RedditApiError::InvalidToken,
        StatusCode::FORBIDDEN => RedditApiError::Forbidden {
            resource: endpoint.to_string(),
        },
        status if status.is_server_error() => RedditApiError::ServerError {
            status_code: status.as_u16(),
        },
        status => RedditApiError::UnexpectedStatus {
            status_code: status.as_u16(),
            endpoint: endpoint.to_string(),
        },
    }
}

fn parse_base_url(base: &str) -> Result<Url, CoreError> {
    let normalized = if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{}/", base)
    };
    Url::parse(&normalized).map_err(|e| CoreError::InvalidInput {
        message: format!("invalid base URL {}: {}", base, e),
    })
}

/// Accepts `rust`, `r/rust` and `/r/rust`.
fn subreddit_path(subreddit: &str) -> &str {
    let trimmed = subreddit.trim().trim_start_matches('/');
    trimmed
        .strip_prefix("r/")
        .unwrap_or(trimmed)
        .trim_end_matches('/')
}

impl From<RedditPostData> for ForumPost {
    fn from(post_data: RedditPostData) -> Self {
        Self {
            id: post_data.id,
            community: post_data.subreddit,
            title: post_data.title,
            selftext: if post_data.selftext.is_empty() {
                None
            } else {
                Some(post_data.selftext)
            },
            score: post_data.score,
            url: post_data.url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_data() -> RedditPostData {
        RedditPostData {
            id: "test123".to_string(),
            title: "Test Post".to_string(),
            selftext: "This is test content".to_string(),
            subreddit: "test".to_string(),
            url: "https://reddit.com/r/test/comments/test123".to_string(),
            permalink: "/r/test/comments/test123".to_string(),
            score: 42,
            num_comments: 5,
            stickied: false,
            is_self: true,
        }
    }

    #[test]
    fn test_api_client_creation() {
        let client = RedditApiClient::new("test-user-agent/1.0".to_string()).unwrap();
        assert_eq!(client.user_agent(), "test-user-agent/1.0");
        assert_eq!(client.api_base.as_str(), REDDIT_API_BASE);
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let client =
            RedditApiClient::with_base_url("ua".to_string(), "http://127.0.0.1:8080").unwrap();
        assert_eq!(
            client.api_base.join("r/rust/hot").unwrap().as_str(),
            "http://127.0.0.1:8080/r/rust/hot"
        );
        assert!(RedditApiClient::with_base_url("ua".to_string(), "not a url").is_err());
    }

    #[test]
    fn test_subreddit_path() {
        assert_eq!(subreddit_path("rust"), "rust");
        assert_eq!(subreddit_path("r/rust"), "rust");
        assert_eq!(subreddit_path(" /r/rust/ "), "rust");
    }

    #[test]
    fn test_forum_post_conversion() {
        let post: ForumPost = post_data().into();
        assert_eq!(post.id, "test123");
        assert_eq!(post.title, "Test Post");
        assert_eq!(post.selftext, Some("This is test content".to_string()));
        assert_eq!(post.score, 42);

        let mut link_post = post_data();
        link_post.selftext.clear();
        let post: ForumPost = link_post.into();
        assert_eq!(post.selftext, None);
    }

    #[test]
    fn test_listing_parsing_tolerates_missing_fields() {
        let json = r#"{
            "kind": "Listing",
            "data": {
                "after": "t3_b",
                "before": null,
                "children": [
                    {"kind": "t3", "data": {"id": "a", "title": "Hi", "subreddit": "test",
                     "url": "https://example.com", "score": 3, "extra": {"nested": true}}}
                ]
            }
        }"#;
        let listing: PostListing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.data.after.as_deref(), Some("t3_b"));
        assert_eq!(listing.data.children[0].data.selftext, "");
        assert_eq!(listing.data.children[0].data.score, 3);
    }
}
