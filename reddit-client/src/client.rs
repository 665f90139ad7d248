use crate::api::{RedditApiClient, REDDIT_API_BASE};
use crate::auth::{AppOnlyAuth, REDDIT_TOKEN_URL};
use research_core::{CoreError, ForumComment, ForumPost, ForumSource, RedditCredentials};
use tracing::debug;

/// Reddit access for one credential triple: app-only auth plus the read
/// endpoints the collector needs.
#[derive(Debug)]
pub struct RedditClient {
    credentials: RedditCredentials,
    api: RedditApiClient,
    auth: AppOnlyAuth,
}

impl RedditClient {
    pub fn new(credentials: RedditCredentials) -> Result<Self, CoreError> {
        Self::with_endpoints(credentials, REDDIT_API_BASE, REDDIT_TOKEN_URL)
    }

    pub fn with_endpoints(
        credentials: RedditCredentials,
        api_base: &str,
        token_url: &str,
    ) -> Result<Self, CoreError> {
        let api = RedditApiClient::with_base_url(credentials.user_agent.clone(), api_base)?;
        let auth = AppOnlyAuth::new(&credentials, token_url, api.http_client().clone())?;

        debug!("Created Reddit client for {:?}", credentials);
        Ok(Self {
            credentials,
            api,
            auth,
        })
    }

    pub fn credentials(&self) -> &RedditCredentials {
        &self.credentials
    }

    pub async fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated().await
    }

    pub async fn authenticate(&self) -> Result<(), CoreError> {
        self.auth.access_token().await.map(|_| ())
    }
}

impl ForumSource for RedditClient {
    async fn hot_posts(&self, community: &str, limit: u32) -> Result<Vec<ForumPost>, CoreError> {
        let token = self.auth.access_token().await?;
        let posts = self.api.get_hot_posts(&token, community, limit).await?;
        Ok(posts.into_iter().map(ForumPost::from).collect())
    }

    async fn comments(&self, post: &ForumPost) -> Result<Vec<ForumComment>, CoreError> {
        let token = self.auth.access_token().await?;
        self.api.get_post_comments(&token, &post.id).await
    }
}
