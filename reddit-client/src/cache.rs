use crate::RedditClient;
use research_core::{CoreError, RedditCredentials};
use std::sync::Arc;
use tracing::info;

/// Holds the client built for the most recent credential triple.
///
/// Asking for a different triple drops the old client (and its token) and
/// builds a new one.
#[derive(Debug, Default)]
pub struct ClientCache {
    entry: Option<(RedditCredentials, Arc<RedditClient>)>,
}

impl ClientCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create(
        &mut self,
        credentials: &RedditCredentials,
    ) -> Result<Arc<RedditClient>, CoreError> {
        if let Some((cached, client)) = &self.entry {
            if cached == credentials {
                return Ok(Arc::clone(client));
            }
            info!("Reddit credentials changed, rebuilding client");
        }

        let client = Arc::new(RedditClient::new(credentials.clone())?);
        self.entry = Some((credentials.clone(), Arc::clone(&client)));
        Ok(client)
    }

    pub fn contains(&self, credentials: &RedditCredentials) -> bool {
        matches!(&self.entry, Some((cached, _)) if cached == credentials)
    }

    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            info!("Reddit client cache invalidated");
        }
    }
}
