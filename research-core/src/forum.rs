use crate::{CoreError, ForumComment, ForumPost};
use std::future::Future;

/// Read-only access to a forum's hot listings and comment trees.
pub trait ForumSource {
    /// Up to `limit` posts from the community's hot listing, in listing order.
    fn hot_posts(
        &self,
        community: &str,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<ForumPost>, CoreError>> + Send;

    /// The post's already-loaded comments flattened in API order. Placeholder
    /// nodes for unloaded replies are dropped, never expanded.
    fn comments(
        &self,
        post: &ForumPost,
    ) -> impl Future<Output = Result<Vec<ForumComment>, CoreError>> + Send;
}
