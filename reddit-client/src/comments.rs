use crate::api::RedditListing;
use research_core::ForumComment;
use serde::{Deserialize, Deserializer};
use std::collections::VecDeque;
use tracing::debug;

/// A node of a Reddit comment forest: a loaded comment or a placeholder for
/// replies Reddit did not include.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum CommentNode {
    #[serde(rename = "t1")]
    Comment(RedditCommentData),
    #[serde(rename = "more")]
    More(MoreCommentsData),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditCommentData {
    pub id: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default, deserialize_with = "deserialize_replies")]
    pub replies: Option<Box<RedditListing<CommentNode>>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoreCommentsData {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub children: Vec<String>,
}

// Reddit sends `"replies": ""` for comments without replies.
fn deserialize_replies<'de, D>(
    deserializer: D,
) -> Result<Option<Box<RedditListing<CommentNode>>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Replies {
        Listing(Box<RedditListing<CommentNode>>),
        Empty(#[allow(dead_code)] String),
    }

    Ok(match Option::<Replies>::deserialize(deserializer)? {
        Some(Replies::Listing(listing)) => Some(listing),
        _ => None,
    })
}

/// Flattens a comment forest breadth-first: all top-level comments first,
/// then their replies level by level. Placeholders are dropped without
/// fetching what they stand for.
pub fn flatten_comments(nodes: Vec<CommentNode>) -> Vec<ForumComment> {
    let mut queue: VecDeque<CommentNode> = nodes.into();
    let mut flattened = Vec::new();
    let mut skipped = 0u32;

    while let Some(node) = queue.pop_front() {
        match node {
            CommentNode::Comment(mut comment) => {
                if let Some(replies) = comment.replies.take() {
                    queue.extend(replies.data.children);
                }
                flattened.push(ForumComment {
                    body: comment.body,
                    score: comment.score,
                });
            }
            CommentNode::More(more) => skipped += more.count,
        }
    }

    if skipped > 0 {
        debug!("Skipped {} unloaded comments behind placeholders", skipped);
    }
    flattened
}
