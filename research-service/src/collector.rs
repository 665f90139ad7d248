use research_core::{CoreError, ForumSource, InsightRecord};
use text_analysis::{contains_any_keyword, normalize};
use tracing::{debug, info};

/// Comments considered per post, taken from the front of the flattened list.
pub const MAX_COMMENTS_PER_POST: usize = 20;

/// Walks each community's hot listing in order and keeps the posts and
/// comments whose normalized text contains one of `keywords`.
///
/// Fetches are strictly sequential. The first forum error aborts the whole
/// collection; nothing gathered so far is returned.
pub async fn collect<S: ForumSource>(
    source: &S,
    communities: &[String],
    keywords: &[String],
    limit: u32,
) -> Result<Vec<InsightRecord>, CoreError> {
    let mut records = Vec::new();

    for community in communities {
        let posts = source.hot_posts(community, limit).await?;
        info!("Fetched {} hot posts from r/{}", posts.len(), community);
        let before = records.len();

        for post in &posts {
            let post_text = format!(
                "{} {}",
                post.title,
                post.selftext.as_deref().unwrap_or_default()
            );
            if contains_any_keyword(&normalize(&post_text), keywords) {
                records.push(InsightRecord::post(community, post));
            }

            let comments = source.comments(post).await?;
            for comment in comments.iter().take(MAX_COMMENTS_PER_POST) {
                if contains_any_keyword(&normalize(&comment.body), keywords) {
                    records.push(InsightRecord::comment(community, post, comment));
                }
            }
        }

        debug!(
            "r/{} contributed {} records",
            community,
            records.len() - before
        );
    }

    Ok(records)
}
