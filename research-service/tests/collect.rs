use research_core::{
    CoreError, ForumComment, ForumPost, ForumSource, RecordSource, RedditApiError,
    RedditCredentials, RunConfig,
};
use research_service::{collect, PreparedRun, MAX_COMMENTS_PER_POST};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use text_analysis::{contains_any_keyword, normalize};

#[derive(Default)]
struct FakeForum {
    posts: HashMap<String, Vec<ForumPost>>,
    comments: HashMap<String, Vec<ForumComment>>,
    missing: Vec<String>,
    listing_calls: AtomicUsize,
}

impl FakeForum {
    fn with_post(mut self, community: &str, post: ForumPost, comments: Vec<ForumComment>) -> Self {
        self.comments.insert(post.id.clone(), comments);
        self.posts.entry(community.to_string()).or_default().push(post);
        self
    }

    fn with_missing(mut self, community: &str) -> Self {
        self.missing.push(community.to_string());
        self
    }
}

impl ForumSource for FakeForum {
    async fn hot_posts(&self, community: &str, limit: u32) -> Result<Vec<ForumPost>, CoreError> {
        self.listing_calls.fetch_add(1, Ordering::SeqCst);
        if self.missing.iter().any(|m| m == community) {
            return Err(CoreError::RedditApi(RedditApiError::SubredditNotFound {
                subreddit: community.to_string(),
            }));
        }
        Ok(self
            .posts
            .get(community)
            .map(|posts| posts.iter().take(limit as usize).cloned().collect())
            .unwrap_or_default())
    }

    async fn comments(&self, post: &ForumPost) -> Result<Vec<ForumComment>, CoreError> {
        Ok(self.comments.get(&post.id).cloned().unwrap_or_default())
    }
}

fn post(id: &str, title: &str, selftext: Option<&str>, score: i64) -> ForumPost {
    ForumPost {
        id: id.to_string(),
        community: "test".to_string(),
        title: title.to_string(),
        selftext: selftext.map(str::to_string),
        score,
        url: format!("https://www.reddit.com/r/test/comments/{}/", id),
    }
}

fn comment(body: &str, score: i64) -> ForumComment {
    ForumComment {
        body: body.to_string(),
        score,
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[tokio::test]
async fn test_only_matching_posts_are_kept() {
    let forum = FakeForum::default()
        .with_post("test", post("a", "I have a problem with X", None, 5), vec![])
        .with_post("test", post("b", "Great day", None, 9), vec![]);

    let records = collect(&forum, &strings(&["test"]), &strings(&["problem"]), 50)
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.source, RecordSource::Post);
    assert_eq!(record.community, "test");
    assert_eq!(record.text, "I have a problem with X");
    assert_eq!(record.score, 5);
    assert_eq!(record.url, "https://www.reddit.com/r/test/comments/a/");
    assert_eq!(record.sentiment, None);
}

#[tokio::test]
async fn test_selftext_counts_for_matching_but_title_is_stored() {
    let forum = FakeForum::default().with_post(
        "test",
        post("a", "Weekly thread", Some("So FRUSTRATING, see https://problem.example"), 3),
        vec![],
    );

    let records = collect(&forum, &strings(&["test"]), &strings(&["frustrating"]), 50)
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text, "Weekly thread");

    let records = collect(&forum, &strings(&["test"]), &strings(&["problem"]), 50)
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_comments_capped_per_post() {
    let comments: Vec<ForumComment> = (0..25)
        .map(|i| comment(&format!("comment {} has a problem", i), i))
        .collect();
    let forum =
        FakeForum::default().with_post("test", post("a", "Nothing to see", None, 1), comments);

    let records = collect(&forum, &strings(&["test"]), &strings(&["problem"]), 50)
        .await
        .unwrap();

    assert_eq!(records.len(), MAX_COMMENTS_PER_POST);
    assert!(records.iter().all(|r| r.source == RecordSource::Comment));
    assert_eq!(records[0].text, "comment 0 has a problem");
    assert_eq!(records[19].text, "comment 19 has a problem");
    assert_eq!(records[19].score, 19);
    assert!(records
        .iter()
        .all(|r| r.url == "https://www.reddit.com/r/test/comments/a/"));
}

#[tokio::test]
async fn test_records_follow_community_and_listing_order() {
    let forum = FakeForum::default()
        .with_post(
            "first",
            post("a", "I wish it worked", None, 1),
            vec![comment("wish granted", 2), comment("no", 3)],
        )
        .with_post("second", post("b", "Another wish", None, 4), vec![]);

    let records = collect(
        &forum,
        &strings(&["first", "second"]),
        &strings(&["wish"]),
        50,
    )
    .await
    .unwrap();

    let texts: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, vec!["I wish it worked", "wish granted", "Another wish"]);
    assert_eq!(records[2].community, "second");
}

#[tokio::test]
async fn test_every_record_matches_a_keyword() {
    let keywords = strings(&["hate", "annoying"]);
    let forum = FakeForum::default()
        .with_post(
            "test",
            post("a", "I HATE this app", None, 1),
            vec![
                comment("So annoying!!!", 1),
                comment("Works for me", 1),
                comment("h-a-t-e", 1),
                comment("Check https://annoying.example", 1),
            ],
        )
        .with_post("test", post("b", "Love it", None, 1), vec![]);

    let records = collect(&forum, &strings(&["test"]), &keywords, 50)
        .await
        .unwrap();

    let texts: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, vec!["I HATE this app", "So annoying!!!", "h-a-t-e"]);
    for record in &records {
        assert!(contains_any_keyword(&normalize(&record.text), &keywords));
    }
}

#[tokio::test]
async fn test_first_error_aborts_collection() {
    let forum = FakeForum::default()
        .with_post("test", post("a", "a problem", None, 1), vec![])
        .with_missing("gone")
        .with_post("later", post("b", "another problem", None, 1), vec![]);

    let result = collect(
        &forum,
        &strings(&["test", "gone", "later"]),
        &strings(&["problem"]),
        50,
    )
    .await;

    assert!(matches!(
        result,
        Err(CoreError::RedditApi(RedditApiError::SubredditNotFound { .. }))
    ));
    assert_eq!(forum.listing_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_prepared_run_builds_report() {
    let forum = FakeForum::default().with_post(
        "test",
        post("a", "I hate this problem", None, 5),
        vec![comment("I love the fix for this problem", 2)],
    );
    let config = RunConfig {
        credentials: RedditCredentials::new(
            "id".to_string(),
            "secret".to_string(),
            "market_research_app".to_string(),
        ),
        communities: strings(&["test"]),
        keywords: strings(&["problem"]),
        post_limit: 50,
    };

    let run = PreparedRun::new(Arc::new(forum), config);
    let run_id = run.run_id();
    let report = run.execute().await.unwrap();

    assert_eq!(report.run_id, run_id);
    assert_eq!(report.records.len(), 2);
    assert!(report.records.iter().all(|r| r.sentiment.is_some()));
    assert!(report.records[0].sentiment < report.records[1].sentiment);
    assert!(report
        .frequencies
        .iter()
        .any(|t| t.token == "problem" && t.count == 2));
}

#[tokio::test]
async fn test_empty_run_has_no_frequencies() {
    let forum = FakeForum::default().with_post("test", post("a", "Great day", None, 1), vec![]);
    let config = RunConfig {
        credentials: RedditCredentials::new(
            "id".to_string(),
            "secret".to_string(),
            "market_research_app".to_string(),
        ),
        communities: strings(&["test"]),
        keywords: strings(&["problem"]),
        post_limit: 10,
    };

    let report = PreparedRun::new(Arc::new(forum), config)
        .execute()
        .await
        .unwrap();
    assert!(report.is_empty());
    assert!(report.frequencies.is_empty());
}
