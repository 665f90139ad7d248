use reddit_client::RedditClient;
use research_core::{ForumSource, RedditCredentials, DEFAULT_USER_AGENT};
use std::io::{self, Write};

fn prompt(label: &str) -> io::Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("=== Reddit Hot Listing Check ===\n");
    println!("Create a 'script' app at https://www.reddit.com/prefs/apps and paste its id and secret.\n");

    let client_id = prompt("Reddit Client ID")?;
    let client_secret = prompt("Reddit Client Secret")?;
    if client_id.is_empty() || client_secret.is_empty() {
        println!("❌ Client ID and secret are required.");
        return Ok(());
    }

    let subreddit = match prompt("Subreddit [rust]")?.as_str() {
        "" => "rust".to_string(),
        other => other.to_string(),
    };

    let client = RedditClient::new(RedditCredentials::new(
        client_id,
        client_secret,
        DEFAULT_USER_AGENT.to_string(),
    ))?;

    println!("\n🔐 Requesting an app-only token...");
    if let Err(e) = client.authenticate().await {
        println!("❌ Authentication failed: {}", e);
        return Ok(());
    }
    println!("✅ Authenticated");

    println!("\n📰 Getting hot posts from r/{}...", subreddit);
    let posts = match client.hot_posts(&subreddit, 10).await {
        Ok(posts) => posts,
        Err(e) => {
            println!("❌ Failed to get posts: {}", e);
            return Ok(());
        }
    };
    println!("✅ Found {} posts:", posts.len());
    for (i, post) in posts.iter().enumerate() {
        println!("   {}. {} (Score: {})", i + 1, post.title, post.score);
    }

    if let Some(first) = posts.first() {
        println!("\n💬 Loaded comments on \"{}\":", first.title);
        match client.comments(first).await {
            Ok(comments) => {
                for comment in comments.iter().take(5) {
                    let preview: String = comment.body.chars().take(100).collect();
                    println!("   [{}] {}", comment.score, preview);
                }
                println!("   ({} comments loaded in total)", comments.len());
            }
            Err(e) => println!("❌ Failed to get comments: {}", e),
        }
    }

    Ok(())
}
