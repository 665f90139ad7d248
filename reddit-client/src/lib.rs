pub mod api;
pub mod auth;
pub mod cache;
pub mod client;
pub mod comments;


pub use cache::ClientCache;
pub use client::RedditClient;
