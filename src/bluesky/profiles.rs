// Profile lookup — follower/following/post counts for an actor.

use anyhow::{Context, Result};
use atrium_api::app::bsky::actor::get_profile;

use super::client::PublicAtpClient;

/// The profile counts the scam checks reason about. Counts the API omits
/// are treated as zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct Profile {
    pub followers: u64,
    pub following: u64,
    pub posts: u64,
}

impl Profile {
    /// Construct a profile value directly — used by fixture-driven tests.
    pub fn new(followers: u64, following: u64, posts: u64) -> Self {
        Self {
            followers,
            following,
            posts,
        }
    }
}

/// Fetch the profile counts for an actor (handle or DID).
pub async fn fetch_profile(client: &PublicAtpClient, actor: &str) -> Result<Profile> {
    let output: get_profile::Output = client
        .xrpc_get("app.bsky.actor.getProfile", &[("actor", actor)])
        .await
        .with_context(|| format!("Failed to fetch profile for {actor}"))?;

    Ok(Profile {
        followers: output.followers_count.unwrap_or(0).max(0) as u64,
        following: output.follows_count.unwrap_or(0).max(0) as u64,
        posts: output.posts_count.unwrap_or(0).max(0) as u64,
    })
}
