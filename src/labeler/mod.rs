// Label decision — the public surface of the moderation engine.
//
// A Labeler owns the API client and a read-only reference data store. Each
// decision fetches the post, extracts evidence once, runs the safety/news
// combinator and the scam combinator independently, and concatenates their
// label outputs (safety first). Duplicates are preserved; an empty result
// means "no policy violated".

pub mod safety;
pub mod scam;

use anyhow::Result;
use tracing::info;

use crate::bluesky::client::PublicAtpClient;
use crate::bluesky::posts;
use crate::evidence;
use crate::reference::ReferenceLists;

pub use scam::ScamBreakdown;

/// The moderation engine. Construct once; safe to share across concurrent
/// decisions — every field is read-only after construction.
pub struct Labeler {
    client: PublicAtpClient,
    reference: ReferenceLists,
}

impl Labeler {
    pub fn new(client: PublicAtpClient, reference: ReferenceLists) -> Self {
        Self { client, reference }
    }

    /// Moderate the post identified by a bsky.app URL or at:// URI.
    ///
    /// Returns the ordered, possibly-empty, possibly-duplicated sequence of
    /// policy labels. Lookup failures inside individual checks degrade that
    /// check to its neutral score; only failing to fetch the post itself is
    /// an error.
    pub async fn moderate_post(&self, url: &str) -> Result<Vec<String>> {
        let post = posts::post_from_url(&self.client, url).await?;
        let ev = evidence::extract(&post);

        let mut labels = safety::run(&self.client, &self.reference, &post, &ev).await;
        labels.extend(scam::run(&self.client, &self.reference, &post, &ev).await);

        info!(
            uri = post.uri.as_str(),
            labels = ?labels,
            "Moderated post"
        );

        Ok(labels)
    }

    /// Like `moderate_post`, but also returns the scam score breakdown so
    /// callers can see how far a post was from the threshold.
    pub async fn explain_post(&self, url: &str) -> Result<(Vec<String>, ScamBreakdown)> {
        let post = posts::post_from_url(&self.client, url).await?;
        let ev = evidence::extract(&post);

        let mut labels = safety::run(&self.client, &self.reference, &post, &ev).await;
        let breakdown = scam::breakdown(&self.client, &self.reference, &post, &ev).await;
        labels.extend(breakdown.labels());

        Ok((labels, breakdown))
    }
}
