// Post fetching — single-record retrieval via the public API.
//
// Converts a bsky.app post URL (or an at:// URI) into the typed post
// record, pulling out the fields the labeler needs: text, facet hyperlinks,
// and image blob references.

use anyhow::{Context, Result};
use atrium_api::app::bsky::feed::post::RecordEmbedRefs;
use atrium_api::app::bsky::richtext::facet::MainFeaturesItem;
use atrium_api::com::atproto::repo::get_record;
use atrium_api::types::{BlobRef, TryFromUnknown, TypedBlobRef, Union};
use tracing::debug;

use super::client::PublicAtpClient;

/// Reference to an image blob attached to a post.
///
/// Carries just enough to download the bytes later: the repo DID and the
/// blob CID. Download is deferred — the image check is the only consumer
/// and most posts never reach it with images attached.
#[derive(Debug, Clone)]
pub struct ImageBlob {
    pub did: String,
    pub cid: String,
}

/// A simplified post — just the fields the labeler needs for a decision.
///
/// `facet_links` holds the URL of every hyperlink facet feature in record
/// order; mention and hashtag facets are ignored. URLs appearing literally
/// in `text` are found later by evidence extraction, not here.
#[derive(Debug, Clone)]
pub struct Post {
    pub uri: String,
    pub text: String,
    pub facet_links: Vec<String>,
    pub images: Vec<ImageBlob>,
}

impl Post {
    /// Construct a post value directly — used by fixture-driven tests to
    /// exercise the decision engine without any network access.
    pub fn new(uri: &str, text: &str) -> Self {
        Self {
            uri: uri.to_string(),
            text: text.to_string(),
            facet_links: Vec::new(),
            images: Vec::new(),
        }
    }
}

/// Fetch the post identified by a bsky.app URL or at:// URI.
///
/// bsky.app URLs look like `https://bsky.app/profile/{actor}/post/{rkey}`;
/// the actor may be a handle (resolved to its DID first) or a DID. at://
/// URIs already carry the DID and rkey and skip resolution.
pub async fn post_from_url(client: &PublicAtpClient, url: &str) -> Result<Post> {
    let (repo, rkey) = parse_post_url(url)?;

    let repo = if repo.starts_with("did:") {
        repo
    } else {
        client.resolve_handle(&repo).await?
    };

    let output: get_record::Output = client
        .xrpc_get(
            "com.atproto.repo.getRecord",
            &[
                ("repo", repo.as_str()),
                ("collection", "app.bsky.feed.post"),
                ("rkey", rkey.as_str()),
            ],
        )
        .await
        .with_context(|| format!("Failed to fetch post record {repo}/{rkey}"))?;

    // The record field is an untyped IPLD value — deserialize it into the
    // typed post::Record to access text, facets, and embeds.
    let record =
        atrium_api::app::bsky::feed::post::Record::try_from_unknown(output.value.clone())
            .context("Failed to decode post record")?;

    let mut facet_links = Vec::new();
    for facet in record.data.facets.iter().flatten() {
        for feature in &facet.features {
            if let Union::Refs(MainFeaturesItem::Link(link)) = feature {
                facet_links.push(link.uri.clone());
            }
        }
    }

    let mut images = Vec::new();
    if let Some(Union::Refs(RecordEmbedRefs::AppBskyEmbedImagesMain(embed))) = &record.data.embed
    {
        for img in &embed.images {
            let cid = match &img.image {
                BlobRef::Typed(TypedBlobRef::Blob(blob)) => blob.r#ref.0.to_string(),
                BlobRef::Untyped(untyped) => untyped.cid.clone(),
            };
            images.push(ImageBlob {
                did: repo.clone(),
                cid,
            });
        }
    }

    debug!(
        uri = output.uri.as_str(),
        links = facet_links.len(),
        images = images.len(),
        "Fetched post record"
    );

    Ok(Post {
        uri: output.uri.clone(),
        text: record.data.text.clone(),
        facet_links,
        images,
    })
}

/// Split a post locator into (actor, rkey).
///
/// Accepts `https://bsky.app/profile/{actor}/post/{rkey}` and
/// `at://{did}/app.bsky.feed.post/{rkey}`.
fn parse_post_url(url: &str) -> Result<(String, String)> {
    if let Some(rest) = url.strip_prefix("at://") {
        let mut parts = rest.split('/');
        let did = parts.next().unwrap_or_default();
        let collection = parts.next().unwrap_or_default();
        let rkey = parts.next().unwrap_or_default();
        if did.is_empty() || collection != "app.bsky.feed.post" || rkey.is_empty() {
            anyhow::bail!("Not a post URI: {url}");
        }
        return Ok((did.to_string(), rkey.to_string()));
    }

    let segments: Vec<&str> = url
        .trim_end_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    // ["https:", "bsky.app", "profile", actor, "post", rkey]
    let profile_idx = segments
        .iter()
        .position(|s| *s == "profile")
        .ok_or_else(|| anyhow::anyhow!("Not a bsky.app post URL: {url}"))?;

    match segments.get(profile_idx + 1..profile_idx + 4) {
        Some([actor, "post", rkey]) => Ok((actor.to_string(), rkey.to_string())),
        _ => anyhow::bail!("Not a bsky.app post URL: {url}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bsky_app_url() {
        let (actor, rkey) =
            parse_post_url("https://bsky.app/profile/alice.bsky.social/post/3kabc").unwrap();
        assert_eq!(actor, "alice.bsky.social");
        assert_eq!(rkey, "3kabc");
    }

    #[test]
    fn parses_at_uri() {
        let (actor, rkey) =
            parse_post_url("at://did:plc:abc123/app.bsky.feed.post/3kxyz").unwrap();
        assert_eq!(actor, "did:plc:abc123");
        assert_eq!(rkey, "3kxyz");
    }

    #[test]
    fn rejects_non_post_url() {
        assert!(parse_post_url("https://bsky.app/profile/alice.bsky.social").is_err());
        assert!(parse_post_url("at://did:plc:abc/app.bsky.graph.follow/3k").is_err());
    }
}
