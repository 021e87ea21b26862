// Image blob downloads for the reference-image match check.
//
// Blobs live on the author's own PDS, not the AppView, so the repo DID is
// resolved through plc.directory first. All of a post's images share one
// repo, so the PDS is resolved once per post.

use anyhow::Result;
use tracing::warn;

use super::client::PublicAtpClient;
use super::posts::Post;

/// Download the raw bytes of every image attached to a post.
///
/// A single failed download is skipped with a warning rather than failing
/// the batch — the image check treats each payload independently.
pub async fn fetch_post_images(client: &PublicAtpClient, post: &Post) -> Result<Vec<Vec<u8>>> {
    let Some(first) = post.images.first() else {
        return Ok(Vec::new());
    };

    let pds_url = client.resolve_pds_url(&first.did).await?;

    let mut payloads = Vec::with_capacity(post.images.len());
    for blob in &post.images {
        match client.fetch_blob(&pds_url, &blob.did, &blob.cid).await {
            Ok(bytes) => payloads.push(bytes),
            Err(e) => {
                warn!(cid = blob.cid.as_str(), error = %e, "Skipping image blob");
            }
        }
    }

    Ok(payloads)
}
