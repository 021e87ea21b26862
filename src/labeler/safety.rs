// Safety and news-source checks — the first-match combinator.
//
// Three independent checks, each first-match within itself, all three
// always evaluated. Their label outputs are concatenated in fixed order:
// trust-and-safety → news sources → image match.

use image_hasher::ImageHash;
use tracing::{debug, warn};

use crate::bluesky::client::PublicAtpClient;
use crate::bluesky::images;
use crate::bluesky::posts::Post;
use crate::evidence::Evidence;
use crate::imagehash;
use crate::reference::ReferenceLists;

/// Label applied when trust-and-safety keywords or domains match.
pub const T_AND_S_LABEL: &str = "t-and-s";

/// Label applied when a post image is a near-duplicate of the reference set.
pub const DOG_LABEL: &str = "dog";

/// Run all three safety/news checks and concatenate their labels.
pub async fn run(
    client: &PublicAtpClient,
    reference: &ReferenceLists,
    post: &Post,
    ev: &Evidence,
) -> Vec<String> {
    let mut labels = check_t_and_s(reference, &post.text, &ev.lower_text);
    labels.extend(check_news_sources(reference, &post.text));
    labels.extend(check_images(client, reference, post).await);
    labels
}

/// Objectionable-content check: any reference keyword in the lowercased
/// text, or any reference domain in the raw text, yields the label.
///
/// The domain half is case-sensitive on purpose — a differently-cased
/// domain does not match. First hit ends the scan.
pub fn check_t_and_s(reference: &ReferenceLists, raw_text: &str, lower_text: &str) -> Vec<String> {
    for word in &reference.t_and_s_words {
        if lower_text.contains(word.as_str()) {
            return vec![T_AND_S_LABEL.to_string()];
        }
    }
    for domain in &reference.t_and_s_domains {
        if raw_text.contains(domain.as_str()) {
            return vec![T_AND_S_LABEL.to_string()];
        }
    }
    Vec::new()
}

/// News-source attribution: one label per matching domain, in mapping
/// order. Not first-match — several domains can each contribute, and two
/// domains mapping to the same source produce a duplicate label.
pub fn check_news_sources(reference: &ReferenceLists, raw_text: &str) -> Vec<String> {
    reference
        .domain_to_source
        .iter()
        .filter(|(domain, _)| raw_text.contains(domain.as_str()))
        .map(|(_, source)| source.clone())
        .collect()
}

/// Image similarity check: download each attached image, fingerprint it,
/// and compare against every reference fingerprint. Any download or decode
/// failure degrades to "no label" — never to an error.
pub async fn check_images(
    client: &PublicAtpClient,
    reference: &ReferenceLists,
    post: &Post,
) -> Vec<String> {
    if post.images.is_empty() || reference.dog_fingerprints.is_empty() {
        return Vec::new();
    }

    let payloads = match images::fetch_post_images(client, post).await {
        Ok(payloads) => payloads,
        Err(e) => {
            warn!(uri = post.uri.as_str(), error = %e, "Image retrieval failed; skipping image check");
            return Vec::new();
        }
    };

    let mut fingerprints = Vec::with_capacity(payloads.len());
    for payload in &payloads {
        match imagehash::fingerprint(payload) {
            Ok(fp) => fingerprints.push(fp),
            Err(e) => {
                warn!(uri = post.uri.as_str(), error = %e, "Undecodable image; skipping payload");
            }
        }
    }

    if matches_reference(&fingerprints, &reference.dog_fingerprints) {
        debug!(uri = post.uri.as_str(), "Post image matched reference set");
        vec![DOG_LABEL.to_string()]
    } else {
        Vec::new()
    }
}

/// Whether any post fingerprint is within the match threshold (inclusive)
/// of any reference fingerprint. Stops at the first match.
pub fn matches_reference(post_fps: &[ImageHash], reference_fps: &[ImageHash]) -> bool {
    for post_fp in post_fps {
        for reference_fp in reference_fps {
            if imagehash::normalized_distance(post_fp, reference_fp) <= imagehash::MATCH_THRESHOLD
            {
                return true;
            }
        }
    }
    false
}
