// Scam detection — the weighted-threshold combinator.
//
// Five independent scoring checks, every one always evaluated (no
// cross-check short-circuit, so each contribution is visible in the
// breakdown). The scam label requires the summed score to reach the
// threshold AND at least one URL in the post — suspicious wording that
// links nowhere is not a URL scam.

use anyhow::Result;
use serde::Serialize;
use tracing::warn;

use crate::bluesky::client::PublicAtpClient;
use crate::bluesky::posts::Post;
use crate::bluesky::profiles::{self, Profile};
use crate::evidence::{normalize_url, Evidence};
use crate::reference::ReferenceLists;

/// Label applied when the combined scam score crosses the threshold.
pub const SCAM_LABEL: &str = "Potential URL scam post";

/// Minimum combined score for the scam label.
pub const SCAM_THRESHOLD: u32 = 5;

/// Per-check scores for one decision, kept for observability.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScamBreakdown {
    pub profile: u32,
    pub emoji: u32,
    pub language: u32,
    pub malicious_url: u32,
    pub shortener: u32,
    /// Structural precondition: the post carries at least one URL.
    pub has_url: bool,
}

impl ScamBreakdown {
    pub fn total(&self) -> u32 {
        self.profile + self.emoji + self.language + self.malicious_url + self.shortener
    }

    /// The label decision for this breakdown: threshold AND precondition.
    pub fn labels(&self) -> Vec<String> {
        if self.total() >= SCAM_THRESHOLD && self.has_url {
            vec![SCAM_LABEL.to_string()]
        } else {
            Vec::new()
        }
    }
}

/// Run the scam combinator and return its labels.
pub async fn run(
    client: &PublicAtpClient,
    reference: &ReferenceLists,
    post: &Post,
    ev: &Evidence,
) -> Vec<String> {
    breakdown(client, reference, post, ev).await.labels()
}

/// Compute every check's score. The profile lookup is the only fallible
/// step; a failure degrades that check to zero rather than aborting the
/// decision.
pub async fn breakdown(
    client: &PublicAtpClient,
    reference: &ReferenceLists,
    post: &Post,
    ev: &Evidence,
) -> ScamBreakdown {
    let profile = match lookup_author_profile(client, &post.uri).await {
        Ok(profile) => score_profile(&profile),
        Err(e) => {
            warn!(uri = post.uri.as_str(), error = %e, "Profile lookup failed; profile score is 0");
            0
        }
    };

    ScamBreakdown {
        profile,
        emoji: score_emoji_density(ev.emoji_count),
        language: score_language(reference, ev),
        malicious_url: score_malicious_urls(reference, ev),
        shortener: score_shorteners(reference, ev),
        has_url: !ev.urls.is_empty(),
    }
}

async fn lookup_author_profile(client: &PublicAtpClient, uri: &str) -> Result<Profile> {
    let did = author_did(uri)
        .ok_or_else(|| anyhow::anyhow!("No author DID in post URI {uri}"))?;
    profiles::fetch_profile(client, did).await
}

/// The post author's DID: the second path segment of the at:// URI
/// (`at://did:plc:xxx/app.bsky.feed.post/rkey`).
pub fn author_did(uri: &str) -> Option<&str> {
    uri.split('/').nth(2).filter(|s| !s.is_empty())
}

/// Profile-shape score: four independent sub-rules on the author's counts,
/// all evaluated, summed.
pub fn score_profile(profile: &Profile) -> u32 {
    let Profile {
        followers,
        following,
        posts,
    } = *profile;
    let mut score = 0;

    // (a) Mass-following: following many with almost no followers.
    let follow_ratio = (following + 1) / (followers + 1);
    if follow_ratio >= 10 {
        score += 3;
    } else if follow_ratio >= 5 {
        score += 2;
    }

    // (b) Poor follow-back: nobody follows them back.
    if following > 50 && (followers as f64) / (following as f64) < 0.1 {
        score += 2;
    }

    // (c) Posts per follower: churning out posts nobody reads.
    let posts_per_follower = posts as f64 / followers.max(1) as f64;
    if posts_per_follower >= 100.0 {
        score += 3;
    } else if posts_per_follower >= 40.0 {
        score += 2;
    } else if posts_per_follower >= 10.0 {
        score += 1;
    }

    // (d) High-volume spam: large post counts into a void.
    if posts >= 100 && followers < 5 {
        score += 3;
    } else if posts >= 50 && followers < 10 {
        score += 2;
    } else if posts >= 20 && followers < 5 {
        score += 1;
    }

    score
}

/// Emoji-density score: 0 for ≤2 emoji, 1 for 3–4, 2 for ≥5.
pub fn score_emoji_density(emoji_count: u32) -> u32 {
    match emoji_count {
        0..=2 => 0,
        3..=4 => 1,
        _ => 2,
    }
}

/// Suspicious-language score, capped at 3.
///
/// Any high-severity phrase scores 3 immediately and skips the rest of the
/// check, hashtag scoring included. Otherwise the score is the number of
/// matching medium-severity phrases plus the hashtag count, capped at 3.
pub fn score_language(reference: &ReferenceLists, ev: &Evidence) -> u32 {
    for phrase in &reference.high_sus_phrases {
        if ev.lower_text.contains(phrase.as_str()) {
            return 3;
        }
    }

    let medium_matches = reference
        .medium_sus_phrases
        .iter()
        .filter(|phrase| ev.lower_text.contains(phrase.as_str()))
        .count() as u32;

    (medium_matches + ev.hashtag_count).min(3)
}

/// Malicious-URL score: 3 if any extracted URL contains a known-malicious
/// fragment after normalization; else 0.
pub fn score_malicious_urls(reference: &ReferenceLists, ev: &Evidence) -> u32 {
    let hit = ev.urls.iter().any(|url| {
        let normalized = normalize_url(url);
        reference
            .malicious_url_fragments
            .iter()
            .any(|fragment| normalized.contains(fragment.as_str()))
    });
    if hit {
        3
    } else {
        0
    }
}

/// Shortened-URL score: 2 if any extracted URL contains a known shortener
/// domain; else 0.
pub fn score_shorteners(reference: &ReferenceLists, ev: &Evidence) -> u32 {
    let hit = ev.urls.iter().any(|url| {
        let normalized = normalize_url(url);
        reference
            .shortener_domains
            .iter()
            .any(|domain| normalized.contains(domain.as_str()))
    });
    if hit {
        2
    } else {
        0
    }
}
