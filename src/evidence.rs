// Evidence extraction — normalized facts derived from a raw post.
//
// Pure and infallible: anything that can't be computed defaults to
// empty/zero. All downstream checks read these fields instead of re-parsing
// the post.

use std::sync::OnceLock;

use regex_lite::Regex;

use crate::bluesky::posts::Post;

/// Normalized facts extracted from a single post.
#[derive(Debug, Clone, Default)]
pub struct Evidence {
    /// The post text, lowercased once for all case-insensitive matching.
    pub lower_text: String,
    /// Every URL attached to the post: text-scan hits first (left to
    /// right), then facet hyperlinks in record order. Not deduplicated —
    /// a URL present both literally and as a facet appears twice.
    pub urls: Vec<String>,
    /// Count of emoji characters (per character, not per grapheme cluster).
    pub emoji_count: u32,
    /// Count of literal `#` characters — a crude proxy for hashtag usage.
    pub hashtag_count: u32,
}

/// Extract evidence from a post. Never fails.
pub fn extract(post: &Post) -> Evidence {
    let lower_text = post.text.to_lowercase();

    let mut urls = scan_urls(&post.text);
    urls.extend(post.facet_links.iter().cloned());

    let emoji_count = post.text.chars().filter(|c| is_emoji(*c)).count() as u32;
    let hashtag_count = lower_text.matches('#').count() as u32;

    Evidence {
        lower_text,
        urls,
        emoji_count,
        hashtag_count,
    }
}

/// Find every http/https URL token in freeform text, left to right.
/// A token is the scheme followed by a run of non-whitespace characters.
pub fn scan_urls(text: &str) -> Vec<String> {
    static URL_RE: OnceLock<Regex> = OnceLock::new();
    let re = URL_RE.get_or_init(|| {
        // Infallible: the pattern is a compile-time constant.
        Regex::new(r"https?://\S+").unwrap()
    });

    re.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

/// Normalize a URL for containment checks: strip a leading http:// or
/// https:// scheme and lowercase the rest.
pub fn normalize_url(url: &str) -> String {
    let stripped = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    stripped.to_lowercase()
}

/// Whether a character belongs to the standard emoji repertoire.
///
/// Covers the major Unicode emoji blocks. Keycap bases, variation
/// selectors, and ZWJ are not counted — each emoji scalar in a cluster
/// counts individually.
pub fn is_emoji(c: char) -> bool {
    matches!(c as u32,
        0x1F300..=0x1F5FF // symbols & pictographs
        | 0x1F600..=0x1F64F // emoticons
        | 0x1F680..=0x1F6FF // transport & map
        | 0x1F900..=0x1F9FF // supplemental symbols
        | 0x1FA70..=0x1FAFF // extended-A
        | 0x1F1E6..=0x1F1FF // regional indicators
        | 0x2600..=0x26FF // miscellaneous symbols
        | 0x2700..=0x27BF // dingbats
        | 0x2B00..=0x2BFF // arrows, stars
    )
}
