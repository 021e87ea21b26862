// Unit tests for evidence extraction.
//
// Extraction is pure and infallible: these tests build Post values
// directly and check URL merge order, emoji counting, hashtag counting,
// and the empty-input defaults.

use sift::bluesky::posts::Post;
use sift::evidence::{extract, normalize_url, scan_urls};

// ============================================================
// URL extraction and merge order
// ============================================================

#[test]
fn text_urls_precede_facet_urls() {
    let mut post = Post::new("at://did:plc:x/app.bsky.feed.post/1", "go to https://a.example/1 now");
    post.facet_links.push("https://b.example/2".to_string());

    let ev = extract(&post);
    assert_eq!(ev.urls, vec!["https://a.example/1", "https://b.example/2"]);
}

#[test]
fn url_in_both_text_and_facet_is_not_deduplicated() {
    let mut post = Post::new("at://did:plc:x/app.bsky.feed.post/1", "see https://a.example/1");
    post.facet_links.push("https://a.example/1".to_string());

    let ev = extract(&post);
    assert_eq!(ev.urls.len(), 2);
}

#[test]
fn multiple_text_urls_left_to_right() {
    let urls = scan_urls("http://one.example/a then https://two.example/b then http://three.example/c");
    assert_eq!(
        urls,
        vec![
            "http://one.example/a",
            "https://two.example/b",
            "http://three.example/c",
        ]
    );
}

#[test]
fn url_token_runs_to_whitespace() {
    // The token pattern is crude on purpose: trailing punctuation sticks.
    let urls = scan_urls("link: https://a.example/path?q=1,2!");
    assert_eq!(urls, vec!["https://a.example/path?q=1,2!"]);
}

#[test]
fn no_urls_in_plain_text() {
    assert!(scan_urls("just had lunch, no links here").is_empty());
}

// ============================================================
// URL normalization
// ============================================================

#[test]
fn normalize_strips_scheme_and_lowercases() {
    assert_eq!(normalize_url("http://Bit.ly/XYZ"), "bit.ly/xyz");
    assert_eq!(normalize_url("https://SHORT.example/Q"), "short.example/q");
}

#[test]
fn normalize_leaves_schemeless_input_alone() {
    assert_eq!(normalize_url("evil.example/kit"), "evil.example/kit");
}

// ============================================================
// Emoji and hashtag counting
// ============================================================

#[test]
fn counts_each_emoji_character() {
    let post = Post::new("at://did:plc:x/app.bsky.feed.post/1", "wow 🚀💰🔥💎✨");
    let ev = extract(&post);
    assert_eq!(ev.emoji_count, 5);
}

#[test]
fn plain_text_has_no_emoji() {
    let post = Post::new("at://did:plc:x/app.bsky.feed.post/1", "just had lunch");
    let ev = extract(&post);
    assert_eq!(ev.emoji_count, 0);
}

#[test]
fn counts_literal_hash_characters() {
    let post = Post::new("at://did:plc:x/app.bsky.feed.post/1", "#crypto #win c# is a language");
    let ev = extract(&post);
    // Crude proxy: every '#' counts, hashtag syntax is not validated
    assert_eq!(ev.hashtag_count, 3);
}

// ============================================================
// Defaults
// ============================================================

#[test]
fn empty_post_yields_empty_evidence() {
    let post = Post::new("at://did:plc:x/app.bsky.feed.post/1", "");
    let ev = extract(&post);
    assert!(ev.lower_text.is_empty());
    assert!(ev.urls.is_empty());
    assert_eq!(ev.emoji_count, 0);
    assert_eq!(ev.hashtag_count, 0);
}

#[test]
fn lowercases_text_once_for_matching() {
    let post = Post::new("at://did:plc:x/app.bsky.feed.post/1", "Guaranteed PROFIT");
    let ev = extract(&post);
    assert_eq!(ev.lower_text, "guaranteed profit");
}
