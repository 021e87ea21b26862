// Reference data store — the immutable lists every check reads.
//
// Loaded once at startup from a directory of single- and two-column CSV
// files plus a directory of reference images. Construct-then-freeze: after
// `load` returns, nothing mutates these collections, so a shared reference
// is safe for unlimited concurrent decisions.
//
// Normalization happens here, at load time, so the checks can do plain
// substring containment: words and phrases are lowercased, malicious URL
// fragments are scheme-stripped and lowercased. Trust-and-safety domains
// are deliberately kept raw — that check matches case-sensitively.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use image_hasher::ImageHash;
use tracing::info;

use crate::evidence::normalize_url;
use crate::imagehash;

/// All reference collections, built once per process.
///
/// Fields are public so tests can build small fixture sets directly
/// instead of patching a loaded instance.
#[derive(Default)]
pub struct ReferenceLists {
    /// Lowercased trust-and-safety keywords, matched against lowercased text.
    pub t_and_s_words: Vec<String>,
    /// Trust-and-safety domains, matched case-sensitively against raw text.
    pub t_and_s_domains: Vec<String>,
    /// News domain → source label, in file order.
    pub domain_to_source: Vec<(String, String)>,
    /// Lowercased high-severity scam phrases.
    pub high_sus_phrases: Vec<String>,
    /// Lowercased medium-severity scam phrases.
    pub medium_sus_phrases: Vec<String>,
    /// Scheme-stripped, lowercased fragments of known-malicious URLs.
    pub malicious_url_fragments: Vec<String>,
    /// Known URL-shortener domains, lowercased.
    pub shortener_domains: Vec<String>,
    /// Perceptual fingerprints of the reference image set.
    pub dog_fingerprints: Vec<ImageHash>,
}

impl ReferenceLists {
    /// Load every reference list from `input_dir`.
    ///
    /// Any missing or unreadable list is fatal — a decision made against a
    /// partial reference set would silently under-label.
    pub fn load(input_dir: &Path) -> Result<Self> {
        let t_and_s_words = read_list(&input_dir.join("t-and-s-words.csv"))?
            .into_iter()
            .map(|w| w.to_lowercase())
            .collect();
        let t_and_s_domains = read_list(&input_dir.join("t-and-s-domains.csv"))?;
        let domain_to_source = read_pairs(&input_dir.join("news-domains.csv"))?;
        let high_sus_phrases = read_list(&input_dir.join("high-sus-phrases.csv"))?
            .into_iter()
            .map(|p| p.to_lowercase())
            .collect();
        let medium_sus_phrases = read_list(&input_dir.join("medium-sus-phrases.csv"))?
            .into_iter()
            .map(|p| p.to_lowercase())
            .collect();
        let malicious_url_fragments = read_list(&input_dir.join("malicious-urls.csv"))?
            .into_iter()
            .map(|u| normalize_url(&u))
            .collect();
        let shortener_domains = read_list(&input_dir.join("shortener-domains.csv"))?
            .into_iter()
            .map(|d| d.to_lowercase())
            .collect();
        let dog_fingerprints = load_fingerprints(&input_dir.join("dog-list-images"))?;

        let lists = Self {
            t_and_s_words,
            t_and_s_domains,
            domain_to_source,
            high_sus_phrases,
            medium_sus_phrases,
            malicious_url_fragments,
            shortener_domains,
            dog_fingerprints,
        };

        info!(
            words = lists.t_and_s_words.len(),
            domains = lists.t_and_s_domains.len(),
            news = lists.domain_to_source.len(),
            phrases = lists.high_sus_phrases.len() + lists.medium_sus_phrases.len(),
            images = lists.dog_fingerprints.len(),
            "Loaded reference lists"
        );

        Ok(lists)
    }
}

/// Read a single-column CSV, skipping the header line. Empty lines are
/// ignored; values are trimmed.
fn read_list(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read reference list {}", path.display()))?;

    Ok(content
        .lines()
        .skip(1)
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect())
}

/// Read a two-column CSV (domain,source), skipping the header line and
/// preserving file order.
fn read_pairs(path: &Path) -> Result<Vec<(String, String)>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read reference list {}", path.display()))?;

    let mut pairs = Vec::new();
    for line in content.lines().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (domain, source) = line
            .split_once(',')
            .with_context(|| format!("Malformed row in {}: {line}", path.display()))?;
        pairs.push((domain.trim().to_string(), source.trim().to_string()));
    }
    Ok(pairs)
}

/// Fingerprint every file in the reference image directory.
fn load_fingerprints(dir: &Path) -> Result<Vec<ImageHash>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read image directory {}", dir.display()))?;

    let mut fingerprints = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to list image directory {}", dir.display()))?
            .path();
        if path.is_file() {
            fingerprints.push(imagehash::fingerprint_file(&path)?);
        }
    }
    Ok(fingerprints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("sift-reference-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn loads_and_normalizes_lists() {
        let dir = temp_dir("ok");
        fs::write(dir.join("t-and-s-words.csv"), "Word\nBadWord\nWorse Word\n").unwrap();
        fs::write(dir.join("t-and-s-domains.csv"), "Domain\nBad.example.com\n").unwrap();
        fs::write(
            dir.join("news-domains.csv"),
            "Domain,Source\nnytimes.com,nyt\nwsj.com,wsj\n",
        )
        .unwrap();
        fs::write(dir.join("high-sus-phrases.csv"), "phrase\nGuaranteed Profit\n").unwrap();
        fs::write(dir.join("medium-sus-phrases.csv"), "phrase\nact now\n").unwrap();
        fs::write(dir.join("malicious-urls.csv"), "url\nhttp://Evil.example/KIT\n").unwrap();
        fs::write(dir.join("shortener-domains.csv"), "domain\nbit.ly\n").unwrap();
        fs::create_dir_all(dir.join("dog-list-images")).unwrap();

        let lists = ReferenceLists::load(&dir).unwrap();
        assert_eq!(lists.t_and_s_words, vec!["badword", "worse word"]);
        // Domains keep their original case
        assert_eq!(lists.t_and_s_domains, vec!["Bad.example.com"]);
        assert_eq!(
            lists.domain_to_source,
            vec![
                ("nytimes.com".to_string(), "nyt".to_string()),
                ("wsj.com".to_string(), "wsj".to_string()),
            ]
        );
        assert_eq!(lists.high_sus_phrases, vec!["guaranteed profit"]);
        // Scheme stripped and lowercased at load time
        assert_eq!(lists.malicious_url_fragments, vec!["evil.example/kit"]);
        assert!(lists.dog_fingerprints.is_empty());
    }

    #[test]
    fn missing_list_is_fatal() {
        let dir = temp_dir("missing");
        fs::write(dir.join("t-and-s-words.csv"), "Word\nbad\n").unwrap();
        // Everything else absent
        assert!(ReferenceLists::load(&dir).is_err());
    }
}
