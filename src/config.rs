use std::env;
use std::path::PathBuf;

use anyhow::Result;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Nothing
/// here is secret — all read operations go through the public API.
pub struct Config {
    /// Directory containing the reference lists (CSV files + dog-list-images/).
    pub input_dir: PathBuf,
    /// Public AT Protocol API endpoint (defaults to https://public.api.bsky.app).
    pub public_api_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Both values have defaults, so loading never fails on a clean
    /// environment — `require_input_dir` does the real validation.
    pub fn load() -> Result<Self> {
        Ok(Self {
            input_dir: env::var("SIFT_INPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./input")),
            public_api_url: env::var("PUBLIC_API_URL")
                .unwrap_or_else(|_| crate::bluesky::client::DEFAULT_PUBLIC_API_URL.to_string()),
        })
    }

    /// Check that the reference-list directory exists.
    /// Call this before constructing a Labeler — no decisions can be made
    /// without reference data.
    pub fn require_input_dir(&self) -> Result<()> {
        if !self.input_dir.is_dir() {
            anyhow::bail!(
                "Reference list directory not found: {}\n\
                 Set SIFT_INPUT_DIR in your .env file or pass --input-dir.",
                self.input_dir.display()
            );
        }
        Ok(())
    }
}
