// Sift: Automated policy labeling for Bluesky
//
// This is the library root. Each module corresponds to one stage of the
// moderation pipeline: fetch, extract evidence, score, decide.

pub mod bluesky;
pub mod config;
pub mod evidence;
pub mod imagehash;
pub mod labeler;
pub mod reference;
