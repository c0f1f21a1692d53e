//! Cache value types for GitHub gateway responses.

use crate::github::types::{ContentEntry, RepoSummary};

/// Cached value types.
///
/// One cache holds all response shapes; keys encode the request
/// (`repos`, `contents:{repo}:{path}`, `readme:{repo}`, ...).
#[derive(Debug, Clone)]
pub enum CacheValue {
    Repos(Vec<RepoSummary>),
    Contents(Vec<ContentEntry>),
    Readme(String),
    Thumbnail(Option<String>),
    LeafCount(u64),
}
