//! Response types for the GitHub gateway.
//!
//! These deserialize directly from the REST API's JSON; fields the
//! marketplace does not use are simply not declared.

use serde::{Deserialize, Serialize};

/// Summary of one repository, as returned by `GET /users/{owner}/repos`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoSummary {
    /// Repository name; doubles as the course identifier.
    pub name: String,
    /// Repository description, if set.
    #[serde(default)]
    pub description: Option<String>,
    /// Branch raw content is served from.
    #[serde(default = "default_branch")]
    pub default_branch: String,
    /// Web URL of the repository.
    #[serde(default)]
    pub html_url: Option<String>,
    /// Last push/update timestamp, RFC 3339.
    #[serde(default)]
    pub updated_at: Option<String>,
}

fn default_branch() -> String {
    "main".to_owned()
}

/// Kind of a content tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    File,
    Dir,
    Symlink,
    Submodule,
}

impl EntryType {
    /// Whether this entry is a plain file (a content leaf).
    #[must_use]
    pub const fn is_file(self) -> bool {
        matches!(self, Self::File)
    }

    /// Whether this entry can be expanded further.
    #[must_use]
    pub const fn is_dir(self) -> bool {
        matches!(self, Self::Dir)
    }
}

/// One node of a course's content tree, as returned by the contents API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentEntry {
    /// File or directory name.
    pub name: String,
    /// Path relative to the repository root; unique within the tree.
    pub path: String,
    /// Node kind.
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    /// Size in bytes (0 for directories).
    #[serde(default)]
    pub size: u64,
    /// Direct download URL; present for files only.
    #[serde(default)]
    pub download_url: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_content_entry_from_github_json() {
        // Trimmed from a real contents API response; unknown fields ignored.
        let json = r#"{
            "name": "lecture1.mp4",
            "path": "videos/lecture1.mp4",
            "sha": "abc123",
            "size": 1048576,
            "type": "file",
            "download_url": "https://raw.githubusercontent.com/o/r/main/videos/lecture1.mp4",
            "_links": {"self": "..."}
        }"#;

        let entry: ContentEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.name, "lecture1.mp4");
        assert_eq!(entry.path, "videos/lecture1.mp4");
        assert!(entry.entry_type.is_file());
        assert_eq!(entry.size, 1_048_576);
        assert!(entry.download_url.is_some());
    }

    #[test]
    fn test_dir_entry_has_no_download_url() {
        let json = r#"{"name": "videos", "path": "videos", "type": "dir", "download_url": null}"#;
        let entry: ContentEntry = serde_json::from_str(json).unwrap();
        assert!(entry.entry_type.is_dir());
        assert!(entry.download_url.is_none());
        assert_eq!(entry.size, 0);
    }

    #[test]
    fn test_repo_summary_defaults() {
        let json = r#"{"name": "rust-101"}"#;
        let repo: RepoSummary = serde_json::from_str(json).unwrap();
        assert_eq!(repo.name, "rust-101");
        assert_eq!(repo.default_branch, "main");
        assert!(repo.description.is_none());
    }
}
