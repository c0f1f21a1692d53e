//! GitHub REST client implementation.
//!
//! Uses `reqwest` for HTTP and caches read responses with `moka`.

use std::sync::Arc;

use moka::future::Cache;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::GithubConfig;
use crate::github::GithubError;
use crate::github::cache::CacheValue;
use crate::github::types::{ContentEntry, RepoSummary};

/// Maximum directory depth walked when counting a course's leaf files.
const MAX_TREE_DEPTH: usize = 16;

/// Fallback retry delay when GitHub rate-limits without a usable header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

// =============================================================================
// GithubClient
// =============================================================================

/// Client for the GitHub REST and raw-content APIs.
///
/// Listings, READMEs, thumbnails and tree counts are cached with the
/// configured TTL. Raw file bodies are fetched fresh on every call.
#[derive(Clone)]
pub struct GithubClient {
    inner: Arc<GithubClientInner>,
}

struct GithubClientInner {
    http: reqwest::Client,
    api_base: String,
    raw_base: String,
    owner: String,
    default_branch: String,
    cache: Cache<String, CacheValue>,
}

impl GithubClient {
    /// Create a new GitHub client.
    ///
    /// The underlying HTTP client always sends a `User-Agent` (GitHub
    /// rejects anonymous agents) and, when configured, a bearer token.
    #[must_use]
    pub fn new(config: &GithubConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("learning-center-api"));
        if let Some(token) = &config.token
            && let Ok(mut value) =
                HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
        {
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()
            .unwrap_or_default();

        let cache = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(config.cache_ttl)
            .build();

        Self {
            inner: Arc::new(GithubClientInner {
                http,
                api_base: config.api_base.trim_end_matches('/').to_owned(),
                raw_base: config.raw_base.trim_end_matches('/').to_owned(),
                owner: config.owner.clone(),
                default_branch: config.default_branch.clone(),
                cache,
            }),
        }
    }

    /// The configured catalog owner (GitHub account).
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.inner.owner
    }

    /// Direct raw-content URL for a file within a repository.
    #[must_use]
    pub fn raw_url(&self, repo: &str, path: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.inner.raw_base,
            self.inner.owner,
            repo,
            self.inner.default_branch,
            encode_path(path)
        )
    }

    // =========================================================================
    // HTTP plumbing
    // =========================================================================

    /// Perform a GET and map the response status to the error taxonomy.
    async fn get_checked(&self, url: &str) -> Result<reqwest::Response, GithubError> {
        let response = self.inner.http.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(GithubError::NotFound(resource_of(url)));
        }

        // GitHub signals rate limiting as 403 (REST) or 429
        if status == StatusCode::TOO_MANY_REQUESTS
            || (status == StatusCode::FORBIDDEN && rate_limit_exhausted(response.headers()))
        {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return Err(GithubError::RateLimited(retry_after));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "GitHub returned non-success status"
            );
            return Err(GithubError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        Ok(response)
    }

    /// GET a JSON endpoint, reading the body as text first for better
    /// diagnostics when parsing fails.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, GithubError> {
        let response = self.get_checked(url).await?;
        let response_text = response.text().await?;

        match serde_json::from_str(&response_text) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse GitHub response"
                );
                Err(GithubError::Parse(e))
            }
        }
    }

    // =========================================================================
    // Repository Methods
    // =========================================================================

    /// List the owner's repositories (one repository = one course).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_repositories(&self) -> Result<Vec<RepoSummary>, GithubError> {
        let cache_key = "repos".to_owned();

        if let Some(CacheValue::Repos(repos)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for repositories");
            return Ok(repos);
        }

        let url = format!(
            "{}/users/{}/repos?per_page=100",
            self.inner.api_base, self.inner.owner
        );
        let repos: Vec<RepoSummary> = self.get_json(&url).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Repos(repos.clone()))
            .await;

        Ok(repos)
    }

    /// List one directory of a repository's content tree.
    ///
    /// An empty `path` lists the repository root. Directories are never
    /// expanded implicitly; callers request each level explicitly.
    ///
    /// # Errors
    ///
    /// Returns `GithubError::NotFound` if the repository or path is absent,
    /// or another variant if the request fails.
    #[instrument(skip(self), fields(repo = %repo, path = %path))]
    pub async fn list_contents(
        &self,
        repo: &str,
        path: &str,
    ) -> Result<Vec<ContentEntry>, GithubError> {
        let cache_key = format!("contents:{repo}:{path}");

        if let Some(CacheValue::Contents(entries)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for contents");
            return Ok(entries);
        }

        let url = if path.is_empty() {
            format!(
                "{}/repos/{}/{}/contents",
                self.inner.api_base, self.inner.owner, repo
            )
        } else {
            format!(
                "{}/repos/{}/{}/contents/{}",
                self.inner.api_base,
                self.inner.owner,
                repo,
                encode_path(path)
            )
        };
        let entries: Vec<ContentEntry> = self.get_json(&url).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Contents(entries.clone()))
            .await;

        Ok(entries)
    }

    /// Fetch a repository's raw README text.
    ///
    /// # Errors
    ///
    /// Returns `GithubError::NotFound` if the repository has no README on
    /// the configured branch, or another variant if the request fails.
    #[instrument(skip(self), fields(repo = %repo))]
    pub async fn get_readme(&self, repo: &str) -> Result<String, GithubError> {
        let cache_key = format!("readme:{repo}");

        if let Some(CacheValue::Readme(text)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for readme");
            return Ok(text);
        }

        let url = self.raw_url(repo, "README.md");
        let text = self.get_checked(&url).await?.text().await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Readme(text.clone()))
            .await;

        Ok(text)
    }

    /// Fetch a raw file as text (used for markdown course content).
    ///
    /// Not cached: file bodies can be large and are only fetched when a
    /// single file is opened.
    ///
    /// # Errors
    ///
    /// Returns `GithubError::NotFound` if the file is absent, or another
    /// variant if the request fails.
    #[instrument(skip(self), fields(repo = %repo, path = %path))]
    pub async fn get_raw_text(&self, repo: &str, path: &str) -> Result<String, GithubError> {
        let url = self.raw_url(repo, path);
        Ok(self.get_checked(&url).await?.text().await?)
    }

    /// Resolve a course's thumbnail: the first image file in the
    /// conventional `image/` directory.
    ///
    /// Best-effort by contract: any failure, including a missing directory,
    /// yields `None`.
    #[instrument(skip(self), fields(repo = %repo))]
    pub async fn resolve_thumbnail(&self, repo: &str) -> Option<String> {
        let cache_key = format!("thumbnail:{repo}");

        if let Some(CacheValue::Thumbnail(url)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for thumbnail");
            return url;
        }

        let url = match self.list_contents(repo, "image").await {
            Ok(entries) => entries
                .into_iter()
                .find(|e| e.entry_type.is_file() && has_image_extension(&e.name))
                .and_then(|e| e.download_url),
            Err(e) => {
                debug!(error = %e, "No thumbnail resolved");
                None
            }
        };

        self.inner
            .cache
            .insert(cache_key, CacheValue::Thumbnail(url.clone()))
            .await;

        url
    }

    /// Count a repository's leaf files with a full tree walk.
    ///
    /// Used as the denominator for progress percentages, so the total is
    /// course-wide rather than discovered-so-far. Depth is bounded to keep
    /// pathological trees from fanning out indefinitely.
    ///
    /// # Errors
    ///
    /// Returns an error if any directory listing fails.
    #[instrument(skip(self), fields(repo = %repo))]
    pub async fn count_leaf_files(&self, repo: &str) -> Result<u64, GithubError> {
        let cache_key = format!("leafcount:{repo}");

        if let Some(CacheValue::LeafCount(count)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for leaf count");
            return Ok(count);
        }

        let mut count = 0u64;
        let mut pending = vec![(String::new(), 0usize)];

        while let Some((path, depth)) = pending.pop() {
            let entries = self.list_contents(repo, &path).await?;
            for entry in entries {
                if entry.entry_type.is_file() {
                    count += 1;
                } else if entry.entry_type.is_dir() && depth < MAX_TREE_DEPTH {
                    pending.push((entry.path, depth + 1));
                }
            }
        }

        self.inner
            .cache
            .insert(cache_key, CacheValue::LeafCount(count))
            .await;

        Ok(count)
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate a repository's derived entries (README, thumbnail, leaf
    /// count). Per-path listings age out via the TTL.
    pub async fn invalidate_repo(&self, repo: &str) {
        for key in [
            format!("readme:{repo}"),
            format!("thumbnail:{repo}"),
            format!("leafcount:{repo}"),
        ] {
            self.inner.cache.invalidate(&key).await;
        }
    }

    /// Invalidate all cached data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Percent-encode each path segment while keeping `/` separators.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Strip the host from a URL for error messages.
fn resource_of(url: &str) -> String {
    url.splitn(4, '/').nth(3).unwrap_or(url).to_owned()
}

/// Whether a 403 carries GitHub's exhausted-rate-limit marker.
fn rate_limit_exhausted(headers: &HeaderMap) -> bool {
    headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "0")
}

/// Image extensions accepted for course thumbnails.
fn has_image_extension(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    [".png", ".jpg", ".jpeg", ".gif"]
        .iter()
        .any(|ext| lower.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_path_plain() {
        assert_eq!(encode_path("videos/lecture1.mp4"), "videos/lecture1.mp4");
    }

    #[test]
    fn test_encode_path_spaces() {
        assert_eq!(
            encode_path("week 1/intro notes.md"),
            "week%201/intro%20notes.md"
        );
    }

    #[test]
    fn test_resource_of_strips_host() {
        assert_eq!(
            resource_of("https://api.github.com/repos/o/r/contents"),
            "repos/o/r/contents"
        );
    }

    #[test]
    fn test_has_image_extension() {
        assert!(has_image_extension("cover.PNG"));
        assert!(has_image_extension("banner.jpeg"));
        assert!(!has_image_extension("notes.md"));
    }
}
