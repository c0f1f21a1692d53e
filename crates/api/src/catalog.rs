//! Catalog service: projects repositories into purchasable courses.
//!
//! A course is not stored anywhere - it is recomputed on every catalog
//! fetch from the repository listing plus the parsed README, so listings
//! follow the repository content (and can be momentarily stale between
//! cache refreshes).

use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{instrument, warn};

use learning_center_core::CoursePrice;

use crate::github::{GithubClient, GithubError};
use crate::readme::{self, CourseMetadata};

/// One course in the catalog.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Course identifier: the backing repository's name.
    pub course_id: String,
    pub course_name: String,
    pub description: String,
    pub teacher: String,
    pub price: CoursePrice,
    /// Thumbnail URL; empty string when none could be resolved.
    pub thumbnail: String,
    /// Web URL of the backing repository.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,
}

/// Catalog service over the GitHub gateway.
#[derive(Clone)]
pub struct CatalogService {
    github: GithubClient,
}

impl CatalogService {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(github: GithubClient) -> Self {
        Self { github }
    }

    /// List all courses with resolved metadata and thumbnails.
    ///
    /// Per-course resolution runs concurrently and degrades to defaults on
    /// failure; only the repository listing itself is a catalog-wide error.
    /// Order follows the gateway's repository listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository listing fails.
    #[instrument(skip(self))]
    pub async fn list_courses(&self) -> Result<Vec<Course>, GithubError> {
        let repos = self.github.list_repositories().await?;

        let mut set = JoinSet::new();
        for (index, repo) in repos.iter().enumerate() {
            let github = self.github.clone();
            let name = repo.name.clone();
            let html_url = repo.html_url.clone();
            set.spawn(async move {
                let course = resolve_course(&github, &name, html_url).await;
                (index, course)
            });
        }

        let mut courses: Vec<Option<Course>> = vec![None; repos.len()];
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, course)) => {
                    if let Some(slot) = courses.get_mut(index) {
                        *slot = Some(course);
                    }
                }
                Err(e) => warn!(error = %e, "Course resolution task failed"),
            }
        }

        Ok(courses.into_iter().flatten().collect())
    }

    /// Project a single repository into a course.
    ///
    /// Metadata failures degrade to defaults; only the repository being
    /// absent upstream is an error.
    ///
    /// # Errors
    ///
    /// Returns `GithubError::NotFound` if the repository does not exist.
    #[instrument(skip(self), fields(repo = %repo))]
    pub async fn get_course(&self, repo: &str) -> Result<Course, GithubError> {
        let metadata = match self.github.get_readme(repo).await {
            Ok(text) => readme::extract(&text),
            Err(GithubError::NotFound(_)) => {
                // A course may exist without a README, but the repository
                // itself must be there.
                self.github.list_contents(repo, "").await?;
                CourseMetadata::default()
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch README; using defaults");
                CourseMetadata::default()
            }
        };

        let thumbnail = self.github.resolve_thumbnail(repo).await;
        let html_url = None;

        Ok(build_course(repo, metadata, thumbnail, html_url))
    }

    /// Parsed README metadata for a course.
    ///
    /// # Errors
    ///
    /// Returns `GithubError::NotFound` if the README is absent, or another
    /// variant if the fetch fails.
    pub async fn get_metadata(&self, repo: &str) -> Result<CourseMetadata, GithubError> {
        let text = self.github.get_readme(repo).await?;
        Ok(readme::extract(&text))
    }
}

/// Resolve one course for the listing, degrading to defaults on failure.
async fn resolve_course(github: &GithubClient, repo: &str, html_url: Option<String>) -> Course {
    let metadata = match github.get_readme(repo).await {
        Ok(text) => readme::extract(&text),
        Err(e) => {
            warn!(repo = %repo, error = %e, "Failed to resolve course metadata; using defaults");
            CourseMetadata::default()
        }
    };

    let thumbnail = github.resolve_thumbnail(repo).await;

    build_course(repo, metadata, thumbnail, html_url)
}

fn build_course(
    repo: &str,
    metadata: CourseMetadata,
    thumbnail: Option<String>,
    repository_url: Option<String>,
) -> Course {
    Course {
        course_id: repo.to_owned(),
        course_name: metadata.course_name,
        description: metadata.description,
        teacher: metadata.teacher,
        price: metadata.price,
        thumbnail: thumbnail.unwrap_or_default(),
        repository_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_course_defaults() {
        let course = build_course("rust-101", CourseMetadata::default(), None, None);
        assert_eq!(course.course_id, "rust-101");
        assert_eq!(course.course_name, "Unknown Course");
        assert_eq!(course.thumbnail, "");
        assert!(course.price.is_free());
    }

    #[test]
    fn test_build_course_keeps_published_name() {
        let metadata = CourseMetadata {
            course_name: "Intro to Go".to_owned(),
            description: "desc".to_owned(),
            teacher: "Ada".to_owned(),
            price: CoursePrice::new("$49.99"),
        };
        let course = build_course(
            "go-course",
            metadata,
            Some("https://example.com/cover.png".to_owned()),
            None,
        );
        assert_eq!(course.course_id, "go-course");
        assert_eq!(course.course_name, "Intro to Go");
        assert_eq!(course.thumbnail, "https://example.com/cover.png");
    }

    #[test]
    fn test_course_serializes_camel_case() {
        let course = build_course("rust-101", CourseMetadata::default(), None, None);
        #[allow(clippy::unwrap_used)]
        let json = serde_json::to_value(&course).unwrap();
        assert_eq!(json["courseId"], "rust-101");
        assert!(json.get("courseName").is_some());
        assert!(json.get("repositoryUrl").is_none());
    }
}
