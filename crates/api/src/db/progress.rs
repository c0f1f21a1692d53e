//! Progress repository: completed content paths per user and course.

use sqlx::PgPool;
use tracing::instrument;

use learning_center_core::{CourseId, UserId};

use super::RepositoryError;

/// Repository for completion tracking.
pub struct ProgressRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProgressRepository<'a> {
    /// Create a new progress repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Mark one content path complete and return the updated set.
    ///
    /// Idempotent: marking an already-complete path changes nothing. The
    /// path is not checked against the live course tree.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a statement fails.
    #[instrument(skip(self), fields(user_id = %user_id, course_id = %course_id))]
    pub async fn mark_complete(
        &self,
        user_id: UserId,
        course_id: &CourseId,
        path: &str,
    ) -> Result<Vec<String>, RepositoryError> {
        sqlx::query(
            "INSERT INTO user_progress (user_id, course_id, path) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, course_id, path) DO NOTHING",
        )
        .bind(user_id.as_i32())
        .bind(course_id.as_str())
        .bind(path)
        .execute(self.pool)
        .await?;

        self.get_completed(user_id, course_id).await
    }

    /// The set of completed paths for a user and course, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_completed(
        &self,
        user_id: UserId,
        course_id: &CourseId,
    ) -> Result<Vec<String>, RepositoryError> {
        let paths = sqlx::query_scalar::<_, String>(
            "SELECT path \
             FROM user_progress \
             WHERE user_id = $1 AND course_id = $2 \
             ORDER BY completed_at, path",
        )
        .bind(user_id.as_i32())
        .bind(course_id.as_str())
        .fetch_all(self.pool)
        .await?;

        Ok(paths)
    }
}
