//! Job applications: the user/job join table.

use crate::client::GenericClient;
use crate::error::{BoardError, BoardResult};
use crate::row::RowExt;

/// Operations on the applications join table.
///
/// There is no row struct: an application is fully identified by its
/// `(username, job_id)` pair.
pub struct Application;

impl Application {
    /// Apply a user to a job; returns the job id.
    ///
    /// Fails with a validation error when the application already exists, and
    /// with a not-found error when either side of the pair does not.
    pub async fn apply(
        conn: &impl GenericClient,
        username: &str,
        job_id: i32,
    ) -> BoardResult<i32> {
        let duplicate = conn
            .query_opt(
                "SELECT username, job_id FROM applications \
                 WHERE username = $1 AND job_id = $2",
                &[&username, &job_id],
            )
            .await?;
        if duplicate.is_some() {
            return Err(BoardError::validation(format!(
                "Duplicate application: {username} -> job {job_id}"
            )));
        }

        let row = conn
            .query_one(
                "INSERT INTO applications (username, job_id) \
                 VALUES ($1, $2) RETURNING job_id",
                &[&username, &job_id],
            )
            .await
            .map_err(|e| match e {
                // The referenced row is missing, not the statement broken.
                BoardError::ForeignKeyViolation(detail) if detail.contains("job") => {
                    BoardError::not_found(format!("No job: {job_id}"))
                }
                BoardError::ForeignKeyViolation(_) => {
                    BoardError::not_found(format!("No user: {username}"))
                }
                other => other,
            })?;
        row.try_get_column("job_id")
    }

    /// Withdraw an application.
    pub async fn remove(
        conn: &impl GenericClient,
        username: &str,
        job_id: i32,
    ) -> BoardResult<()> {
        let deleted = conn
            .execute(
                "DELETE FROM applications WHERE username = $1 AND job_id = $2",
                &[&username, &job_id],
            )
            .await?;
        if deleted == 0 {
            return Err(BoardError::not_found(format!(
                "No application: {username} -> job {job_id}"
            )));
        }
        Ok(())
    }

    /// Ids of the jobs a user has applied to.
    pub async fn jobs_for(conn: &impl GenericClient, username: &str) -> BoardResult<Vec<i32>> {
        let rows = conn
            .query(
                "SELECT job_id FROM applications WHERE username = $1 ORDER BY job_id",
                &[&username],
            )
            .await?;
        rows.iter().map(|row| row.try_get_column("job_id")).collect()
    }
}
