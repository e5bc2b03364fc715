//! Job records and search.

use crate::client::GenericClient;
use crate::error::{BoardError, BoardResult};
use crate::row::{FromRow, RowExt};
use crate::sql::{ColumnMap, Patch, Predicate, WhereClause};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

/// A job row. `equity` is a NUMERIC fraction of ownership (at most 1.0).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl FromRow for Job {
    fn from_row(row: &Row) -> BoardResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("company_handle")?,
        })
    }
}

/// Input for creating a job.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default)]
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

/// Partial update for a job. The id and company handle are immutable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default)]
    pub equity: Option<Decimal>,
}

impl JobPatch {
    fn into_patch(self) -> Patch {
        let mut patch = Patch::new();
        patch
            .set_opt("title", self.title)
            .set_opt("salary", self.salary)
            .set_opt("equity", self.equity);
        patch
    }
}

/// Recognized job search filters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSearch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub min_salary: Option<i32>,
    #[serde(default)]
    pub has_equity: Option<bool>,
}

impl JobSearch {
    /// Translate the recognized filters into a WHERE clause, in a fixed
    /// order: title, minSalary, hasEquity.
    fn where_clause(&self) -> WhereClause {
        let mut clause = WhereClause::new();
        if let Some(title) = &self.title {
            clause.push(Predicate::contains("title", title));
        }
        if let Some(min) = self.min_salary {
            clause.push(Predicate::at_least("salary", min));
        }
        // False or absent contributes neither a fragment nor a value.
        if self.has_equity == Some(true) {
            clause.push(Predicate::positive("equity"));
        }
        clause
    }
}

impl Job {
    const COLUMNS: &'static str = "id, title, salary, equity, company_handle";

    /// Insert a new job.
    ///
    /// Fails with a validation error when a job with the same title exists.
    pub async fn create(conn: &impl GenericClient, input: NewJob) -> BoardResult<Job> {
        let duplicate = conn
            .query_opt("SELECT title FROM jobs WHERE title = $1", &[&input.title])
            .await?;
        if duplicate.is_some() {
            return Err(BoardError::validation(format!(
                "Duplicate job: {}",
                input.title
            )));
        }

        let sql = format!(
            "INSERT INTO jobs (title, salary, equity, company_handle) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            Self::COLUMNS
        );
        let row = conn
            .query_one(
                &sql,
                &[
                    &input.title,
                    &input.salary,
                    &input.equity,
                    &input.company_handle,
                ],
            )
            .await?;
        Job::from_row(&row)
    }

    /// List jobs matching the search filters. No filters means all jobs.
    pub async fn find_all(conn: &impl GenericClient, search: &JobSearch) -> BoardResult<Vec<Job>> {
        let filter = search.where_clause();
        let sql = format!(
            "SELECT {} FROM jobs{} ORDER BY company_handle",
            Self::COLUMNS,
            filter.where_sql()
        );
        let rows = conn.query(&sql, &filter.params_ref()).await?;
        rows.iter().map(Job::from_row).collect()
    }

    /// Fetch one job by id.
    pub async fn get(conn: &impl GenericClient, id: i32) -> BoardResult<Job> {
        let sql = format!("SELECT {} FROM jobs WHERE id = $1", Self::COLUMNS);
        let row = conn
            .query_opt(&sql, &[&id])
            .await?
            .ok_or_else(|| BoardError::not_found(format!("No job: {id}")))?;
        Job::from_row(&row)
    }

    /// Partially update a job; absent patch fields are left unchanged.
    pub async fn update(conn: &impl GenericClient, id: i32, patch: JobPatch) -> BoardResult<Job> {
        let set = patch.into_patch().set_clause(ColumnMap::EMPTY)?;
        let sql = format!(
            "UPDATE jobs SET {} WHERE id = ${} RETURNING {}",
            set.clause(),
            set.next_placeholder(),
            Self::COLUMNS
        );
        let mut params = set.params_ref();
        params.push(&id);
        let row = conn
            .query_opt(&sql, &params)
            .await?
            .ok_or_else(|| BoardError::not_found(format!("No job: {id}")))?;
        Job::from_row(&row)
    }

    /// Delete a job.
    pub async fn remove(conn: &impl GenericClient, id: i32) -> BoardResult<()> {
        let deleted = conn
            .execute("DELETE FROM jobs WHERE id = $1", &[&id])
            .await?;
        if deleted == 0 {
            return Err(BoardError::not_found(format!("No job: {id}")));
        }
        Ok(())
    }

    /// Jobs posted by one company, oldest first.
    pub async fn for_company(conn: &impl GenericClient, handle: &str) -> BoardResult<Vec<Job>> {
        let sql = format!(
            "SELECT {} FROM jobs WHERE company_handle = $1 ORDER BY id",
            Self::COLUMNS
        );
        let rows = conn.query(&sql, &[&handle]).await?;
        rows.iter().map(Job::from_row).collect()
    }
}
