//! Company records and search.

use crate::client::GenericClient;
use crate::error::{BoardError, BoardResult};
use crate::models::job::Job;
use crate::row::{FromRow, RowExt};
use crate::sql::{ColumnMap, Patch, Predicate, WhereClause};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

/// A company row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl FromRow for Company {
    fn from_row(row: &Row) -> BoardResult<Self> {
        Ok(Self {
            handle: row.try_get_column("handle")?,
            name: row.try_get_column("name")?,
            description: row.try_get_column("description")?,
            num_employees: row.try_get_column("num_employees")?,
            logo_url: row.try_get_column("logo_url")?,
        })
    }
}

/// A company together with its posted jobs.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<Job>,
}

/// Input for creating a company.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub num_employees: Option<i32>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// Partial update for a company. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub num_employees: Option<i32>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl CompanyPatch {
    fn into_patch(self) -> Patch {
        let mut patch = Patch::new();
        patch
            .set_opt("name", self.name)
            .set_opt("description", self.description)
            .set_opt("numEmployees", self.num_employees)
            .set_opt("logoUrl", self.logo_url);
        patch
    }
}

/// Recognized company search filters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySearch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub min_employees: Option<i32>,
    #[serde(default)]
    pub max_employees: Option<i32>,
}

impl CompanySearch {
    /// Translate the recognized filters into a WHERE clause, in a fixed
    /// order: name, minEmployees, maxEmployees.
    fn where_clause(&self) -> BoardResult<WhereClause> {
        if let (Some(min), Some(max)) = (self.min_employees, self.max_employees) {
            if min > max {
                return Err(BoardError::validation(format!(
                    "minEmployees ({min}) cannot exceed maxEmployees ({max})"
                )));
            }
        }

        let mut clause = WhereClause::new();
        if let Some(name) = &self.name {
            clause.push(Predicate::contains("name", name));
        }
        if let Some(min) = self.min_employees {
            clause.push(Predicate::at_least("num_employees", min));
        }
        if let Some(max) = self.max_employees {
            clause.push(Predicate::at_most("num_employees", max));
        }
        Ok(clause)
    }
}

impl Company {
    const COLUMNS: &'static str = "handle, name, description, num_employees, logo_url";

    const RENAMES: ColumnMap = ColumnMap::new(&[
        ("numEmployees", "num_employees"),
        ("logoUrl", "logo_url"),
    ]);

    /// Insert a new company.
    ///
    /// Fails with a validation error when the handle is already taken.
    pub async fn create(conn: &impl GenericClient, input: NewCompany) -> BoardResult<Company> {
        let duplicate = conn
            .query_opt(
                "SELECT handle FROM companies WHERE handle = $1",
                &[&input.handle],
            )
            .await?;
        if duplicate.is_some() {
            return Err(BoardError::validation(format!(
                "Duplicate company: {}",
                input.handle
            )));
        }

        let sql = format!(
            "INSERT INTO companies (handle, name, description, num_employees, logo_url) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            Self::COLUMNS
        );
        let row = conn
            .query_one(
                &sql,
                &[
                    &input.handle,
                    &input.name,
                    &input.description,
                    &input.num_employees,
                    &input.logo_url,
                ],
            )
            .await?;
        Company::from_row(&row)
    }

    /// List companies matching the search filters. No filters means all
    /// companies.
    pub async fn find_all(
        conn: &impl GenericClient,
        search: &CompanySearch,
    ) -> BoardResult<Vec<Company>> {
        let filter = search.where_clause()?;
        let sql = format!(
            "SELECT {} FROM companies{} ORDER BY name",
            Self::COLUMNS,
            filter.where_sql()
        );
        let rows = conn.query(&sql, &filter.params_ref()).await?;
        rows.iter().map(Company::from_row).collect()
    }

    /// Fetch one company and its jobs.
    pub async fn get(conn: &impl GenericClient, handle: &str) -> BoardResult<CompanyDetail> {
        let sql = format!("SELECT {} FROM companies WHERE handle = $1", Self::COLUMNS);
        let row = conn
            .query_opt(&sql, &[&handle])
            .await?
            .ok_or_else(|| BoardError::not_found(format!("No company: {handle}")))?;
        let company = Company::from_row(&row)?;
        let jobs = Job::for_company(conn, handle).await?;
        Ok(CompanyDetail { company, jobs })
    }

    /// Partially update a company; absent patch fields are left unchanged.
    pub async fn update(
        conn: &impl GenericClient,
        handle: &str,
        patch: CompanyPatch,
    ) -> BoardResult<Company> {
        let set = patch.into_patch().set_clause(Self::RENAMES)?;
        let sql = format!(
            "UPDATE companies SET {} WHERE handle = ${} RETURNING {}",
            set.clause(),
            set.next_placeholder(),
            Self::COLUMNS
        );
        let mut params = set.params_ref();
        params.push(&handle);
        let row = conn
            .query_opt(&sql, &params)
            .await?
            .ok_or_else(|| BoardError::not_found(format!("No company: {handle}")))?;
        Company::from_row(&row)
    }

    /// Delete a company.
    pub async fn remove(conn: &impl GenericClient, handle: &str) -> BoardResult<()> {
        let deleted = conn
            .execute("DELETE FROM companies WHERE handle = $1", &[&handle])
            .await?;
        if deleted == 0 {
            return Err(BoardError::not_found(format!("No company: {handle}")));
        }
        Ok(())
    }
}
