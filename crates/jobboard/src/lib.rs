//! # jobboard
//!
//! PostgreSQL data-access layer for a job board: companies, jobs, users, and
//! job applications.
//!
//! ## Features
//!
//! - **Dynamic SQL without index bookkeeping**: partial updates and search
//!   filters render `$1, $2, ...` placeholders in lockstep with their values
//! - **Type-safe mapping**: Row → Struct via the `FromRow` trait
//! - **Transaction-friendly**: pass a transaction anywhere a `GenericClient`
//!   is expected
//! - **Safe defaults**: an empty partial update is rejected before any SQL is
//!   built; an empty search matches all rows instead of emitting a bare
//!   `WHERE`
//!
//! ## Example
//!
//! ```ignore
//! use jobboard::{Config, JobSearch, models::Job};
//!
//! let pool = Config::from_env()?.pool()?;
//! let client = pool.get().await?;
//!
//! let search = JobSearch {
//!     title: Some("engineer".into()),
//!     min_salary: Some(90_000),
//!     ..Default::default()
//! };
//! let jobs = Job::find_all(&client, &search).await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod pool;
pub mod row;
pub mod sql;

pub use client::GenericClient;
pub use config::Config;
pub use error::{BoardError, BoardResult};
pub use pool::{create_pool, create_pool_with_config};
pub use row::{FromRow, RowExt};
pub use sql::{ColumnMap, Patch, Predicate, SetClause, WhereClause};

pub use models::{
    Application, Company, CompanyDetail, CompanyPatch, CompanySearch, Job, JobPatch, JobSearch,
    NewCompany, NewJob, NewUser, User, UserDetail, UserPatch,
};
