//! Entity models: one module per table, with operations generic over
//! [`GenericClient`](crate::client::GenericClient) so they compose inside
//! transactions.

pub mod application;
pub mod company;
pub mod job;
pub mod user;

pub use application::Application;
pub use company::{Company, CompanyDetail, CompanyPatch, CompanySearch, NewCompany};
pub use job::{Job, JobPatch, JobSearch, NewJob};
pub use user::{NewUser, User, UserDetail, UserPatch};
