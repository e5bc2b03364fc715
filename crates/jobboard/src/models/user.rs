//! User records.
//!
//! Password hashing is the caller's concern: [`NewUser`] carries an
//! already-hashed credential, and the stored hash never leaves this layer.

use crate::client::GenericClient;
use crate::error::{BoardError, BoardResult};
use crate::models::application::Application;
use crate::row::{FromRow, RowExt};
use crate::sql::{ColumnMap, Patch};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

/// A user row, without the password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
}

impl FromRow for User {
    fn from_row(row: &Row) -> BoardResult<Self> {
        Ok(Self {
            username: row.try_get_column("username")?,
            first_name: row.try_get_column("first_name")?,
            last_name: row.try_get_column("last_name")?,
            email: row.try_get_column("email")?,
            is_admin: row.try_get_column("is_admin")?,
        })
    }
}

/// A user together with the ids of jobs applied to.
#[derive(Debug, Clone, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    pub applications: Vec<i32>,
}

/// Input for creating a user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Already-hashed password; stored verbatim in the `password` column.
    pub password_hash: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Partial update for a user. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_admin: Option<bool>,
}

impl UserPatch {
    fn into_patch(self) -> Patch {
        let mut patch = Patch::new();
        patch
            .set_opt("firstName", self.first_name)
            .set_opt("lastName", self.last_name)
            .set_opt("email", self.email)
            .set_opt("isAdmin", self.is_admin);
        patch
    }
}

impl User {
    const COLUMNS: &'static str = "username, first_name, last_name, email, is_admin";

    const RENAMES: ColumnMap = ColumnMap::new(&[
        ("firstName", "first_name"),
        ("lastName", "last_name"),
        ("isAdmin", "is_admin"),
    ]);

    /// Insert a new user.
    ///
    /// Fails with a validation error when the username is already taken.
    pub async fn create(conn: &impl GenericClient, input: NewUser) -> BoardResult<User> {
        let duplicate = conn
            .query_opt(
                "SELECT username FROM users WHERE username = $1",
                &[&input.username],
            )
            .await?;
        if duplicate.is_some() {
            return Err(BoardError::validation(format!(
                "Duplicate username: {}",
                input.username
            )));
        }

        let sql = format!(
            "INSERT INTO users (username, password, first_name, last_name, email, is_admin) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            Self::COLUMNS
        );
        let row = conn
            .query_one(
                &sql,
                &[
                    &input.username,
                    &input.password_hash,
                    &input.first_name,
                    &input.last_name,
                    &input.email,
                    &input.is_admin,
                ],
            )
            .await?;
        User::from_row(&row)
    }

    /// List all users.
    pub async fn find_all(conn: &impl GenericClient) -> BoardResult<Vec<User>> {
        let sql = format!("SELECT {} FROM users ORDER BY username", Self::COLUMNS);
        let rows = conn.query(&sql, &[]).await?;
        rows.iter().map(User::from_row).collect()
    }

    /// Fetch one user and the ids of jobs applied to.
    pub async fn get(conn: &impl GenericClient, username: &str) -> BoardResult<UserDetail> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", Self::COLUMNS);
        let row = conn
            .query_opt(&sql, &[&username])
            .await?
            .ok_or_else(|| BoardError::not_found(format!("No user: {username}")))?;
        let user = User::from_row(&row)?;
        let applications = Application::jobs_for(conn, username).await?;
        Ok(UserDetail { user, applications })
    }

    /// Partially update a user; absent patch fields are left unchanged.
    pub async fn update(
        conn: &impl GenericClient,
        username: &str,
        patch: UserPatch,
    ) -> BoardResult<User> {
        let set = patch.into_patch().set_clause(Self::RENAMES)?;
        let sql = format!(
            "UPDATE users SET {} WHERE username = ${} RETURNING {}",
            set.clause(),
            set.next_placeholder(),
            Self::COLUMNS
        );
        let mut params = set.params_ref();
        params.push(&username);
        let row = conn
            .query_opt(&sql, &params)
            .await?
            .ok_or_else(|| BoardError::not_found(format!("No user: {username}")))?;
        User::from_row(&row)
    }

    /// Delete a user.
    pub async fn remove(conn: &impl GenericClient, username: &str) -> BoardResult<()> {
        let deleted = conn
            .execute("DELETE FROM users WHERE username = $1", &[&username])
            .await?;
        if deleted == 0 {
            return Err(BoardError::not_found(format!("No user: {username}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_renames_camel_case_fields() {
        let patch = UserPatch {
            first_name: Some("Aliya".to_string()),
            last_name: Some("Foster".to_string()),
            is_admin: Some(true),
            ..Default::default()
        };
        let set = patch.into_patch().set_clause(User::RENAMES).unwrap();
        assert_eq!(
            set.clause(),
            r#""first_name"=$1, "last_name"=$2, "is_admin"=$3"#
        );
    }

    #[test]
    fn email_passes_through_unrenamed() {
        let patch = UserPatch {
            email: Some("aliya@example.com".to_string()),
            ..Default::default()
        };
        let set = patch.into_patch().set_clause(User::RENAMES).unwrap();
        assert_eq!(set.clause(), r#""email"=$1"#);
    }

    #[test]
    fn serialized_user_omits_password_and_uses_camel_case() {
        let user = User {
            username: "aliya".to_string(),
            first_name: "Aliya".to_string(),
            last_name: "Foster".to_string(),
            email: "aliya@example.com".to_string(),
            is_admin: false,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["firstName"], "Aliya");
        assert!(json.get("password").is_none());
    }
}
