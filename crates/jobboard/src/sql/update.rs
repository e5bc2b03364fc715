//! Partial-update SET clause construction.

use super::push_quoted_ident;
use crate::error::{BoardError, BoardResult};
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// Lookup table from request-facing field names to column names.
///
/// Fields without an entry use their request name as the column name
/// verbatim (e.g. `age` stays `age` while `firstName` maps to `first_name`).
#[derive(Debug, Clone, Copy)]
pub struct ColumnMap(&'static [(&'static str, &'static str)]);

impl ColumnMap {
    /// A map with no renames.
    pub const EMPTY: ColumnMap = ColumnMap(&[]);

    pub const fn new(renames: &'static [(&'static str, &'static str)]) -> Self {
        ColumnMap(renames)
    }

    /// Resolve a request-facing field name to its column name.
    pub fn column<'a>(&self, field: &'a str) -> &'a str {
        self.0
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, column)| *column)
            .unwrap_or(field)
    }
}

/// An ordered sequence of field assignments for a partial UPDATE.
///
/// Insertion order is placeholder order: the `n`th assignment always renders
/// `$n` and binds the `n`th parameter, so clause text and parameter positions
/// cannot drift apart.
#[must_use]
#[derive(Default)]
pub struct Patch {
    fields: Vec<(&'static str, Arc<dyn ToSql + Sync + Send>)>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a field.
    pub fn set<T>(&mut self, field: &'static str, value: T) -> &mut Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        self.fields.push((field, Arc::new(value)));
        self
    }

    /// Assign an optional field (None => skip).
    pub fn set_opt<T>(&mut self, field: &'static str, value: Option<T>) -> &mut Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        if let Some(v) = value {
            self.set(field, v);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Render the SET clause and its parameter list.
    ///
    /// Fails with a validation error when no field was assigned; an empty SET
    /// clause is not valid SQL, so this is checked before any text is built.
    pub fn set_clause(&self, columns: ColumnMap) -> BoardResult<SetClause> {
        if self.fields.is_empty() {
            return Err(BoardError::validation("no data to update"));
        }

        let mut parts = Vec::with_capacity(self.fields.len());
        let mut params: Vec<Arc<dyn ToSql + Sync + Send>> =
            Vec::with_capacity(self.fields.len());
        for (idx, (field, value)) in self.fields.iter().enumerate() {
            let mut part = String::new();
            push_quoted_ident(&mut part, columns.column(field));
            part.push_str(&format!("=${}", idx + 1));
            parts.push(part);
            params.push(Arc::clone(value));
        }

        Ok(SetClause {
            clause: parts.join(", "),
            params,
        })
    }
}

/// A rendered SET clause plus the values bound to its placeholders.
pub struct SetClause {
    clause: String,
    params: Vec<Arc<dyn ToSql + Sync + Send>>,
}

impl std::fmt::Debug for SetClause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetClause")
            .field("clause", &self.clause)
            .field("params", &self.params.len())
            .finish()
    }
}

impl SetClause {
    /// Clause text, e.g. `"first_name"=$1, "age"=$2` (no `SET` keyword).
    pub fn clause(&self) -> &str {
        &self.clause
    }

    /// Number of bound parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Ordinal of the next placeholder after the SET parameters.
    ///
    /// Used for the key predicate in `UPDATE ... SET ... WHERE key = $n`.
    pub fn next_placeholder(&self) -> usize {
        self.params.len() + 1
    }

    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|p| p.as_ref() as &(dyn ToSql + Sync))
            .collect()
    }
}
