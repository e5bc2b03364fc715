//! Search filter to WHERE clause construction.
//!
//! Search endpoints translate a small, closed set of recognized filter keys
//! into comparison predicates. Each [`Predicate`] is a declarative
//! descriptor; [`WhereClause`] assembles clause text and bound values in
//! lockstep, so a predicate that binds no value consumes no placeholder
//! ordinal and the printed `$n` indices always match parameter positions.

use std::sync::Arc;
use tokio_postgres::types::ToSql;

enum Test {
    /// `column <op> $n` with one bound value.
    Compare {
        op: &'static str,
        value: Arc<dyn ToSql + Sync + Send>,
    },
    /// Fixed expression appended after the column, binding nothing.
    Fixed { expr: &'static str },
}

/// A single search predicate over a known column.
pub struct Predicate {
    column: &'static str,
    test: Test,
}

impl Predicate {
    /// Case-insensitive substring match: `column ILIKE '%needle%'`.
    ///
    /// The wildcard wrapping happens here, before binding; the needle itself
    /// is still passed as a parameter, never spliced into the clause text.
    pub fn contains(column: &'static str, needle: &str) -> Self {
        Self {
            column,
            test: Test::Compare {
                op: "ILIKE",
                value: Arc::new(format!("%{needle}%")),
            },
        }
    }

    /// Lower bound: `column >= value`.
    pub fn at_least<T>(column: &'static str, value: T) -> Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        Self {
            column,
            test: Test::Compare {
                op: ">=",
                value: Arc::new(value),
            },
        }
    }

    /// Upper bound: `column <= value`.
    pub fn at_most<T>(column: &'static str, value: T) -> Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        Self {
            column,
            test: Test::Compare {
                op: "<=",
                value: Arc::new(value),
            },
        }
    }

    /// Strictly-positive test: `column > 0`. Binds no value.
    pub fn positive(column: &'static str) -> Self {
        Self {
            column,
            test: Test::Fixed { expr: "> 0" },
        }
    }
}

/// Conjunctive WHERE clause with positional placeholders.
///
/// Predicates are pushed in a fixed, caller-decided order so placeholder
/// numbering stays stable and testable.
#[must_use]
#[derive(Default)]
pub struct WhereClause {
    conditions: Vec<String>,
    params: Vec<Arc<dyn ToSql + Sync + Send>>,
}

impl std::fmt::Debug for WhereClause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhereClause")
            .field("conditions", &self.conditions)
            .field("params", &self.params.len())
            .finish()
    }
}

impl WhereClause {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a predicate.
    ///
    /// Placeholder ordinals advance only for predicates that bind a value;
    /// numbering is taken from the parameter list itself, never from the
    /// predicate's position.
    pub fn push(&mut self, predicate: Predicate) -> &mut Self {
        match predicate.test {
            Test::Compare { op, value } => {
                self.params.push(value);
                self.conditions
                    .push(format!("{} {} ${}", predicate.column, op, self.params.len()));
            }
            Test::Fixed { expr } => {
                self.conditions.push(format!("{} {}", predicate.column, expr));
            }
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Clause text without the `WHERE` keyword, fragments joined with `AND`.
    pub fn clause(&self) -> String {
        self.conditions.join(" AND ")
    }

    /// Leading `" WHERE ..."` fragment, or an empty string when no predicate
    /// was pushed: no filter means all rows, never a bare `WHERE`.
    pub fn where_sql(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clause())
        }
    }

    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|p| p.as_ref() as &(dyn ToSql + Sync))
            .collect()
    }
}
