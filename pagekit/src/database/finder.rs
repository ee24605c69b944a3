//! Table-backed finder
//!
//! [`TableFinder`] implements the repository capability over one table:
//! caller-supplied [`Filter`] criteria become a parameterized WHERE clause
//! that the page fetch and the count share, so both always observe the
//! same subset of rows.

use std::marker::PhantomData;

use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::{FromRow, Row};

use super::error::QueryError;
use super::query::{bind_values, clamp_i64, validate_identifier, SqlValue};
use crate::filter::{Filter, FilterOp, FilterValue, OrderDirection};
use crate::source::{Finder, PageWindow};

/// A repository-style finder over a single table.
///
/// # Example
///
/// ```rust,ignore
/// use pagekit::database::TableFinder;
/// use pagekit::{paginate_repository, Filter, OrderDirection, PaginateOptions};
///
/// let repo = TableFinder::<Article>::new(pool, "articles")
///     .order_by("id", OrderDirection::Ascending);
///
/// let page = paginate_repository(
///     &repo,
///     PaginateOptions::new().page(1).limit(20),
///     &[Filter::eq("status", "published")],
/// )
/// .await?;
/// ```
#[derive(Debug, Clone)]
pub struct TableFinder<T> {
    pool: SqlitePool,
    table: String,
    order_by: Vec<(String, OrderDirection)>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> TableFinder<T> {
    /// A finder over `table` in `pool`.
    #[must_use]
    pub fn new(pool: SqlitePool, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
            order_by: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Append an ORDER BY clause applied to page fetches.
    #[must_use]
    pub fn order_by(mut self, column: impl Into<String>, direction: OrderDirection) -> Self {
        self.order_by.push((column.into(), direction));
        self
    }

    fn order_clause(&self) -> Result<String, QueryError> {
        if self.order_by.is_empty() {
            return Ok(String::new());
        }
        let mut sql = String::from(" ORDER BY ");
        for (i, (column, direction)) in self.order_by.iter().enumerate() {
            validate_identifier(column)?;
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(column);
            sql.push(' ');
            sql.push_str(direction.as_sql());
        }
        Ok(sql)
    }
}

fn scalar_value(value: &FilterValue) -> Result<SqlValue, QueryError> {
    match value {
        FilterValue::Text(s) => Ok(SqlValue::Text(s.clone())),
        FilterValue::Int(n) => Ok(SqlValue::Int(*n)),
        FilterValue::Float(v) => Ok(SqlValue::Real(*v)),
        FilterValue::Bool(b) => Ok(SqlValue::Bool(*b)),
        FilterValue::Null => Ok(SqlValue::Null),
        FilterValue::TextList(_) | FilterValue::IntList(_) => Err(QueryError::UnsupportedQuery {
            reason: "list value outside an IN filter".to_string(),
        }),
    }
}

fn push_in_list(sql: &mut String, field: &str, len: usize) {
    if len == 0 {
        // empty IN matches nothing
        sql.push_str("1 = 0");
        return;
    }
    sql.push_str(field);
    sql.push_str(" IN (");
    for i in 0..len {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push('?');
    }
    sql.push(')');
}

fn where_clause(filters: &[Filter]) -> Result<(String, Vec<SqlValue>), QueryError> {
    if filters.is_empty() {
        return Ok((String::new(), Vec::new()));
    }
    let mut sql = String::from(" WHERE ");
    let mut binds = Vec::new();
    for (i, filter) in filters.iter().enumerate() {
        validate_identifier(&filter.field)?;
        if i > 0 {
            sql.push_str(" AND ");
        }
        match (&filter.op, &filter.value) {
            (FilterOp::IsNull | FilterOp::IsNotNull, _) => {
                sql.push_str(&filter.field);
                sql.push(' ');
                sql.push_str(&filter.op.to_string());
            }
            (FilterOp::In, FilterValue::TextList(values)) => {
                push_in_list(&mut sql, &filter.field, values.len());
                binds.extend(values.iter().cloned().map(SqlValue::Text));
            }
            (FilterOp::In, FilterValue::IntList(values)) => {
                push_in_list(&mut sql, &filter.field, values.len());
                binds.extend(values.iter().copied().map(SqlValue::Int));
            }
            (FilterOp::In, _) => {
                return Err(QueryError::UnsupportedQuery {
                    reason: format!("IN filter on {:?} requires a list value", filter.field),
                });
            }
            (op, value) => {
                sql.push_str(&filter.field);
                sql.push(' ');
                sql.push_str(&op.to_string());
                sql.push_str(" ?");
                binds.push(scalar_value(value)?);
            }
        }
    }
    Ok((sql, binds))
}

impl<T> Finder for TableFinder<T>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    type Item = T;
    type Error = QueryError;

    async fn find(&self, window: PageWindow, filters: &[Filter]) -> Result<Vec<T>, QueryError> {
        validate_identifier(&self.table)?;
        let (where_sql, binds) = where_clause(filters)?;
        // finders page by skip/take; the window's clause style is irrelevant
        let sql = format!(
            "SELECT * FROM {}{}{} LIMIT ? OFFSET ?",
            self.table,
            where_sql,
            self.order_clause()?
        );
        tracing::debug!(sql = %sql, "executing finder query");

        let query = bind_values!(sqlx::query_as::<_, T>(&sql), &binds);
        let query = query
            .bind(clamp_i64(window.take()))
            .bind(clamp_i64(window.skip()));
        query.fetch_all(&self.pool).await.map_err(QueryError::from)
    }

    async fn count(&self, filters: &[Filter]) -> Result<u64, QueryError> {
        validate_identifier(&self.table)?;
        let (where_sql, binds) = where_clause(filters)?;
        let sql = format!("SELECT COUNT(*) FROM {}{}", self.table, where_sql);
        tracing::debug!(sql = %sql, "executing finder count");

        let query = bind_values!(sqlx::query(&sql), &binds);
        let row = query.fetch_one(&self.pool).await?;
        let value: i64 = row.try_get(0)?;
        u64::try_from(value).map_err(|_| QueryError::InvalidCount {
            value: value.to_string(),
        })
    }
}
