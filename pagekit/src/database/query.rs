//! Paged SQL query source
//!
//! [`SqlQuerySource`] holds a SELECT body, its bound parameters, and its
//! ORDER BY clauses as separate parts. Keeping the parts structural is
//! what makes counting trivial: the count statement simply never renders
//! the ordering or paging clauses, and reapplies the same bindings.

use std::marker::PhantomData;

use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::{FromRow, Row};

use super::error::QueryError;
use crate::filter::OrderDirection;
use crate::options::{CacheOption, CountMode, PaginationKind};
use crate::source::{PageWindow, QuerySource};

/// A parameter value bound into a paged query.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// Integer value
    Int(i64),
    /// Float value
    Real(f64),
    /// Text value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// SQL NULL
    Null,
}

impl From<i64> for SqlValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for SqlValue {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<bool> for SqlValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Bind a slice of [`SqlValue`]s onto a sqlx query or query-as value.
macro_rules! bind_values {
    ($query:expr, $values:expr) => {{
        let mut query = $query;
        for value in $values {
            query = match value {
                SqlValue::Int(n) => query.bind(*n),
                SqlValue::Real(v) => query.bind(*v),
                SqlValue::Text(s) => query.bind(s.clone()),
                SqlValue::Bool(b) => query.bind(*b),
                SqlValue::Null => query.bind(Option::<i64>::None),
            };
        }
        query
    }};
}
pub(crate) use bind_values;

/// Reject field/table names that cannot be interpolated safely.
///
/// Accepts alphanumerics, underscores, and dots (for qualified columns);
/// anything else is refused before it reaches the SQL text.
pub fn validate_identifier(name: &str) -> Result<(), QueryError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    if valid {
        Ok(())
    } else {
        Err(QueryError::UnsupportedQuery {
            reason: format!("invalid identifier {name:?}"),
        })
    }
}

pub(crate) fn clamp_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// A composable paged query over a SQLite pool.
///
/// `T` is the mapped entity shape, `R` the raw row shape; both decode via
/// [`sqlx::FromRow`] and default to the same type. The body is everything
/// up to (and excluding) ORDER BY: `SELECT ... FROM ... [WHERE ...]
/// [GROUP BY ...] [HAVING ...]`.
///
/// [`CacheOption`] values are accepted and deliberately ignored: SQLite
/// has no server-side result cache, and this layer never caches results
/// itself.
#[derive(Debug, Clone)]
pub struct SqlQuerySource<T, R = T> {
    pool: SqlitePool,
    body: String,
    order_by: Vec<(String, OrderDirection)>,
    binds: Vec<SqlValue>,
    _marker: PhantomData<fn() -> (T, R)>,
}

impl<T, R> SqlQuerySource<T, R> {
    /// A query source over `pool` with the given SELECT body.
    #[must_use]
    pub fn new(pool: SqlitePool, body: impl Into<String>) -> Self {
        Self {
            pool,
            body: body.into(),
            order_by: Vec::new(),
            binds: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Bind the next `?` placeholder of the body.
    #[must_use]
    pub fn bind(mut self, value: impl Into<SqlValue>) -> Self {
        self.binds.push(value.into());
        self
    }

    /// Append an ORDER BY clause. Ordering applies to page fetches only;
    /// count statements never render it.
    #[must_use]
    pub fn order_by(mut self, column: impl Into<String>, direction: OrderDirection) -> Self {
        self.order_by.push((column.into(), direction));
        self
    }

    fn paged_sql(&self, window: PageWindow) -> Result<String, QueryError> {
        let mut sql = self.body.clone();
        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            for (i, (column, direction)) in self.order_by.iter().enumerate() {
                validate_identifier(column)?;
                if i > 0 {
                    sql.push_str(", ");
                }
                sql.push_str(column);
                sql.push(' ');
                sql.push_str(direction.as_sql());
            }
        }
        match window.kind {
            PaginationKind::OffsetLimit => sql.push_str(" LIMIT ? OFFSET ?"),
            PaginationKind::TakeSkip => sql.push_str(" LIMIT ?, ?"),
        }
        Ok(sql)
    }

    fn window_binds(window: PageWindow) -> [SqlValue; 2] {
        let take = SqlValue::Int(clamp_i64(window.take()));
        let skip = SqlValue::Int(clamp_i64(window.skip()));
        match window.kind {
            PaginationKind::OffsetLimit => [take, skip],
            // LIMIT <skip>, <take>
            PaginationKind::TakeSkip => [skip, take],
        }
    }

    fn count_sql(&self, mode: CountMode) -> Result<String, QueryError> {
        match mode {
            CountMode::Raw => Ok(format!(
                "SELECT COUNT(*) FROM ({}) AS \"count_source\"",
                self.body
            )),
            CountMode::Native => {
                // rewrite the select list in place; GROUP BY stays, so this
                // can miscount grouped queries (the documented trade-off)
                let lower = self.body.to_ascii_lowercase();
                let from = lower
                    .find(" from ")
                    .ok_or_else(|| QueryError::UnsupportedQuery {
                        reason: "native count requires a FROM clause".to_string(),
                    })?;
                Ok(format!("SELECT COUNT(*){}", &self.body[from..]))
            }
        }
    }
}

impl<T, R> QuerySource for SqlQuerySource<T, R>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    R: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    type Item = T;
    type Raw = R;
    type Error = QueryError;

    async fn fetch_page(
        &self,
        window: PageWindow,
        _cache: &CacheOption,
    ) -> Result<Vec<T>, QueryError> {
        let sql = self.paged_sql(window)?;
        tracing::debug!(sql = %sql, "executing paged query");
        let query = bind_values!(sqlx::query_as::<_, T>(&sql), &self.binds);
        let query = bind_values!(query, &Self::window_binds(window));
        query.fetch_all(&self.pool).await.map_err(QueryError::from)
    }

    async fn fetch_raw_page(
        &self,
        window: PageWindow,
        _cache: &CacheOption,
    ) -> Result<Vec<R>, QueryError> {
        let sql = self.paged_sql(window)?;
        tracing::debug!(sql = %sql, "executing raw paged query");
        let query = bind_values!(sqlx::query_as::<_, R>(&sql), &self.binds);
        let query = bind_values!(query, &Self::window_binds(window));
        query.fetch_all(&self.pool).await.map_err(QueryError::from)
    }

    async fn fetch_page_with_raw(
        &self,
        window: PageWindow,
        _cache: &CacheOption,
    ) -> Result<(Vec<T>, Vec<R>), QueryError> {
        let sql = self.paged_sql(window)?;
        tracing::debug!(sql = %sql, "executing combined paged query");
        let query = bind_values!(sqlx::query(&sql), &self.binds);
        let query = bind_values!(query, &Self::window_binds(window));
        let rows = query.fetch_all(&self.pool).await?;

        let mut items = Vec::with_capacity(rows.len());
        let mut raw_items = Vec::with_capacity(rows.len());
        for row in &rows {
            items.push(T::from_row(row)?);
            raw_items.push(R::from_row(row)?);
        }
        Ok((items, raw_items))
    }

    async fn count(&self, mode: CountMode, _cache: &CacheOption) -> Result<u64, QueryError> {
        let sql = self.count_sql(mode)?;
        tracing::debug!(sql = %sql, "executing count query");
        let query = bind_values!(sqlx::query(&sql), &self.binds);
        let rows = query.fetch_all(&self.pool).await?;

        // a grouped native count can produce zero rows on an empty table
        let Some(row) = rows.first() else {
            return Ok(0);
        };
        let value: i64 = row.try_get(0)?;
        u64::try_from(value).map_err(|_| QueryError::InvalidCount {
            value: value.to_string(),
        })
    }
}
