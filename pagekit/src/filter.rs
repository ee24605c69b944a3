//! Filter criteria for repository-style finders
//!
//! A [`Filter`] is one condition merged into both the page fetch and the
//! count query of the repository strategy, so the two always observe the
//! same subset of rows. The pagination core treats filters as opaque data;
//! rendering them into a WHERE clause is the data source's job.

use std::fmt;

/// Direction for an ORDER BY clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    /// Ascending (A-Z, 0-9)
    #[default]
    Ascending,
    /// Descending (Z-A, 9-0)
    Descending,
}

impl OrderDirection {
    /// SQL keyword for this direction.
    #[must_use]
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Comparison operator of a [`Filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// `=`
    Equal,
    /// `!=`
    NotEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqual,
    /// `LIKE`
    Like,
    /// `IN (...)`
    In,
    /// `IS NULL`
    IsNull,
    /// `IS NOT NULL`
    IsNotNull,
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::Like => "LIKE",
            Self::In => "IN",
            Self::IsNull => "IS NULL",
            Self::IsNotNull => "IS NOT NULL",
        };
        f.write_str(op)
    }
}

/// A comparison value inside a [`Filter`].
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Text value
    Text(String),
    /// 64-bit integer value
    Int(i64),
    /// 64-bit float value
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// Text list, for `IN`
    TextList(Vec<String>),
    /// Integer list, for `IN`
    IntList(Vec<i64>),
    /// No value (`IS NULL` / `IS NOT NULL`)
    Null,
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for FilterValue {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for FilterValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(list: Vec<String>) -> Self {
        Self::TextList(list)
    }
}

impl From<Vec<i64>> for FilterValue {
    fn from(list: Vec<i64>) -> Self {
        Self::IntList(list)
    }
}

/// One filter condition on a field.
///
/// # Example
///
/// ```rust
/// use pagekit::filter::Filter;
///
/// let filters = vec![
///     Filter::eq("status", "published"),
///     Filter::gte("score", 50),
///     Filter::is_null("deleted_at"),
/// ];
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Field name the condition applies to
    pub field: String,
    /// Comparison operator
    pub op: FilterOp,
    /// Comparison value
    pub value: FilterValue,
}

impl Filter {
    /// A condition with an explicit operator and value.
    pub fn new(field: impl Into<String>, op: FilterOp, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }

    /// `field = value`
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOp::Equal, value.into())
    }

    /// `field != value`
    pub fn ne(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOp::NotEqual, value.into())
    }

    /// `field > value`
    pub fn gt(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOp::GreaterThan, value.into())
    }

    /// `field >= value`
    pub fn gte(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOp::GreaterThanOrEqual, value.into())
    }

    /// `field < value`
    pub fn lt(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOp::LessThan, value.into())
    }

    /// `field <= value`
    pub fn lte(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOp::LessThanOrEqual, value.into())
    }

    /// `field LIKE pattern`
    pub fn like(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(field, FilterOp::Like, FilterValue::Text(pattern.into()))
    }

    /// `field IN (values...)`
    pub fn within(field: impl Into<String>, values: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOp::In, values.into())
    }

    /// `field IS NULL`
    pub fn is_null(field: impl Into<String>) -> Self {
        Self::new(field, FilterOp::IsNull, FilterValue::Null)
    }

    /// `field IS NOT NULL`
    pub fn is_not_null(field: impl Into<String>) -> Self {
        Self::new(field, FilterOp::IsNotNull, FilterValue::Null)
    }
}
