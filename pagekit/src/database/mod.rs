//! Bundled sqlx data sources (feature `database`)
//!
//! A SQLite-backed implementation of both pagination capabilities:
//!
//! - [`SqlQuerySource`]: a caller-written SELECT body with bound
//!   parameters and structural ORDER BY clauses, implementing
//!   [`QuerySource`](crate::source::QuerySource). Raw counting wraps the
//!   body as a `COUNT(*)` subquery with ordering and paging stripped, so
//!   grouped and aggregated queries count their result rows correctly.
//! - [`TableFinder`]: a single-table finder implementing
//!   [`Finder`](crate::source::Finder), rendering
//!   [`Filter`](crate::filter::Filter) criteria into a parameterized
//!   WHERE clause shared by the fetch and the count.
//!
//! The adapter only concatenates caller-supplied clauses and delegates
//! execution to sqlx; it is not a query planner. Field and table names
//! are checked by [`validate_identifier`] before being interpolated.
//!
//! # Example
//!
//! ```rust,ignore
//! use pagekit::database::SqlQuerySource;
//! use pagekit::{paginate_query, OrderDirection, PaginateOptions};
//!
//! let query = SqlQuerySource::<Article>::new(
//!     pool,
//!     "SELECT id, title FROM articles WHERE published = ?",
//! )
//! .bind(true)
//! .order_by("id", OrderDirection::Ascending);
//!
//! let page = paginate_query(&query, PaginateOptions::new().page(1).limit(20)).await?;
//! ```

mod error;
mod finder;
mod query;

pub use error::QueryError;
pub use finder::TableFinder;
pub use query::{validate_identifier, SqlQuerySource, SqlValue};
