//! # pagekit
//!
//! Paginated result envelopes over repository and query-builder data
//! sources: hand the library a data source and a page/limit request, get
//! back an immutable envelope of items, descriptive metadata, and
//! first/previous/next/last navigation links ready to embed in an HTTP
//! API response.
//!
//! ## Features
//!
//! - **Forgiving input**: `page`/`limit` accepted as numbers or strings;
//!   malformed values warn and fall back to documented defaults instead
//!   of failing the request
//! - **Two fetch strategies**: repository-style finders (with filter
//!   criteria) and composable queries (entities, raw rows, or both),
//!   behind one result contract
//! - **Concurrent counting**: the page fetch and the total count run as
//!   independent concurrent operations
//! - **Count strategies**: wrapped `COUNT(*)` subquery (correct under
//!   GROUP BY / HAVING) or the source's native count
//! - **Hypermedia links**: customizable query-string labels, edge pages
//!   handled (`""` for inapplicable links)
//! - **Bundled adapter**: a sqlx/SQLite query source and table finder
//!   behind the `database` feature
//!
//! ## Example
//!
//! ```rust,ignore
//! use pagekit::{paginate_repository, Filter, PaginateOptions};
//!
//! let page = paginate_repository(
//!     &article_repo,
//!     PaginateOptions::new()
//!         .page(query.page)          // possibly a raw query-string value
//!         .limit(query.limit)
//!         .route("https://example.com/articles"),
//!     &[Filter::eq("status", "published")],
//! )
//! .await?;
//!
//! assert_eq!(page.meta.current_page, 1);
//! assert_eq!(page.links.unwrap().first, "https://example.com/articles?limit=10");
//! ```
//!
//! ## Error behavior
//!
//! Bad paging input never fails a request; it degrades to defaults with a
//! `tracing` warning. Data-source failures are not caught, translated, or
//! retried here: they propagate to the caller unchanged.

pub mod envelope;
pub mod filter;
pub mod options;
pub mod paginate;
pub mod source;

#[cfg(feature = "database")]
pub mod database;

pub use envelope::{
    create_pagination, create_pagination_with, CreatePagination, Pagination, PaginationLinks,
    PaginationMeta, PaginationWithRaw,
};
pub use filter::{Filter, FilterOp, FilterValue, OrderDirection};
pub use options::{
    resolve_options, CacheOption, CountMode, InputWarning, PaginateOptions, PaginationKind,
    ParamDefaults, ParamValue, ResolvedParams, RoutingLabels, DEFAULT_LIMIT, DEFAULT_PAGE,
};
pub use paginate::{
    paginate, paginate_query, paginate_raw, paginate_raw_and_entities, paginate_repository,
    DataSource,
};
pub use source::{Finder, PageWindow, QuerySource};

#[cfg(feature = "database")]
pub use database::{QueryError, SqlQuerySource, SqlValue, TableFinder};
