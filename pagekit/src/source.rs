//! Data-source capability traits
//!
//! The pagination core never talks to a database directly. It is handed one
//! of two capabilities and orchestrates calls against it:
//!
//! - [`QuerySource`]: a composable query that can fetch a page of mapped
//!   items, raw rows, or both, and count its own result rows.
//! - [`Finder`]: a repository-style finder that fetches and counts
//!   entities matching caller-supplied [`Filter`](crate::filter::Filter)
//!   criteria.
//!
//! Both traits use RPITIT async methods and an associated `Error` type;
//! data-source failures propagate through the core unchanged, with no
//! translation or retry policy added.

use std::future::Future;

use crate::filter::Filter;
use crate::options::{CacheOption, CountMode, PaginationKind};

/// The row window of one page request.
///
/// Computed once per call from the resolved page/limit pair. The offset
/// saturates at zero for `page = 0`, so a zero page can never underflow
/// into a nonsensical window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Clause style the source should render
    pub kind: PaginationKind,
    /// Window size
    pub limit: u64,
    /// Rows to skip before the window starts
    pub offset: u64,
}

impl PageWindow {
    /// Window for a 1-based page number.
    #[must_use]
    pub fn for_page(kind: PaginationKind, page: u64, limit: u64) -> Self {
        Self {
            kind,
            limit,
            offset: limit.saturating_mul(page.saturating_sub(1)),
        }
    }

    /// Rows to skip (alias of `offset`, in take/skip vocabulary).
    #[must_use]
    pub fn skip(&self) -> u64 {
        self.offset
    }

    /// Rows to take (alias of `limit`, in take/skip vocabulary).
    #[must_use]
    pub fn take(&self) -> u64 {
        self.limit
    }
}

/// A composable query that can page and count itself.
///
/// `Item` is the mapped entity shape, `Raw` the unmapped row shape (for
/// queries carrying computed or aggregate columns). Implementations must
/// issue the fetch described by the [`PageWindow`] and honor the two
/// clause styles as identical row windows.
pub trait QuerySource: Send + Sync {
    /// Mapped entity type
    type Item;
    /// Raw row type
    type Raw;
    /// Execution error type, propagated unchanged to the caller
    type Error;

    /// Fetch one page of mapped entities.
    fn fetch_page(
        &self,
        window: PageWindow,
        cache: &CacheOption,
    ) -> impl Future<Output = Result<Vec<Self::Item>, Self::Error>> + Send;

    /// Fetch one page of raw rows.
    fn fetch_raw_page(
        &self,
        window: PageWindow,
        cache: &CacheOption,
    ) -> impl Future<Output = Result<Vec<Self::Raw>, Self::Error>> + Send;

    /// Fetch one page as mapped entities and raw rows in a single pass.
    ///
    /// Both vectors describe the same rows, so their lengths match.
    fn fetch_page_with_raw(
        &self,
        window: PageWindow,
        cache: &CacheOption,
    ) -> impl Future<Output = Result<(Vec<Self::Item>, Vec<Self::Raw>), Self::Error>> + Send;

    /// Count the query's result rows.
    ///
    /// [`CountMode::Raw`] must count the rows the full query would
    /// produce (grouping included), with ordering and paging clauses
    /// stripped; [`CountMode::Native`] may delegate to a cheaper built-in
    /// count with its documented caveats.
    fn count(
        &self,
        mode: CountMode,
        cache: &CacheOption,
    ) -> impl Future<Output = Result<u64, Self::Error>> + Send;
}

/// A repository-style finder over one entity type.
///
/// The same `filters` slice is merged into both `find` and `count`, so a
/// paginated request observes a single consistent subset of rows.
pub trait Finder: Send + Sync {
    /// Entity type
    type Item;
    /// Execution error type, propagated unchanged to the caller
    type Error;

    /// Fetch the entities inside the window, after applying `filters`.
    ///
    /// Finders page by skip/take; the window's clause style is irrelevant
    /// to them.
    fn find(
        &self,
        window: PageWindow,
        filters: &[Filter],
    ) -> impl Future<Output = Result<Vec<Self::Item>, Self::Error>> + Send;

    /// Count all entities matching `filters`.
    fn count(
        &self,
        filters: &[Filter],
    ) -> impl Future<Output = Result<u64, Self::Error>> + Send;
}
