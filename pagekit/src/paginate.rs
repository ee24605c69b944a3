//! Pagination entry points and fetch strategies
//!
//! Two strategies share one result contract:
//!
//! - the **repository strategy** ([`paginate_repository`]) pages a
//!   [`Finder`] with optional filter criteria merged into both the fetch
//!   and the count;
//! - the **query-builder strategy** ([`paginate_query`], [`paginate_raw`],
//!   [`paginate_raw_and_entities`]) pages a [`QuerySource`] in one of
//!   three result shapes.
//!
//! [`paginate`] is the unified entry point, dispatching on an explicit
//! [`DataSource`] discriminant. When counting is enabled, every strategy
//! issues the page fetch and the count as concurrent operations and
//! combines them only after both resolve.
//!
//! # Example
//!
//! ```rust,ignore
//! use pagekit::{paginate_query, PaginateOptions};
//!
//! let page = paginate_query(
//!     &articles_query,
//!     PaginateOptions::new().page(2).limit(25).route("/articles"),
//! )
//! .await?;
//!
//! assert_eq!(page.meta.current_page, 2);
//! ```

use std::future::Future;

use futures::try_join;

use crate::envelope::{create_pagination, CreatePagination, Pagination};
use crate::filter::Filter;
use crate::options::{resolve_options, PaginateOptions, ResolvedParams};
use crate::source::{Finder, PageWindow, QuerySource};

/// The two data-source shapes the unified entry point accepts.
///
/// An explicit discriminant instead of runtime type inspection: callers
/// say which capability they are handing over.
#[derive(Debug)]
pub enum DataSource<'a, R, Q> {
    /// A repository-style finder
    Repository(&'a R),
    /// A composable query
    QueryBuilder(&'a Q),
}

/// Paginate a repository or a query builder into an envelope.
///
/// Dispatches to [`paginate_repository`] or [`paginate_query`]; `filters`
/// apply only to the repository strategy (a query builder already carries
/// its own criteria) and may be `None`.
pub async fn paginate<T, E, R, Q>(
    source: DataSource<'_, R, Q>,
    options: PaginateOptions,
    filters: Option<&[Filter]>,
) -> Result<Pagination<T>, E>
where
    R: Finder<Item = T, Error = E>,
    Q: QuerySource<Item = T, Error = E>,
{
    match source {
        DataSource::Repository(repo) => {
            paginate_repository(repo, options, filters.unwrap_or(&[])).await
        }
        DataSource::QueryBuilder(query) => paginate_query(query, options).await,
    }
}

/// Paginate a [`Finder`], merging `filters` into both the fetch and the
/// count.
///
/// A resolved `page` below 1 short-circuits to an empty envelope with a
/// zero total, without touching the data source; a zero page would
/// otherwise describe a nonsensical window.
pub async fn paginate_repository<R: Finder>(
    repo: &R,
    options: PaginateOptions,
    filters: &[Filter],
) -> Result<Pagination<R::Item>, R::Error> {
    let (params, _) = resolve_options(&options);

    if params.page < 1 {
        return Ok(create_pagination(envelope_args(
            Vec::new(),
            Some(0),
            &params,
        )));
    }

    let window = PageWindow::for_page(params.kind, params.page, params.limit);
    let (items, total) = fetch_with_count(
        params.count_queries,
        || repo.find(window, filters),
        || repo.count(filters),
    )
    .await?;

    Ok(create_pagination(envelope_args(items, total, &params)))
}

/// Paginate a [`QuerySource`] into an envelope of mapped entities.
pub async fn paginate_query<Q: QuerySource>(
    query: &Q,
    options: PaginateOptions,
) -> Result<Pagination<Q::Item>, Q::Error> {
    let (params, _) = resolve_options(&options);
    let window = PageWindow::for_page(params.kind, params.page, params.limit);

    let (items, total) = fetch_with_count(
        params.count_queries,
        || query.fetch_page(window, &params.cache),
        || query.count(params.count_mode, &params.cache),
    )
    .await?;

    Ok(create_pagination(envelope_args(items, total, &params)))
}

/// Paginate a [`QuerySource`] into an envelope of raw rows.
pub async fn paginate_raw<Q: QuerySource>(
    query: &Q,
    options: PaginateOptions,
) -> Result<Pagination<Q::Raw>, Q::Error> {
    let (params, _) = resolve_options(&options);
    let window = PageWindow::for_page(params.kind, params.page, params.limit);

    let (items, total) = fetch_with_count(
        params.count_queries,
        || query.fetch_raw_page(window, &params.cache),
        || query.count(params.count_mode, &params.cache),
    )
    .await?;

    Ok(create_pagination(envelope_args(items, total, &params)))
}

/// Paginate a [`QuerySource`] into an envelope of mapped entities plus the
/// raw rows they came from.
///
/// One data fetch produces both shapes, so the returned vectors always
/// have matching row counts for the requested page.
pub async fn paginate_raw_and_entities<Q: QuerySource>(
    query: &Q,
    options: PaginateOptions,
) -> Result<(Pagination<Q::Item>, Vec<Q::Raw>), Q::Error> {
    let (params, _) = resolve_options(&options);
    let window = PageWindow::for_page(params.kind, params.page, params.limit);

    let ((items, raw_items), total) = fetch_with_count(
        params.count_queries,
        || query.fetch_page_with_raw(window, &params.cache),
        || query.count(params.count_mode, &params.cache),
    )
    .await?;

    Ok((
        create_pagination(envelope_args(items, total, &params)),
        raw_items,
    ))
}

/// Run the page fetch, and the count when enabled, as concurrent
/// operations. All strategies funnel through here so the paging/count
/// logic exists exactly once.
async fn fetch_with_count<O, E, FetchFut, CountFut>(
    count_enabled: bool,
    fetch: impl FnOnce() -> FetchFut,
    count: impl FnOnce() -> CountFut,
) -> Result<(O, Option<u64>), E>
where
    FetchFut: Future<Output = Result<O, E>>,
    CountFut: Future<Output = Result<u64, E>>,
{
    if count_enabled {
        let (fetched, total) = try_join!(fetch(), count())?;
        Ok((fetched, Some(total)))
    } else {
        Ok((fetch().await?, None))
    }
}

fn envelope_args<T>(
    items: Vec<T>,
    total_items: Option<u64>,
    params: &ResolvedParams,
) -> CreatePagination<T> {
    CreatePagination {
        items,
        total_items,
        current_page: params.page,
        limit: params.limit,
        route: params.route.clone(),
        labels: params.labels.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterOp, FilterValue};
    use crate::options::{CacheOption, CountMode, PaginationKind};
    use std::convert::Infallible;

    /// Vec-backed finder; understands `value >= n` filters.
    struct MockRepo {
        rows: Vec<u32>,
    }

    impl MockRepo {
        fn with_rows(n: u32) -> Self {
            Self {
                rows: (0..n).collect(),
            }
        }

        fn matching(&self, filters: &[Filter]) -> Vec<u32> {
            self.rows
                .iter()
                .copied()
                .filter(|row| {
                    filters.iter().all(|f| match (&f.op, &f.value) {
                        (FilterOp::GreaterThanOrEqual, FilterValue::Int(n)) => {
                            i64::from(*row) >= *n
                        }
                        _ => true,
                    })
                })
                .collect()
        }
    }

    impl Finder for MockRepo {
        type Item = u32;
        type Error = Infallible;

        async fn find(
            &self,
            window: PageWindow,
            filters: &[Filter],
        ) -> Result<Vec<u32>, Infallible> {
            Ok(self
                .matching(filters)
                .into_iter()
                .skip(window.skip() as usize)
                .take(window.take() as usize)
                .collect())
        }

        async fn count(&self, filters: &[Filter]) -> Result<u64, Infallible> {
            Ok(self.matching(filters).len() as u64)
        }
    }

    /// Vec-backed query source; raw rows are stringified items.
    struct MockQuery {
        rows: Vec<u32>,
    }

    impl MockQuery {
        fn with_rows(n: u32) -> Self {
            Self {
                rows: (0..n).collect(),
            }
        }

        fn window_of(&self, window: PageWindow) -> Vec<u32> {
            self.rows
                .iter()
                .copied()
                .skip(window.offset as usize)
                .take(window.limit as usize)
                .collect()
        }
    }

    impl QuerySource for MockQuery {
        type Item = u32;
        type Raw = String;
        type Error = Infallible;

        async fn fetch_page(
            &self,
            window: PageWindow,
            _cache: &CacheOption,
        ) -> Result<Vec<u32>, Infallible> {
            Ok(self.window_of(window))
        }

        async fn fetch_raw_page(
            &self,
            window: PageWindow,
            _cache: &CacheOption,
        ) -> Result<Vec<String>, Infallible> {
            Ok(self
                .window_of(window)
                .into_iter()
                .map(|n| format!("raw-{n}"))
                .collect())
        }

        async fn fetch_page_with_raw(
            &self,
            window: PageWindow,
            _cache: &CacheOption,
        ) -> Result<(Vec<u32>, Vec<String>), Infallible> {
            let items = self.window_of(window);
            let raw = items.iter().map(|n| format!("raw-{n}")).collect();
            Ok((items, raw))
        }

        async fn count(
            &self,
            _mode: CountMode,
            _cache: &CacheOption,
        ) -> Result<u64, Infallible> {
            Ok(self.rows.len() as u64)
        }
    }

    /// Query source whose every operation fails.
    struct BrokenQuery;

    #[derive(Debug, PartialEq)]
    struct BrokenError(&'static str);

    impl QuerySource for BrokenQuery {
        type Item = u32;
        type Raw = u32;
        type Error = BrokenError;

        async fn fetch_page(
            &self,
            _window: PageWindow,
            _cache: &CacheOption,
        ) -> Result<Vec<u32>, BrokenError> {
            Err(BrokenError("connection reset"))
        }

        async fn fetch_raw_page(
            &self,
            _window: PageWindow,
            _cache: &CacheOption,
        ) -> Result<Vec<u32>, BrokenError> {
            Err(BrokenError("connection reset"))
        }

        async fn fetch_page_with_raw(
            &self,
            _window: PageWindow,
            _cache: &CacheOption,
        ) -> Result<(Vec<u32>, Vec<u32>), BrokenError> {
            Err(BrokenError("connection reset"))
        }

        async fn count(
            &self,
            _mode: CountMode,
            _cache: &CacheOption,
        ) -> Result<u64, BrokenError> {
            Err(BrokenError("connection reset"))
        }
    }

    fn options(page: u64, limit: u64) -> PaginateOptions {
        PaginateOptions::new().page(page).limit(limit)
    }

    #[tokio::test]
    async fn test_repository_first_page() {
        let repo = MockRepo::with_rows(10);
        let page = paginate_repository(&repo, options(1, 4), &[]).await.unwrap();

        assert_eq!(page.items, vec![0, 1, 2, 3]);
        assert_eq!(page.meta.item_count, 4);
        assert_eq!(page.meta.total_items, Some(10));
        assert_eq!(page.meta.total_pages, Some(3));
        assert_eq!(page.meta.current_page, 1);
    }

    #[tokio::test]
    async fn test_repository_filters_apply_to_fetch_and_count() {
        let repo = MockRepo::with_rows(10);
        let filters = [Filter::gte("value", 6)];
        let page = paginate_repository(&repo, options(1, 10), &filters)
            .await
            .unwrap();

        assert_eq!(page.items, vec![6, 7, 8, 9]);
        assert_eq!(page.meta.total_items, Some(4));
        assert_eq!(page.meta.total_pages, Some(1));
    }

    #[tokio::test]
    async fn test_repository_page_zero_short_circuits() {
        let repo = MockRepo::with_rows(10);
        let page = paginate_repository(
            &repo,
            options(0, 4).route("http://x/y"),
            &[],
        )
        .await
        .unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.meta.total_items, Some(0));
        let links = page.links.unwrap();
        assert_ne!(links.first, "");
        assert_eq!(links.previous, "");
        assert_eq!(links.next, "");
        assert_eq!(links.last, "");
    }

    #[tokio::test]
    async fn test_repository_page_past_the_end() {
        let repo = MockRepo::with_rows(10);
        let page = paginate_repository(&repo, options(5, 4), &[]).await.unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.meta.item_count, 0);
        assert_eq!(page.meta.total_items, Some(10));
        assert_eq!(page.meta.current_page, 5);
    }

    #[tokio::test]
    async fn test_query_builder_page() {
        let query = MockQuery::with_rows(10);
        let page = paginate_query(&query, options(2, 4).route("http://x/y"))
            .await
            .unwrap();

        assert_eq!(page.items, vec![4, 5, 6, 7]);
        assert_eq!(page.meta.total_pages, Some(3));
        let links = page.links.unwrap();
        assert_eq!(links.previous, "http://x/y?page=1&limit=4");
        assert_eq!(links.next, "http://x/y?page=3&limit=4");
    }

    #[tokio::test]
    async fn test_pagination_kinds_produce_identical_windows() {
        let query = MockQuery::with_rows(20);
        let offset_limit = paginate_query(
            &query,
            options(3, 5).pagination_kind(PaginationKind::OffsetLimit),
        )
        .await
        .unwrap();
        let take_skip = paginate_query(
            &query,
            options(3, 5).pagination_kind(PaginationKind::TakeSkip),
        )
        .await
        .unwrap();

        assert_eq!(offset_limit, take_skip);
        assert_eq!(offset_limit.items, vec![10, 11, 12, 13, 14]);
    }

    #[tokio::test]
    async fn test_count_disabled_leaves_totals_unset() {
        let query = MockQuery::with_rows(10);
        let page = paginate_query(
            &query,
            options(1, 4).route("http://x/y").count_queries(false),
        )
        .await
        .unwrap();

        assert_eq!(page.meta.total_items, None);
        assert_eq!(page.meta.total_pages, None);
        let links = page.links.unwrap();
        assert_eq!(links.next, "");
        assert_eq!(links.last, "");
    }

    #[tokio::test]
    async fn test_malformed_limit_falls_back_to_default() {
        let query = MockQuery::with_rows(30);
        let page = paginate_query(&query, PaginateOptions::new().page(1).limit("x"))
            .await
            .unwrap();

        assert_eq!(page.meta.items_per_page, 10);
        assert_eq!(page.items.len(), 10);
    }

    #[tokio::test]
    async fn test_paginate_raw() {
        let query = MockQuery::with_rows(6);
        let page = paginate_raw(&query, options(2, 2)).await.unwrap();

        assert_eq!(page.items, vec!["raw-2".to_string(), "raw-3".to_string()]);
        assert_eq!(page.meta.total_items, Some(6));
    }

    #[tokio::test]
    async fn test_paginate_raw_and_entities() {
        let query = MockQuery::with_rows(10);
        let (page, raw) = paginate_raw_and_entities(&query, options(1, 4))
            .await
            .unwrap();

        assert_eq!(page.items, vec![0, 1, 2, 3]);
        assert_eq!(raw.len(), page.items.len());
        assert_eq!(raw[0], "raw-0");
        assert_eq!(page.meta.total_pages, Some(3));
    }

    #[tokio::test]
    async fn test_unified_entry_point_dispatches() {
        let repo = MockRepo::with_rows(10);
        let query = MockQuery::with_rows(10);

        let via_repo = paginate(
            DataSource::<MockRepo, MockQuery>::Repository(&repo),
            options(1, 4),
            None,
        )
        .await
        .unwrap();
        let via_query = paginate(
            DataSource::<MockRepo, MockQuery>::QueryBuilder(&query),
            options(1, 4),
            None,
        )
        .await
        .unwrap();

        assert_eq!(via_repo, via_query);
    }

    #[tokio::test]
    async fn test_round_trip_reassembles_the_data_set() {
        let repo = MockRepo::with_rows(10);
        let limit = 4;
        let mut collected = Vec::new();

        for page_number in 1..=3 {
            let page = paginate_repository(&repo, options(page_number, limit), &[])
                .await
                .unwrap();
            assert_eq!(page.meta.total_pages, Some(3));
            collected.extend(page.items);
        }

        assert_eq!(collected, (0..10).collect::<Vec<u32>>());
    }

    #[tokio::test]
    async fn test_source_failure_propagates_unchanged() {
        let query = BrokenQuery;
        let error = paginate_query(&query, options(1, 4)).await.unwrap_err();
        assert_eq!(error, BrokenError("connection reset"));

        let error = paginate_raw(&query, options(1, 4)).await.unwrap_err();
        assert_eq!(error, BrokenError("connection reset"));
    }
}
