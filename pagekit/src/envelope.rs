//! Pagination envelopes: items + meta + navigation links
//!
//! [`create_pagination`] combines a fetched page, an optional total count,
//! and the paging parameters into an immutable [`Pagination`] envelope.
//! The serialized shape uses camelCase keys (`itemCount`, `totalItems`,
//! `itemsPerPage`, `totalPages`, `currentPage`) so it can be embedded
//! directly in an HTTP API response.
//!
//! # Example
//!
//! ```rust
//! use pagekit::envelope::{create_pagination, CreatePagination};
//!
//! let args = CreatePagination::new(vec!["a", "b", "c", "d"], 1, 4)
//!     .total_items(10)
//!     .route("http://x/y");
//! let page = create_pagination(args);
//!
//! assert_eq!(page.meta.item_count, 4);
//! assert_eq!(page.meta.total_pages, Some(3));
//! let links = page.links.as_ref().unwrap();
//! assert_eq!(links.next, "http://x/y?page=2&limit=4");
//! ```

use serde::Serialize;

use crate::options::RoutingLabels;

/// Descriptive metadata of one page of results.
///
/// `total_items` and `total_pages` are absent when counting was disabled
/// for the request; they are never silently reported as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Number of items on this page
    pub item_count: u64,
    /// Total number of items across all pages, when counted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_items: Option<u64>,
    /// Requested page size
    pub items_per_page: u64,
    /// Total number of pages, when counted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
    /// The page this envelope points to
    pub current_page: u64,
}

/// Navigation links of one page of results.
///
/// Inapplicable links are empty strings rather than omitted keys, so
/// consumers can pattern-match on `""`: page 1 has no `previous`, the
/// final page has no `next`, and `last` disappears when the total is
/// unknown or zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct PaginationLinks {
    /// Link to the first page
    pub first: String,
    /// Link to the previous page, or `""` on page 1
    pub previous: String,
    /// Link to the next page, or `""` on the last page
    pub next: String,
    /// Link to the last page, or `""` when the total is unknown or zero
    pub last: String,
}

/// One page of results with metadata and navigation links.
///
/// Constructed once per call and never mutated. `links` is present only
/// when the request supplied a route. Generic over the meta type so a
/// transformed meta shape (see [`Pagination::map_meta`]) travels in the
/// same container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination<T, M = PaginationMeta> {
    /// The items of this page
    pub items: Vec<T>,
    /// Page metadata
    pub meta: M,
    /// Navigation links, when a route was supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<PaginationLinks>,
}

impl<T, M> Pagination<T, M> {
    /// Assemble an envelope from already-built parts.
    #[must_use]
    pub fn new(items: Vec<T>, meta: M, links: Option<PaginationLinks>) -> Self {
        Self { items, meta, links }
    }

    /// Replace the meta object with a transformed shape.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pagekit::envelope::{create_pagination, CreatePagination};
    ///
    /// let page = create_pagination(CreatePagination::new(vec![1, 2], 1, 2).total_items(2));
    /// let page = page.map_meta(|meta| meta.item_count);
    /// assert_eq!(page.meta, 2);
    /// ```
    #[must_use]
    pub fn map_meta<M2>(self, transform: impl FnOnce(M) -> M2) -> Pagination<T, M2> {
        Pagination {
            items: self.items,
            meta: transform(self.meta),
            links: self.links,
        }
    }
}

/// One page of mapped entities together with the raw rows they came from.
///
/// Combined carrier for the raw-and-entities fetch shape, where the query
/// carries aggregate or computed columns that the mapped entities do not
/// hold. `items` and `raw_items` describe the same rows in the same order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationWithRaw<T, R, M = PaginationMeta> {
    /// The mapped entities of this page
    pub items: Vec<T>,
    /// The raw rows of this page
    pub raw_items: Vec<R>,
    /// Page metadata
    pub meta: M,
    /// Navigation links, when a route was supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<PaginationLinks>,
}

impl<T, R, M> From<(Pagination<T, M>, Vec<R>)> for PaginationWithRaw<T, R, M> {
    fn from((page, raw_items): (Pagination<T, M>, Vec<R>)) -> Self {
        Self {
            items: page.items,
            raw_items,
            meta: page.meta,
            links: page.links,
        }
    }
}

/// Input of the envelope builder.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePagination<T> {
    /// Items of the requested page
    pub items: Vec<T>,
    /// Total item count, absent when counting was disabled
    pub total_items: Option<u64>,
    /// The requested page number
    pub current_page: u64,
    /// The requested page size
    pub limit: u64,
    /// Base route for link generation
    pub route: Option<String>,
    /// Query-string labels for link generation
    pub labels: RoutingLabels,
}

impl<T> CreatePagination<T> {
    /// Builder input with no total, no route, and default labels.
    #[must_use]
    pub fn new(items: Vec<T>, current_page: u64, limit: u64) -> Self {
        Self {
            items,
            total_items: None,
            current_page,
            limit,
            route: None,
            labels: RoutingLabels::default(),
        }
    }

    /// Set the total item count.
    #[must_use]
    pub fn total_items(mut self, total: u64) -> Self {
        self.total_items = Some(total);
        self
    }

    /// Set the base route used for link generation.
    #[must_use]
    pub fn route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// Set custom link labels.
    #[must_use]
    pub fn labels(mut self, labels: RoutingLabels) -> Self {
        self.labels = labels;
        self
    }
}

/// Build a [`Pagination`] envelope with the default meta shape.
///
/// Always returns a well-formed envelope: zero items and out-of-range
/// pages produce `item_count = 0` with sensibly empty links, never an
/// absent envelope.
pub fn create_pagination<T>(args: CreatePagination<T>) -> Pagination<T> {
    create_pagination_with(args, std::convert::identity)
}

/// Build a [`Pagination`] envelope, passing the computed default meta
/// through `transform` to produce a custom meta shape.
pub fn create_pagination_with<T, M>(
    args: CreatePagination<T>,
    transform: impl FnOnce(PaginationMeta) -> M,
) -> Pagination<T, M> {
    let CreatePagination {
        items,
        total_items,
        current_page,
        limit,
        route,
        labels,
    } = args;

    let total_pages = total_items.map(|total| {
        if limit == 0 {
            // degenerate window; a zero divisor has no meaningful page count
            0
        } else {
            total.div_ceil(limit)
        }
    });

    let meta = PaginationMeta {
        item_count: items.len() as u64,
        total_items,
        items_per_page: limit,
        total_pages,
        current_page,
    };

    let links = route
        .as_deref()
        .map(|route| build_links(route, &labels, current_page, limit, total_pages));

    Pagination::new(items, transform(meta), links)
}

fn build_links(
    route: &str,
    labels: &RoutingLabels,
    current_page: u64,
    limit: u64,
    total_pages: Option<u64>,
) -> PaginationLinks {
    let sep = if route.contains('?') { '&' } else { '?' };
    let page_label = &labels.page_label;
    let limit_label = &labels.limit_label;

    let first = format!("{route}{sep}{limit_label}={limit}");

    let previous = if current_page > 1 {
        format!(
            "{route}{sep}{page_label}={}&{limit_label}={limit}",
            current_page - 1
        )
    } else {
        String::new()
    };

    let next = match total_pages {
        Some(total_pages) if current_page < total_pages => format!(
            "{route}{sep}{page_label}={}&{limit_label}={limit}",
            current_page + 1
        ),
        _ => String::new(),
    };

    let last = match total_pages {
        Some(total_pages) if total_pages > 0 => {
            format!("{route}{sep}{page_label}={total_pages}&{limit_label}={limit}")
        }
        _ => String::new(),
    };

    PaginationLinks {
        first,
        previous,
        next,
        last,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ten_item_args() -> CreatePagination<u32> {
        CreatePagination::new(vec![1, 2, 3, 4], 1, 4)
            .total_items(10)
            .route("http://x/y")
    }

    #[test]
    fn test_meta_counts() {
        let page = create_pagination(ten_item_args());
        assert_eq!(page.meta.item_count, 4);
        assert_eq!(page.meta.total_items, Some(10));
        assert_eq!(page.meta.items_per_page, 4);
        assert_eq!(page.meta.total_pages, Some(3));
        assert_eq!(page.meta.current_page, 1);
    }

    #[test]
    fn test_links_on_first_page() {
        let page = create_pagination(ten_item_args());
        let links = page.links.unwrap();
        assert_eq!(links.first, "http://x/y?limit=4");
        assert_eq!(links.previous, "");
        assert_eq!(links.next, "http://x/y?page=2&limit=4");
        assert_eq!(links.last, "http://x/y?page=3&limit=4");
    }

    #[test]
    fn test_links_on_middle_page() {
        let args = CreatePagination::new(vec![5, 6, 7, 8], 2, 4)
            .total_items(10)
            .route("http://x/y");
        let links = create_pagination(args).links.unwrap();
        assert_eq!(links.previous, "http://x/y?page=1&limit=4");
        assert_eq!(links.next, "http://x/y?page=3&limit=4");
    }

    #[test]
    fn test_links_on_last_page() {
        let args = CreatePagination::new(vec![9, 10], 3, 4)
            .total_items(10)
            .route("http://x/y");
        let links = create_pagination(args).links.unwrap();
        assert_eq!(links.previous, "http://x/y?page=2&limit=4");
        assert_eq!(links.next, "");
        assert_eq!(links.last, "http://x/y?page=3&limit=4");
    }

    #[test]
    fn test_route_with_existing_query_string_uses_ampersand() {
        let args = CreatePagination::new(vec![1], 1, 5)
            .total_items(1)
            .route("http://x/y?q=rust");
        let links = create_pagination(args).links.unwrap();
        assert_eq!(links.first, "http://x/y?q=rust&limit=5");
        assert_eq!(links.last, "http://x/y?q=rust&page=1&limit=5");
    }

    #[test]
    fn test_custom_labels() {
        let args = CreatePagination::new(vec![1, 2], 1, 2)
            .total_items(4)
            .route("http://x/y")
            .labels(RoutingLabels {
                page_label: "p".to_string(),
                limit_label: "per_page".to_string(),
            });
        let links = create_pagination(args).links.unwrap();
        assert_eq!(links.first, "http://x/y?per_page=2");
        assert_eq!(links.next, "http://x/y?p=2&per_page=2");
    }

    #[test]
    fn test_no_route_means_no_links() {
        let page = create_pagination(CreatePagination::new(vec![1, 2], 1, 2).total_items(4));
        assert!(page.links.is_none());
    }

    #[test]
    fn test_unknown_total_removes_next_and_last() {
        let args = CreatePagination::new(vec![1, 2], 1, 2).route("http://x/y");
        let page = create_pagination(args);
        assert_eq!(page.meta.total_items, None);
        assert_eq!(page.meta.total_pages, None);
        let links = page.links.unwrap();
        assert_eq!(links.first, "http://x/y?limit=2");
        assert_eq!(links.next, "");
        assert_eq!(links.last, "");
    }

    #[test]
    fn test_zero_total_removes_last() {
        let args = CreatePagination::<u32>::new(vec![], 1, 10)
            .total_items(0)
            .route("http://x/y");
        let page = create_pagination(args);
        assert_eq!(page.meta.item_count, 0);
        assert_eq!(page.meta.total_pages, Some(0));
        let links = page.links.unwrap();
        assert_ne!(links.first, "");
        assert_eq!(links.previous, "");
        assert_eq!(links.next, "");
        assert_eq!(links.last, "");
    }

    #[test]
    fn test_zero_limit_reports_zero_pages() {
        let page = create_pagination(CreatePagination::<u32>::new(vec![], 1, 0).total_items(7));
        assert_eq!(page.meta.total_pages, Some(0));
    }

    #[test]
    fn test_total_pages_rounds_up() {
        for (total, limit, expected) in [(10, 4, 3), (8, 4, 2), (1, 4, 1), (0, 4, 0), (9, 3, 3)] {
            let page = create_pagination(CreatePagination::<u32>::new(vec![], 1, limit).total_items(total));
            assert_eq!(page.meta.total_pages, Some(expected), "total={total} limit={limit}");
        }
    }

    #[test]
    fn test_builder_is_idempotent() {
        let a = create_pagination(ten_item_args());
        let b = create_pagination(ten_item_args());
        assert_eq!(a, b);
    }

    #[test]
    fn test_map_meta_preserves_items_and_links() {
        let page = create_pagination(ten_item_args());
        let links = page.links.clone();
        let mapped = page.map_meta(|meta| (meta.current_page, meta.total_pages));
        assert_eq!(mapped.items, vec![1, 2, 3, 4]);
        assert_eq!(mapped.meta, (1, Some(3)));
        assert_eq!(mapped.links, links);
    }

    #[test]
    fn test_custom_meta_via_transform() {
        #[derive(Debug, PartialEq)]
        struct SlimMeta {
            count: u64,
            total: Option<u64>,
        }

        let page = create_pagination_with(ten_item_args(), |meta| SlimMeta {
            count: meta.item_count,
            total: meta.total_items,
        });
        assert_eq!(
            page.meta,
            SlimMeta {
                count: 4,
                total: Some(10)
            }
        );
    }

    #[test]
    fn test_with_raw_carrier() {
        let page = create_pagination(ten_item_args());
        let combined = PaginationWithRaw::from((page.clone(), vec!["r1", "r2", "r3", "r4"]));
        assert_eq!(combined.items, page.items);
        assert_eq!(combined.raw_items.len(), 4);
        assert_eq!(combined.meta, page.meta);
    }

    #[test]
    fn test_serialized_shape_uses_camel_case() {
        let page = create_pagination(ten_item_args());
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["meta"]["itemCount"], 4);
        assert_eq!(json["meta"]["totalItems"], 10);
        assert_eq!(json["meta"]["itemsPerPage"], 4);
        assert_eq!(json["meta"]["totalPages"], 3);
        assert_eq!(json["meta"]["currentPage"], 1);
        assert_eq!(json["links"]["next"], "http://x/y?page=2&limit=4");
    }

    #[test]
    fn test_serialization_omits_absent_totals_and_links() {
        let page = create_pagination(CreatePagination::new(vec![1], 1, 1));
        let json = serde_json::to_value(&page).unwrap();
        assert!(json["meta"].get("totalItems").is_none());
        assert!(json["meta"].get("totalPages").is_none());
        assert!(json.get("links").is_none());
    }
}
