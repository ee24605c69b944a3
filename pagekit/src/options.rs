//! Pagination options and input resolution
//!
//! User-supplied paging input is untrusted: `page` and `limit` usually come
//! straight off a query string and may be numeric strings, floats, negative
//! numbers, or garbage. [`resolve_options`] normalizes a [`PaginateOptions`]
//! into a well-typed [`ResolvedParams`] value. Resolution never fails:
//! malformed values fall back to the configured defaults and produce an
//! [`InputWarning`] (also emitted through `tracing::warn!`).
//!
//! # Example
//!
//! ```rust
//! use pagekit::options::{resolve_options, PaginateOptions};
//!
//! let options = PaginateOptions::new().page("2").limit("x");
//! let (params, warnings) = resolve_options(&options);
//!
//! assert_eq!(params.page, 2);
//! assert_eq!(params.limit, 10); // "x" fell back to the default
//! assert_eq!(warnings.len(), 1);
//! ```

use std::fmt;
use std::time::Duration;

/// Default page number used when `page` is unset or malformed.
pub const DEFAULT_PAGE: u64 = 1;

/// Default page size used when `limit` is unset or malformed.
pub const DEFAULT_LIMIT: u64 = 10;

/// A raw `page` or `limit` value as supplied by the caller.
///
/// Accepts integers, floats, and strings so values can be passed through
/// from a query string without prior validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// An integer value
    Int(i64),
    /// A floating point value
    Float(f64),
    /// A textual value, e.g. taken verbatim from a query string
    Text(String),
}

impl ParamValue {
    /// Coerce to a number the way a query-string layer would: strings are
    /// parsed as floats, unparseable text becomes NaN.
    fn coerce(&self) -> f64 {
        match self {
            Self::Int(n) => *n as f64,
            Self::Float(f) => *f,
            Self::Text(s) => s.trim().parse().unwrap_or(f64::NAN),
        }
    }

    /// The coerced value as a non-negative integer, or `None` when the
    /// input is fractional, negative, or not a number at all.
    fn as_page_count(&self) -> Option<u64> {
        let value = self.coerce();
        if value.is_finite() && value.fract() == 0.0 && value >= 0.0 && value <= u64::MAX as f64 {
            Some(value as u64)
        } else {
            None
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for ParamValue {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<u32> for ParamValue {
    fn from(n: u32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<u64> for ParamValue {
    fn from(n: u64) -> Self {
        i64::try_from(n).map_or(Self::Float(n as f64), Self::Int)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Diagnostic produced when a `page` or `limit` value could not be used.
///
/// Resolution substitutes the default instead of failing, so these are
/// warnings rather than errors. The [`Display`](fmt::Display) rendering
/// names the parameter, the raw input, the coerced value, and the default
/// that was used.
#[derive(Debug, Clone, PartialEq)]
pub struct InputWarning {
    /// Name of the offending parameter (`"page"` or `"limit"`)
    pub parameter: &'static str,
    /// The raw value as supplied
    pub raw: String,
    /// What the raw value coerced to (`"NaN"` for unparseable text)
    pub coerced: String,
    /// The default substituted for the bad value
    pub fallback: u64,
}

impl fmt::Display for InputWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Query parameter \"{}\" with value \"{}\" was resolved as \"{}\", \
             please validate your query input! Falling back to default \"{}\".",
            self.parameter, self.raw, self.coerced, self.fallback
        )
    }
}

/// Which pagination clause style the query source should apply.
///
/// Both styles must produce identical row windows for identical inputs;
/// the distinction exists only to match the two clause shapes a SQL layer
/// can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaginationKind {
    /// Page with `LIMIT <n> OFFSET <m>`
    #[default]
    OffsetLimit,
    /// Page with the equivalent skip/take pair
    TakeSkip,
}

/// How the total item count is computed for a query source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountMode {
    /// Wrap the full query as a subquery and `COUNT(*)` its rows.
    ///
    /// Correct even when the query carries GROUP BY / HAVING clauses,
    /// since the count sees one row per result row.
    #[default]
    Raw,
    /// Delegate to the source's built-in count capability.
    ///
    /// Cheaper, but may miscount under certain joins or aggregations;
    /// that trade-off is documented behavior, not a bug.
    Native,
}

/// Query-result cache request, passed through to the data source untouched.
///
/// The pagination layer never caches anything itself; sources that have
/// no cache simply ignore this.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CacheOption {
    /// No caching
    #[default]
    Off,
    /// Cache with the source's default lifetime
    On,
    /// Cache with an explicit lifetime
    Ttl(Duration),
    /// Cache under a caller-chosen id with an explicit lifetime
    Tagged {
        /// Cache entry identifier
        id: String,
        /// Entry lifetime
        ttl: Duration,
    },
}

impl CacheOption {
    /// Whether any form of caching was requested.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Off)
    }
}

/// Query-string parameter names used when generating navigation links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingLabels {
    /// Label for the page number parameter (default `"page"`)
    pub page_label: String,
    /// Label for the page size parameter (default `"limit"`)
    pub limit_label: String,
}

impl Default for RoutingLabels {
    fn default() -> Self {
        Self {
            page_label: "page".to_string(),
            limit_label: "limit".to_string(),
        }
    }
}

/// Fallback values used when `page` or `limit` is unset or malformed.
///
/// Carried on the options value so the resolver stays pure; there are no
/// mutable module-level defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamDefaults {
    /// Fallback page number
    pub page: u64,
    /// Fallback page size
    pub limit: u64,
}

impl Default for ParamDefaults {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Caller-facing pagination options.
///
/// Built with chained setters; every field has a documented default.
///
/// # Example
///
/// ```rust
/// use pagekit::options::{PaginateOptions, PaginationKind};
///
/// let options = PaginateOptions::new()
///     .page(3)
///     .limit(25)
///     .route("https://example.com/articles")
///     .pagination_kind(PaginationKind::TakeSkip);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PaginateOptions {
    page: Option<ParamValue>,
    limit: Option<ParamValue>,
    route: Option<String>,
    kind: PaginationKind,
    count_queries: Option<bool>,
    count_mode: CountMode,
    cache: CacheOption,
    labels: RoutingLabels,
    defaults: ParamDefaults,
}

impl PaginateOptions {
    /// Options with every field at its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requested page number (1-based). Default 1.
    #[must_use]
    pub fn page(mut self, page: impl Into<ParamValue>) -> Self {
        self.page = Some(page.into());
        self
    }

    /// Requested page size. Default 10.
    #[must_use]
    pub fn limit(mut self, limit: impl Into<ParamValue>) -> Self {
        self.limit = Some(limit.into());
        self
    }

    /// Base route (without query parameters) used to generate navigation
    /// links. Without a route no links are produced.
    #[must_use]
    pub fn route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// Pagination clause style. Default [`PaginationKind::OffsetLimit`].
    #[must_use]
    pub fn pagination_kind(mut self, kind: PaginationKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether to run the total-count query alongside the page fetch.
    /// Default `true`; when disabled, `total_items`/`total_pages` are
    /// absent from the resulting meta and the `last` link is not built.
    #[must_use]
    pub fn count_queries(mut self, enabled: bool) -> Self {
        self.count_queries = Some(enabled);
        self
    }

    /// Count strategy. Default [`CountMode::Raw`].
    #[must_use]
    pub fn count_mode(mut self, mode: CountMode) -> Self {
        self.count_mode = mode;
        self
    }

    /// Query-result cache request, forwarded to the data source.
    #[must_use]
    pub fn cache(mut self, cache: CacheOption) -> Self {
        self.cache = cache;
        self
    }

    /// Custom query-string labels for generated links.
    #[must_use]
    pub fn routing_labels(mut self, labels: RoutingLabels) -> Self {
        self.labels = labels;
        self
    }

    /// Override the fallback page/limit values used for unset or
    /// malformed input.
    #[must_use]
    pub fn defaults(mut self, defaults: ParamDefaults) -> Self {
        self.defaults = defaults;
        self
    }
}

/// Normalized paging parameters, produced once per request and consumed by
/// both the fetch strategies and the envelope builder.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedParams {
    /// Page number (non-negative; 0 is handled as a strategy edge case)
    pub page: u64,
    /// Page size
    pub limit: u64,
    /// Base route for link generation, if any
    pub route: Option<String>,
    /// Pagination clause style
    pub kind: PaginationKind,
    /// Whether the count query runs
    pub count_queries: bool,
    /// Count strategy
    pub count_mode: CountMode,
    /// Cache request, passed through to the source
    pub cache: CacheOption,
    /// Link query-string labels
    pub labels: RoutingLabels,
}

fn resolve_numeric(
    value: Option<&ParamValue>,
    parameter: &'static str,
    fallback: u64,
    warnings: &mut Vec<InputWarning>,
) -> u64 {
    let Some(value) = value else {
        return fallback;
    };
    match value.as_page_count() {
        Some(n) => n,
        None => {
            let warning = InputWarning {
                parameter,
                raw: value.to_string(),
                coerced: value.coerce().to_string(),
                fallback,
            };
            tracing::warn!("{}", warning);
            warnings.push(warning);
            fallback
        }
    }
}

/// Resolve caller-facing options into safe parameters.
///
/// Never fails. Malformed `page`/`limit` values are replaced by the
/// configured defaults; each substitution is logged via `tracing::warn!`
/// and returned as an [`InputWarning`] so callers can route diagnostics
/// without depending on a particular output stream.
pub fn resolve_options(options: &PaginateOptions) -> (ResolvedParams, Vec<InputWarning>) {
    let mut warnings = Vec::new();
    let page = resolve_numeric(
        options.page.as_ref(),
        "page",
        options.defaults.page,
        &mut warnings,
    );
    let limit = resolve_numeric(
        options.limit.as_ref(),
        "limit",
        options.defaults.limit,
        &mut warnings,
    );

    let params = ResolvedParams {
        page,
        limit,
        route: options.route.clone(),
        kind: options.kind,
        count_queries: options.count_queries.unwrap_or(true),
        count_mode: options.count_mode,
        cache: options.cache.clone(),
        labels: options.labels.clone(),
    };
    (params, warnings)
}
