//! Movie listing query builder.
//!
//! Turns raw listing parameters into an immutable [`MovieQuery`]: a list of
//! typed [`MovieFilter`] predicates, an optional descending sort and a page
//! window. Storage backends render or evaluate the predicate; nothing here
//! knows about SQL.

use serde::Deserialize;

use crate::error::CoreError;
use crate::release_date::parse_release_date;
use crate::types::ReleaseDate;

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Page number used when none is given.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when none is given.
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

// ---------------------------------------------------------------------------
// Raw parameters
// ---------------------------------------------------------------------------

/// Listing parameters exactly as they arrive in the query string.
///
/// Everything is a string so that empty values (`?minBudget=`) can be
/// treated as absent instead of failing deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieQueryParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub order_by: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub min_budget: Option<String>,
    pub max_budget: Option<String>,
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// A sortable movie field. Sorting is always descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    MovieTitle,
    ReleaseDate,
    ProductionBudget,
    DomesticGross,
    WorldwideGross,
}

impl SortField {
    /// Parse a field name. Accepts the camelCase API names and the spaced
    /// labels older clients send (`"Release Date"`).
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "movieTitle" | "Movie Title" => Some(Self::MovieTitle),
            "releaseDate" | "Release Date" => Some(Self::ReleaseDate),
            "productionBudget" | "Production Budget" => Some(Self::ProductionBudget),
            "domesticGross" | "Domestic Gross" => Some(Self::DomesticGross),
            "worldwideGross" | "Worldwide Gross" => Some(Self::WorldwideGross),
            _ => None,
        }
    }

    /// Return the canonical API name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MovieTitle => "movieTitle",
            Self::ReleaseDate => "releaseDate",
            Self::ProductionBudget => "productionBudget",
            Self::DomesticGross => "domesticGross",
            Self::WorldwideGross => "worldwideGross",
        }
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// A validated page window. `page >= 1`, `limit >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl Pagination {
    /// Build a page window, flooring both `page` and `limit` at 1. Large
    /// limits are honored as requested.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(DEFAULT_PAGE).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_LIMIT).max(1),
        }
    }

    /// Number of rows to skip: `(page - 1) * limit`.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Total number of pages for `total_count` matches: `ceil(total / limit)`.
    pub fn total_pages(&self, total_count: i64) -> i64 {
        if total_count <= 0 {
            return 0;
        }
        (total_count + self.limit - 1) / self.limit
    }
}

// ---------------------------------------------------------------------------
// Predicate
// ---------------------------------------------------------------------------

/// Inclusive release-date bounds. Either side may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<ReleaseDate>,
    pub end: Option<ReleaseDate>,
}

impl DateRange {
    /// Whether `date` falls within the bounds. A missing date never matches.
    pub fn contains(&self, date: Option<ReleaseDate>) -> bool {
        let Some(date) = date else {
            return false;
        };
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }
}

/// Inclusive production-budget bounds. Either side may be open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl BudgetRange {
    /// Whether `budget` falls within the bounds.
    pub fn contains(&self, budget: f64) -> bool {
        self.min.map_or(true, |m| budget >= m) && self.max.map_or(true, |m| budget <= m)
    }
}

/// One filter dimension of a listing query. All filters in a
/// [`MovieQuery`] are combined with AND.
#[derive(Debug, Clone, PartialEq)]
pub enum MovieFilter {
    /// Case-insensitive substring match on the title.
    TitleContains(String),
    ReleaseDate(DateRange),
    ProductionBudget(BudgetRange),
}

impl MovieFilter {
    /// Case-insensitive substring test used by in-process evaluation.
    pub fn title_matches(needle: &str, title: &str) -> bool {
        title.to_lowercase().contains(&needle.to_lowercase())
    }
}

/// A fully validated listing query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MovieQuery {
    pub filters: Vec<MovieFilter>,
    pub order_by: Option<SortField>,
    pub pagination: Pagination,
}

impl MovieQuery {
    /// Build a query from raw parameters.
    ///
    /// Empty or whitespace-only parameters are treated as absent. Malformed
    /// numbers, dates or sort fields produce [`CoreError::Validation`].
    pub fn from_params(params: &MovieQueryParams) -> Result<Self, CoreError> {
        let page = parse_opt("page", params.page.as_deref(), |s| s.parse::<i64>().ok())?;
        let limit = parse_opt("limit", params.limit.as_deref(), |s| s.parse::<i64>().ok())?;
        let pagination = Pagination::new(page, limit);

        let mut filters = Vec::new();

        if let Some(search) = non_empty(params.search.as_deref()) {
            filters.push(MovieFilter::TitleContains(search.to_string()));
        }

        let start = parse_opt("startDate", params.start_date.as_deref(), parse_release_date)?;
        let end = parse_opt("endDate", params.end_date.as_deref(), parse_release_date)?;
        if start.is_some() || end.is_some() {
            filters.push(MovieFilter::ReleaseDate(DateRange { start, end }));
        }

        let min = parse_opt("minBudget", params.min_budget.as_deref(), parse_finite)?;
        let max = parse_opt("maxBudget", params.max_budget.as_deref(), parse_finite)?;
        if min.is_some() || max.is_some() {
            filters.push(MovieFilter::ProductionBudget(BudgetRange { min, max }));
        }

        let order_by = match non_empty(params.order_by.as_deref()) {
            None => None,
            Some(name) => Some(SortField::parse(name).ok_or_else(|| {
                CoreError::Validation(format!("orderBy '{name}' is not a sortable field"))
            })?),
        };

        Ok(Self {
            filters,
            order_by,
            pagination,
        })
    }
}

/// Trim a parameter, mapping empty strings to `None`.
fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Parse an optional parameter, turning a parse failure into a validation
/// error that names the parameter.
fn parse_opt<T>(
    name: &str,
    raw: Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, CoreError> {
    match non_empty(raw) {
        None => Ok(None),
        Some(s) => parse(s)
            .map(Some)
            .ok_or_else(|| CoreError::Validation(format!("{name} '{s}' is not valid"))),
    }
}

fn parse_finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Escape `%`, `_` and `\` so user text matches literally inside a LIKE
/// pattern, then wrap it for substring matching.
///
/// # Examples
///
/// ```
/// use cinedash_core::movie_query::like_pattern;
/// assert_eq!(like_pattern("god"), "%god%");
/// assert_eq!(like_pattern("100%"), "%100\\%%");
/// ```
pub fn like_pattern(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
