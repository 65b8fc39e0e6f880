//! Dashboard report shapes and in-process aggregation.
//!
//! The row types serialize with `_id` as the year key, which is what the
//! dashboard charts consume. The aggregation functions are the reference
//! semantics for backends that cannot push grouping down to the database.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::Serialize;

use crate::types::ReleaseDate;

/// Divisor used to express budgets in millions.
pub const BUDGET_MILLIONS_DIVISOR: f64 = 1_000_000.0;

/// Number of movies returned by the "recent movies" lookup.
pub const RECENT_MOVIES_LIMIT: i64 = 10;

/// Average production budget for one release year.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearBudget {
    #[serde(rename = "_id")]
    pub year: i32,
    pub average_budget: f64,
    pub average_budget_millions: f64,
}

impl YearBudget {
    pub fn new(year: i32, average_budget: f64) -> Self {
        Self {
            year,
            average_budget,
            average_budget_millions: average_budget / BUDGET_MILLIONS_DIVISOR,
        }
    }
}

/// Number of releases in one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearReleases {
    #[serde(rename = "_id")]
    pub year: i32,
    pub number_of_releases: i64,
}

/// Scalar catalog metrics. `M` is the storage layer's movie row type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMetrics<M> {
    pub total_movies: i64,
    /// Mean production budget; `0` for an empty catalog.
    pub average_budget: f64,
    pub highest_grossing_movie: Option<M>,
}

/// Group `(release_date, budget)` pairs by year and average the budgets.
///
/// Pairs without a release date are dropped before grouping. Output is
/// sorted ascending by year.
pub fn average_budget_per_year<I>(rows: I) -> Vec<YearBudget>
where
    I: IntoIterator<Item = (Option<ReleaseDate>, f64)>,
{
    let mut buckets: BTreeMap<i32, (f64, u64)> = BTreeMap::new();
    for (date, budget) in rows {
        let Some(date) = date else { continue };
        let entry = buckets.entry(date.year()).or_insert((0.0, 0));
        entry.0 += budget;
        entry.1 += 1;
    }
    buckets
        .into_iter()
        .map(|(year, (sum, n))| YearBudget::new(year, sum / n as f64))
        .collect()
}

/// Count releases per year, skipping undated records. Sorted ascending.
pub fn releases_per_year<I>(dates: I) -> Vec<YearReleases>
where
    I: IntoIterator<Item = Option<ReleaseDate>>,
{
    let mut buckets: BTreeMap<i32, i64> = BTreeMap::new();
    for date in dates.into_iter().flatten() {
        *buckets.entry(date.year()).or_default() += 1;
    }
    buckets
        .into_iter()
        .map(|(year, number_of_releases)| YearReleases {
            year,
            number_of_releases,
        })
        .collect()
}

/// Arithmetic mean, `0` for no values.
pub fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0u64), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
