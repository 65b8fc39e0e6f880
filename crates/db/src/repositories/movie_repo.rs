//! Repository for the `movies` table: listing, creation and dashboard
//! aggregates.

use cinedash_core::movie::NewMovie;
use cinedash_core::movie_query::{like_pattern, MovieFilter, MovieQuery, SortField};
use cinedash_core::reports::{YearBudget, YearReleases};
use cinedash_core::types::ReleaseDate;
use sqlx::PgPool;

use crate::models::movie::Movie;

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

/// Column list for `movies` SELECT queries.
const COLUMNS: &str = "\
    id, movie_title, release_date, production_budget, \
    domestic_gross, worldwide_gross, created_at";

/// Column list for INSERT (excludes auto-generated `id`, `created_at`).
const INSERT_COLUMNS: &str = "\
    movie_title, release_date, production_budget, domestic_gross, worldwide_gross";

/// Number of bind parameters per inserted row.
const INSERT_ARITY: u32 = 5;

// ---------------------------------------------------------------------------
// MovieRepo
// ---------------------------------------------------------------------------

/// Provides query, insert and aggregate operations for movies.
pub struct MovieRepo;

impl MovieRepo {
    /// Insert a single movie and return the stored row.
    pub async fn create(pool: &PgPool, input: &NewMovie) -> Result<Movie, sqlx::Error> {
        let query = format!(
            "INSERT INTO movies ({INSERT_COLUMNS}) VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(&input.movie_title)
            .bind(input.release_date)
            .bind(input.production_budget)
            .bind(input.domestic_gross)
            .bind(input.worldwide_gross)
            .fetch_one(pool)
            .await
    }

    /// Batch insert multiple movies in one statement.
    ///
    /// Rows are returned in insertion order.
    pub async fn create_many(pool: &PgPool, inputs: &[NewMovie]) -> Result<Vec<Movie>, sqlx::Error> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = format!("INSERT INTO movies ({INSERT_COLUMNS}) VALUES ");
        let mut param_idx = 1u32;
        for (row, _) in inputs.iter().enumerate() {
            if row > 0 {
                query.push_str(", ");
            }
            query.push('(');
            for i in 0..INSERT_ARITY {
                if i > 0 {
                    query.push_str(", ");
                }
                query.push_str(&format!("${param_idx}"));
                param_idx += 1;
            }
            query.push(')');
        }
        query.push_str(&format!(" RETURNING {COLUMNS}"));

        let mut q = sqlx::query_as::<_, Movie>(&query);
        for input in inputs {
            q = q
                .bind(&input.movie_title)
                .bind(input.release_date)
                .bind(input.production_budget)
                .bind(input.domestic_gross)
                .bind(input.worldwide_gross);
        }

        let mut rows = q.fetch_all(pool).await?;
        rows.sort_by_key(|m| m.id);
        Ok(rows)
    }

    /// Fetch one page of movies matching the query's filters and sort.
    pub async fn list(pool: &PgPool, query: &MovieQuery) -> Result<Vec<Movie>, sqlx::Error> {
        let (where_clause, bind_values, bind_idx) = build_movie_filter(&query.filters);
        let order_clause = build_order_clause(query.order_by);

        let sql = format!(
            "SELECT {COLUMNS} FROM movies {where_clause} {order_clause} \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let q = bind_movie_values(sqlx::query_as::<_, Movie>(&sql), &bind_values);
        q.bind(query.pagination.limit)
            .bind(query.pagination.offset())
            .fetch_all(pool)
            .await
    }

    /// Count movies matching the given filters (for pagination metadata).
    pub async fn count(pool: &PgPool, filters: &[MovieFilter]) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_movie_filter(filters);

        let sql = format!("SELECT COUNT(*)::BIGINT AS count FROM movies {where_clause}");

        let q = bind_movie_values_scalar(sqlx::query_scalar::<_, i64>(&sql), &bind_values);
        q.fetch_one(pool).await
    }

    /// Mean production budget per release year, ascending by year.
    ///
    /// Undated rows are excluded before grouping.
    pub async fn average_budget_per_year(pool: &PgPool) -> Result<Vec<YearBudget>, sqlx::Error> {
        let rows = sqlx::query_as::<_, (i32, f64)>(
            "SELECT EXTRACT(YEAR FROM release_date)::INT AS year, \
                    AVG(production_budget)::FLOAT8 AS average_budget \
             FROM movies \
             WHERE release_date IS NOT NULL \
             GROUP BY 1 \
             ORDER BY 1 ASC",
        )
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(year, average)| YearBudget::new(year, average))
            .collect())
    }

    /// Number of releases per year, ascending by year. Undated rows are
    /// excluded before grouping.
    pub async fn releases_per_year(pool: &PgPool) -> Result<Vec<YearReleases>, sqlx::Error> {
        let rows = sqlx::query_as::<_, (i32, i64)>(
            "SELECT EXTRACT(YEAR FROM release_date)::INT AS year, \
                    COUNT(*)::BIGINT AS number_of_releases \
             FROM movies \
             WHERE release_date IS NOT NULL \
             GROUP BY 1 \
             ORDER BY 1 ASC",
        )
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(year, number_of_releases)| YearReleases {
                year,
                number_of_releases,
            })
            .collect())
    }

    /// Total number of movies.
    pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*)::BIGINT FROM movies")
            .fetch_one(pool)
            .await
    }

    /// Mean production budget across all movies, `0` when the table is empty.
    pub async fn average_budget(pool: &PgPool) -> Result<f64, sqlx::Error> {
        sqlx::query_scalar::<_, f64>(
            "SELECT COALESCE(AVG(production_budget), 0)::FLOAT8 FROM movies",
        )
        .fetch_one(pool)
        .await
    }

    /// The movie with the highest worldwide gross, if any.
    pub async fn find_highest_grossing(pool: &PgPool) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM movies ORDER BY worldwide_gross DESC, id ASC LIMIT 1"
        );
        sqlx::query_as::<_, Movie>(&query)
            .fetch_optional(pool)
            .await
    }

    /// The `limit` most recently released movies, newest first. Undated rows
    /// sort last.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<Movie>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM movies \
             ORDER BY release_date DESC NULLS LAST, id DESC \
             LIMIT $1"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built movie queries.
#[derive(Debug, Clone, PartialEq)]
enum BindValue {
    Text(String),
    Date(ReleaseDate),
    Float(f64),
}

/// Map a sort field to its sort expression. Titles sort case-insensitively
/// by code point, independent of the database collation.
fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::MovieTitle => "lower(movie_title) COLLATE \"C\"",
        SortField::ReleaseDate => "release_date",
        SortField::ProductionBudget => "production_budget",
        SortField::DomesticGross => "domestic_gross",
        SortField::WorldwideGross => "worldwide_gross",
    }
}

/// Build the ORDER BY clause. Sorting is descending with insertion order as
/// the tie-breaker; no field means insertion order.
fn build_order_clause(order_by: Option<SortField>) -> String {
    match order_by {
        Some(field) => format!(
            "ORDER BY {} DESC NULLS LAST, id ASC",
            sort_column(field)
        ),
        None => "ORDER BY id ASC".to_string(),
    }
}

/// Build a WHERE clause and bind values from the query's filters.
///
/// Returns `(where_clause, bind_values, next_bind_index)`.
/// The `where_clause` is empty if there are no filters, or starts with `WHERE `.
fn build_movie_filter(filters: &[MovieFilter]) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    for filter in filters {
        match filter {
            MovieFilter::TitleContains(text) => {
                conditions.push(format!("movie_title ILIKE ${bind_idx}"));
                bind_idx += 1;
                bind_values.push(BindValue::Text(like_pattern(text)));
            }
            MovieFilter::ReleaseDate(range) => {
                if let Some(start) = range.start {
                    conditions.push(format!("release_date >= ${bind_idx}"));
                    bind_idx += 1;
                    bind_values.push(BindValue::Date(start));
                }
                if let Some(end) = range.end {
                    conditions.push(format!("release_date <= ${bind_idx}"));
                    bind_idx += 1;
                    bind_values.push(BindValue::Date(end));
                }
            }
            MovieFilter::ProductionBudget(range) => {
                if let Some(min) = range.min {
                    conditions.push(format!("production_budget >= ${bind_idx}"));
                    bind_idx += 1;
                    bind_values.push(BindValue::Float(min));
                }
                if let Some(max) = range.max {
                    conditions.push(format!("production_budget <= ${bind_idx}"));
                    bind_idx += 1;
                    bind_values.push(BindValue::Float(max));
                }
            }
        }
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_movie_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Date(v) => q = q.bind(*v),
            BindValue::Float(v) => q = q.bind(*v),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_movie_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Date(v) => q = q.bind(*v),
            BindValue::Float(v) => q = q.bind(*v),
        }
    }
    q
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
