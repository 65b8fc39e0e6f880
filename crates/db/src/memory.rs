//! In-process [`MovieStore`] for local runs without a database and for
//! HTTP-level tests.
//!
//! Evaluates the same typed predicate the SQL layer renders, and orders
//! results the same way (descending sort, undated rows last, insertion order
//! as tie-breaker).

use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use async_trait::async_trait;
use cinedash_core::movie::NewMovie;
use cinedash_core::movie_query::{MovieFilter, MovieQuery, SortField};
use cinedash_core::reports::{self, KeyMetrics, YearBudget, YearReleases};
use tokio::sync::RwLock;

use crate::models::movie::{Movie, MoviePage};
use crate::store::MovieStore;

/// A `Vec<Movie>` behind a single lock. Ids are assigned sequentially.
#[derive(Default)]
pub struct MemoryMovieStore {
    rows: RwLock<Vec<Movie>>,
    closed: AtomicBool,
}

impl MemoryMovieStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_open(&self) -> Result<(), sqlx::Error> {
        if self.closed.load(AtomicOrdering::Acquire) {
            return Err(sqlx::Error::PoolClosed);
        }
        Ok(())
    }
}

/// Whether `movie` satisfies a single filter.
fn filter_matches(filter: &MovieFilter, movie: &Movie) -> bool {
    match filter {
        MovieFilter::TitleContains(text) => MovieFilter::title_matches(text, &movie.movie_title),
        MovieFilter::ReleaseDate(range) => range.contains(movie.release_date),
        MovieFilter::ProductionBudget(range) => range.contains(movie.production_budget),
    }
}

/// Descending comparison on `field`; `None` dates sort last and titles
/// compare case-insensitively.
fn compare_desc(field: SortField, a: &Movie, b: &Movie) -> Ordering {
    match field {
        SortField::MovieTitle => b
            .movie_title
            .to_lowercase()
            .cmp(&a.movie_title.to_lowercase()),
        SortField::ReleaseDate => match (a.release_date, b.release_date) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortField::ProductionBudget => b.production_budget.total_cmp(&a.production_budget),
        SortField::DomesticGross => b.domestic_gross.total_cmp(&a.domestic_gross),
        SortField::WorldwideGross => b.worldwide_gross.total_cmp(&a.worldwide_gross),
    }
}

fn to_row(id: i64, movie: &NewMovie) -> Movie {
    Movie {
        id,
        movie_title: movie.movie_title.clone(),
        release_date: movie.release_date,
        production_budget: movie.production_budget,
        domestic_gross: movie.domestic_gross,
        worldwide_gross: movie.worldwide_gross,
        created_at: chrono::Utc::now(),
    }
}

#[async_trait]
impl MovieStore for MemoryMovieStore {
    async fn list(&self, query: &MovieQuery) -> Result<MoviePage, sqlx::Error> {
        self.ensure_open()?;
        let rows = self.rows.read().await;

        let mut matched: Vec<&Movie> = rows
            .iter()
            .filter(|m| query.filters.iter().all(|f| filter_matches(f, m)))
            .collect();

        if let Some(field) = query.order_by {
            // Stable sort keeps insertion order for ties.
            matched.sort_by(|a, b| compare_desc(field, a, b));
        }

        let total_count = matched.len() as i64;
        let offset = usize::try_from(query.pagination.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.pagination.limit).unwrap_or(0);
        let movies = matched
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        Ok(MoviePage {
            movies,
            total_count,
        })
    }

    async fn create(&self, movie: &NewMovie) -> Result<Movie, sqlx::Error> {
        self.ensure_open()?;
        let mut rows = self.rows.write().await;
        let row = to_row(rows.len() as i64 + 1, movie);
        rows.push(row.clone());
        Ok(row)
    }

    async fn create_many(&self, movies: &[NewMovie]) -> Result<Vec<Movie>, sqlx::Error> {
        self.ensure_open()?;
        let mut rows = self.rows.write().await;
        let first_id = rows.len() as i64 + 1;
        let created: Vec<Movie> = movies
            .iter()
            .zip(first_id..)
            .map(|(movie, id)| to_row(id, movie))
            .collect();
        rows.extend(created.iter().cloned());
        Ok(created)
    }

    async fn average_budget_per_year(&self) -> Result<Vec<YearBudget>, sqlx::Error> {
        self.ensure_open()?;
        let rows = self.rows.read().await;
        Ok(reports::average_budget_per_year(
            rows.iter().map(|m| (m.release_date, m.production_budget)),
        ))
    }

    async fn releases_per_year(&self) -> Result<Vec<YearReleases>, sqlx::Error> {
        self.ensure_open()?;
        let rows = self.rows.read().await;
        Ok(reports::releases_per_year(rows.iter().map(|m| m.release_date)))
    }

    async fn key_metrics(&self) -> Result<KeyMetrics<Movie>, sqlx::Error> {
        self.ensure_open()?;
        let rows = self.rows.read().await;

        // First row wins on ties, matching `ORDER BY worldwide_gross DESC, id ASC`.
        let highest_grossing_movie = rows
            .iter()
            .reduce(|best, m| {
                if m.worldwide_gross > best.worldwide_gross {
                    m
                } else {
                    best
                }
            })
            .cloned();

        Ok(KeyMetrics {
            total_movies: rows.len() as i64,
            average_budget: reports::mean(rows.iter().map(|m| m.production_budget)),
            highest_grossing_movie,
        })
    }

    async fn recent(&self, limit: i64) -> Result<Vec<Movie>, sqlx::Error> {
        self.ensure_open()?;
        let rows = self.rows.read().await;
        let mut sorted: Vec<&Movie> = rows.iter().collect();
        // Newest first; ties broken by most recently inserted.
        sorted.sort_by(|a, b| {
            compare_desc(SortField::ReleaseDate, a, b).then_with(|| b.id.cmp(&a.id))
        });
        Ok(sorted
            .into_iter()
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        self.ensure_open()
    }

    async fn close(&self) {
        self.closed.store(true, AtomicOrdering::Release);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
