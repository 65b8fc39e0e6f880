//! The storage seam used by the HTTP layer.
//!
//! Handlers depend on `Arc<dyn MovieStore>` rather than a pool so the engine
//! can be served from PostgreSQL ([`PgMovieStore`]) or from memory
//! ([`MemoryMovieStore`](crate::memory::MemoryMovieStore)).
//!
//! Lifecycle: construct the store (connect, health check, migrate) before
//! serving, inject it into the application state, and call
//! [`MovieStore::close`] once the server has stopped.

use async_trait::async_trait;
use cinedash_core::movie::NewMovie;
use cinedash_core::movie_query::MovieQuery;
use cinedash_core::reports::{KeyMetrics, YearBudget, YearReleases};

use crate::models::movie::{Movie, MoviePage};
use crate::repositories::MovieRepo;
use crate::DbPool;

/// Read/write operations of the movie query engine.
///
/// Every method either returns a complete result or an error; there are no
/// partial results and no retries.
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// One page of movies matching `query`, plus the total match count.
    async fn list(&self, query: &MovieQuery) -> Result<MoviePage, sqlx::Error>;

    /// Persist a single movie.
    async fn create(&self, movie: &NewMovie) -> Result<Movie, sqlx::Error>;

    /// Persist a batch of movies atomically, in order.
    async fn create_many(&self, movies: &[NewMovie]) -> Result<Vec<Movie>, sqlx::Error>;

    async fn average_budget_per_year(&self) -> Result<Vec<YearBudget>, sqlx::Error>;

    async fn releases_per_year(&self) -> Result<Vec<YearReleases>, sqlx::Error>;

    async fn key_metrics(&self) -> Result<KeyMetrics<Movie>, sqlx::Error>;

    /// The `limit` most recently released movies, newest first.
    async fn recent(&self, limit: i64) -> Result<Vec<Movie>, sqlx::Error>;

    /// Confirm the backing storage is reachable.
    async fn health_check(&self) -> Result<(), sqlx::Error>;

    /// Release storage resources. Later calls fail with
    /// [`sqlx::Error::PoolClosed`].
    async fn close(&self);
}

/// PostgreSQL-backed store; a thin adapter over [`MovieRepo`].
#[derive(Clone)]
pub struct PgMovieStore {
    pool: DbPool,
}

impl PgMovieStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MovieStore for PgMovieStore {
    async fn list(&self, query: &MovieQuery) -> Result<MoviePage, sqlx::Error> {
        let (movies, total_count) = tokio::try_join!(
            MovieRepo::list(&self.pool, query),
            MovieRepo::count(&self.pool, &query.filters),
        )?;
        Ok(MoviePage {
            movies,
            total_count,
        })
    }

    async fn create(&self, movie: &NewMovie) -> Result<Movie, sqlx::Error> {
        MovieRepo::create(&self.pool, movie).await
    }

    async fn create_many(&self, movies: &[NewMovie]) -> Result<Vec<Movie>, sqlx::Error> {
        MovieRepo::create_many(&self.pool, movies).await
    }

    async fn average_budget_per_year(&self) -> Result<Vec<YearBudget>, sqlx::Error> {
        MovieRepo::average_budget_per_year(&self.pool).await
    }

    async fn releases_per_year(&self) -> Result<Vec<YearReleases>, sqlx::Error> {
        MovieRepo::releases_per_year(&self.pool).await
    }

    async fn key_metrics(&self) -> Result<KeyMetrics<Movie>, sqlx::Error> {
        let (total_movies, average_budget, highest_grossing_movie) = tokio::try_join!(
            MovieRepo::count_all(&self.pool),
            MovieRepo::average_budget(&self.pool),
            MovieRepo::find_highest_grossing(&self.pool),
        )?;
        Ok(KeyMetrics {
            total_movies,
            average_budget,
            highest_grossing_movie,
        })
    }

    async fn recent(&self, limit: i64) -> Result<Vec<Movie>, sqlx::Error> {
        MovieRepo::list_recent(&self.pool, limit).await
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        crate::health_check(&self.pool).await
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
