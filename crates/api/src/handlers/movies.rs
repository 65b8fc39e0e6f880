//! Handlers for the movie catalog: listing, creation, legacy import and the
//! dashboard reports.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use cinedash_core::legacy_import::{self, ImportSummary, LegacyMovieRecord};
use cinedash_core::movie::{MovieInput, NewMovie};
use cinedash_core::movie_query::{MovieQuery, MovieQueryParams, SortField};
use cinedash_core::reports::RECENT_MOVIES_LIMIT;
use cinedash_db::models::movie::Movie;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Paginated listing response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieListResponse {
    pub movies: Vec<Movie>,
    pub total_pages: i64,
    pub current_page: i64,
    pub total_count: i64,
}

/// Response for a successful create.
#[derive(Debug, Serialize)]
pub struct CreateMovieResponse {
    pub message: &'static str,
    pub movie: Movie,
}

// ---------------------------------------------------------------------------
// GET /movies
// ---------------------------------------------------------------------------

/// List movies with search, date/budget range filters, descending sort and
/// pagination.
pub async fn list_movies(
    State(state): State<AppState>,
    params: Result<Query<MovieQueryParams>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let query = MovieQuery::from_params(&params)?;

    let page = state.store.list(&query).await?;

    tracing::debug!(
        count = page.movies.len(),
        total_count = page.total_count,
        page = query.pagination.page,
        limit = query.pagination.limit,
        order_by = query.order_by.as_ref().map(SortField::as_str),
        filters = query.filters.len(),
        "Listed movies"
    );

    Ok(Json(MovieListResponse {
        total_pages: query.pagination.total_pages(page.total_count),
        current_page: query.pagination.page,
        total_count: page.total_count,
        movies: page.movies,
    }))
}

// ---------------------------------------------------------------------------
// POST /movies
// ---------------------------------------------------------------------------

/// Create a movie from client input.
///
/// Numeric fields are coerced; a missing or non-numeric budget becomes `0`.
pub async fn create_movie(
    State(state): State<AppState>,
    body: Result<Json<MovieInput>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let new_movie = NewMovie::from_input(input)?;

    let movie = state.store.create(&new_movie).await?;

    tracing::info!(
        movie_id = movie.id,
        title = %movie.movie_title,
        "Movie created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateMovieResponse {
            message: "Movie created successfully",
            movie,
        }),
    ))
}

// ---------------------------------------------------------------------------
// POST /movies/import
// ---------------------------------------------------------------------------

/// Bulk import legacy-format records.
///
/// Records that cannot be normalized are reported in `skipped`; the rest are
/// inserted in one batch.
pub async fn import_legacy_movies(
    State(state): State<AppState>,
    body: Result<Json<Vec<LegacyMovieRecord>>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(records) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    legacy_import::validate_batch_size(records.len())?;

    let (movies, skipped) = legacy_import::normalize_batch(&records);
    let created = state.store.create_many(&movies).await?;

    tracing::info!(
        received = records.len(),
        imported = created.len(),
        skipped = skipped.len(),
        "Legacy movies imported"
    );

    Ok(Json(ImportSummary {
        imported: created.len(),
        skipped,
    }))
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// GET /movies/average-budget-per-year
pub async fn average_budget_per_year(
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let rows = state.store.average_budget_per_year().await?;
    tracing::debug!(years = rows.len(), "Computed average budget per year");
    Ok(Json(rows))
}

/// GET /movies/releases-per-year
pub async fn releases_per_year(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let rows = state.store.releases_per_year().await?;
    tracing::debug!(years = rows.len(), "Computed releases per year");
    Ok(Json(rows))
}

/// GET /movies/key-metrics
pub async fn key_metrics(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let metrics = state.store.key_metrics().await?;
    Ok(Json(metrics))
}

/// GET /movies/recent
pub async fn recent_movies(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let movies = state.store.recent(RECENT_MOVIES_LIMIT).await?;
    Ok(Json(movies))
}
