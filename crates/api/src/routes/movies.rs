//! Route definitions for the movie catalog.

use axum::routing::{get, post, MethodRouter};
use axum::Router;

use crate::handlers::movies;
use crate::state::AppState;

/// Movie routes mounted at `/movies`.
///
/// ```text
/// GET  /                           -> list_movies
/// POST /                           -> create_movie
/// POST /import                     -> import_legacy_movies
/// GET  /average-budget-per-year    -> average_budget_per_year
/// GET  /releases-per-year          -> releases_per_year
/// GET  /key-metrics                -> key_metrics
/// GET  /recent                     -> recent_movies
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", collection())
        .route("/import", post(movies::import_legacy_movies))
        .route(
            "/average-budget-per-year",
            get(movies::average_budget_per_year),
        )
        .route("/releases-per-year", get(movies::releases_per_year))
        .route("/key-metrics", get(movies::key_metrics))
        .route("/recent", get(movies::recent_movies))
}

/// List and create on the collection path. Also mounted at `/movies/` so a
/// trailing slash reaches the same handlers.
pub fn collection() -> MethodRouter<AppState> {
    get(movies::list_movies).post(movies::create_movie)
}
