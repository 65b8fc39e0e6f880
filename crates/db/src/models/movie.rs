//! Movie entity model.

use cinedash_core::types::{DbId, ReleaseDate, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `movies` table.
///
/// Serializes with the camelCase field names the API exposes.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: DbId,
    pub movie_title: String,
    pub release_date: Option<ReleaseDate>,
    pub production_budget: f64,
    pub domestic_gross: f64,
    pub worldwide_gross: f64,
    pub created_at: Timestamp,
}

/// One page of a listing query plus the unpaginated match count.
#[derive(Debug, Clone, PartialEq)]
pub struct MoviePage {
    pub movies: Vec<Movie>,
    pub total_count: i64,
}
