//! Normalization of legacy movie records for bulk import.
//!
//! Legacy exports use spaced keys (`"Release Date"`), `M/D/YYYY` date strings
//! and currency-formatted numbers (`"$425,000,000"`). Records are mapped onto
//! the canonical [`NewMovie`] here; the storage layer only ever sees the
//! canonical form.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::error::CoreError;
use crate::movie::NewMovie;
use crate::release_date::parse_release_date;

/// Maximum number of records accepted in one import request.
pub const MAX_IMPORT_RECORDS: usize = 1000;

/// A movie record in the legacy export layout.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyMovieRecord {
    #[serde(rename = "Release Date")]
    pub release_date: Option<String>,
    #[serde(rename = "Movie Title")]
    pub movie_title: Option<String>,
    #[serde(rename = "Production Budget")]
    pub production_budget: Option<Value>,
    #[serde(rename = "Domestic Gross")]
    pub domestic_gross: Option<Value>,
    #[serde(rename = "Worldwide Gross")]
    pub worldwide_gross: Option<Value>,
}

/// A record that was not imported, identified by its position in the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    pub index: usize,
    pub reason: String,
}

/// Outcome of an import request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: Vec<SkippedRecord>,
}

/// Parse a legacy amount: a JSON number, or a string that may carry `$`,
/// thousands separators and surrounding whitespace.
///
/// Returns `None` for blank strings and anything that is not a finite number.
///
/// # Examples
///
/// ```
/// use cinedash_core::legacy_import::parse_amount;
/// use serde_json::json;
///
/// assert_eq!(parse_amount(&json!("$425,000,000")), Some(425_000_000.0));
/// assert_eq!(parse_amount(&json!(1200)), Some(1200.0));
/// assert_eq!(parse_amount(&json!("")), None);
/// ```
pub fn parse_amount(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
                .collect();
            if cleaned.is_empty() {
                return None;
            }
            cleaned.parse::<f64>().ok()?
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}

impl LegacyMovieRecord {
    /// Map a legacy record onto a [`NewMovie`].
    ///
    /// - A missing title or a gross that is not a number rejects the record.
    /// - A budget that is not a number becomes `0`; a negative one rejects
    ///   the record.
    /// - An unparseable or empty release date is kept as `None`.
    pub fn normalize(&self) -> Result<NewMovie, String> {
        let movie_title = self
            .movie_title
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        if movie_title.is_empty() {
            return Err("Movie Title is required".to_string());
        }

        let domestic_gross = self
            .domestic_gross
            .as_ref()
            .and_then(parse_amount)
            .ok_or_else(|| "Domestic Gross must be a number".to_string())?;
        let worldwide_gross = self
            .worldwide_gross
            .as_ref()
            .and_then(parse_amount)
            .ok_or_else(|| "Worldwide Gross must be a number".to_string())?;

        let production_budget = self
            .production_budget
            .as_ref()
            .and_then(parse_amount)
            .unwrap_or(0.0);

        let movie = NewMovie {
            movie_title,
            release_date: self.release_date.as_deref().and_then(parse_release_date),
            production_budget,
            domestic_gross,
            worldwide_gross,
        };

        movie.validate().map_err(|e| {
            let CoreError::Validation(msg) = CoreError::from(e);
            msg
        })?;

        Ok(movie)
    }
}

/// Reject batches that exceed [`MAX_IMPORT_RECORDS`].
pub fn validate_batch_size(len: usize) -> Result<(), CoreError> {
    if len > MAX_IMPORT_RECORDS {
        return Err(CoreError::Validation(format!(
            "Import accepts at most {MAX_IMPORT_RECORDS} records, got {len}"
        )));
    }
    Ok(())
}

/// Normalize a batch, splitting it into importable movies and skipped
/// records. Input order is preserved in both outputs.
pub fn normalize_batch(records: &[LegacyMovieRecord]) -> (Vec<NewMovie>, Vec<SkippedRecord>) {
    let mut movies = Vec::with_capacity(records.len());
    let mut skipped = Vec::new();
    for (index, record) in records.iter().enumerate() {
        match record.normalize() {
            Ok(movie) => movies.push(movie),
            Err(reason) => skipped.push(SkippedRecord { index, reason }),
        }
    }
    (movies, skipped)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
