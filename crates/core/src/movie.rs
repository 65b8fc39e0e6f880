//! Create-path input handling: numeric coercion and validation of new movies.

use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::error::CoreError;
use crate::release_date::parse_release_date;
use crate::types::ReleaseDate;

// ---------------------------------------------------------------------------
// Numeric coercion
// ---------------------------------------------------------------------------

/// Coerce a JSON value into a finite number using JavaScript `Number()`
/// rules: numbers pass through, numeric strings are parsed, a blank string
/// is `0`, booleans are `1`/`0`.
///
/// Returns `None` when the value is not a number (`NaN` in JavaScript terms),
/// including `null`, arrays, objects and non-finite results.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse::<f64>().ok()?
            }
        }
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    n.is_finite().then_some(n)
}

// ---------------------------------------------------------------------------
// Create input
// ---------------------------------------------------------------------------

/// Raw create request as sent by the client. Every field is optional at this
/// stage; [`NewMovie::from_input`] decides what is required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieInput {
    pub release_date: Option<String>,
    pub movie_title: Option<String>,
    pub production_budget: Option<Value>,
    pub domestic_gross: Option<Value>,
    pub worldwide_gross: Option<Value>,
}

/// A normalized movie ready to be persisted.
///
/// `release_date` is `None` only for legacy imports whose date could not be
/// parsed; the create path always sets it.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewMovie {
    #[validate(length(min = 1, message = "movieTitle must not be empty"))]
    pub movie_title: String,
    pub release_date: Option<ReleaseDate>,
    #[validate(range(min = 0.0, message = "productionBudget must not be negative"))]
    pub production_budget: f64,
    pub domestic_gross: f64,
    pub worldwide_gross: f64,
}

impl NewMovie {
    /// Normalize and validate a client create request.
    ///
    /// - `releaseDate` and `movieTitle` are required.
    /// - `productionBudget` defaults to `0` when absent or not a number.
    /// - `domesticGross` and `worldwideGross` are required numbers.
    ///
    /// All missing/malformed fields are reported together in one
    /// [`CoreError::Validation`].
    pub fn from_input(input: MovieInput) -> Result<Self, CoreError> {
        let mut problems: Vec<String> = Vec::new();

        let release_date = match input.release_date.as_deref().map(str::trim) {
            None | Some("") => {
                problems.push("releaseDate is required".to_string());
                None
            }
            Some(raw) => {
                let parsed = parse_release_date(raw);
                if parsed.is_none() {
                    problems.push(format!("releaseDate '{raw}' is not a valid date"));
                }
                parsed
            }
        };

        let movie_title = input
            .movie_title
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        if movie_title.is_empty() {
            problems.push("movieTitle is required".to_string());
        }

        let production_budget = input
            .production_budget
            .as_ref()
            .and_then(coerce_number)
            .unwrap_or(0.0);

        let domestic_gross =
            required_number("domesticGross", input.domestic_gross.as_ref(), &mut problems);
        let worldwide_gross = required_number(
            "worldwideGross",
            input.worldwide_gross.as_ref(),
            &mut problems,
        );

        if !problems.is_empty() {
            return Err(CoreError::Validation(problems.join("; ")));
        }

        let movie = NewMovie {
            movie_title,
            release_date,
            production_budget,
            domestic_gross,
            worldwide_gross,
        };
        movie.validate()?;
        Ok(movie)
    }
}

/// Coerce a required numeric field, recording a problem when it is missing
/// or not a number.
fn required_number(field: &str, value: Option<&Value>, problems: &mut Vec<String>) -> f64 {
    match value {
        None | Some(Value::Null) => {
            problems.push(format!("{field} is required"));
            0.0
        }
        Some(v) => coerce_number(v).unwrap_or_else(|| {
            problems.push(format!("{field} must be a number"));
            0.0
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
