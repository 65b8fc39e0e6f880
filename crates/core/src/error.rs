/// Domain-level errors. Storage failures are not represented here; they
/// travel as `sqlx::Error` from the db crate.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl From<validator::ValidationErrors> for CoreError {
    /// Flatten field errors into a single message list, sorted so the text is
    /// stable across runs. Errors without a custom message fall back to
    /// `field: code`.
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut parts: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{field}: {}", e.code))
                })
            })
            .collect();
        parts.sort();
        CoreError::Validation(parts.join("; "))
    }
}
