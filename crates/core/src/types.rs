/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Release dates are calendar dates with no time-of-day component.
pub type ReleaseDate = chrono::NaiveDate;
