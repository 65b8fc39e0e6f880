//! Domain logic for the movie catalog.
//!
//! Zero I/O: everything here is pure and synchronous so the storage and HTTP
//! layers can share one definition of what a query, a report row or a valid
//! movie is.

pub mod error;
pub mod legacy_import;
pub mod movie;
pub mod movie_query;
pub mod release_date;
pub mod reports;
pub mod types;
