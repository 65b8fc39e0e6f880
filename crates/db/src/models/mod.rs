//! Row models.
//!
//! Each submodule holds a `FromRow` + `Serialize` entity struct matching the
//! database row. Create DTOs live in `cinedash_core` because they carry
//! validation rules.

pub mod movie;
