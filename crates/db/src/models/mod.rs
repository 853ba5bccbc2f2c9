//! Entity models and DTOs.
//!
//! One file per domain area; entity structs derive `FromRow`, create/update
//! DTOs derive `Deserialize`.

pub mod horse;
pub mod vitals;
