//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod alert_repo;
pub mod horse_repo;
pub mod vital_sample_repo;

pub use alert_repo::AlertRepo;
pub use horse_repo::HorseRepo;
pub use vital_sample_repo::VitalSampleRepo;
