//! Domain logic for the FoalWatch backend.
//!
//! Pure types and calculations only — no I/O. Persistence lives in
//! `foalwatch-db`, transport and orchestration in `foalwatch-api`.

pub mod error;
pub mod trend;
pub mod types;
pub mod vitals;
