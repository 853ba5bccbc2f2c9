//! Request handlers, one module per domain area.

pub mod horses;
pub mod vitals;
