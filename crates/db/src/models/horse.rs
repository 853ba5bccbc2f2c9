//! Horse registry entity model and DTOs.

use chrono::NaiveDate;
use foalwatch_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A horse under management.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Horse {
    pub id: DbId,
    pub name: String,
    pub breed: Option<String>,
    pub sex: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a new horse.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateHorse {
    pub name: String,
    pub breed: Option<String>,
    pub sex: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

/// DTO for a partial horse update. `None` fields are left unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateHorse {
    pub name: Option<String>,
    pub breed: Option<String>,
    pub sex: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}
