//! Repository for the `horses` table.

use foalwatch_core::types::DbId;
use sqlx::PgPool;

use crate::models::horse::{CreateHorse, Horse, UpdateHorse};

/// Column list for `horses` queries.
const COLUMNS: &str = "id, name, breed, sex, date_of_birth, created_at, updated_at";

/// Provides CRUD operations for horses.
pub struct HorseRepo;

impl HorseRepo {
    /// List all horses, ordered by name.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Horse>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM horses ORDER BY name, id");
        sqlx::query_as::<_, Horse>(&query).fetch_all(pool).await
    }

    /// Get a single horse by ID.
    pub async fn get_by_id(pool: &PgPool, id: DbId) -> Result<Option<Horse>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM horses WHERE id = $1");
        sqlx::query_as::<_, Horse>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Register a new horse.
    pub async fn create(pool: &PgPool, dto: &CreateHorse) -> Result<Horse, sqlx::Error> {
        let query = format!(
            "INSERT INTO horses (name, breed, sex, date_of_birth) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Horse>(&query)
            .bind(&dto.name)
            .bind(&dto.breed)
            .bind(&dto.sex)
            .bind(dto.date_of_birth)
            .fetch_one(pool)
            .await
    }

    /// Update a horse. `None` fields keep their current value.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        dto: &UpdateHorse,
    ) -> Result<Option<Horse>, sqlx::Error> {
        let query = format!(
            "UPDATE horses SET \
                name = COALESCE($2, name), \
                breed = COALESCE($3, breed), \
                sex = COALESCE($4, sex), \
                date_of_birth = COALESCE($5, date_of_birth), \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Horse>(&query)
            .bind(id)
            .bind(&dto.name)
            .bind(&dto.breed)
            .bind(&dto.sex)
            .bind(dto.date_of_birth)
            .fetch_optional(pool)
            .await
    }

    /// Delete a horse by ID. Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM horses WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
