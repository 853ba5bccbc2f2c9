//! Handlers for the horse registry.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use foalwatch_core::error::CoreError;
use foalwatch_core::types::DbId;
use foalwatch_db::models::horse::{CreateHorse, Horse, UpdateHorse};
use foalwatch_db::repositories::HorseRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /horses
pub async fn list_horses(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Horse>>>> {
    let horses = HorseRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: horses }))
}

/// GET /horses/{id}
pub async fn get_horse(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Horse>>> {
    let horse = HorseRepo::get_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "horse",
            id,
        }))?;
    Ok(Json(DataResponse { data: horse }))
}

/// POST /horses
pub async fn create_horse(
    State(state): State<AppState>,
    Json(input): Json<CreateHorse>,
) -> AppResult<(StatusCode, Json<DataResponse<Horse>>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "name is required".to_string(),
        )));
    }

    let horse = HorseRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: horse })))
}

/// PUT /horses/{id}
pub async fn update_horse(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateHorse>,
) -> AppResult<Json<DataResponse<Horse>>> {
    if input.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::Core(CoreError::Validation(
            "name must not be empty".to_string(),
        )));
    }

    let horse = HorseRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "horse",
            id,
        }))?;
    Ok(Json(DataResponse { data: horse }))
}

/// DELETE /horses/{id}
pub async fn delete_horse(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = HorseRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "horse",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
