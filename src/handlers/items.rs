// Item CRUD endpoint handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::error::{ApiError, ApiResult};
use crate::handlers::AppState;
use crate::models::{ItemCreate, ItemResponse, ItemUpdate, PaginationQuery};

/// Handler for GET /api/v1/items
pub async fn list_items(
    State(state): State<AppState>,
    Query(params): Query<PaginationQuery>,
) -> ApiResult<Json<Vec<ItemResponse>>> {
    let items = state.items.list_items(params.skip, params.limit).await?;

    Ok(Json(items.into_iter().map(ItemResponse::from).collect()))
}

/// Handler for POST /api/v1/items
pub async fn create_item(
    State(state): State<AppState>,
    Json(payload): Json<ItemCreate>,
) -> ApiResult<(StatusCode, Json<ItemResponse>)> {
    payload.validate().map_err(ApiError::InvalidRequest)?;

    let item = state.items.create_item(&payload).await?;

    Ok((StatusCode::CREATED, Json(item.into())))
}

/// Handler for GET /api/v1/items/{id}
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ItemResponse>> {
    let item = state
        .items
        .get_item(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Item with id {} not found", id)))?;

    Ok(Json(item.into()))
}

/// Handler for PUT /api/v1/items/{id}
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ItemUpdate>,
) -> ApiResult<Json<ItemResponse>> {
    payload.validate().map_err(ApiError::InvalidRequest)?;

    let updated = state
        .items
        .update_item(&id, &payload)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Item with id {} not found", id)))?;

    Ok(Json(updated.into()))
}

/// Handler for DELETE /api/v1/items/{id}
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if state.items.delete_item(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Item with id {} not found", id)))
    }
}
