//! Login, initialization, dashboard, settings and back-office users.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use validator::Validate;

use super::{publish, success, ApiError, AppState};
use crate::domain::aggregates::settings::settings_from_json;
use crate::domain::aggregates::{CreateUserPayload, LoginRequest, LoginResponse, Settings, UpdateUserPayload, User};
use crate::domain::events::{CatalogEvent, Entity};
use crate::domain::value_objects::EntityId;
use crate::store::DashboardStats;

type ApiResult<T> = Result<T, ApiError>;

pub async fn init(State(s): State<AppState>) -> ApiResult<Json<Value>> {
    s.store
        .seed_defaults(&s.config.default_admin_username, &s.config.default_admin_password)
        .await
        .map_err(|e| ApiError::store(e, "Failed to initialize database"))?;
    Ok(Json(json!({"success": true, "message": "Database initialized"})))
}

pub async fn login(State(s): State<AppState>, payload: Result<Json<LoginRequest>, JsonRejection>) -> ApiResult<Json<LoginResponse>> {
    let Json(request) = payload?;
    let user = s
        .store
        .find_login(&request.username, &request.password)
        .await
        .map_err(|e| ApiError::store(e, "Login failed"))?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".into()))?;
    tracing::info!(user = %user.username, "admin login");
    Ok(Json(LoginResponse::for_user(user)))
}

pub async fn stats(State(s): State<AppState>) -> ApiResult<Json<DashboardStats>> {
    Ok(Json(s.store.stats().await.map_err(|e| ApiError::store(e, "Failed to fetch stats"))?))
}

pub async fn get_settings(State(s): State<AppState>) -> ApiResult<Json<Settings>> {
    Ok(Json(s.store.settings().await.map_err(|e| ApiError::store(e, "Failed to fetch settings"))?))
}

/// Upserts every key of the body.
pub async fn update_settings(
    State(s): State<AppState>,
    payload: Result<Json<BTreeMap<String, Value>>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(body) = payload?;
    let settings = settings_from_json(body);
    s.store.upsert_settings(&settings).await.map_err(|e| ApiError::store(e, "Failed to update settings"))?;
    publish(&s, CatalogEvent::Updated { entity: Entity::Settings, id: EntityId::from("settings") }).await;
    Ok(success())
}

pub async fn list_users(State(s): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(s.store.list_users().await.map_err(|e| ApiError::store(e, "Failed to fetch users"))?))
}

pub async fn create_user(
    State(s): State<AppState>,
    payload: Result<Json<CreateUserPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let Json(payload) = payload?;
    payload.validate()?;
    let user = s.store.create_user(payload).await.map_err(|e| ApiError::store(e, "Failed to create user"))?;
    publish(&s, CatalogEvent::Created { entity: Entity::Users, id: user.id.clone() }).await;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update_user(
    State(s): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserPayload>, JsonRejection>,
) -> ApiResult<Json<User>> {
    let Json(payload) = payload?;
    payload.validate()?;
    let user = s
        .store
        .update_user(&id.into(), payload)
        .await
        .map_err(|e| ApiError::store(e, "Failed to update user"))?
        .ok_or_else(|| ApiError::not_found("User"))?;
    publish(&s, CatalogEvent::Updated { entity: Entity::Users, id: user.id.clone() }).await;
    Ok(Json(user))
}

pub async fn delete_user(State(s): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let id = EntityId::from(id);
    s.store.delete(Entity::Users, &id).await.map_err(|e| ApiError::store(e, "Failed to delete user"))?;
    publish(&s, CatalogEvent::Deleted { entity: Entity::Users, id }).await;
    Ok(success())
}
