//! Back-office CRUD for products, categories, farms and socials.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use validator::Validate;

use super::{publish, success, ApiError, AppState};
use crate::domain::aggregates::{Category, CategoryPayload, Farm, FarmPayload, Product, ProductPayload, Social, SocialPayload};
use crate::domain::events::{CatalogEvent, Entity};
use crate::domain::value_objects::EntityId;

type ApiResult<T> = Result<T, ApiError>;

fn validated<P: Validate>(payload: Result<Json<P>, JsonRejection>) -> ApiResult<P> {
    let Json(payload) = payload?;
    payload.validate()?;
    Ok(payload)
}

async fn deleted(state: &AppState, entity: Entity, id: String, message: &str) -> ApiResult<Json<Value>> {
    let id = EntityId::from(id);
    state.store.delete(entity, &id).await.map_err(|e| ApiError::store(e, message))?;
    publish(state, CatalogEvent::Deleted { entity, id }).await;
    Ok(success())
}

// Products

pub async fn list_products(State(s): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    let products = s.store.list_products().await.map_err(|e| ApiError::store(e, "Failed to fetch products"))?;
    Ok(Json(products))
}

pub async fn get_product(State(s): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Product>> {
    s.store
        .get_product(&id.into())
        .await
        .map_err(|e| ApiError::store(e, "Failed to fetch product"))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Product"))
}

pub async fn create_product(
    State(s): State<AppState>,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let payload = validated(payload)?;
    let product = s.store.create_product(payload.into_columns()).await.map_err(|e| ApiError::store(e, "Failed to create product"))?;
    publish(&s, CatalogEvent::Created { entity: Entity::Products, id: product.id.clone() }).await;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(s): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> ApiResult<Json<Product>> {
    let payload = validated(payload)?;
    let product = s
        .store
        .update_product(&id.into(), payload.into_columns())
        .await
        .map_err(|e| ApiError::store(e, "Failed to update product"))?
        .ok_or_else(|| ApiError::not_found("Product"))?;
    publish(&s, CatalogEvent::Updated { entity: Entity::Products, id: product.id.clone() }).await;
    Ok(Json(product))
}

pub async fn delete_product(State(s): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    deleted(&s, Entity::Products, id, "Failed to delete product").await
}

// Categories

pub async fn list_categories(State(s): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(s.store.list_categories().await.map_err(|e| ApiError::store(e, "Failed to fetch categories"))?))
}

pub async fn get_category(State(s): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Category>> {
    s.store
        .get_category(&id.into())
        .await
        .map_err(|e| ApiError::store(e, "Failed to fetch category"))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Category"))
}

pub async fn create_category(
    State(s): State<AppState>,
    payload: Result<Json<CategoryPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let payload = validated(payload)?;
    let category = s
        .store
        .save_category(None, &payload)
        .await
        .map_err(|e| ApiError::store(e, "Failed to create category"))?
        .ok_or_else(|| ApiError::Internal("Failed to create category".into()))?;
    publish(&s, CatalogEvent::Created { entity: Entity::Categories, id: category.id.clone() }).await;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(s): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CategoryPayload>, JsonRejection>,
) -> ApiResult<Json<Category>> {
    let payload = validated(payload)?;
    let category = s
        .store
        .save_category(Some(&id.into()), &payload)
        .await
        .map_err(|e| ApiError::store(e, "Failed to update category"))?
        .ok_or_else(|| ApiError::not_found("Category"))?;
    publish(&s, CatalogEvent::Updated { entity: Entity::Categories, id: category.id.clone() }).await;
    Ok(Json(category))
}

pub async fn delete_category(State(s): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    deleted(&s, Entity::Categories, id, "Failed to delete category").await
}

// Farms

pub async fn list_farms(State(s): State<AppState>) -> ApiResult<Json<Vec<Farm>>> {
    Ok(Json(s.store.list_farms().await.map_err(|e| ApiError::store(e, "Failed to fetch farms"))?))
}

pub async fn get_farm(State(s): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Farm>> {
    s.store
        .get_farm(&id.into())
        .await
        .map_err(|e| ApiError::store(e, "Failed to fetch farm"))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Farm"))
}

pub async fn create_farm(
    State(s): State<AppState>,
    payload: Result<Json<FarmPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Farm>)> {
    let payload = validated(payload)?;
    let farm = s
        .store
        .save_farm(None, &payload)
        .await
        .map_err(|e| ApiError::store(e, "Failed to create farm"))?
        .ok_or_else(|| ApiError::Internal("Failed to create farm".into()))?;
    publish(&s, CatalogEvent::Created { entity: Entity::Farms, id: farm.id.clone() }).await;
    Ok((StatusCode::CREATED, Json(farm)))
}

pub async fn update_farm(
    State(s): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<FarmPayload>, JsonRejection>,
) -> ApiResult<Json<Farm>> {
    let payload = validated(payload)?;
    let farm = s
        .store
        .save_farm(Some(&id.into()), &payload)
        .await
        .map_err(|e| ApiError::store(e, "Failed to update farm"))?
        .ok_or_else(|| ApiError::not_found("Farm"))?;
    publish(&s, CatalogEvent::Updated { entity: Entity::Farms, id: farm.id.clone() }).await;
    Ok(Json(farm))
}

pub async fn delete_farm(State(s): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    deleted(&s, Entity::Farms, id, "Failed to delete farm").await
}

// Socials

pub async fn list_socials(State(s): State<AppState>) -> ApiResult<Json<Vec<Social>>> {
    Ok(Json(s.store.list_socials().await.map_err(|e| ApiError::store(e, "Failed to fetch socials"))?))
}

pub async fn create_social(
    State(s): State<AppState>,
    payload: Result<Json<SocialPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Social>)> {
    let payload = validated(payload)?;
    let social = s
        .store
        .save_social(None, &payload)
        .await
        .map_err(|e| ApiError::store(e, "Failed to create social"))?
        .ok_or_else(|| ApiError::Internal("Failed to create social".into()))?;
    publish(&s, CatalogEvent::Created { entity: Entity::Socials, id: social.id.clone() }).await;
    Ok((StatusCode::CREATED, Json(social)))
}

pub async fn update_social(
    State(s): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SocialPayload>, JsonRejection>,
) -> ApiResult<Json<Social>> {
    let payload = validated(payload)?;
    let social = s
        .store
        .save_social(Some(&id.into()), &payload)
        .await
        .map_err(|e| ApiError::store(e, "Failed to update social"))?
        .ok_or_else(|| ApiError::not_found("Social"))?;
    publish(&s, CatalogEvent::Updated { entity: Entity::Socials, id: social.id.clone() }).await;
    Ok(Json(social))
}

pub async fn delete_social(State(s): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    deleted(&s, Entity::Socials, id, "Failed to delete social").await
}

#[cfg(test)]
mod tests {
    use crate::api::tests::{body_json, json_request, test_app};
    use axum::http::StatusCode;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_create_category_requires_name() {
        let response = test_app().oneshot(json_request("POST", "/api/categories", r#"{"name": ""}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_create_product_rejects_malformed_json() {
        let response = test_app().oneshot(json_request("POST", "/api/products", "{not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_farm_rejects_missing_name() {
        let response = test_app().oneshot(json_request("PUT", "/api/farms/1", r#"{"description": "x"}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
