//! HTTP gateway.

mod admin;
mod catalog;
mod error;
mod storefront;
mod upload;

pub use error::ApiError;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::warn;

use crate::blob::BlobStore;
use crate::config::AppConfig;
use crate::domain::events::CatalogEvent;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub nats: Option<async_nats::Client>,
    pub blobs: Arc<dyn BlobStore>,
    pub config: Arc<AppConfig>,
}

pub fn build_app(state: AppState) -> Router {
    let media_route = state.config.public_media_url.clone();
    let upload_dir = state.config.upload_dir.clone();
    let upload_limit = DefaultBodyLimit::max(state.config.upload_max_bytes);

    let router = Router::new()
        .route("/health", get(|| async { Json(json!({"status": "healthy", "service": "farm-storefront"})) }))
        .route("/api/init", get(admin::init))
        .route("/api/login", post(admin::login))
        .route("/api/stats", get(admin::stats))
        .route("/api/settings", get(admin::get_settings).post(admin::update_settings))
        .route("/api/users", get(admin::list_users).post(admin::create_user))
        .route("/api/users/:id", put(admin::update_user).delete(admin::delete_user))
        .route("/api/products", get(catalog::list_products).post(catalog::create_product))
        .route("/api/products/:id", get(catalog::get_product).put(catalog::update_product).delete(catalog::delete_product))
        .route("/api/categories", get(catalog::list_categories).post(catalog::create_category))
        .route("/api/categories/:id", get(catalog::get_category).put(catalog::update_category).delete(catalog::delete_category))
        .route("/api/farms", get(catalog::list_farms).post(catalog::create_farm))
        .route("/api/farms/:id", get(catalog::get_farm).put(catalog::update_farm).delete(catalog::delete_farm))
        .route("/api/socials", get(catalog::list_socials).post(catalog::create_social))
        .route("/api/socials/:id", put(catalog::update_social).delete(catalog::delete_social))
        .route("/api/upload", post(upload::upload).layer(upload_limit))
        .route("/api/storefront/products", get(storefront::list_cards))
        .route("/api/storefront/products/:id", get(storefront::product_page))
        .route("/api/storefront/products/:id/order", post(storefront::order))
        .route("/api/storefront/products/:id/share-preview", post(storefront::share_preview))
        .fallback(route_not_found);

    let router = if media_route.starts_with('/') && media_route.len() > 1 {
        router.nest_service(&media_route, ServeDir::new(upload_dir))
    } else {
        router
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn route_not_found() -> ApiError {
    ApiError::NotFound("Route not found".into())
}

pub(crate) fn success() -> Json<Value> {
    Json(json!({"success": true}))
}

/// Publishes a catalog change when NATS is configured. Failures are logged only.
pub(crate) async fn publish(state: &AppState, event: CatalogEvent) {
    let Some(nats) = &state.nats else { return };
    let payload = match serde_json::to_vec(&event) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "could not encode catalog event");
            return;
        }
    };
    if let Err(e) = nats.publish(event.subject(), payload.into()).await {
        warn!(error = %e, subject = %event.subject(), "catalog event not published");
    }
}
