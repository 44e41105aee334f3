//! Public storefront endpoints built on the view logic in `crate::storefront`.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState};
use crate::domain::aggregates::{Product, Social};
use crate::domain::value_objects::{DeliveryMode, EntityId, Price};
use crate::storefront::share::{default_farm_message, preview, SharePreview};
use crate::storefront::{
    plan_shares, prepare_order, product_cards, PricingSelector, PricingTable, ProductCard, ProductFilter, ProductPage,
};

type ApiResult<T> = Result<T, ApiError>;

async fn load_product(s: &AppState, id: String) -> ApiResult<Product> {
    s.store
        .get_product(&EntityId::from(id))
        .await
        .map_err(|e| ApiError::store(e, "Failed to fetch product"))?
        .ok_or_else(|| ApiError::not_found("Product"))
}

pub async fn list_cards(State(s): State<AppState>, Query(filter): Query<ProductFilter>) -> ApiResult<Json<Vec<ProductCard>>> {
    let (products, categories, farms) = tokio::try_join!(s.store.list_products(), s.store.list_categories(), s.store.list_farms())
        .map_err(|e| ApiError::store(e, "Failed to fetch products"))?;
    Ok(Json(product_cards(&products, &filter, &categories, &farms)))
}

pub async fn product_page(State(s): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<ProductPage>> {
    let product = load_product(&s, id).await?;
    let (categories, farms, settings) = tokio::try_join!(s.store.list_categories(), s.store.list_farms(), s.store.settings())
        .map_err(|e| ApiError::store(e, "Failed to fetch product"))?;
    Ok(Json(ProductPage::build(product, &categories, &farms, &settings)))
}

#[derive(Debug, Default, Deserialize)]
pub struct OrderRequest {
    #[serde(default)]
    pub quantity: Option<String>,
    #[serde(default)]
    pub delivery: DeliveryMode,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub message: String,
    pub url: String,
    pub quantity: String,
    pub delivery: DeliveryMode,
    pub price: Price,
}

/// Prices the selection and builds the outbound chat link.
pub async fn order(
    State(s): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<OrderRequest>, JsonRejection>,
) -> ApiResult<Json<OrderResponse>> {
    let Json(request) = payload?;
    let product = load_product(&s, id).await?;
    let settings = s.store.settings().await.map_err(|e| ApiError::store(e, "Failed to fetch settings"))?;

    let mut selector = PricingSelector::with_table(PricingTable::for_product(&product));
    selector.select_delivery(request.delivery);
    if let Some(quantity) = request.quantity.as_deref().filter(|q| !q.is_empty()) {
        selector
            .select_quantity(quantity)
            .ok_or_else(|| ApiError::BadRequest(format!("Unknown quantity: {quantity}")))?;
    }
    let selection = selector.selection();
    let quantity = selection.quantity.unwrap_or_default();

    let intent = prepare_order(&product, &settings, &quantity, selection.delivery, selection.price)?;
    tracing::info!(product = %product.id, quantity = %intent.quantity, price = %intent.price, "order link prepared");
    Ok(Json(OrderResponse {
        message: intent.message,
        url: intent.url,
        quantity: intent.quantity,
        delivery: intent.delivery,
        price: intent.price,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct SharePreviewRequest {
    #[serde(default)]
    pub message: Option<String>,
    /// Social ids to share on; every configured social when absent.
    #[serde(default)]
    pub socials: Option<Vec<EntityId>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharePreviewResponse {
    pub base_message: String,
    pub previews: Vec<SharePreview>,
    pub delay_ms: u64,
}

pub async fn share_preview(
    State(s): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SharePreviewRequest>, JsonRejection>,
) -> ApiResult<Json<SharePreviewResponse>> {
    let Json(request) = payload?;
    let product = load_product(&s, id).await?;
    let socials = s.store.list_socials().await.map_err(|e| ApiError::store(e, "Failed to fetch socials"))?;
    let selected = select_socials(socials, request.socials.as_deref());

    let base_message = request
        .message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| default_farm_message(&product));
    let previews = preview(&plan_shares(&base_message, &product, &selected));

    Ok(Json(SharePreviewResponse {
        base_message,
        previews,
        delay_ms: u64::try_from(s.config.share_delay.as_millis()).unwrap_or(u64::MAX),
    }))
}

/// Keeps the requested socials in catalog order.
fn select_socials(all: Vec<Social>, wanted: Option<&[EntityId]>) -> Vec<Social> {
    match wanted {
        None => all,
        Some(ids) => all.into_iter().filter(|s| ids.contains(&s.id)).collect(),
    }
}
