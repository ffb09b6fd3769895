use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, Utc};
use hasura::{get_order_status, models::OrderRecord, update_order_status};
use orders::{
    PurchaseStore, StatusHistory, StatusLabel, StatusUpdate,
    inventory::{InventorySummary, Purchase},
    status_history::DisplayHistory,
};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, state::AppState};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusResponse {
    pub order_id: String,
    pub label: StatusLabel,
    pub status_history: DisplayHistory,
}

fn status_response(order: &OrderRecord) -> OrderStatusResponse {
    let history = StatusHistory::from_storage_value(&order.status_history);

    OrderStatusResponse {
        order_id: order.id.clone(),
        label: history.display_label(order.cancelled),
        status_history: history.to_display(),
    }
}

pub async fn order_status_handler(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<String>,
) -> Result<Json<OrderStatusResponse>, AppError> {
    let order = get_order_status(
        &state.http,
        &state.config.hasura_url,
        &state.config.hasura_admin_secret,
        &order_id,
    )
    .await?
    .ok_or(AppError::OrderNotFound)?;

    Ok(Json(status_response(&order)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStatusPayload {
    /// Numeric key ("0".."2") or checkpoint name ("accepted"...).
    pub slot: String,
    #[serde(default)]
    pub is_completed: Option<bool>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

pub async fn set_status_handler(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<String>,
    Json(payload): Json<SetStatusPayload>,
) -> Result<Json<OrderStatusResponse>, AppError> {
    let order = get_order_status(
        &state.http,
        &state.config.hasura_url,
        &state.config.hasura_admin_secret,
        &order_id,
    )
    .await?
    .ok_or(AppError::OrderNotFound)?;

    let history = StatusHistory::from_storage_value(&order.status_history);
    let update = StatusUpdate {
        is_completed: payload.is_completed,
        completed_at: payload.completed_at,
    };
    let next = history.set_status(&payload.slot, &update)?;

    let storage = serde_json::to_value(&next)?;
    update_order_status(
        &state.http,
        &state.config.hasura_url,
        &state.config.hasura_admin_secret,
        &order_id,
        &storage,
    )
    .await?
    .ok_or(AppError::OrderNotFound)?;

    Ok(Json(OrderStatusResponse {
        order_id: order.id,
        label: next.display_label(order.cancelled),
        status_history: next.to_display(),
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteParams {
    pub distance_km: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub distance_km: f64,
    pub extra_charge: u32,
}

pub async fn charge_quote_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QuoteParams>,
) -> Json<QuoteResponse> {
    Json(QuoteResponse {
        distance_km: params.distance_km,
        extra_charge: state.charge_policy.extra_charge(params.distance_km),
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryPagesPayload {
    /// Row count the data layer reported for the whole result set.
    pub total_count: usize,
    pub pages: Vec<Vec<Purchase>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummaryResponse {
    pub summary: InventorySummary,
    pub loaded: usize,
    pub has_more: bool,
}

fn build_store(payload: InventoryPagesPayload) -> Result<PurchaseStore, AppError> {
    let mut store = PurchaseStore::new();
    for page in payload.pages {
        store.merge_page(page, payload.total_count);
    }

    // More unique rows than the reported total means the pages and the
    // count cannot belong to the same result set.
    if store.loaded() > store.total_count() {
        return Err(AppError::MalformedPayload);
    }

    Ok(store)
}

pub async fn inventory_summary_handler(
    Json(payload): Json<InventoryPagesPayload>,
) -> Result<Json<InventorySummaryResponse>, AppError> {
    let store = build_store(payload)?;

    Ok(Json(InventorySummaryResponse {
        summary: store.summary(),
        loaded: store.loaded(),
        has_more: store.has_more(),
    }))
}
