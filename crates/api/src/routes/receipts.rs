//! Receipt routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use chrono::{DateTime, NaiveDate, Utc};
use milebook_core::receipt::{Receipt, ReceiptFields};
use milebook_db::ReceiptRepository;
use milebook_shared::AppError;
use milebook_shared::types::{ReceiptId, VehicleId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use super::ApiError;
use crate::{AppState, middleware::AuthUser};

/// Creates the receipt routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/receipts", get(list_receipts).post(create_receipt))
        .route("/receipts/{receipt_id}", put(update_receipt).delete(delete_receipt))
}

/// Request body for a receipt.
///
/// `vehicle_id` is required on creation and ignored on update.
#[derive(Debug, Deserialize, Validate)]
pub struct ReceiptRequest {
    /// Vehicle the expense belongs to.
    pub vehicle_id: Option<Uuid>,
    /// Date on the receipt (YYYY-MM-DD).
    pub date: NaiveDate,
    /// Amount paid.
    pub amount: Decimal,
    /// Fuel volume in litres.
    pub litres: Option<Decimal>,
    /// Where the receipt was issued.
    #[validate(length(max = 200))]
    pub vendor: Option<String>,
    /// Free-text note.
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

impl ReceiptRequest {
    fn into_fields(self) -> ReceiptFields {
        ReceiptFields {
            date: self.date,
            amount: self.amount,
            litres: self.litres,
            vendor: self.vendor,
            note: self.note,
        }
    }
}

/// Query parameters for listing receipts.
#[derive(Debug, Deserialize)]
pub struct ListReceiptsQuery {
    /// Only receipts of this vehicle.
    pub vehicle_id: Option<Uuid>,
}

/// Response for a receipt.
#[derive(Debug, Serialize)]
pub struct ReceiptResponse {
    /// Receipt ID.
    pub id: ReceiptId,
    /// Vehicle ID.
    pub vehicle_id: VehicleId,
    /// Date on the receipt.
    pub date: NaiveDate,
    /// Amount paid.
    pub amount: Decimal,
    /// Fuel volume in litres.
    pub litres: Option<Decimal>,
    /// Where the receipt was issued.
    pub vendor: Option<String>,
    /// Free-text note.
    pub note: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<Receipt> for ReceiptResponse {
    fn from(receipt: Receipt) -> Self {
        Self {
            id: receipt.id,
            vehicle_id: receipt.vehicle_id,
            date: receipt.date,
            amount: receipt.amount,
            litres: receipt.litres,
            vendor: receipt.vendor,
            note: receipt.note,
            created_at: receipt.created_at,
        }
    }
}

/// POST `/receipts` - Record a receipt.
async fn create_receipt(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ReceiptRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;
    let Some(vehicle_id) = payload.vehicle_id else {
        return Err(AppError::InvalidArgument("vehicle_id is required".to_string()).into());
    };

    let receipt = ReceiptRepository::new((*state.db).clone())
        .create_receipt(auth.user_id(), VehicleId::from_uuid(vehicle_id), payload.into_fields())
        .await?;

    Ok((StatusCode::CREATED, Json(ReceiptResponse::from(receipt))))
}

/// GET `/receipts` - The caller's receipts, newest first.
async fn list_receipts(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListReceiptsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let receipts: Vec<ReceiptResponse> = ReceiptRepository::new((*state.db).clone())
        .list_receipts(auth.user_id(), query.vehicle_id.map(VehicleId::from_uuid))
        .await?
        .into_iter()
        .map(ReceiptResponse::from)
        .collect();

    Ok(Json(json!({ "receipts": receipts })))
}

/// PUT `/receipts/{receipt_id}` - Replace a receipt's fields.
async fn update_receipt(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(receipt_id): Path<Uuid>,
    Json(payload): Json<ReceiptRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let receipt_id = ReceiptId::from_uuid(receipt_id);
    let receipt = ReceiptRepository::new((*state.db).clone())
        .update_receipt(receipt_id, auth.user_id(), payload.into_fields())
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Receipt not found: {receipt_id}")))?;

    Ok(Json(ReceiptResponse::from(receipt)))
}

/// DELETE `/receipts/{receipt_id}` - Soft-delete a receipt.
async fn delete_receipt(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(receipt_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let receipt_id = ReceiptId::from_uuid(receipt_id);
    let deleted = ReceiptRepository::new((*state.db).clone())
        .delete_receipt(receipt_id, auth.user_id())
        .await?;

    if !deleted {
        return Err(ApiError::not_found(format!("Receipt not found: {receipt_id}")));
    }
    Ok(StatusCode::NO_CONTENT)
}
