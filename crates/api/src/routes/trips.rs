//! Trip routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, NaiveDate, Utc};
use milebook_core::ledger::{Trip, TripFields};
use milebook_db::TripRepository;
use milebook_shared::types::{TripId, VehicleId};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use super::ApiError;
use crate::{AppState, middleware::AuthUser};

/// Creates the trip routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/trips", get(list_trips).post(create_trip))
        .route(
            "/trips/{trip_id}",
            get(get_trip).put(update_trip).delete(delete_trip),
        )
        .route("/vehicles/{vehicle_id}/trips", get(list_vehicle_trips))
}

/// Request body for logging a trip.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTripRequest {
    /// Vehicle the trip was driven with.
    pub vehicle_id: Uuid,
    /// Date of the trip (YYYY-MM-DD).
    pub date: NaiveDate,
    /// Odometer reading at departure.
    pub start_odometer: i64,
    /// Odometer reading on arrival.
    pub end_odometer: i64,
    /// Purpose of the trip.
    #[validate(length(max = 500))]
    pub purpose: Option<String>,
    /// Business (true) or private (false).
    #[serde(default)]
    pub is_business: bool,
}

/// Request body for replacing a trip's fields.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTripRequest {
    /// Date of the trip (YYYY-MM-DD).
    pub date: NaiveDate,
    /// Odometer reading at departure.
    pub start_odometer: i64,
    /// Odometer reading on arrival.
    pub end_odometer: i64,
    /// Purpose of the trip.
    #[validate(length(max = 500))]
    pub purpose: Option<String>,
    /// Business (true) or private (false).
    #[serde(default)]
    pub is_business: bool,
}

impl From<UpdateTripRequest> for TripFields {
    fn from(req: UpdateTripRequest) -> Self {
        Self {
            date: req.date,
            start_odometer: req.start_odometer,
            end_odometer: req.end_odometer,
            purpose: req.purpose,
            is_business: req.is_business,
        }
    }
}

/// Response for a trip.
#[derive(Debug, Serialize)]
pub struct TripResponse {
    /// Trip ID.
    pub id: TripId,
    /// Vehicle ID.
    pub vehicle_id: VehicleId,
    /// Date of the trip.
    pub date: NaiveDate,
    /// Odometer reading at departure.
    pub start_odometer: i64,
    /// Odometer reading on arrival.
    pub end_odometer: i64,
    /// Kilometres driven.
    pub distance: i64,
    /// Purpose of the trip.
    pub purpose: Option<String>,
    /// Business (true) or private (false).
    pub is_business: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<Trip> for TripResponse {
    fn from(trip: Trip) -> Self {
        Self {
            id: trip.id,
            vehicle_id: trip.vehicle_id,
            date: trip.date,
            start_odometer: trip.start_odometer,
            end_odometer: trip.end_odometer,
            distance: trip.distance(),
            purpose: trip.purpose,
            is_business: trip.is_business,
            created_at: trip.created_at,
            updated_at: trip.updated_at,
        }
    }
}

fn trip_list(trips: Vec<Trip>) -> Json<serde_json::Value> {
    let trips: Vec<TripResponse> = trips.into_iter().map(TripResponse::from).collect();
    Json(json!({ "trips": trips }))
}

/// POST `/trips` - Log a trip.
async fn create_trip(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateTripRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let vehicle_id = VehicleId::from_uuid(payload.vehicle_id);
    let fields = TripFields {
        date: payload.date,
        start_odometer: payload.start_odometer,
        end_odometer: payload.end_odometer,
        purpose: payload.purpose,
        is_business: payload.is_business,
    };

    let trip = TripRepository::new((*state.db).clone())
        .create_trip(auth.user_id(), vehicle_id, fields)
        .await?;

    Ok((StatusCode::CREATED, Json(TripResponse::from(trip))))
}

/// GET `/trips` - All of the caller's trips, newest first.
async fn list_trips(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let trips = TripRepository::new((*state.db).clone())
        .list_trips(auth.user_id())
        .await?;
    Ok(trip_list(trips))
}

/// GET `/vehicles/{vehicle_id}/trips` - Trips of one vehicle, newest first.
async fn list_vehicle_trips(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(vehicle_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let trips = TripRepository::new((*state.db).clone())
        .list_vehicle_trips(auth.user_id(), VehicleId::from_uuid(vehicle_id))
        .await?;
    Ok(trip_list(trips))
}

/// GET `/trips/{trip_id}` - Get one trip.
async fn get_trip(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(trip_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let trip_id = TripId::from_uuid(trip_id);
    let trip = TripRepository::new((*state.db).clone())
        .get_trip(trip_id, auth.user_id())
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Trip not found: {trip_id}")))?;

    Ok(Json(TripResponse::from(trip)))
}

/// PUT `/trips/{trip_id}` - Replace a trip's fields.
async fn update_trip(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(trip_id): Path<Uuid>,
    Json(payload): Json<UpdateTripRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let trip_id = TripId::from_uuid(trip_id);
    let trip = TripRepository::new((*state.db).clone())
        .update_trip(trip_id, auth.user_id(), payload.into())
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Trip not found: {trip_id}")))?;

    Ok(Json(TripResponse::from(trip)))
}

/// DELETE `/trips/{trip_id}` - Soft-delete a trip.
async fn delete_trip(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(trip_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let trip_id = TripId::from_uuid(trip_id);
    let deleted = TripRepository::new((*state.db).clone())
        .delete_trip(trip_id, auth.user_id())
        .await?;

    if !deleted {
        return Err(ApiError::not_found(format!("Trip not found: {trip_id}")));
    }
    Ok(StatusCode::NO_CONTENT)
}
