//! Vehicle routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, FixedOffset};
use milebook_core::vehicle::NewVehicle;
use milebook_db::VehicleRepository;
use milebook_db::entities::vehicles;
use milebook_shared::types::VehicleId;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use super::ApiError;
use crate::{AppState, middleware::AuthUser};

/// Creates the vehicle routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/vehicles", get(list_vehicles).post(create_vehicle))
        .route("/vehicles/{vehicle_id}", get(get_vehicle))
}

/// Request body for enrolling a vehicle.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    /// Display name.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// License plate.
    #[validate(length(max = 20))]
    pub license_plate: Option<String>,
    /// Odometer reading at enrollment.
    #[validate(range(min = 0))]
    pub initial_mileage: i64,
}

/// Response for a vehicle.
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    /// Vehicle ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// License plate.
    pub license_plate: Option<String>,
    /// Odometer reading at enrollment.
    pub initial_mileage: i64,
    /// Creation timestamp.
    pub created_at: DateTime<FixedOffset>,
}

impl From<vehicles::Model> for VehicleResponse {
    fn from(model: vehicles::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            license_plate: model.license_plate,
            initial_mileage: model.initial_mileage,
            created_at: model.created_at,
        }
    }
}

/// POST `/vehicles` - Enroll a vehicle.
async fn create_vehicle(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateVehicleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let vehicle = VehicleRepository::new((*state.db).clone())
        .create_vehicle(
            auth.user_id(),
            NewVehicle {
                name: payload.name,
                license_plate: payload.license_plate,
                initial_mileage: payload.initial_mileage,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(VehicleResponse::from(vehicle))))
}

/// GET `/vehicles` - List the caller's vehicles.
async fn list_vehicles(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let vehicles: Vec<VehicleResponse> = VehicleRepository::new((*state.db).clone())
        .list_vehicles(auth.user_id())
        .await?
        .into_iter()
        .map(VehicleResponse::from)
        .collect();

    Ok(Json(json!({ "vehicles": vehicles })))
}

/// GET `/vehicles/{vehicle_id}` - Get one of the caller's vehicles.
async fn get_vehicle(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(vehicle_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let vehicle = VehicleRepository::new((*state.db).clone())
        .get_vehicle(VehicleId::from_uuid(vehicle_id), auth.user_id())
        .await?;

    Ok(Json(VehicleResponse::from(vehicle)))
}
