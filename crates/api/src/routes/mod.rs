//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth_middleware};

pub mod error;
pub mod health;
pub mod receipts;
pub mod trips;
pub mod vehicles;
pub mod years;

pub use error::ApiError;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(vehicles::routes())
        .merge(trips::routes())
        .merge(receipts::routes())
        .merge(years::routes())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new().merge(health::routes()).merge(protected_routes)
}
