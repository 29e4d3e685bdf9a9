use axum::{
    Router,
    extract::{Path, State, rejection::PathRejection},
    http::StatusCode,
    response::Json,
    routing::get,
};
use tracing::{info, instrument};

use crate::error::{ApiError, ApiErrorResponse};
use crate::serializer::{
    RestaurantDetails, RestaurantSummary, serialize_restaurant, serialize_restaurant_details,
};

use super::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/restaurants", get(list_restaurants))
        .route("/restaurants/{id}", get(get_restaurant).delete(delete_restaurant))
}

// Ids that are not integers cannot name a restaurant.
fn restaurant_id(id: Result<Path<i32>, PathRejection>) -> Result<i32, ApiError> {
    id.map(|Path(id)| id).map_err(|_| ApiError::restaurant_not_found())
}

#[utoipa::path(
    get,
    path = "/restaurants",
    responses(
        (status = 200, description = "List of restaurants", body = [RestaurantSummary]),
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn list_restaurants(
    State(state): State<AppState>,
) -> Result<Json<Vec<RestaurantSummary>>, ApiError> {
    let restaurants = state.store.list_restaurants()?;

    Ok(Json(restaurants.iter().map(serialize_restaurant).collect()))
}

#[utoipa::path(
    get,
    path = "/restaurants/{id}",
    responses(
        (status = 200, description = "Restaurant and its pizzas", body = RestaurantDetails),
        (status = 404, description = "Restaurant not found", body = ApiErrorResponse),
    ),
    params(
        ("id" = i32, Path, description = "Restaurant ID")
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn get_restaurant(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<RestaurantDetails>, ApiError> {
    let id = restaurant_id(id)?;

    let restaurant = state
        .store
        .find_restaurant(id)?
        .ok_or_else(ApiError::restaurant_not_found)?;
    let restaurant_pizzas = state.store.restaurant_pizzas_of(&restaurant)?;

    Ok(Json(serialize_restaurant_details(&restaurant, &restaurant_pizzas)))
}

#[utoipa::path(
    delete,
    path = "/restaurants/{id}",
    responses(
        (status = 204, description = "Restaurant and its pizzas deleted"),
        (status = 404, description = "Restaurant not found", body = ApiErrorResponse),
    ),
    params(
        ("id" = i32, Path, description = "Restaurant ID")
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn delete_restaurant(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = restaurant_id(id)?;

    if state.store.find_restaurant(id)?.is_none() {
        return Err(ApiError::restaurant_not_found());
    }
    // A concurrent delete may have won the race since the lookup.
    if !state.store.delete_restaurant(id)? {
        return Err(ApiError::restaurant_not_found());
    }
    info!(restaurant_id = id, "Deleted restaurant");

    Ok(StatusCode::NO_CONTENT)
}
