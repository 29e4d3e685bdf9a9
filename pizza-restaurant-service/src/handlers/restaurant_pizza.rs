use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
    routing::post,
};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::error::{ApiError, ApiErrorsResponse};
use crate::serializer::{RestaurantPizzaDetails, serialize_restaurant_pizza};
use crate::validation::CreateRestaurantPizzaRequest;

use super::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/restaurant_pizzas", post(create_restaurant_pizza))
}

#[utoipa::path(
    post,
    path = "/restaurant_pizzas",
    request_body = CreateRestaurantPizzaRequest,
    responses(
        (status = 201, description = "Restaurant pizza created", body = RestaurantPizzaDetails),
        (status = 400, description = "Invalid restaurant pizza", body = ApiErrorsResponse),
    ),
    tag = "restaurant_pizzas"
)]
#[instrument(skip(state))]
pub async fn create_restaurant_pizza(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<RestaurantPizzaDetails>), ApiError> {
    let Json(body) =
        payload.map_err(|rejection| ApiError::ValidationFailed(vec![rejection.body_text()]))?;
    let request = CreateRestaurantPizzaRequest::from_json(body)?;

    let valid = request.validate(state.store.as_ref())?;

    let created = state.store.insert_restaurant_pizza(valid.restaurant_pizza).map_err(|e| {
        warn!(error = %e, "Failed to insert restaurant pizza");
        ApiError::PersistenceFailure
    })?;
    info!(restaurant_pizza_id = created.id, "Created restaurant pizza");

    Ok((
        StatusCode::CREATED,
        Json(serialize_restaurant_pizza(&created, &valid.pizza, &valid.restaurant)),
    ))
}
