use serde_json::Value;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::models::{NewRestaurantPizza, Pizza, Restaurant};
use crate::store::Store;

pub const PRICE_REQUIRED: &str = "Price is required";
pub const PRICE_OUT_OF_RANGE: &str = "Price must be an integer between 1 and 30";
pub const PIZZA_NOT_FOUND: &str = "Pizza not found";
pub const RESTAURANT_NOT_FOUND: &str = "Restaurant not found";
pub const BODY_NOT_OBJECT: &str = "Request body must be a JSON object";

pub const MIN_PRICE: i32 = 1;
pub const MAX_PRICE: i32 = 30;

/// Body of `POST /restaurant_pizzas`.
///
/// Fields are kept as raw JSON so that wrongly typed values end up in the error list
/// instead of failing deserialization. A JSON `null` counts as absent.
#[derive(Debug, Default, ToSchema)]
pub struct CreateRestaurantPizzaRequest {
    /// Price of the pizza, an integer between 1 and 30
    #[schema(value_type = Option<i32>)]
    pub price: Option<Value>,
    /// Identifier of an existing pizza
    #[schema(value_type = Option<i32>)]
    pub pizza_id: Option<Value>,
    /// Identifier of an existing restaurant
    #[schema(value_type = Option<i32>)]
    pub restaurant_id: Option<Value>,
}

/// A restaurant pizza that passed validation, along with the rows it references.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRestaurantPizza {
    pub restaurant_pizza: NewRestaurantPizza,
    pub pizza: Pizza,
    pub restaurant: Restaurant,
}

impl CreateRestaurantPizzaRequest {
    /// Reads the fields out of a JSON object. Any other JSON value is rejected.
    pub fn from_json(body: Value) -> Result<Self, ApiError> {
        let Value::Object(mut fields) = body else {
            return Err(ApiError::ValidationFailed(vec![BODY_NOT_OBJECT.to_string()]));
        };
        let mut take = |key: &str| fields.remove(key).filter(|value| !value.is_null());

        Ok(Self {
            price: take("price"),
            pizza_id: take("pizza_id"),
            restaurant_id: take("restaurant_id"),
        })
    }

    /// Runs every check and reports all failures together.
    pub fn validate(&self, store: &dyn Store) -> Result<ValidRestaurantPizza, ApiError> {
        let mut errors = Vec::new();

        let price = match check_price(self.price.as_ref()) {
            Ok(price) => Some(price),
            Err(message) => {
                errors.push(message.to_string());
                None
            }
        };

        let pizza = match as_id(self.pizza_id.as_ref()) {
            Some(id) => store.find_pizza(id)?,
            None => None,
        };
        if pizza.is_none() {
            errors.push(PIZZA_NOT_FOUND.to_string());
        }

        let restaurant = match as_id(self.restaurant_id.as_ref()) {
            Some(id) => store.find_restaurant(id)?,
            None => None,
        };
        if restaurant.is_none() {
            errors.push(RESTAURANT_NOT_FOUND.to_string());
        }

        let (Some(price), Some(pizza), Some(restaurant)) = (price, pizza, restaurant) else {
            return Err(ApiError::ValidationFailed(errors));
        };

        Ok(ValidRestaurantPizza {
            restaurant_pizza: NewRestaurantPizza {
                price,
                pizza_id: pizza.id,
                restaurant_id: restaurant.id,
            },
            pizza,
            restaurant,
        })
    }
}

/// Absence is reported on its own; the range check only applies to a present price.
pub fn check_price(price: Option<&Value>) -> Result<i32, &'static str> {
    let Some(price) = price else {
        return Err(PRICE_REQUIRED);
    };
    price
        .as_i64()
        .and_then(|price| i32::try_from(price).ok())
        .filter(|price| (MIN_PRICE..=MAX_PRICE).contains(price))
        .ok_or(PRICE_OUT_OF_RANGE)
}

fn as_id(value: Option<&Value>) -> Option<i32> {
    value?.as_i64().and_then(|id| i32::try_from(id).ok())
}
