use serde::Serialize;
use utoipa::ToSchema;

use crate::models;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RestaurantSummary {
    /// Unique identifier for the restaurant
    pub id: i32,
    /// Name of the restaurant
    pub name: String,
    /// Address of the restaurant
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PizzaSummary {
    /// Unique identifier for the pizza
    pub id: i32,
    /// Name of the pizza
    pub name: String,
    /// Comma separated ingredients of the pizza
    pub ingredients: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RestaurantPizzaDetails {
    /// Unique identifier for the restaurant pizza
    pub id: i32,
    /// Price the restaurant sells the pizza at
    pub price: i32,
    pub pizza_id: i32,
    pub restaurant_id: i32,
    pub pizza: PizzaSummary,
    pub restaurant: RestaurantSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RestaurantDetails {
    /// Unique identifier for the restaurant
    pub id: i32,
    /// Name of the restaurant
    pub name: String,
    /// Address of the restaurant
    pub address: String,
    /// Pizzas sold by the restaurant, in the order they were added
    pub restaurant_pizzas: Vec<RestaurantPizzaDetails>,
}

pub fn serialize_restaurant(restaurant: &models::Restaurant) -> RestaurantSummary {
    RestaurantSummary {
        id: restaurant.id,
        name: restaurant.name.clone(),
        address: restaurant.address.clone(),
    }
}

pub fn serialize_pizza(pizza: &models::Pizza) -> PizzaSummary {
    PizzaSummary {
        id: pizza.id,
        name: pizza.name.clone(),
        ingredients: pizza.ingredients.clone(),
    }
}

pub fn serialize_restaurant_pizza(
    restaurant_pizza: &models::RestaurantPizza,
    pizza: &models::Pizza,
    restaurant: &models::Restaurant,
) -> RestaurantPizzaDetails {
    RestaurantPizzaDetails {
        id: restaurant_pizza.id,
        price: restaurant_pizza.price,
        pizza_id: restaurant_pizza.pizza_id,
        restaurant_id: restaurant_pizza.restaurant_id,
        pizza: serialize_pizza(pizza),
        restaurant: serialize_restaurant(restaurant),
    }
}

pub fn serialize_restaurant_details(
    restaurant: &models::Restaurant,
    restaurant_pizzas: &[(models::RestaurantPizza, models::Pizza)],
) -> RestaurantDetails {
    RestaurantDetails {
        id: restaurant.id,
        name: restaurant.name.clone(),
        address: restaurant.address.clone(),
        restaurant_pizzas: restaurant_pizzas
            .iter()
            .map(|(rp, pizza)| serialize_restaurant_pizza(rp, pizza, restaurant))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn restaurant() -> models::Restaurant {
        models::Restaurant {
            id: 1,
            name: "Karen's Pizza Shack".to_string(),
            address: "address1".to_string(),
        }
    }

    fn pizza() -> models::Pizza {
        models::Pizza {
            id: 2,
            name: "Geri".to_string(),
            ingredients: "Dough, Tomato Sauce, Cheese, Pepperoni".to_string(),
        }
    }

    #[test]
    fn test_restaurant_summary_only_has_allowed_fields() {
        let value = serde_json::to_value(serialize_restaurant(&restaurant())).unwrap();
        assert_eq!(
            value,
            json!({"id": 1, "name": "Karen's Pizza Shack", "address": "address1"})
        );
    }

    #[test]
    fn test_restaurant_details_nests_pizza_and_restaurant() {
        let rp = models::RestaurantPizza {
            id: 7,
            price: 12,
            pizza_id: 2,
            restaurant_id: 1,
        };
        let details = serialize_restaurant_details(&restaurant(), &[(rp, pizza())]);
        let value = serde_json::to_value(&details).unwrap();

        assert_eq!(
            value,
            json!({
                "id": 1,
                "name": "Karen's Pizza Shack",
                "address": "address1",
                "restaurant_pizzas": [{
                    "id": 7,
                    "price": 12,
                    "pizza_id": 2,
                    "restaurant_id": 1,
                    "pizza": {
                        "id": 2,
                        "name": "Geri",
                        "ingredients": "Dough, Tomato Sauce, Cheese, Pepperoni"
                    },
                    "restaurant": {
                        "id": 1,
                        "name": "Karen's Pizza Shack",
                        "address": "address1"
                    }
                }]
            })
        );
    }

    #[test]
    fn test_field_order_is_stable() {
        let text = serde_json::to_string(&serialize_pizza(&pizza())).unwrap();
        assert_eq!(
            text,
            r#"{"id":2,"name":"Geri","ingredients":"Dough, Tomato Sauce, Cheese, Pepperoni"}"#
        );
    }
}
