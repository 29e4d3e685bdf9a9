use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::models::{
    NewPizza, NewRestaurant, NewRestaurantPizza, Pizza, Restaurant, RestaurantPizza,
};
use crate::validation::{MAX_PRICE, MIN_PRICE};

use super::{Store, StoreError};

/// An in-memory [`Store`], geared towards testing and local development.
///
/// It enforces the same constraints as the Postgres schema: associations must reference
/// existing rows and carry a price between 1 and 30. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore(Mutex<Tables>);

#[derive(Debug, Default)]
struct Tables {
    restaurants: Vec<Restaurant>,
    pizzas: Vec<Pizza>,
    restaurant_pizzas: Vec<RestaurantPizza>,
    last_restaurant_id: i32,
    last_pizza_id: i32,
    last_restaurant_pizza_id: i32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Store for MemoryStore {
    fn list_restaurants(&self) -> Result<Vec<Restaurant>, StoreError> {
        Ok(self.lock().restaurants.clone())
    }

    fn find_restaurant(&self, id: i32) -> Result<Option<Restaurant>, StoreError> {
        Ok(self.lock().restaurants.iter().find(|r| r.id == id).cloned())
    }

    fn list_pizzas(&self) -> Result<Vec<Pizza>, StoreError> {
        Ok(self.lock().pizzas.clone())
    }

    fn find_pizza(&self, id: i32) -> Result<Option<Pizza>, StoreError> {
        Ok(self.lock().pizzas.iter().find(|p| p.id == id).cloned())
    }

    fn restaurant_pizzas_of(
        &self,
        restaurant: &Restaurant,
    ) -> Result<Vec<(RestaurantPizza, Pizza)>, StoreError> {
        let tables = self.lock();
        Ok(tables
            .restaurant_pizzas
            .iter()
            .filter(|rp| rp.restaurant_id == restaurant.id)
            .filter_map(|rp| {
                tables
                    .pizzas
                    .iter()
                    .find(|p| p.id == rp.pizza_id)
                    .map(|p| (rp.clone(), p.clone()))
            })
            .collect())
    }

    fn insert_restaurant_pizza(
        &self,
        restaurant_pizza: NewRestaurantPizza,
    ) -> Result<RestaurantPizza, StoreError> {
        let mut tables = self.lock();
        if !(MIN_PRICE..=MAX_PRICE).contains(&restaurant_pizza.price) {
            return Err(StoreError::Constraint(format!(
                "price {} out of range",
                restaurant_pizza.price
            )));
        }
        if !tables.pizzas.iter().any(|p| p.id == restaurant_pizza.pizza_id) {
            return Err(StoreError::Constraint(format!(
                "pizza {} does not exist",
                restaurant_pizza.pizza_id
            )));
        }
        if !tables
            .restaurants
            .iter()
            .any(|r| r.id == restaurant_pizza.restaurant_id)
        {
            return Err(StoreError::Constraint(format!(
                "restaurant {} does not exist",
                restaurant_pizza.restaurant_id
            )));
        }

        tables.last_restaurant_pizza_id += 1;
        let created = RestaurantPizza {
            id: tables.last_restaurant_pizza_id,
            price: restaurant_pizza.price,
            pizza_id: restaurant_pizza.pizza_id,
            restaurant_id: restaurant_pizza.restaurant_id,
        };
        tables.restaurant_pizzas.push(created.clone());
        Ok(created)
    }

    fn delete_restaurant(&self, id: i32) -> Result<bool, StoreError> {
        let mut tables = self.lock();
        let Some(index) = tables.restaurants.iter().position(|r| r.id == id) else {
            return Ok(false);
        };
        tables.restaurant_pizzas.retain(|rp| rp.restaurant_id != id);
        tables.restaurants.remove(index);
        Ok(true)
    }

    fn insert_restaurant(&self, restaurant: NewRestaurant) -> Result<Restaurant, StoreError> {
        let mut tables = self.lock();
        tables.last_restaurant_id += 1;
        let created = Restaurant {
            id: tables.last_restaurant_id,
            name: restaurant.name,
            address: restaurant.address,
        };
        tables.restaurants.push(created.clone());
        Ok(created)
    }

    fn insert_pizza(&self, pizza: NewPizza) -> Result<Pizza, StoreError> {
        let mut tables = self.lock();
        tables.last_pizza_id += 1;
        let created = Pizza {
            id: tables.last_pizza_id,
            name: pizza.name,
            ingredients: pizza.ingredients,
        };
        tables.pizzas.push(created.clone());
        Ok(created)
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut tables = self.lock();
        tables.restaurant_pizzas.clear();
        tables.restaurants.clear();
        tables.pizzas.clear();
        Ok(())
    }
}
