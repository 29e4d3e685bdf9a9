use diesel::{PgConnection, prelude::*};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::models::{
    NewPizza, NewRestaurant, NewRestaurantPizza, Pizza, Restaurant, RestaurantPizza,
};
use crate::schema::{pizzas, restaurant_pizzas, restaurants};

pub mod memory;

pub use memory::MemoryStore;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to connect to database: {0}")]
    Connection(#[from] diesel::ConnectionError),
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("Failed to run migrations: {0}")]
    Migration(String),
    #[error("Constraint violated: {0}")]
    Constraint(String),
}

/// Persistence gateway for restaurants, pizzas and the prices restaurants sell them at.
///
/// Mutating operations are atomic: they either commit fully or leave the store untouched.
pub trait Store: Send + Sync {
    fn list_restaurants(&self) -> Result<Vec<Restaurant>, StoreError>;

    fn find_restaurant(&self, id: i32) -> Result<Option<Restaurant>, StoreError>;

    fn list_pizzas(&self) -> Result<Vec<Pizza>, StoreError>;

    fn find_pizza(&self, id: i32) -> Result<Option<Pizza>, StoreError>;

    /// Associations owned by `restaurant`, in insertion order, each with the pizza it sells.
    fn restaurant_pizzas_of(
        &self,
        restaurant: &Restaurant,
    ) -> Result<Vec<(RestaurantPizza, Pizza)>, StoreError>;

    fn insert_restaurant_pizza(
        &self,
        restaurant_pizza: NewRestaurantPizza,
    ) -> Result<RestaurantPizza, StoreError>;

    /// Deletes the restaurant along with its associations.
    ///
    /// Returns `false` when no restaurant has the given id.
    fn delete_restaurant(&self, id: i32) -> Result<bool, StoreError>;

    fn insert_restaurant(&self, restaurant: NewRestaurant) -> Result<Restaurant, StoreError>;

    fn insert_pizza(&self, pizza: NewPizza) -> Result<Pizza, StoreError>;

    /// Removes every row from every table.
    fn clear(&self) -> Result<(), StoreError>;
}

/// [`Store`] backed by Postgres through diesel.
pub struct PgStore {
    database_url: String,
}

impl PgStore {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    fn establish_connection(&self) -> Result<PgConnection, StoreError> {
        Ok(PgConnection::establish(&self.database_url)?)
    }

    pub fn run_pending_migrations(&self) -> Result<(), StoreError> {
        let conn = &mut self.establish_connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| StoreError::Migration(e.to_string()))?;
        info!(count = applied.len(), "Applied pending migrations");
        Ok(())
    }
}

impl Store for PgStore {
    fn list_restaurants(&self) -> Result<Vec<Restaurant>, StoreError> {
        let conn = &mut self.establish_connection()?;
        Ok(restaurants::table
            .select(Restaurant::as_select())
            .order_by(restaurants::id.asc())
            .load(conn)?)
    }

    fn find_restaurant(&self, id: i32) -> Result<Option<Restaurant>, StoreError> {
        let conn = &mut self.establish_connection()?;
        Ok(restaurants::table
            .find(id)
            .select(Restaurant::as_select())
            .first(conn)
            .optional()?)
    }

    fn list_pizzas(&self) -> Result<Vec<Pizza>, StoreError> {
        let conn = &mut self.establish_connection()?;
        Ok(pizzas::table
            .select(Pizza::as_select())
            .order_by(pizzas::id.asc())
            .load(conn)?)
    }

    fn find_pizza(&self, id: i32) -> Result<Option<Pizza>, StoreError> {
        let conn = &mut self.establish_connection()?;
        Ok(pizzas::table
            .find(id)
            .select(Pizza::as_select())
            .first(conn)
            .optional()?)
    }

    fn restaurant_pizzas_of(
        &self,
        restaurant: &Restaurant,
    ) -> Result<Vec<(RestaurantPizza, Pizza)>, StoreError> {
        let conn = &mut self.establish_connection()?;
        Ok(RestaurantPizza::belonging_to(restaurant)
            .inner_join(pizzas::table)
            .select((RestaurantPizza::as_select(), Pizza::as_select()))
            .order_by(restaurant_pizzas::id.asc())
            .load(conn)?)
    }

    fn insert_restaurant_pizza(
        &self,
        restaurant_pizza: NewRestaurantPizza,
    ) -> Result<RestaurantPizza, StoreError> {
        let conn = &mut self.establish_connection()?;
        conn.transaction::<_, StoreError, _>(|conn| {
            Ok(diesel::insert_into(restaurant_pizzas::table)
                .values(&restaurant_pizza)
                .returning(RestaurantPizza::as_returning())
                .get_result(conn)?)
        })
    }

    fn delete_restaurant(&self, id: i32) -> Result<bool, StoreError> {
        let conn = &mut self.establish_connection()?;
        conn.transaction::<_, StoreError, _>(|conn| {
            diesel::delete(restaurant_pizzas::table.filter(restaurant_pizzas::restaurant_id.eq(id)))
                .execute(conn)?;
            let deleted = diesel::delete(restaurants::table.find(id)).execute(conn)?;
            Ok(deleted > 0)
        })
    }

    fn insert_restaurant(&self, restaurant: NewRestaurant) -> Result<Restaurant, StoreError> {
        let conn = &mut self.establish_connection()?;
        Ok(diesel::insert_into(restaurants::table)
            .values(&restaurant)
            .returning(Restaurant::as_returning())
            .get_result(conn)?)
    }

    fn insert_pizza(&self, pizza: NewPizza) -> Result<Pizza, StoreError> {
        let conn = &mut self.establish_connection()?;
        Ok(diesel::insert_into(pizzas::table)
            .values(&pizza)
            .returning(Pizza::as_returning())
            .get_result(conn)?)
    }

    fn clear(&self) -> Result<(), StoreError> {
        let conn = &mut self.establish_connection()?;
        conn.transaction::<_, StoreError, _>(|conn| {
            diesel::delete(restaurant_pizzas::table).execute(conn)?;
            diesel::delete(restaurants::table).execute(conn)?;
            diesel::delete(pizzas::table).execute(conn)?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    // Runs against the database named by DATABASE_URL and wipes it first.
    fn setup_database() -> PgStore {
        let config = Config::from_env().unwrap();
        let store = PgStore::new(config.database_url);
        store.run_pending_migrations().unwrap();
        store.clear().unwrap();
        store
    }

    #[test]
    #[ignore = "requires a Postgres database at DATABASE_URL"]
    fn test_pg_delete_restaurant_cascades() {
        let store = setup_database();

        let restaurant = store
            .insert_restaurant(NewRestaurant {
                name: "Test Restaurant".to_string(),
                address: "Test Address".to_string(),
            })
            .unwrap();
        let pizza = store
            .insert_pizza(NewPizza {
                name: "Emma".to_string(),
                ingredients: "Dough, Tomato Sauce, Cheese".to_string(),
            })
            .unwrap();
        for price in [5, 6] {
            store
                .insert_restaurant_pizza(NewRestaurantPizza {
                    price,
                    pizza_id: pizza.id,
                    restaurant_id: restaurant.id,
                })
                .unwrap();
        }
        assert_eq!(store.restaurant_pizzas_of(&restaurant).unwrap().len(), 2);

        assert!(store.delete_restaurant(restaurant.id).unwrap());
        assert!(!store.delete_restaurant(restaurant.id).unwrap());
        assert!(store.restaurant_pizzas_of(&restaurant).unwrap().is_empty());
        assert_eq!(store.find_pizza(pizza.id).unwrap(), Some(pizza));
    }

    #[test]
    #[ignore = "requires a Postgres database at DATABASE_URL"]
    fn test_pg_insert_rejects_price_out_of_range() {
        let store = setup_database();

        let restaurant = store
            .insert_restaurant(NewRestaurant {
                name: "Test Restaurant".to_string(),
                address: "Test Address".to_string(),
            })
            .unwrap();
        let pizza = store
            .insert_pizza(NewPizza {
                name: "Geri".to_string(),
                ingredients: "Dough, Tomato Sauce, Cheese, Pepperoni".to_string(),
            })
            .unwrap();

        let result = store.insert_restaurant_pizza(NewRestaurantPizza {
            price: 31,
            pizza_id: pizza.id,
            restaurant_id: restaurant.id,
        });
        assert!(matches!(result, Err(StoreError::Database(_))));
        assert!(store.restaurant_pizzas_of(&restaurant).unwrap().is_empty());
    }
}
