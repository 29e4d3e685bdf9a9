use pizza_restaurant_service::{
    PgStore, Store, StoreError,
    config::Config,
    models::{NewPizza, NewRestaurant, NewRestaurantPizza},
};
use tracing::info;

pub fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let store = PgStore::new(config.database_url);
    store.run_pending_migrations()?;
    seed(&store)?;
    Ok(())
}

pub fn seed(store: &dyn Store) -> Result<(), StoreError> {
    info!("Deleting data...");
    store.clear()?;

    info!("Creating restaurants...");
    let restaurants = [
        ("Karen's Pizza Shack", "address1"),
        ("Sanjay's Pizza", "address2"),
        ("Kiki's Pizza", "address3"),
    ]
    .into_iter()
    .map(|(name, address)| {
        store.insert_restaurant(NewRestaurant {
            name: name.to_string(),
            address: address.to_string(),
        })
    })
    .collect::<Result<Vec<_>, _>>()?;

    info!("Creating pizzas...");
    let pizzas = [
        ("Emma", "Dough, Tomato Sauce, Cheese"),
        ("Geri", "Dough, Tomato Sauce, Cheese, Pepperoni"),
        ("Melanie", "Dough, Sauce, Ricotta, Red peppers, Mustard"),
    ]
    .into_iter()
    .map(|(name, ingredients)| {
        store.insert_pizza(NewPizza {
            name: name.to_string(),
            ingredients: ingredients.to_string(),
        })
    })
    .collect::<Result<Vec<_>, _>>()?;

    info!("Creating restaurant pizzas...");
    for (restaurant, pizza) in restaurants.iter().zip(&pizzas) {
        store.insert_restaurant_pizza(NewRestaurantPizza {
            price: 1,
            pizza_id: pizza.id,
            restaurant_id: restaurant.id,
        })?;
    }

    info!("Seeding done!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pizza_restaurant_service::MemoryStore;

    #[test]
    fn test_seed_replaces_existing_rows() {
        let store = MemoryStore::new();
        seed(&store).unwrap();
        seed(&store).unwrap();

        let restaurants = store.list_restaurants().unwrap();
        assert_eq!(restaurants.len(), 3);
        assert_eq!(store.list_pizzas().unwrap().len(), 3);
        for restaurant in &restaurants {
            let restaurant_pizzas = store.restaurant_pizzas_of(restaurant).unwrap();
            assert_eq!(restaurant_pizzas.len(), 1);
            assert_eq!(restaurant_pizzas[0].0.price, 1);
        }
    }
}
