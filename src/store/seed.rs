use tracing::info;

use crate::config::AdminConfig;
use crate::store::{DataStore, StoreError};

/// Starter catalog: (name, calories, protein, carbs, fat, fiber) per
/// reference quantity.
const SEED_FOODS: &[(&str, f64, f64, f64, f64, f64)] = &[
    ("Apple", 52.0, 0.3, 14.0, 0.2, 2.4),
    ("Banana", 89.0, 1.1, 23.0, 0.3, 2.6),
    ("Chicken Breast", 165.0, 31.0, 0.0, 3.6, 0.0),
    ("Salmon", 208.0, 22.0, 0.0, 12.0, 0.0),
    ("Brown Rice", 111.0, 2.6, 23.0, 0.9, 1.8),
    ("Broccoli", 34.0, 2.8, 7.0, 0.4, 2.6),
    ("Eggs", 155.0, 13.0, 1.1, 11.0, 0.0),
    ("Greek Yogurt", 59.0, 10.0, 3.6, 0.4, 0.0),
    ("Quinoa", 120.0, 4.4, 22.0, 1.9, 2.8),
    ("Spinach", 23.0, 2.9, 3.6, 0.4, 2.2),
    ("Sweet Potato", 86.0, 1.6, 20.0, 0.1, 3.0),
    ("Almonds", 576.0, 21.0, 22.0, 49.0, 12.0),
    ("Avocado", 160.0, 2.0, 9.0, 15.0, 7.0),
    ("Oatmeal", 68.0, 2.4, 12.0, 1.4, 1.7),
    ("Turkey", 135.0, 25.0, 0.0, 3.2, 0.0),
];

impl DataStore {
    /// Builds a store pre-populated with the starter catalog and one
    /// administrator account taken from configuration.
    pub fn seeded(admin: &AdminConfig) -> Result<Self, StoreError> {
        let store = Self::new();
        for &(name, calories, protein, carbs, fat, fiber) in SEED_FOODS {
            store.add_food(name, calories, protein, carbs, fat, fiber);
        }
        let admin_id = store.create_user(&admin.username, &admin.email, &admin.password)?;
        store.set_admin(admin_id);
        info!(foods = SEED_FOODS.len(), admin = %admin.username, "store seeded");
        Ok(store)
    }
}
