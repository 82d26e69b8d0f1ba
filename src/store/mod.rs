mod error;
mod seed;
pub mod types;

pub use error::StoreError;

use std::collections::HashMap;
use std::sync::RwLock;

use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use crate::auth::password;
use crate::nutrition::NutritionTotals;
use types::{Food, Meal, User};

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    foods: HashMap<Uuid, Food>,
    // Meals stay in insertion order: get_user_meals sorts by date descending
    // and breaks ties by when the meal was logged.
    meals: Vec<Meal>,
}

/// In-memory source of truth for users, foods and meals.
///
/// All mutations take the write lock; reads share the read lock. The
/// user-delete cascade runs entirely under one write guard, so a reader never
/// sees a deleted user with meals left behind.
#[derive(Default)]
pub struct DataStore {
    inner: RwLock<Inner>,
}

impl DataStore {
    /// An empty store. Use [`DataStore::seeded`] for the bootstrapped one.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    // --- users ---

    /// Registers a user. Fails with `DuplicateCredential` when any existing
    /// user has the same username or the same email (exact, case-sensitive
    /// comparison). Only the Argon2 hash of the password is stored.
    pub fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Uuid, StoreError> {
        let mut inner = self.write();
        if inner
            .users
            .values()
            .any(|u| u.username == username || u.email == email)
        {
            return Err(StoreError::DuplicateCredential);
        }
        let password_hash =
            password::hash_password(password).map_err(|e| StoreError::Credential(e.to_string()))?;
        let id = Uuid::new_v4();
        inner.users.insert(
            id,
            User {
                id,
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
                is_admin: false,
                created_at: OffsetDateTime::now_utc(),
            },
        );
        debug!(user_id = %id, username, "user created");
        Ok(id)
    }

    pub fn get_user(&self, id: Uuid) -> Option<User> {
        self.read().users.get(&id).cloned()
    }

    pub fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.read()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned()
    }

    pub fn list_users(&self) -> Vec<User> {
        self.read().users.values().cloned().collect()
    }

    pub fn verify_password(&self, user: &User, candidate: &str) -> anyhow::Result<bool> {
        password::verify_password(candidate, &user.password_hash)
    }

    /// Removes a user and every meal they own, as one atomic mutation.
    /// Returns false if the user did not exist. Whether an administrator may
    /// be deleted is the caller's policy, not the store's.
    pub fn delete_user(&self, id: Uuid) -> bool {
        let mut inner = self.write();
        if inner.users.remove(&id).is_none() {
            return false;
        }
        inner.meals.retain(|m| m.user_id != id);
        debug!(user_id = %id, "user deleted with meal cascade");
        true
    }

    pub(crate) fn set_admin(&self, id: Uuid) {
        if let Some(user) = self.write().users.get_mut(&id) {
            user.is_admin = true;
        }
    }

    // --- foods ---

    /// Adds a catalog entry. Names are not deduplicated.
    pub fn add_food(
        &self,
        name: &str,
        calories: f64,
        protein: f64,
        carbs: f64,
        fat: f64,
        fiber: f64,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.write().foods.insert(
            id,
            Food {
                id,
                name: name.to_string(),
                calories,
                protein,
                carbs,
                fat,
                fiber,
                created_at: OffsetDateTime::now_utc(),
            },
        );
        id
    }

    pub fn get_food(&self, id: Uuid) -> Option<Food> {
        self.read().foods.get(&id).cloned()
    }

    pub fn list_foods(&self) -> Vec<Food> {
        self.read().foods.values().cloned().collect()
    }

    /// Case-insensitive substring match on the name. An empty query matches
    /// every food.
    pub fn search_foods(&self, query: &str) -> Vec<Food> {
        let query = query.to_lowercase();
        self.read()
            .foods
            .values()
            .filter(|f| f.name.to_lowercase().contains(&query))
            .cloned()
            .collect()
    }

    /// Replaces every field except the id and creation timestamp. Returns
    /// false (and changes nothing) when the food does not exist.
    pub fn update_food(
        &self,
        id: Uuid,
        name: &str,
        calories: f64,
        protein: f64,
        carbs: f64,
        fat: f64,
        fiber: f64,
    ) -> bool {
        let mut inner = self.write();
        match inner.foods.get_mut(&id) {
            Some(food) => {
                food.name = name.to_string();
                food.calories = calories;
                food.protein = protein;
                food.carbs = carbs;
                food.fat = fat;
                food.fiber = fiber;
                true
            }
            None => false,
        }
    }

    /// Removes a food. Meals that referenced it keep their snapshotted
    /// macros and denormalized name.
    pub fn delete_food(&self, id: Uuid) -> bool {
        self.write().foods.remove(&id).is_some()
    }

    // --- meals ---

    /// Logs a meal for a user. The store resolves the food and freezes
    /// `food.macro * quantity` into the meal at this moment; later catalog
    /// edits do not touch it. Returns `None` when the food does not exist.
    /// `user_id` is trusted as-is; there is no referential check.
    pub fn add_meal(&self, user_id: Uuid, food_id: Uuid, quantity: f64, date: &str) -> Option<Uuid> {
        let mut inner = self.write();
        let food = inner.foods.get(&food_id)?;
        let totals = NutritionTotals::scaled(food, quantity);
        let id = Uuid::new_v4();
        let meal = Meal {
            id,
            user_id,
            food_id,
            food_name: food.name.clone(),
            quantity,
            date: date.to_string(),
            calories: totals.calories,
            protein: totals.protein,
            carbs: totals.carbs,
            fat: totals.fat,
            fiber: totals.fiber,
            created_at: OffsetDateTime::now_utc(),
        };
        inner.meals.push(meal);
        debug!(meal_id = %id, %user_id, %food_id, quantity, date, "meal logged");
        Some(id)
    }

    /// All meals owned by a user, newest date first. Meals sharing a date
    /// stay in the order they were logged.
    pub fn get_user_meals(&self, user_id: Uuid) -> Vec<Meal> {
        let mut meals: Vec<Meal> = self
            .read()
            .meals
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();
        meals.sort_by(|a, b| b.date.cmp(&a.date));
        meals
    }

    pub fn get_user_meals_by_date(&self, user_id: Uuid, date: &str) -> Vec<Meal> {
        self.read()
            .meals
            .iter()
            .filter(|m| m.user_id == user_id && m.date == date)
            .cloned()
            .collect()
    }

    /// Deletes a meal only when it exists and `owner_id` matches the meal's
    /// owner. Unlike user and food deletion, this authorization check lives
    /// in the store itself.
    pub fn delete_meal(&self, id: Uuid, owner_id: Uuid) -> bool {
        let mut inner = self.write();
        match inner
            .meals
            .iter()
            .position(|m| m.id == id && m.user_id == owner_id)
        {
            Some(idx) => {
                inner.meals.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Administrative overview of every logged meal.
    pub fn list_meals(&self) -> Vec<Meal> {
        self.read().meals.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_user() -> (DataStore, Uuid) {
        let store = DataStore::new();
        let id = store
            .create_user("alice", "a@x.com", "secret1")
            .expect("create should succeed");
        (store, id)
    }

    #[test]
    fn create_user_rejects_duplicate_username_and_email() {
        let (store, _) = store_with_user();
        assert!(matches!(
            store.create_user("alice", "b@y.com", "secret2"),
            Err(StoreError::DuplicateCredential)
        ));
        assert!(matches!(
            store.create_user("bob", "a@x.com", "secret2"),
            Err(StoreError::DuplicateCredential)
        ));
        assert!(store.create_user("bob", "b@y.com", "secret2").is_ok());
    }

    #[test]
    fn duplicate_check_is_case_sensitive() {
        let (store, _) = store_with_user();
        // "Alice" is a different username than "alice" in this store.
        assert!(store.create_user("Alice", "c@z.com", "secret3").is_ok());
    }

    #[test]
    fn password_is_stored_hashed_and_verifiable() {
        let (store, id) = store_with_user();
        let user = store.get_user(id).expect("user should exist");
        assert_ne!(user.password_hash, "secret1");
        assert!(store.verify_password(&user, "secret1").unwrap());
        assert!(!store.verify_password(&user, "wrong").unwrap());
    }

    #[test]
    fn new_users_are_not_admins() {
        let (store, id) = store_with_user();
        assert!(!store.get_user(id).unwrap().is_admin);
    }

    #[test]
    fn get_user_by_username_is_exact() {
        let (store, id) = store_with_user();
        assert_eq!(store.get_user_by_username("alice").unwrap().id, id);
        assert!(store.get_user_by_username("alic").is_none());
    }

    #[test]
    fn delete_user_cascades_to_meals() {
        let (store, user_id) = store_with_user();
        let other = store.create_user("bob", "b@y.com", "pw").unwrap();
        let food = store.add_food("Apple", 52.0, 0.3, 14.0, 0.2, 2.4);
        store.add_meal(user_id, food, 1.0, "2024-01-01").unwrap();
        store.add_meal(user_id, food, 2.0, "2024-01-02").unwrap();
        store.add_meal(other, food, 1.0, "2024-01-01").unwrap();

        assert!(store.delete_user(user_id));
        assert!(store.get_user(user_id).is_none());
        assert!(store.get_user_meals(user_id).is_empty());
        // Other users' meals survive.
        assert_eq!(store.get_user_meals(other).len(), 1);
        // Second delete reports absence.
        assert!(!store.delete_user(user_id));
    }

    #[test]
    fn food_roundtrip_and_update() {
        let store = DataStore::new();
        let id = store.add_food("Apple", 52.0, 0.3, 14.0, 0.2, 2.4);
        let food = store.get_food(id).expect("food should exist");
        assert_eq!(food.name, "Apple");
        assert_eq!(food.calories, 52.0);
        assert_eq!(food.fiber, 2.4);

        assert!(store.update_food(id, "Green Apple", 50.0, 0.4, 13.0, 0.1, 2.5));
        let food = store.get_food(id).unwrap();
        assert_eq!(food.name, "Green Apple");
        assert_eq!(food.calories, 50.0);
        assert_eq!(food.id, id);

        assert!(!store.update_food(Uuid::new_v4(), "x", 0.0, 0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn search_is_case_insensitive_and_empty_matches_all() {
        let store = DataStore::new();
        store.add_food("Apple", 52.0, 0.3, 14.0, 0.2, 2.4);
        store.add_food("Pineapple", 50.0, 0.5, 13.0, 0.1, 1.4);
        store.add_food("Banana", 89.0, 1.1, 23.0, 0.3, 2.6);

        assert_eq!(store.search_foods("APPLE").len(), 2);
        assert_eq!(store.search_foods("ban").len(), 1);
        assert_eq!(store.search_foods("").len(), 3);
        assert!(store.search_foods("zzz").is_empty());
    }

    #[test]
    fn add_meal_freezes_macro_snapshot() {
        let (store, user_id) = store_with_user();
        let food_id = store.add_food("Apple", 52.0, 0.3, 14.0, 0.2, 2.4);
        let meal_id = store
            .add_meal(user_id, food_id, 2.0, "2024-01-01")
            .expect("food exists");

        // Editing the food afterwards must not touch the meal.
        assert!(store.update_food(food_id, "Apple", 1000.0, 0.0, 0.0, 0.0, 0.0));
        let meals = store.get_user_meals_by_date(user_id, "2024-01-01");
        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].id, meal_id);
        assert_eq!(meals[0].calories, 104.0);
        assert_eq!(meals[0].protein, 0.6);
        assert_eq!(meals[0].food_name, "Apple");

        // Deleting the food leaves the snapshot intact too.
        assert!(store.delete_food(food_id));
        assert_eq!(
            store.get_user_meals_by_date(user_id, "2024-01-01")[0].calories,
            104.0
        );
    }

    #[test]
    fn add_meal_requires_existing_food() {
        let (store, user_id) = store_with_user();
        assert!(store
            .add_meal(user_id, Uuid::new_v4(), 1.0, "2024-01-01")
            .is_none());
    }

    #[test]
    fn user_meals_sorted_by_date_descending_stable() {
        let (store, user_id) = store_with_user();
        let food = store.add_food("Rice", 111.0, 2.6, 23.0, 0.9, 1.8);
        let first = store.add_meal(user_id, food, 1.0, "2024-01-02").unwrap();
        let second = store.add_meal(user_id, food, 1.0, "2024-01-03").unwrap();
        let third = store.add_meal(user_id, food, 2.0, "2024-01-02").unwrap();

        let meals = store.get_user_meals(user_id);
        let ids: Vec<Uuid> = meals.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![second, first, third]);
    }

    #[test]
    fn delete_meal_enforces_ownership() {
        let (store, owner) = store_with_user();
        let intruder = store.create_user("bob", "b@y.com", "pw").unwrap();
        let food = store.add_food("Eggs", 155.0, 13.0, 1.1, 11.0, 0.0);
        let meal_id = store.add_meal(owner, food, 1.0, "2024-01-01").unwrap();

        assert!(!store.delete_meal(meal_id, intruder));
        assert_eq!(store.get_user_meals(owner).len(), 1);
        assert!(store.delete_meal(meal_id, owner));
        assert!(store.get_user_meals(owner).is_empty());
        assert!(!store.delete_meal(meal_id, owner));
    }

    #[test]
    fn daily_totals_sum_meal_snapshots() {
        let (store, user_id) = store_with_user();
        let apple = store.add_food("Apple", 52.0, 0.3, 14.0, 0.2, 2.4);
        store.add_meal(user_id, apple, 2.0, "2024-01-01").unwrap();
        store.add_meal(user_id, apple, 1.0, "2024-01-01").unwrap();
        store.add_meal(user_id, apple, 5.0, "2024-01-02").unwrap();

        let today = store.get_user_meals_by_date(user_id, "2024-01-01");
        let totals = NutritionTotals::sum(&today);
        assert_eq!(totals.calories, 156.0);
        assert_eq!(totals.carbs, 42.0);
    }
}
