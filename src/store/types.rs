use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Registered account. Usernames and emails are unique across the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 hash, never exposed in JSON
    pub is_admin: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Catalog entry. Macro values are per reference quantity; names are free
/// text with no uniqueness constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Food {
    pub id: Uuid,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A logged meal. Macro fields are frozen snapshots of `food.macro * quantity`
/// taken when the meal was created; editing the catalog entry afterwards does
/// not change them. `food_id` and `user_id` are plain references with no
/// integrity constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_id: Uuid,
    pub food_name: String,
    pub quantity: f64,
    /// ISO-8601 calendar date, no time component.
    pub date: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
