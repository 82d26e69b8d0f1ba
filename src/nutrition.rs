use serde::Serialize;

use crate::store::types::{Food, Meal};

/// Summed macro totals over a set of meals, or one food scaled by quantity.
/// Plain f64 addition and multiplication, no rounding until display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NutritionTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
}

impl NutritionTotals {
    /// One food's macros multiplied by a quantity. This is the snapshot the
    /// store freezes into a meal at creation time.
    pub fn scaled(food: &Food, quantity: f64) -> Self {
        Self {
            calories: food.calories * quantity,
            protein: food.protein * quantity,
            carbs: food.carbs * quantity,
            fat: food.fat * quantity,
            fiber: food.fiber * quantity,
        }
    }

    pub fn sum(meals: &[Meal]) -> Self {
        let mut totals = Self::default();
        for meal in meals {
            totals.calories += meal.calories;
            totals.protein += meal.protein;
            totals.carbs += meal.carbs;
            totals.fat += meal.fat;
            totals.fiber += meal.fiber;
        }
        totals
    }
}
