//! Diary logging: one entry per successful scan.

use chrono::NaiveDate;
use nutrition_sources::models::nutrients::round2;
use serde::Serialize;
use tracing::info;

use crate::{
    catalog::FoodIdentity,
    meal::MealType,
    tracker::{DiaryApi, TrackerError},
};

/// Servings logged when no weight is available.
pub const DEFAULT_QUANTITY: f64 = 1.0;

/// Every food is catalogued per 100 g, so a diary quantity is in servings.
pub const ENTRY_UNIT: &str = "serving";

/// The weight, if it amounts to a loggable quantity. Readings that are not
/// finite, not positive, or round to zero servings count as no weight.
pub fn usable_weight(weight_grams: Option<f64>) -> Option<f64> {
    weight_grams.filter(|g| g.is_finite() && *g > 0.0 && round2(g / 100.0) > 0.0)
}

/// Servings for a measured weight: `grams / 100`, rounded to two decimals.
/// Without a usable weight, one serving.
pub fn quantity_for(weight_grams: Option<f64>) -> f64 {
    usable_weight(weight_grams).map_or(DEFAULT_QUANTITY, |g| round2(g / 100.0))
}

/// `POST /api/food-entries` body.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DiaryEntry {
    pub food_id: String,
    pub variant_id: String,
    pub meal_type: MealType,
    pub quantity: f64,
    pub unit: &'static str,
    pub entry_date: NaiveDate,
}

pub struct DiaryLogger {
    api: Box<dyn DiaryApi>,
}

impl DiaryLogger {
    pub fn new(api: Box<dyn DiaryApi>) -> Self {
        Self { api }
    }

    /// Writes the entry. Not retried; a failure is the caller's to report.
    pub async fn log(
        &self,
        food: &FoodIdentity,
        meal: MealType,
        weight_grams: Option<f64>,
        date: NaiveDate,
    ) -> Result<DiaryEntry, TrackerError> {
        let entry = DiaryEntry {
            food_id: food.food_id.clone(),
            variant_id: food.variant_id.clone(),
            meal_type: meal,
            quantity: quantity_for(weight_grams),
            unit: ENTRY_UNIT,
            entry_date: date,
        };
        self.api.create_entry(&entry).await?;
        info!(
            food_id = %entry.food_id,
            meal = %entry.meal_type,
            quantity = entry.quantity,
            date = %entry.entry_date,
            "diary entry logged"
        );
        Ok(entry)
    }
}
