//! Canonical nutrient keys and the per-100 g nutrient record.
//!
//! Every upstream source names its nutrients differently: Open Food Facts uses
//! field names like `proteins_100g`, USDA FoodData Central uses numeric ids like
//! `1003`. Both are translated into [`Nutrient`] through immutable lookup tables
//! that are built once per process ([`Nutrient::from_off_field`],
//! [`Nutrient::from_usda_id`]).
//!
//! A [`NutrientRecord`] always carries a value for every key. Unknown values are
//! `0.0`, never absent, so completeness is a plain check on the three core
//! macros.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Serialize, Serializer, ser::SerializeMap};

/// The fixed set of nutrients tracked per food, all expressed per 100 g.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nutrient {
    Calories,
    Protein,
    Carbs,
    Fat,
    SaturatedFat,
    PolyunsaturatedFat,
    MonounsaturatedFat,
    TransFat,
    Cholesterol,
    Sodium,
    Potassium,
    DietaryFiber,
    Sugars,
    VitaminA,
    VitaminC,
    Calcium,
    Iron,
}

impl Nutrient {
    /// Number of recognized nutrient keys.
    pub const COUNT: usize = 17;

    /// All keys, in the order they are serialized.
    pub const ALL: [Nutrient; Nutrient::COUNT] = [
        Nutrient::Calories,
        Nutrient::Protein,
        Nutrient::Carbs,
        Nutrient::Fat,
        Nutrient::SaturatedFat,
        Nutrient::PolyunsaturatedFat,
        Nutrient::MonounsaturatedFat,
        Nutrient::TransFat,
        Nutrient::Cholesterol,
        Nutrient::Sodium,
        Nutrient::Potassium,
        Nutrient::DietaryFiber,
        Nutrient::Sugars,
        Nutrient::VitaminA,
        Nutrient::VitaminC,
        Nutrient::Calcium,
        Nutrient::Iron,
    ];

    /// The core macros; a record with none of them positive is incomplete.
    pub const CORE_MACROS: [Nutrient; 3] = [Nutrient::Protein, Nutrient::Carbs, Nutrient::Fat];

    /// Field name used by the tracking service.
    pub fn key(self) -> &'static str {
        match self {
            Nutrient::Calories => "calories",
            Nutrient::Protein => "protein",
            Nutrient::Carbs => "carbs",
            Nutrient::Fat => "fat",
            Nutrient::SaturatedFat => "saturated_fat",
            Nutrient::PolyunsaturatedFat => "polyunsaturated_fat",
            Nutrient::MonounsaturatedFat => "monounsaturated_fat",
            Nutrient::TransFat => "trans_fat",
            Nutrient::Cholesterol => "cholesterol",
            Nutrient::Sodium => "sodium",
            Nutrient::Potassium => "potassium",
            Nutrient::DietaryFiber => "dietary_fiber",
            Nutrient::Sugars => "sugars",
            Nutrient::VitaminA => "vitamin_a",
            Nutrient::VitaminC => "vitamin_c",
            Nutrient::Calcium => "calcium",
            Nutrient::Iron => "iron",
        }
    }

    /// Open Food Facts per-100 g field name.
    pub fn off_field(self) -> &'static str {
        match self {
            Nutrient::Calories => "energy-kcal_100g",
            Nutrient::Protein => "proteins_100g",
            Nutrient::Carbs => "carbohydrates_100g",
            Nutrient::Fat => "fat_100g",
            Nutrient::SaturatedFat => "saturated-fat_100g",
            Nutrient::PolyunsaturatedFat => "polyunsaturated-fat_100g",
            Nutrient::MonounsaturatedFat => "monounsaturated-fat_100g",
            Nutrient::TransFat => "trans-fat_100g",
            Nutrient::Cholesterol => "cholesterol_100g",
            Nutrient::Sodium => "sodium_100g",
            Nutrient::Potassium => "potassium_100g",
            Nutrient::DietaryFiber => "fiber_100g",
            Nutrient::Sugars => "sugars_100g",
            Nutrient::VitaminA => "vitamin-a_100g",
            Nutrient::VitaminC => "vitamin-c_100g",
            Nutrient::Calcium => "calcium_100g",
            Nutrient::Iron => "iron_100g",
        }
    }

    /// USDA FoodData Central nutrient id.
    pub fn usda_id(self) -> u32 {
        match self {
            Nutrient::Calories => 1008,
            Nutrient::Protein => 1003,
            Nutrient::Carbs => 1005,
            Nutrient::Fat => 1004,
            Nutrient::SaturatedFat => 1258,
            Nutrient::PolyunsaturatedFat => 1293,
            Nutrient::MonounsaturatedFat => 1292,
            Nutrient::TransFat => 1257,
            Nutrient::Cholesterol => 1253,
            Nutrient::Sodium => 1093,
            Nutrient::Potassium => 1092,
            Nutrient::DietaryFiber => 1079,
            Nutrient::Sugars => 2000,
            Nutrient::VitaminA => 1106,
            Nutrient::VitaminC => 1162,
            Nutrient::Calcium => 1087,
            Nutrient::Iron => 1089,
        }
    }

    /// Reverse lookup of [`Nutrient::off_field`].
    pub fn from_off_field(field: &str) -> Option<Nutrient> {
        OFF_FIELDS.get(field).copied()
    }

    /// Reverse lookup of [`Nutrient::usda_id`].
    pub fn from_usda_id(id: u32) -> Option<Nutrient> {
        USDA_IDS.get(&id).copied()
    }

    fn index(self) -> usize {
        self as usize
    }
}

static OFF_FIELDS: Lazy<HashMap<&'static str, Nutrient>> =
    Lazy::new(|| Nutrient::ALL.iter().map(|n| (n.off_field(), *n)).collect());

static USDA_IDS: Lazy<HashMap<u32, Nutrient>> =
    Lazy::new(|| Nutrient::ALL.iter().map(|n| (n.usda_id(), *n)).collect());

/// Rounds to two decimal places, the precision the tracking service stores.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Per-100 g nutrient values with every [`Nutrient`] present.
///
/// Values are non-negative and rounded to two decimals on write. Negative or
/// non-finite inputs are stored as `0.0` (unknown).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NutrientRecord {
    values: [f64; Nutrient::COUNT],
}

impl NutrientRecord {
    /// An all-zero record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from authoritative measurements; keys not listed stay `0.0`.
    pub fn from_measurements<I>(measurements: I) -> Self
    where
        I: IntoIterator<Item = (Nutrient, f64)>,
    {
        let mut record = Self::new();
        for (nutrient, value) in measurements {
            record.set(nutrient, value);
        }
        record
    }

    pub fn get(&self, nutrient: Nutrient) -> f64 {
        self.values[nutrient.index()]
    }

    pub fn set(&mut self, nutrient: Nutrient, value: f64) {
        let clean = if value.is_finite() && value > 0.0 {
            round2(value)
        } else {
            0.0
        };
        self.values[nutrient.index()] = clean;
    }

    /// True when at least one of protein, carbs or fat is strictly positive.
    pub fn is_complete(&self) -> bool {
        Nutrient::CORE_MACROS.iter().any(|n| self.get(*n) > 0.0)
    }

    /// Fills keys that are still `0.0` from `source`, accepting only strictly
    /// positive values. Non-zero keys are never overwritten, so the first source
    /// to supply a positive value wins.
    ///
    /// Returns the number of keys that were filled.
    pub fn fill_missing<I>(&mut self, source: I) -> usize
    where
        I: IntoIterator<Item = (Nutrient, f64)>,
    {
        let mut filled = 0;
        for (nutrient, value) in source {
            if self.get(nutrient) == 0.0 && value.is_finite() && value > 0.0 {
                self.set(nutrient, value);
                // A tiny positive value can round down to zero.
                if self.get(nutrient) > 0.0 {
                    filled += 1;
                }
            }
        }
        filled
    }

    /// Iterates over `(nutrient, value)` in [`Nutrient::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Nutrient, f64)> + '_ {
        Nutrient::ALL.iter().map(move |n| (*n, self.get(*n)))
    }
}

impl Serialize for NutrientRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Nutrient::COUNT))?;
        for (nutrient, value) in self.iter() {
            map.serialize_entry(nutrient.key(), &value)?;
        }
        map.end()
    }
}
