use serde::Deserialize;

use crate::models::{
    nutrients::Nutrient,
    product::{ProductRecord, SourceKind},
};

#[derive(Deserialize, Debug)]
pub struct UsdaSearchResponse {
    #[serde(default)]
    pub foods: Vec<UsdaFood>,
}

impl UsdaSearchResponse {
    /// The search ranks results; only the first is used.
    pub fn into_best(self) -> Option<UsdaFood> {
        self.foods.into_iter().next()
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UsdaFood {
    pub description: Option<String>,
    pub brand_owner: Option<String>,
    pub brand_name: Option<String>,
    pub gtin_upc: Option<String>,
    #[serde(default)]
    pub food_nutrients: Vec<UsdaNutrient>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UsdaNutrient {
    pub nutrient_id: Option<u32>,
    pub value: Option<f64>,
}

impl From<UsdaFood> for ProductRecord {
    fn from(food: UsdaFood) -> Self {
        let measured = food
            .food_nutrients
            .iter()
            .filter_map(|entry| {
                let nutrient = Nutrient::from_usda_id(entry.nutrient_id?)?;
                Some((nutrient, entry.value?))
            })
            .collect();

        ProductRecord {
            source: SourceKind::Usda,
            name: food.description,
            brand: food.brand_name.or(food.brand_owner),
            barcode: food.gtin_upc,
            measured,
            estimated: Vec::new(),
        }
    }
}
