//! Wire shapes for the catalog endpoints.

use std::collections::BTreeMap;

use nutrition_sources::NutrientRecord;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::enrich::FoodCandidate;

/// Key in `custom_nutrients` that marks a food for manual review.
pub const NEEDS_REVIEW_KEY: &str = "needs_review";

/// Food as submitted to the catalog.
///
/// This is where the review status is rendered: the display name gets the
/// review marker and `custom_nutrients` gets [`NEEDS_REVIEW_KEY`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FoodPayload {
    pub name: String,
    pub brand: String,
    pub barcode: String,
    pub provider_type: &'static str,
    pub provider_external_id: Option<String>,
    pub shared_with_public: bool,
    pub glycemic_index: Option<f64>,
    pub custom_nutrients: BTreeMap<String, Value>,
    pub serving_size: f64,
    pub serving_unit: &'static str,
    pub is_custom: bool,
    #[serde(flatten)]
    pub nutrients: NutrientRecord,
}

impl From<&FoodCandidate> for FoodPayload {
    fn from(c: &FoodCandidate) -> Self {
        let mut custom_nutrients = BTreeMap::new();
        if c.needs_review() {
            custom_nutrients.insert(NEEDS_REVIEW_KEY.to_string(), Value::Bool(true));
        }
        FoodPayload {
            name: c.display_name(),
            brand: c.brand.clone(),
            barcode: c.barcode.clone(),
            provider_type: c.provenance.tag(),
            provider_external_id: None,
            shared_with_public: false,
            glycemic_index: None,
            custom_nutrients,
            serving_size: FoodCandidate::SERVING_SIZE,
            serving_unit: FoodCandidate::SERVING_UNIT,
            is_custom: true,
            nutrients: c.nutrients,
        }
    }
}

/// `POST /api/foods` response.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CreatedFood {
    #[serde(default, deserialize_with = "remote_id")]
    pub id: Option<String>,
    pub default_variant: Option<VariantRef>,
}

/// `POST /api/foods/create-or-get` response.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CreateOrGetResponse {
    #[serde(rename = "foodId", default, deserialize_with = "remote_id")]
    pub food_id: Option<String>,
}

/// A food variant; only the id is needed.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct VariantRef {
    #[serde(default, deserialize_with = "remote_id")]
    pub id: Option<String>,
}

/// Ids are UUID strings, but accept numbers too. Blank strings count as absent.
fn remote_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match Option::<RawId>::deserialize(d)? {
        Some(RawId::Text(s)) if !s.trim().is_empty() => Some(s),
        Some(RawId::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use nutrition_sources::{Nutrient, SourceKind};

    use super::*;
    use crate::enrich::NutritionStatus;

    fn candidate(status: NutritionStatus) -> FoodCandidate {
        FoodCandidate {
            name: "Granola".into(),
            brand: "Acme".into(),
            barcode: "123".into(),
            nutrients: NutrientRecord::from_measurements([(Nutrient::Fat, 9.5)]),
            provenance: SourceKind::OpenFoodFacts,
            status,
        }
    }

    #[test]
    fn payload_flattens_nutrients_and_fixed_serving() {
        let json = serde_json::to_value(FoodPayload::from(&candidate(NutritionStatus::Complete))).unwrap();
        assert_eq!(json["name"], "Granola");
        assert_eq!(json["provider_type"], "openfoodfacts");
        assert_eq!(json["serving_size"], 100.0);
        assert_eq!(json["serving_unit"], "g");
        assert_eq!(json["fat"], 9.5);
        assert_eq!(json["protein"], 0.0);
        assert!(json["provider_external_id"].is_null());
        assert_eq!(json["custom_nutrients"], serde_json::json!({}));
    }

    #[test]
    fn review_status_is_rendered_in_payload_only() {
        let c = candidate(NutritionStatus::NeedsReview);
        let payload = FoodPayload::from(&c);
        assert_eq!(payload.name, "Granola [REVIEW]");
        assert_eq!(payload.custom_nutrients[NEEDS_REVIEW_KEY], Value::Bool(true));
        assert_eq!(c.name, "Granola");
    }

    #[test]
    fn ids_accept_strings_and_numbers() {
        let food: CreatedFood =
            serde_json::from_str(r#"{"id": 17, "default_variant": {"id": "v-1"}}"#).unwrap();
        assert_eq!(food.id.as_deref(), Some("17"));
        assert_eq!(food.default_variant.unwrap().id.as_deref(), Some("v-1"));

        let food: CreatedFood = serde_json::from_str(r#"{"id": "", "name": "x"}"#).unwrap();
        assert_eq!(food.id, None);
        assert_eq!(food.default_variant, None);

        let cog: CreateOrGetResponse = serde_json::from_str(r#"{"foodId": "f-9"}"#).unwrap();
        assert_eq!(cog.food_id.as_deref(), Some("f-9"));
    }
}
