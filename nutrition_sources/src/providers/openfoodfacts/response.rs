use serde::Deserialize;
use serde_json::{Map, Value};

use crate::models::{
    nutrients::Nutrient,
    product::{ProductRecord, SourceKind},
};

/// `status` value meaning "product found".
pub const STATUS_FOUND: i64 = 1;

#[derive(Deserialize, Debug)]
pub struct OffResponse {
    #[serde(default)]
    pub status: i64,
    pub product: Option<OffProduct>,
}

impl OffResponse {
    /// The product, if the response says it was found.
    pub fn into_found(self) -> Option<OffProduct> {
        if self.status == STATUS_FOUND {
            self.product
        } else {
            None
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct OffProduct {
    pub product_name: Option<String>,
    pub brands: Option<String>,
    pub code: Option<String>,
    #[serde(default)]
    pub nutriments: Map<String, Value>,
    #[serde(default)]
    pub nutriments_estimated: Map<String, Value>,
}

impl From<OffProduct> for ProductRecord {
    fn from(p: OffProduct) -> Self {
        ProductRecord {
            source: SourceKind::OpenFoodFacts,
            name: p.product_name,
            brand: p.brands,
            barcode: p.code,
            measured: recognized(&p.nutriments),
            estimated: recognized(&p.nutriments_estimated),
        }
    }
}

/// Picks out the per-100 g fields we know, skipping anything non-numeric.
fn recognized(block: &Map<String, Value>) -> Vec<(Nutrient, f64)> {
    Nutrient::ALL
        .iter()
        .filter_map(|n| {
            block
                .get(n.off_field())
                .and_then(numeric)
                .map(|v| (*n, v))
        })
        .collect()
}

/// OFF sometimes sends numbers as strings ("12.5").
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
