use serde::{Deserialize, Serialize};

use crate::models::nutrients::Nutrient;

/// Which upstream database a [`ProductRecord`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Open Food Facts, the barcode-indexed primary source.
    OpenFoodFacts,
    /// USDA FoodData Central, the secondary source.
    Usda,
}

impl SourceKind {
    /// Provenance tag sent to the tracking service.
    pub fn tag(self) -> &'static str {
        match self {
            SourceKind::OpenFoodFacts => "openfoodfacts",
            SourceKind::Usda => "usda",
        }
    }
}

/// A product as reported by one source, already translated to canonical
/// nutrient keys.
///
/// Only values the source actually reported are listed; absent keys mean
/// "unknown". Turning this into a complete record is the caller's job.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub source: SourceKind,
    pub name: Option<String>,
    pub brand: Option<String>,
    pub barcode: Option<String>,
    /// Authoritative per-100 g values.
    pub measured: Vec<(Nutrient, f64)>,
    /// Per-100 g values the source derived rather than measured
    /// (e.g. computed from an ingredient list). Empty when not provided.
    pub estimated: Vec<(Nutrient, f64)>,
}

impl ProductRecord {
    /// An empty record for `source`; mostly useful for building fixtures.
    pub fn new(source: SourceKind) -> Self {
        Self {
            source,
            name: None,
            brand: None,
            barcode: None,
            measured: Vec::new(),
            estimated: Vec::new(),
        }
    }

    /// Name with surrounding whitespace removed, or `None` when blank.
    pub fn name_str(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }

    /// Brand with surrounding whitespace removed, or `None` when blank.
    pub fn brand_str(&self) -> Option<&str> {
        non_blank(self.brand.as_deref())
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}
