//! Nutrition enrichment: one primary product in, one food candidate out.
//!
//! The order matters and is fixed:
//!
//! 1. Authoritative primary measurements; anything missing is `0.0`.
//! 2. Primary estimates fill keys that are still zero (positive values only).
//! 3. If no core macro is positive, ask the secondary source (barcode, then
//!    "brand name", then name alone; first hit wins) and fill remaining zeros
//!    from it.
//! 4. Still incomplete: the candidate is marked [`NutritionStatus::NeedsReview`]
//!    and the scan carries on.
//!
//! A non-zero value is never replaced, so when two sources disagree the
//! earlier one wins.

use nutrition_sources::{
    NutrientRecord, NutritionLookup, ProductRecord, SourceKind,
    models::nutrients::Nutrient,
    providers::SecondaryQuery,
};
use tracing::{info, warn};

/// Display name used when the source has none.
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

/// Marker appended to the display name of foods that need correction.
pub const REVIEW_MARKER: &str = " [REVIEW]";

/// Whether the secondary source may be consulted at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentMode {
    /// Steps 1-2 only; candidates are never flagged for review.
    PrimaryOnly,
    /// All four steps.
    WithSecondary,
}

/// Data-completeness status carried alongside the candidate's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NutritionStatus {
    Complete,
    /// No source supplied a positive protein, carb or fat value.
    NeedsReview,
}

/// A food ready to be reconciled into the tracking service's catalog.
///
/// Serving size is always 100 g so that logging N grams is quantity N/100.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodCandidate {
    pub name: String,
    pub brand: String,
    pub barcode: String,
    pub nutrients: NutrientRecord,
    pub provenance: SourceKind,
    pub status: NutritionStatus,
}

impl FoodCandidate {
    pub const SERVING_SIZE: f64 = 100.0;
    pub const SERVING_UNIT: &'static str = "g";

    /// Name as shown to the user, with the review marker when flagged.
    pub fn display_name(&self) -> String {
        match self.status {
            NutritionStatus::Complete => self.name.clone(),
            NutritionStatus::NeedsReview => format!("{}{}", self.name, REVIEW_MARKER),
        }
    }

    pub fn needs_review(&self) -> bool {
        self.status == NutritionStatus::NeedsReview
    }
}

/// Runs the enrichment steps against a [`NutritionLookup`].
pub struct EnrichmentEngine<'a> {
    lookup: &'a NutritionLookup,
    mode: EnrichmentMode,
}

impl<'a> EnrichmentEngine<'a> {
    pub fn new(lookup: &'a NutritionLookup, mode: EnrichmentMode) -> Self {
        Self { lookup, mode }
    }

    /// Builds the candidate for `primary`, scanned as `barcode`.
    pub async fn enrich(&self, primary: ProductRecord, barcode: &str) -> FoodCandidate {
        let mut nutrients = NutrientRecord::from_measurements(primary.measured.iter().copied());
        nutrients.fill_missing(primary.estimated.iter().copied());

        let mut status = NutritionStatus::Complete;
        if self.mode == EnrichmentMode::WithSecondary {
            if !nutrients.is_complete() {
                info!(%barcode, "primary data incomplete, trying secondary source");
                self.fill_from_secondary(&mut nutrients, &primary, barcode).await;
            }
            if !nutrients.is_complete() {
                warn!(%barcode, "nutrition incomplete, flagged for review");
                status = NutritionStatus::NeedsReview;
            }
        }

        FoodCandidate {
            name: primary
                .name_str()
                .map(display_case)
                .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string()),
            brand: primary.brand_str().map(display_case).unwrap_or_default(),
            barcode: primary
                .barcode
                .as_deref()
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .unwrap_or(barcode)
                .to_string(),
            nutrients,
            provenance: primary.source,
            status,
        }
    }

    async fn fill_from_secondary(
        &self,
        nutrients: &mut NutrientRecord,
        primary: &ProductRecord,
        barcode: &str,
    ) {
        for query in secondary_queries(primary, barcode) {
            if let Some(found) = self.lookup.lookup_secondary(&query).await {
                let filled = nutrients.fill_missing(found.measured.iter().copied());
                info!(%query, filled, source = found.source.tag(), "enriched from secondary source");
                return;
            }
        }
        warn!(%barcode, "secondary source has no data either");
    }
}

/// Secondary search order: barcode, "brand name" (or name), name.
///
/// Blank queries and repeats of the previous query are dropped, so a product
/// without a brand costs two requests rather than three.
pub fn secondary_queries(primary: &ProductRecord, barcode: &str) -> Vec<SecondaryQuery> {
    let name = primary.name_str();
    let brand = primary.brand_str();

    let mut candidates = vec![SecondaryQuery::Barcode(barcode.trim().to_string())];
    if let Some(name) = name {
        let first = match brand {
            Some(brand) => format!("{brand} {name}"),
            None => name.to_string(),
        };
        candidates.push(SecondaryQuery::Text(first));
        candidates.push(SecondaryQuery::Text(name.to_string()));
    }

    let mut queries: Vec<SecondaryQuery> = Vec::with_capacity(candidates.len());
    for q in candidates {
        if q.as_str().is_empty() {
            continue;
        }
        if queries.last().is_some_and(|prev| prev.as_str() == q.as_str()) {
            continue;
        }
        queries.push(q);
    }
    queries
}

/// Title-cases strings that are entirely upper case; leaves others alone.
pub fn display_case(s: &str) -> String {
    if is_all_upper(s) { title_case(s) } else { s.to_string() }
}

/// At least one cased character and no lower-case ones.
fn is_all_upper(s: &str) -> bool {
    let mut any_cased = false;
    for c in s.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            any_cased = true;
        }
    }
    any_cased
}

/// Upper-cases the first letter of every run of letters, lower-cases the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// One-line macro summary for logs.
pub fn summary(nutrients: &NutrientRecord) -> String {
    format!(
        "{:.0} kcal | P:{:.1}g C:{:.1}g F:{:.1}g",
        nutrients.get(Nutrient::Calories),
        nutrients.get(Nutrient::Protein),
        nutrients.get(Nutrient::Carbs),
        nutrients.get(Nutrient::Fat),
    )
}
