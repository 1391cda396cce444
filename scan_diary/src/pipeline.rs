//! The per-scan pipeline and the scanner loop that drives it.
//!
//! One scan runs to completion before the next barcode is read:
//!
//! ```text
//! barcode ─▶ meal slot ─▶ primary lookup ─▶ enrichment ─▶ catalog ─▶ scale ─▶ diary
//! ```
//!
//! A failure at any step ends that scan with a [`ScanError`]; the loop logs it
//! and goes back to waiting for the next barcode.

use chrono::NaiveDateTime;
use nutrition_sources::{
    Nutrient, NutritionLookup,
    http::{HttpTimeouts, ServiceConnection},
    providers::{
        ProviderInitError, SecondarySource,
        budget::RequestBudget,
        openfoodfacts::OpenFoodFactsProvider,
        usda::UsdaProvider,
    },
};
use tracing::{error, info};

use crate::{
    catalog::{CatalogReconciler, FoodIdentity},
    clock::Clock,
    config::AppConfig,
    diary::{DiaryEntry, DiaryLogger, usable_weight},
    enrich::{EnrichmentEngine, EnrichmentMode, FoodCandidate, summary},
    errors::{InputError, ScanError},
    input::BarcodeSource,
    meal::{MealSchedule, MealType},
    scale::{HttpScale, WeightSource},
    tracker::SparkyClient,
};

/// One completed barcode and the local time it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEvent {
    pub barcode: String,
    pub captured_at: NaiveDateTime,
}

impl ScanEvent {
    pub fn new(barcode: impl Into<String>, captured_at: NaiveDateTime) -> Self {
        Self {
            barcode: barcode.into(),
            captured_at,
        }
    }

    /// Stamps `barcode` with the current time on `clock`.
    pub fn now(barcode: impl Into<String>, clock: &dyn Clock) -> Self {
        Self::new(barcode, clock.now())
    }
}

/// Everything a successful scan produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOutcome {
    pub candidate: FoodCandidate,
    pub food: FoodIdentity,
    pub entry: DiaryEntry,
    pub weight_grams: Option<f64>,
}

impl ScanOutcome {
    /// Energy logged: calories per 100 g times the servings logged.
    pub fn kcal(&self) -> f64 {
        self.candidate.nutrients.get(Nutrient::Calories) * self.entry.quantity
    }
}

pub struct ScanPipeline {
    lookup: NutritionLookup,
    enrichment: EnrichmentMode,
    catalog: CatalogReconciler,
    diary: DiaryLogger,
    scale: Option<Box<dyn WeightSource>>,
    meals: MealSchedule,
}

impl ScanPipeline {
    pub fn new(
        lookup: NutritionLookup,
        catalog: CatalogReconciler,
        diary: DiaryLogger,
        meals: MealSchedule,
    ) -> Self {
        Self {
            lookup,
            enrichment: EnrichmentMode::WithSecondary,
            catalog,
            diary,
            scale: None,
            meals,
        }
    }

    pub fn with_enrichment(mut self, mode: EnrichmentMode) -> Self {
        self.enrichment = mode;
        self
    }

    pub fn with_scale(mut self, scale: Box<dyn WeightSource>) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Wires the HTTP-backed sources and tracker client described by `config`.
    ///
    /// All tracking-service traffic, including the proxied nutrition sources,
    /// shares one connection pool.
    pub fn from_config(config: &AppConfig) -> Result<Self, ProviderInitError> {
        let conn = ServiceConnection::new(&config.tracker_url, &config.api_key, HttpTimeouts::SERVICE)?;

        let secondary: Option<Box<dyn SecondarySource>> =
            match (&config.usda_provider_id, config.enrichment) {
                (Some(id), EnrichmentMode::WithSecondary) => Some(Box::new(UsdaProvider::new(
                    conn.clone(),
                    id,
                    RequestBudget::per_minute(config.secondary_requests_per_minute),
                )?)),
                _ => None,
            };
        let lookup = NutritionLookup::new(
            Box::new(OpenFoodFactsProvider::new(conn.clone())),
            secondary,
        );
        if !lookup.has_secondary() && config.enrichment == EnrichmentMode::WithSecondary {
            info!("no USDA provider configured, secondary enrichment disabled");
        }
        let tracker_url = conn.base_url().to_string();

        let tracker = SparkyClient::from_connection(conn);
        let mut pipeline = Self::new(
            lookup,
            CatalogReconciler::new(Box::new(tracker.clone()), config.catalog_mode),
            DiaryLogger::new(Box::new(tracker)),
            config.meals.clone(),
        )
        .with_enrichment(config.enrichment);

        if let Some(url) = &config.scale_url {
            pipeline = pipeline.with_scale(Box::new(HttpScale::new(url)?));
        }
        info!(
            tracker = %tracker_url,
            catalog_mode = ?pipeline.catalog.mode(),
            secondary = pipeline.lookup.has_secondary(),
            scale = pipeline.scale.is_some(),
            "pipeline ready"
        );
        Ok(pipeline)
    }

    /// Meal for `event`: the override if given, else the slot for its time.
    pub fn meal_for(&self, event: &ScanEvent, meal_override: Option<MealType>) -> MealType {
        meal_override.unwrap_or_else(|| self.meals.resolve(event.captured_at.time()))
    }

    /// Runs one scan end to end.
    ///
    /// Nothing is written to the catalog unless the primary source knows the
    /// barcode. Incomplete nutrition does not stop the scan; the food is
    /// logged flagged for review.
    pub async fn process(
        &self,
        event: &ScanEvent,
        meal_override: Option<MealType>,
    ) -> Result<ScanOutcome, ScanError> {
        let barcode = event.barcode.as_str();
        let meal = self.meal_for(event, meal_override);
        info!(%barcode, %meal, "scanned");

        let product = self
            .lookup
            .lookup_primary(barcode)
            .await
            .ok_or_else(|| ScanError::NotFound {
                barcode: barcode.to_string(),
            })?;
        info!(
            name = product.name_str().unwrap_or("?"),
            brand = product.brand_str().unwrap_or(""),
            "found"
        );

        let candidate = EnrichmentEngine::new(&self.lookup, self.enrichment)
            .enrich(product, barcode)
            .await;
        info!(per_100g = %summary(&candidate.nutrients), review = candidate.needs_review(), "nutrition");

        let food = self.catalog.reconcile(&candidate).await?;

        let weight_grams = usable_weight(match &self.scale {
            Some(scale) => scale.read_grams().await,
            None => None,
        });

        let entry = self
            .diary
            .log(&food, meal, weight_grams, event.captured_at.date())
            .await?;

        let outcome = ScanOutcome {
            candidate,
            food,
            entry,
            weight_grams,
        };
        match outcome.weight_grams {
            Some(g) => info!("logged {g:.0} g ({:.0} kcal) as {meal}", outcome.kcal()),
            None => info!("logged 1 serving ({:.0} kcal) as {meal}", outcome.kcal()),
        }
        Ok(outcome)
    }
}

/// Counts from one scanner session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub logged: usize,
    pub failed: usize,
}

/// Processes barcodes from `source` until it runs dry.
///
/// Scan failures are logged and counted; only an input failure ends the loop
/// early.
pub async fn run_scanner(
    pipeline: &ScanPipeline,
    source: &mut dyn BarcodeSource,
    clock: &dyn Clock,
    meal_override: Option<MealType>,
) -> Result<SessionStats, InputError> {
    let mut stats = SessionStats::default();
    while let Some(code) = source.next_barcode().await? {
        let event = ScanEvent::now(code, clock);
        match pipeline.process(&event, meal_override).await {
            Ok(_) => stats.logged += 1,
            Err(e) => {
                error!(barcode = %event.barcode, error = %e, "scan failed");
                stats.failed += 1;
            }
        }
    }
    info!(logged = stats.logged, failed = stats.failed, "input closed");
    Ok(stats)
}
