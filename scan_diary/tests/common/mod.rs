#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use nutrition_sources::{
    Nutrient, NutritionLookup, ProductRecord, SourceKind,
    providers::{
        PrimarySource, ProviderError, SecondaryQuery, SecondarySource, errors::ApiSnafu,
    },
};
use reqwest::StatusCode;
use scan_diary::{
    catalog::{CatalogMode, CatalogReconciler},
    diary::{DiaryEntry, DiaryLogger},
    meal::MealSchedule,
    pipeline::ScanPipeline,
    scale::WeightSource,
    tracker::{
        CatalogApi, CreateOrGetResponse, CreatedFood, DiaryApi, FoodPayload, TrackerError,
        VariantRef, errors::StatusSnafu,
    },
};

pub fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
}

pub fn at(h: u32, m: u32) -> NaiveDateTime {
    day().and_hms_opt(h, m, 0).unwrap()
}

pub fn product(barcode: &str, name: &str, brand: &str, measured: &[(Nutrient, f64)]) -> ProductRecord {
    let mut p = ProductRecord::new(SourceKind::OpenFoodFacts);
    p.barcode = Some(barcode.to_string());
    p.name = Some(name.to_string());
    p.brand = Some(brand.to_string());
    p.measured = measured.to_vec();
    p
}

pub fn usda_food(measured: &[(Nutrient, f64)]) -> ProductRecord {
    let mut p = ProductRecord::new(SourceKind::Usda);
    p.name = Some("USDA match".to_string());
    p.measured = measured.to_vec();
    p
}

/// Primary source backed by a fixed barcode table.
#[derive(Clone, Default)]
pub struct StubPrimary {
    products: Arc<HashMap<String, ProductRecord>>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl StubPrimary {
    pub fn with(products: Vec<ProductRecord>) -> Self {
        let table = products
            .into_iter()
            .filter_map(|p| p.barcode.clone().map(|b| (b, p)))
            .collect();
        Self {
            products: Arc::new(table),
            calls: Arc::default(),
        }
    }
}

#[async_trait]
impl PrimarySource for StubPrimary {
    fn name(&self) -> &'static str {
        "stub-primary"
    }

    async fn lookup_barcode(&self, barcode: &str) -> Result<Option<ProductRecord>, ProviderError> {
        self.calls.lock().unwrap().push(barcode.to_string());
        Ok(self.products.get(barcode).cloned())
    }
}

/// Secondary source answering exact query strings; records every query.
#[derive(Clone, Default)]
pub struct StubSecondary {
    answers: Arc<HashMap<String, ProductRecord>>,
    failures: Arc<HashMap<String, StatusCode>>,
    pub queries: Arc<Mutex<Vec<SecondaryQuery>>>,
}

impl StubSecondary {
    pub fn with(answers: Vec<(&str, ProductRecord)>) -> Self {
        Self {
            answers: Arc::new(answers.into_iter().map(|(q, p)| (q.to_string(), p)).collect()),
            failures: Arc::default(),
            queries: Arc::default(),
        }
    }

    /// Answers `query` with an upstream error status instead.
    pub fn failing_on(mut self, query: &str, status: StatusCode) -> Self {
        Arc::make_mut(&mut self.failures).insert(query.to_string(), status);
        self
    }

    pub fn seen(&self) -> Vec<SecondaryQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SecondarySource for StubSecondary {
    fn name(&self) -> &'static str {
        "stub-secondary"
    }

    async fn search(&self, query: &SecondaryQuery) -> Result<Option<ProductRecord>, ProviderError> {
        self.queries.lock().unwrap().push(query.clone());
        if let Some(&status) = self.failures.get(query.as_str()) {
            return ApiSnafu {
                status,
                body: "stub failure",
            }
            .fail();
        }
        Ok(self.answers.get(query.as_str()).cloned())
    }
}

#[derive(Default)]
pub struct CatalogState {
    /// barcode -> (food id, variant id)
    pub foods: HashMap<String, (String, String)>,
    pub payloads: Vec<FoodPayload>,
    pub created: usize,
    pub fail_with: Option<StatusCode>,
}

/// In-memory catalog that creates a food once per barcode and reuses it
/// afterwards, like the real service.
#[derive(Clone, Default)]
pub struct StubCatalog {
    pub state: Arc<Mutex<CatalogState>>,
}

impl StubCatalog {
    pub fn failing(status: StatusCode) -> Self {
        let stub = Self::default();
        stub.state.lock().unwrap().fail_with = Some(status);
        stub
    }

    pub fn created(&self) -> usize {
        self.state.lock().unwrap().created
    }

    pub fn payloads(&self) -> Vec<FoodPayload> {
        self.state.lock().unwrap().payloads.clone()
    }

    fn upsert(&self, endpoint: &'static str, food: &FoodPayload) -> Result<(String, String), TrackerError> {
        let mut state = self.state.lock().unwrap();
        if let Some(status) = state.fail_with {
            return StatusSnafu {
                endpoint,
                status,
                body: "stub failure",
            }
            .fail();
        }
        state.payloads.push(food.clone());
        if let Some(ids) = state.foods.get(&food.barcode) {
            return Ok(ids.clone());
        }
        state.created += 1;
        let ids = (format!("food-{}", state.created), format!("variant-{}", state.created));
        state.foods.insert(food.barcode.clone(), ids.clone());
        Ok(ids)
    }
}

#[async_trait]
impl CatalogApi for StubCatalog {
    async fn create_food(&self, food: &FoodPayload) -> Result<CreatedFood, TrackerError> {
        let (food_id, variant_id) = self.upsert("/api/foods", food)?;
        Ok(CreatedFood {
            id: Some(food_id),
            default_variant: Some(VariantRef { id: Some(variant_id) }),
        })
    }

    async fn create_or_get_food(&self, food: &FoodPayload) -> Result<CreateOrGetResponse, TrackerError> {
        let (food_id, _) = self.upsert("/api/foods/create-or-get", food)?;
        Ok(CreateOrGetResponse { food_id: Some(food_id) })
    }

    async fn food_variants(&self, food_id: &str) -> Result<Vec<VariantRef>, TrackerError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .foods
            .values()
            .filter(|(f, _)| f == food_id)
            .map(|(_, v)| VariantRef { id: Some(v.clone()) })
            .collect())
    }
}

#[derive(Clone, Default)]
pub struct StubDiary {
    pub entries: Arc<Mutex<Vec<DiaryEntry>>>,
    pub fail_with: Option<StatusCode>,
}

impl StubDiary {
    pub fn entries(&self) -> Vec<DiaryEntry> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl DiaryApi for StubDiary {
    async fn create_entry(&self, entry: &DiaryEntry) -> Result<(), TrackerError> {
        if let Some(status) = self.fail_with {
            return StatusSnafu {
                endpoint: "/api/food-entries",
                status,
                body: "stub failure",
            }
            .fail();
        }
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

/// Scale that always reports the same reading.
pub struct StubScale(pub Option<f64>);

#[async_trait]
impl WeightSource for StubScale {
    async fn read_grams(&self) -> Option<f64> {
        self.0
    }
}

/// Everything a scenario needs to inspect after running scans.
pub struct Harness {
    pub primary: StubPrimary,
    pub secondary: Option<StubSecondary>,
    pub catalog: StubCatalog,
    pub diary: StubDiary,
}

impl Harness {
    pub fn new(primary: StubPrimary, secondary: Option<StubSecondary>) -> Self {
        Self {
            primary,
            secondary,
            catalog: StubCatalog::default(),
            diary: StubDiary::default(),
        }
    }

    pub fn pipeline(&self, mode: CatalogMode) -> ScanPipeline {
        let secondary = self
            .secondary
            .clone()
            .map(|s| Box::new(s) as Box<dyn SecondarySource>);
        let lookup = NutritionLookup::new(Box::new(self.primary.clone()), secondary);
        ScanPipeline::new(
            lookup,
            CatalogReconciler::new(Box::new(self.catalog.clone()), mode),
            DiaryLogger::new(Box::new(self.diary.clone())),
            MealSchedule::default(),
        )
    }
}
