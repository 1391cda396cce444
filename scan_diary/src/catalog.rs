//! Catalog reconciliation: turn a [`FoodCandidate`] into the catalog's
//! `(food id, variant id)` pair.
//!
//! The tracking service de-duplicates on barcode, so reconciling the same
//! product twice yields the same identity and never a second catalog row.

use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    enrich::FoodCandidate,
    tracker::{CatalogApi, FoodPayload, TrackerError},
};

/// Which catalog endpoint flow to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogMode {
    /// `POST /api/foods`, which returns the default variant inline.
    #[default]
    Direct,
    /// `POST /api/foods/create-or-get`, then a variant listing.
    CreateOrGet,
}

impl FromStr for CatalogMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "direct" => Ok(CatalogMode::Direct),
            "create_or_get" => Ok(CatalogMode::CreateOrGet),
            other => Err(format!("expected direct or create_or_get, got {other:?}")),
        }
    }
}

/// Catalog identifiers a diary entry refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoodIdentity {
    pub food_id: String,
    pub variant_id: String,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Remote(#[from] TrackerError),

    #[error("catalog response has no food id")]
    MissingFoodId,

    #[error("food {food_id} has no variant")]
    MissingVariantId { food_id: String },
}

pub struct CatalogReconciler {
    api: Box<dyn CatalogApi>,
    mode: CatalogMode,
}

impl CatalogReconciler {
    pub fn new(api: Box<dyn CatalogApi>, mode: CatalogMode) -> Self {
        Self { api, mode }
    }

    pub fn mode(&self) -> CatalogMode {
        self.mode
    }

    /// Creates the food or reuses the existing one. Any failure, including a
    /// response without ids, aborts the scan.
    pub async fn reconcile(&self, candidate: &FoodCandidate) -> Result<FoodIdentity, CatalogError> {
        let payload = FoodPayload::from(candidate);
        debug!(barcode = %payload.barcode, mode = ?self.mode, "reconciling food");

        let identity = match self.mode {
            CatalogMode::Direct => {
                let created = self.api.create_food(&payload).await?;
                let food_id = created.id.ok_or(CatalogError::MissingFoodId)?;
                let variant_id = created
                    .default_variant
                    .and_then(|v| v.id)
                    .ok_or_else(|| CatalogError::MissingVariantId {
                        food_id: food_id.clone(),
                    })?;
                FoodIdentity { food_id, variant_id }
            }
            CatalogMode::CreateOrGet => {
                let food_id = self
                    .api
                    .create_or_get_food(&payload)
                    .await?
                    .food_id
                    .ok_or(CatalogError::MissingFoodId)?;
                let variant_id = self
                    .api
                    .food_variants(&food_id)
                    .await?
                    .into_iter()
                    .find_map(|v| v.id)
                    .ok_or_else(|| CatalogError::MissingVariantId {
                        food_id: food_id.clone(),
                    })?;
                FoodIdentity { food_id, variant_id }
            }
        };

        info!(
            food_id = %identity.food_id,
            variant_id = %identity.variant_id,
            name = %payload.name,
            "food reconciled"
        );
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use nutrition_sources::{NutrientRecord, SourceKind};

    use super::*;
    use crate::{
        enrich::NutritionStatus,
        tracker::{CreateOrGetResponse, CreatedFood, VariantRef},
    };

    #[derive(Default)]
    struct Canned {
        created: Option<CreatedFood>,
        food_id: Option<String>,
        variants: Vec<VariantRef>,
        calls: Mutex<Vec<&'static str>>,
    }

    #[async_trait]
    impl CatalogApi for Canned {
        async fn create_food(&self, _: &FoodPayload) -> Result<CreatedFood, TrackerError> {
            self.calls.lock().unwrap().push("create");
            Ok(self.created.clone().unwrap())
        }

        async fn create_or_get_food(
            &self,
            _: &FoodPayload,
        ) -> Result<CreateOrGetResponse, TrackerError> {
            self.calls.lock().unwrap().push("create_or_get");
            Ok(CreateOrGetResponse {
                food_id: self.food_id.clone(),
            })
        }

        async fn food_variants(&self, _: &str) -> Result<Vec<VariantRef>, TrackerError> {
            self.calls.lock().unwrap().push("variants");
            Ok(self.variants.clone())
        }
    }

    fn candidate() -> FoodCandidate {
        FoodCandidate {
            name: "Oat Drink".into(),
            brand: "Oatly".into(),
            barcode: "7394376616228".into(),
            nutrients: NutrientRecord::new(),
            provenance: SourceKind::OpenFoodFacts,
            status: NutritionStatus::Complete,
        }
    }

    fn variant(id: Option<&str>) -> VariantRef {
        VariantRef {
            id: id.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn direct_mode_uses_inline_default_variant() {
        let api = Canned {
            created: Some(CreatedFood {
                id: Some("f-1".into()),
                default_variant: Some(variant(Some("v-1"))),
            }),
            ..Default::default()
        };
        let reconciler = CatalogReconciler::new(Box::new(api), CatalogMode::Direct);
        let identity = reconciler.reconcile(&candidate()).await.unwrap();
        assert_eq!(
            identity,
            FoodIdentity {
                food_id: "f-1".into(),
                variant_id: "v-1".into()
            }
        );
    }

    #[tokio::test]
    async fn direct_mode_without_variant_fails() {
        let api = Canned {
            created: Some(CreatedFood {
                id: Some("f-1".into()),
                default_variant: None,
            }),
            ..Default::default()
        };
        let reconciler = CatalogReconciler::new(Box::new(api), CatalogMode::Direct);
        let err = reconciler.reconcile(&candidate()).await.unwrap_err();
        assert!(matches!(err, CatalogError::MissingVariantId { food_id } if food_id == "f-1"));
    }

    #[tokio::test]
    async fn create_or_get_takes_first_variant_with_id() {
        let api = Canned {
            food_id: Some("f-2".into()),
            variants: vec![variant(None), variant(Some("v-7")), variant(Some("v-8"))],
            ..Default::default()
        };
        let reconciler = CatalogReconciler::new(Box::new(api), CatalogMode::CreateOrGet);
        let identity = reconciler.reconcile(&candidate()).await.unwrap();
        assert_eq!(identity.food_id, "f-2");
        assert_eq!(identity.variant_id, "v-7");
    }

    #[tokio::test]
    async fn create_or_get_without_food_id_skips_variant_lookup() {
        let api = Canned::default();
        let reconciler = CatalogReconciler::new(Box::new(api), CatalogMode::CreateOrGet);
        let err = reconciler.reconcile(&candidate()).await.unwrap_err();
        assert!(matches!(err, CatalogError::MissingFoodId));
    }

    #[test]
    fn mode_parses_both_spellings() {
        assert_eq!("create-or-get".parse::<CatalogMode>().unwrap(), CatalogMode::CreateOrGet);
        assert_eq!(" Direct ".parse::<CatalogMode>().unwrap(), CatalogMode::Direct);
        assert!("upsert".parse::<CatalogMode>().is_err());
    }
}
