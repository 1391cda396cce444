//! Tracking-service API: the food catalog and the food diary.
//!
//! The reconciler and the diary logger talk to the service only through the
//! [`CatalogApi`] and [`DiaryApi`] traits, so tests can swap in in-memory
//! stubs. [`SparkyClient`] is the HTTP implementation of both.

pub mod errors;
pub mod payload;
pub mod sparky;

use async_trait::async_trait;

use crate::diary::DiaryEntry;

pub use errors::TrackerError;
pub use payload::{CreateOrGetResponse, CreatedFood, FoodPayload, VariantRef};
pub use sparky::SparkyClient;

/// Food catalog operations.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Creates a food, or returns the existing one for the same barcode, in a
    /// single call. The response embeds the default variant.
    async fn create_food(&self, food: &FoodPayload) -> Result<CreatedFood, TrackerError>;

    /// Older two-step flow, part one: create-or-reuse, returning only the food id.
    async fn create_or_get_food(&self, food: &FoodPayload)
    -> Result<CreateOrGetResponse, TrackerError>;

    /// Older two-step flow, part two: the variants of a food, default first.
    async fn food_variants(&self, food_id: &str) -> Result<Vec<VariantRef>, TrackerError>;
}

/// Food diary operations.
#[async_trait]
pub trait DiaryApi: Send + Sync {
    async fn create_entry(&self, entry: &DiaryEntry) -> Result<(), TrackerError>;
}
