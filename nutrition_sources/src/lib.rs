//! Nutrition data sources for barcode lookups.
//!
//! This crate knows how to ask upstream nutrition databases about a product and
//! how to express the answer in one canonical shape:
//!
//! - [`models::nutrients`] defines the fixed nutrient key set and the per-100 g
//!   [`NutrientRecord`](models::nutrients::NutrientRecord).
//! - [`models::product`] holds the source-neutral [`ProductRecord`](models::product::ProductRecord).
//! - [`providers`] defines the [`PrimarySource`](providers::PrimarySource) and
//!   [`SecondarySource`](providers::SecondarySource) traits and their HTTP
//!   implementations.
//! - [`lookup`] wraps both behind a best-effort facade where every failure is
//!   reported as "not found".

pub mod http;
pub mod lookup;
pub mod models;
pub mod providers;

pub use lookup::NutritionLookup;
pub use models::{
    nutrients::{Nutrient, NutrientRecord},
    product::{ProductRecord, SourceKind},
};
