//! Barcode scans to food-diary entries.
//!
//! Each scanned barcode is looked up in Open Food Facts, topped up from USDA
//! FoodData Central when its macros are missing, created (or reused) in the
//! SparkyFitness food catalog and logged to today's diary under the current
//! meal slot. See [`pipeline::ScanPipeline`] for the per-scan flow and
//! [`config::AppConfig`] for the settings.

pub mod catalog;
pub mod clock;
pub mod config;
pub mod diary;
pub mod enrich;
pub mod errors;
pub mod input;
pub mod meal;
pub mod pipeline;
pub mod scale;
pub mod tracker;

pub use errors::{InputError, ScanError};
pub use pipeline::{ScanEvent, ScanOutcome, ScanPipeline, run_scanner};
