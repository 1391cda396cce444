//! Open Food Facts, reached through the tracking service's barcode proxy.

pub mod provider;
pub mod response;

pub use provider::OpenFoodFactsProvider;
