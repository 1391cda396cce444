//! Source abstraction for nutrition databases.
//!
//! This module defines the two roles a nutrition database can play:
//!
//! - [`PrimarySource`]: queried first for every scan, by exact barcode.
//! - [`SecondarySource`]: a fallback queried by barcode or free text, only when
//!   the primary data is missing core macros.
//!
//! Both traits are async and object safe so the caller can pick concrete
//! providers at runtime (`Box<dyn PrimarySource>`). Implementations report
//! every failure as a [`ProviderError`]; deciding that a failure means
//! "not found" is left to [`crate::lookup::NutritionLookup`].
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use nutrition_sources::models::product::{ProductRecord, SourceKind};
//! use nutrition_sources::providers::{PrimarySource, ProviderError};
//!
//! struct Fixed;
//!
//! #[async_trait]
//! impl PrimarySource for Fixed {
//!     fn name(&self) -> &'static str {
//!         "fixed"
//!     }
//!
//!     async fn lookup_barcode(
//!         &self,
//!         _barcode: &str,
//!     ) -> Result<Option<ProductRecord>, ProviderError> {
//!         Ok(Some(ProductRecord::new(SourceKind::OpenFoodFacts)))
//!     }
//! }
//! ```

pub mod budget;
pub mod errors;
pub mod openfoodfacts;
pub mod usda;

use std::fmt;

use async_trait::async_trait;

use crate::models::product::ProductRecord;

pub use errors::{ProviderError, ProviderInitError};

/// A barcode-indexed nutrition database.
#[async_trait]
pub trait PrimarySource: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Looks up one product by exact barcode.
    ///
    /// * `Ok(Some(_))` - the source knows the product.
    /// * `Ok(None)` - the source answered but has no matching product.
    /// * `Err(_)` - the request failed or the source answered with an error.
    async fn lookup_barcode(&self, barcode: &str) -> Result<Option<ProductRecord>, ProviderError>;
}

/// A searchable fallback nutrition database.
#[async_trait]
pub trait SecondarySource: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Returns the best match for `query`, if any.
    async fn search(&self, query: &SecondaryQuery) -> Result<Option<ProductRecord>, ProviderError>;
}

/// What a secondary lookup searches for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecondaryQuery {
    Barcode(String),
    Text(String),
}

impl SecondaryQuery {
    /// The raw search string sent upstream.
    pub fn as_str(&self) -> &str {
        match self {
            SecondaryQuery::Barcode(s) | SecondaryQuery::Text(s) => s,
        }
    }
}

impl fmt::Display for SecondaryQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecondaryQuery::Barcode(code) => write!(f, "barcode {code}"),
            SecondaryQuery::Text(text) => write!(f, "\"{text}\""),
        }
    }
}
