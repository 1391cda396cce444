//! Best-effort facade over the primary and secondary sources.
//!
//! Every lookup is a single attempt. Transport errors, non-success statuses,
//! "no matching product" answers and an exhausted request budget all come
//! back as `None`; the failure itself is only logged. The pipeline then moves
//! on to the next source or gives up on the scan.

use tracing::{debug, warn};

use crate::{
    models::product::ProductRecord,
    providers::{PrimarySource, SecondaryQuery, SecondarySource},
};

pub struct NutritionLookup {
    primary: Box<dyn PrimarySource>,
    secondary: Option<Box<dyn SecondarySource>>,
}

impl NutritionLookup {
    /// `secondary` is `None` when no credential for it is configured.
    pub fn new(
        primary: Box<dyn PrimarySource>,
        secondary: Option<Box<dyn SecondarySource>>,
    ) -> Self {
        Self { primary, secondary }
    }

    pub fn has_secondary(&self) -> bool {
        self.secondary.is_some()
    }

    /// Looks `barcode` up in the primary source.
    pub async fn lookup_primary(&self, barcode: &str) -> Option<ProductRecord> {
        match self.primary.lookup_barcode(barcode).await {
            Ok(Some(record)) => Some(record),
            Ok(None) => {
                warn!(%barcode, source = self.primary.name(), "product not found");
                None
            }
            Err(e) => {
                warn!(%barcode, source = self.primary.name(), error = %e, "barcode lookup failed");
                None
            }
        }
    }

    /// Searches the secondary source; silently `None` when it is disabled.
    pub async fn lookup_secondary(&self, query: &SecondaryQuery) -> Option<ProductRecord> {
        let secondary = self.secondary.as_ref()?;
        match secondary.search(query).await {
            Ok(Some(record)) => Some(record),
            Ok(None) => {
                debug!(%query, source = secondary.name(), "no match");
                None
            }
            Err(e) => {
                warn!(%query, source = secondary.name(), error = %e, "search failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use async_trait::async_trait;
    use reqwest::StatusCode;

    use super::*;
    use crate::{
        models::product::SourceKind,
        providers::errors::{ApiSnafu, ProviderError},
    };

    struct Failing;

    #[async_trait]
    impl PrimarySource for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn lookup_barcode(&self, _: &str) -> Result<Option<ProductRecord>, ProviderError> {
            ApiSnafu {
                status: StatusCode::BAD_GATEWAY,
                body: "upstream down".to_string(),
            }
            .fail()
        }
    }

    struct Counting(Arc<AtomicUsize>);

    #[async_trait]
    impl SecondarySource for Counting {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn search(&self, _: &SecondaryQuery) -> Result<Option<ProductRecord>, ProviderError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(Some(ProductRecord::new(SourceKind::Usda)))
        }
    }

    #[tokio::test]
    async fn primary_error_becomes_not_found() {
        let lookup = NutritionLookup::new(Box::new(Failing), None);
        assert!(lookup.lookup_primary("123").await.is_none());
    }

    #[tokio::test]
    async fn disabled_secondary_returns_none_without_calls() {
        let lookup = NutritionLookup::new(Box::new(Failing), None);
        assert!(!lookup.has_secondary());
        let q = SecondaryQuery::Barcode("123".into());
        assert!(lookup.lookup_secondary(&q).await.is_none());
    }

    #[tokio::test]
    async fn enabled_secondary_is_queried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let lookup = NutritionLookup::new(Box::new(Failing), Some(Box::new(Counting(calls.clone()))));
        let q = SecondaryQuery::Text("oats".into());
        assert!(lookup.lookup_secondary(&q).await.is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn api_error_display_includes_status() {
        let err: ProviderError = ApiSnafu {
            status: StatusCode::NOT_FOUND,
            body: "nope".to_string(),
        }
        .build();
        assert_eq!(err.to_string(), "API error (404 Not Found): nope");
    }
}
