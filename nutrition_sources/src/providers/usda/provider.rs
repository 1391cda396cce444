use async_trait::async_trait;
use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use snafu::ResultExt;

use crate::{
    http::{ServiceConnection, error_body},
    models::product::ProductRecord,
    providers::{
        SecondaryQuery, SecondarySource,
        budget::RequestBudget,
        errors::{
            ApiSnafu, InvalidProviderIdSnafu, ProviderError, ProviderInitError, RateLimitedSnafu,
            ReqwestSnafu,
        },
        usda::response::UsdaSearchResponse,
    },
};

const SEARCH_PATH: &str = "/api/food-integration/usda/search";
const PROVIDER_ID_HEADER: &str = "x-provider-id";

/// Text and barcode search against USDA FoodData Central.
///
/// The tracking service needs to know which of its configured USDA providers
/// (and therefore which USDA API key) to use; that id is sent as a header on
/// every request.
#[derive(Debug)]
pub struct UsdaProvider {
    conn: ServiceConnection,
    provider_id: HeaderValue,
    budget: RequestBudget,
}

impl UsdaProvider {
    pub fn new(
        conn: ServiceConnection,
        provider_id: &SecretString,
        budget: RequestBudget,
    ) -> Result<Self, ProviderInitError> {
        let mut provider_id =
            HeaderValue::from_str(provider_id.expose_secret()).context(InvalidProviderIdSnafu)?;
        provider_id.set_sensitive(true);
        Ok(Self {
            conn,
            provider_id,
            budget,
        })
    }
}

#[async_trait]
impl SecondarySource for UsdaProvider {
    fn name(&self) -> &'static str {
        "usda"
    }

    async fn search(&self, query: &SecondaryQuery) -> Result<Option<ProductRecord>, ProviderError> {
        if !self.budget.try_acquire() {
            return RateLimitedSnafu {
                source_name: self.name(),
            }
            .fail();
        }

        let response = self
            .conn
            .client()
            .get(self.conn.url(SEARCH_PATH))
            .query(&[("query", query.as_str())])
            .header(PROVIDER_ID_HEADER, self.provider_id.clone())
            .send()
            .await
            .context(ReqwestSnafu)?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            return ApiSnafu { status, body }.fail();
        }

        let parsed = response
            .json::<UsdaSearchResponse>()
            .await
            .context(ReqwestSnafu)?;
        Ok(parsed.into_best().map(ProductRecord::from))
    }
}
