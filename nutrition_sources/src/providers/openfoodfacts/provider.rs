use async_trait::async_trait;
use snafu::ResultExt;

use crate::{
    http::{ServiceConnection, error_body},
    models::product::ProductRecord,
    providers::{
        PrimarySource,
        errors::{ApiSnafu, ProviderError, ReqwestSnafu},
        openfoodfacts::response::OffResponse,
    },
};

const BARCODE_PATH: &str = "/api/foods/openfoodfacts/barcode";

/// Barcode lookups against Open Food Facts via the tracking service.
#[derive(Debug, Clone)]
pub struct OpenFoodFactsProvider {
    conn: ServiceConnection,
}

impl OpenFoodFactsProvider {
    pub fn new(conn: ServiceConnection) -> Self {
        Self { conn }
    }

    fn barcode_url(&self, barcode: &str) -> String {
        self.conn.url(&format!("{BARCODE_PATH}/{barcode}"))
    }
}

#[async_trait]
impl PrimarySource for OpenFoodFactsProvider {
    fn name(&self) -> &'static str {
        "openfoodfacts"
    }

    async fn lookup_barcode(&self, barcode: &str) -> Result<Option<ProductRecord>, ProviderError> {
        let response = self
            .conn
            .client()
            .get(self.barcode_url(barcode))
            .send()
            .await
            .context(ReqwestSnafu)?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            return ApiSnafu { status, body }.fail();
        }

        let parsed = response.json::<OffResponse>().await.context(ReqwestSnafu)?;
        Ok(parsed.into_found().map(ProductRecord::from))
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::http::HttpTimeouts;

    #[test]
    fn builds_proxy_url() {
        let key = SecretString::from("k".to_string());
        let conn = ServiceConnection::new("http://sparky.local/", &key, HttpTimeouts::SERVICE).unwrap();
        let provider = OpenFoodFactsProvider::new(conn);
        assert_eq!(
            provider.barcode_url("5000112548167"),
            "http://sparky.local/api/foods/openfoodfacts/barcode/5000112548167"
        );
    }
}
