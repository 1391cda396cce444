use async_trait::async_trait;
use nutrition_sources::http::{ServiceConnection, error_body};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use snafu::ResultExt;
use tracing::debug;

use crate::{
    diary::DiaryEntry,
    tracker::{
        CatalogApi, DiaryApi,
        errors::{RequestSnafu, StatusSnafu, TrackerError},
        payload::{CreateOrGetResponse, CreatedFood, FoodPayload, VariantRef},
    },
};

const FOODS_PATH: &str = "/api/foods";
const CREATE_OR_GET_PATH: &str = "/api/foods/create-or-get";
const VARIANTS_PATH: &str = "/api/foods/food-variants";
const ENTRIES_PATH: &str = "/api/food-entries";

/// HTTP client for the SparkyFitness catalog and diary endpoints.
#[derive(Debug, Clone)]
pub struct SparkyClient {
    conn: ServiceConnection,
}

impl SparkyClient {
    /// Reuses a connection already built for the nutrition sources.
    pub fn from_connection(conn: ServiceConnection) -> Self {
        Self { conn }
    }

    async fn post_json<T: serde::Serialize + Sync>(
        &self,
        endpoint: &'static str,
        body: &T,
    ) -> Result<Response, TrackerError> {
        let response = self
            .conn
            .client()
            .post(self.conn.url(endpoint))
            .json(body)
            .send()
            .await
            .context(RequestSnafu { endpoint })?;
        accepted(endpoint, response).await
    }

    async fn read_json<T: DeserializeOwned>(
        endpoint: &'static str,
        response: Response,
    ) -> Result<T, TrackerError> {
        response.json::<T>().await.context(RequestSnafu { endpoint })
    }
}

/// Passes 200/201 through; anything else becomes [`TrackerError::Status`].
async fn accepted(endpoint: &'static str, response: Response) -> Result<Response, TrackerError> {
    let status = response.status();
    if status == StatusCode::OK || status == StatusCode::CREATED {
        debug!(endpoint, %status, "tracker call accepted");
        return Ok(response);
    }
    let body = error_body(response).await;
    StatusSnafu {
        endpoint,
        status,
        body,
    }
    .fail()
}

#[async_trait]
impl CatalogApi for SparkyClient {
    async fn create_food(&self, food: &FoodPayload) -> Result<CreatedFood, TrackerError> {
        let response = self.post_json(FOODS_PATH, food).await?;
        Self::read_json(FOODS_PATH, response).await
    }

    async fn create_or_get_food(
        &self,
        food: &FoodPayload,
    ) -> Result<CreateOrGetResponse, TrackerError> {
        let body = serde_json::json!({ "foodSuggestion": food });
        let response = self.post_json(CREATE_OR_GET_PATH, &body).await?;
        Self::read_json(CREATE_OR_GET_PATH, response).await
    }

    async fn food_variants(&self, food_id: &str) -> Result<Vec<VariantRef>, TrackerError> {
        let response = self
            .conn
            .client()
            .get(self.conn.url(VARIANTS_PATH))
            .query(&[("food_id", food_id)])
            .send()
            .await
            .context(RequestSnafu {
                endpoint: VARIANTS_PATH,
            })?;
        let response = accepted(VARIANTS_PATH, response).await?;
        Self::read_json(VARIANTS_PATH, response).await
    }
}

#[async_trait]
impl DiaryApi for SparkyClient {
    async fn create_entry(&self, entry: &DiaryEntry) -> Result<(), TrackerError> {
        self.post_json(ENTRIES_PATH, entry).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use nutrition_sources::http::HttpTimeouts;
    use secrecy::SecretString;

    use super::*;

    #[tokio::test]
    async fn unreachable_service_is_a_request_error() {
        // Port 9 (discard) is closed on any sane test host.
        let key = SecretString::from("k".to_string());
        let conn = ServiceConnection::new("http://127.0.0.1:9", &key, HttpTimeouts::SERVICE).unwrap();
        let client = SparkyClient::from_connection(conn);
        let err = client.food_variants("f-1").await.unwrap_err();
        assert!(matches!(
            err,
            TrackerError::Request {
                endpoint: VARIANTS_PATH,
                ..
            }
        ));
        assert_eq!(err.status(), None);
    }
}
