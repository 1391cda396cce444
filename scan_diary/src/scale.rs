//! Optional network scale: `GET <url>` answers `{"value": <grams>}`.

use async_trait::async_trait;
use nutrition_sources::{
    http::{HttpTimeouts, plain_client},
    providers::ProviderInitError,
};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

/// Something that can report the weight currently on the plate.
#[async_trait]
pub trait WeightSource: Send + Sync {
    /// Grams on the scale, or `None` when there is no usable reading.
    /// Never fails the scan.
    async fn read_grams(&self) -> Option<f64>;
}

#[derive(Debug, Deserialize)]
struct Reading {
    value: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct HttpScale {
    url: String,
    client: Client,
}

impl HttpScale {
    pub fn new(url: &str) -> Result<Self, ProviderInitError> {
        Ok(Self {
            url: url.to_string(),
            client: plain_client(HttpTimeouts::DEVICE)?,
        })
    }

    async fn fetch(&self) -> Result<Option<f64>, reqwest::Error> {
        let reading = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json::<Reading>()
            .await?;
        Ok(reading.value)
    }
}

#[async_trait]
impl WeightSource for HttpScale {
    async fn read_grams(&self) -> Option<f64> {
        match self.fetch().await {
            Ok(Some(g)) if g.is_finite() && g > 0.0 => {
                debug!(grams = g, "scale reading");
                Some(g)
            }
            Ok(other) => {
                warn!(reading = ?other, "scale reports no weight, using one serving");
                None
            }
            Err(e) => {
                warn!(url = %self.url, error = %e, "scale unreachable, using one serving");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_tolerates_missing_value() {
        let r: Reading = serde_json::from_str(r#"{"value": 182.5, "unit": "g"}"#).unwrap();
        assert_eq!(r.value, Some(182.5));
        let r: Reading = serde_json::from_str("{}").unwrap();
        assert_eq!(r.value, None);
    }

    #[tokio::test]
    async fn unreachable_scale_reads_none() {
        let scale = HttpScale::new("http://127.0.0.1:9/weight").unwrap();
        assert_eq!(scale.read_grams().await, None);
    }
}
