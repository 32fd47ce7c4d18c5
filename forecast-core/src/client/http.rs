use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, warn};

use crate::{
    error::RequestError,
    model::{Forecast, PredictRequest, PredictResponse},
};

use super::PredictionClient;

const PREDICT_PATH: &str = "predict";

#[derive(Debug, Clone)]
pub struct HttpPredictionClient {
    endpoint: String,
    http: Client,
}

impl HttpPredictionClient {
    /// `base_url` is the service root, e.g. `http://localhost:5000`.
    pub fn new(base_url: &str) -> Result<Self> {
        let raw = format!("{}/{PREDICT_PATH}", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&raw)
            .with_context(|| format!("Invalid prediction endpoint '{base_url}'"))?;

        Ok(Self {
            endpoint: endpoint.to_string(),
            http: Client::new(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn transport_error(&self, source: reqwest::Error) -> RequestError {
        RequestError::Transport {
            endpoint: self.endpoint.clone(),
            source,
        }
    }
}

#[async_trait]
impl PredictionClient for HttpPredictionClient {
    async fn request_forecast(&self, location: &str) -> Result<Forecast, RequestError> {
        debug!(endpoint = %self.endpoint, location, "requesting forecast");

        let res = self
            .http
            .post(&self.endpoint)
            .json(&PredictRequest { location })
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            warn!(%status, "prediction service rejected request");
            return Err(RequestError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: PredictResponse = serde_json::from_str(&body).map_err(RequestError::Decode)?;
        let forecast = Forecast::try_from(parsed)?;

        debug!(entries = forecast.len(), "forecast received");
        Ok(forecast)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
