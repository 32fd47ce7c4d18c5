use crate::{Config, Forecast, RequestError, client::http::HttpPredictionClient};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod http;

/// The only component that talks to the forecasting service.
///
/// Callers must have checked that `location` is non-empty; implementations
/// send it as-is, make exactly one attempt and never retry.
#[async_trait]
pub trait PredictionClient: Send + Sync + Debug {
    async fn request_forecast(&self, location: &str) -> Result<Forecast, RequestError>;
}

/// Construct the HTTP client pointed at the configured endpoint.
pub fn client_from_config(config: &Config) -> anyhow::Result<Arc<dyn PredictionClient>> {
    let client = HttpPredictionClient::new(&config.endpoint)?;
    Ok(Arc::new(client))
}
