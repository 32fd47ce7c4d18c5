use serde::{Deserialize, Serialize};

use crate::error::RequestError;

/// Body of `POST /predict`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictRequest<'a> {
    pub location: &'a str,
}

/// Raw body returned by `/predict`; `dates[i]` pairs with `temperatures[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub dates: Vec<String>,
    pub temperatures: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEntry {
    /// Calendar date exactly as the service sent it.
    pub date: String,
    pub temperature_c: f64,
}

/// Ordered (date, temperature) pairs for one query.
///
/// Built once from a [`PredictResponse`] and never modified afterwards;
/// a new query replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Forecast {
    entries: Vec<ForecastEntry>,
}

impl Forecast {
    pub fn new(entries: Vec<ForecastEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ForecastEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<PredictResponse> for Forecast {
    type Error = RequestError;

    fn try_from(value: PredictResponse) -> Result<Self, Self::Error> {
        if value.dates.len() != value.temperatures.len() {
            return Err(RequestError::MismatchedLengths {
                dates: value.dates.len(),
                temperatures: value.temperatures.len(),
            });
        }

        let entries = value
            .dates
            .into_iter()
            .zip(value.temperatures)
            .map(|(date, temperature_c)| ForecastEntry { date, temperature_c })
            .collect();

        Ok(Self { entries })
    }
}
