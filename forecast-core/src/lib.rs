//! Core library for the `forecast` weather prediction client.
//!
//! This crate defines:
//! - Configuration handling
//! - The prediction client and its HTTP implementation
//! - Screen state, its pure transitions and rendering
//! - The async controller that ties user actions to requests
//!
//! It is used by `forecast-cli`, but can also be driven by other front ends.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod render;
pub mod view;

pub use client::{PredictionClient, client_from_config, http::HttpPredictionClient};
pub use config::Config;
pub use controller::{ControllerSettings, ViewController};
pub use error::{RequestError, ValidationError};
pub use model::{Forecast, ForecastEntry};
pub use render::{Screen, render};
pub use view::{Action, Effect, ResponsePolicy, ViewState, reduce};
