//! Runtime that drives a [`ViewState`] through user actions.
//!
//! All state changes happen on the caller's task: user actions through the
//! `on_*` methods, request completions and notification timers through an
//! internal channel drained by [`ViewController::next_event`],
//! [`ViewController::drain_ready`] or [`ViewController::settle`].
//! In-flight requests are never cancelled.

use std::{sync::Arc, time::Duration};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use crate::{
    Config, RequestError,
    client::PredictionClient,
    config::DEFAULT_NOTIFICATION_TIMEOUT_MS,
    render::{Screen, render},
    view::{Action, Effect, ResponsePolicy, ViewState, reduce},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    pub notification_timeout: Duration,
    pub response_policy: ResponsePolicy,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            notification_timeout: Duration::from_millis(DEFAULT_NOTIFICATION_TIMEOUT_MS),
            response_policy: ResponsePolicy::default(),
        }
    }
}

impl From<&Config> for ControllerSettings {
    fn from(config: &Config) -> Self {
        Self {
            notification_timeout: config.notification_timeout(),
            response_policy: config.response_policy,
        }
    }
}

#[derive(Debug)]
pub struct ViewController {
    client: Arc<dyn PredictionClient>,
    settings: ControllerSettings,
    state: ViewState,
    tx: UnboundedSender<Action>,
    rx: UnboundedReceiver<Action>,
    in_flight: usize,
}

impl ViewController {
    /// Must be called from within a tokio runtime; effects are spawned on it.
    pub fn new(client: Arc<dyn PredictionClient>, settings: ControllerSettings) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            client,
            settings,
            state: ViewState::default(),
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn render(&self) -> Screen {
        render(&self.state)
    }

    /// Number of requests sent whose completion has not been applied yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn on_text_change(&mut self, text: impl Into<String>) {
        self.dispatch(Action::TextChanged(text.into()));
    }

    pub fn on_submit(&mut self) {
        self.dispatch(Action::Submit);
    }

    pub fn on_clear(&mut self) {
        self.dispatch(Action::Clear);
    }

    pub fn on_dismiss_notification(&mut self) {
        self.dispatch(Action::DismissNotification);
    }

    /// Apply one action and start whatever it asks for.
    pub fn dispatch(&mut self, action: Action) {
        if let Action::ForecastReceived { seq, result } = &action {
            self.in_flight = self.in_flight.saturating_sub(1);
            match result {
                Ok(forecast) => debug!(seq, entries = forecast.len(), "forecast arrived"),
                Err(err) => warn!(seq, error = %err, "forecast request failed"),
            }
            if self.settings.response_policy == ResponsePolicy::LatestIssued
                && *seq != self.state.current_request
            {
                debug!(seq, current = self.state.current_request, "discarding stale response");
            }
        }

        let step = reduce(&self.state, action, self.settings.response_policy);
        self.state = step.state;

        for effect in step.effects {
            self.run(effect);
        }
    }

    fn run(&mut self, effect: Effect) {
        match effect {
            Effect::RequestForecast { seq, location } => {
                self.in_flight += 1;
                let client = Arc::clone(&self.client);
                let tx = self.tx.clone();
                let request =
                    tokio::spawn(async move { client.request_forecast(&location).await });
                // Every request reports back exactly once, even if the client panics,
                // so `settle` can rely on `in_flight` reaching zero.
                tokio::spawn(async move {
                    let result = request.await.unwrap_or_else(|e| Err(RequestError::TaskFailed(e)));
                    // Receiver gone means the screen was dropped; nothing to update.
                    let _ = tx.send(Action::ForecastReceived { seq, result });
                });
            }
            Effect::ScheduleNotificationHide { generation } => {
                let tx = self.tx.clone();
                let timeout = self.settings.notification_timeout;
                tokio::spawn(async move {
                    tokio::time::sleep(timeout).await;
                    let _ = tx.send(Action::NotificationExpired { generation });
                });
            }
        }
    }

    /// Wait for the next completion or timer and apply it.
    pub async fn next_event(&mut self) {
        // The controller holds a sender, so the channel never closes.
        if let Some(action) = self.rx.recv().await {
            self.dispatch(action);
        }
    }

    /// Apply every completion or timer that has already fired, without waiting.
    pub fn drain_ready(&mut self) {
        while let Ok(action) = self.rx.try_recv() {
            self.dispatch(action);
        }
    }

    /// Wait until every outstanding request has been applied.
    pub async fn settle(&mut self) {
        while self.in_flight > 0 {
            self.next_event().await;
        }
    }
}
