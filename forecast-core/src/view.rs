//! Screen state and the pure transitions between snapshots.
//!
//! Nothing in here performs I/O. [`reduce`] takes a snapshot and one
//! [`Action`] and returns the next snapshot together with the [`Effect`]s
//! the runtime has to carry out (send a request, arm the notification
//! timer). See [`crate::controller`] for the runtime side.

use serde::{Deserialize, Serialize};

use crate::{Forecast, RequestError, ValidationError};

/// Which completed request is allowed to update the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponsePolicy {
    /// Whatever response arrives last wins, even if it belongs to an
    /// older submission.
    #[default]
    LastArrival,
    /// Only the response to the most recently issued request is applied.
    LatestIssued,
}

impl ResponsePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponsePolicy::LastArrival => "last-arrival",
            ResponsePolicy::LatestIssued => "latest-issued",
        }
    }

    pub const fn all() -> &'static [ResponsePolicy] {
        &[ResponsePolicy::LastArrival, ResponsePolicy::LatestIssued]
    }
}

impl std::fmt::Display for ResponsePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ResponsePolicy {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "last-arrival" => Ok(ResponsePolicy::LastArrival),
            "latest-issued" => Ok(ResponsePolicy::LatestIssued),
            _ => Err(anyhow::anyhow!(
                "Unknown response policy '{value}'. Supported policies: last-arrival, latest-issued."
            )),
        }
    }
}

/// Snapshot of everything the screen shows.
///
/// A non-empty `error_message` is always set in the same transition that
/// turns `notification_visible` on. Dismissal only clears the flag, so the
/// message text can outlive its notification.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    pub entered_text: String,
    pub forecast: Option<Forecast>,
    pub error_message: String,
    pub notification_visible: bool,
    /// Bumped every time the notification is shown.
    pub notification_generation: u64,
    /// Sequence number of the newest request; retired by `Clear`.
    pub current_request: u64,
}

impl ViewState {
    pub fn has_error(&self) -> bool {
        !self.error_message.is_empty()
    }

    fn show_error(&mut self, message: String, effects: &mut Vec<Effect>) {
        self.error_message = message;
        self.notification_visible = true;
        self.notification_generation += 1;
        effects.push(Effect::ScheduleNotificationHide {
            generation: self.notification_generation,
        });
    }
}

#[derive(Debug)]
pub enum Action {
    TextChanged(String),
    Submit,
    Clear,
    DismissNotification,
    NotificationExpired {
        generation: u64,
    },
    ForecastReceived {
        seq: u64,
        result: Result<Forecast, RequestError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RequestForecast { seq: u64, location: String },
    ScheduleNotificationHide { generation: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub state: ViewState,
    pub effects: Vec<Effect>,
}

/// Compute the snapshot that follows `action`.
pub fn reduce(state: &ViewState, action: Action, policy: ResponsePolicy) -> Step {
    let mut next = state.clone();
    let mut effects = Vec::new();

    match action {
        Action::TextChanged(text) => next.entered_text = text,

        Action::Submit => {
            if next.entered_text.trim().is_empty() {
                next.show_error(ValidationError::EmptyLocation.to_string(), &mut effects);
            } else {
                next.error_message.clear();
                next.current_request += 1;
                effects.push(Effect::RequestForecast {
                    seq: next.current_request,
                    location: next.entered_text.clone(),
                });
            }
        }

        Action::Clear => {
            next.entered_text.clear();
            next.forecast = None;
            next.error_message.clear();
            next.current_request += 1;
        }

        Action::DismissNotification => next.notification_visible = false,

        Action::NotificationExpired { generation } => {
            if generation == next.notification_generation {
                next.notification_visible = false;
            }
        }

        Action::ForecastReceived { seq, result } => {
            let stale = seq != next.current_request;
            if stale && policy == ResponsePolicy::LatestIssued {
                return Step { state: next, effects };
            }

            match result {
                Ok(forecast) => {
                    next.forecast = Some(forecast);
                    next.error_message.clear();
                }
                Err(err) => {
                    next.show_error(format!("Could not fetch the forecast: {err}"), &mut effects)
                }
            }
        }
    }

    Step { state: next, effects }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ForecastEntry;

    fn forecast(date: &str, t: f64) -> Forecast {
        Forecast::new(vec![ForecastEntry { date: date.to_string(), temperature_c: t }])
    }

    fn run(state: &ViewState, action: Action) -> Step {
        reduce(state, action, ResponsePolicy::LastArrival)
    }

    fn typed(text: &str) -> ViewState {
        run(&ViewState::default(), Action::TextChanged(text.to_string())).state
    }

    fn failure() -> RequestError {
        RequestError::MismatchedLengths { dates: 1, temperatures: 0 }
    }

    #[test]
    fn policy_as_str_roundtrip() {
        for policy in ResponsePolicy::all() {
            let parsed = ResponsePolicy::try_from(policy.as_str()).expect("roundtrip should succeed");
            assert_eq!(*policy, parsed);
        }
    }

    #[test]
    fn unknown_policy_error() {
        let err = ResponsePolicy::try_from("first-wins").unwrap_err();
        assert!(err.to_string().contains("Unknown response policy"));
    }

    #[test]
    fn text_change_never_requests() {
        let step = run(&ViewState::default(), Action::TextChanged("Lima".into()));
        assert_eq!(step.state.entered_text, "Lima");
        assert!(step.effects.is_empty());
    }

    #[test]
    fn blank_submit_shows_validation_error_without_request() {
        for text in ["", "   ", "\t\n"] {
            let step = run(&typed(text), Action::Submit);

            assert_eq!(step.state.error_message, "Please enter a location");
            assert!(step.state.notification_visible);
            assert_eq!(
                step.effects,
                vec![Effect::ScheduleNotificationHide { generation: 1 }]
            );
        }
    }

    #[test]
    fn submit_requests_entered_text_verbatim_and_clears_error() {
        let mut state = typed(" Cape Town ");
        state.error_message = "Please enter a location".into();

        let step = run(&state, Action::Submit);

        assert!(step.state.error_message.is_empty());
        assert_eq!(
            step.effects,
            vec![Effect::RequestForecast { seq: 1, location: " Cape Town ".into() }]
        );
    }

    #[test]
    fn successful_response_replaces_forecast() {
        let mut state = typed("Rome");
        state.forecast = Some(forecast("2023-12-31", 1.0));
        let state = run(&state, Action::Submit).state;

        let step = run(
            &state,
            Action::ForecastReceived { seq: 1, result: Ok(forecast("2024-01-01", 9.5)) },
        );

        assert_eq!(step.state.forecast, Some(forecast("2024-01-01", 9.5)));
        assert!(!step.state.has_error());
        assert!(step.effects.is_empty());
    }

    #[test]
    fn success_after_overlapping_failure_clears_error() {
        let state = run(&typed("A"), Action::Submit).state;
        let state = run(&state, Action::TextChanged("B".into())).state;
        let state = run(&state, Action::Submit).state;

        let failed = run(&state, Action::ForecastReceived { seq: 2, result: Err(failure()) }).state;
        assert!(failed.has_error());

        let step = run(&failed, Action::ForecastReceived { seq: 1, result: Ok(forecast("a", 1.0)) });

        assert_eq!(step.state.forecast, Some(forecast("a", 1.0)));
        assert_eq!(step.state.error_message, "");
        assert!(crate::render(&step.state).banner.is_none());
    }

    #[test]
    fn failed_response_is_surfaced_like_validation() {
        let state = run(&typed("Rome"), Action::Submit).state;

        let step = run(&state, Action::ForecastReceived { seq: 1, result: Err(failure()) });

        assert!(step.state.error_message.starts_with("Could not fetch the forecast:"));
        assert!(step.state.notification_visible);
        assert_eq!(
            step.effects,
            vec![Effect::ScheduleNotificationHide { generation: 1 }]
        );
        assert_eq!(step.state.entered_text, "Rome");
    }

    #[test]
    fn clear_resets_text_forecast_and_error() {
        let mut state = typed("Rome");
        state.forecast = Some(forecast("2024-01-01", 9.5));
        state.error_message = "boom".into();
        state.notification_visible = true;

        let step = run(&state, Action::Clear);

        assert_eq!(step.state.entered_text, "");
        assert_eq!(step.state.forecast, None);
        assert_eq!(step.state.error_message, "");
        assert!(step.state.notification_visible, "clear leaves the flag alone");
        assert!(step.effects.is_empty());
    }

    #[test]
    fn dismiss_keeps_text_forecast_and_message() {
        let mut state = run(&typed("  "), Action::Submit).state;
        state.forecast = Some(forecast("2024-01-01", 9.5));

        let step = run(&state, Action::DismissNotification);

        assert!(!step.state.notification_visible);
        assert_eq!(step.state.entered_text, "  ");
        assert_eq!(step.state.forecast, Some(forecast("2024-01-01", 9.5)));
        assert_eq!(step.state.error_message, "Please enter a location");
    }

    #[test]
    fn stale_expiry_does_not_hide_newer_notification() {
        let first = run(&ViewState::default(), Action::Submit).state;
        let dismissed = run(&first, Action::DismissNotification).state;
        let second = run(&dismissed, Action::Submit).state;
        assert_eq!(second.notification_generation, 2);

        let after_old_timer = run(&second, Action::NotificationExpired { generation: 1 }).state;
        assert!(after_old_timer.notification_visible);

        let after_new_timer =
            run(&after_old_timer, Action::NotificationExpired { generation: 2 }).state;
        assert!(!after_new_timer.notification_visible);
    }

    #[test]
    fn expiry_after_manual_dismiss_is_a_no_op() {
        let shown = run(&ViewState::default(), Action::Submit).state;
        let dismissed = run(&shown, Action::DismissNotification).state;

        let step = run(&dismissed, Action::NotificationExpired { generation: 1 });
        assert_eq!(step.state, dismissed);
    }

    #[test]
    fn last_arrival_applies_out_of_order_response() {
        let state = run(&typed("A"), Action::Submit).state;
        let state = run(&state, Action::TextChanged("B".into())).state;
        let state = run(&state, Action::Submit).state;

        let state = run(&state, Action::ForecastReceived { seq: 2, result: Ok(forecast("b", 2.0)) }).state;
        let state = run(&state, Action::ForecastReceived { seq: 1, result: Ok(forecast("a", 1.0)) }).state;

        assert_eq!(state.forecast, Some(forecast("a", 1.0)));
    }

    #[test]
    fn latest_issued_discards_older_response() {
        let policy = ResponsePolicy::LatestIssued;
        let state = reduce(&typed("A"), Action::Submit, policy).state;
        let state = reduce(&state, Action::TextChanged("B".into()), policy).state;
        let state = reduce(&state, Action::Submit, policy).state;

        let state = reduce(
            &state,
            Action::ForecastReceived { seq: 2, result: Ok(forecast("b", 2.0)) },
            policy,
        )
        .state;
        let step = reduce(
            &state,
            Action::ForecastReceived { seq: 1, result: Err(failure()) },
            policy,
        );

        assert_eq!(step.state.forecast, Some(forecast("b", 2.0)));
        assert!(!step.state.has_error());
        assert!(step.effects.is_empty());
    }

    #[test]
    fn latest_issued_discards_response_started_before_clear() {
        let policy = ResponsePolicy::LatestIssued;
        let state = reduce(&typed("A"), Action::Submit, policy).state;
        let cleared = reduce(&state, Action::Clear, policy).state;

        let step = reduce(
            &cleared,
            Action::ForecastReceived { seq: 1, result: Ok(forecast("a", 1.0)) },
            policy,
        );
        assert_eq!(step.state.forecast, None);
    }

    #[test]
    fn last_arrival_lets_response_overwrite_clear() {
        let state = run(&typed("A"), Action::Submit).state;
        let cleared = run(&state, Action::Clear).state;

        let step = run(
            &cleared,
            Action::ForecastReceived { seq: 1, result: Ok(forecast("a", 1.0)) },
        );
        assert_eq!(step.state.forecast, Some(forecast("a", 1.0)));
    }
}
