use std::fmt;

use crate::view::ViewState;

pub const TITLE: &str = "Weather Prediction App";
pub const TEMPERATURE_UNIT: &str = "°C";

/// What the screen shows for one [`ViewState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub title: &'static str,
    pub location: String,
    pub banner: Option<String>,
    pub results: Option<Results>,
    pub notification: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Results {
    pub heading: String,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub date: String,
    pub temperature: String,
}

pub fn render(state: &ViewState) -> Screen {
    let banner = state.has_error().then(|| state.error_message.clone());

    let results = state.forecast.as_ref().map(|forecast| Results {
        heading: format!("Weather Predictions for {}:", state.entered_text),
        rows: forecast
            .entries()
            .iter()
            .map(|entry| Row {
                date: format!("Date: {}", entry.date),
                temperature: format_temperature(entry.temperature_c),
            })
            .collect(),
    });

    let notification = (state.notification_visible && state.has_error())
        .then(|| state.error_message.clone());

    Screen {
        title: TITLE,
        location: state.entered_text.clone(),
        banner,
        results,
        notification,
    }
}

/// One decimal place, rounded from the exact stored value.
///
/// Only values sitting exactly halfway between two tenths (`10.25`) are
/// pushed away from zero; `0.15` is stored just below the half and shows
/// as `0.1°C`.
pub fn format_temperature(celsius: f64) -> String {
    let twentieths = (celsius * 20.0).round();
    let exact_half = twentieths % 2.0 != 0.0 && celsius.mul_add(20.0, -twentieths) == 0.0;

    if exact_half {
        let tenths = (twentieths + celsius.signum()) / 2.0;
        format!("{:.1}{TEMPERATURE_UNIT}", tenths / 10.0)
    } else {
        format!("{celsius:.1}{TEMPERATURE_UNIT}")
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "Location: {}", self.location)?;

        if let Some(banner) = &self.banner {
            writeln!(f, "! {banner}")?;
        }

        if let Some(results) = &self.results {
            writeln!(f)?;
            writeln!(f, "{}", results.heading)?;
            let width = results.rows.iter().map(|r| r.date.chars().count()).max().unwrap_or(0);
            for row in &results.rows {
                writeln!(f, "  {:<width$}  {:>8}", row.date, row.temperature)?;
            }
        }

        if let Some(notification) = &self.notification {
            writeln!(f)?;
            writeln!(f, "[notice] {notification}")?;
        }

        Ok(())
    }
}
