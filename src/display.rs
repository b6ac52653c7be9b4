use crate::location::{LocationInfo, PLACEHOLDER};
use crate::refresh::Snapshot;
use crate::sensor::SensorReading;

/// The six texts on screen. Only [`DisplayState::render`] writes them, all at once.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayState {
    pub date: String,
    pub time: String,
    pub country: String,
    pub city: String,
    pub temperature: String,
    pub humidity: String,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            date: PLACEHOLDER.to_string(),
            time: PLACEHOLDER.to_string(),
            country: PLACEHOLDER.to_string(),
            city: PLACEHOLDER.to_string(),
            temperature: format!("{} °C", PLACEHOLDER),
            humidity: format!("{} %", PLACEHOLDER),
        }
    }
}

impl DisplayState {
    pub fn render(&mut self, reading: &SensorReading, location: &LocationInfo) {
        *self = Self {
            date: reading.timestamp.format("%Y-%m-%d").to_string(),
            time: reading.timestamp.format("%H:%M:%S").to_string(),
            country: location.country.clone(),
            city: location.city.clone(),
            temperature: format!("{} °C", reading.temperature),
            humidity: format!("{} %", reading.humidity),
        };
    }

    /// A skipped tick keeps whatever was shown before.
    pub fn apply(&mut self, snapshot: Option<&Snapshot>) {
        if let Some(snapshot) = snapshot {
            self.render(&snapshot.reading, &snapshot.location);
        }
    }
}
