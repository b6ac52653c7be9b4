use chrono::NaiveDateTime;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Last row of the sensor log. Temperature and humidity stay as the producer wrote them.
#[derive(Clone, Debug, PartialEq)]
pub struct SensorReading {
    pub timestamp: NaiveDateTime,
    pub temperature: String,
    pub humidity: String,
}

/// Reasons a tick is skipped without touching the display.
#[derive(Debug, Error)]
pub enum SensorError {
    #[error("sensor log does not exist")]
    Missing,
    #[error("sensor log has {0} rows, need at least 2")]
    TooFewRows(usize),
    #[error("last row has {0} fields, expected 3")]
    MalformedRow(usize),
    #[error("unparseable timestamp '{0}'")]
    BadTimestamp(String),
    #[error("cannot read sensor log: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse last row: {0}")]
    Csv(#[from] csv::Error),
}

pub fn read_last_reading(path: impl AsRef<Path>) -> Result<SensorReading, SensorError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(SensorError::Missing);
    }

    // Every physical line is a row, blank ones included (as zero-field rows).
    // The producer writes a header row, but it is not interpreted, only counted.
    let content = fs::read_to_string(path)?;
    let rows = content.lines().count();
    if rows < 2 {
        return Err(SensorError::TooFewRows(rows));
    }

    let last_line = content.lines().last().unwrap_or_default();
    let last = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(last_line.as_bytes())
        .records()
        .next()
        .transpose()?
        .unwrap_or_default();
    match (last.len(), last.get(0), last.get(1), last.get(2)) {
        (3, Some(timestamp), Some(temperature), Some(humidity)) => {
            let timestamp = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
                .map_err(|_| SensorError::BadTimestamp(timestamp.to_string()))?;
            Ok(SensorReading {
                timestamp,
                temperature: temperature.to_string(),
                humidity: humidity.to_string(),
            })
        }
        (n, ..) => Err(SensorError::MalformedRow(n)),
    }
}
