use chrono::Local;
use eframe::egui;
use log::{debug, info};
use std::sync::mpsc;

use crate::config::Config;
use crate::location::{locate, LocationInfo, LocationSource};
use crate::schedule::{delay_until_next_tick, next_tick_after};
use crate::sensor::{read_last_reading, SensorReading};

/// Everything one successful tick hands to the display.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub reading: SensorReading,
    pub location: LocationInfo,
}

/// One read-query-render cycle minus the render. `None` means leave the display alone.
pub async fn tick<S: LocationSource>(config: &Config, source: &S) -> Option<Snapshot> {
    let reading = match read_last_reading(&config.csv_path) {
        Ok(reading) => reading,
        Err(e) => {
            debug!("Skipping tick: {}", e);
            return None;
        }
    };
    let location = locate(source).await;
    info!(
        "Tick: {} T={} H={} ({}, {})",
        reading.timestamp, reading.temperature, reading.humidity, location.country, location.city
    );
    Some(Snapshot { reading, location })
}

/// Ticks once right away, then at every `HH:MM:01`. Skipped ticks re-arm like any other.
/// Returns when the window has gone away.
pub async fn run_refresh_loop<S: LocationSource + Send + Sync + 'static>(
    config: Config,
    source: S,
    tx: mpsc::Sender<Option<Snapshot>>,
    ctx: egui::Context,
) {
    info!("Refresh loop started, reading '{}'.", config.csv_path);
    loop {
        let snapshot = tick(&config, &source).await;
        if tx.send(snapshot).is_err() {
            info!("Display channel closed, stopping refresh loop.");
            break;
        }
        ctx.request_repaint();

        let now = Local::now().naive_local();
        debug!("Next tick at {}.", next_tick_after(now));
        tokio::time::sleep(delay_until_next_tick(now)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::stubs::paris;
    use crate::location::{IpInfoClient, PLACEHOLDER};
    use std::io::Write;
    use std::time::Duration;

    /// Fails the way a dead network does, through a real client.
    fn unreachable() -> IpInfoClient {
        IpInfoClient::new("http://127.0.0.1:9/json", Config::default().geo_timeout()).unwrap()
    }

    fn config_for(path: &str) -> Config {
        Config { csv_path: path.to_string(), ..Config::default() }
    }

    #[tokio::test]
    async fn well_formed_log_produces_a_snapshot() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "h1,h2,h3\n2024-01-01 08:00:00,21.5,55").unwrap();
        let config = config_for(file.path().to_str().unwrap());

        let snapshot = tick(&config, &paris()).await.unwrap();
        assert_eq!(snapshot.reading.temperature, "21.5");
        assert_eq!(snapshot.location.city, "Paris");
    }

    #[tokio::test]
    async fn missing_log_skips_the_tick() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path().join("dht_data.csv").to_str().unwrap());
        assert_eq!(tick(&config, &paris()).await, None);
    }

    #[tokio::test]
    async fn network_failure_still_renders_sensor_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "h1,h2,h3\n2024-01-01 08:00:00,21.5,55").unwrap();
        let config = config_for(file.path().to_str().unwrap());

        let snapshot = tick(&config, &unreachable()).await.unwrap();
        assert_eq!(snapshot.location.country, PLACEHOLDER);
        assert_eq!(snapshot.location.city, PLACEHOLDER);
        assert_eq!(snapshot.reading.humidity, "55");
    }

    // Paused clock: each sleep below jumps virtual time forward, so the loop's
    // wait for the next HH:MM:01 (at most 61 s) elapses without real waiting.
    #[tokio::test(start_paused = true)]
    async fn skipped_ticks_keep_rescheduling() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path().join("dht_data.csv").to_str().unwrap());
        let (tx, rx) = mpsc::channel();
        let handle = tokio::spawn(run_refresh_loop(config, paris(), tx, egui::Context::default()));

        let mut received = Vec::new();
        for _ in 0..300 {
            match rx.try_recv() {
                Ok(snapshot) => received.push(snapshot),
                Err(_) if received.len() >= 2 => break,
                Err(_) => tokio::time::sleep(Duration::from_secs(1)).await,
            }
        }
        handle.abort();
        assert_eq!(received, vec![None, None]);
    }

    #[tokio::test(start_paused = true)]
    async fn loop_stops_once_the_window_is_gone() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path().join("dht_data.csv").to_str().unwrap());
        let (tx, rx) = mpsc::channel();
        drop(rx);
        // Returns on the first send instead of sleeping forever.
        run_refresh_loop(config, paris(), tx, egui::Context::default()).await;
    }
}
