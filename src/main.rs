// Hide the console window in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod config;
mod display;
mod location;
mod refresh;
mod schedule;
mod sensor;

#[cfg(debug_assertions)]
use std::io::Write;
use log::info;

fn main() -> Result<(), eframe::Error> {
    #[cfg(debug_assertions)]
    env_logger::Builder::new()
        .format(|buf, record| { writeln!(buf, "[{}] [{}] - {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"), record.level(), record.args()) })
        .filter(None, log::LevelFilter::Info)
        .parse_default_env()
        .init();
    info!("Logger initialised, starting DHT monitor...");
    app::run()
}
