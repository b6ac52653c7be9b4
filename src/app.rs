use eframe::egui;
use egui_extras::{Size, StripBuilder};
use log::{debug, error, info};
use std::sync::mpsc;
use std::time::Duration;

use crate::config::{load_config, Config};
use crate::display::DisplayState;
use crate::location::{IpInfoClient, GEO_URL};
use crate::refresh::{run_refresh_loop, Snapshot};

const PRIMARY: egui::Color32 = egui::Color32::from_rgb(89, 49, 150);
const SUCCESS: egui::Color32 = egui::Color32::from_rgb(76, 160, 96);
const WINDOW_TITLE: &str = "DHT Sensor Monitor";

pub struct DhtMonitorApp {
    state: DisplayState,
    rx: mpsc::Receiver<Option<Snapshot>>,
    // Owns the refresh task; dropping the app shuts it down.
    _runtime: Option<tokio::runtime::Runtime>,
}

impl DhtMonitorApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        info!("Creating DhtMonitorApp.");
        let (tx, rx) = mpsc::channel();
        let runtime = match (tokio::runtime::Runtime::new(), IpInfoClient::new(GEO_URL, config.geo_timeout())) {
            (Ok(rt), Ok(client)) => {
                info!("Starting refresh loop on the Tokio runtime.");
                rt.spawn(run_refresh_loop(config, client, tx, cc.egui_ctx.clone()));
                Some(rt)
            }
            (Err(e), _) => {
                error!("Cannot create Tokio runtime, display will not refresh: {}", e);
                None
            }
            (_, Err(e)) => {
                error!("Cannot create geolocation client, display will not refresh: {}", e);
                None
            }
        };
        Self { state: DisplayState::default(), rx, _runtime: runtime }
    }
}

impl eframe::App for DhtMonitorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.request_repaint_after(Duration::from_secs(1));
        while let Ok(snapshot) = self.rx.try_recv() {
            debug!("Applying refresh result: {:?}", snapshot);
            self.state.apply(snapshot.as_ref());
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            StripBuilder::new(ui)
                .size(Size::relative(0.27)).size(Size::relative(0.27)).size(Size::remainder())
                .vertical(|mut strip| {
                    strip.cell(|ui| { ui.vertical_centered(|ui| {
                        ui.label(egui::RichText::new(format!("Date: {}", self.state.date)).size(14.0));
                        ui.label(egui::RichText::new(format!("Time: {}", self.state.time)).size(14.0));
                    });});
                    strip.cell(|ui| { ui.vertical_centered(|ui| {
                        ui.label(egui::RichText::new(format!("Country: {}", self.state.country)).size(14.0));
                        ui.label(egui::RichText::new(format!("City: {}", self.state.city)).size(14.0));
                    });});
                    strip.cell(|ui| { ui.columns(2, |columns| {
                        columns[0].vertical_centered(|ui| draw_card(ui, "Temperature", &self.state.temperature, PRIMARY));
                        columns[1].vertical_centered(|ui| draw_card(ui, "Humidity", &self.state.humidity, SUCCESS));
                    });});
                });
        });
    }
}

fn draw_card(ui: &mut egui::Ui, title: &str, value: &str, accent: egui::Color32) {
    egui::Frame::group(ui.style())
        .stroke(egui::Stroke::new(1.5, accent))
        .inner_margin(10.0)
        .show(ui, |ui| {
            ui.label(egui::RichText::new(title).color(accent));
            ui.label(egui::RichText::new(value).size(18.0).strong());
        });
}

pub fn native_options() -> eframe::NativeOptions {
    let viewport = egui::ViewportBuilder::default()
        .with_title(WINDOW_TITLE)
        .with_inner_size([400.0, 300.0])
        .with_resizable(false)
        .with_app_id("dht_monitor");
    eframe::NativeOptions { viewport, ..Default::default() }
}

pub fn run() -> Result<(), eframe::Error> {
    let config = load_config();
    eframe::run_native(WINDOW_TITLE, native_options(), Box::new(move |cc| Box::new(DhtMonitorApp::new(cc, config))))
}
