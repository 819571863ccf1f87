use eframe::egui;

use spectral_ppf::app::SpectralApp;
use spectral_ppf::config::Settings;

fn main() -> eframe::Result {
    env_logger::init();

    let settings = Settings::from_env();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Spectral PPF",
        options,
        Box::new(|_cc| Ok(Box::new(SpectralApp::new(settings)))),
    )
}
