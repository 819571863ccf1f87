use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::config::BandPreset;
use crate::metrics::IntegrationMethod;
use crate::report::format_cct;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – spectra list and metrics readout
// ---------------------------------------------------------------------------

/// Deferred list edits, applied once the list is no longer borrowed.
enum EntryAction {
    Commit(usize),
    Remove(usize),
}

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("PPF");
    ui.separator();
    metrics_readout(ui, state);
    ui.add_space(8.0);

    ui.heading("Spectra");
    ui.separator();

    if state.entries.is_empty() {
        ui.label("No spectra loaded.");
        return;
    }

    let mut actions = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (idx, entry) in state.entries.iter_mut().enumerate() {
                let color = state
                    .palette
                    .get(idx)
                    .copied()
                    .unwrap_or(Color32::LIGHT_BLUE);

                ui.horizontal(|ui: &mut Ui| {
                    ui.label(RichText::new(&entry.spectrum.name).color(color).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("✖").on_hover_text("Remove").clicked() {
                            actions.push(EntryAction::Remove(idx));
                        }
                    });
                });

                ui.horizontal(|ui: &mut Ui| {
                    ui.label("Multiplier:");
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut entry.multiplier_text)
                            .desired_width(70.0),
                    );
                    if response.lost_focus() {
                        actions.push(EntryAction::Commit(idx));
                    }
                    if let Some((lo, hi)) = entry.spectrum.weighted.curve().range() {
                        ui.weak(format!("{lo:.0}-{hi:.0} nm"));
                    }
                });
                ui.separator();
            }
        });

    // Removals last and from the back so indices stay valid.
    actions.sort_by_key(|a| match a {
        EntryAction::Commit(i) => (0, *i),
        EntryAction::Remove(i) => (1, usize::MAX - *i),
    });
    for action in actions {
        match action {
            EntryAction::Commit(i) => state.commit_multiplier(i),
            EntryAction::Remove(i) => state.remove(i),
        }
    }
}

fn metrics_readout(ui: &mut Ui, state: &AppState) {
    let report = &state.report;
    egui::Grid::new("ppf_grid")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            for (label, value) in report.ppf_rows() {
                ui.label(label);
                ui.label(RichText::new(format!("{value} μmol/s")).strong());
                ui.end_row();
            }
            if let Some(cct) = report.cct {
                ui.label("CCT");
                ui.label(RichText::new(format_cct(cct)).strong());
                ui.end_row();
            }
        });
    if report.interpolated {
        ui.weak("Spectra use different wavelength grids; summed by interpolation.");
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let has_data = !state.composite.curve.is_empty();
            if ui
                .add_enabled(has_data, egui::Button::new("Export PPF table…"))
                .clicked()
            {
                save_dialog(state, "ppf.csv", |s, p| s.export_ppf(p));
                ui.close_menu();
            }
            if ui
                .add_enabled(has_data, egui::Button::new("Export composite…"))
                .clicked()
            {
                save_dialog(state, "composite.csv", |s, p| s.export_composite(p));
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Clear all").clicked() {
                state.clear();
                ui.close_menu();
            }
        });

        ui.menu_button("Settings", |ui: &mut Ui| settings_menu(ui, state));

        ui.separator();
        ui.label(format!(
            "{} / {} spectra loaded",
            state.entries.len(),
            state.settings.max_spectra
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

fn settings_menu(ui: &mut Ui, state: &mut AppState) {
    let mut settings = state.settings.clone();

    ui.label("Bands");
    ui.radio_value(&mut settings.band_set, BandPreset::Three, "Blue / green / red");
    ui.radio_value(&mut settings.band_set, BandPreset::Six, "Six colour bands");
    if let BandPreset::Custom(bands) = &settings.band_set {
        ui.weak(format!("Custom ({} bands, from config)", bands.len()));
    }
    ui.separator();

    ui.label("Integration");
    ui.radio_value(
        &mut settings.integration,
        IntegrationMethod::Riemann,
        "Per-sample sum",
    );
    ui.radio_value(
        &mut settings.integration,
        IntegrationMethod::Trapezoidal,
        "Trapezoidal",
    );
    ui.separator();

    ui.checkbox(&mut settings.show_cct, "Show CCT");
    ui.checkbox(&mut settings.normalize_each, "Normalise individual spectra");

    if settings != state.settings {
        state.set_settings(settings);
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let files = rfd::FileDialog::new()
        .set_title("Open spectra")
        .add_filter("Supported files", &["csv", "txt", "dat", "tsv"])
        .add_filter("CSV", &["csv"])
        .add_filter("Text", &["txt", "dat", "tsv"])
        .pick_files();

    if let Some(paths) = files {
        state.load_paths(&paths);
    }
}

fn save_dialog(
    state: &mut AppState,
    default_name: &str,
    export: impl FnOnce(&AppState, &std::path::Path) -> anyhow::Result<()>,
) {
    let file = rfd::FileDialog::new()
        .set_file_name(default_name)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match export(state, &path) {
            Ok(()) => state.status_message = None,
            Err(e) => {
                log::error!("Export failed: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
