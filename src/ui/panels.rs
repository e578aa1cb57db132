use anyhow::Context;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::aggregate::{distribution_table, Distribution};
use crate::data::export::{
    FILTERED_DIST_EXPORT_NAME, FILTERED_EXPORT_NAME, RAW_DIST_EXPORT_NAME,
};
use crate::data::filter::SELECT_ALL;
use crate::data::model::Table;
use crate::pipeline::{ViewModel, TARGET_COLUMN};
use crate::state::{AppState, GraphKind};
use crate::ui::plot;

const PREVIEW_ROWS: usize = 5;

// ---------------------------------------------------------------------------
// Left side panel – upload and the filter form
// ---------------------------------------------------------------------------

/// Render the sidebar: logo, file upload, and the filter form. The form only
/// feeds the pipeline when "Apply" is pressed; toggling widgets on its own
/// triggers nothing.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    // ---- Logo (centered, optional) ----
    if let Some(uri) = state.logo_uri.clone() {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.add(
                egui::Image::from_uri(uri)
                    .max_width(ui.available_width() * 0.8)
                    .max_height(120.0)
                    .rounding(4.0),
            );
        });
        ui.add_space(4.0);
    } else if state.logo_missing {
        ui.weak("Logo image not found.");
        ui.add_space(4.0);
    }

    ui.heading("Upload the file");
    if ui.button("Open bank marketing data…").clicked() {
        open_file_dialog(state);
    }
    ui.separator();

    if state.view.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    ui.heading("Filters");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Graph type ----
            ui.strong("Graph type");
            ui.horizontal(|ui: &mut Ui| {
                for kind in [GraphKind::Barras, GraphKind::Pizza] {
                    ui.radio_value(&mut state.graph_kind, kind, kind.label());
                }
            });
            ui.separator();

            // ---- Age range (bounds fixed per loaded table) ----
            ui.strong("Age");
            let (min, max) = state.age_bounds;
            ui.add(egui::Slider::new(&mut state.age_selection.0, min..=max).text("from"));
            ui.add(egui::Slider::new(&mut state.age_selection.1, min..=max).text("to"));
            if state.age_selection.1 < state.age_selection.0 {
                state.age_selection.1 = state.age_selection.0;
            }
            ui.separator();

            // ---- Per-column multiselects (collapsible) ----
            let pickers = state.pickers.clone();
            for picker in &pickers {
                let n_selected = state
                    .selections
                    .get(&picker.column)
                    .map_or(0, |s| s.len());
                let header_text = format!("{}  ({n_selected} selected)", picker.label);

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(&picker.column)
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        for value in &picker.values {
                            let mut checked = state.is_selected(&picker.column, value);
                            let label = if value == SELECT_ALL {
                                RichText::new(value).italics()
                            } else {
                                RichText::new(value)
                            };
                            if ui.checkbox(&mut checked, label).changed() {
                                state.toggle_selection(&picker.column, value);
                            }
                        }
                    });
            }

            ui.add_space(8.0);
            if ui.button(RichText::new("Apply").strong()).clicked() {
                state.apply_filters();
            }
        });
}

// ---------------------------------------------------------------------------
// Central panel – previews, distributions, downloads, charts
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    let Some(view) = state.view.clone() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Upload a .csv or .xlsx file to begin");
        });
        return;
    };

    ScrollArea::vertical().show(ui, |ui: &mut Ui| match &view {
        ViewModel::Loaded { raw } => {
            before_section(ui, raw);
            ui.label("Submit the filter form to compare distributions.");
        }

        ViewModel::NoRowsMatched { raw } => {
            before_section(ui, raw);
            ui.colored_label(
                Color32::YELLOW,
                "No rows match the current filters.",
            );
        }

        ViewModel::Filtered {
            raw,
            filtered,
            raw_distribution,
            filtered_distribution,
        } => {
            before_section(ui, raw);

            ui.heading("After filters");
            preview_table(ui, "after", filtered);
            ui.label(format!("{} of {} rows kept", filtered.len(), raw.len()));
            if ui.button("Download filtered table (xlsx)").clicked() {
                save_download(state, filtered, FILTERED_EXPORT_NAME);
            }
            ui.separator();

            ui.heading("Target proportions");
            ui.columns(2, |cols: &mut [Ui]| {
                distribution_section(
                    &mut cols[0],
                    state,
                    "Raw data",
                    raw_distribution,
                    RAW_DIST_EXPORT_NAME,
                );
                distribution_section(
                    &mut cols[1],
                    state,
                    "Filtered data",
                    filtered_distribution,
                    FILTERED_DIST_EXPORT_NAME,
                );
            });
            ui.separator();

            plot::distribution_charts(
                ui,
                state.graph_kind,
                raw_distribution,
                filtered_distribution,
            );
        }
    });
}

fn before_section(ui: &mut Ui, raw: &Table) {
    ui.heading("Before filters");
    preview_table(ui, "before", raw);
    ui.label(format!("{} rows total", raw.len()));
    ui.separator();
}

/// First rows of a table in a striped grid.
fn preview_table(ui: &mut Ui, id: &str, table: &Table) {
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .columns(Column::auto().resizable(true), table.columns.len())
            .header(18.0, |mut header| {
                for name in &table.columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|mut body| {
                for row in table.head(PREVIEW_ROWS) {
                    body.row(16.0, |mut out| {
                        for cell in row {
                            out.col(|ui: &mut Ui| {
                                ui.label(cell.to_string());
                            });
                        }
                    });
                }
            });
    });
}

fn distribution_section(
    ui: &mut Ui,
    state: &mut AppState,
    title: &str,
    dist: &Distribution,
    export_name: &str,
) {
    ui.strong(title);
    egui::Grid::new(export_name).striped(true).show(ui, |ui: &mut Ui| {
        ui.strong(TARGET_COLUMN);
        ui.strong("percent");
        ui.end_row();
        for (label, pct) in dist {
            ui.label(label);
            ui.label(format!("{pct:.2}"));
            ui.end_row();
        }
    });
    if ui.button("Download (xlsx)").clicked() {
        let table = distribution_table(dist, TARGET_COLUMN);
        save_download(state, &table, export_name);
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
        });

        ui.separator();

        match &state.view {
            Some(ViewModel::Filtered { raw, filtered, .. }) => {
                ui.label(format!(
                    "{} rows loaded, {} after filters",
                    raw.len(),
                    filtered.len()
                ));
            }
            Some(ViewModel::Loaded { raw }) | Some(ViewModel::NoRowsMatched { raw }) => {
                ui.label(format!("{} rows loaded", raw.len()));
            }
            None => {}
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open bank marketing data")
        .add_filter("Supported files", &["csv", "xlsx"])
        .add_filter("All files", &["*"])
        .pick_file();

    let Some(path) = file else {
        return;
    };

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();

    match std::fs::read(&path) {
        Ok(bytes) => {
            log::info!("uploading {} ({} bytes)", path.display(), bytes.len());
            state.handle_upload(name, bytes);
        }
        Err(e) => {
            log::error!("failed to read {}: {e}", path.display());
            state.status_message = Some(format!("failed to read {name}: {e}"));
        }
    }
}

/// Ask for a destination and write one export artifact there.
fn save_download(state: &mut AppState, table: &Table, default_name: &str) {
    let Some(path) = rfd::FileDialog::new()
        .set_file_name(default_name)
        .add_filter("Excel", &["xlsx"])
        .save_file()
    else {
        return;
    };

    let result: anyhow::Result<()> = (|| {
        let bytes = state.session.export_xlsx(table)?;
        std::fs::write(&path, bytes.as_slice())
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    })();

    match result {
        Ok(()) => log::info!("saved {}", path.display()),
        Err(e) => {
            log::error!("download failed: {e:#}");
            state.status_message = Some(format!("download failed: {e:#}"));
        }
    }
}
