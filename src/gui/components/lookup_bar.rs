// src/gui/components/lookup_bar.rs
//
// Paste box for raw names (one per line) plus Look up / Reload actions.

use eframe::egui;
use crate::gui::app::App;

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    ui.label("Raw team names, one per line:");
    let edit = ui.add(
        egui::TextEdit::multiline(&mut app.raw_input)
            .desired_rows(6)
            .desired_width(f32::INFINITY)
            .font(egui::TextStyle::Monospace)
            .hint_text("Gryffindor\nGRYF\nHogwarts Gryffindor QC"),
    );

    ui.horizontal(|ui| {
        let look_up = ui.button("Look up").clicked();
        if look_up || edit.lost_focus() {
            app.rebuild_rows();
            let unresolved = app.rows.iter().filter(|r| r.canonical.is_none()).count();
            app.status = format!("{} names, {} unresolved", app.rows.len(), unresolved);
        }

        if ui.button("Clear").clicked() {
            app.raw_input.clear();
            app.state.gui.selected_row = None;
            app.rebuild_rows();
        }

        if ui.button("Reload stores").clicked() {
            app.reload();
        }

        ui.checkbox(&mut app.state.gui.show_normalized, "Show lookup keys");
    });
}
