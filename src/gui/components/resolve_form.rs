// src/gui/components/resolve_form.rs
//
// Resolves the selected unresolved row: either a new canonical team, or a
// link to the team highlighted in the left panel.

use eframe::egui;
use crate::gui::app::App;
use crate::resolve::Resolution;

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let Some(row) = app.selected_row().cloned() else {
        ui.weak("Select an unresolved name in the table to resolve it.");
        return;
    };

    if let Some(canonical) = &row.canonical {
        ui.label(format!("'{}' already resolves to {}", row.raw, canonical));
        return;
    }

    ui.label(egui::RichText::new(format!("Resolve '{}'  (key {})", row.raw, row.key)).strong());

    let mut answer = None;

    ui.horizontal(|ui| {
        ui.label("Canonical name:");
        ui.add(egui::TextEdit::singleline(&mut app.form.canonical).desired_width(260.0));
        ui.checkbox(&mut app.form.college, "College");

        let ready = !app.form.canonical.trim().is_empty();
        if ui.add_enabled(ready, egui::Button::new("Add team")).clicked() {
            answer = Some(Resolution::new_team(app.form.canonical.trim(), app.form.college));
        }
    });

    let target = app.state.gui.selected_team.and_then(|id| {
        app.conformer.as_ref().and_then(|c| c.team(id)).map(|t| (t.id, t.name.clone()))
    });
    ui.horizontal(|ui| match &target {
        Some((id, name)) => {
            if ui.button(format!("Link to {name} (#{id})")).clicked() {
                answer = Some(Resolution::Existing(*id));
            }
        }
        None => {
            ui.weak("…or pick a team on the left to link this name to it.");
        }
    });

    if let Some(answer) = answer {
        app.resolve_selected(answer);
    }
}
