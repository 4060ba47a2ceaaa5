// src/gui/components/team_panel.rs
//
// Left panel: canonical teams with a filter box. Clicking a team selects it
// as the link target for the resolve form and lists its known aliases.

use eframe::egui;
use crate::core::normalize;
use crate::gui::app::App;

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let Some(conformer) = app.conformer.as_ref() else {
        ui.heading("Teams");
        ui.weak("No stores loaded");
        return;
    };

    ui.heading(format!("Teams ({})", conformer.team_count()));
    ui.add(egui::TextEdit::singleline(&mut app.state.gui.team_filter).hint_text("Filter"));
    ui.separator();

    // Filter on the lookup key so "gryf" finds "Gryffindor"
    let needle = normalize(&app.state.gui.team_filter);
    let shown: Vec<(u32, String, bool)> = conformer
        .teams()
        .filter(|t| needle.is_empty() || normalize(&t.name).contains(&needle))
        .map(|t| (t.id, t.name.clone(), t.college))
        .collect();

    let selected = app.state.gui.selected_team;
    let aliases: Vec<String> = selected
        .map(|id| conformer.aliases_of(id).into_iter().map(str::to_string).collect())
        .unwrap_or_default();

    let mut clicked = None;
    egui::ScrollArea::vertical()
        .id_salt("teams_panel_scroll")
        .max_height(ui.available_height() * 0.7)
        .show(ui, |ui| {
            let w = ui.available_width();
            ui.set_min_width(w);

            for (id, name, college) in &shown {
                let label = format!("{id:>4}  {name}{}", if *college { "  (college)" } else { "" });
                if ui.selectable_label(selected == Some(*id), label).clicked() {
                    clicked = Some(*id);
                }
            }
        });

    if let Some(id) = clicked {
        app.state.gui.selected_team = if selected == Some(id) { None } else { Some(id) };
        tracing::debug!("UI: team selection → {:?}", app.state.gui.selected_team);
    }

    if selected.is_some() {
        ui.separator();
        ui.strong("Aliases");
        egui::ScrollArea::vertical()
            .id_salt("aliases_scroll")
            .show(ui, |ui| {
                if aliases.is_empty() {
                    ui.weak("none");
                }
                for a in &aliases {
                    ui.monospace(a.as_str());
                }
            });
    }
}
