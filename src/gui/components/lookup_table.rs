// src/gui/components/lookup_table.rs
//
// Raw | Key | Canonical | ID for every pasted name. Unresolved rows are
// highlighted; clicking a row selects it for the resolve form.

use eframe::egui::{ self, Color32, RichText, TextWrapMode };
use egui_extras::{ Column, TableBuilder };
use crate::gui::app::App;

const UNRESOLVED: Color32 = Color32::from_rgb(0xDC, 0x61, 0x49);

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    if app.rows.is_empty() {
        ui.weak("Nothing looked up yet.");
        return;
    }

    let show_key = app.state.gui.show_normalized;
    let selected = app.state.gui.selected_row;
    let mut clicked = None;

    let mut table = TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .min_scrolled_height(0.0)
        .column(Column::initial(240.0).at_least(60.0).clip(true));
    if show_key {
        table = table.column(Column::initial(200.0).at_least(60.0).clip(true));
    }
    table = table
        .column(Column::initial(240.0).at_least(60.0).clip(true))
        .column(Column::remainder().at_least(40.0));

    table
        .header(22.0, |mut header| {
            header.col(|ui| { ui.strong("Raw"); });
            if show_key {
                header.col(|ui| { ui.strong("Key"); });
            }
            header.col(|ui| { ui.strong("Canonical"); });
            header.col(|ui| { ui.strong("ID"); });
        })
        .body(|body| {
            body.rows(20.0, app.rows.len(), |mut row| {
                let ix = row.index();
                let Some(r) = app.rows.get(ix) else { return };

                row.col(|ui| {
                    ui.style_mut().wrap_mode = Some(TextWrapMode::Extend);
                    let mut text = RichText::new(r.raw.as_str());
                    if r.canonical.is_none() { text = text.color(UNRESOLVED); }
                    if ui.selectable_label(selected == Some(ix), text).clicked() {
                        clicked = Some(ix);
                    }
                });
                if show_key {
                    row.col(|ui| { ui.monospace(r.key.as_str()); });
                }
                row.col(|ui| match &r.canonical {
                    Some(c) => { ui.label(c.as_str()); }
                    None => { ui.colored_label(UNRESOLVED, "unresolved"); }
                });
                row.col(|ui| {
                    let id = r.id.map(|id| id.to_string()).unwrap_or_default();
                    ui.label(id);
                });
            });
        });

    if let Some(ix) = clicked {
        app.state.gui.selected_row = if selected == Some(ix) { None } else { Some(ix) };
        app.form = Default::default();
        tracing::debug!("UI: row selection → {:?}", app.state.gui.selected_row);
    }
}
