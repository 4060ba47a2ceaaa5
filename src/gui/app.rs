// src/gui/app.rs
use std::{ error::Error, path::Path };

use eframe::egui;

use crate::{
    config::{ consts::OPTIONS_FILE, options::AppOptions, state::AppState },
    conformer::{ Conformer, TeamId },
    error::ResolveError,
    resolve::{ Resolution, Resolver },
};

pub fn run(options: eframe::NativeOptions) -> Result<(), Box<dyn Error>> {
    let app_options = AppOptions::load(Path::new(OPTIONS_FILE))?;
    crate::log::init(&app_options.log)?;

    eframe::run_native(
        "Quidditch Name Conformer",
        options,
        Box::new(|_cc| Ok(Box::new(App::new(AppState::new(app_options))))),
    )?;
    Ok(())
}

/// One looked-up raw name as shown in the table.
#[derive(Clone, Debug)]
pub struct LookupRow {
    pub raw: String,
    pub key: String,
    pub canonical: Option<String>,
    pub id: Option<TeamId>,
}

/// Answer typed into the resolve form.
#[derive(Clone, Debug, Default)]
pub struct ResolveForm {
    pub canonical: String,
    pub college: bool,
}

/// The form's answer, handed to the Conformer as a one-shot resolver.
struct FormAnswer(Option<Resolution>);

impl Resolver for FormAnswer {
    fn resolve(&mut self, _raw: &str, _normalized: &str) -> Result<Resolution, ResolveError> {
        Ok(self.0.take().unwrap_or(Resolution::Skip))
    }
}

pub struct App {
    pub state: AppState,

    // None while the stores failed to load; `status` says why
    pub conformer: Option<Conformer>,

    // pasted raw names and their lookups
    pub raw_input: String,
    pub rows: Vec<LookupRow>,

    pub form: ResolveForm,
    pub status: String,
}

impl App {
    pub fn new(state: AppState) -> Self {
        let mut app = Self {
            state,
            conformer: None,
            raw_input: s!(),
            rows: Vec::new(),
            form: ResolveForm::default(),
            status: s!("Idle"),
        };
        app.reload();
        app
    }

    /// (Re)open the stores. The old instance goes first so its lock is released.
    pub fn reload(&mut self) {
        self.conformer = None;
        match Conformer::open(&self.state.options.store) {
            Ok(c) => {
                self.status = format!("Loaded {} teams, {} aliases", c.team_count(), c.alias_count());
                tracing::info!("UI: {}", self.status);
                self.conformer = Some(c);
            }
            Err(e) => {
                self.status = format!("Load failed: {e}");
                tracing::error!("UI: {}", self.status);
            }
        }
        self.rebuild_rows();
    }

    /// Re-run every pasted line through the index (no prompting).
    pub fn rebuild_rows(&mut self) {
        let Some(conformer) = self.conformer.as_ref() else {
            self.rows.clear();
            return;
        };

        let mut seen = std::collections::HashSet::new();
        self.rows = self.raw_input
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && seen.insert(l.to_string()))
            .map(|raw| LookupRow {
                raw: raw.to_string(),
                key: conformer.key_for(raw),
                canonical: conformer.conform(raw).map(str::to_string),
                id: conformer.get_id(raw),
            })
            .collect();

        let unresolved = self.rows.iter().filter(|r| r.canonical.is_none()).count();
        tracing::debug!("UI: lookup {} names, {} unresolved", self.rows.len(), unresolved);

        if let Some(ix) = self.state.gui.selected_row {
            if ix >= self.rows.len() { self.state.gui.selected_row = None; }
        }
    }

    pub fn selected_row(&self) -> Option<&LookupRow> {
        self.state.gui.selected_row.and_then(|ix| self.rows.get(ix))
    }

    /// Resolve the selected row through the Conformer with the given answer.
    pub fn resolve_selected(&mut self, answer: Resolution) {
        let Some(raw) = self.selected_row().map(|r| r.raw.clone()) else { return };
        let Some(conformer) = self.conformer.as_mut() else { return };

        let mut resolver = FormAnswer(Some(answer));
        self.status = match conformer.conform_or_resolve(&raw, &mut resolver) {
            Ok(Some(canonical)) => format!("'{raw}' → {canonical}"),
            Ok(None) => format!("'{raw}' left unresolved"),
            Err(e) => format!("Resolve failed: {e}"),
        };
        tracing::info!("UI: {}", self.status);

        self.form = ResolveForm::default();
        self.rebuild_rows();
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(self.status.as_str());
        });

        egui::SidePanel::left("teams")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                crate::gui::components::team_panel::draw(ui, self);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            crate::gui::components::lookup_bar::draw(ui, self);

            ui.separator();

            crate::gui::components::resolve_form::draw(ui, self);

            ui.separator();

            crate::gui::components::lookup_table::draw(ui, self);
        });
    }
}
