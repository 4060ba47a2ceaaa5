// src/config/state.rs
use super::options::AppOptions;

#[derive(Clone, Debug)]
pub struct GuiState {
    pub window_w: u32,
    pub window_h: u32,

    /// Filter text for the team list on the left
    pub team_filter: String,

    /// Team highlighted in the left panel
    pub selected_team: Option<u32>,

    /// Row of the lookup table being resolved
    pub selected_row: Option<usize>,

    /// Lookup table -> show/hide the normalized column
    pub show_normalized: bool,
}

impl Default for GuiState {
    fn default() -> Self {
        Self {
            window_w: 1000,
            window_h: 680,
            team_filter: s!(),
            selected_team: None,
            selected_row: None,
            show_normalized: true,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub options: AppOptions,
    pub gui: GuiState,
}

impl AppState {
    pub fn new(options: AppOptions) -> Self {
        Self { options, gui: GuiState::default() }
    }
}
