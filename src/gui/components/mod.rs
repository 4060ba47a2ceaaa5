// src/gui/components/mod.rs
pub mod lookup_bar;
pub mod lookup_table;
pub mod resolve_form;
pub mod team_panel;
