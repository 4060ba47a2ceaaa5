// src/bin/gui.rs
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]
use qd_conform::{ config::state::GuiState, gui };
use eframe::egui::{ IconData, ViewportBuilder };

/// Gold disc on transparent background.
fn app_icon() -> IconData {
    const N: u32 = 32;
    let c = (N as f32 - 1.0) / 2.0;
    let mut rgba = Vec::with_capacity((N * N * 4) as usize);
    for y in 0..N {
        for x in 0..N {
            let d = ((x as f32 - c).powi(2) + (y as f32 - c).powi(2)).sqrt();
            let px = if d <= c - 1.0 { [0xF0, 0xC8, 0x28, 0xFF] } else { [0, 0, 0, 0] };
            rgba.extend_from_slice(&px);
        }
    }
    IconData { rgba, width: N, height: N }
}

fn main() {
    let gui_state = GuiState::default();
    let options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_icon(app_icon())
            .with_inner_size([gui_state.window_w as f32, gui_state.window_h as f32]),
        ..Default::default()
    };

    if let Err(e) = gui::run(options) {
        eprintln!("GUI failed: {}", e);
        std::process::exit(1);
    }
}
