//! GUI module for application interface components.
//!
//! This module provides the graphical user interface using the `egui` framework:
//! the main window with one binding panel per port, and the error dialog.

mod error_dialog;
mod main_window;
mod pad_panel;
mod utils;

use std::path::PathBuf;

use eframe::egui;
use padmap::config::PadConfig;
use padmap::rebind::KeyRebinder;

use crate::gui::pad_panel::GamepadPanel;

pub use error_dialog::show_error;

/// Main GUI application structure.
pub struct PadmapGui {
    /// Configuration being edited
    config: PadConfig,
    /// File the configuration is saved to
    config_path: PathBuf,
    /// One panel per configured socket
    panels: Vec<GamepadPanel>,
    /// Index into `panels` of the visible tab
    active_panel: usize,
    /// Capture and apply of key presses
    rebinder: KeyRebinder,
    /// Modifier state seen on the previous frame
    last_modifiers: egui::Modifiers,
    /// A capture finished this frame; control buttons ignore clicks
    just_captured: bool,
    /// Unsaved edits exist
    dirty: bool,
    /// Close confirmation dialog visibility
    show_close_dialog: bool,
    /// Last error or notice, shown under the tabs
    message: Option<String>,
    /// Cached dark theme visuals
    cached_dark_visuals: egui::Visuals,
    /// Cached light theme visuals
    cached_light_visuals: egui::Visuals,
}

impl PadmapGui {
    /// Creates a new GUI instance for `config`, opening on `initial_port`.
    pub fn new(config: PadConfig, config_path: PathBuf, initial_port: usize) -> Self {
        let panels: Vec<GamepadPanel> = config
            .ports
            .iter()
            .map(|p| GamepadPanel::new(p.port, p.slot, &config))
            .collect();
        let active_panel = panels
            .iter()
            .position(|p| p.port() == initial_port)
            .unwrap_or(0);
        let rebinder = KeyRebinder::from_config(&config);

        Self {
            config,
            config_path,
            panels,
            active_panel,
            rebinder,
            last_modifiers: egui::Modifiers::NONE,
            just_captured: false,
            dirty: false,
            show_close_dialog: false,
            message: None,
            cached_dark_visuals: Self::create_dark_visuals(),
            cached_light_visuals: Self::create_light_visuals(),
        }
    }

    /// Creates dark theme visuals configuration.
    fn create_dark_visuals() -> egui::Visuals {
        let mut visuals = egui::Visuals::dark();

        visuals.widgets.inactive.corner_radius = egui::CornerRadius::same(6);
        visuals.widgets.hovered.corner_radius = egui::CornerRadius::same(6);
        visuals.widgets.active.corner_radius = egui::CornerRadius::same(6);
        visuals.widgets.noninteractive.corner_radius = egui::CornerRadius::same(4);

        visuals.window_fill = egui::Color32::from_rgb(25, 27, 35);
        visuals.panel_fill = egui::Color32::from_rgb(30, 32, 40);
        visuals.extreme_bg_color = egui::Color32::from_rgb(42, 44, 55);

        visuals
    }

    /// Creates light theme visuals configuration.
    fn create_light_visuals() -> egui::Visuals {
        let mut visuals = egui::Visuals::light();

        visuals.widgets.inactive.corner_radius = egui::CornerRadius::same(6);
        visuals.widgets.hovered.corner_radius = egui::CornerRadius::same(6);
        visuals.widgets.active.corner_radius = egui::CornerRadius::same(6);
        visuals.widgets.noninteractive.corner_radius = egui::CornerRadius::same(4);

        visuals.window_fill = egui::Color32::from_rgb(244, 244, 248);
        visuals.panel_fill = egui::Color32::from_rgb(240, 240, 245);
        visuals.extreme_bg_color = egui::Color32::from_rgb(232, 232, 240);

        visuals
    }

    /// Launches the GUI application.
    ///
    /// # Errors
    ///
    /// Returns an error if the GUI framework fails to initialize or run.
    pub fn run(
        config: PadConfig,
        config_path: PathBuf,
        initial_port: usize,
    ) -> anyhow::Result<()> {
        let mut viewport = egui::ViewportBuilder::default()
            .with_inner_size([820.0, 520.0])
            .with_min_inner_size([800.0, 480.0])
            .with_resizable(true)
            .with_title("Gamepad Settings");

        if config.always_on_top {
            viewport = viewport.with_always_on_top();
        }

        let options = eframe::NativeOptions {
            viewport,
            ..Default::default()
        };

        eframe::run_native(
            "padmap",
            options,
            Box::new(move |_cc| {
                Ok(Box::new(PadmapGui::new(
                    config,
                    config_path,
                    initial_port,
                )))
            }),
        )
        .map_err(|e| anyhow::anyhow!("Failed to run GUI: {}", e))
    }
}
