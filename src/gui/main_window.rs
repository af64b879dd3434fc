// Main window implementation

use crate::gui::PadmapGui;
use crate::gui::pad_panel::{GamepadPanel, PanelAction};
use crate::gui::utils::{key_to_code, pressed_modifiers};
use eframe::egui;
use padmap::capture::CaptureEvent;
use padmap::config::PadConfig;
use padmap::rebind::RebindOutcome;
use tracing::{error, info, warn};

impl eframe::App for PadmapGui {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.config.dark_mode {
            ctx.set_visuals(self.cached_dark_visuals.clone());
        } else {
            ctx.set_visuals(self.cached_light_visuals.clone());
        }

        self.forward_capture_input(ctx);
        self.just_captured = self.poll_rebinder();
        if self.rebinder.is_capturing() {
            // keep polling for the key and the timeout while idle
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        }

        self.handle_close_request(ctx);
        self.render_top_bar(ctx);
        self.render_main_content(ctx);
    }
}

impl PadmapGui {
    /// Sends this frame's key presses to the capture queue.
    fn forward_capture_input(&mut self, ctx: &egui::Context) {
        let (events, modifiers) = ctx.input(|i| {
            let keys: Vec<egui::Key> = i
                .events
                .iter()
                .filter_map(|e| match e {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        repeat: false,
                        ..
                    } => Some(*key),
                    _ => None,
                })
                .collect();
            (keys, i.modifiers)
        });
        let newly_held = pressed_modifiers(self.last_modifiers, modifiers);
        self.last_modifiers = modifiers;

        if !self.rebinder.is_capturing() {
            return;
        }

        let sender = self.rebinder.sender();
        let codes = newly_held
            .into_iter()
            .chain(events.into_iter().filter_map(key_to_code));
        for code in codes {
            if sender.send(CaptureEvent::from_key(code)).is_err() {
                error!("capture queue closed");
                return;
            }
        }
    }

    /// Applies a finished capture. Returns whether one finished this frame.
    fn poll_rebinder(&mut self) -> bool {
        match self.rebinder.poll(&mut self.config) {
            Ok(None) => return false,
            Ok(Some(RebindOutcome::Bound {
                port,
                control,
                key,
                change,
            })) => {
                self.dirty = true;
                self.message = change
                    .displaced
                    .map(|other| format!("{} moved from {} to {}", key, other, control));
                self.refresh_port(port);
            }
            Ok(Some(RebindOutcome::Cancelled)) => self.message = None,
            Ok(Some(RebindOutcome::TimedOut)) => {
                self.message = Some("No key pressed, binding unchanged.".to_string());
            }
            Err(e) => self.message = Some(e.to_string()),
        }
        true
    }

    fn refresh_port(&mut self, port: usize) {
        for panel in self.panels.iter_mut().filter(|p| p.port() == port) {
            if let Err(e) = panel.refresh(&self.config) {
                warn!(port, error = %e, "refresh failed");
            }
        }
    }

    fn apply_panel_action(&mut self, action: PanelAction) {
        let Some(panel) = self.panels.get_mut(self.active_panel) else {
            return;
        };
        let port = panel.port();
        let result = match action {
            PanelAction::Rebind(control) => {
                self.message = None;
                self.rebinder.start(&self.config, port, control).map(|_| ())
            }
            PanelAction::CancelCapture => {
                self.rebinder.cancel();
                Ok(())
            }
            PanelAction::Delete(key) => {
                let removed = self.config.unbind_key(port, key);
                if let Ok(Some(control)) = removed {
                    info!(port, %key, %control, "binding deleted");
                    self.dirty = true;
                }
                removed.and_then(|_| panel.refresh(&self.config))
            }
            PanelAction::Populate(pad_type) => {
                let slot = panel.slot();
                let result = panel.populate(&mut self.config, port, slot, pad_type);
                if result.is_ok() {
                    self.dirty = true;
                }
                result
            }
        };
        if let Err(e) = result {
            self.message = Some(e.to_string());
        }
    }

    fn save(&mut self) {
        match self.config.save_to_file(&self.config_path) {
            Ok(()) => {
                self.dirty = false;
                self.message = Some(format!("Saved to {}", self.config_path.display()));
            }
            Err(e) => {
                error!(error = %e, "save failed");
                self.message = Some(format!("Save failed: {e:#}"));
            }
        }
    }

    fn reload(&mut self) {
        match PadConfig::load_from_file(&self.config_path) {
            Ok(config) => {
                let port = self
                    .panels
                    .get(self.active_panel)
                    .map(|p| p.port())
                    .unwrap_or(0);
                *self = PadmapGui::new(config, self.config_path.clone(), port);
                self.message = Some("Configuration reloaded.".to_string());
            }
            Err(e) => self.message = Some(format!("Reload failed: {e:#}")),
        }
    }

    fn import_bindings(&mut self) {
        let Some(port) = self.panels.get(self.active_panel).map(GamepadPanel::port) else {
            return;
        };
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Bindings", &["toml"])
            .set_title("Import Bindings")
            .pick_file()
        {
            match self.config.import_port(port, &path) {
                Ok(()) => {
                    self.dirty = true;
                    self.refresh_port(port);
                }
                Err(e) => self.message = Some(format!("Import failed: {e:#}")),
            }
        }
    }

    fn export_bindings(&mut self) {
        let Some(port) = self.panels.get(self.active_panel).map(GamepadPanel::port) else {
            return;
        };
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Bindings", &["toml"])
            .set_title("Export Bindings")
            .set_file_name("bindings.toml")
            .save_file()
            && let Err(e) = self.config.export_port(port, &path)
        {
            self.message = Some(format!("Export failed: {e:#}"));
        }
    }

    // Ask before dropping unsaved edits
    fn handle_close_request(&mut self, ctx: &egui::Context) {
        if self.dirty && ctx.input(|i| i.viewport().close_requested()) {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.show_close_dialog = true;
        }

        if self.show_close_dialog {
            self.render_close_dialog(ctx);
        }
    }

    fn render_close_dialog(&mut self, ctx: &egui::Context) {
        egui::Window::new("Unsaved changes")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Bindings were changed since the last save.");
                ui.add_space(10.0);
                ui.horizontal(|ui| {
                    if ui.button("Save and Exit").clicked() {
                        self.show_close_dialog = false;
                        self.save();
                        if !self.dirty {
                            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    }
                    if ui.button("Discard").clicked() {
                        self.show_close_dialog = false;
                        self.dirty = false;
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                    if ui.button("Cancel").clicked() {
                        self.show_close_dialog = false;
                    }
                });
            });
    }

    // Render tabs, theme toggle and file actions
    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                let capturing = self.rebinder.is_capturing();
                for (i, panel) in self.panels.iter().enumerate() {
                    let tab = ui.add_enabled(
                        !capturing,
                        egui::Button::new(panel.title()).selected(i == self.active_panel),
                    );
                    if tab.clicked() {
                        self.active_panel = i;
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let theme_text = if self.config.dark_mode { "Light" } else { "Dark" };
                    if ui.button(theme_text).clicked() {
                        self.config.dark_mode = !self.config.dark_mode;
                        self.dirty = true;
                    }
                    ui.add_enabled_ui(!capturing, |ui| {
                        if ui.button("Export").clicked() {
                            self.export_bindings();
                        }
                        if ui.button("Import").clicked() {
                            self.import_bindings();
                        }
                        if ui.button("Reload").clicked() {
                            self.reload();
                        }
                        let save_text = if self.dirty { "Save *" } else { "Save" };
                        if ui.button(save_text).clicked() {
                            self.save();
                        }
                    });
                });
            });
            if let Some(message) = &self.message {
                ui.label(
                    egui::RichText::new(message).color(egui::Color32::from_rgb(230, 150, 60)),
                );
            }
            ui.add_space(4.0);
        });
    }

    // Render the active binding panel
    fn render_main_content(&mut self, ctx: &egui::Context) {
        let action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                let Some(panel) = self.panels.get_mut(self.active_panel) else {
                    ui.label("No ports configured.");
                    return None;
                };
                panel.show(
                    ui,
                    &self.config,
                    self.rebinder.status(),
                    self.rebinder.target(),
                    self.just_captured,
                )
            })
            .inner;

        if let Some(action) = action {
            self.apply_panel_action(action);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use padmap::keys::KeyCode;
    use padmap::pad::{PadControl, PadType};
    use std::path::PathBuf;

    fn gui() -> PadmapGui {
        PadmapGui::new(PadConfig::default(), PathBuf::from("unused.toml"), 0)
    }

    #[test]
    fn test_populate_marks_dirty() {
        let mut gui = gui();
        gui.apply_panel_action(PanelAction::Populate(PadType::Unplugged));
        assert!(gui.dirty);
        assert!(gui.config.port(0).unwrap().bindings.is_empty());
    }

    #[test]
    fn test_failed_populate_keeps_clean() {
        let mut gui = gui();
        gui.config.ports.retain(|p| p.port != 0);

        gui.apply_panel_action(PanelAction::Populate(PadType::DualShock2));
        assert!(!gui.dirty);
        assert!(gui.message.is_some());
    }

    #[test]
    fn test_poll_reports_finished_capture() {
        let mut gui = gui();
        assert!(!gui.poll_rebinder());

        gui.apply_panel_action(PanelAction::Rebind(PadControl::L3));
        assert!(!gui.poll_rebinder());

        gui.rebinder
            .sender()
            .send(CaptureEvent::Key(KeyCode(0x0D)))
            .unwrap();
        assert!(gui.poll_rebinder());
        assert!(!gui.rebinder.is_capturing());
        assert!(gui.dirty);
    }
}
