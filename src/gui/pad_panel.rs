//! Per-port gamepad binding panel.

use eframe::egui;
use padmap::bindings_list::BindingsList;
use padmap::capture::CaptureTarget;
use padmap::config::PadConfig;
use padmap::error::BindError;
use padmap::keys::KeyCode;
use padmap::pad::{PadControl, PadType, pad_name};
use tracing::{info, warn};

/// User request coming out of one frame of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    Rebind(PadControl),
    CancelCapture,
    Delete(KeyCode),
    Populate(PadType),
}

/// Binding screen for one (port, slot) socket.
pub struct GamepadPanel {
    port: usize,
    slot: usize,
    title: String,
    list: BindingsList,
    pad_type: PadType,
}

impl GamepadPanel {
    pub fn new(port: usize, slot: usize, config: &PadConfig) -> Self {
        let mut panel = Self {
            port,
            slot,
            title: pad_name(port, slot),
            list: BindingsList::new(port),
            pad_type: config.port(port).map(|p| p.pad_type).unwrap_or_default(),
        };
        if let Err(e) = panel.refresh(config) {
            warn!(port, error = %e, "panel created for unconfigured port");
        }
        panel
    }

    pub fn port(&self) -> usize {
        self.port
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Rebuilds the bindings list from `config`.
    pub fn refresh(&mut self, config: &PadConfig) -> Result<(), BindError> {
        self.list.refresh(config)?;
        self.pad_type = config.port(self.port)?.pad_type;
        Ok(())
    }

    /// Fills the port's bindings for `pad_type` and refreshes the list.
    pub fn populate(
        &mut self,
        config: &mut PadConfig,
        port: usize,
        slot: usize,
        pad_type: PadType,
    ) -> Result<(), BindError> {
        info!(port, slot, ?pad_type, "quick setup");
        config.populate(port, pad_type)?;
        self.refresh(config)
    }

    /// Renders the panel. Mutations are returned, not applied.
    ///
    /// `just_captured` is set on the frame a capture finished; the key that
    /// ended it may also activate the focused control button.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        config: &PadConfig,
        status: &str,
        capturing: Option<CaptureTarget>,
        just_captured: bool,
    ) -> Option<PanelAction> {
        let mut action = None;
        let port = self.port;
        let bound_key = move |control: PadControl| {
            config
                .port(port)
                .ok()
                .and_then(|p| p.bindings.key_for(control))
        };
        let target = capturing
            .filter(|t| t.port == self.port)
            .map(|t| t.control);

        ui.horizontal_top(|ui| {
            ui.vertical(|ui| {
                ui.set_width(360.0);
                self.show_list(ui);
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    let selected = self.list.selected_row().map(|r| r.key);
                    if ui
                        .add_enabled(selected.is_some(), egui::Button::new("Delete"))
                        .clicked()
                        && let Some(key) = selected
                    {
                        action = Some(PanelAction::Delete(key));
                    }

                    let mut pad_type = self.pad_type;
                    egui::ComboBox::from_id_salt(("pad_type", self.port, self.slot))
                        .selected_text(pad_type.display_name())
                        .show_ui(ui, |ui| {
                            for &t in PadType::all() {
                                ui.selectable_value(&mut pad_type, t, t.display_name());
                            }
                        });
                    if pad_type != self.pad_type {
                        self.pad_type = pad_type;
                        action = Some(PanelAction::Populate(pad_type));
                    }
                    if ui.button("Quick Setup").clicked() {
                        action = Some(PanelAction::Populate(self.pad_type));
                    }
                });
            });

            ui.vertical(|ui| {
                egui::Frame::NONE
                    .fill(ui.visuals().extreme_bg_color)
                    .corner_radius(egui::CornerRadius::same(8))
                    .inner_margin(egui::Margin::same(6))
                    .show(ui, |ui| {
                        ui.set_min_width(400.0);
                        ui.vertical_centered(|ui| ui.label(status));
                    });
                ui.add_space(8.0);

                let mut button = |ui: &mut egui::Ui, control: PadControl| {
                    control_button(
                        ui,
                        control,
                        bound_key(control),
                        target,
                        just_captured,
                        &mut action,
                    );
                };
                egui::Grid::new(("control_grid", self.port, self.slot))
                    .num_columns(2)
                    .spacing([10.0, 10.0])
                    .show(ui, |ui| {
                        group(ui, "Shoulder Buttons", |ui| {
                            egui::Grid::new(("shoulder", self.port))
                                .num_columns(2)
                                .show(ui, |ui| {
                                    button(ui, PadControl::L1);
                                    button(ui, PadControl::R1);
                                    ui.end_row();
                                    button(ui, PadControl::L2);
                                    button(ui, PadControl::R2);
                                    ui.end_row();
                                });
                        });
                        group(ui, "", |ui| {
                            egui::Grid::new(("select", self.port))
                                .num_columns(2)
                                .show(ui, |ui| {
                                    button(ui, PadControl::Select);
                                    button(ui, PadControl::Start);
                                    ui.end_row();
                                    ui.add_enabled(false, egui::Button::new("Analog"));
                                    ui.add_enabled(false, egui::Button::new("Mouse"));
                                    ui.end_row();
                                });
                        });
                        ui.end_row();

                        group(ui, "D-Pad", |ui| {
                            cross(ui, DPAD, None, &mut button);
                        });
                        group(ui, "Face Buttons", |ui| {
                            cross(ui, FACE, None, &mut button);
                        });
                        ui.end_row();

                        group(ui, "Left Analog Stick", |ui| {
                            cross(ui, LEFT_STICK, Some(PadControl::L3), &mut button);
                        });
                        group(ui, "Right Analog Stick", |ui| {
                            cross(ui, RIGHT_STICK, Some(PadControl::R3), &mut button);
                        });
                        ui.end_row();
                    });

                if target.is_some() {
                    ui.add_space(8.0);
                    if ui.button("Cancel").clicked() {
                        action = Some(PanelAction::CancelCapture);
                    }
                }
            });
        });

        action
    }

    fn show_list(&mut self, ui: &mut egui::Ui) {
        let mut clicked = None;
        egui::ScrollArea::vertical()
            .id_salt(("bindings", self.port, self.slot))
            .max_height(400.0)
            .show(ui, |ui| {
                egui::Grid::new(("bindings_grid", self.port, self.slot))
                    .num_columns(3)
                    .min_col_width(110.0)
                    .striped(true)
                    .show(ui, |ui| {
                        ui.strong("Device");
                        ui.strong("PC");
                        ui.strong("PS2");
                        ui.end_row();

                        for (i, row) in self.list.rows().iter().enumerate() {
                            let selected = self.list.selected() == Some(i);
                            if ui.selectable_label(selected, row.device).clicked() {
                                clicked = Some(i);
                            }
                            ui.label(&row.key_name);
                            ui.label(row.control_label);
                            ui.end_row();
                        }
                    });
            });
        if let Some(i) = clicked {
            self.list.select(Some(i));
        }
    }
}

fn group(ui: &mut egui::Ui, title: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
    ui.group(|ui| {
        ui.vertical(|ui| {
            if !title.is_empty() {
                ui.label(egui::RichText::new(title).strong());
            }
            add_contents(ui);
        });
    });
}

const DPAD: [PadControl; 4] = [
    PadControl::Up,
    PadControl::Left,
    PadControl::Right,
    PadControl::Down,
];
const FACE: [PadControl; 4] = [
    PadControl::Triangle,
    PadControl::Square,
    PadControl::Circle,
    PadControl::Cross,
];
const LEFT_STICK: [PadControl; 4] = [
    PadControl::LStickUp,
    PadControl::LStickLeft,
    PadControl::LStickRight,
    PadControl::LStickDown,
];
const RIGHT_STICK: [PadControl; 4] = [
    PadControl::RStickUp,
    PadControl::RStickLeft,
    PadControl::RStickRight,
    PadControl::RStickDown,
];

/// Up, left/right, down arrangement, with an optional press button centred.
fn cross(
    ui: &mut egui::Ui,
    [up, left, right, down]: [PadControl; 4],
    center: Option<PadControl>,
    button: &mut dyn FnMut(&mut egui::Ui, PadControl),
) {
    ui.vertical_centered(|ui| button(ui, up));
    ui.horizontal(|ui| {
        button(ui, left);
        if let Some(c) = center {
            button(ui, c);
        }
        button(ui, right);
    });
    ui.vertical_centered(|ui| button(ui, down));
}

fn control_button(
    ui: &mut egui::Ui,
    control: PadControl,
    key: Option<KeyCode>,
    target: Option<PadControl>,
    just_captured: bool,
    action: &mut Option<PanelAction>,
) {
    let text = button_text(control);
    let hover = match key {
        Some(k) => format!("{} = {}", control.label(), k),
        None => format!("{} is not bound", control.label()),
    };
    let response = ui
        .add_enabled(
            target.is_none() || target == Some(control),
            egui::Button::new(text).selected(target == Some(control)),
        )
        .on_hover_text(hover);
    if let Some(rebind) = rebind_request(response.clicked(), control, target, just_captured) {
        *action = Some(rebind);
    }
}

/// Rebind action for a clicked control button, if the click may start one.
fn rebind_request(
    clicked: bool,
    control: PadControl,
    target: Option<PadControl>,
    just_captured: bool,
) -> Option<PanelAction> {
    (clicked && target.is_none() && !just_captured).then_some(PanelAction::Rebind(control))
}

/// Stick directions are labelled by direction only; the group names the stick.
fn button_text(control: PadControl) -> &'static str {
    match control {
        PadControl::Up | PadControl::LStickUp | PadControl::RStickUp => "Up",
        PadControl::Down | PadControl::LStickDown | PadControl::RStickDown => "Down",
        PadControl::Left | PadControl::LStickLeft | PadControl::RStickLeft => "Left",
        PadControl::Right | PadControl::LStickRight | PadControl::RStickRight => "Right",
        other => other.label(),
    }
}
