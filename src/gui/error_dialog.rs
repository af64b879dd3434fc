//! Error dialog for displaying startup errors.

use eframe::egui;

/// Error dialog structure for displaying configuration errors.
struct ErrorDialog {
    /// Error message text
    error_msg: String,
}

impl eframe::App for ErrorDialog {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut visuals = egui::Visuals::dark();
        visuals.window_fill = egui::Color32::from_rgb(32, 34, 45);
        visuals.panel_fill = egui::Color32::from_rgb(32, 34, 45);
        ctx.set_visuals(visuals);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(20.0);

            ui.vertical_centered(|ui| {
                ui.label(
                    egui::RichText::new("Configuration Error")
                        .size(22.0)
                        .color(egui::Color32::from_rgb(255, 110, 110))
                        .strong(),
                );
            });

            ui.add_space(16.0);

            egui::Frame::NONE
                .fill(egui::Color32::from_rgb(45, 40, 52))
                .corner_radius(egui::CornerRadius::same(8))
                .inner_margin(egui::Margin::same(14))
                .show(ui, |ui| {
                    ui.label(
                        egui::RichText::new(&self.error_msg)
                            .size(14.0)
                            .color(egui::Color32::from_rgb(235, 225, 235)),
                    );
                });

            ui.add_space(20.0);

            ui.vertical_centered(|ui| {
                if ui
                    .add_sized([120.0, 32.0], egui::Button::new("Close"))
                    .clicked()
                {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });
        });
    }
}

/// Displays an error dialog in a separate window.
///
/// # Errors
///
/// Returns an error if the GUI framework fails to initialize.
pub fn show_error(error_msg: &str) -> anyhow::Result<()> {
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([450.0, 260.0])
        .with_resizable(false)
        .with_title("Gamepad Settings - Error")
        .with_always_on_top();

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "padmap error",
        options,
        Box::new(|_cc| {
            Ok(Box::new(ErrorDialog {
                error_msg: error_msg.to_string(),
            }))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Failed to show error dialog: {}", e))
}
