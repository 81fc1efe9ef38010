use crate::PaintApp;

const CANVAS_ASPECT: f32 = 16.0 / 9.0;
const PROMPT_BAR_HEIGHT: f32 = 110.0;

/// Largest 16:9 rectangle that fits the space left for the canvas
fn canvas_size(available: egui::Vec2) -> egui::Vec2 {
    let max_height = (available.y - PROMPT_BAR_HEIGHT).max(1.0);
    let width = available.x.max(1.0).min(max_height * CANVAS_ASPECT);
    egui::vec2(width, width / CANVAS_ASPECT)
}

pub fn central_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.heading("Draw to Image AI");
            ui.weak("Unleash your creativity. Draw, describe, and let AI bring your vision to life.");
        });
        ui.add_space(8.0);

        let size = canvas_size(ui.available_size());
        app.show_canvas(ui, size);

        ui.add_space(8.0);
        prompt_bar(app, ui);

        if let Some(message) = app.error().map(str::to_owned) {
            ui.add_space(8.0);
            error_banner(app, ui, &message);
        }
    });
}

fn prompt_bar(app: &mut PaintApp, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        let buttons_width = 260.0;
        let response = ui.add(
            egui::TextEdit::singleline(app.prompt_mut())
                .hint_text("e.g., A photorealistic cat sitting on a windowsill, sunbathing")
                .desired_width((ui.available_width() - buttons_width).max(120.0)),
        );
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        ui.label("⬆")
            .on_hover_text("Upload Base Image: drop an image file onto the window");

        if ui
            .add(egui::Button::new("✖ Clear").fill(egui::Color32::from_rgb(220, 38, 38)))
            .on_hover_text("Clear Canvas")
            .clicked()
        {
            app.clear_canvas();
        }

        if let Some(prompt) = app.pending_prompt() {
            ui.add_enabled(false, egui::Button::new("Generating..."))
                .on_disabled_hover_text(prompt);
            ui.add(egui::Spinner::new());
        } else {
            let generate = ui.add_enabled(
                app.can_generate(),
                egui::Button::new("✨ Generate").fill(egui::Color32::from_rgb(168, 85, 247)),
            );
            if generate.clicked() || (submitted && app.can_generate()) {
                app.generate(ui.ctx());
            }
        }
    });
}

fn error_banner(app: &mut PaintApp, ui: &mut egui::Ui, message: &str) {
    egui::Frame::none()
        .fill(egui::Color32::from_rgb(127, 29, 29))
        .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(185, 28, 28)))
        .rounding(6.0)
        .inner_margin(10.0)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.strong("Error:");
                ui.label(message);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("✖").clicked() {
                        app.dismiss_error();
                    }
                });
            });
        });
}
