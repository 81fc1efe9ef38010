use crate::PaintApp;
use crate::components::ToolButton;
use crate::stroke::{MAX_LINE_WIDTH, MIN_LINE_WIDTH, Tool};

pub fn tools_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(false)
        .default_width(160.0)
        .show(ctx, |ui| {
            ui.heading("Tools");
            ui.add_space(4.0);

            let active_tool = app.document().style().tool;
            ui.horizontal(|ui| {
                for tool in [Tool::Pen, Tool::Eraser] {
                    if ToolButton::new(tool, active_tool == tool).show(ui).clicked() {
                        app.set_tool(tool);
                    }
                }
            });
            ui.separator();

            ui.horizontal(|ui| {
                ui.label("Color");
                let style = app.document_mut().style_mut();
                egui::color_picker::color_edit_button_srgba(
                    ui,
                    &mut style.color,
                    egui::color_picker::Alpha::Opaque,
                );
            });

            let mut line_width = app.document().style().line_width();
            ui.label(format!("Size: {}", line_width));
            if ui
                .add(egui::Slider::new(&mut line_width, MIN_LINE_WIDTH..=MAX_LINE_WIDTH).show_value(false))
                .changed()
            {
                app.document_mut().style_mut().set_line_width(line_width);
            }
            ui.separator();

            ui.vertical_centered_justified(|ui| {
                let can_undo = app.document().can_undo();
                let can_redo = app.document().can_redo();

                if ui.add_enabled(can_undo, egui::Button::new("⟲ Undo")).clicked() {
                    app.undo();
                }
                if ui.add_enabled(can_redo, egui::Button::new("⟳ Redo")).clicked() {
                    app.redo();
                }
            });

            let history = app.document().history();
            if let Some(index) = history.current_index() {
                ui.add_space(4.0);
                ui.weak(format!("Step {} of {}", index, history.len().saturating_sub(1)));
            }
        });
}
