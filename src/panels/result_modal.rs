use crate::generation::GeneratedImage;
use crate::texture_manager::to_color_image;

/// What the user chose in the result window
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ResultAction {
    Close,
    Download,
    UseOnCanvas,
    Variation,
}

/// A generated image plus its preview texture
pub struct ResultView {
    image: GeneratedImage,
    preview: Option<egui::TextureHandle>,
}

impl ResultView {
    pub fn new(ctx: &egui::Context, image: GeneratedImage) -> Self {
        let preview = match image.decode() {
            Ok(pixels) => Some(ctx.load_texture(
                "generated_image",
                to_color_image(&pixels),
                egui::TextureOptions::LINEAR,
            )),
            Err(err) => {
                log::warn!("Cannot preview generated image: {}", err);
                None
            }
        };
        Self { image, preview }
    }

    pub fn image(&self) -> &GeneratedImage {
        &self.image
    }

    pub fn has_preview(&self) -> bool {
        self.preview.is_some()
    }
}

pub fn result_modal(ctx: &egui::Context, view: &ResultView, generating: bool) -> Option<ResultAction> {
    let mut action = None;
    let mut open = true;

    egui::Window::new("Generated Image")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| match &view.preview {
                Some(texture) => {
                    ui.add(
                        egui::Image::new(egui::load::SizedTexture::from_handle(texture))
                            .max_size(egui::vec2(720.0, 405.0)),
                    );
                }
                None => {
                    ui.weak("The returned image could not be displayed.");
                }
            });
            ui.separator();

            ui.horizontal(|ui| {
                if ui
                    .add(egui::Button::new("⬇ Download").fill(egui::Color32::from_rgb(37, 99, 235)))
                    .clicked()
                {
                    action = Some(ResultAction::Download);
                }
                if ui
                    .add(egui::Button::new("🖌 Edit Further").fill(egui::Color32::from_rgb(22, 163, 74)))
                    .clicked()
                {
                    action = Some(ResultAction::UseOnCanvas);
                }
                if ui
                    .add_enabled(
                        !generating,
                        egui::Button::new("🔄 Create Variation").fill(egui::Color32::from_rgb(147, 51, 234)),
                    )
                    .clicked()
                {
                    action = Some(ResultAction::Variation);
                }
            });
        });

    if !open {
        action = Some(ResultAction::Close);
    }
    action
}
