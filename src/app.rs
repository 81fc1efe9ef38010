use crate::config::AppConfig;
use crate::document::Document;
use crate::error::GenerationError;
use crate::file_handler::FileHandler;
use crate::generation::{GeminiClient, GenerationJob, GenerationRequest};
use crate::image::PlacementMode;
use crate::input::{CanvasMapping, InputHandler, apply_events};
use crate::panels::{self, ResultAction, ResultView};
use crate::state::GenerationState;
use crate::stroke::Tool;
use crate::texture_manager::SurfaceTexture;

pub struct PaintApp {
    config: AppConfig,
    document: Document,
    input: InputHandler,
    surface_texture: SurfaceTexture,
    file_handler: FileHandler,
    prompt: String,
    error: Option<String>,
    generation: GenerationState,
    result: Option<ResultView>,
}

impl PaintApp {
    /// Called once before the first frame.
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        Self::with_config(config)
    }

    pub fn with_config(config: AppConfig) -> Self {
        let document = Document::new(config.default_style());
        Self {
            config,
            document,
            input: InputHandler::new(),
            surface_texture: SurfaceTexture::new(),
            file_handler: FileHandler::new(),
            prompt: String::new(),
            error: None,
            generation: GenerationState::Idle,
            result: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn prompt_mut(&mut self) -> &mut String {
        &mut self.prompt
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn is_generating(&self) -> bool {
        self.generation.is_pending()
    }

    pub fn pending_prompt(&self) -> Option<&str> {
        self.generation.pending_prompt()
    }

    pub fn can_generate(&self) -> bool {
        !self.is_generating() && !self.prompt.trim().is_empty()
    }

    pub fn set_tool(&mut self, tool: Tool) {
        if self.document.style().tool != tool {
            log::info!("Tool selected: {}", tool.label());
            self.document.style_mut().tool = tool;
        }
    }

    pub fn undo(&mut self) {
        self.document.undo();
    }

    pub fn redo(&mut self) {
        self.document.redo();
    }

    pub fn clear_canvas(&mut self) {
        self.document.clear();
    }

    /// Lay out the drawing surface at `size` points and route pointer input to it
    pub fn show_canvas(&mut self, ui: &mut egui::Ui, size: egui::Vec2) {
        let ctx = ui.ctx().clone();
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::drag());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 8.0, egui::Color32::from_gray(31));

        if !self.document.is_ready() {
            let pixels = rect.size() * ctx.pixels_per_point();
            self.document
                .surface_ready(pixels.x.round() as u32, pixels.y.round() as u32);
        }

        let Some(surface) = self.document.surface() else {
            return;
        };
        let mapping = CanvasMapping::new(rect, surface.size());

        let events = self.input.process_input(&ctx, &mapping, ui.layer_id());
        apply_events(&mut self.document, &events);

        if let Some(surface) = self.document.surface() {
            let texture = self.surface_texture.update(&ctx, surface);
            painter.image(
                texture.id(),
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }

        if response.hovered() {
            ctx.set_cursor_icon(if self.document.style().is_eraser() {
                egui::CursorIcon::Cell
            } else {
                egui::CursorIcon::Crosshair
            });
        }
    }

    /// Send the drawing and prompt to the generation service
    pub fn generate(&mut self, ctx: &egui::Context) {
        if self.generation.is_pending() {
            return;
        }
        if let Err(err) = self.start_generation(ctx) {
            log::warn!("Generation not started: {}", err);
            self.error = Some(err.to_string());
        }
    }

    fn start_generation(&mut self, ctx: &egui::Context) -> Result<(), GenerationError> {
        let prompt = self.prompt.trim().to_owned();
        if prompt.is_empty() {
            return Err(GenerationError::EmptyPrompt);
        }

        let png = self
            .document
            .contents_png()
            .ok_or(GenerationError::SurfaceNotReady)??;
        let request = GenerationRequest::new(png, &prompt)?;
        let client = GeminiClient::new(&self.config)?;

        self.error = None;
        self.result = None;
        log::info!("Starting generation via {}", client.url());
        self.generation
            .start(GenerationJob::spawn(client, request, ctx.clone()), &prompt);
        Ok(())
    }

    fn poll_generation(&mut self, ctx: &egui::Context) {
        match self.generation.poll() {
            Some(Ok(image)) => {
                log::info!("Received {} ({} bytes)", image.mime_type, image.bytes.len());
                self.result = Some(ResultView::new(ctx, image));
            }
            Some(Err(err)) => {
                log::error!("Generation failed: {}", err);
                self.error = Some(err.to_string());
            }
            None => {}
        }
    }

    fn handle_result_action(&mut self, ctx: &egui::Context, action: ResultAction) {
        match action {
            ResultAction::Close => self.result = None,
            ResultAction::Download => self.download_result(),
            ResultAction::UseOnCanvas => {
                if let Some(view) = self.result.take() {
                    // Decode failures leave the drawing as it was
                    if let Err(err) = self
                        .document
                        .place_image_bytes(&view.image().bytes, PlacementMode::Replace)
                    {
                        log::warn!("Could not place generated image: {}", err);
                    }
                }
            }
            ResultAction::Variation => self.generate(ctx),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn download_result(&mut self) {
        let Some(view) = &self.result else {
            return;
        };
        let path = self.config.download_dir.join(view.image().file_name());
        match std::fs::write(&path, &view.image().bytes) {
            Ok(()) => log::info!("Saved generated image to {}", path.display()),
            Err(err) => {
                log::error!("Failed to save {}: {}", path.display(), err);
                self.error = Some(format!("Failed to save {}: {}", path.display(), err));
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn download_result(&mut self) {
        log::warn!("Download is not available in the web build");
        self.error = Some("Download is not available in the web build.".to_owned());
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        self.file_handler.preview_files_being_dropped(ctx);
        for dropped in self.file_handler.take_dropped_images(ctx) {
            // Decode failures are ignored: the drop simply has no effect
            if let Err(err) = self
                .document
                .place_image_bytes(&dropped.bytes, PlacementMode::Upload)
            {
                log::warn!("Could not place {}: {}", dropped.name, err);
            }
        }
    }
}

impl eframe::App for PaintApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_generation(ctx);
        self.handle_dropped_files(ctx);

        panels::tools_panel(self, ctx);
        panels::central_panel(self, ctx);

        if let Some(view) = &self.result {
            if let Some(action) = panels::result_modal(ctx, view, self.generation.is_pending()) {
                self.handle_result_action(ctx, action);
            }
        }
    }
}
