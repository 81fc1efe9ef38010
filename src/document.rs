use egui::Pos2;
use image::RgbaImage;

use crate::command::{Command, SnapshotHistory};
use crate::error::PlacementError;
use crate::image::{PlacementMode, decode_image};
use crate::renderer::StrokeRenderer;
use crate::stroke::StrokeStyle;
use crate::surface::Surface;

/// The drawing view: owns the surface, the stroke renderer and the history.
///
/// Hosts only see this narrow interface, never the raw pixel buffer. Until
/// [`Document::surface_ready`] has been called with a non-empty size every
/// operation is a no-op.
#[derive(Debug, Default)]
pub struct Document {
    surface: Option<Surface>,
    renderer: StrokeRenderer,
    history: SnapshotHistory,
    style: StrokeStyle,
}

impl Document {
    pub fn new(style: StrokeStyle) -> Self {
        Self {
            surface: None,
            renderer: StrokeRenderer::new(),
            history: SnapshotHistory::new(),
            style,
        }
    }

    /// Create the surface once its final pixel size is known and capture the
    /// initial empty snapshot. Returns true if this call initialized the surface.
    pub fn surface_ready(&mut self, width: u32, height: u32) -> bool {
        if self.surface.is_some() || width == 0 || height == 0 {
            return false;
        }

        log::info!("Surface ready: {}x{}", width, height);
        let surface = Surface::new(width, height);
        self.history.capture(&surface);
        self.surface = Some(surface);
        true
    }

    pub fn is_ready(&self) -> bool {
        self.surface.is_some()
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn history(&self) -> &SnapshotHistory {
        &self.history
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut StrokeStyle {
        &mut self.style
    }

    pub fn is_drawing(&self) -> bool {
        self.renderer.is_drawing()
    }

    pub fn begin_stroke(&mut self, point: Pos2) {
        if self.surface.is_some() {
            self.renderer.begin_stroke(point);
        }
    }

    pub fn extend_stroke(&mut self, point: Pos2) {
        if let Some(surface) = &mut self.surface {
            self.renderer.extend_stroke(surface, point, &self.style);
        }
    }

    /// Finish the current stroke and capture it. Returns true if a snapshot was taken.
    pub fn end_stroke(&mut self) -> bool {
        if self.surface.is_none() || !self.renderer.end_stroke() {
            return false;
        }
        self.capture();
        true
    }

    /// Push a snapshot of the current surface onto the history
    pub fn capture(&mut self) {
        if let Some(surface) = &self.surface {
            self.history.capture(surface);
        }
    }

    pub fn undo(&mut self) -> bool {
        match &mut self.surface {
            Some(surface) => self.history.undo(surface),
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match &mut self.surface {
            Some(surface) => self.history.redo(surface),
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Apply a whole-surface command and capture the result
    pub fn execute(&mut self, command: Command) {
        let Some(surface) = &mut self.surface else {
            log::warn!("Ignoring {} before the surface is ready", command.name());
            return;
        };

        // A whole-surface change ends any stroke still in flight
        if self.renderer.end_stroke() {
            self.history.capture(surface);
        }

        log::info!("Executing {}", command.name());
        command.execute(surface);
        self.history.capture(surface);
    }

    pub fn clear(&mut self) {
        self.execute(Command::Clear);
    }

    pub fn place_image(&mut self, image: RgbaImage, mode: PlacementMode) {
        self.execute(Command::PlaceImage { image, mode });
    }

    /// Decode `bytes` and place the result.
    ///
    /// A decode failure leaves the surface and history untouched.
    pub fn place_image_bytes(&mut self, bytes: &[u8], mode: PlacementMode) -> Result<(), PlacementError> {
        if self.surface.is_none() {
            return Err(PlacementError::SurfaceNotReady);
        }
        let image = decode_image(bytes)?;
        self.place_image(image, mode);
        Ok(())
    }

    /// Current surface pixels
    pub fn contents(&self) -> Option<&RgbaImage> {
        self.surface.as_ref().map(Surface::pixels)
    }

    /// Current surface encoded as PNG
    pub fn contents_png(&self) -> Option<Result<Vec<u8>, image::ImageError>> {
        self.surface.as_ref().map(Surface::to_png)
    }
}
