use egui::{ColorImage, Context, TextureHandle, TextureOptions};
use image::RgbaImage;

use crate::surface::Surface;

/// Convert straight RGBA pixels into an egui image
pub fn to_color_image(pixels: &RgbaImage) -> ColorImage {
    ColorImage::from_rgba_unmultiplied(
        [pixels.width() as usize, pixels.height() as usize],
        pixels.as_raw(),
    )
}

/// GPU copy of the drawing surface, re-uploaded only when the surface revision changes
#[derive(Default)]
pub struct SurfaceTexture {
    handle: Option<TextureHandle>,
    revision: Option<u64>,
    uploads: u64,
}

impl SurfaceTexture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a texture showing the current surface contents
    pub fn update(&mut self, ctx: &Context, surface: &Surface) -> &TextureHandle {
        let stale = self.revision != Some(surface.revision());
        let image = || to_color_image(surface.pixels());

        let handle = match self.handle.take() {
            Some(mut handle) => {
                if stale {
                    handle.set(image(), TextureOptions::LINEAR);
                    self.uploads += 1;
                }
                handle
            }
            None => {
                self.uploads += 1;
                ctx.load_texture("drawing_surface", image(), TextureOptions::LINEAR)
            }
        };

        self.revision = Some(surface.revision());
        self.handle.insert(handle)
    }

    /// Number of uploads so far
    pub fn uploads(&self) -> u64 {
        self.uploads
    }
}
