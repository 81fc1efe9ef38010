use image::RgbaImage;

use crate::image::{PlacementMode, draw_image};
use crate::surface::Surface;

/// Discrete whole-surface actions. Each one is followed by exactly one
/// history capture.
#[derive(Clone)]
pub enum Command {
    /// Wipe the surface to fully transparent
    Clear,
    /// Clear the surface and draw an already decoded image onto it
    PlaceImage {
        image: RgbaImage,
        mode: PlacementMode,
    },
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Clear => f.write_str("Clear"),
            Command::PlaceImage { image, mode } => f
                .debug_struct("PlaceImage")
                .field("size", &image.dimensions())
                .field("mode", mode)
                .finish(),
        }
    }
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Clear => "Clear",
            Command::PlaceImage { mode: PlacementMode::Upload, .. } => "Upload Image",
            Command::PlaceImage { mode: PlacementMode::Replace, .. } => "Use Generated Image",
        }
    }

    pub fn execute(&self, surface: &mut Surface) {
        match self {
            Command::Clear => surface.clear(),
            Command::PlaceImage { image, mode } => draw_image(surface, image, *mode),
        }
    }
}
