use egui::{Pos2, Vec2};
use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::error::PlacementError;
use crate::surface::Surface;

/// How an external image is fitted onto the surface
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PlacementMode {
    /// Scale to fit inside the surface keeping the aspect ratio, centered.
    Upload,
    /// Stretch to cover the surface exactly.
    Replace,
}

/// Where a placed image lands on the surface, in surface pixels
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Placement {
    /// Scale factor per axis applied to the source image
    pub scale: Vec2,
    /// Top-left corner of the drawn image
    pub offset: Pos2,
    /// Drawn size
    pub size: Vec2,
}

impl Placement {
    /// Compute the placement of a `image_size` image on a `surface_size` surface
    pub fn compute(image_size: [u32; 2], surface_size: [u32; 2], mode: PlacementMode) -> Self {
        let image = Vec2::new(image_size[0] as f32, image_size[1] as f32);
        let surface = Vec2::new(surface_size[0] as f32, surface_size[1] as f32);

        match mode {
            PlacementMode::Upload => {
                let ratio = (surface.x / image.x).min(surface.y / image.y);
                let size = image * ratio;
                Self {
                    scale: Vec2::splat(ratio),
                    offset: Pos2::new((surface.x - size.x) / 2.0, (surface.y - size.y) / 2.0),
                    size,
                }
            }
            PlacementMode::Replace => Self {
                scale: Vec2::new(surface.x / image.x, surface.y / image.y),
                offset: Pos2::ZERO,
                size: surface,
            },
        }
    }
}

/// Decode encoded image bytes (PNG, JPEG, ...) into straight RGBA
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage, PlacementError> {
    let decoded = image::load_from_memory(bytes)?.to_rgba8();
    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(PlacementError::EmptyImage);
    }
    log::debug!("Decoded image: {}x{}", decoded.width(), decoded.height());
    Ok(decoded)
}

/// Clear `surface` and draw `image` onto it according to `mode`
pub fn draw_image(surface: &mut Surface, image: &RgbaImage, mode: PlacementMode) {
    surface.clear();
    if image.width() == 0 || image.height() == 0 || surface.width() == 0 || surface.height() == 0 {
        return;
    }

    let placement = Placement::compute(image.dimensions().into(), surface.size(), mode);
    let width = (placement.size.x.round() as u32).max(1);
    let height = (placement.size.y.round() as u32).max(1);

    let scaled = if image.dimensions() == (width, height) {
        image.clone()
    } else {
        imageops::resize(image, width, height, FilterType::Triangle)
    };

    imageops::replace(
        surface.pixels_mut(),
        &scaled,
        placement.offset.x.round() as i64,
        placement.offset.y.round() as i64,
    );
}
