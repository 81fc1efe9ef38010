use std::io::Cursor;

use egui::{Color32, Pos2};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

/// How a rasterized segment is combined with the existing pixels
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Composite {
    /// Paint the color over the existing content.
    SourceOver,
    /// Remove existing coverage along the path; the color is ignored.
    DestinationOut,
}

/// Fixed-size RGBA raster the user draws on.
///
/// Pixels are stored as straight (non-premultiplied) sRGB with alpha. A fresh
/// surface is fully transparent. Every mutation bumps `revision` so that views
/// can tell when the pixels need to be re-uploaded.
#[derive(Debug, Clone)]
pub struct Surface {
    pixels: RgbaImage,
    revision: u64,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
            revision: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> [u32; 2] {
        [self.width(), self.height()]
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x < self.width() && y < self.height() {
            Some(self.pixels.get_pixel(x, y).0)
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.pixels().all(|p| p[3] == 0)
    }

    /// Wipe every pixel to fully transparent.
    pub fn clear(&mut self) {
        for p in self.pixels.pixels_mut() {
            *p = Rgba([0, 0, 0, 0]);
        }
        self.touch();
    }

    /// Overwrite the whole surface with `pixels`.
    ///
    /// A buffer of a different size replaces the current one outright.
    pub fn restore(&mut self, pixels: &RgbaImage) {
        if pixels.dimensions() == self.pixels.dimensions() {
            self.pixels.copy_from_slice(pixels.as_raw());
        } else {
            log::warn!(
                "Restoring {}x{} snapshot onto {}x{} surface",
                pixels.width(),
                pixels.height(),
                self.width(),
                self.height()
            );
            self.pixels = pixels.clone();
        }
        self.touch();
    }

    /// Mutable access for whole-buffer operations such as image placement.
    pub(crate) fn pixels_mut(&mut self) -> &mut RgbaImage {
        self.touch();
        &mut self.pixels
    }

    /// Encode the current contents as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>, image::ImageError> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(self.pixels.clone())
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Rasterize a straight segment with round caps.
    ///
    /// Coverage is the distance from each pixel center to the segment, with a
    /// one pixel anti-aliased rim. Consecutive segments share their endpoint, so
    /// the round caps double as round joins.
    pub fn stroke_segment(
        &mut self,
        from: Pos2,
        to: Pos2,
        width: f32,
        color: Color32,
        composite: Composite,
    ) {
        if self.width() == 0 || self.height() == 0 || width <= 0.0 {
            return;
        }

        let radius = width / 2.0;
        let reach = radius + 1.0;
        let min_x = (from.x.min(to.x) - reach).floor().max(0.0) as u32;
        let min_y = (from.y.min(to.y) - reach).floor().max(0.0) as u32;
        let max_x = (from.x.max(to.x) + reach).ceil().min(self.width() as f32) as u32;
        let max_y = (from.y.max(to.y) + reach).ceil().min(self.height() as f32) as u32;
        if min_x >= max_x || min_y >= max_y {
            return;
        }

        let [r, g, b, a] = color.to_srgba_unmultiplied();
        let color_alpha = a as f32 / 255.0;

        for y in min_y..max_y {
            for x in min_x..max_x {
                let center = Pos2::new(x as f32 + 0.5, y as f32 + 0.5);
                let coverage = (radius + 0.5 - distance_to_segment(center, from, to)).clamp(0.0, 1.0);
                if coverage <= 0.0 {
                    continue;
                }

                let dst = self.pixels.get_pixel_mut(x, y);
                *dst = match composite {
                    Composite::SourceOver => source_over(*dst, [r, g, b], color_alpha * coverage),
                    Composite::DestinationOut => destination_out(*dst, coverage),
                };
            }
        }

        self.touch();
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

fn source_over(dst: Rgba<u8>, src: [u8; 3], src_alpha: f32) -> Rgba<u8> {
    if src_alpha >= 1.0 {
        return Rgba([src[0], src[1], src[2], 255]);
    }

    let dst_alpha = dst[3] as f32 / 255.0;
    let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);
    if out_alpha <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |s: u8, d: u8| {
        let v = (s as f32 * src_alpha + d as f32 * dst_alpha * (1.0 - src_alpha)) / out_alpha;
        v.round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

fn destination_out(dst: Rgba<u8>, coverage: f32) -> Rgba<u8> {
    let alpha = (dst[3] as f32 * (1.0 - coverage)).round().clamp(0.0, 255.0) as u8;
    if alpha == 0 {
        Rgba([0, 0, 0, 0])
    } else {
        Rgba([dst[0], dst[1], dst[2], alpha])
    }
}
