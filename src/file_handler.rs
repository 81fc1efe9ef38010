use std::path::Path;

/// An image file dropped onto the window, read into memory
#[derive(Debug, Clone)]
pub struct DroppedImage {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Collects images dropped onto the window
#[derive(Debug, Default)]
pub struct FileHandler;

impl FileHandler {
    pub fn new() -> Self {
        Self
    }

    /// Take this frame's dropped files and return the readable images among them
    pub fn take_dropped_images(&mut self, ctx: &egui::Context) -> Vec<DroppedImage> {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        dropped.iter().filter_map(read_dropped_image).collect()
    }

    /// Preview files being dragged over the application
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, FontId, Id, LayerId, Order};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            "Drop an image to use it as the base drawing",
            FontId::proportional(24.0),
            Color32::WHITE,
        );
    }
}

fn display_name(file: &egui::DroppedFile) -> String {
    if let Some(path) = &file.path {
        path.display().to_string()
    } else if !file.name.is_empty() {
        file.name.clone()
    } else {
        "unknown".to_owned()
    }
}

/// Check if a file is an image based on MIME type or extension
pub fn is_image_file(mime: &str, path: Option<&Path>) -> bool {
    if !mime.is_empty() {
        return mime.starts_with("image/");
    }
    path.and_then(Path::extension)
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp"))
}

fn read_dropped_image(file: &egui::DroppedFile) -> Option<DroppedImage> {
    let name = display_name(file);
    let path = file.path.as_deref().or_else(|| Some(Path::new(&file.name)));
    if !is_image_file(&file.mime, path) {
        log::warn!("Dropped file is not a supported type: {}", name);
        return None;
    }

    if let Some(bytes) = &file.bytes {
        log::info!("Processing image from memory: {} ({} bytes)", name, bytes.len());
        return Some(DroppedImage {
            name,
            bytes: bytes.to_vec(),
        });
    }

    // For native platforms, we can load the file from the path
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Some(path) = &file.path {
            log::info!("Processing image from path: {}", path.display());
            return match std::fs::read(path) {
                Ok(bytes) => Some(DroppedImage { name, bytes }),
                Err(err) => {
                    log::error!("Failed to read image file: {}: {}", path.display(), err);
                    None
                }
            };
        }
    }

    log::warn!("Dropped file has no accessible data: {}", name);
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_detection() {
        assert!(is_image_file("image/png", None));
        assert!(!is_image_file("text/plain", Some(Path::new("a.png"))));
        assert!(is_image_file("", Some(Path::new("photo.JPG"))));
        assert!(!is_image_file("", Some(Path::new("notes.txt"))));
        assert!(!is_image_file("", None));
    }

    #[test]
    fn test_non_image_drop_is_skipped() {
        let file = egui::DroppedFile {
            name: "notes.txt".to_owned(),
            bytes: Some(vec![1, 2, 3].into()),
            ..Default::default()
        };
        assert!(read_dropped_image(&file).is_none());
    }

    #[test]
    fn test_in_memory_image_drop() {
        let file = egui::DroppedFile {
            name: "sketch.png".to_owned(),
            bytes: Some(vec![1, 2, 3].into()),
            ..Default::default()
        };
        let image = read_dropped_image(&file).unwrap();
        assert_eq!(image.name, "sketch.png");
        assert_eq!(image.bytes, vec![1, 2, 3]);
    }
}
