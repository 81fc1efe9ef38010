use draw_to_image::image::PlacementMode;
use draw_to_image::{Document, StrokeStyle, Tool};
use egui::{Color32, Pos2};

const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];
const RED: [u8; 4] = [255, 0, 0, 255];

fn ready_document() -> Document {
    let mut document = Document::new(StrokeStyle::new(Tool::Pen, Color32::RED, 5));
    assert!(document.surface_ready(800, 450));
    document
}

fn draw_line(document: &mut Document, from: Pos2, to: Pos2) {
    document.begin_stroke(from);
    document.extend_stroke(to);
    assert!(document.end_stroke());
}

fn pixel(document: &Document, x: u32, y: u32) -> [u8; 4] {
    document.surface().unwrap().pixel(x, y).unwrap()
}

#[test]
fn test_red_stroke_then_undo_and_redo() {
    let mut document = ready_document();
    draw_line(&mut document, Pos2::new(100.0, 100.0), Pos2::new(200.0, 100.0));

    assert_eq!(pixel(&document, 150, 100), RED);
    assert_eq!(pixel(&document, 150, 110), TRANSPARENT);
    assert_eq!(document.history().len(), 2);
    assert_eq!(document.history().current_index(), Some(1));

    assert!(document.undo());
    assert_eq!(pixel(&document, 150, 100), TRANSPARENT);
    assert!(!document.can_undo());
    assert!(document.can_redo());

    assert!(document.redo());
    assert_eq!(pixel(&document, 150, 100), RED);
    assert!(!document.can_redo());
}

#[test]
fn test_vertical_hex_red_line_round_trips() {
    let style = StrokeStyle::from_hex(Tool::Pen, "#FF0000", 5).unwrap();
    let mut document = Document::new(style);
    assert!(document.surface_ready(800, 450));
    draw_line(&mut document, Pos2::new(10.0, 10.0), Pos2::new(10.0, 50.0));
    let drawn = document.contents().unwrap().clone();

    for y in 10..50 {
        assert_eq!(pixel(&document, 10, y), RED);
    }

    assert!(document.undo());
    assert!(document.surface().unwrap().is_empty());

    assert!(document.redo());
    assert_eq!(document.contents().unwrap(), &drawn);
}

#[test]
fn test_undo_redo_walks_every_action() {
    let mut document = ready_document();
    let mut states = vec![document.contents().unwrap().clone()];

    for i in 0..4 {
        let y = 50.0 + i as f32 * 80.0;
        draw_line(&mut document, Pos2::new(50.0, y), Pos2::new(700.0, y));
        states.push(document.contents().unwrap().clone());
    }

    for expected in states.iter().rev().skip(1) {
        assert!(document.undo());
        assert_eq!(document.contents().unwrap(), expected);
    }
    assert!(!document.undo());

    for expected in states.iter().skip(1) {
        assert!(document.redo());
        assert_eq!(document.contents().unwrap(), expected);
    }
    assert!(!document.redo());
}

#[test]
fn test_new_action_discards_redo_branch() {
    let mut document = ready_document();
    draw_line(&mut document, Pos2::new(10.0, 10.0), Pos2::new(100.0, 10.0));
    draw_line(&mut document, Pos2::new(10.0, 50.0), Pos2::new(100.0, 50.0));

    assert!(document.undo());
    assert!(document.undo());
    assert!(document.can_redo());

    document.clear();
    assert!(!document.can_redo());
    assert_eq!(document.history().len(), 2);
    assert!(document.surface().unwrap().is_empty());
}

#[test]
fn test_eraser_removes_only_its_path() {
    let mut document = ready_document();
    draw_line(&mut document, Pos2::new(100.0, 100.0), Pos2::new(300.0, 100.0));

    document.style_mut().tool = Tool::Eraser;
    draw_line(&mut document, Pos2::new(180.0, 100.0), Pos2::new(220.0, 100.0));

    assert_eq!(pixel(&document, 200, 100)[3], 0);
    assert_eq!(pixel(&document, 120, 100), RED);
    assert_eq!(pixel(&document, 280, 100), RED);
    assert_eq!(document.history().len(), 3);
}

#[test]
fn test_repeated_end_captures_once() {
    let mut document = ready_document();
    document.begin_stroke(Pos2::new(10.0, 10.0));
    document.extend_stroke(Pos2::new(40.0, 40.0));

    assert!(document.end_stroke());
    assert!(!document.end_stroke());
    assert_eq!(document.history().len(), 2);
}

#[test]
fn test_extend_without_begin_draws_nothing() {
    let mut document = ready_document();
    document.extend_stroke(Pos2::new(40.0, 40.0));
    document.extend_stroke(Pos2::new(80.0, 80.0));

    assert!(document.surface().unwrap().is_empty());
    assert!(!document.end_stroke());
    assert_eq!(document.history().len(), 1);
}

#[test]
fn test_clear_during_stroke_captures_stroke_first() {
    let mut document = ready_document();
    document.begin_stroke(Pos2::new(10.0, 10.0));
    document.extend_stroke(Pos2::new(60.0, 10.0));

    document.clear();
    assert!(!document.is_drawing());
    assert_eq!(document.history().len(), 3);

    assert!(document.undo());
    assert_eq!(pixel(&document, 30, 10), RED);
}

#[test]
fn test_upload_fits_wide_image() {
    let mut document = ready_document();
    let source = image::RgbaImage::from_pixel(1600, 900, image::Rgba([0, 0, 255, 255]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(source)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();

    document
        .place_image_bytes(&bytes, PlacementMode::Upload)
        .unwrap();

    for (x, y) in [(0, 0), (799, 449), (400, 225)] {
        let [r, g, b, a] = pixel(&document, x, y);
        assert_eq!((r, g, a), (0, 0, 255));
        assert!(b > 250);
    }
    assert_eq!(document.history().len(), 2);
}

#[test]
fn test_undecodable_upload_changes_nothing() {
    let mut document = ready_document();
    draw_line(&mut document, Pos2::new(100.0, 100.0), Pos2::new(200.0, 100.0));

    let result = document.place_image_bytes(b"not an image", PlacementMode::Upload);
    assert!(result.is_err());
    assert_eq!(pixel(&document, 150, 100), RED);
    assert_eq!(document.history().len(), 2);
}
