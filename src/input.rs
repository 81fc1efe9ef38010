use egui::{Context, Event, Key, LayerId, PointerButton, Pos2, Rect};

use crate::document::Document;

/// Maps positions in the displayed canvas rectangle to surface pixels.
///
/// The surface keeps the pixel size it had when it became ready while the
/// displayed rectangle follows the layout, so each axis is scaled separately.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasMapping {
    pub display_rect: Rect,
    pub surface_size: [u32; 2],
}

impl CanvasMapping {
    pub fn new(display_rect: Rect, surface_size: [u32; 2]) -> Self {
        Self {
            display_rect,
            surface_size,
        }
    }

    /// Convert a screen position into surface pixel coordinates
    pub fn to_surface(&self, pos: Pos2) -> Option<Pos2> {
        let rect = self.display_rect;
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return None;
        }
        let scale_x = self.surface_size[0] as f32 / rect.width();
        let scale_y = self.surface_size[1] as f32 / rect.height();
        Some(Pos2::new(
            (pos.x - rect.left()) * scale_x,
            (pos.y - rect.top()) * scale_y,
        ))
    }
}

/// Pointer and keyboard events relevant to the drawing surface, already in
/// surface coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Primary button pressed over the canvas
    PointerDown { position: Pos2 },
    /// Pointer moved over the canvas
    PointerMove { position: Pos2 },
    /// Primary button released
    PointerUp,
    /// Pointer left the canvas (or the window)
    PointerLeave,
    Undo,
    Redo,
}

/// Converts raw egui input for the canvas area into [`InputEvent`]s.
///
/// The frame's event queue is walked in arrival order, so several moves,
/// a press and a release arriving in one frame keep their sequence.
#[derive(Debug, Default)]
pub struct InputHandler {
    hovering: bool,
    stroke_active: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process this frame's input for a canvas painted on `layer_id` at
    /// `mapping.display_rect`.
    ///
    /// A press only starts a stroke when no other layer (such as a window)
    /// covers the press position.
    pub fn process_input(
        &mut self,
        ctx: &Context,
        mapping: &CanvasMapping,
        layer_id: LayerId,
    ) -> Vec<InputEvent> {
        // Text fields keep their own undo shortcuts
        let keys_enabled = !ctx.wants_keyboard_input();
        let raw_events = ctx.input(|input| input.events.clone());
        let mut events = Vec::new();

        for event in raw_events {
            match event {
                Event::PointerMoved(pos) => self.pointer_moved(pos, mapping, &mut events),
                Event::PointerButton {
                    pos,
                    button: PointerButton::Primary,
                    pressed: true,
                    ..
                } => {
                    let on_canvas = mapping.display_rect.contains(pos)
                        && ctx.layer_id_at(pos).is_none_or(|top| top == layer_id);
                    if !on_canvas {
                        continue;
                    }
                    if let Some(position) = mapping.to_surface(pos) {
                        self.hovering = true;
                        self.stroke_active = true;
                        events.push(InputEvent::PointerDown { position });
                    }
                }
                Event::PointerButton {
                    button: PointerButton::Primary,
                    pressed: false,
                    ..
                } => {
                    if self.stroke_active {
                        self.stroke_active = false;
                        events.push(InputEvent::PointerUp);
                    }
                }
                Event::PointerGone => self.pointer_left(&mut events),
                Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } if keys_enabled && modifiers.command => match key {
                    Key::Z if modifiers.shift => events.push(InputEvent::Redo),
                    Key::Y => events.push(InputEvent::Redo),
                    Key::Z => events.push(InputEvent::Undo),
                    _ => {}
                },
                _ => {}
            }
        }

        events
    }

    fn pointer_moved(&mut self, pos: Pos2, mapping: &CanvasMapping, events: &mut Vec<InputEvent>) {
        if !mapping.display_rect.contains(pos) {
            self.pointer_left(events);
            return;
        }
        if let Some(position) = mapping.to_surface(pos) {
            self.hovering = true;
            events.push(InputEvent::PointerMove { position });
        }
    }

    fn pointer_left(&mut self, events: &mut Vec<InputEvent>) {
        if self.hovering || self.stroke_active {
            events.push(InputEvent::PointerLeave);
        }
        self.hovering = false;
        self.stroke_active = false;
    }
}

/// Feed events to the document in arrival order
pub fn apply_events(document: &mut Document, events: &[InputEvent]) {
    for event in events {
        match event {
            InputEvent::PointerDown { position } => document.begin_stroke(*position),
            InputEvent::PointerMove { position } => document.extend_stroke(*position),
            InputEvent::PointerUp | InputEvent::PointerLeave => {
                document.end_stroke();
            }
            InputEvent::Undo => {
                document.undo();
            }
            InputEvent::Redo => {
                document.redo();
            }
        }
    }
}
