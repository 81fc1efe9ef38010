use std::sync::Arc;

use image::RgbaImage;

use crate::surface::Surface;

/// Immutable full copy of the surface pixels at one point in time
#[derive(Debug, Clone)]
pub struct Snapshot {
    pixels: Arc<RgbaImage>,
}

impl Snapshot {
    fn of(surface: &Surface) -> Self {
        Self {
            pixels: Arc::new(surface.pixels().clone()),
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// Linear undo/redo timeline over full-surface snapshots.
///
/// `index` is `None` until the first capture and always points into
/// `snapshots` afterwards. Capturing while behind the end discards the redo
/// branch.
#[derive(Debug, Default)]
pub struct SnapshotHistory {
    snapshots: Vec<Snapshot>,
    index: Option<usize>,
}

impl SnapshotHistory {
    /// Creates a new empty history
    pub fn new() -> Self {
        Self {
            snapshots: Vec::new(),
            index: None,
        }
    }

    /// Copy the surface into a new snapshot at `index + 1`, dropping anything after it
    pub fn capture(&mut self, surface: &Surface) {
        let next = self.index.map_or(0, |i| i + 1);
        let discarded = self.snapshots.len().saturating_sub(next);
        self.snapshots.truncate(next);
        self.snapshots.push(Snapshot::of(surface));
        self.index = Some(next);

        log::debug!(
            "Captured snapshot {} ({} redo step(s) discarded)",
            next,
            discarded
        );
    }

    /// Step back and restore the previous snapshot. Returns false if there is none.
    pub fn undo(&mut self, surface: &mut Surface) -> bool {
        match self.index {
            Some(i) if i > 0 => {
                self.index = Some(i - 1);
                self.restore(surface);
                true
            }
            _ => false,
        }
    }

    /// Step forward and restore the next snapshot. Returns false if there is none.
    pub fn redo(&mut self, surface: &mut Surface) -> bool {
        match self.index {
            Some(i) if i + 1 < self.snapshots.len() => {
                self.index = Some(i + 1);
                self.restore(surface);
                true
            }
            _ => false,
        }
    }

    fn restore(&self, surface: &mut Surface) {
        if let Some(snapshot) = self.current() {
            surface.restore(snapshot.pixels());
        }
    }

    /// Returns true if there are snapshots before the current one
    pub fn can_undo(&self) -> bool {
        matches!(self.index, Some(i) if i > 0)
    }

    /// Returns true if there are snapshots after the current one
    pub fn can_redo(&self) -> bool {
        matches!(self.index, Some(i) if i + 1 < self.snapshots.len())
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.index.and_then(|i| self.snapshots.get(i))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.index
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
