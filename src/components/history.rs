use eframe::egui;
use image::RgbaImage;
use std::collections::VecDeque;

// ============================================================================
// SNAPSHOT HISTORY - whole-image undo/redo stacks with memory limits
// ============================================================================

/// A full copy of the image at some point in the edit sequence, labeled with
/// the edit that produced the following state.
pub struct ImageSnapshot {
    pub description: String,
    pub pixels: RgbaImage,
}

impl ImageSnapshot {
    pub fn new(description: impl Into<String>, pixels: RgbaImage) -> Self {
        Self {
            description: description.into(),
            pixels,
        }
    }

    pub fn memory_size(&self) -> usize {
        self.pixels.as_raw().len() + self.description.len()
    }
}

/// Linear undo/redo history of whole-image snapshots.
///
/// `push` records the state an edit replaced; `undo`/`redo` swap snapshots
/// with the caller's current image. Every new edit discards the redo stack,
/// so the history never branches.
pub struct SnapshotHistory {
    undo_stack: VecDeque<ImageSnapshot>,
    redo_stack: Vec<ImageSnapshot>,
    max_snapshots: usize,
    /// Optional memory cap in bytes across both stacks.
    max_memory_bytes: Option<usize>,
    /// Running memory total across both stacks.
    total_memory: usize,
}

impl Default for SnapshotHistory {
    fn default() -> Self {
        Self::new(50)
    }
}

impl SnapshotHistory {
    pub fn new(max_snapshots: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_snapshots,
            max_memory_bytes: Some(512 * 1024 * 1024),
            total_memory: 0,
        }
    }

    /// Apply count/memory limits from the user settings.
    pub fn set_limits(&mut self, max_snapshots: usize, max_memory_bytes: Option<usize>) {
        self.max_snapshots = max_snapshots.max(1);
        self.max_memory_bytes = max_memory_bytes;
        self.prune();
    }

    /// Record the state an edit just replaced. Clears the redo stack.
    pub fn push(&mut self, snapshot: ImageSnapshot) {
        for snap in self.redo_stack.drain(..) {
            self.total_memory = self.total_memory.saturating_sub(snap.memory_size());
        }

        self.total_memory += snapshot.memory_size();
        self.undo_stack.push_back(snapshot);

        self.prune();
    }

    /// Step back one edit: `current` is swapped with the most recent snapshot
    /// and pushed onto the redo stack. Returns the description of the edit
    /// that was undone, or `None` if there is nothing to undo.
    pub fn undo(&mut self, current: &mut RgbaImage) -> Option<String> {
        let snap = self.undo_stack.pop_back()?;
        self.total_memory = self.total_memory.saturating_sub(snap.memory_size());

        let description = snap.description.clone();
        let outgoing = std::mem::replace(current, snap.pixels);
        let redo_snap = ImageSnapshot::new(description.clone(), outgoing);
        self.total_memory += redo_snap.memory_size();
        self.redo_stack.push(redo_snap);
        Some(description)
    }

    /// Step forward one edit: inverse of `undo`.
    pub fn redo(&mut self, current: &mut RgbaImage) -> Option<String> {
        let snap = self.redo_stack.pop()?;
        self.total_memory = self.total_memory.saturating_sub(snap.memory_size());

        let description = snap.description.clone();
        let outgoing = std::mem::replace(current, snap.pixels);
        let undo_snap = ImageSnapshot::new(description.clone(), outgoing);
        self.total_memory += undo_snap.memory_size();
        self.undo_stack.push_back(undo_snap);
        Some(description)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(|s| s.description.as_str())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|s| s.description.as_str())
    }

    /// All undoable edit descriptions, most recent first.
    pub fn descriptions(&self) -> Vec<&str> {
        self.undo_stack
            .iter()
            .rev()
            .map(|s| s.description.as_str())
            .collect()
    }

    /// Current memory usage of the history (O(1) via cached total).
    pub fn memory_usage(&self) -> usize {
        self.total_memory
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.total_memory = 0;
    }

    /// Prune oldest undo snapshots to stay within limits. Never drops the
    /// last remaining undo step.
    fn prune(&mut self) {
        while self.undo_stack.len() > self.max_snapshots {
            if let Some(removed) = self.undo_stack.pop_front() {
                self.total_memory = self.total_memory.saturating_sub(removed.memory_size());
            }
        }

        if let Some(max_bytes) = self.max_memory_bytes {
            while self.total_memory > max_bytes && self.undo_stack.len() > 1 {
                if let Some(removed) = self.undo_stack.pop_front() {
                    self.total_memory = self.total_memory.saturating_sub(removed.memory_size());
                }
            }
        }
    }
}

// ============================================================================
// HISTORY PANEL - UI for displaying the edit history
// ============================================================================

#[derive(Default)]
pub struct HistoryPanel {
    show_memory_info: bool,
}

impl HistoryPanel {
    pub fn show(&mut self, ui: &mut egui::Ui, history: &SnapshotHistory) {
        ui.horizontal(|ui| {
            ui.label(format!(
                "Undo: {} | Redo: {}",
                history.undo_count(),
                history.redo_count()
            ));

            if ui
                .small_button("ℹ")
                .on_hover_text("Show memory info")
                .clicked()
            {
                self.show_memory_info = !self.show_memory_info;
            }
        });

        if self.show_memory_info {
            let mem_mb = history.memory_usage() as f64 / (1024.0 * 1024.0);
            ui.label(format!("Memory: {:.2} MB", mem_mb));
        }

        egui::ScrollArea::vertical()
            .max_height(180.0)
            .show(ui, |ui| {
                let items = history.descriptions();
                if items.is_empty() {
                    ui.weak("No history yet");
                } else {
                    for (i, desc) in items.iter().enumerate() {
                        let text = if i == 0 {
                            egui::RichText::new(format!("▶ {}", desc)).strong().size(11.0)
                        } else {
                            egui::RichText::new(format!("  {}", desc)).weak().size(11.0)
                        };
                        ui.label(text);
                    }
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(w: u32, h: u32, v: u8) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([v, v, v, 255]))
    }

    #[test]
    fn undo_redo_roundtrip() {
        let mut history = SnapshotHistory::new(10);
        let mut current = solid(4, 4, 200);

        history.push(ImageSnapshot::new("Blur", solid(4, 4, 100)));
        assert!(history.can_undo());
        assert!(!history.can_redo());

        let undone = history.undo(&mut current);
        assert_eq!(undone.as_deref(), Some("Blur"));
        assert_eq!(current.get_pixel(0, 0)[0], 100);
        assert!(history.can_redo());

        let redone = history.redo(&mut current);
        assert_eq!(redone.as_deref(), Some("Blur"));
        assert_eq!(current.get_pixel(0, 0)[0], 200);
        assert!(!history.can_redo());
    }

    #[test]
    fn empty_stacks_are_noops() {
        let mut history = SnapshotHistory::new(10);
        let mut current = solid(2, 2, 50);
        assert!(history.undo(&mut current).is_none());
        assert!(history.redo(&mut current).is_none());
        assert_eq!(current.get_pixel(0, 0)[0], 50);
    }

    #[test]
    fn push_discards_redo_stack() {
        let mut history = SnapshotHistory::new(10);
        let mut current = solid(2, 2, 30);

        history.push(ImageSnapshot::new("Sepia", solid(2, 2, 10)));
        history.undo(&mut current);
        assert!(history.can_redo());

        history.push(ImageSnapshot::new("Crop", solid(2, 2, 20)));
        assert!(!history.can_redo());
        assert_eq!(history.undo_count(), 1);
        assert_eq!(history.undo_description(), Some("Crop"));
    }

    #[test]
    fn prunes_oldest_past_snapshot_limit() {
        let mut history = SnapshotHistory::new(2);
        for i in 0..5u8 {
            history.push(ImageSnapshot::new(format!("Edit {}", i), solid(2, 2, i)));
        }
        assert_eq!(history.undo_count(), 2);
        assert_eq!(history.descriptions(), vec!["Edit 4", "Edit 3"]);
    }

    #[test]
    fn prunes_oldest_past_memory_cap_but_keeps_one() {
        let mut history = SnapshotHistory::new(100);
        // Each 8x8 snapshot is 256 bytes of pixels; cap fits roughly two.
        history.set_limits(100, Some(600));
        for i in 0..4u8 {
            history.push(ImageSnapshot::new(format!("Edit {}", i), solid(8, 8, i)));
        }
        assert!(history.undo_count() >= 1);
        assert!(history.undo_count() < 4);
        assert_eq!(history.undo_description(), Some("Edit 3"));
    }

    #[test]
    fn memory_total_tracks_both_stacks() {
        let mut history = SnapshotHistory::new(10);
        let mut current = solid(4, 4, 9);
        history.push(ImageSnapshot::new("A", solid(4, 4, 1)));
        let after_push = history.memory_usage();
        assert!(after_push > 0);

        // Moving a snapshot to the redo stack keeps the total stable
        // (same pixel count, same description length).
        history.undo(&mut current);
        assert_eq!(history.memory_usage(), after_push);

        history.clear();
        assert_eq!(history.memory_usage(), 0);
    }
}
