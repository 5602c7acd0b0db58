//! Editor state: the image being edited, the untouched original, and the
//! undo/redo history connecting them.

use image::RgbaImage;
use std::path::PathBuf;

use crate::components::history::{ImageSnapshot, SnapshotHistory};

pub struct EditorState {
    /// The first-loaded bitmap. Reset and the Adjust tool start from here.
    original: RgbaImage,
    /// The displayed bitmap, replaced by every tool action.
    current: RgbaImage,
    pub history: SnapshotHistory,
    /// Where the image was loaded from.
    pub source_path: Option<PathBuf>,
    /// Bumped on every change to `current`; the view re-uploads its texture
    /// when this moves.
    generation: u64,
}

impl EditorState {
    pub fn new(image: RgbaImage, source_path: Option<PathBuf>) -> Self {
        Self {
            original: image.clone(),
            current: image,
            history: SnapshotHistory::default(),
            source_path,
            generation: 0,
        }
    }

    pub fn current(&self) -> &RgbaImage {
        &self.current
    }

    pub fn original(&self) -> &RgbaImage {
        &self.original
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.current.dimensions()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Install `next` as the current image, remembering the outgoing state as
    /// an undo step named `description`. Any redo steps are discarded.
    pub fn commit(&mut self, description: &str, next: RgbaImage) {
        let prev = std::mem::replace(&mut self.current, next);
        self.history.push(ImageSnapshot::new(description, prev));
        self.generation += 1;
    }

    /// Undo the last edit. Returns its description, or `None` when there is
    /// nothing to undo.
    pub fn undo(&mut self) -> Option<String> {
        let description = self.history.undo(&mut self.current)?;
        self.generation += 1;
        Some(description)
    }

    /// Redo the last undone edit. Returns its description, or `None` when
    /// there is nothing to redo.
    pub fn redo(&mut self) -> Option<String> {
        let description = self.history.redo(&mut self.current)?;
        self.generation += 1;
        Some(description)
    }

    /// Restore the originally loaded image and drop the whole edit history.
    /// There is no undo past a reset.
    pub fn reset(&mut self) {
        self.current = self.original.clone();
        self.history.clear();
        self.generation += 1;
    }

    /// File name of the source image, for the window title.
    pub fn display_name(&self) -> Option<String> {
        self.source_path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(v: u8) -> RgbaImage {
        RgbaImage::from_pixel(4, 4, Rgba([v, v, v, 255]))
    }

    #[test]
    fn commit_then_undo_restores_previous_state() {
        let mut editor = EditorState::new(solid(10), None);
        editor.commit("Blur", solid(20));
        assert_eq!(editor.current().get_pixel(0, 0)[0], 20);

        assert_eq!(editor.undo().as_deref(), Some("Blur"));
        assert_eq!(editor.current().get_pixel(0, 0)[0], 10);

        assert_eq!(editor.redo().as_deref(), Some("Blur"));
        assert_eq!(editor.current().get_pixel(0, 0)[0], 20);
    }

    #[test]
    fn new_commit_discards_redo_steps() {
        let mut editor = EditorState::new(solid(1), None);
        editor.commit("Sepia", solid(2));
        editor.undo();
        assert!(editor.history.can_redo());

        editor.commit("Crop", solid(3));
        assert!(!editor.history.can_redo());
        assert!(editor.redo().is_none());
        assert_eq!(editor.current().get_pixel(0, 0)[0], 3);
    }

    #[test]
    fn reset_restores_original_and_clears_history() {
        let mut editor = EditorState::new(solid(5), None);
        editor.commit("Blur", solid(6));
        editor.commit("Sharpen", solid(7));

        editor.reset();
        assert_eq!(editor.current().get_pixel(0, 0)[0], 5);
        assert!(!editor.history.can_undo());
        assert!(!editor.history.can_redo());
        assert!(editor.undo().is_none());
    }

    #[test]
    fn generation_moves_on_every_change() {
        let mut editor = EditorState::new(solid(1), None);
        let g0 = editor.generation();
        editor.commit("Blur", solid(2));
        let g1 = editor.generation();
        assert_ne!(g0, g1);
        editor.undo();
        assert_ne!(editor.generation(), g1);
    }

    #[test]
    fn display_name_uses_the_file_name() {
        let editor = EditorState::new(solid(1), Some(PathBuf::from("/photos/cat.png")));
        assert_eq!(editor.display_name().as_deref(), Some("cat.png"));
        let editor = EditorState::new(solid(1), None);
        assert!(editor.display_name().is_none());
    }
}
