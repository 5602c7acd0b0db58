use edinity::editor::EditorState;
use edinity::ops::effects::EffectKind;
use edinity::ops::filters::FilterKind;
use edinity::ops::{adjustments, transform};
use image::{Rgba, RgbaImage};

// Helper to build a small test photo with some tonal variety
fn test_photo() -> RgbaImage {
    RgbaImage::from_fn(16, 12, |x, y| {
        Rgba([
            (x * 16) as u8,
            (y * 20) as u8,
            ((x + y) * 8) as u8,
            255,
        ])
    })
}

#[test]
fn edit_undo_redo_walks_the_same_states() {
    let mut editor = EditorState::new(test_photo(), None);

    let sepia = FilterKind::Sepia.apply(editor.current());
    editor.commit(FilterKind::Sepia.label(), sepia.clone());

    let blurred = EffectKind::Blur.apply(editor.current());
    editor.commit(EffectKind::Blur.label(), blurred.clone());

    assert_eq!(editor.current().as_raw(), blurred.as_raw());
    assert_eq!(editor.history.undo_count(), 2);

    assert_eq!(editor.undo().as_deref(), Some("Blur"));
    assert_eq!(editor.current().as_raw(), sepia.as_raw());

    assert_eq!(editor.undo().as_deref(), Some("Sepia"));
    assert_eq!(editor.current().as_raw(), test_photo().as_raw());
    assert!(editor.undo().is_none());

    assert_eq!(editor.redo().as_deref(), Some("Sepia"));
    assert_eq!(editor.redo().as_deref(), Some("Blur"));
    assert_eq!(editor.current().as_raw(), blurred.as_raw());
}

#[test]
fn adjustments_recompute_from_the_original() {
    let mut editor = EditorState::new(test_photo(), None);

    // Darken the image via a filter first.
    let gray = FilterKind::BlackAndWhite.apply(editor.current());
    editor.commit("Black & White", gray);

    // The Adjust tool starts from the original, so its output is identical
    // whether or not other edits happened in between.
    let adjusted = adjustments::enhance(editor.original(), 1.5, 1.2, 0.8);
    editor.commit("Adjust", adjusted.clone());

    let from_scratch = adjustments::enhance(&test_photo(), 1.5, 1.2, 0.8);
    assert_eq!(editor.current().as_raw(), from_scratch.as_raw());
    assert_eq!(adjusted.as_raw(), from_scratch.as_raw());
}

#[test]
fn crop_then_undo_restores_full_size() {
    let mut editor = EditorState::new(test_photo(), None);

    let rect = transform::crop_rect_from_corners(16, 12, 4.0, 2.0, 12.0, 10.0).unwrap();
    let cropped = transform::crop(editor.current(), rect);
    editor.commit("Crop", cropped);

    assert_eq!(editor.dimensions(), (8, 8));
    assert_eq!(editor.current().get_pixel(0, 0).0, test_photo().get_pixel(4, 2).0);

    editor.undo();
    assert_eq!(editor.dimensions(), (16, 12));
}

#[test]
fn reset_discards_everything_including_redo() {
    let mut editor = EditorState::new(test_photo(), None);

    editor.commit("Vignette", EffectKind::Vignette.apply(editor.current()));
    editor.commit("Sharpen", EffectKind::Sharpen.apply(editor.current()));
    editor.undo();
    assert!(editor.history.can_redo());

    editor.reset();
    assert_eq!(editor.current().as_raw(), test_photo().as_raw());
    assert!(!editor.history.can_undo());
    assert!(!editor.history.can_redo());
}

#[test]
fn filters_compound_while_adjust_does_not() {
    let mut editor = EditorState::new(test_photo(), None);

    editor.commit("Sepia", FilterKind::Sepia.apply(editor.current()));
    editor.commit(
        "Black & White",
        FilterKind::BlackAndWhite.apply(editor.current()),
    );

    // Grayscale of a sepia image is not the grayscale of the original.
    let direct_gray = FilterKind::BlackAndWhite.apply(&test_photo());
    assert_ne!(editor.current().as_raw(), direct_gray.as_raw());
}
