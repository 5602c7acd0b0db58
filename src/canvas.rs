//! Canvas view: draws the current image fitted and centered in the central
//! panel, handles the crop drag interaction, and keeps the egui texture in
//! sync with the editor state.

use eframe::egui;
use egui::{Color32, Pos2, Rect, Rounding, Sense, Stroke, TextureOptions, Vec2};

use crate::editor::EditorState;

/// Fit an image into the available screen rect without upscaling past 1:1.
/// Returns the centered screen rect the image should occupy and the applied
/// scale factor.
pub fn fit_image_rect(img_w: u32, img_h: u32, avail: Rect) -> (Rect, f32) {
    let iw = img_w.max(1) as f32;
    let ih = img_h.max(1) as f32;
    let scale = (avail.width() / iw).min(avail.height() / ih).min(1.0);
    let size = Vec2::new(iw * scale, ih * scale);
    (Rect::from_center_size(avail.center(), size), scale)
}

/// Map a screen position to image pixel coordinates given the displayed
/// image rect and scale. The result may lie outside the image; crop clamping
/// happens later.
pub fn screen_to_image(pos: Pos2, image_rect: Rect, scale: f32) -> (f32, f32) {
    (
        (pos.x - image_rect.min.x) / scale,
        (pos.y - image_rect.min.y) / scale,
    )
}

/// A finished crop drag, both corners in image pixel coordinates.
#[derive(Clone, Copy, Debug)]
pub struct CropSelection {
    pub ax: f32,
    pub ay: f32,
    pub bx: f32,
    pub by: f32,
}

struct CropDrag {
    start: Pos2,
    current: Pos2,
}

#[derive(Default)]
pub struct CanvasView {
    texture: Option<egui::TextureHandle>,
    uploaded_generation: Option<u64>,
    crop_drag: Option<CropDrag>,
    /// Display scale of the last frame, for the status bar.
    pub last_scale: f32,
}

impl CanvasView {
    /// Drop the cached texture so the next frame re-uploads from scratch.
    /// Used when a new image is loaded.
    pub fn invalidate(&mut self) {
        self.texture = None;
        self.uploaded_generation = None;
        self.crop_drag = None;
    }

    pub fn cancel_crop_drag(&mut self) {
        self.crop_drag = None;
    }

    fn ensure_texture(&mut self, ctx: &egui::Context, editor: &EditorState) {
        if self.texture.is_some() && self.uploaded_generation == Some(editor.generation()) {
            return;
        }
        let image = editor.current();
        let (w, h) = image.dimensions();
        let color_image = egui::ColorImage::from_rgba_unmultiplied(
            [w as usize, h as usize],
            image.as_raw(),
        );
        self.texture = Some(ctx.load_texture("canvas", color_image, TextureOptions::LINEAR));
        self.uploaded_generation = Some(editor.generation());
    }

    /// Draw the image and run the crop interaction. Returns a selection when
    /// a crop drag finishes.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        editor: &EditorState,
        crop_active: bool,
    ) -> Option<CropSelection> {
        self.ensure_texture(ui.ctx(), editor);

        let avail = ui.available_rect_before_wrap();
        let sense = if crop_active {
            Sense::click_and_drag()
        } else {
            Sense::hover()
        };
        let response = ui.allocate_rect(avail, sense);
        let painter = ui.painter_at(avail);

        let (img_w, img_h) = editor.dimensions();
        let (image_rect, scale) = fit_image_rect(img_w, img_h, avail);
        self.last_scale = scale;

        if let Some(texture) = &self.texture {
            painter.image(
                texture.id(),
                image_rect,
                Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );
        }

        if !crop_active {
            self.crop_drag = None;
            return None;
        }

        let mut finished = None;
        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.crop_drag = Some(CropDrag {
                    start: pos,
                    current: pos,
                });
            }
        } else if response.dragged() {
            if let (Some(drag), Some(pos)) = (self.crop_drag.as_mut(), response.interact_pointer_pos()) {
                drag.current = pos;
            }
        } else if response.drag_released() {
            if let Some(drag) = self.crop_drag.take() {
                let (ax, ay) = screen_to_image(drag.start, image_rect, scale);
                let (bx, by) = screen_to_image(drag.current, image_rect, scale);
                finished = Some(CropSelection { ax, ay, bx, by });
            }
        }

        if let Some(drag) = &self.crop_drag {
            let rect = Rect::from_two_pos(drag.start, drag.current);
            painter.rect_stroke(rect, Rounding::ZERO, Stroke::new(2.0, Color32::RED));
        }

        finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(w: f32, h: f32) -> Rect {
        Rect::from_min_size(Pos2::new(0.0, 0.0), Vec2::new(w, h))
    }

    #[test]
    fn wide_panel_fits_by_height() {
        let (r, scale) = fit_image_rect(1000, 500, rect(2000.0, 250.0));
        assert!((scale - 0.5).abs() < 1e-6);
        assert!((r.width() - 500.0).abs() < 1e-3);
        assert!((r.height() - 250.0).abs() < 1e-3);
        // Centered horizontally in the wider panel.
        assert!((r.center().x - 1000.0).abs() < 1e-3);
    }

    #[test]
    fn small_images_are_not_upscaled() {
        let (r, scale) = fit_image_rect(100, 80, rect(1000.0, 1000.0));
        assert_eq!(scale, 1.0);
        assert!((r.width() - 100.0).abs() < 1e-3);
        assert!((r.height() - 80.0).abs() < 1e-3);
    }

    #[test]
    fn screen_to_image_inverts_the_display_transform() {
        let avail = rect(800.0, 600.0);
        let (image_rect, scale) = fit_image_rect(400, 300, avail);
        let (x, y) = screen_to_image(image_rect.min, image_rect, scale);
        assert!(x.abs() < 1e-3 && y.abs() < 1e-3);
        let (x, y) = screen_to_image(image_rect.max, image_rect, scale);
        assert!((x - 400.0).abs() < 1e-3);
        assert!((y - 300.0).abs() < 1e-3);
    }

    #[test]
    fn zero_sized_images_do_not_divide_by_zero() {
        let (_, scale) = fit_image_rect(0, 0, rect(100.0, 100.0));
        assert!(scale.is_finite());
    }
}
