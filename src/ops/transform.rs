// ============================================================================
// GEOMETRY OPERATIONS - crop
// ============================================================================

use image::{RgbaImage, imageops};

/// A crop region in image pixel coordinates, already clamped to the image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Build a crop rectangle from two drag corners in image space.
///
/// The corners may be given in any order and may lie outside the image; the
/// result is clamped to the image bounds. Returns `None` when the clamped
/// region is degenerate (covers less than one full pixel in either axis).
pub fn crop_rect_from_corners(
    img_w: u32,
    img_h: u32,
    ax: f32,
    ay: f32,
    bx: f32,
    by: f32,
) -> Option<CropRect> {
    if img_w == 0 || img_h == 0 {
        return None;
    }

    let min_x = ax.min(bx).max(0.0).floor() as u32;
    let min_y = ay.min(by).max(0.0).floor() as u32;
    let max_x = (ax.max(bx).ceil() as i64).clamp(0, img_w as i64) as u32;
    let max_y = (ay.max(by).ceil() as i64).clamp(0, img_h as i64) as u32;

    let min_x = min_x.min(img_w);
    let min_y = min_y.min(img_h);

    let width = max_x.saturating_sub(min_x);
    let height = max_y.saturating_sub(min_y);
    if width == 0 || height == 0 {
        return None;
    }

    Some(CropRect {
        x: min_x,
        y: min_y,
        width,
        height,
    })
}

/// Crop the image to `rect`. The rect must already be clamped
/// (`crop_rect_from_corners` guarantees this).
pub fn crop(src: &RgbaImage, rect: CropRect) -> RgbaImage {
    imageops::crop_imm(src, rect.x, rect.y, rect.width, rect.height).to_image()
}
