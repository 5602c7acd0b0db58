// ============================================================================
// IMAGE FILTERS - Black & White, Sepia, Vintage
// ============================================================================
//
// Filters apply to the current image and compound, one history entry each.
// ============================================================================

use image::RgbaImage;
use rayon::prelude::*;

use super::adjustments::{apply_pixel_transform, luma601};

/// Sepia duotone endpoints: shadows map to a dark brown, highlights to a
/// warm tan.
const SEPIA_BLACK: [f32; 3] = [0x70 as f32, 0x42 as f32, 0x14 as f32];
const SEPIA_WHITE: [f32; 3] = [0xC0 as f32, 0xA0 as f32, 0x80 as f32];

/// The filters offered by the Filters tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterKind {
    BlackAndWhite,
    Sepia,
    Vintage,
}

impl FilterKind {
    pub fn label(&self) -> &'static str {
        match self {
            FilterKind::BlackAndWhite => "Black & White",
            FilterKind::Sepia => "Sepia",
            FilterKind::Vintage => "Vintage",
        }
    }

    pub fn all() -> &'static [FilterKind] {
        &[
            FilterKind::BlackAndWhite,
            FilterKind::Sepia,
            FilterKind::Vintage,
        ]
    }

    pub fn apply(&self, src: &RgbaImage) -> RgbaImage {
        match self {
            FilterKind::BlackAndWhite => grayscale(src),
            FilterKind::Sepia => sepia(src),
            FilterKind::Vintage => contour(src),
        }
    }
}

/// Rec.601 luminance-based desaturation. Alpha is preserved.
pub fn grayscale(src: &RgbaImage) -> RgbaImage {
    apply_pixel_transform(src, |r, g, b, a| {
        let luma = luma601(r, g, b);
        (luma, luma, luma, a)
    })
}

/// Grayscale, then remap tones linearly between the sepia duotone endpoints.
pub fn sepia(src: &RgbaImage) -> RgbaImage {
    apply_pixel_transform(src, |r, g, b, a| {
        let t = luma601(r, g, b) / 255.0;
        (
            SEPIA_BLACK[0] + t * (SEPIA_WHITE[0] - SEPIA_BLACK[0]),
            SEPIA_BLACK[1] + t * (SEPIA_WHITE[1] - SEPIA_BLACK[1]),
            SEPIA_BLACK[2] + t * (SEPIA_WHITE[2] - SEPIA_BLACK[2]),
            a,
        )
    })
}

/// The "Vintage" look: a contour filter. 3x3 edge kernel (-1 everywhere,
/// +8 center), offset 255, so flat areas render white and edges draw dark
/// lines. Edge pixels sample clamp-to-edge; alpha is preserved.
pub fn contour(src: &RgbaImage) -> RgbaImage {
    let w = src.width() as usize;
    let h = src.height() as usize;
    if w == 0 || h == 0 {
        return src.clone();
    }

    let src_raw = src.as_raw();
    let mut dst_raw = vec![0u8; w * h * 4];
    let stride = w * 4;

    dst_raw
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row_out)| {
            for x in 0..w {
                let pi = x * 4;
                let mut acc = [0.0f32; 3];
                for ky in -1i32..=1 {
                    for kx in -1i32..=1 {
                        let sx = (x as i32 + kx).clamp(0, w as i32 - 1) as usize;
                        let sy = (y as i32 + ky).clamp(0, h as i32 - 1) as usize;
                        let si = sy * stride + sx * 4;
                        let weight = if kx == 0 && ky == 0 { 8.0 } else { -1.0 };
                        for c in 0..3 {
                            acc[c] += weight * src_raw[si + c] as f32;
                        }
                    }
                }
                for c in 0..3 {
                    row_out[pi + c] = (acc[c] + 255.0).round().clamp(0.0, 255.0) as u8;
                }
                row_out[pi + 3] = src_raw[y * stride + pi + 3];
            }
        });

    RgbaImage::from_raw(w as u32, h as u32, dst_raw).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn grayscale_equalizes_channels_and_keeps_alpha() {
        let src = RgbaImage::from_pixel(3, 3, Rgba([250, 10, 90, 64]));
        let out = grayscale(&src);
        let p = out.get_pixel(1, 1);
        assert_eq!(p[0], p[1]);
        assert_eq!(p[1], p[2]);
        assert_eq!(p[3], 64);
    }

    #[test]
    fn sepia_maps_black_and_white_to_duotone_endpoints() {
        let src = RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        let out = sepia(&src);
        assert_eq!(out.get_pixel(0, 0).0, [0x70, 0x42, 0x14, 255]);
        assert_eq!(out.get_pixel(1, 0).0, [0xC0, 0xA0, 0x80, 255]);
    }

    #[test]
    fn contour_renders_flat_areas_white() {
        let src = RgbaImage::from_pixel(5, 5, Rgba([123, 45, 67, 200]));
        let out = contour(&src);
        // Kernel sums to zero on constant input, leaving only the offset.
        let p = out.get_pixel(2, 2);
        assert_eq!(p.0, [255, 255, 255, 200]);
    }

    #[test]
    fn contour_darkens_edges() {
        let src = RgbaImage::from_fn(6, 6, |x, _| {
            if x < 3 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        let out = contour(&src);
        // The dark side of the boundary sees bright neighbors pull the
        // response below the offset.
        assert!(out.get_pixel(2, 3)[0] < 255);
        // Far from the edge everything is flat white.
        assert_eq!(out.get_pixel(0, 3)[0], 255);
    }

    #[test]
    fn filter_kind_dispatch_matches_direct_calls() {
        let src = RgbaImage::from_pixel(4, 4, Rgba([10, 200, 30, 255]));
        assert_eq!(
            FilterKind::Sepia.apply(&src).as_raw(),
            sepia(&src).as_raw()
        );
        assert_eq!(
            FilterKind::BlackAndWhite.apply(&src).as_raw(),
            grayscale(&src).as_raw()
        );
    }
}
