// ============================================================================
// ADJUSTMENT OPERATIONS - brightness / contrast / saturation
// ============================================================================
//
// The Adjust tool always starts over from the originally loaded image, so
// repeated tweaking never compounds. Each adjustment is a factor in
// 0.5..=2.0 with 1.0 as identity:
//   brightness: c' = c * f
//   contrast:   c' = mean + f * (c - mean)   (mean = Rec.601 luma mean)
//   saturation: c' = luma + f * (c - luma)   (per-pixel Rec.601 luma)
// Channel math runs in f32 and is clamped back to 0..=255; alpha is
// untouched. Rows are processed in parallel via rayon.
// ============================================================================

use image::RgbaImage;
use rayon::prelude::*;

/// Rec.601 luminance of an RGB triple in 0..=255 space.
#[inline]
pub(crate) fn luma601(r: f32, g: f32, b: f32) -> f32 {
    0.299 * r + 0.587 * g + 0.114 * b
}

/// Apply a per-pixel transform to every pixel, row-parallel.
/// `transform` receives and returns (r, g, b, a) as f32.
pub(crate) fn apply_pixel_transform<F>(src: &RgbaImage, transform: F) -> RgbaImage
where
    F: Fn(f32, f32, f32, f32) -> (f32, f32, f32, f32) + Sync,
{
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
            let row_in = &src_raw[y * stride..(y + 1) * stride];
            for x in 0..w {
                let pi = x * 4;
                let r = row_in[pi] as f32;
                let g = row_in[pi + 1] as f32;
                let b = row_in[pi + 2] as f32;
                let a = row_in[pi + 3] as f32;
                let (nr, ng, nb, na) = transform(r, g, b, a);
                row_out[pi] = nr.round().clamp(0.0, 255.0) as u8;
                row_out[pi + 1] = ng.round().clamp(0.0, 255.0) as u8;
                row_out[pi + 2] = nb.round().clamp(0.0, 255.0) as u8;
                row_out[pi + 3] = na.round().clamp(0.0, 255.0) as u8;
            }
        });

    RgbaImage::from_raw(w as u32, h as u32, dst_raw).unwrap()
}

/// Mean Rec.601 luminance of the whole image, in 0..=255 space.
fn mean_luma(src: &RgbaImage) -> f32 {
    let pixel_count = (src.width() as u64 * src.height() as u64).max(1);
    let sum: f64 = src
        .as_raw()
        .par_chunks_exact(4)
        .map(|p| luma601(p[0] as f32, p[1] as f32, p[2] as f32) as f64)
        .sum();
    (sum / pixel_count as f64) as f32
}

/// Scale every color channel by `factor`. 1.0 is identity, 0.0 is black.
pub fn brightness(src: &RgbaImage, factor: f32) -> RgbaImage {
    apply_pixel_transform(src, move |r, g, b, a| {
        (r * factor, g * factor, b * factor, a)
    })
}

/// Spread channels away from the image's mean luminance. 1.0 is identity,
/// 0.0 collapses the image to a flat grey at its mean.
pub fn contrast(src: &RgbaImage, factor: f32) -> RgbaImage {
    let mean = mean_luma(src);
    apply_pixel_transform(src, move |r, g, b, a| {
        (
            mean + factor * (r - mean),
            mean + factor * (g - mean),
            mean + factor * (b - mean),
            a,
        )
    })
}

/// Spread channels away from each pixel's own luminance. 1.0 is identity,
/// 0.0 fully desaturates.
pub fn saturation(src: &RgbaImage, factor: f32) -> RgbaImage {
    apply_pixel_transform(src, move |r, g, b, a| {
        let luma = luma601(r, g, b);
        (
            luma + factor * (r - luma),
            luma + factor * (g - luma),
            luma + factor * (b - luma),
            a,
        )
    })
}

/// The Adjust tool's full pipeline: brightness, then contrast, then
/// saturation. The contrast mean is measured after the brightness pass,
/// matching a chain of independent enhancers.
pub fn enhance(
    src: &RgbaImage,
    brightness_factor: f32,
    contrast_factor: f32,
    saturation_factor: f32,
) -> RgbaImage {
    let out = brightness(src, brightness_factor);
    let out = contrast(&out, contrast_factor);
    saturation(&out, saturation_factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn checker(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([200, 100, 40, 255])
            } else {
                Rgba([20, 60, 180, 128])
            }
        })
    }

    #[test]
    fn identity_factors_leave_pixels_untouched() {
        let src = checker(6, 4);
        assert_eq!(enhance(&src, 1.0, 1.0, 1.0).as_raw(), src.as_raw());
    }

    #[test]
    fn brightness_doubles_and_clamps() {
        let src = RgbaImage::from_pixel(2, 2, Rgba([10, 100, 200, 77]));
        let out = brightness(&src, 2.0);
        let p = out.get_pixel(0, 0);
        assert_eq!(p[0], 20);
        assert_eq!(p[1], 200);
        assert_eq!(p[2], 255); // clamped
        assert_eq!(p[3], 77); // alpha preserved
    }

    #[test]
    fn zero_contrast_collapses_to_mean() {
        let src = checker(4, 4);
        let out = contrast(&src, 0.0);
        let first = *out.get_pixel(0, 0);
        for p in out.pixels() {
            assert_eq!(p[0], first[0]);
            assert_eq!(p[1], first[1]);
            assert_eq!(p[2], first[2]);
        }
        // Channels all land on the shared mean grey.
        assert_eq!(first[0], first[1]);
        assert_eq!(first[1], first[2]);
    }

    #[test]
    fn zero_saturation_matches_grayscale() {
        let src = checker(4, 4);
        let out = saturation(&src, 0.0);
        for (p_in, p_out) in src.pixels().zip(out.pixels()) {
            let expected = luma601(p_in[0] as f32, p_in[1] as f32, p_in[2] as f32)
                .round()
                .clamp(0.0, 255.0) as u8;
            assert_eq!(p_out[0], expected);
            assert_eq!(p_out[1], expected);
            assert_eq!(p_out[2], expected);
            assert_eq!(p_out[3], p_in[3]);
        }
    }

    #[test]
    fn saturation_boost_pushes_channels_apart() {
        let src = RgbaImage::from_pixel(1, 1, Rgba([150, 100, 50, 255]));
        let out = saturation(&src, 2.0);
        let p = out.get_pixel(0, 0);
        assert!(p[0] > 150);
        assert!(p[2] < 50);
    }
}
