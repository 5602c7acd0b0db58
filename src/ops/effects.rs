// ============================================================================
// IMAGE EFFECTS - Blur, Sharpen, Vignette
// ============================================================================
//
// Effects apply to the current image, one history entry each. Blur and
// sharpen share the separable Gaussian below; the vignette writes a
// border-distance mask into the alpha channel.
// ============================================================================

use image::RgbaImage;
use rayon::prelude::*;

/// Blur strength used by the Effects tool.
const BLUR_SIGMA: f32 = 2.0;
/// Unsharp-mask parameters used by the Effects tool.
const SHARPEN_AMOUNT: f32 = 1.0;
const SHARPEN_RADIUS: f32 = 1.0;

/// The effects offered by the Effects tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectKind {
    Blur,
    Sharpen,
    Vignette,
}

impl EffectKind {
    pub fn label(&self) -> &'static str {
        match self {
            EffectKind::Blur => "Blur",
            EffectKind::Sharpen => "Sharpen",
            EffectKind::Vignette => "Vignette",
        }
    }

    pub fn all() -> &'static [EffectKind] {
        &[EffectKind::Blur, EffectKind::Sharpen, EffectKind::Vignette]
    }

    pub fn apply(&self, src: &RgbaImage) -> RgbaImage {
        match self {
            EffectKind::Blur => gaussian_blur(src, BLUR_SIGMA),
            EffectKind::Sharpen => sharpen(src, SHARPEN_AMOUNT, SHARPEN_RADIUS),
            EffectKind::Vignette => vignette(src),
        }
    }
}

// ---------------------------------------------------------------------------
//  Parallel separable Gaussian blur (rayon)
// ---------------------------------------------------------------------------

/// Build a 1-D Gaussian kernel truncated at ceil(3*sigma).
fn build_gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (sigma * 3.0).ceil() as usize;
    if radius == 0 {
        return vec![1.0];
    }
    let len = radius * 2 + 1;
    let mut kernel = vec![0.0f32; len];
    let s2 = 2.0 * sigma * sigma;
    let mut sum = 0.0f32;
    for (i, v) in kernel.iter_mut().enumerate() {
        let x = i as f32 - radius as f32;
        *v = (-x * x / s2).exp();
        sum += *v;
    }
    let inv = 1.0 / sum;
    for v in &mut kernel {
        *v *= inv;
    }
    kernel
}

/// Two-pass separable Gaussian blur with clamp-to-edge sampling.
/// Both passes are parallelized by row.
pub fn gaussian_blur(src: &RgbaImage, sigma: f32) -> RgbaImage {
    let w = src.width() as usize;
    let h = src.height() as usize;
    if w == 0 || h == 0 {
        return src.clone();
    }

    let kernel = build_gaussian_kernel(sigma);
    let radius = kernel.len() / 2;
    let src_raw = src.as_raw();

    let pixel_count = w * h * 4;
    let buf_in: Vec<f32> = src_raw.iter().map(|&b| b as f32).collect();

    // Horizontal pass
    let mut buf_h = vec![0.0f32; pixel_count];
    buf_h.par_chunks_mut(w * 4).enumerate().for_each(|(y, row_out)| {
        let row_start = y * w * 4;
        for x in 0..w {
            let mut acc = [0.0f32; 4];
            for (ki, &kv) in kernel.iter().enumerate() {
                let sx = (x as isize + ki as isize - radius as isize)
                    .clamp(0, w as isize - 1) as usize;
                let idx = row_start + sx * 4;
                for c in 0..4 {
                    acc[c] += buf_in[idx + c] * kv;
                }
            }
            let out_idx = x * 4;
            row_out[out_idx..out_idx + 4].copy_from_slice(&acc);
        }
    });

    // Vertical pass
    let mut buf_v = vec![0.0f32; pixel_count];
    buf_v.par_chunks_mut(w * 4).enumerate().for_each(|(y, row_out)| {
        for x in 0..w {
            let mut acc = [0.0f32; 4];
            for (ki, &kv) in kernel.iter().enumerate() {
                let sy = (y as isize + ki as isize - radius as isize)
                    .clamp(0, h as isize - 1) as usize;
                let idx = sy * w * 4 + x * 4;
                for c in 0..4 {
                    acc[c] += buf_h[idx + c] * kv;
                }
            }
            let out_idx = x * 4;
            row_out[out_idx..out_idx + 4].copy_from_slice(&acc);
        }
    });

    let dst_raw: Vec<u8> = buf_v
        .iter()
        .map(|&v| v.round().clamp(0.0, 255.0) as u8)
        .collect();
    RgbaImage::from_raw(w as u32, h as u32, dst_raw).unwrap()
}

/// Unsharp mask: result = original + amount * (original - blurred).
/// Alpha is preserved.
pub fn sharpen(src: &RgbaImage, amount: f32, radius: f32) -> RgbaImage {
    let w = src.width() as usize;
    let h = src.height() as usize;
    if w == 0 || h == 0 {
        return src.clone();
    }

    let blurred = gaussian_blur(src, radius);
    let src_raw = src.as_raw();
    let blur_raw = blurred.as_raw();
    let stride = w * 4;
    let mut dst_raw = vec![0u8; w * h * 4];

    dst_raw
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row_out)| {
            for x in 0..w {
                let pi = x * 4;
                let si = y * stride + pi;
                for c in 0..3 {
                    let s = src_raw[si + c] as f32;
                    let b = blur_raw[si + c] as f32;
                    let v = s + amount * (s - b);
                    row_out[pi + c] = v.round().clamp(0.0, 255.0) as u8;
                }
                row_out[pi + 3] = src_raw[si + 3];
            }
        });

    RgbaImage::from_raw(w as u32, h as u32, dst_raw).unwrap()
}

/// Vignette: replaces the alpha channel with a border-distance mask.
/// For each pixel, the distance to the nearest image edge is scaled so that
/// alpha fades to zero at the border and reaches full opacity half the
/// shorter dimension in. Color channels are untouched.
pub fn vignette(src: &RgbaImage) -> RgbaImage {
    let w = src.width() as usize;
    let h = src.height() as usize;
    if w == 0 || h == 0 {
        return src.clone();
    }

    let half = ((w.min(h) / 2).max(1)) as f32;
    let src_raw = src.as_raw();
    let stride = w * 4;
    let mut dst_raw = vec![0u8; w * h * 4];

    dst_raw
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row_out)| {
            let row_in = &src_raw[y * stride..(y + 1) * stride];
            for x in 0..w {
                let pi = x * 4;
                row_out[pi..pi + 3].copy_from_slice(&row_in[pi..pi + 3]);
                let d = x.min(w - x).min(y.min(h - y)) as f32;
                row_out[pi + 3] = (255.0 * d / half).clamp(0.0, 255.0) as u8;
            }
        });

    RgbaImage::from_raw(w as u32, h as u32, dst_raw).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn kernel_is_normalized_and_odd() {
        let kernel = build_gaussian_kernel(2.0);
        assert_eq!(kernel.len() % 2, 1);
        let sum: f32 = kernel.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
    }

    #[test]
    fn blur_preserves_constant_images() {
        let src = RgbaImage::from_pixel(9, 9, Rgba([80, 120, 160, 255]));
        let out = gaussian_blur(&src, 2.0);
        for p in out.pixels() {
            assert_eq!(p.0, [80, 120, 160, 255]);
        }
    }

    #[test]
    fn blur_softens_a_hard_edge() {
        let src = RgbaImage::from_fn(16, 4, |x, _| {
            if x < 8 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        let out = gaussian_blur(&src, 2.0);
        let near_edge = out.get_pixel(8, 2)[0];
        assert!(near_edge > 0 && near_edge < 255);
    }

    #[test]
    fn zero_amount_sharpen_is_identity() {
        let src = RgbaImage::from_fn(8, 8, |x, y| Rgba([(x * 30) as u8, (y * 30) as u8, 99, 255]));
        let out = sharpen(&src, 0.0, 1.0);
        assert_eq!(out.as_raw(), src.as_raw());
    }

    #[test]
    fn sharpen_increases_edge_contrast() {
        let src = RgbaImage::from_fn(16, 4, |x, _| {
            if x < 8 {
                Rgba([60, 60, 60, 255])
            } else {
                Rgba([200, 200, 200, 255])
            }
        });
        let out = sharpen(&src, 1.0, 1.0);
        // Overshoot on both sides of the boundary.
        assert!(out.get_pixel(7, 2)[0] < 60);
        assert!(out.get_pixel(8, 2)[0] > 200);
    }

    #[test]
    fn vignette_fades_alpha_toward_borders() {
        let src = RgbaImage::from_pixel(20, 20, Rgba([10, 20, 30, 255]));
        let out = vignette(&src);
        // Border pixels are fully transparent, the center fully opaque.
        assert_eq!(out.get_pixel(0, 10)[3], 0);
        assert_eq!(out.get_pixel(10, 0)[3], 0);
        assert_eq!(out.get_pixel(10, 10)[3], 255);
        // Color channels are untouched.
        let center = out.get_pixel(10, 10);
        assert_eq!(&center.0[..3], &[10, 20, 30]);
        // Monotonic fade along a row toward the center.
        let a1 = out.get_pixel(2, 10)[3];
        let a2 = out.get_pixel(5, 10)[3];
        assert!(a1 < a2);
    }
}
