use image::codecs::bmp::BmpEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageError, RgbaImage};
use rfd::FileDialog;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Extensions offered by the open dialog.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp"];

// ============================================================================
// SAVE FORMAT
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveFormat {
    Png,
    Jpeg,
    Webp,
    Bmp,
}

impl SaveFormat {
    /// Detect the format from a file extension. Unknown extensions fall back
    /// to PNG.
    pub fn from_extension(ext: &str) -> SaveFormat {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => SaveFormat::Jpeg,
            "webp" => SaveFormat::Webp,
            "bmp" => SaveFormat::Bmp,
            _ => SaveFormat::Png,
        }
    }

    pub fn from_path(path: &Path) -> SaveFormat {
        path.extension()
            .map(|e| Self::from_extension(&e.to_string_lossy()))
            .unwrap_or(SaveFormat::Png)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            SaveFormat::Png => "png",
            SaveFormat::Jpeg => "jpg",
            SaveFormat::Webp => "webp",
            SaveFormat::Bmp => "bmp",
        }
    }
}

// ============================================================================
// IMAGE ENCODING
// ============================================================================

/// Encode and write an image to a file through a buffered writer.
pub fn encode_and_write(
    image: &RgbaImage,
    path: &Path,
    format: SaveFormat,
    quality: u8,
) -> Result<(), ImageError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    match format {
        SaveFormat::Png => {
            let encoder = PngEncoder::new(&mut writer);
            #[allow(deprecated)]
            encoder.encode(
                image.as_raw(),
                image.width(),
                image.height(),
                image::ColorType::Rgba8,
            )?;
        }
        SaveFormat::Jpeg => {
            // JPEG doesn't support alpha, convert to RGB
            let rgb_image = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            let mut encoder = JpegEncoder::new_with_quality(&mut writer, quality);
            encoder.encode(
                rgb_image.as_raw(),
                rgb_image.width(),
                rgb_image.height(),
                image::ColorType::Rgb8,
            )?;
        }
        SaveFormat::Webp => {
            let dyn_img = DynamicImage::ImageRgba8(image.clone());
            dyn_img.save(path)?;
        }
        SaveFormat::Bmp => {
            let mut encoder = BmpEncoder::new(&mut writer);
            encoder.encode(
                image.as_raw(),
                image.width(),
                image.height(),
                image::ColorType::Rgba8,
            )?;
        }
    }

    Ok(())
}

/// Decode an image file to RGBA8. Used by the CLI launch path, where no
/// dialog is involved.
pub fn load_image_path(path: &Path) -> Result<RgbaImage, String> {
    match image::open(path) {
        Ok(img) => Ok(img.to_rgba8()),
        Err(e) => Err(format!("Failed to open {}: {}", path.display(), e)),
    }
}

// ============================================================================
// FILE HANDLER - dialogs + current-path bookkeeping
// ============================================================================

pub struct FileHandler {
    /// Current file path (None until the image is first saved or opened)
    pub current_path: Option<PathBuf>,
    /// Last used save format
    pub last_format: SaveFormat,
    /// Last used quality setting
    pub last_quality: u8,
}

impl Default for FileHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl FileHandler {
    pub fn new() -> Self {
        Self {
            current_path: None,
            last_format: SaveFormat::Png,
            last_quality: 90,
        }
    }

    pub fn has_current_path(&self) -> bool {
        self.current_path.is_some()
    }

    /// Open an image file using the native file dialog.
    /// Returns the loaded image and its path on success.
    pub fn open_image(&mut self) -> Option<(RgbaImage, PathBuf)> {
        let mut dialog = FileDialog::new().add_filter("Images", IMAGE_EXTENSIONS);
        if let Some(dir) = self.current_path.as_ref().and_then(|p| p.parent()) {
            dialog = dialog.set_directory(dir);
        }
        let path = dialog.pick_file()?;

        match image::open(&path) {
            Ok(img) => {
                let rgba = img.to_rgba8();
                self.current_path = Some(path.clone());
                self.last_format = SaveFormat::from_path(&path);
                Some((rgba, path))
            }
            Err(e) => {
                log_err!("Failed to open image {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Ask for a destination and save the image there. Returns the chosen
    /// path on success, `None` if the dialog was dismissed.
    pub fn save_image_as(
        &mut self,
        image: &RgbaImage,
        quality: u8,
    ) -> Option<Result<PathBuf, ImageError>> {
        let mut dialog = FileDialog::new()
            .add_filter("PNG", &["png"])
            .add_filter("JPEG", &["jpg", "jpeg"])
            .add_filter("WEBP", &["webp"])
            .add_filter("BMP", &["bmp"]);
        if let Some(dir) = self.current_path.as_ref().and_then(|p| p.parent()) {
            dialog = dialog.set_directory(dir);
        }
        let stem = self
            .current_path
            .as_ref()
            .and_then(|p| p.file_stem())
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string());
        let path = dialog
            .set_file_name(&format!("{}.{}", stem, self.last_format.extension()))
            .save_file()?;

        let format = SaveFormat::from_path(&path);
        Some(match encode_and_write(image, &path, format, quality) {
            Ok(()) => {
                self.current_path = Some(path.clone());
                self.last_format = format;
                self.last_quality = quality;
                Ok(path)
            }
            Err(e) => Err(e),
        })
    }

    /// Save to the current path with last-used settings.
    /// Returns Err if no current path is set.
    pub fn quick_save(&mut self, image: &RgbaImage) -> Result<PathBuf, ImageError> {
        if let Some(path) = self.current_path.clone() {
            encode_and_write(image, &path, self.last_format, self.last_quality)?;
            Ok(path)
        } else {
            Err(ImageError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No file path set for quick save",
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn format_detection_from_extensions() {
        assert_eq!(SaveFormat::from_extension("PNG"), SaveFormat::Png);
        assert_eq!(SaveFormat::from_extension("jpg"), SaveFormat::Jpeg);
        assert_eq!(SaveFormat::from_extension("JPEG"), SaveFormat::Jpeg);
        assert_eq!(SaveFormat::from_extension("webp"), SaveFormat::Webp);
        assert_eq!(SaveFormat::from_extension("bmp"), SaveFormat::Bmp);
        // Unknown extensions fall back to PNG.
        assert_eq!(SaveFormat::from_extension("tiff"), SaveFormat::Png);
    }

    #[test]
    fn format_detection_from_paths() {
        assert_eq!(
            SaveFormat::from_path(Path::new("/tmp/photo.JPG")),
            SaveFormat::Jpeg
        );
        assert_eq!(SaveFormat::from_path(Path::new("noext")), SaveFormat::Png);
    }

    #[test]
    fn png_roundtrip_through_disk() {
        let src = RgbaImage::from_fn(5, 3, |x, y| Rgba([x as u8 * 40, y as u8 * 60, 7, 255]));
        let path = std::env::temp_dir().join("edinity_io_test_roundtrip.png");

        encode_and_write(&src, &path, SaveFormat::Png, 90).unwrap();
        let back = load_image_path(&path).unwrap();
        assert_eq!(back.dimensions(), (5, 3));
        assert_eq!(back.as_raw(), src.as_raw());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn quick_save_without_path_errors() {
        let mut handler = FileHandler::new();
        let img = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        assert!(handler.quick_save(&img).is_err());
    }

    #[test]
    fn missing_file_load_reports_the_path() {
        let err = load_image_path(Path::new("/nonexistent/edinity.png")).unwrap_err();
        assert!(err.contains("/nonexistent/edinity.png"));
    }
}
