use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use thiserror::Error;
use uuid::Uuid;

/// Upload limits for portfolio images. The site serves these directly, so
/// anything bigger than 1 MiB or narrower than the portfolio grid is
/// rejected before it reaches the store.
pub const MAX_FILE_BYTES: u64 = 1024 * 1024;
pub const MIN_WIDTH: u32 = 640;

pub const ALLOWED_FORMATS: [ImageFormat; 3] =
    [ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::WebP];

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("unsupported image format (JPG, PNG or WebP only)")]
    UnsupportedFormat,
    #[error("image is {0} bytes; the limit is 1 MiB")]
    TooLarge(u64),
    #[error("image width {0}px is below the 640px minimum")]
    TooNarrow(u32),
    #[error("could not read image: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedImage {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pub size: u64,
}

/// Validate raw upload bytes: sniffed format (the file name is not
/// trusted), size cap, then minimum width. Checks run in that order and the
/// first failure wins.
pub fn validate_image_bytes(data: &[u8]) -> Result<ValidatedImage, UploadError> {
    let size = data.len() as u64;

    let format = image::guess_format(data).map_err(|_| UploadError::UnsupportedFormat)?;
    if !ALLOWED_FORMATS.contains(&format) {
        return Err(UploadError::UnsupportedFormat);
    }

    if size > MAX_FILE_BYTES {
        return Err(UploadError::TooLarge(size));
    }

    let (width, height) = image::ImageReader::with_format(Cursor::new(data), format)
        .into_dimensions()?;
    if width < MIN_WIDTH {
        return Err(UploadError::TooNarrow(width));
    }

    Ok(ValidatedImage {
        format,
        width,
        height,
        size,
    })
}

pub fn validate_image_file(path: &Path) -> Result<ValidatedImage, UploadError> {
    // Size check first so an oversized file is never read into memory.
    let size = std::fs::metadata(path)?.len();
    if size > MAX_FILE_BYTES {
        return Err(UploadError::TooLarge(size));
    }

    let data = std::fs::read(path)?;
    validate_image_bytes(&data)
}

/// Collision-free name for the stored copy, with the extension taken from
/// the sniffed format.
pub fn storage_file_name(format: ImageFormat) -> String {
    let ext = match format {
        ImageFormat::Jpeg => "jpg",
        ImageFormat::Png => "png",
        ImageFormat::WebP => "webp",
        other => other.extensions_str().first().copied().unwrap_or("bin"),
    };
    format!("{}.{}", Uuid::new_v4(), ext)
}

/// Validate `source` and copy it into `images_dir` under a generated name.
pub fn store_upload(images_dir: &Path, source: &Path) -> Result<PathBuf, UploadError> {
    let validated = validate_image_file(source)?;

    std::fs::create_dir_all(images_dir)?;
    let dest = images_dir.join(storage_file_name(validated.format));
    std::fs::copy(source, &dest)?;

    tracing::info!(
        "Stored {}x{} image at {}",
        validated.width,
        validated.height,
        dest.display()
    );
    Ok(dest)
}
