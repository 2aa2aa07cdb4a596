pub mod upload;

pub use upload::{
    store_upload, validate_image_bytes, validate_image_file, UploadError, ValidatedImage,
    ALLOWED_FORMATS, MAX_FILE_BYTES, MIN_WIDTH,
};
