pub const SSD_MODEL_NAME: &str = "res10_300x300_ssd.onnx";
pub const SSD_MODEL_URL: &str =
    "https://huggingface.co/opencv-zoo/face_detection_ssd/resolve/main/res10_300x300_ssd.onnx";

/// Domain under which per-bucket object endpoints live:
/// objects are addressed as `https://{bucket}.{endpoint}/{key}`.
pub const DEFAULT_STORE_ENDPOINT: &str = "s3.amazonaws.com";

pub const PROCESSED_CONTENT_TYPE: &str = "image/jpeg";

/// JPEG quality for re-encoded output images.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Request timeout for object store fetch/upload calls, in seconds.
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 30;
