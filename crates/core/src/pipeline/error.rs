use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Stage-tagged pipeline failure. Every variant is fatal to the current
/// invocation: errors are logged with key and stage context, never retried
/// internally, and left to the triggering infrastructure to redeliver.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to fetch {bucket}/{key}: {source}")]
    Fetch {
        bucket: String,
        key: String,
        #[source]
        source: BoxError,
    },
    #[error("failed to decode image {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: image::ImageError,
    },
    #[error("face detection failed for {key}: {source}")]
    Inference {
        key: String,
        #[source]
        source: BoxError,
    },
    #[error("failed to encode processed image {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to upload {bucket}/{key}: {source}")]
    Upload {
        bucket: String,
        key: String,
        #[source]
        source: BoxError,
    },
}
