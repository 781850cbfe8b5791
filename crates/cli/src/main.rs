use std::io::Read;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;

use anonymiser_core::blurring::domain::region_blurrer::RegionBlurrer;
use anonymiser_core::blurring::infrastructure::gaussian_region_blurrer::{
    GaussianRegionBlurrer, DEFAULT_BLUR_FACTOR,
};
use anonymiser_core::detection::domain::face_detector::FaceDetector;
use anonymiser_core::detection::infrastructure::model_resolver;
use anonymiser_core::detection::infrastructure::onnx_ssd_detector::OnnxSsdDetector;
use anonymiser_core::events::extract_notifications;
use anonymiser_core::pipeline::anonymise_image_use_case::AnonymiseImageUseCase;
use anonymiser_core::shared::constants::{
    DEFAULT_JPEG_QUALITY, DEFAULT_STORE_ENDPOINT, DEFAULT_STORE_TIMEOUT_SECS, SSD_MODEL_NAME,
    SSD_MODEL_URL,
};
use anonymiser_core::storage::domain::object_store::ObjectStore;
use anonymiser_core::storage::infrastructure::http_object_store::HttpObjectStore;

/// Face anonymisation worker: processes a batch of storage-change
/// notifications, blurring faces in each referenced image.
#[derive(Parser)]
#[command(name = "anonymiser")]
struct Cli {
    /// Event batch JSON file ("-" reads from stdin).
    event: PathBuf,

    /// Bucket that receives the processed images.
    #[arg(long)]
    output_bucket: String,

    /// Object store endpoint domain (objects live at https://{bucket}.{endpoint}/{key}).
    #[arg(long, default_value = DEFAULT_STORE_ENDPOINT)]
    endpoint: String,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, default_value = "0.6")]
    confidence: f32,

    /// Blur factor: kernel size is region size divided by this (must be > 0).
    #[arg(long, default_value_t = DEFAULT_BLUR_FACTOR)]
    blur_factor: f64,

    /// JPEG quality for processed images (1-100).
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY)]
    jpeg_quality: u8,

    /// Timeout for store fetch/upload requests, in seconds.
    #[arg(long, default_value_t = DEFAULT_STORE_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Path to a local SSD model file (skips cache/download).
    #[arg(long)]
    model: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let raw_event = read_event(&cli.event)?;
    let notifications = extract_notifications(&raw_event)?;
    if notifications.is_empty() {
        log::info!("event batch contains no notifications, nothing to do");
        return Ok(());
    }
    log::info!("processing {} notifications", notifications.len());

    let model_path = model_resolver::resolve(SSD_MODEL_NAME, SSD_MODEL_URL, cli.model.as_deref())?;
    let detector: Box<dyn FaceDetector> =
        Box::new(OnnxSsdDetector::new(&model_path, cli.confidence)?);
    let blurrer: Box<dyn RegionBlurrer> = Box::new(GaussianRegionBlurrer::new(cli.blur_factor));
    let store: Box<dyn ObjectStore> = Box::new(HttpObjectStore::new(
        &cli.endpoint,
        Duration::from_secs(cli.timeout_secs),
    )?);

    let mut use_case = AnonymiseImageUseCase::new(
        store,
        detector,
        blurrer,
        cli.output_bucket.clone(),
        cli.jpeg_quality,
    );
    use_case.run(&notifications)?;
    log::info!("batch complete: {} images anonymised", notifications.len());
    Ok(())
}

fn read_event(path: &PathBuf) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    if path.as_os_str() == "-" {
        let mut raw = String::new();
        std::io::stdin().read_to_string(&mut raw)?;
        Ok(raw)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if !(0.0..=1.0).contains(&cli.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            cli.confidence
        )
        .into());
    }
    if cli.blur_factor <= 0.0 {
        return Err(format!("Blur factor must be > 0, got {}", cli.blur_factor).into());
    }
    if cli.jpeg_quality == 0 || cli.jpeg_quality > 100 {
        return Err(format!(
            "JPEG quality must be between 1 and 100, got {}",
            cli.jpeg_quality
        )
        .into());
    }
    if cli.timeout_secs == 0 {
        return Err("Timeout must be at least 1 second".into());
    }
    Ok(())
}
