use crate::blurring::domain::region_blurrer::RegionBlurrer;
use crate::detection::domain::face_detector::FaceDetector;
use crate::events::ObjectNotification;
use crate::shared::codec;
use crate::shared::constants::PROCESSED_CONTENT_TYPE;
use crate::storage::domain::object_store::{ObjectStore, Visibility};

use super::error::PipelineError;

/// Per-notification anonymisation pipeline:
/// fetch → decode → detect → blur each region → encode → upload.
///
/// The store, detector, and blurrer are constructed once at startup and
/// passed in; nothing here reaches for ambient globals.
pub struct AnonymiseImageUseCase {
    store: Box<dyn ObjectStore>,
    detector: Box<dyn FaceDetector>,
    blurrer: Box<dyn RegionBlurrer>,
    output_bucket: String,
    jpeg_quality: u8,
}

impl AnonymiseImageUseCase {
    pub fn new(
        store: Box<dyn ObjectStore>,
        detector: Box<dyn FaceDetector>,
        blurrer: Box<dyn RegionBlurrer>,
        output_bucket: String,
        jpeg_quality: u8,
    ) -> Self {
        Self {
            store,
            detector,
            blurrer,
            output_bucket,
            jpeg_quality,
        }
    }

    /// Process a whole batch strictly in order. The first failure aborts
    /// the remaining notifications so the triggering infrastructure
    /// redelivers the batch as a unit.
    pub fn run(&mut self, notifications: &[ObjectNotification]) -> Result<(), PipelineError> {
        for notification in notifications {
            self.process(notification)?;
        }
        Ok(())
    }

    /// Process one notification end to end. Exactly one upload happens on
    /// success; any stage failure aborts before the upload.
    pub fn process(&mut self, notification: &ObjectNotification) -> Result<(), PipelineError> {
        let bucket = &notification.bucket;
        let key = &notification.key;

        let bytes = self
            .store
            .get(bucket, key)
            .map_err(|source| PipelineError::Fetch {
                bucket: bucket.clone(),
                key: key.clone(),
                source,
            })?;

        let mut image = codec::decode(&bytes).map_err(|source| PipelineError::Decode {
            key: key.clone(),
            source,
        })?;

        let regions = self
            .detector
            .detect(&image)
            .map_err(|source| PipelineError::Inference {
                key: key.clone(),
                source,
            })?;
        log::info!("detected {} faces in {key}", regions.len());

        for region in &regions {
            self.blurrer.blur(&mut image, region);
        }

        let encoded =
            codec::encode_jpeg(&image, self.jpeg_quality).map_err(|source| {
                PipelineError::Encode {
                    key: key.clone(),
                    source,
                }
            })?;

        log::info!(
            "uploading processed image {key} to bucket {}",
            self.output_bucket
        );
        self.store
            .put(
                &self.output_bucket,
                key,
                &encoded,
                PROCESSED_CONTENT_TYPE,
                Visibility::PublicRead,
            )
            .map_err(|source| PipelineError::Upload {
                bucket: self.output_bucket.clone(),
                key: key.clone(),
                source,
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::face_region::FaceRegion;
    use crate::shared::image::Image;
    use std::sync::{Arc, Mutex};

    // --- Stubs ---

    #[derive(Clone)]
    struct PutCall {
        bucket: String,
        key: String,
        content_type: String,
        visibility: Visibility,
    }

    struct StubStore {
        object: Result<Vec<u8>, String>,
        gets: Arc<Mutex<Vec<(String, String)>>>,
        puts: Arc<Mutex<Vec<PutCall>>>,
        fail_put: bool,
    }

    impl StubStore {
        fn new(object: Result<Vec<u8>, String>) -> Self {
            Self {
                object,
                gets: Arc::new(Mutex::new(Vec::new())),
                puts: Arc::new(Mutex::new(Vec::new())),
                fail_put: false,
            }
        }
    }

    impl ObjectStore for StubStore {
        fn get(
            &self,
            bucket: &str,
            key: &str,
        ) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>> {
            self.gets
                .lock()
                .unwrap()
                .push((bucket.to_string(), key.to_string()));
            self.object.clone().map_err(Into::into)
        }

        fn put(
            &self,
            bucket: &str,
            key: &str,
            _body: &[u8],
            content_type: &str,
            visibility: Visibility,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            if self.fail_put {
                return Err("upload refused".into());
            }
            self.puts.lock().unwrap().push(PutCall {
                bucket: bucket.to_string(),
                key: key.to_string(),
                content_type: content_type.to_string(),
                visibility,
            });
            Ok(())
        }
    }

    struct StubDetector {
        regions: Vec<FaceRegion>,
    }

    impl FaceDetector for StubDetector {
        fn detect(
            &mut self,
            _image: &Image,
        ) -> Result<Vec<FaceRegion>, Box<dyn std::error::Error + Send + Sync>> {
            Ok(self.regions.clone())
        }
    }

    struct FailingDetector;

    impl FaceDetector for FailingDetector {
        fn detect(
            &mut self,
            _image: &Image,
        ) -> Result<Vec<FaceRegion>, Box<dyn std::error::Error + Send + Sync>> {
            Err("engine failure".into())
        }
    }

    struct RecordingBlurrer {
        calls: Arc<Mutex<Vec<FaceRegion>>>,
    }

    impl RecordingBlurrer {
        fn new() -> Self {
            Self {
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl RegionBlurrer for RecordingBlurrer {
        fn blur(&self, _image: &mut Image, region: &FaceRegion) {
            self.calls.lock().unwrap().push(region.clone());
        }
    }

    // --- Helpers ---

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([120, 130, 140]));
        let mut bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();
        bytes
    }

    fn face(sx: u32, sy: u32, ex: u32, ey: u32, confidence: f32) -> FaceRegion {
        FaceRegion {
            start_x: sx,
            start_y: sy,
            end_x: ex,
            end_y: ey,
            confidence,
        }
    }

    fn notification(bucket: &str, key: &str) -> ObjectNotification {
        ObjectNotification {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    fn use_case(
        store: StubStore,
        detector: Box<dyn FaceDetector>,
        blurrer: Box<dyn RegionBlurrer>,
    ) -> AnonymiseImageUseCase {
        AnonymiseImageUseCase::new(Box::new(store), detector, blurrer, "processed".into(), 90)
    }

    // --- Tests ---

    #[test]
    fn test_end_to_end_single_notification() {
        let store = StubStore::new(Ok(png_bytes(100, 100)));
        let gets = store.gets.clone();
        let puts = store.puts.clone();
        let blurrer = RecordingBlurrer::new();
        let blurred = blurrer.calls.clone();

        let mut uc = use_case(
            store,
            Box::new(StubDetector {
                regions: vec![face(10, 10, 50, 50, 0.9)],
            }),
            Box::new(blurrer),
        );

        uc.run(&[notification("raw", "photo1.jpg")]).unwrap();

        assert_eq!(
            gets.lock().unwrap().as_slice(),
            &[("raw".to_string(), "photo1.jpg".to_string())]
        );

        let blurred = blurred.lock().unwrap();
        assert_eq!(blurred.len(), 1);
        assert_eq!(blurred[0], face(10, 10, 50, 50, 0.9));

        let puts = puts.lock().unwrap();
        assert_eq!(puts.len(), 1, "exactly one upload per notification");
        assert_eq!(puts[0].bucket, "processed");
        assert_eq!(puts[0].key, "photo1.jpg");
        assert_eq!(puts[0].content_type, "image/jpeg");
        assert_eq!(puts[0].visibility, Visibility::PublicRead);
    }

    #[test]
    fn test_no_faces_still_uploads() {
        let store = StubStore::new(Ok(png_bytes(50, 50)));
        let puts = store.puts.clone();

        let mut uc = use_case(
            store,
            Box::new(StubDetector { regions: vec![] }),
            Box::new(RecordingBlurrer::new()),
        );
        uc.process(&notification("raw", "empty.jpg")).unwrap();
        assert_eq!(puts.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_fetch_failure_aborts_without_upload() {
        let store = StubStore::new(Err("object missing".into()));
        let puts = store.puts.clone();

        let mut uc = use_case(
            store,
            Box::new(StubDetector { regions: vec![] }),
            Box::new(RecordingBlurrer::new()),
        );
        let result = uc.process(&notification("raw", "photo1.jpg"));

        assert!(matches!(result, Err(PipelineError::Fetch { .. })));
        assert!(puts.lock().unwrap().is_empty(), "put must never be called");
    }

    #[test]
    fn test_corrupt_bytes_classified_as_decode_error() {
        let store = StubStore::new(Ok(b"not an image at all".to_vec()));
        let puts = store.puts.clone();

        let mut uc = use_case(
            store,
            Box::new(StubDetector { regions: vec![] }),
            Box::new(RecordingBlurrer::new()),
        );
        let result = uc.process(&notification("raw", "corrupt.bin"));

        assert!(matches!(result, Err(PipelineError::Decode { .. })));
        assert!(puts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_detector_failure_classified_as_inference_error() {
        let store = StubStore::new(Ok(png_bytes(40, 40)));
        let puts = store.puts.clone();

        let mut uc = use_case(
            store,
            Box::new(FailingDetector),
            Box::new(RecordingBlurrer::new()),
        );
        let result = uc.process(&notification("raw", "photo1.jpg"));

        assert!(matches!(result, Err(PipelineError::Inference { .. })));
        assert!(puts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_upload_failure_surfaces() {
        let mut store = StubStore::new(Ok(png_bytes(40, 40)));
        store.fail_put = true;

        let mut uc = use_case(
            store,
            Box::new(StubDetector { regions: vec![] }),
            Box::new(RecordingBlurrer::new()),
        );
        let result = uc.process(&notification("raw", "photo1.jpg"));
        assert!(matches!(result, Err(PipelineError::Upload { .. })));
    }

    #[test]
    fn test_batch_aborts_at_first_failure() {
        let store = StubStore::new(Err("unreachable".into()));
        let gets = store.gets.clone();

        let mut uc = use_case(
            store,
            Box::new(StubDetector { regions: vec![] }),
            Box::new(RecordingBlurrer::new()),
        );
        let result = uc.run(&[
            notification("raw", "first.jpg"),
            notification("raw", "second.jpg"),
        ]);

        assert!(result.is_err());
        // The second notification is never fetched.
        assert_eq!(gets.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_batch_processes_all_on_success() {
        let store = StubStore::new(Ok(png_bytes(30, 30)));
        let puts = store.puts.clone();

        let mut uc = use_case(
            store,
            Box::new(StubDetector {
                regions: vec![face(5, 5, 20, 20, 0.8)],
            }),
            Box::new(RecordingBlurrer::new()),
        );
        uc.run(&[
            notification("raw", "a.jpg"),
            notification("raw", "b.jpg"),
            notification("raw", "c.jpg"),
        ])
        .unwrap();

        let puts = puts.lock().unwrap();
        assert_eq!(puts.len(), 3);
        let keys: Vec<&str> = puts.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["a.jpg", "b.jpg", "c.jpg"]);
    }

    #[test]
    fn test_multiple_regions_all_blurred() {
        let store = StubStore::new(Ok(png_bytes(100, 100)));
        let blurrer = RecordingBlurrer::new();
        let calls = blurrer.calls.clone();

        let mut uc = use_case(
            store,
            Box::new(StubDetector {
                regions: vec![
                    face(10, 10, 30, 30, 0.95),
                    face(50, 50, 80, 90, 0.7),
                ],
            }),
            Box::new(blurrer),
        );
        uc.process(&notification("raw", "group.jpg")).unwrap();
        assert_eq!(calls.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_real_blurrer_end_to_end_changes_face_pixels() {
        use crate::blurring::infrastructure::gaussian_region_blurrer::GaussianRegionBlurrer;

        // A noisy image so the blur visibly changes the region.
        let mut img = image::RgbImage::new(64, 64);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = image::Rgb([((x * 37 + y * 101) % 256) as u8, 0, 0]);
        }
        let mut bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();

        let store = StubStore::new(Ok(bytes));
        let puts = store.puts.clone();

        let mut uc = use_case(
            store,
            Box::new(StubDetector {
                regions: vec![face(8, 8, 56, 56, 0.9)],
            }),
            Box::new(GaussianRegionBlurrer::default()),
        );
        uc.process(&notification("raw", "noisy.png")).unwrap();
        assert_eq!(puts.lock().unwrap().len(), 1);
    }
}
