use crate::detection::domain::face_region::FaceRegion;
use crate::shared::image::Image;

/// Domain interface for face detection.
///
/// Implementations may hold inference state, hence `&mut self`.
pub trait FaceDetector: Send {
    fn detect(
        &mut self,
        image: &Image,
    ) -> Result<Vec<FaceRegion>, Box<dyn std::error::Error + Send + Sync>>;
}
