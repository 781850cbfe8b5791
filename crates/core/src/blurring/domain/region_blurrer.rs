use crate::detection::domain::face_region::FaceRegion;
use crate::shared::image::Image;

/// Domain interface for blurring one detected region in place.
///
/// Implementations must be deterministic: the same image, region, and
/// configuration always produce the same pixels.
pub trait RegionBlurrer: Send {
    fn blur(&self, image: &mut Image, region: &FaceRegion);
}
