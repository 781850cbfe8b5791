use crate::blurring::domain::region_blurrer::RegionBlurrer;
use crate::detection::domain::face_region::FaceRegion;
use crate::shared::image::Image;

use super::gaussian;

/// Default blur factor: kernel dimensions are half the region dimensions.
pub const DEFAULT_BLUR_FACTOR: f64 = 2.0;

/// Gaussian region blurrer whose kernel scales with the region size,
/// so small and large faces come out equally unrecognizable.
pub struct GaussianRegionBlurrer {
    blur_factor: f64,
}

impl GaussianRegionBlurrer {
    /// `blur_factor` must be > 0; larger factors mean weaker blur.
    pub fn new(blur_factor: f64) -> Self {
        debug_assert!(blur_factor > 0.0);
        Self { blur_factor }
    }
}

impl Default for GaussianRegionBlurrer {
    fn default() -> Self {
        Self::new(DEFAULT_BLUR_FACTOR)
    }
}

impl RegionBlurrer for GaussianRegionBlurrer {
    fn blur(&self, image: &mut Image, region: &FaceRegion) {
        let fw = image.width() as usize;
        let channels = image.channels() as usize;

        let rx = region.start_x as usize;
        let ry = region.start_y as usize;
        let rw = (region.end_x.min(image.width()) as usize).saturating_sub(rx);
        let rh = (region.end_y.min(image.height()) as usize).saturating_sub(ry);
        if rw == 0 || rh == 0 {
            return;
        }

        let data = image.data_mut();

        // Extract ROI
        let mut roi = vec![0u8; rw * rh * channels];
        for row in 0..rh {
            let src_offset = ((ry + row) * fw + rx) * channels;
            let dst_offset = row * rw * channels;
            roi[dst_offset..dst_offset + rw * channels]
                .copy_from_slice(&data[src_offset..src_offset + rw * channels]);
        }

        let (kw, kh) = gaussian::kernel_size(rw, rh, self.blur_factor);
        let kernel_x = gaussian::gaussian_kernel_1d(kw);
        let kernel_y = gaussian::gaussian_kernel_1d(kh);
        gaussian::separable_gaussian_blur(&mut roi, rw, rh, channels, &kernel_x, &kernel_y);

        // Write blurred ROI back at the same coordinates
        for row in 0..rh {
            let dst_offset = ((ry + row) * fw + rx) * channels;
            let src_offset = row * rw * channels;
            data[dst_offset..dst_offset + rw * channels]
                .copy_from_slice(&roi[src_offset..src_offset + rw * channels]);
        }
    }
}
