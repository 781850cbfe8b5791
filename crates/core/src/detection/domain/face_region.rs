/// A detected rectangular face area in pixel coordinates.
///
/// Invariant: `start < end` on both axes and `end` never exceeds the
/// dimensions of the image the region was detected in. Regions are only
/// built through [`FaceRegion::from_normalized`], which enforces this by
/// clamping, so downstream consumers can slice without bounds checks.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceRegion {
    pub start_x: u32,
    pub start_y: u32,
    pub end_x: u32,
    pub end_y: u32,
    pub confidence: f32,
}

impl FaceRegion {
    /// Scale a normalized `[x1, y1, x2, y2]` box to pixel coordinates,
    /// rounding to the nearest integer and clamping to the image extents.
    ///
    /// Returns `None` when the clamped box is empty (zero width or height),
    /// which happens for boxes lying entirely outside the image.
    pub fn from_normalized(
        bbox: [f32; 4],
        confidence: f32,
        image_width: u32,
        image_height: u32,
    ) -> Option<Self> {
        let scale = |v: f32, dim: u32| -> u32 {
            (v * dim as f32).round().clamp(0.0, dim as f32) as u32
        };
        let start_x = scale(bbox[0], image_width);
        let start_y = scale(bbox[1], image_height);
        let end_x = scale(bbox[2], image_width);
        let end_y = scale(bbox[3], image_height);

        if start_x >= end_x || start_y >= end_y {
            return None;
        }
        Some(Self {
            start_x,
            start_y,
            end_x,
            end_y,
            confidence,
        })
    }

    pub fn width(&self) -> u32 {
        self.end_x - self.start_x
    }

    pub fn height(&self) -> u32 {
        self.end_y - self.start_y
    }
}
