/// SSD face detector using ONNX Runtime via `ort`.
///
/// Wraps the ResNet-10 SSD face model: 300x300 BGR input with per-channel
/// mean subtraction, output rows of `[image_id, label, confidence, x1, y1,
/// x2, y2]` with normalized box coordinates, sorted by descending confidence.
use std::path::Path;

use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::face_region::FaceRegion;
use crate::shared::image::Image;

/// SSD model input resolution.
const INPUT_SIZE: u32 = 300;

/// Default confidence threshold for accepting a detection.
pub const DEFAULT_CONFIDENCE: f32 = 0.6;

/// Per-channel means subtracted during preprocessing, in BGR order
/// (the model was trained on mean-centered BGR data).
const MEAN_BGR: [f32; 3] = [103.93, 116.77, 123.68];

/// Values per detection row in the model output.
const ROW_LEN: usize = 7;

/// SSD face detector backed by an ONNX Runtime session.
pub struct OnnxSsdDetector {
    session: ort::session::Session,
    confidence: f32,
}

impl OnnxSsdDetector {
    /// Load the SSD ONNX model and prepare for inference.
    ///
    /// A missing or malformed model file is fatal here; `detect` assumes a
    /// well-formed session.
    pub fn new(
        model_path: &Path,
        confidence: f32,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let session = ort::session::Session::builder()?.commit_from_file(model_path)?;
        Ok(Self {
            session,
            confidence,
        })
    }
}

impl FaceDetector for OnnxSsdDetector {
    fn detect(
        &mut self,
        image: &Image,
    ) -> Result<Vec<FaceRegion>, Box<dyn std::error::Error + Send + Sync>> {
        let width = image.width();
        let height = image.height();

        let input_tensor = preprocess(image, INPUT_SIZE);
        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("SSD model produced no outputs".into());
        }

        let tensor = outputs[0].try_extract_array::<f32>()?;
        let data = tensor.as_slice().ok_or("Cannot get detection slice")?;

        Ok(collect_regions(data, self.confidence, width, height))
    }
}

/// Interpret raw SSD output rows as face regions.
///
/// Rows arrive sorted by descending confidence, so the scan stops at the
/// first sub-threshold row instead of filtering the whole set. Rows whose
/// box clamps to an empty rectangle are dropped.
fn collect_regions(data: &[f32], threshold: f32, width: u32, height: u32) -> Vec<FaceRegion> {
    let mut regions = Vec::new();
    for row in data.chunks_exact(ROW_LEN) {
        let confidence = row[2];
        if confidence < threshold {
            break;
        }
        let bbox = [row[3], row[4], row[5], row[6]];
        if let Some(region) = FaceRegion::from_normalized(bbox, confidence, width, height) {
            regions.push(region);
        }
    }
    regions
}

/// Resize an RGB image to `size x size` and convert to mean-subtracted
/// BGR NCHW float32, nearest-neighbor with pixel-center sampling.
fn preprocess(image: &Image, size: u32) -> ndarray::Array4<f32> {
    let src = image.as_ndarray();
    let src_h = image.height() as usize;
    let src_w = image.width() as usize;
    let s = size as usize;

    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, s, s));

    for y in 0..s {
        let src_y = (((y as f64 + 0.5) * src_h as f64 / s as f64) as usize).min(src_h - 1);
        for x in 0..s {
            let src_x = (((x as f64 + 0.5) * src_w as f64 / s as f64) as usize).min(src_w - 1);
            for c in 0..3 {
                // Tensor channel c is BGR; source channel is RGB, so flip.
                let value = src[[src_y, src_x, 2 - c]] as f32;
                tensor[[0, c, y, x]] = value - MEAN_BGR[c];
            }
        }
    }

    tensor
}
