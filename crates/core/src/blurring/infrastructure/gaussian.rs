/// Derive blur kernel dimensions from region dimensions and a blur factor.
///
/// `kw = round(width / blur_factor)`, `kh = round(height / blur_factor)`,
/// decremented to the next odd value when even, clamped to a minimum of 1
/// so degenerate 0- or 1-pixel regions still yield a valid kernel.
///
/// Precondition: `blur_factor > 0` (not validated here).
pub fn kernel_size(width: usize, height: usize, blur_factor: f64) -> (usize, usize) {
    let odd = |dim: usize| {
        let mut k = (dim as f64 / blur_factor).round() as i64;
        if k % 2 == 0 {
            k -= 1;
        }
        k.max(1) as usize
    };
    (odd(width), odd(height))
}

/// Precompute a 1D Gaussian kernel of the given size.
///
/// `kernel_size` must be odd and >= 1. Sigma is derived as `kernel_size / 6.0`
/// (matching OpenCV's sigma=0 convention).
pub fn gaussian_kernel_1d(kernel_size: usize) -> Vec<f32> {
    debug_assert!(kernel_size >= 1 && kernel_size % 2 == 1);
    let sigma = kernel_size as f64 / 6.0;
    let half = (kernel_size / 2) as f64;
    let mut kernel_f64: Vec<f64> = (0..kernel_size)
        .map(|i| {
            let x = i as f64 - half;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f64 = kernel_f64.iter().sum();
    for v in &mut kernel_f64 {
        *v /= sum;
    }
    kernel_f64.iter().map(|&v| v as f32).collect()
}

/// Apply a separable Gaussian blur with independent horizontal and vertical
/// kernels, clamping samples to the buffer edges.
///
/// The horizontal pass writes into a float scratch buffer; the vertical pass
/// writes back into `data` with rounding and saturation.
pub fn separable_gaussian_blur(
    data: &mut [u8],
    width: usize,
    height: usize,
    channels: usize,
    kernel_x: &[f32],
    kernel_y: &[f32],
) {
    if width == 0 || height == 0 || (kernel_x.len() <= 1 && kernel_y.len() <= 1) {
        return;
    }
    let half_x = kernel_x.len() / 2;
    let half_y = kernel_y.len() / 2;

    let mut temp = vec![0.0f32; width * height * channels];

    // Horizontal pass: data -> temp
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let mut sum = 0.0f32;
                for (k, &w) in kernel_x.iter().enumerate() {
                    let sx = (x as isize + k as isize - half_x as isize)
                        .max(0)
                        .min((width - 1) as isize) as usize;
                    sum += data[(y * width + sx) * channels + c] as f32 * w;
                }
                temp[(y * width + x) * channels + c] = sum;
            }
        }
    }

    // Vertical pass: temp -> data
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let mut sum = 0.0f32;
                for (k, &w) in kernel_y.iter().enumerate() {
                    let sy = (y as isize + k as isize - half_y as isize)
                        .max(0)
                        .min((height - 1) as isize) as usize;
                    sum += temp[(sy * width + x) * channels + c] * w;
                }
                data[(y * width + x) * channels + c] = sum.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}
