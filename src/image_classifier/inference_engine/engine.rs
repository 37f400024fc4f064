use crate::image_classifier::error::ClassifyError;
use crate::image_classifier::inference_engine::interface::NumericKernel;
use crate::image_classifier::interface::ScoreVector;
use crate::image_classifier::preprocess::{expected_byte_len, InputTensor};

/// Owns a kernel plus reusable input and output buffers.
///
/// `run` takes `&mut self`: one forward pass at a time per engine. Callers
/// that share an engine put it behind a lock.
pub struct InferenceEngine {
    kernel: Box<dyn NumericKernel>,
    side: u32,
    output_width: usize,
    input: Vec<f32>,
    output: Vec<f32>,
}

impl std::fmt::Debug for InferenceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceEngine")
            .field("side", &self.side)
            .field("output_width", &self.output_width)
            .finish()
    }
}

impl InferenceEngine {
    pub fn new(kernel: Box<dyn NumericKernel>) -> Result<Self, ClassifyError> {
        let side = match kernel.input_shape() {
            &[1, h, w, 3] if h == w && h > 0 => h,
            other => {
                return Err(ClassifyError::ModelLoad(format!(
                    "expected input shape [1, side, side, 3], model declares {:?}",
                    other
                )))
            }
        };

        let output_width = match kernel.output_shape() {
            &[1, n] if n > 0 => n,
            other => {
                return Err(ClassifyError::ModelLoad(format!(
                    "expected output shape [1, N], model declares {:?}",
                    other
                )))
            }
        };

        let side = u32::try_from(side).map_err(|_| {
            ClassifyError::ModelLoad(format!("input side {} is too large", side))
        })?;

        Ok(Self {
            kernel,
            side,
            output_width,
            input: Vec::with_capacity(expected_byte_len(side) / 4),
            output: vec![0.0; output_width],
        })
    }

    pub fn side(&self) -> u32 {
        self.side
    }

    pub fn output_width(&self) -> usize {
        self.output_width
    }

    pub fn input_byte_len(&self) -> usize {
        expected_byte_len(self.side)
    }

    pub fn run(&mut self, tensor: &InputTensor) -> Result<ScoreVector, ClassifyError> {
        if tensor.byte_len() != self.input_byte_len() {
            return Err(ClassifyError::shape_mismatch(
                "tensor byte length vs model input",
                self.input_byte_len(),
                tensor.byte_len(),
            ));
        }

        self.input.clear();
        self.input.extend(tensor.values());
        self.output.fill(0.0);

        self.kernel
            .forward(&self.input, &mut self.output)
            .map_err(|e| ClassifyError::Inference(e.to_string()))?;

        Ok(self.output.clone())
    }

    /// Consumes the engine and frees the kernel's resources.
    pub fn release(mut self) {
        self.kernel.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_classifier::inference_engine::impl_fake::KernelFake;
    use crate::image_classifier::preprocess::preprocess;
    use image::{DynamicImage, ImageBuffer, Rgb};
    use std::sync::atomic::Ordering;

    fn gray(side: u32) -> InputTensor {
        let img = ImageBuffer::from_pixel(side, side, Rgb([128u8, 128, 128]));
        preprocess(&DynamicImage::ImageRgb8(img), side).unwrap()
    }

    #[test]
    fn test_run_returns_kernel_scores() {
        let mut engine = InferenceEngine::new(Box::new(KernelFake::new(8, vec![0.2, 0.8]))).unwrap();

        let scores = engine.run(&gray(8)).unwrap();

        assert_eq!(scores, vec![0.2, 0.8]);
        assert_eq!(engine.side(), 8);
        assert_eq!(engine.output_width(), 2);
    }

    #[test]
    fn test_one_forward_pass_per_run() {
        let kernel = KernelFake::new(4, vec![1.0]);
        let calls = kernel.calls();
        let mut engine = InferenceEngine::new(Box::new(kernel)).unwrap();

        engine.run(&gray(4)).unwrap();
        engine.run(&gray(4)).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_wrong_tensor_length_fails() {
        let kernel = KernelFake::new(8, vec![0.5]);
        let calls = kernel.calls();
        let mut engine = InferenceEngine::new(Box::new(kernel)).unwrap();

        let result = engine.run(&gray(4));

        assert_eq!(
            result,
            Err(ClassifyError::shape_mismatch(
                "tensor byte length vs model input",
                8 * 8 * 3 * 4,
                4 * 4 * 3 * 4
            ))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_kernel_failure_is_inference_error() {
        let kernel = KernelFake::new(4, vec![0.5]).failing("delegate crashed");
        let calls = kernel.calls();
        let mut engine = InferenceEngine::new(Box::new(kernel)).unwrap();

        let result = engine.run(&gray(4));

        assert_eq!(
            result,
            Err(ClassifyError::Inference("delegate crashed".to_string()))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_rejects_non_square_input_shape() {
        let kernel = KernelFake::new(4, vec![0.5]).with_input_shape(vec![1, 4, 8, 3]);

        let result = InferenceEngine::new(Box::new(kernel));

        assert!(matches!(result, Err(ClassifyError::ModelLoad(_))));
    }

    #[test]
    fn test_rejects_nchw_input_shape() {
        let kernel = KernelFake::new(4, vec![0.5]).with_input_shape(vec![1, 3, 4, 4]);

        assert!(matches!(
            InferenceEngine::new(Box::new(kernel)),
            Err(ClassifyError::ModelLoad(_))
        ));
    }

    #[test]
    fn test_rejects_batched_output_shape() {
        let kernel = KernelFake::new(4, vec![0.5, 0.5]).with_output_shape(vec![2, 1]);

        assert!(matches!(
            InferenceEngine::new(Box::new(kernel)),
            Err(ClassifyError::ModelLoad(_))
        ));
    }

    #[test]
    fn test_release_reaches_kernel() {
        let kernel = KernelFake::new(4, vec![0.5]);
        let releases = kernel.releases();
        let engine = InferenceEngine::new(Box::new(kernel)).unwrap();

        engine.release();

        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }
}
