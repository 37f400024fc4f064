use crate::image_classifier::inference_engine::interface::NumericKernel;
use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Returns the same scores for every input.
pub struct KernelFake {
    input_shape: Vec<usize>,
    output_shape: Vec<usize>,
    scores: Vec<f32>,
    failure: Option<String>,
    calls: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
}

impl KernelFake {
    pub fn new(side: usize, scores: Vec<f32>) -> Self {
        Self {
            input_shape: vec![1, side, side, 3],
            output_shape: vec![1, scores.len()],
            scores,
            failure: None,
            calls: Arc::new(AtomicUsize::new(0)),
            released: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[allow(dead_code)]
    pub fn with_input_shape(mut self, shape: Vec<usize>) -> Self {
        self.input_shape = shape;
        self
    }

    #[allow(dead_code)]
    pub fn with_output_shape(mut self, shape: Vec<usize>) -> Self {
        self.output_shape = shape;
        self
    }

    #[allow(dead_code)]
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    /// Counts forward passes, shared with clones of the handle.
    #[allow(dead_code)]
    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    /// Counts `release` calls into a counter owned by the caller.
    #[allow(dead_code)]
    pub fn with_release_counter(mut self, counter: Arc<AtomicUsize>) -> Self {
        self.released = counter;
        self
    }

    #[allow(dead_code)]
    pub fn releases(&self) -> Arc<AtomicUsize> {
        self.released.clone()
    }
}

impl NumericKernel for KernelFake {
    fn input_shape(&self) -> &[usize] {
        &self.input_shape
    }

    fn output_shape(&self) -> &[usize] {
        &self.output_shape
    }

    fn forward(
        &mut self,
        _input: &[f32],
        output: &mut [f32],
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.failure {
            return Err(message.clone().into());
        }

        if output.len() != self.scores.len() {
            return Err(format!(
                "fake kernel holds {} scores, output has {} slots",
                self.scores.len(),
                output.len()
            )
            .into());
        }

        output.copy_from_slice(&self.scores);
        Ok(())
    }

    fn release(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}
