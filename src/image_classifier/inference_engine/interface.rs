use std::error::Error;

/// The model's forward pass. Opaque: the engine only knows its declared shapes.
pub trait NumericKernel: Send {
    /// Declared input shape, `[1, side, side, 3]` for the models we load.
    fn input_shape(&self) -> &[usize];

    /// Declared output shape, `[1, N]`.
    fn output_shape(&self) -> &[usize];

    /// One synchronous forward pass. `input` and `output` are sized to the
    /// declared shapes.
    fn forward(&mut self, input: &[f32], output: &mut [f32])
        -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Frees native resources. The kernel is not used afterwards.
    fn release(&mut self) {}
}
