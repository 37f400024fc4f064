use crate::image_classifier::error::ClassifyError;
use crate::image_classifier::inference_engine::interface::NumericKernel;
use std::error::Error;
use std::path::Path;
use tract_core::prelude::*;

/// TFLite flatbuffer model executed by tract.
pub struct KernelTract {
    model: Option<SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>>,
    input_shape: Vec<usize>,
    output_shape: Vec<usize>,
}

fn concrete_shape(fact: &TypedFact, what: &str) -> Result<Vec<usize>, ClassifyError> {
    fact.shape
        .as_concrete()
        .map(|dims| dims.to_vec())
        .ok_or_else(|| ClassifyError::ModelLoad(format!("{} shape is not concrete", what)))
}

impl KernelTract {
    pub fn load(model_path: &Path) -> Result<Self, ClassifyError> {
        let load_err = |e: TractError| {
            ClassifyError::ModelLoad(format!("{}: {}", model_path.display(), e))
        };

        let model = tract_tflite::tflite()
            .model_for_path(model_path)
            .and_then(|m| m.into_optimized())
            .map_err(load_err)?;

        let input_shape = concrete_shape(model.input_fact(0).map_err(load_err)?, "input")?;
        let output_shape = concrete_shape(model.output_fact(0).map_err(load_err)?, "output")?;

        if !model.input_fact(0).map_err(load_err)?.datum_type.is_float() {
            return Err(ClassifyError::ModelLoad(
                "only float32 input models are supported".to_string(),
            ));
        }

        let model = model.into_runnable().map_err(load_err)?;

        Ok(Self {
            model: Some(model),
            input_shape,
            output_shape,
        })
    }
}

impl NumericKernel for KernelTract {
    fn input_shape(&self) -> &[usize] {
        &self.input_shape
    }

    fn output_shape(&self) -> &[usize] {
        &self.output_shape
    }

    fn forward(
        &mut self,
        input: &[f32],
        output: &mut [f32],
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let model = self.model.as_ref().ok_or("model has been released")?;

        let tensor = Tensor::from_shape(&self.input_shape, input)?;
        let outputs = model.run(tvec!(tensor.into_tvalue()))?;

        // Quantized heads come back as integers.
        let scores = outputs[0].cast_to::<f32>()?;
        let scores = scores.as_slice::<f32>()?;

        if scores.len() != output.len() {
            return Err(format!(
                "model produced {} scores, expected {}",
                scores.len(),
                output.len()
            )
            .into());
        }

        output.copy_from_slice(scores);
        Ok(())
    }

    fn release(&mut self) {
        self.model = None;
    }
}
