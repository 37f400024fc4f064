use crate::image_classifier::error::ClassifyError;
use crate::image_classifier::inference_engine::engine::InferenceEngine;
use crate::image_classifier::inference_engine::impl_tract::KernelTract;
use crate::image_classifier::inference_engine::interface::NumericKernel;
use crate::image_classifier::interface::ScoreVector;
use crate::image_classifier::label_table::LabelTable;
use crate::image_classifier::preprocess::InputTensor;
use crate::library::logger::interface::Logger;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// A loaded model and its labels. Shared read-only after `load`; the engine
/// is serialized behind a lock and freed by `release`.
pub struct Model {
    engine: Mutex<Option<InferenceEngine>>,
    labels: LabelTable,
    side: u32,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl Model {
    pub fn load(
        kernel: Box<dyn NumericKernel>,
        labels: LabelTable,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, ClassifyError> {
        let logger = logger.with_namespace("model");
        let engine = InferenceEngine::new(kernel)?;

        if labels.len() != engine.output_width() {
            return Err(ClassifyError::shape_mismatch(
                "model output width vs label count",
                engine.output_width(),
                labels.len(),
            ));
        }

        let blank = labels.empty_labels();
        if !blank.is_empty() {
            let _ = logger.warn(&format!(
                "label table has {} empty labels at indices {:?}",
                blank.len(),
                blank
            ));
        }

        let _ = logger.info(&format!(
            "loaded model: input [1, {side}, {side}, 3], {} classes",
            engine.output_width(),
            side = engine.side()
        ));

        Ok(Self {
            side: engine.side(),
            engine: Mutex::new(Some(engine)),
            labels,
            logger,
        })
    }

    pub fn load_from_files(
        model_path: &Path,
        labels_path: &Path,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, ClassifyError> {
        let _ = logger.info(&format!(
            "loading model {} with labels {}",
            model_path.display(),
            labels_path.display()
        ));

        let kernel = KernelTract::load(model_path)?;
        let labels = LabelTable::load(labels_path)?;

        Self::load(Box::new(kernel), labels, logger)
    }

    pub fn side(&self) -> u32 {
        self.side
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    pub fn run(&self, tensor: &InputTensor) -> Result<ScoreVector, ClassifyError> {
        let mut engine = self
            .engine
            .lock()
            .map_err(|_| ClassifyError::Inference("engine lock poisoned".to_string()))?;

        match engine.as_mut() {
            Some(engine) => engine.run(tensor),
            None => Err(ClassifyError::Inference(
                "model has been released".to_string(),
            )),
        }
    }

    #[allow(dead_code)]
    pub fn is_released(&self) -> bool {
        match self.engine.lock() {
            Ok(engine) => engine.is_none(),
            Err(_) => true,
        }
    }

    /// Frees the engine. Safe to call more than once.
    pub fn release(&self) {
        let engine = match self.engine.lock() {
            Ok(mut engine) => engine.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        if let Some(engine) = engine {
            engine.release();
            let _ = self.logger.info("model released");
        }
    }
}
