use crate::config::ClassifierConfig;
use crate::image_classifier::error::ClassifyError;
use crate::image_classifier::interface::{ImageClassifier, RankedResult};
use crate::image_classifier::model::Model;
use crate::image_classifier::preprocess::preprocess;
use crate::image_classifier::ranker::rank;
use crate::library::logger::interface::Logger;
use image::DynamicImage;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), ClassifyError> {
        if self.is_cancelled() {
            Err(ClassifyError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// preprocess -> run -> rank, all on the calling thread.
pub struct ClassificationPipeline {
    model: Arc<Model>,
    side: u32,
    top_k: usize,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ClassificationPipeline {
    pub fn new(
        model: Arc<Model>,
        config: &ClassifierConfig,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, ClassifyError> {
        if config.input_side != model.side() {
            return Err(ClassifyError::shape_mismatch(
                "configured input side vs model input side",
                model.side() as usize,
                config.input_side as usize,
            ));
        }

        Ok(Self {
            model,
            side: config.input_side,
            top_k: config.top_k,
            logger: logger.with_namespace("pipeline"),
        })
    }

    pub fn classify_cancellable(
        &self,
        image: &DynamicImage,
        cancel: &CancelToken,
    ) -> Result<RankedResult, ClassifyError> {
        let started = Instant::now();

        cancel.check()?;
        let tensor = preprocess(image, self.side)?;
        let preprocessed = started.elapsed();

        cancel.check()?;
        let scores = self.model.run(&tensor)?;
        let inferred = started.elapsed();

        cancel.check()?;
        let ranked = rank(self.model.labels(), &scores, self.top_k)?;

        let _ = self.logger.info(&format!(
            "classified {}x{} image in {:?} (preprocess {:?}, inference {:?})",
            image.width(),
            image.height(),
            started.elapsed(),
            preprocessed,
            inferred - preprocessed
        ));

        Ok(ranked)
    }
}

impl ImageClassifier for ClassificationPipeline {
    fn classify(&self, image: &DynamicImage) -> Result<RankedResult, ClassifyError> {
        self.classify_cancellable(image, &CancelToken::new())
    }
}
