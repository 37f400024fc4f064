use crate::image_classifier::error::ClassifyError;
use image::DynamicImage;

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    pub confidence: f32,
}

impl Classification {
    /// Confidence scaled for display. Comparisons use the raw score.
    pub fn percent(&self) -> f32 {
        self.confidence * 100.0
    }
}

pub type ScoreVector = Vec<f32>;

/// Top-K entries in descending confidence order.
pub type RankedResult = Vec<Classification>;

pub trait ImageClassifier {
    fn classify(&self, image: &DynamicImage) -> Result<RankedResult, ClassifyError>;
}
