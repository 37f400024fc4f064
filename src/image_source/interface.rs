use crate::image_classifier::error::ClassifyError;
use image::DynamicImage;

#[derive(Debug, Clone)]
pub struct NamedImage {
    pub name: String,
    pub image: DynamicImage,
}

/// An input that could not be turned into an image.
#[derive(Debug, Clone, PartialEq)]
pub struct AcquireError {
    pub name: String,
    pub error: ClassifyError,
}

pub type Acquired = Result<NamedImage, AcquireError>;

pub trait ImageSource {
    /// One entry per input, in input order. A bad input does not stop the
    /// ones after it.
    fn acquire(&self) -> Vec<Acquired>;
}
