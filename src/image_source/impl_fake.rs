use crate::image_classifier::error::ClassifyError;
use crate::image_source::interface::{AcquireError, Acquired, ImageSource, NamedImage};
use crate::library::logger::interface::Logger;
use image::{DynamicImage, ImageBuffer, Rgb};
use rand::distr::{Distribution, Uniform};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum FakeFrame {
    #[allow(dead_code)]
    Uniform(u8),
    Noise,
}

pub struct ImageSourceFake {
    frame: FakeFrame,
    frames: usize,
    width: u32,
    height: u32,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageSourceFake {
    pub fn new(frame: FakeFrame, frames: usize, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            frame,
            frames,
            width: 640,
            height: 480,
            logger: logger.with_namespace("image_source").with_namespace("fake"),
        }
    }

    #[allow(dead_code)]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    fn generate(&self) -> Result<DynamicImage, ClassifyError> {
        let image = match self.frame {
            FakeFrame::Uniform(value) => {
                ImageBuffer::from_pixel(self.width, self.height, Rgb([value, value, value]))
            }
            FakeFrame::Noise => {
                let mut rng = rand::rng();
                let channel = Uniform::new_inclusive(0u8, 255u8)
                    .map_err(|e| ClassifyError::InvalidInput(e.to_string()))?;
                ImageBuffer::from_fn(self.width, self.height, |_, _| {
                    Rgb([
                        channel.sample(&mut rng),
                        channel.sample(&mut rng),
                        channel.sample(&mut rng),
                    ])
                })
            }
        };

        Ok(DynamicImage::ImageRgb8(image))
    }
}

impl ImageSource for ImageSourceFake {
    fn acquire(&self) -> Vec<Acquired> {
        let _ = self.logger.info(&format!(
            "generating {} {:?} frames of {}x{}",
            self.frames, self.frame, self.width, self.height
        ));

        (0..self.frames)
            .map(|i| {
                let name = format!("fake-{}", i);
                match self.generate() {
                    Ok(image) => Ok(NamedImage { name, image }),
                    Err(error) => Err(AcquireError { name, error }),
                }
            })
            .collect()
    }
}
