use crate::image_classifier::error::ClassifyError;
use image::{imageops, DynamicImage, RgbImage};

const CHANNELS: usize = 3;
const BYTES_PER_VALUE: usize = std::mem::size_of::<f32>();

/// Flat NHWC float buffer, R G B interleaved per pixel, native byte order.
#[derive(Debug, Clone, PartialEq)]
pub struct InputTensor {
    pub side: u32,
    pub bytes: Vec<u8>,
}

impl InputTensor {
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    pub fn values(&self) -> impl Iterator<Item = f32> + '_ {
        self.bytes
            .chunks_exact(BYTES_PER_VALUE)
            .map(|b| f32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
    }
}

pub fn expected_byte_len(side: u32) -> usize {
    side as usize * side as usize * CHANNELS * BYTES_PER_VALUE
}

/// Maps an 8-bit channel into [-1.0, 1.0].
pub fn normalize_channel(c: u8) -> f32 {
    (c as f32 / 127.5) - 1.0
}

fn resize_square(image: &DynamicImage, side: u32) -> RgbImage {
    if image.width() == side && image.height() == side {
        image.to_rgb8()
    } else {
        image
            .resize_exact(side, side, imageops::FilterType::Triangle)
            .to_rgb8()
    }
}

pub fn preprocess(image: &DynamicImage, side: u32) -> Result<InputTensor, ClassifyError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(ClassifyError::InvalidInput(format!(
            "image has zero area ({}x{})",
            image.width(),
            image.height()
        )));
    }

    if side == 0 {
        return Err(ClassifyError::InvalidInput(
            "tensor side must be positive".to_string(),
        ));
    }

    let rgb = resize_square(image, side);

    let mut bytes = Vec::with_capacity(expected_byte_len(side));

    // RgbImage pixels iterate row by row, left to right.
    for pixel in rgb.pixels() {
        for &c in &pixel.0 {
            bytes.extend_from_slice(&normalize_channel(c).to_ne_bytes());
        }
    }

    Ok(InputTensor { side, bytes })
}
