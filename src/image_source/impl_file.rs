use crate::image_classifier::error::ClassifyError;
use crate::image_source::interface::{AcquireError, Acquired, ImageSource, NamedImage};
use crate::library::logger::interface::Logger;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct ImageSourceFile {
    paths: Vec<PathBuf>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageSourceFile {
    pub fn new(paths: Vec<PathBuf>, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            paths,
            logger: logger.with_namespace("image_source").with_namespace("file"),
        }
    }

    fn decode(&self, path: &Path) -> Acquired {
        let name = path.display().to_string();

        let image = image::open(path).map_err(|e| {
            let _ = self
                .logger
                .warn(&format!("could not decode {}: {}", name, e));
            AcquireError {
                name: name.clone(),
                error: ClassifyError::InvalidInput(format!("could not decode {}: {}", name, e)),
            }
        })?;

        let _ = self.logger.info(&format!(
            "decoded {} ({}x{})",
            name,
            image.width(),
            image.height()
        ));

        Ok(NamedImage { name, image })
    }
}

impl ImageSource for ImageSourceFile {
    fn acquire(&self) -> Vec<Acquired> {
        self.paths.iter().map(|path| self.decode(path)).collect()
    }
}
