use crate::display::interface::{format_ranked, ResultDisplay};
use crate::image_classifier::interface::Classification;
use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub enum Shown {
    Status(String),
    Results { image_name: String, lines: Vec<String> },
    Error { image_name: String, message: String },
}

/// Records everything it is asked to show.
#[derive(Clone, Default)]
pub struct DisplayFake {
    shown: Arc<Mutex<Vec<Shown>>>,
    closed: Arc<AtomicBool>,
}

impl DisplayFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shown(&self) -> Vec<Shown> {
        match self.shown.lock() {
            Ok(shown) => shown.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Acts as if the user closed the display.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    fn push(&self, entry: Shown) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.shown
            .lock()
            .map_err(|_| "display buffer poisoned")?
            .push(entry);
        Ok(())
    }
}

impl ResultDisplay for DisplayFake {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn show_status(&mut self, status: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.push(Shown::Status(status.to_string()))
    }

    fn show_results(
        &mut self,
        image_name: &str,
        results: &[Classification],
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.push(Shown::Results {
            image_name: image_name.to_string(),
            lines: format_ranked(results),
        })
    }

    fn show_error(
        &mut self,
        image_name: &str,
        message: &str,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.push(Shown::Error {
            image_name: image_name.to_string(),
            message: message.to_string(),
        })
    }
}
