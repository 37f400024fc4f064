use crate::image_classifier::interface::Classification;
use std::error::Error;

/// Where ranked results end up. Only the presentation thread touches it.
pub trait ResultDisplay: Send {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Short state line, e.g. "Model loaded".
    fn show_status(&mut self, status: &str) -> Result<(), Box<dyn Error + Send + Sync>>;

    fn show_results(
        &mut self,
        image_name: &str,
        results: &[Classification],
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// A request failed. Shown once, never retried.
    fn show_error(&mut self, image_name: &str, message: &str)
        -> Result<(), Box<dyn Error + Send + Sync>>;

    /// The user went away, e.g. closed the window. Pending work can be
    /// cancelled.
    fn is_closed(&self) -> bool {
        false
    }

    /// Blocks until the display is done, e.g. its window was closed.
    fn finish(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}

/// `"1. dog (80.00%)"` style lines.
pub fn format_ranked(results: &[Classification]) -> Vec<String> {
    results
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}. {} ({:.2}%)", i + 1, c.label, c.percent()))
        .collect()
}
