use crate::display::interface::{format_ranked, ResultDisplay};
use crate::image_classifier::interface::Classification;
use std::error::Error;

pub struct DisplayConsole {}

impl DisplayConsole {
    pub fn new() -> Self {
        Self {}
    }
}

impl ResultDisplay for DisplayConsole {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }

    fn show_status(&mut self, status: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        println!("── {} ──", status);
        Ok(())
    }

    fn show_results(
        &mut self,
        image_name: &str,
        results: &[Classification],
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        println!("┌ {}", image_name);
        for line in format_ranked(results) {
            println!("│ {}", line);
        }
        println!("└");
        Ok(())
    }

    fn show_error(
        &mut self,
        image_name: &str,
        message: &str,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        println!("┌ {}", image_name);
        println!("│ ✗ {}", message);
        println!("└");
        Ok(())
    }
}
