use crate::display::interface::{format_ranked, ResultDisplay};
use crate::image_classifier::interface::Classification;
use eframe::egui;
use std::error::Error;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Default)]
struct Screen {
    status: String,
    entries: Vec<Entry>,
}

struct Entry {
    image_name: String,
    lines: Vec<String>,
    failed: bool,
}

#[derive(Clone)]
struct ResultsWindow {
    screen: Arc<Mutex<Screen>>,
}

impl eframe::App for ResultsWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Results arrive from the presentation thread, poll for them.
        ctx.request_repaint_after(Duration::from_millis(200));

        let screen = match self.screen.lock() {
            Ok(screen) => screen,
            Err(_) => return,
        };

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(egui::RichText::new(&screen.status).monospace());
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                for entry in screen.entries.iter().rev() {
                    ui.heading(&entry.image_name);
                    let color = if entry.failed {
                        egui::Color32::from_rgb(200, 60, 60)
                    } else {
                        egui::Color32::from_rgb(220, 220, 220)
                    };
                    for line in &entry.lines {
                        ui.label(egui::RichText::new(line).monospace().color(color).size(16.0));
                    }
                    ui.separator();
                }
            });
        });
    }
}

pub struct DisplayGui {
    screen: Arc<Mutex<Screen>>,
    window: Option<thread::JoinHandle<()>>,
}

impl DisplayGui {
    pub fn new() -> Self {
        Self {
            screen: Arc::new(Mutex::new(Screen::default())),
            window: None,
        }
    }

    fn with_screen(
        &self,
        update: impl FnOnce(&mut Screen),
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut screen = self.screen.lock().map_err(|_| "screen state poisoned")?;
        update(&mut screen);
        Ok(())
    }
}

impl ResultDisplay for DisplayGui {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let screen = self.screen.clone();

        let window = thread::spawn(move || {
            let options = eframe::NativeOptions {
                viewport: egui::ViewportBuilder::default()
                    .with_inner_size([420.0, 360.0])
                    .with_resizable(true),
                ..Default::default()
            };

            let results_window = ResultsWindow { screen };

            // Blocks this thread until the window is closed.
            let _ = eframe::run_native("Photo classifier", options, Box::new(|_cc| Box::new(results_window)));
        });
        self.window = Some(window);

        Ok(())
    }

    fn show_status(&mut self, status: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.with_screen(|screen| screen.status = status.to_string())
    }

    fn show_results(
        &mut self,
        image_name: &str,
        results: &[Classification],
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let lines = format_ranked(results);
        self.with_screen(|screen| {
            screen.entries.push(Entry {
                image_name: image_name.to_string(),
                lines,
                failed: false,
            })
        })
    }

    fn show_error(
        &mut self,
        image_name: &str,
        message: &str,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.with_screen(|screen| {
            screen.entries.push(Entry {
                image_name: image_name.to_string(),
                lines: vec![message.to_string()],
                failed: true,
            })
        })
    }

    fn is_closed(&self) -> bool {
        self.window
            .as_ref()
            .map_or(false, |window| window.is_finished())
    }

    fn finish(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.with_screen(|screen| screen.status.push_str(" (close the window to exit)"))?;
        if let Some(window) = self.window.take() {
            window.join().map_err(|_| "display window panicked")?;
        }
        Ok(())
    }
}
