use app::{App, ModelLoader};
use config::{Config, DisplayKind, SourceKind};
use display::{
    impl_console::DisplayConsole, impl_gui::DisplayGui, interface::ResultDisplay,
};
use image_classifier::inference_engine::impl_fake::KernelFake;
use image_classifier::label_table::LabelTable;
use image_classifier::model::Model;
use image_source::{
    impl_fake::{FakeFrame, ImageSourceFake},
    impl_file::ImageSourceFile,
    interface::ImageSource,
};
use library::logger::{impl_console::LoggerConsole, interface::Logger};
use std::sync::Arc;

mod app;
mod config;
mod display;
mod image_classifier;
mod image_source;
mod library;

const FAKE_LABELS: [&str; 8] = [
    "dog", "cat", "person", "car", "chair", "bird", "bicycle", "book",
];

fn fake_model_loader(side: u32, logger: Arc<dyn Logger + Send + Sync>) -> ModelLoader {
    Box::new(move || {
        let total: f32 = (1..=FAKE_LABELS.len()).map(|i| i as f32).sum();
        let scores = (1..=FAKE_LABELS.len())
            .map(|i| i as f32 / total)
            .collect::<Vec<_>>();
        let kernel = KernelFake::new(side as usize, scores);
        Model::load(
            Box::new(kernel),
            FAKE_LABELS.iter().copied().collect::<LabelTable>(),
            logger.clone(),
        )
    })
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from_args(std::env::args_os()).unwrap_or_else(|e| e.exit());

    let logger: Arc<dyn Logger + Send + Sync> =
        Arc::new(LoggerConsole::new(config.logger_timezone));

    let (source, load_model): (Box<dyn ImageSource>, ModelLoader) = match &config.source {
        SourceKind::Files(paths) => {
            let model_path = config.classifier.model_path.clone();
            let labels_path = config.classifier.labels_path.clone();
            let loader_logger = logger.clone();
            (
                Box::new(ImageSourceFile::new(paths.clone(), logger.clone())),
                Box::new(move || {
                    Model::load_from_files(&model_path, &labels_path, loader_logger.clone())
                }),
            )
        }
        SourceKind::Fake { frames } => (
            Box::new(ImageSourceFake::new(FakeFrame::Noise, *frames, logger.clone())),
            fake_model_loader(config.classifier.input_side, logger.clone()),
        ),
    };

    let display: Box<dyn ResultDisplay> = match config.display {
        DisplayKind::Console => Box::new(DisplayConsole::new()),
        DisplayKind::Gui => Box::new(DisplayGui::new()),
    };

    let mut app = App::new(config, logger.clone(), source, display, load_model);

    let summary = app.run()?;

    let _ = logger.info(&format!(
        "done: {} classified, {} failed, {} cancelled",
        summary.classified, summary.failed, summary.cancelled
    ));

    app.shutdown();

    Ok(())
}
