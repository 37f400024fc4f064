use chrono::{Offset, Utc};
use clap::{Parser, ValueHint};
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    pub model_path: PathBuf,
    pub labels_path: PathBuf,
    pub input_side: u32,
    pub top_k: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("assets/mobilenet.tflite"),
            labels_path: PathBuf::from("assets/labels.txt"),
            input_side: 224,
            top_k: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayKind {
    Console,
    Gui,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SourceKind {
    Files(Vec<PathBuf>),
    /// Synthetic frames and a stand-in kernel, no model files needed.
    Fake { frames: usize },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub classifier: ClassifierConfig,
    pub display: DisplayKind,
    pub source: SourceKind,
    pub logger_timezone: chrono::FixedOffset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            display: DisplayKind::Console,
            source: SourceKind::Fake { frames: 1 },
            logger_timezone: utc(),
        }
    }
}

/// Classify photos with a TFLite image model.
#[derive(Parser, Debug)]
#[command(name = "photo-classifier")]
struct Args {
    /// Images to classify. Without any, synthetic frames are used.
    images: Vec<PathBuf>,

    /// TFLite model file.
    #[arg(long, value_hint = ValueHint::FilePath)]
    model: Option<PathBuf>,

    /// Label file, one label per line.
    #[arg(long, value_hint = ValueHint::FilePath)]
    labels: Option<PathBuf>,

    /// How many results to show per image.
    #[arg(long)]
    top_k: Option<usize>,

    /// Show results in a window instead of the terminal.
    #[arg(long)]
    gui: bool,

    /// Classify synthetic noise frames with a stand-in model.
    #[arg(long, conflicts_with = "images")]
    fake: bool,

    /// Number of synthetic frames.
    #[arg(long, default_value_t = 1)]
    frames: usize,
}

impl Config {
    /// Applies command line flags on top of the defaults. The first item of
    /// `args` is the program name.
    pub fn from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Ok(Args::try_parse_from(args)?.into())
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        let mut config = Config::default();

        if let Some(model) = args.model {
            config.classifier.model_path = model;
        }
        if let Some(labels) = args.labels {
            config.classifier.labels_path = labels;
        }
        if let Some(top_k) = args.top_k {
            config.classifier.top_k = top_k;
        }
        if args.gui {
            config.display = DisplayKind::Gui;
        }

        config.source = if args.fake || args.images.is_empty() {
            SourceKind::Fake {
                frames: args.frames,
            }
        } else {
            SourceKind::Files(args.images)
        };

        config
    }
}

fn utc() -> chrono::FixedOffset {
    Utc.fix()
}
