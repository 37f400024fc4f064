use crate::config::Config;
use crate::display::interface::ResultDisplay;
use crate::image_classifier::error::ClassifyError;
use crate::image_classifier::model::Model;
use crate::image_classifier::pipeline::{CancelToken, ClassificationPipeline};
use crate::image_classifier::worker::{ClassifyWorker, WorkerEvent};
use crate::image_source::interface::{AcquireError, Acquired, ImageSource, NamedImage};
use crate::library::logger::interface::Logger;
use std::collections::HashMap;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

pub type ModelLoader = Box<dyn Fn() -> Result<Model, ClassifyError> + Send>;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunSummary {
    pub classified: usize,
    pub failed: usize,
    pub cancelled: usize,
}

struct Ready {
    model: Arc<Model>,
    worker: ClassifyWorker,
    events: Receiver<WorkerEvent>,
}

/// The presentation side: owns the display, hands images to the worker and
/// renders whatever comes back on the event channel.
pub struct App {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    source: Box<dyn ImageSource>,
    display: Box<dyn ResultDisplay>,
    load_model: ModelLoader,
    ready: Option<Ready>,
    cancel: CancelToken,
    next_request_id: u64,
}

impl App {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        source: Box<dyn ImageSource>,
        display: Box<dyn ResultDisplay>,
        load_model: ModelLoader,
    ) -> Self {
        Self {
            config,
            logger: logger.with_namespace("app"),
            source,
            display,
            load_model,
            ready: None,
            cancel: CancelToken::new(),
            next_request_id: 0,
        }
    }

    #[allow(dead_code)]
    pub fn is_ready(&self) -> bool {
        self.ready.is_some()
    }

    /// Loads the model if it is not loaded yet. A failure leaves
    /// classification unavailable until the next attempt.
    pub fn ensure_ready(&mut self) -> bool {
        if self.ready.is_some() {
            return true;
        }

        match self.start_classifier() {
            Ok(ready) => {
                self.ready = Some(ready);
                let _ = self.display.show_status("Model loaded");
                true
            }
            Err(e) => {
                let _ = self
                    .logger
                    .error(&format!("classification unavailable: {}", e));
                let _ = self
                    .display
                    .show_status(&format!("Classification unavailable: {}", e));
                false
            }
        }
    }

    fn start_classifier(&self) -> Result<Ready, ClassifyError> {
        let model = Arc::new((self.load_model)()?);

        let pipeline = match ClassificationPipeline::new(
            model.clone(),
            &self.config.classifier,
            self.logger.clone(),
        ) {
            Ok(pipeline) => pipeline,
            Err(e) => {
                model.release();
                return Err(e);
            }
        };

        let (worker, events) = ClassifyWorker::spawn(Arc::new(pipeline), self.logger.clone());

        Ok(Ready {
            model,
            worker,
            events,
        })
    }

    pub fn run(&mut self) -> Result<RunSummary, Box<dyn std::error::Error + Send + Sync>> {
        self.display.init()?;
        self.ensure_ready();

        let inputs = self.source.acquire();

        self.classify_all(inputs)
    }

    /// Cancels outstanding requests once the display has been closed.
    fn cancel_if_closed(&self) {
        if self.display.is_closed() && !self.cancel.is_cancelled() {
            let _ = self.logger.info("display closed, cancelling pending requests");
            self.cancel.cancel();
        }
    }

    pub fn classify_all(
        &mut self,
        inputs: Vec<Acquired>,
    ) -> Result<RunSummary, Box<dyn std::error::Error + Send + Sync>> {
        let mut summary = RunSummary::default();
        let mut pending: HashMap<u64, String> = HashMap::new();

        for input in inputs {
            let NamedImage { name, image } = match input {
                Ok(named) => named,
                Err(AcquireError { name, error }) => {
                    self.display.show_error(&name, &error.to_string())?;
                    summary.failed += 1;
                    continue;
                }
            };

            if !self.ensure_ready() {
                self.display.show_error(&name, "classification unavailable")?;
                summary.failed += 1;
                continue;
            }

            self.cancel_if_closed();

            let request_id = self.next_request_id;
            self.next_request_id += 1;

            let submitted = match &self.ready {
                Some(ready) => ready.worker.submit(request_id, image, self.cancel.clone()),
                None => Err(ClassifyError::Inference("classifier not started".to_string())),
            };

            match submitted {
                Ok(()) => {
                    pending.insert(request_id, name);
                }
                Err(e) => {
                    self.display.show_error(&name, &e.to_string())?;
                    summary.failed += 1;
                }
            }
        }

        while !pending.is_empty() {
            let event = match &self.ready {
                Some(ready) => ready.events.recv(),
                None => break,
            };

            let WorkerEvent::ClassifyDone { request_id, result } = match event {
                Ok(event) => event,
                Err(_) => {
                    let _ = self.logger.error("worker stopped with requests pending");
                    summary.failed += pending.len();
                    break;
                }
            };

            let name = pending.remove(&request_id).unwrap_or_default();

            match result {
                Ok(ranked) => {
                    self.display.show_results(&name, &ranked)?;
                    summary.classified += 1;
                }
                Err(ClassifyError::Cancelled) => {
                    let _ = self.logger.info(&format!("cancelled {}", name));
                    summary.cancelled += 1;
                }
                Err(e) => {
                    self.display.show_error(&name, &e.to_string())?;
                    summary.failed += 1;
                }
            }

            self.cancel_if_closed();
        }

        Ok(summary)
    }

    /// Waits for the display, cancels what is still queued, stops the worker
    /// and frees the model.
    pub fn shutdown(mut self) {
        if let Err(e) = self.display.finish() {
            let _ = self.logger.error(&format!("display failed: {}", e));
        }
        self.cancel.cancel();
        if let Some(ready) = self.ready.take() {
            ready.worker.shutdown();
            ready.model.release();
        }
        let _ = self.logger.info("shut down");
    }
}
