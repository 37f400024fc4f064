use crate::image_classifier::error::ClassifyError;
use crate::image_classifier::interface::RankedResult;
use crate::image_classifier::pipeline::{CancelToken, ClassificationPipeline};
use crate::library::logger::interface::Logger;
use image::DynamicImage;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;

pub enum WorkerRequest {
    Classify {
        request_id: u64,
        image: DynamicImage,
        cancel: CancelToken,
    },
    Shutdown,
}

#[derive(Debug)]
pub enum WorkerEvent {
    ClassifyDone {
        request_id: u64,
        result: Result<RankedResult, ClassifyError>,
    },
}

/// Runs classifications one at a time on its own thread and publishes each
/// outcome as a `WorkerEvent`.
pub struct ClassifyWorker {
    request_sender: Sender<WorkerRequest>,
    handle: Option<JoinHandle<()>>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ClassifyWorker {
    pub fn spawn(
        pipeline: Arc<ClassificationPipeline>,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> (Self, Receiver<WorkerEvent>) {
        let logger = logger.with_namespace("worker");
        let (request_sender, request_receiver) = channel();
        let (event_sender, event_receiver) = channel();

        let thread_logger = logger.clone();
        let handle = std::thread::spawn(move || {
            run_loop(pipeline, request_receiver, event_sender, thread_logger);
        });

        (
            Self {
                request_sender,
                handle: Some(handle),
                logger,
            },
            event_receiver,
        )
    }

    pub fn submit(
        &self,
        request_id: u64,
        image: DynamicImage,
        cancel: CancelToken,
    ) -> Result<(), ClassifyError> {
        self.request_sender
            .send(WorkerRequest::Classify {
                request_id,
                image,
                cancel,
            })
            .map_err(|_| ClassifyError::Inference("classification worker has stopped".to_string()))
    }

    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let _ = self.request_sender.send(WorkerRequest::Shutdown);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                let _ = self.logger.error("classification worker panicked");
            }
        }
    }
}

impl Drop for ClassifyWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_loop(
    pipeline: Arc<ClassificationPipeline>,
    requests: Receiver<WorkerRequest>,
    events: Sender<WorkerEvent>,
    logger: Arc<dyn Logger + Send + Sync>,
) {
    let _ = logger.info("worker started");

    while let Ok(request) = requests.recv() {
        match request {
            WorkerRequest::Classify {
                request_id,
                image,
                cancel,
            } => {
                let result = pipeline.classify_cancellable(&image, &cancel);

                if let Err(e) = &result {
                    let _ = logger.warn(&format!("request {} failed: {}", request_id, e));
                }

                if events
                    .send(WorkerEvent::ClassifyDone { request_id, result })
                    .is_err()
                {
                    break;
                }
            }
            WorkerRequest::Shutdown => break,
        }
    }

    let _ = logger.info("worker stopped");
}
