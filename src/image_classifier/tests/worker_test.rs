#[cfg(test)]
mod worker_test {
    use std::sync::Arc;
    use std::time::Duration;

    use crate::image_classifier::error::ClassifyError;
    use crate::image_classifier::pipeline::CancelToken;
    use crate::image_classifier::tests::fixture::{uniform_image, Fixture};
    use crate::image_classifier::worker::{ClassifyWorker, WorkerEvent};

    const TIMEOUT: Duration = Duration::from_secs(10);

    #[test]
    fn test_results_come_back_on_the_channel() {
        let f = Fixture::new();
        let (worker, events) = ClassifyWorker::spawn(Arc::new(f.pipeline), f.logger.clone());

        worker
            .submit(7, uniform_image(64, 48, 128), CancelToken::new())
            .unwrap();

        let WorkerEvent::ClassifyDone { request_id, result } = events.recv_timeout(TIMEOUT).unwrap();

        assert_eq!(request_id, 7);
        let ranked = result.unwrap();
        assert_eq!(ranked[0].label, "dog");
        assert_eq!(ranked[0].confidence, 0.8);

        worker.shutdown();
    }

    #[test]
    fn test_requests_are_answered_in_order() {
        let f = Fixture::new();
        let (worker, events) = ClassifyWorker::spawn(Arc::new(f.pipeline), f.logger.clone());

        for id in 0..4 {
            worker
                .submit(id, uniform_image(16, 16, id as u8), CancelToken::new())
                .unwrap();
        }

        let ids: Vec<u64> = (0..4)
            .map(|_| match events.recv_timeout(TIMEOUT).unwrap() {
                WorkerEvent::ClassifyDone { request_id, .. } => request_id,
            })
            .collect();

        assert_eq!(ids, vec![0, 1, 2, 3]);

        worker.shutdown();
    }

    #[test]
    fn test_failures_are_reported_not_retried() {
        let f = Fixture::new();
        let calls = f.kernel_calls.clone();
        let (worker, events) = ClassifyWorker::spawn(Arc::new(f.pipeline), f.logger.clone());

        let cancel = CancelToken::new();
        cancel.cancel();
        worker.submit(1, uniform_image(4, 4, 0), cancel).unwrap();
        worker
            .submit(2, uniform_image(0, 4, 0), CancelToken::new())
            .unwrap();

        let WorkerEvent::ClassifyDone { result: first, .. } = events.recv_timeout(TIMEOUT).unwrap();
        let WorkerEvent::ClassifyDone { result: second, .. } = events.recv_timeout(TIMEOUT).unwrap();

        assert_eq!(first, Err(ClassifyError::Cancelled));
        assert!(matches!(second, Err(ClassifyError::InvalidInput(_))));
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);

        worker.shutdown();
    }

    #[test]
    fn test_shutdown_closes_event_channel() {
        let f = Fixture::new();
        let (worker, events) = ClassifyWorker::spawn(Arc::new(f.pipeline), f.logger.clone());

        worker.shutdown();

        assert!(events.recv_timeout(Duration::from_millis(100)).is_err());
    }
}
