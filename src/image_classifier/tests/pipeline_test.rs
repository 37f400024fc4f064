#[cfg(test)]
mod pipeline_test {
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use crate::config::ClassifierConfig;
    use crate::image_classifier::error::ClassifyError;
    use crate::image_classifier::inference_engine::impl_fake::KernelFake;
    use crate::image_classifier::interface::{Classification, ImageClassifier};
    use crate::image_classifier::pipeline::{CancelToken, ClassificationPipeline};
    use crate::image_classifier::preprocess::preprocess;
    use crate::image_classifier::tests::fixture::{uniform_image, Fixture};
    use image::DynamicImage;

    #[test]
    fn test_uniform_gray_frame_end_to_end() {
        let f = Fixture::new();
        let image = uniform_image(224, 224, 128);

        let tensor = preprocess(&image, 224).unwrap();
        assert!(tensor.values().all(|v| (v - 0.003_92).abs() < 1e-4));

        let result = f.pipeline.classify(&image).unwrap();

        assert_eq!(
            result[0],
            Classification {
                label: "dog".to_string(),
                confidence: 0.8,
            }
        );
        assert_eq!(result.len(), 2);
        assert_eq!(result[1].label, "cat");
    }

    #[test]
    fn test_classify_is_idempotent() {
        let f = Fixture::with_kernel(
            KernelFake::new(224, vec![0.1, 0.9, 0.5, 0.9, 0.3, 0.05, 0.7]),
            &["a", "b", "c", "d", "e", "f", "g"],
        );
        let image = uniform_image(500, 375, 77);

        let first = f.pipeline.classify(&image).unwrap();
        let second = f.pipeline.classify(&image).unwrap();

        assert_eq!(first.len(), 5);
        assert_eq!(
            first.iter().map(|c| c.confidence.to_bits()).collect::<Vec<_>>(),
            second.iter().map(|c| c.confidence.to_bits()).collect::<Vec<_>>()
        );
        assert_eq!(first, second);
        assert_eq!(
            first.iter().map(|c| c.label.as_str()).collect::<Vec<_>>(),
            vec!["b", "d", "g", "c", "e"]
        );
    }

    #[test]
    fn test_top_k_defaults_to_five() {
        let scores = (0..10).map(|i| i as f32 / 10.0).collect::<Vec<_>>();
        let labels = ["l0", "l1", "l2", "l3", "l4", "l5", "l6", "l7", "l8", "l9"];
        let f = Fixture::with_kernel(KernelFake::new(224, scores), &labels);

        let result = f.pipeline.classify(&uniform_image(32, 32, 0)).unwrap();

        assert_eq!(
            result.iter().map(|c| c.label.as_str()).collect::<Vec<_>>(),
            vec!["l9", "l8", "l7", "l6", "l5"]
        );
    }

    #[test]
    fn test_zero_area_image_short_circuits() {
        let f = Fixture::new();

        let result = f.pipeline.classify(&DynamicImage::new_rgb8(0, 0));

        assert!(matches!(result, Err(ClassifyError::InvalidInput(_))));
        assert_eq!(f.kernel_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_kernel_failure_surfaces_unchanged() {
        let f = Fixture::with_kernel(
            KernelFake::new(224, vec![0.2, 0.8]).failing("out of memory"),
            &["cat", "dog"],
        );

        let result = f.pipeline.classify(&uniform_image(10, 10, 5));

        assert_eq!(
            result,
            Err(ClassifyError::Inference("out of memory".to_string()))
        );
    }

    #[test]
    fn test_side_must_match_model() {
        let f = Fixture::new();
        let config = ClassifierConfig {
            input_side: 192,
            ..ClassifierConfig::default()
        };

        let result = ClassificationPipeline::new(f.model.clone(), &config, f.logger.clone());

        assert!(matches!(
            result,
            Err(ClassifyError::ShapeMismatch {
                expected: 224,
                actual: 192,
                ..
            })
        ));
    }

    #[test]
    fn test_cancelled_before_start() {
        let f = Fixture::new();
        let cancel = CancelToken::new();
        cancel.cancel();

        let result = f
            .pipeline
            .classify_cancellable(&uniform_image(8, 8, 1), &cancel);

        assert_eq!(result, Err(ClassifyError::Cancelled));
        assert_eq!(f.kernel_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_released_model_fails_classification() {
        let f = Fixture::new();
        let model = Arc::clone(&f.model);

        model.release();

        assert!(matches!(
            f.pipeline.classify(&uniform_image(8, 8, 1)),
            Err(ClassifyError::Inference(_))
        ));
    }
}
