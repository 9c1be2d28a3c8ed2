//! Integration tests for the classification pipeline

use khmer_sms::model::DEFAULT_MODEL_NAME;
use khmer_sms::{
    normalize_khmer_text, CategoryModel, Classifier, ClassifierError, ConfidenceMap, Config,
    ModelError, ModelLoader, Prediction, SmsCategory,
};
use std::path::Path;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

const SPAM_CLAIM: &str = "ពេលនេះ\u{200B} លោកអ្នកទទួលបានប្រាក់ ១០០$ សូមចុចតំណរភ្ជាប់ដើម្បីទទួលយកប្រាក់ https://example.com/claim";
const HAM_MEETING: &str = "សួស្តី! សូមជួបគ្នានៅភោជនីយដ្ឋាន ម៉ោង ៧ យប់នេះ។";
const SPAM_WIN: &str = "ប្រញាប់ឡើង! លោកអ្នកឈ្នះរង្វាន់ ១០០០$ ចូលមើលនៅ https://example.com/win";
const HAM_BIRTHDAY: &str = "សូមជូនពរខួបកំណើត។ សង្ឃឹមថាថ្ងៃនេះជាថ្ងៃដ៏សប្បាយសម្រាប់អ្នក។";

/// Model that answers the same way for every message
struct FixedModel(Result<Prediction, ModelError>);

impl CategoryModel for FixedModel {
    fn predict(&self, _text: &str) -> Result<Prediction, ModelError> {
        self.0.clone()
    }

    fn model_name(&self) -> &str {
        "fixed"
    }
}

/// Helper to create a model directory with a keyword manifest
fn setup_model_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(format!("{}.toml", DEFAULT_MODEL_NAME)),
        "backend = \"keyword\"\n",
    )
    .unwrap();
    dir
}

fn keyword_classifier(dir: &Path) -> Classifier {
    Classifier::new(None, &ModelLoader::new(dir))
}

#[test]
fn test_keyword_model_end_to_end() {
    let dir = setup_model_dir();
    let classifier = keyword_classifier(dir.path());

    assert!(classifier.is_model_available());
    assert_eq!(classifier.classify(SPAM_CLAIM), SmsCategory::Spam);
    assert_eq!(classifier.classify(SPAM_WIN), SmsCategory::Spam);
    assert_eq!(classifier.classify(HAM_MEETING), SmsCategory::Ham);
    assert_eq!(classifier.classify(HAM_BIRTHDAY), SmsCategory::Ham);
}

#[test]
fn test_confidence_maps_are_complete_and_bounded() {
    let dir = setup_model_dir();
    let classifier = keyword_classifier(dir.path());

    for message in [SPAM_CLAIM, HAM_MEETING, SPAM_WIN, HAM_BIRTHDAY, "", "🎉$€"] {
        let map = classifier.classify_with_confidence(message);
        assert_eq!(map.len(), 2, "expected Ham and Spam for {:?}", message);

        let ham = map.get(SmsCategory::Ham).unwrap();
        let spam = map.get(SmsCategory::Spam).unwrap();
        assert!((0.0..=1.0).contains(&ham));
        assert!((0.0..=1.0).contains(&spam));
        assert!((ham + spam - 1.0).abs() < 1e-9);

        let detailed = classifier.detailed_classification(message);
        assert_eq!(detailed.category, classifier.classify(message));
        assert_eq!(map.get(detailed.category), Some(detailed.confidence));
    }
}

#[test]
fn test_missing_model_answers_unknown() {
    let dir = TempDir::new().unwrap();
    let classifier = keyword_classifier(dir.path());

    assert!(!classifier.is_model_available());
    for message in [SPAM_CLAIM, HAM_MEETING, ""] {
        assert_eq!(classifier.classify_with_confidence(message), ConfidenceMap::unknown());
        assert_eq!(classifier.classify(message), SmsCategory::Unknown);

        let detailed = classifier.detailed_classification(message);
        assert_eq!(detailed.category, SmsCategory::Unknown);
        assert_eq!(detailed.confidence, 1.0);
    }

    assert!(matches!(
        classifier.try_classify_with_confidence(SPAM_CLAIM),
        Err(ClassifierError::ModelUnavailable { .. })
    ));
}

#[test]
fn test_named_model_from_config() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("Resources")).unwrap();
    std::fs::write(
        dir.path().join("Resources").join("lottery.toml"),
        "backend = \"keyword\"\nspam_keywords = [\"lottery\"]\n",
    )
    .unwrap();

    let mut config = Config::default();
    config.apply_overrides(
        Some("lottery".to_string()),
        Some(dir.path().to_string_lossy().to_string()),
    );

    let classifier = Classifier::from_config(&config);
    assert_eq!(classifier.model_name(), "lottery");
    assert_eq!(classifier.classify("Lottery results inside"), SmsCategory::Spam);
    assert_eq!(classifier.classify(SPAM_WIN), SmsCategory::Ham);
}

#[test]
fn test_distribution_scenario() {
    let classifier = Classifier::with_model(Box::new(FixedModel(Ok(
        Prediction::with_distribution("Spam", [("Spam", 0.82), ("Ham", 0.18)]),
    ))));

    assert_eq!(classifier.classify(SPAM_CLAIM), SmsCategory::Spam);
    let detailed = classifier.detailed_classification(SPAM_CLAIM);
    assert_eq!(detailed.category, SmsCategory::Spam);
    assert_eq!(detailed.confidence, 0.82);
}

#[test]
fn test_unrecognized_label_scenario() {
    let classifier =
        Classifier::with_model(Box::new(FixedModel(Ok(Prediction::label_only("Other")))));

    assert_eq!(classifier.classify_with_confidence(HAM_MEETING), ConfidenceMap::unknown());
    assert_eq!(classifier.classify(HAM_MEETING), SmsCategory::Unknown);
}

#[test]
fn test_failed_prediction_is_distinguishable() {
    let classifier = Classifier::with_model(Box::new(FixedModel(Err(ModelError::Timeout(
        std::time::Duration::from_secs(5),
    )))));

    assert_eq!(classifier.classify_with_confidence(HAM_MEETING), ConfidenceMap::unknown());
    match classifier.try_detailed_classification(HAM_MEETING) {
        Err(ClassifierError::PredictionFailed { model_name, source }) => {
            assert_eq!(model_name, "fixed");
            assert!(matches!(source, ModelError::Timeout(_)));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[test]
fn test_shared_across_threads() {
    let dir = setup_model_dir();
    let classifier = Arc::new(keyword_classifier(dir.path()));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let classifier = Arc::clone(&classifier);
            thread::spawn(move || {
                let message = if i % 2 == 0 { SPAM_WIN } else { HAM_MEETING };
                (0..25).map(|_| classifier.classify(message)).collect::<Vec<_>>()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let expected = if i % 2 == 0 { SmsCategory::Spam } else { SmsCategory::Ham };
        assert!(handle.join().unwrap().iter().all(|c| *c == expected));
    }
}

#[test]
fn test_normalization_of_sample_messages() {
    let normalized = normalize_khmer_text(SPAM_CLAIM);
    assert!(!normalized.contains('$'));
    assert!(!normalized.contains('\u{200B}'));
    assert!(normalized.contains("១០០"));
    assert!(normalized.contains("https://example.com/claim"));
    assert_eq!(normalize_khmer_text(&normalized), normalized);

    assert_eq!(normalize_khmer_text(HAM_MEETING), HAM_MEETING);
}
