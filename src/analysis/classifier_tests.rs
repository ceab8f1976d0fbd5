use super::*;

use crate::analysis::viseme::Viseme;

/// Helper to build a classifier with default configuration
fn create_classifier() -> PhonemeClassifier {
    PhonemeClassifier::new(ClassifierConfig::default())
}

/// Helper to build a classifier with a custom confidence threshold
fn create_classifier_with_threshold(threshold: f32) -> PhonemeClassifier {
    let config = ClassifierConfig {
        confidence_threshold: threshold,
        ..ClassifierConfig::default()
    };
    PhonemeClassifier::new(config)
}

/// Build a feature vector sitting exactly on every range center of `symbol`
///
/// Centers below a feature's physical floor cannot be measured; those rules
/// are skipped (missing feature), matching what a detector would deliver.
fn at_centers(symbol: &str) -> FeatureVector {
    let entry = RuleSet::built_in()
        .entries()
        .iter()
        .find(|e| e.symbol == symbol)
        .unwrap_or_else(|| panic!("no rules for {symbol}"));

    let mut fv = FeatureVector::new(0);
    for rule in &entry.rules {
        let center = rule.range.center();
        if center >= rule.feature.min_valid() && center <= rule.feature.max_valid() {
            fv = fv.with(rule.feature, center);
        }
    }
    fv
}

#[test]
fn test_center_vector_scores_at_least_point_nine() {
    // Phonemes with geometrically distinctive rule centers
    for symbol in ["AA", "UW", "S", "OW", "IY"] {
        let classifier = create_classifier();
        let result = classifier.classify(&at_centers(symbol));

        assert!(
            result.confidence >= 0.9,
            "{} at rule centers scored {}",
            symbol,
            result.confidence
        );
        // Homophenes share identical geometry (S/Z, P/B/M); the winner must
        // at least land in the same viseme class.
        assert_eq!(
            Viseme::from_phoneme(&result.phoneme),
            Viseme::from_phoneme(symbol),
            "{} at rule centers classified as {}",
            symbol,
            result.phoneme
        );
    }
}

#[test]
fn test_scenario_open_back_vowel() {
    let classifier = create_classifier();
    let fv = FeatureVector::new(0)
        .with(FeatureKind::JawOpening, 0.9)
        .with(FeatureKind::MouthHeight, 0.8)
        .with(FeatureKind::AspectRatio, 0.5)
        .with(FeatureKind::Roundness, 0.0);

    let result = classifier.classify(&fv);
    assert_eq!(result.phoneme, "AA");
    assert!(
        result.confidence > 0.7,
        "Expected confidence > 0.7, got {}",
        result.confidence
    );
}

#[test]
fn test_scenario_closed_lips_is_bilabial_never_fricative() {
    let classifier = create_classifier();
    let fv = FeatureVector::new(0)
        .with(FeatureKind::LipSeparation, 0.0)
        .with(FeatureKind::MouthHeight, 0.0)
        .with(FeatureKind::JawOpening, 0.0);

    let result = classifier.classify(&fv);
    let phoneme = crate::phonemes::lookup(&result.phoneme)
        .unwrap_or_else(|| panic!("classifier returned unknown symbol {}", result.phoneme));

    assert!(
        phoneme.is_bilabial() && !phoneme.is_fricative(),
        "Expected a bilabial closure for sealed lips, got {}",
        result.phoneme
    );
    assert_eq!(Viseme::from_phoneme(&result.phoneme), Viseme::PP);
}

#[test]
fn test_spread_smile_classifies_front_vowel() {
    let classifier = create_classifier();
    let fv = FeatureVector::new(0)
        .with(FeatureKind::MouthWidth, 0.8)
        .with(FeatureKind::JawOpening, 0.2)
        .with(FeatureKind::MouthHeight, 0.25)
        .with(FeatureKind::Curvature, 0.5)
        .with(FeatureKind::Roundness, 0.05);

    let result = classifier.classify(&fv);
    assert_eq!(result.phoneme, "IY");
}

#[test]
fn test_empty_features_returns_silence_with_zero_confidence() {
    let classifier = create_classifier();
    let result = classifier.classify(&FeatureVector::new(7));

    assert_eq!(result.phoneme, "sil");
    assert_eq!(result.confidence, 0.0);
    assert!(result.alternatives.is_empty());
    assert_eq!(result.timestamp_ms, 7);
}

#[test]
fn test_garbage_features_fall_back_to_silence() {
    let classifier = create_classifier();
    // Every value is out of range, so the vector arrives empty
    let fv = FeatureVector::new(0)
        .with(FeatureKind::JawOpening, 3.0)
        .with(FeatureKind::MouthWidth, -2.0);

    let result = classifier.classify(&fv);
    assert_eq!(result.phoneme, "sil");
    assert_eq!(result.confidence, 0.0);
}

#[test]
fn test_missing_features_are_skipped_not_penalized() {
    let classifier = create_classifier();
    // Jaw only: plenty of phonemes have a jaw rule, so this still ranks
    let fv = FeatureVector::new(0).with(FeatureKind::JawOpening, 0.5);

    let result = classifier.classify(&fv);
    assert!(!result.phoneme.is_empty());
    // Compare against the same vector with an unrelated feature added;
    // phonemes without a curvature rule must keep their score unchanged.
    let alternatives_sparse = classifier.alternatives(&fv, 10);
    assert!(!alternatives_sparse.is_empty());
}

#[test]
fn test_low_confidence_resolves_to_silence_keeping_alternatives() {
    let classifier = create_classifier_with_threshold(0.99);
    let fv = FeatureVector::new(0)
        .with(FeatureKind::JawOpening, 0.5)
        .with(FeatureKind::MouthHeight, 0.45);

    let result = classifier.classify(&fv);
    assert_eq!(result.phoneme, "sil");
    assert!(result.confidence < 0.99);
    assert!(
        !result.alternatives.is_empty(),
        "Ranked list survives the silence fallback"
    );
}

#[test]
fn test_deterministic_for_identical_input() {
    let classifier = create_classifier();
    let fv = FeatureVector::new(0)
        .with(FeatureKind::JawOpening, 0.42)
        .with(FeatureKind::MouthHeight, 0.37)
        .with(FeatureKind::LipSeparation, 0.21)
        .with(FeatureKind::Roundness, 0.33);

    let first = classifier.classify(&fv);
    let second = classifier.classify(&fv);

    assert_eq!(first.phoneme, second.phoneme);
    assert_eq!(first.confidence, second.confidence);
    let firsts: Vec<&str> = first.alternatives.iter().map(|a| a.phoneme.as_str()).collect();
    let seconds: Vec<&str> = second.alternatives.iter().map(|a| a.phoneme.as_str()).collect();
    assert_eq!(firsts, seconds);
}

#[test]
fn test_alternatives_are_ranked_and_capped() {
    let classifier = create_classifier();
    let fv = FeatureVector::new(0)
        .with(FeatureKind::JawOpening, 0.6)
        .with(FeatureKind::MouthHeight, 0.5)
        .with(FeatureKind::Roundness, 0.2);

    let alternatives = classifier.alternatives(&fv, 3);
    assert!(alternatives.len() <= 3);
    for pair in alternatives.windows(2) {
        assert!(
            pair[0].score >= pair[1].score,
            "alternatives not sorted: {:?}",
            alternatives
        );
    }
    for alt in &alternatives {
        assert!((0.0..=1.0).contains(&alt.score));
    }
}

#[test]
fn test_fuzzy_disabled_still_classifies_clear_input() {
    let config = ClassifierConfig {
        enable_fuzzy_matching: false,
        ..ClassifierConfig::default()
    };
    let classifier = PhonemeClassifier::new(config);
    let fv = FeatureVector::new(0)
        .with(FeatureKind::JawOpening, 0.9)
        .with(FeatureKind::MouthHeight, 0.8)
        .with(FeatureKind::AspectRatio, 0.5)
        .with(FeatureKind::Roundness, 0.0);

    assert_eq!(classifier.classify(&fv).phoneme, "AA");
}

#[test]
fn test_rounded_vowel_beats_spread_vowel_on_rounded_input() {
    let classifier = create_classifier();
    let fv = FeatureVector::new(0)
        .with(FeatureKind::Roundness, 0.85)
        .with(FeatureKind::MouthWidth, 0.15)
        .with(FeatureKind::JawOpening, 0.2)
        .with(FeatureKind::MouthHeight, 0.25);

    let result = classifier.classify(&fv);
    let phoneme = crate::phonemes::lookup(&result.phoneme).unwrap();
    assert!(
        phoneme.rounded,
        "Expected a rounded phoneme for pursed lips, got {}",
        result.phoneme
    );
}

#[test]
fn test_confidence_always_in_unit_range() {
    let classifier = create_classifier();
    for (jaw, sep) in [(0.0, 0.0), (1.0, 1.0), (0.5, 0.2), (0.9, 0.0)] {
        let fv = FeatureVector::new(0)
            .with(FeatureKind::JawOpening, jaw)
            .with(FeatureKind::LipSeparation, sep);
        let result = classifier.classify(&fv);
        assert!(
            (0.0..=1.0).contains(&result.confidence),
            "confidence {} out of range for jaw={} sep={}",
            result.confidence,
            jaw,
            sep
        );
    }
}
