//! Property-based tests using proptest.
//!
//! Invariants of the encoding, the metric and the fitness evaluator.

use featsel::encoding::decode_coordinate;
use featsel::metrics::confusion_matrix;
use featsel::prelude::*;
use proptest::prelude::*;
use std::sync::OnceLock;

const N_FEATURES: usize = 10;

fn split() -> &'static Split {
    static SPLIT: OnceLock<Split> = OnceLock::new();
    SPLIT.get_or_init(|| {
        let dataset = MajorityVote::new(120)
            .with_seed(5)
            .with_label_noise(0.1)
            .load_dataset()
            .expect("synthetic dataset");
        stratified_split(&dataset, 0.7, 123).expect("split")
    })
}

fn mask_strategy(n: usize) -> impl Strategy<Value = FeatureMask> {
    proptest::collection::vec(any::<bool>(), n).prop_map(FeatureMask::new)
}

fn labels_strategy(len: usize) -> impl Strategy<Value = (Vec<usize>, Vec<usize>)> {
    (
        proptest::collection::vec(0usize..4, len),
        proptest::collection::vec(0usize..4, len),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn stub_fitness_in_unit_interval(mask in mask_strategy(N_FEATURES)) {
        let evaluator = FitnessEvaluator::new(StubClassifier::new());
        let score = evaluator.evaluate(&mask, split(), 10).expect("valid mask");
        prop_assert!((0.0..=1.0).contains(&score));
        if mask.is_none_selected() {
            prop_assert_eq!(score, 0.0);
            prop_assert_eq!(evaluator.classifier().train_calls(), 0);
        }
    }

    #[test]
    fn wrong_length_never_panics(len in 0usize..20) {
        prop_assume!(len != N_FEATURES);
        let evaluator = FitnessEvaluator::new(StubClassifier::new());
        let result = evaluator.evaluate(&FeatureMask::all(len), split(), 10);
        let is_length_error = matches!(result, Err(FeatselError::InvalidMaskLength { .. }));
        prop_assert!(is_length_error);
    }

    #[test]
    fn decode_round_trips_binary_vectors(bits in proptest::collection::vec(any::<bool>(), 0..32)) {
        let unit: Vec<f64> = bits.iter().map(|&b| if b { 1.0 } else { 0.0 }).collect();
        let mask = decode_continuous(&unit);
        prop_assert_eq!(mask.as_slice(), bits.as_slice());
        prop_assert_eq!(mask.to_unit(), unit);
    }

    #[test]
    fn decode_follows_threshold(x in -2.0f64..3.0) {
        prop_assert_eq!(decode_coordinate(x), x >= 0.5);
    }

    #[test]
    fn half_vector_selects_everything(n in 1usize..64) {
        let mask = decode_continuous(&vec![0.5; n]);
        prop_assert_eq!(mask.count(), n);
    }

    #[test]
    fn macro_f1_in_unit_interval((pred, truth) in labels_strategy(40)) {
        let score = macro_f1(&pred, &truth);
        prop_assert!((0.0..=1.0).contains(&score));
        if pred == truth {
            prop_assert!((score - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn confusion_matrix_counts_every_sample((pred, truth) in labels_strategy(25)) {
        let (labels, cm) = confusion_matrix(&pred, &truth);
        let (rows, cols) = cm.shape();
        prop_assert_eq!(rows, labels.len());
        prop_assert_eq!(cols, labels.len());
        prop_assert_eq!(cm.as_slice().iter().sum::<usize>(), 25);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn forest_fitness_in_unit_interval(mask in mask_strategy(N_FEATURES), seed in 0u64..1000) {
        let evaluator = FitnessEvaluator::new(ForestClassifier::new(1).expect("pool")).with_seed(seed);
        let score = evaluator.evaluate(&mask, split(), 5).expect("valid mask");
        prop_assert!((0.0..=1.0).contains(&score));
    }
}
