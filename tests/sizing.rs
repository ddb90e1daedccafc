use contig_probe::filter::{expected_false_positive_rate, hash_count_for, size_for_target, FilterError};
use test_case::test_case;

#[test_case(100, 0.01 => 959; "reference sizing")]
#[test_case(1, 0.5 => 2; "single item at one half")]
#[test_case(1_000, 0.001 => 14_378; "thousand items at one per mille")]
fn array_size(n: usize, p: f64) -> usize {
    size_for_target(n, p).expect("valid inputs")
}

#[test_case(100, 959 => 7; "reference hash count")]
#[test_case(10, 10 => 1; "one bit per item")]
#[test_case(1_000, 14_378 => 10; "thousand items")]
fn hash_count(n: usize, m: usize) -> usize {
    hash_count_for(n, m).expect("valid inputs")
}

#[test_case(0, 0.01; "no items")]
#[test_case(10, 0.0; "zero rate")]
#[test_case(10, 1.0; "certain rate")]
#[test_case(10, -0.5; "negative rate")]
fn invalid_targets(n: usize, p: f64) {
    assert!(matches!(
        size_for_target(n, p),
        Err(FilterError::InvalidParameter(_))
    ));
}

#[test]
fn optimal_parameters_meet_their_target() {
    for (n, p) in [(10usize, 0.1f64), (100, 0.01), (5_000, 0.001)] {
        let m = size_for_target(n, p).unwrap();
        let k = hash_count_for(n, m).unwrap();
        let rate = expected_false_positive_rate(n, m, k);
        // k is rounded up, so the prediction may sit slightly above p.
        assert!(rate <= p * 1.1, "n={n} p={p}: predicted {rate}");
    }
}
