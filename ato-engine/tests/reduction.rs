use ato_core::models::ScenarioSet;
use ato_core::ports::{ReductionError, ScenarioReducer};
use ato_engine::{FastForwardReducer, MeanReducer};
use approx::assert_abs_diff_eq;
use rstest::*;
use rstest_reuse::{self, *};

use all_reducers::{Strategy, all_reducers, reducer_for};

/// A small two-dimensional sample with eight scenarios.
#[fixture]
fn demand_history() -> ScenarioSet {
    ScenarioSet::uniform(
        2,
        vec![
            12.0, 30.0, //
            14.0, 28.0, //
            55.0, 90.0, //
            13.0, 31.0, //
            60.0, 85.0, //
            11.0, 29.0, //
            58.0, 88.0, //
            12.5, 30.5, //
        ],
    )
    .unwrap()
}

#[apply(all_reducers)]
#[rstest]
fn single_representative_conserves_mass(#[case] strategy: Strategy, demand_history: ScenarioSet) {
    let reducer = reducer_for(strategy, &demand_history);
    let reduced = reducer.reduce(1).unwrap();

    assert_eq!(reduced.n_scenarios(), 1);
    assert_eq!(reduced.dim(), 2);
    assert_abs_diff_eq!(reduced.probabilities()[0], 1.0);
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(5)]
#[case(7)]
#[case(8)]
fn mass_is_conserved_for_every_target(demand_history: ScenarioSet, #[case] n: usize) {
    let reduced = FastForwardReducer::new(&demand_history).reduce(n).unwrap();

    assert_eq!(reduced.n_scenarios(), n);
    let total: f64 = reduced.probabilities().iter().sum();
    assert_abs_diff_eq!(total, 1.0, epsilon = 1e-9);
}

#[test]
fn known_selection_on_the_line() {
    // scenarios 0, 1 and 10 on the real line: the first pick is 1 (cheapest
    // to represent the others), the second pick resolves the 0-vs-10 tie in
    // favor of the lower index, and the outlier 10 hands its mass to 1.
    let set = ScenarioSet::uniform(1, vec![0.0, 1.0, 10.0]).unwrap();
    let reduced = FastForwardReducer::new(&set).reduce(2).unwrap();

    assert_eq!(reduced.column(0), &[1.0]);
    assert_eq!(reduced.column(1), &[0.0]);
    assert_abs_diff_eq!(reduced.probabilities()[0], 2.0 / 3.0, epsilon = 1e-12);
    assert_abs_diff_eq!(reduced.probabilities()[1], 1.0 / 3.0, epsilon = 1e-12);
}

#[rstest]
fn full_reduction_is_the_identity(demand_history: ScenarioSet) {
    let n = demand_history.n_scenarios();
    let reduced = FastForwardReducer::new(&demand_history).reduce(n).unwrap();

    assert_eq!(reduced.n_scenarios(), n);
    for &p in reduced.probabilities() {
        assert_abs_diff_eq!(p, 1.0 / n as f64, epsilon = 1e-12);
    }

    // membership is unchanged even though the order may differ
    let mut original: Vec<Vec<u64>> = demand_history
        .columns()
        .map(|c| c.iter().map(|x| x.to_bits()).collect())
        .collect();
    let mut survived: Vec<Vec<u64>> = reduced
        .columns()
        .map(|c| c.iter().map(|x| x.to_bits()).collect())
        .collect();
    original.sort();
    survived.sort();
    assert_eq!(original, survived);
}

#[test]
fn identical_scenarios_do_not_break_the_selection() {
    // all pairwise distances are zero; the selection must still terminate
    // and the transfers must not produce NaN
    let set = ScenarioSet::uniform(1, vec![5.0; 8]).unwrap();
    let reduced = FastForwardReducer::new(&set).reduce(2).unwrap();

    assert_eq!(reduced.n_scenarios(), 2);
    assert!(reduced.probabilities().iter().all(|p| p.is_finite()));
    // the six discarded duplicates all land on the first representative
    assert_abs_diff_eq!(reduced.probabilities()[0], 7.0 / 8.0, epsilon = 1e-12);
    assert_abs_diff_eq!(reduced.probabilities()[1], 1.0 / 8.0, epsilon = 1e-12);
}

#[rstest]
#[case(0)]
#[case(9)]
fn fast_forward_rejects_bad_targets(demand_history: ScenarioSet, #[case] n: usize) {
    let err = FastForwardReducer::new(&demand_history).reduce(n).unwrap_err();
    assert_eq!(
        err,
        ReductionError::InvalidTarget {
            requested: n,
            available: 8
        }
    );
}

#[rstest]
fn mean_reducer_only_collapses_to_one(demand_history: ScenarioSet) {
    let err = MeanReducer::new(&demand_history).reduce(2).unwrap_err();
    assert!(matches!(
        err,
        ReductionError::InvalidTarget { requested: 2, .. }
    ));
}

#[test]
fn mean_reducer_returns_the_arithmetic_mean() {
    let set = ScenarioSet::uniform(2, vec![1.0, 10.0, 2.0, 20.0, 3.0, 30.0, 4.0, 40.0]).unwrap();
    let reduced = MeanReducer::new(&set).reduce(1).unwrap();

    assert_eq!(reduced.n_scenarios(), 1);
    assert_abs_diff_eq!(reduced.column(0)[0], 2.5);
    assert_abs_diff_eq!(reduced.column(0)[1], 25.0);
    assert_abs_diff_eq!(reduced.probabilities()[0], 1.0);
}
