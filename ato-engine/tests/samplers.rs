use ato_core::models::ScenarioSet;
use ato_core::ports::{PointSampler, Sampler, SamplerError};
use ato_engine::{BiGaussianSampler, GaussianSampler, SeasonalSampler, UniformBox};
use approx::assert_abs_diff_eq;
use rand::RngCore;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rstest::*;

#[test]
fn gaussian_sample_has_the_right_shape() {
    let mut rng = StdRng::seed_from_u64(11);
    let sampler = GaussianSampler::new(3, 50.0, 5.0, 0.0, 100.0).unwrap();

    let set = sampler.sample(20, &mut rng).unwrap();
    assert_eq!(set.dim(), 3);
    assert_eq!(set.n_scenarios(), 20);
    for &p in set.probabilities() {
        assert_abs_diff_eq!(p, 0.05);
    }
    for column in set.columns() {
        assert!(column.iter().all(|&x| (0.0..=100.0).contains(&x)));
    }
}

#[test]
fn gaussian_clipping_binds() {
    let mut rng = StdRng::seed_from_u64(3);
    let sampler = GaussianSampler::new(1, 50.0, 10.0, 45.0, 55.0).unwrap();
    let set = sampler.sample(200, &mut rng).unwrap();
    for column in set.columns() {
        assert!((45.0..=55.0).contains(&column[0]));
    }
}

#[test]
fn gaussian_mean_estimate_approaches_mu() {
    let mut rng = StdRng::seed_from_u64(5);
    let sampler = GaussianSampler::new(2, 50.0, 2.0, 0.0, 100.0).unwrap();
    let mean = sampler.mean_estimate(5000, &mut rng).unwrap();
    for component in mean {
        assert_abs_diff_eq!(component, 50.0, epsilon = 0.5);
    }
}

#[rstest]
#[case(0, 50.0, 1.0, 0.0, 100.0, SamplerError::ZeroDimension)]
#[case(2, 50.0, 0.0, 0.0, 100.0, SamplerError::NonPositiveSpread)]
#[case(2, 50.0, 1.0, 10.0, 5.0, SamplerError::EmptyInterval { low: 10.0, high: 5.0 })]
fn gaussian_rejects_bad_parameters(
    #[case] dim: usize,
    #[case] mu: f64,
    #[case] sigma: f64,
    #[case] low: f64,
    #[case] high: f64,
    #[case] expected: SamplerError,
) {
    assert_eq!(
        GaussianSampler::new(dim, mu, sigma, low, high).unwrap_err(),
        expected
    );
}

#[test]
fn gaussian_rejects_empty_sample() {
    let mut rng = StdRng::seed_from_u64(0);
    let sampler = GaussianSampler::new(1, 50.0, 1.0, 0.0, 100.0).unwrap();
    assert_eq!(
        sampler.sample(0, &mut rng).unwrap_err(),
        SamplerError::EmptySample
    );
}

#[test]
fn bigaussian_mixes_both_modes() {
    let mut rng = StdRng::seed_from_u64(17);
    // well-separated tight modes, half-and-half
    let sampler =
        BiGaussianSampler::new(1, (20.0, 0.5), (80.0, 0.5), 0.5, 0.0, 100.0).unwrap();
    let set = sampler.sample(400, &mut rng).unwrap();

    let low_mode = set.columns().filter(|c| c[0] < 50.0).count();
    let high_mode = set.n_scenarios() - low_mode;
    assert!(low_mode > 100, "only {low_mode} draws from the low mode");
    assert!(high_mode > 100, "only {high_mode} draws from the high mode");

    // the shuffle interleaves the modes rather than leaving two blocks
    let first_half_low = set
        .columns()
        .take(200)
        .filter(|c| c[0] < 50.0)
        .count();
    assert!(first_half_low > 25 && first_half_low < 175);
}

#[test]
fn bigaussian_degenerate_weight_uses_one_mode() {
    let mut rng = StdRng::seed_from_u64(23);
    let sampler =
        BiGaussianSampler::new(1, (20.0, 0.5), (80.0, 0.5), 0.0, 0.0, 100.0).unwrap();
    let set = sampler.sample(100, &mut rng).unwrap();
    for column in set.columns() {
        assert!(column[0] > 50.0);
    }
}

#[test]
fn bigaussian_rejects_bad_weight() {
    assert_eq!(
        BiGaussianSampler::new(1, (20.0, 1.0), (80.0, 1.0), 1.5, 0.0, 100.0).unwrap_err(),
        SamplerError::InvalidWeight { weight: 1.5 }
    );
}

#[test]
fn seasonal_cycles_are_validated() {
    let inner = || GaussianSampler::new(1, 50.0, 1.0, 0.0, 1000.0).unwrap();

    assert_eq!(
        SeasonalSampler::new(inner(), vec![5.0, -3.0], vec![1.0]).unwrap_err(),
        SamplerError::SeasonNotCentered { total: 2.0 }
    );
    assert!(matches!(
        SeasonalSampler::new(inner(), vec![0.0], vec![1.4, 0.2]).unwrap_err(),
        SamplerError::SeasonNotNormalized { .. }
    ));
    assert!(SeasonalSampler::new(inner(), vec![5.0, -5.0], vec![1.4, 0.6]).is_ok());
}

#[test]
fn seasonal_shifts_follow_the_cycle() {
    let mut rng = StdRng::seed_from_u64(31);
    let inner = GaussianSampler::new(2, 50.0, 0.01, 0.0, 1000.0).unwrap();
    let seasonal = SeasonalSampler::new(inner, vec![10.0, -10.0], vec![1.0]).unwrap();

    // horizon of four stages: +10, -10, +10, -10 around the mean
    let horizon = seasonal.sample(4, &mut rng).unwrap();
    assert_eq!(horizon.n_scenarios(), 4);
    for (stage, column) in horizon.columns().enumerate() {
        let expected = if stage % 2 == 0 { 60.0 } else { 40.0 };
        for &x in column {
            assert_abs_diff_eq!(x, expected, epsilon = 1.0);
        }
    }
}

#[test]
fn seasonal_scaling_follows_the_cycle() {
    let mut rng = StdRng::seed_from_u64(37);
    let inner = GaussianSampler::new(1, 50.0, 0.01, 0.0, 1000.0).unwrap();
    let seasonal = SeasonalSampler::new(inner, vec![0.0], vec![1.5, 0.5]).unwrap();

    let horizon = seasonal.sample(2, &mut rng).unwrap();
    assert_abs_diff_eq!(horizon.column(0)[0], 75.0, epsilon = 1.0);
    assert_abs_diff_eq!(horizon.column(1)[0], 25.0, epsilon = 1.0);
}

#[test]
fn flat_seasonal_cycles_delegate_to_the_inner_sampler() {
    let inner = GaussianSampler::new(1, 50.0, 1.0, 0.0, 100.0).unwrap();
    let seasonal = SeasonalSampler::new(inner, vec![0.0], vec![1.0]).unwrap();

    let mut rng_a = StdRng::seed_from_u64(41);
    let mut rng_b = StdRng::seed_from_u64(41);
    let direct = GaussianSampler::new(1, 50.0, 1.0, 0.0, 100.0)
        .unwrap()
        .sample(5, &mut rng_a)
        .unwrap();
    let wrapped = seasonal.sample(5, &mut rng_b).unwrap();
    assert_eq!(direct, wrapped);
}

#[test]
fn seasonality_requires_a_capable_inner_sampler() {
    /// A sampler with no seasonal capability.
    struct Flat;
    impl Sampler for Flat {
        fn dim(&self) -> usize {
            1
        }
        fn sample(
            &self,
            n_scenarios: usize,
            _rng: &mut dyn RngCore,
        ) -> Result<ScenarioSet, SamplerError> {
            Ok(ScenarioSet::uniform(1, vec![1.0; n_scenarios])?)
        }
    }

    let mut rng = StdRng::seed_from_u64(0);
    let seasonal = SeasonalSampler::new(Flat, vec![1.0, -1.0], vec![1.0]).unwrap();
    assert_eq!(
        seasonal.sample(4, &mut rng).unwrap_err(),
        SamplerError::SeasonalityUnsupported
    );
}

#[test]
fn uniform_box_respects_the_bounds() {
    let mut rng = StdRng::seed_from_u64(43);
    let points = UniformBox::new(vec![1.0, 10.0], vec![2.0, 20.0]).unwrap();
    for _ in 0..100 {
        let point = points.sample_point(&mut rng);
        assert_eq!(point.len(), 2);
        assert!((1.0..2.0).contains(&point[0]));
        assert!((10.0..20.0).contains(&point[1]));
    }
}

#[test]
fn uniform_box_scaled_around_a_base_point() {
    let mut rng = StdRng::seed_from_u64(47);
    let points = UniformBox::scaled(&[100.0, 10.0], 0.05, 4.0).unwrap();
    let point = points.sample_point(&mut rng);
    assert!((5.0..400.0).contains(&point[0]));
    assert!((0.5..40.0).contains(&point[1]));
}

#[test]
fn uniform_box_degenerate_interval_is_constant() {
    let mut rng = StdRng::seed_from_u64(0);
    let points = UniformBox::new(vec![3.0], vec![3.0]).unwrap();
    assert_eq!(points.sample_point(&mut rng), vec![3.0]);
}

#[rstest]
fn uniform_box_rejects_bad_bounds() {
    assert_eq!(
        UniformBox::new(vec![0.0], vec![1.0, 2.0]).unwrap_err(),
        SamplerError::BoundsMismatch { low: 1, high: 2 }
    );
    assert!(matches!(
        UniformBox::new(vec![2.0], vec![1.0]).unwrap_err(),
        SamplerError::EmptyInterval { .. }
    ));
    assert_eq!(
        UniformBox::new(vec![], vec![]).unwrap_err(),
        SamplerError::ZeroDimension
    );
}
