use approx::assert_abs_diff_eq;
use ndarray::{array, Array1, Array2, Axis};
use ndarray_rand::{
    rand::{Rng, SeedableRng},
    rand_distr::{StandardNormal, Uniform},
    RandomExt,
};
use qsvm::{Dataset, ParamGuard};
use qsvm_codec::{decode, Quantizer};
use qsvm_kernel::{KernelFamily, KernelMethod, KernelSelector};
use qsvm_svm::{decision_function, Classifier, OffsetParams, OffsetStrategy, SvmError};
use rand_xoshiro::Xoshiro256Plus;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn decoded_multipliers_classify_test_points() {
    init_logging();

    // two digits of base 2 per sample, "10" selects the weight 1
    let alpha = decode::<f64>("00101000", 2, 2).unwrap();
    assert_eq!(alpha, array![0., 1., 1., 0.]);

    let support = array![[-2., -2.], [-1., -1.5], [1., 1.], [2., 1.5]];
    let labels = array![-1., -1., 1., 1.];
    let kernel = KernelFamily::single(KernelMethod::Linear).unwrap();
    let params = OffsetParams::new(3.).check().unwrap();

    let classifier = Classifier::new(alpha, support, labels, KernelSelector::DEFAULT)
        .unwrap()
        .fit_offset(&kernel, &params)
        .unwrap();

    // hyperplane normal is (2, 2.5), margin residuals 4.75 and -3.5 are averaged
    assert_abs_diff_eq!(classifier.bias(), 0.625, epsilon = 1e-12);
    assert_eq!(classifier.nsupport(), 2);

    let test = Dataset::new(
        array![[-1.5, -1.], [1.5, 2.], [-0.2, -0.1], [0.5, -0.2]],
        array![-1., 1., -1., 1.],
    )
    .unwrap();

    let scores = classifier
        .decision_function(&kernel, test.records())
        .unwrap();
    assert_abs_diff_eq!(
        scores,
        array![-4.875, 8.625, -0.025, 1.125],
        epsilon = 1e-12
    );

    let metrics = classifier.evaluate(&kernel, &test).unwrap();
    assert_abs_diff_eq!(metrics.accuracy, 1.0);
    assert_abs_diff_eq!(metrics.auroc, 1.0);
    assert_abs_diff_eq!(metrics.auprc, 1.0);
}

/// Number of support vectors classified correctly with offset `bias`
fn support_accuracy(
    kernel: &KernelFamily<f64>,
    classifier: &Classifier<f64>,
    bias: f64,
) -> usize {
    let predictions = classifier
        .clone()
        .with_bias(bias)
        .predict(kernel, classifier.support())
        .unwrap();

    predictions
        .iter()
        .zip(classifier.labels().iter())
        .filter(|(p, y)| p == y)
        .count()
}

#[test]
fn candidate_search_never_loses_to_average() {
    init_logging();

    let mut rng = Xoshiro256Plus::seed_from_u64(42);
    let quantizer = Quantizer::<f64>::with_base_digits(2, 3).unwrap();
    let c = quantizer.max_value();
    let kernel = KernelFamily::new(vec![
        KernelMethod::Gaussian(4.0),
        KernelMethod::Linear,
        KernelMethod::Polynomial(1.0, 2.0),
    ])
    .unwrap();

    let mut compared = 0;
    for round in 0..30 {
        let nsamples = 12 + round;
        let support = Array2::<f64>::random_using((nsamples, 3), StandardNormal, &mut rng);
        let labels = support
            .sum_axis(Axis(1))
            .mapv(|x| if x + rng.gen_range(-0.5..0.5) > 0. { 1. } else { -1. });
        let raw = Array1::random_using(nsamples, Uniform::new(0., c), &mut rng);
        let alpha = quantizer.project(&raw).unwrap();
        let selector = KernelSelector::new((round % 3) as i64);

        let classifier = Classifier::new(alpha, support, labels, selector).unwrap();

        let averaged = OffsetParams::new(c).check().unwrap();
        let searched = OffsetParams::new(c)
            .strategy(OffsetStrategy::CandidateSearch)
            .check()
            .unwrap();

        let average = match classifier.estimate_offset(&kernel, &averaged) {
            Ok(b) => b,
            Err(SvmError::NoSupportVectors) => continue,
            Err(err) => panic!("unexpected error {}", err),
        };
        let best = classifier.estimate_offset(&kernel, &searched).unwrap();

        assert!(
            support_accuracy(&kernel, &classifier, best)
                >= support_accuracy(&kernel, &classifier, average)
        );
        compared += 1;
    }

    assert!(compared > 20);
}

#[test]
fn bias_is_added_to_every_score() {
    let mut rng = Xoshiro256Plus::seed_from_u64(7);
    let kernel = KernelFamily::single(KernelMethod::Gaussian(2.0)).unwrap();

    let support = Array2::<f64>::random_using((20, 4), StandardNormal, &mut rng);
    let query = Array2::<f64>::random_using((15, 4), StandardNormal, &mut rng);
    let alpha = Array1::random_using(20, Uniform::new(0., 5.), &mut rng);
    let labels = Array1::from_shape_fn(20, |i| if i % 2 == 0 { 1. } else { -1. });

    let unbiased = decision_function(
        &kernel,
        query.view(),
        alpha.view(),
        support.view(),
        labels.view(),
        KernelSelector::DEFAULT,
        0.0,
    )
    .unwrap();

    for _ in 0..5 {
        let b = rng.gen_range(-10.0..10.0);
        let biased = decision_function(
            &kernel,
            query.view(),
            alpha.view(),
            support.view(),
            labels.view(),
            KernelSelector::DEFAULT,
            b,
        )
        .unwrap();

        assert_abs_diff_eq!(biased, &unbiased + b, epsilon = 1e-10);
    }
}

#[test]
fn saturated_multipliers_are_degenerate_for_both_strategies() {
    let quantizer = Quantizer::<f64>::with_base_digits(3, 2).unwrap();
    let c = quantizer.max_value();
    // every group decodes to 0 or to the full value 4
    let alpha = quantizer.decode("001100110011").unwrap();
    assert_eq!(alpha, array![0., 4., 0., 4., 0., 4.]);

    let support = Array2::from_shape_fn((6, 2), |(i, j)| (i * 2 + j) as f64 / 3.);
    let labels = array![1., -1., 1., -1., -1., 1.];
    let kernel = KernelFamily::single(KernelMethod::Gaussian(1.0)).unwrap();
    let classifier = Classifier::new(alpha, support, labels, KernelSelector::DEFAULT).unwrap();

    for strategy in &[OffsetStrategy::Averaging, OffsetStrategy::CandidateSearch] {
        let params = OffsetParams::new(c).strategy(*strategy).check().unwrap();
        assert!(matches!(
            classifier.estimate_offset(&kernel, &params),
            Err(SvmError::NoSupportVectors)
        ));
    }
}
