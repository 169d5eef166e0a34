use ndarray::{array, Array1};
use ndarray_rand::rand::SeedableRng;
use qsvm::display::PrintOptions;
use qsvm::ParamGuard;
use qsvm_codec::Quantizer;
use qsvm_datasets::{generate, save_json};
use qsvm_kernel::{KernelFamily, KernelMethod, KernelSelector};
use qsvm_svm::{error::Result, Classifier, OffsetParams, OffsetStrategy};
use rand_xoshiro::Xoshiro256Plus;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut rng = Xoshiro256Plus::seed_from_u64(42);
    let (negative, positive) = (array![-1.0, -1.0], array![1.0, 1.0]);
    let train = generate::blobs(20, &negative, &positive, &mut rng).unwrap();
    let valid = generate::blobs(50, &negative, &positive, &mut rng).unwrap();

    // stand-in for the annealer: every sample gets a weight from its distance to the other blob
    let quantizer = Quantizer::<f64>::with_base_digits(2, 3).unwrap();
    let raw = train
        .records()
        .outer_iter()
        .zip(train.targets().iter())
        .map(|(x, y)| (2.0 - y * x.sum()).max(0.0) * 2.0)
        .collect::<Array1<_>>();
    let binary = quantizer.encode(&raw).unwrap();
    println!("annealer input/output: {}", binary);

    let alpha = quantizer.decode(&binary).unwrap();
    let kernel = KernelFamily::new(vec![KernelMethod::Gaussian(2.0), KernelMethod::Linear]).unwrap();
    let options = PrintOptions::default().precision(3);

    for strategy in &[OffsetStrategy::Averaging, OffsetStrategy::CandidateSearch] {
        let params = OffsetParams::new(quantizer.max_value())
            .strategy(*strategy)
            .check()?;

        let (records, targets) = train.clone().into_parts();
        let classifier = Classifier::new(alpha.clone(), records, targets, KernelSelector::DEFAULT)?
            .fit_offset(&kernel, &params)?;

        println!("{:?}: {}", strategy, classifier.format_with(&options));
        let metrics = classifier.evaluate(&kernel, &valid)?;
        println!("validation {}", metrics.format_with(&options));

        let path = std::env::temp_dir().join(format!("qsvm-{:?}.json", strategy).to_lowercase());
        if save_json(&path, &metrics).is_ok() {
            println!("metrics written to {}", path.display());
        }
    }

    Ok(())
}
