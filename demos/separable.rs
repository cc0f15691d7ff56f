// Logistic classifier on a linearly separable cloud, cross-entropy error,
// with generalized weights and information criteria.
use std::sync::mpsc;
use std::thread;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rprop_nn::{train_network, Dataset, ErrorFunction, StepStats, TrainConfig};

fn main() -> rprop_nn::Result<()> {
    env_logger::init();

    let mut rng = StdRng::seed_from_u64(7);
    let mut covariates = Vec::new();
    let mut response = Vec::new();
    for _ in 0..200 {
        let (a, b): (f64, f64) = (rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0));
        covariates.push(vec![a, b]);
        response.push(vec![if a + 0.5 * b > 0.3 { 1.0 } else { 0.0 }]);
    }
    let data = Dataset::from_rows(covariates, response)?
        .with_names(vec!["a".into(), "b".into()], vec!["class".into()])?;

    let (tx, rx) = mpsc::channel::<StepStats>();
    let config = TrainConfig {
        hidden: vec![2],
        error: ErrorFunction::CrossEntropy,
        linear_output: false,
        likelihood: true,
        threshold: 0.05,
        repetitions: 3,
        seed: Some(2024),
        lifesign_step: 500,
        progress_tx: Some(tx),
        ..TrainConfig::default()
    };

    let listener = thread::spawn(move || {
        for stats in rx {
            if stats.finished {
                println!(
                    "repetition {} stopped at step {} (reached {:.4})",
                    stats.repetition + 1,
                    stats.step,
                    stats.reached_threshold
                );
            }
        }
    });

    let trained = train_network(&data, &config)?;
    drop(config);
    listener.join().ok();

    if let Some(message) = trained.warning() {
        println!("{message}");
    }
    for r in trained.ranked() {
        println!(
            "repetition {}: error {:.4}, aic {:.2}, bic {:.2}",
            r.repetition + 1,
            r.error,
            r.aic.unwrap_or(f64::NAN),
            r.bic.unwrap_or(f64::NAN)
        );
    }
    if let Some(gw) = trained.best().and_then(|b| b.generalized_weights.as_ref()) {
        let mean = |j: usize| gw.column(j).iter().sum::<f64>() / gw.rows as f64;
        println!("mean generalized weights: a {:.3}, b {:.3}", mean(0), mean(1));
    }
    Ok(())
}
