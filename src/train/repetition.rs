use std::time::Instant;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::Result;
use crate::loss::ErrorFunction;
use crate::math::matrix::Matrix;
use crate::network::{calculate_gradients, forward, generalized_weights, reached_threshold, WeightInitializer};
use crate::train::result::{RepetitionOutcome, RepetitionResult};
use crate::train::setup::TrainingSetup;
use crate::train::step_stats::StepStats;

/// Per-repetition generator: `seed + repetition` when seeded, entropy otherwise.
pub fn repetition_rng(seed: Option<u64>, repetition: usize) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(repetition as u64)),
        None => StdRng::from_entropy(),
    }
}

/// Sum of the error over every observation and output.
///
/// For cross-entropy with outputs inside `[0, 1]`, non-finite terms (from a
/// prediction sitting exactly on 0 or 1) are left out.
pub fn total_error(output: &Matrix, response: &Matrix, error: &ErrorFunction) -> f64 {
    let terms: Vec<f64> = output
        .iter()
        .zip(response.iter())
        .map(|(&x, &y)| error.value(x, y))
        .collect();
    let total: f64 = terms.iter().sum();
    if !total.is_finite() && error.is_cross_entropy() && output.iter().all(|x| (0.0..=1.0).contains(x)) {
        return terms.iter().filter(|t| t.is_finite()).sum();
    }
    total
}

/// Trains one repetition from fresh starting weights until the threshold
/// is reached or `stepmax` runs out.
pub fn run_repetition(setup: &TrainingSetup<'_>, repetition: usize) -> Result<RepetitionOutcome> {
    let config = setup.config;
    let covariate = setup.dataset.covariate();
    let response = setup.dataset.response();
    let functions = &setup.functions;
    let free = &setup.free;

    let started = Instant::now();
    let mut rng = repetition_rng(config.seed, repetition);
    let initializer = WeightInitializer::new(
        &setup.topology,
        &setup.mask,
        free,
        config.start_weights.as_deref(),
    );
    let start_weights = initializer.initialize(repetition, &mut rng);
    let mut rule = config.algorithm.update_rule(
        free.len(),
        config.learning_rate,
        config.learning_rate_limit,
        config.learning_rate_factor,
    )?;

    info!(
        "repetition {}: training {} free weights with {}",
        repetition + 1,
        free.len(),
        config.algorithm
    );

    let mut network = start_weights.clone();
    let mut pass = forward(&network, covariate, functions)?;
    let mut gradient = calculate_gradients(&network, covariate, response, &pass, functions, free)?;
    let mut reached = reached_threshold(&gradient);
    let mut min_reached = reached;
    let mut step = 1;

    let report = |step: usize, reached: f64, min_reached: f64, finished: bool| {
        if let Some(tx) = &config.progress_tx {
            let stats = StepStats {
                repetition,
                step,
                stepmax: config.stepmax,
                reached_threshold: reached,
                min_reached_threshold: min_reached,
                finished,
                elapsed_ms: started.elapsed().as_millis() as u64,
            };
            // A dropped receiver only means nobody is listening.
            let _ = tx.send(stats);
        }
    };

    while step < config.stepmax && reached > config.threshold {
        if step % config.lifesign_step == 0 {
            debug!(
                "repetition {}: step {step}, reached threshold {reached:.6}, min {min_reached:.6}",
                repetition + 1
            );
            report(step, reached, min_reached, false);
        }

        let mut params = network.gather(free);
        rule.update_params(&mut params, &gradient);
        network.scatter(free, &params);

        pass = forward(&network, covariate, functions)?;
        gradient = calculate_gradients(&network, covariate, response, &pass, functions, free)?;
        reached = reached_threshold(&gradient);
        min_reached = min_reached.min(reached);
        step += 1;
    }
    report(step, reached, min_reached, true);

    if reached > config.threshold {
        warn!(
            "repetition {}: no convergence within {} steps (reached threshold {reached:.6}, min {min_reached:.6})",
            repetition + 1,
            config.stepmax
        );
        return Ok(RepetitionOutcome::Exhausted {
            repetition,
            steps: step,
            reached_threshold: reached,
            min_reached_threshold: min_reached,
        });
    }

    let error = total_error(&pass.output, response, &functions.error);
    let (aic, bic) = if config.likelihood {
        let synapses = setup.synapse_count() as f64;
        let n = setup.dataset.observations() as f64;
        (Some(2.0 * error + 2.0 * synapses), Some(2.0 * error + n.ln() * synapses))
    } else {
        (None, None)
    };

    let generalized = if functions.output_is_logistic() {
        Some(generalized_weights(&network, &pass))
    } else {
        warn!(
            "repetition {}: generalized weights skipped, they need a logistic output",
            repetition + 1
        );
        None
    };

    info!(
        "repetition {}: converged after {step} steps, error {error:.6}, reached threshold {reached:.6}",
        repetition + 1
    );

    Ok(RepetitionOutcome::Converged(RepetitionResult {
        repetition,
        start_weights,
        weights: network,
        net_result: pass.output,
        steps: step,
        reached_threshold: reached,
        min_reached_threshold: min_reached,
        error,
        aic,
        bic,
        generalized_weights: generalized,
    }))
}
