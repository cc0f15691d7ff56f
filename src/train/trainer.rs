use log::{info, warn};
use rayon::prelude::*;

use crate::error::Result;
use crate::train::dataset::Dataset;
use crate::train::repetition::run_repetition;
use crate::train::result::{RepetitionOutcome, TrainedNetwork};
use crate::train::setup::TrainingSetup;
use crate::train::train_config::TrainConfig;

/// Trains `config.repetitions` independent networks on `dataset`.
///
/// Repetitions run in parallel and share nothing mutable. The first
/// repetition to fail with an error aborts the whole run; repetitions that
/// merely hit `stepmax` are counted and reported through
/// [`TrainedNetwork::warning`].
pub fn train_network(dataset: &Dataset, config: &TrainConfig) -> Result<TrainedNetwork> {
    let setup = TrainingSetup::new(dataset, config)?;

    info!(
        "training {:?} network, {} repetition(s), {} observations",
        setup.topology.sizes(),
        config.repetitions,
        dataset.observations()
    );

    let outcomes = (0..config.repetitions)
        .into_par_iter()
        .map(|repetition| run_repetition(&setup, repetition))
        .collect::<Result<Vec<RepetitionOutcome>>>()?;

    let trained = TrainedNetwork::from_outcomes(&setup, outcomes);
    if let Some(message) = trained.warning() {
        warn!("{message}");
    }
    Ok(trained)
}
