use log::warn;

use crate::activation::NetFunctions;
use crate::error::Result;
use crate::loss::ErrorFunction;
use crate::network::{ExclusionMask, Topology, WeightPos};
use crate::train::dataset::Dataset;
use crate::train::train_config::TrainConfig;

/// Everything resolved once before the first repetition and shared
/// read-only by all of them.
pub struct TrainingSetup<'a> {
    pub config: &'a TrainConfig,
    pub dataset: &'a Dataset,
    pub topology: Topology,
    pub functions: NetFunctions,
    pub mask: ExclusionMask,
    pub free: Vec<WeightPos>,
}

impl<'a> TrainingSetup<'a> {
    pub fn new(dataset: &'a Dataset, config: &'a TrainConfig) -> Result<TrainingSetup<'a>> {
        config.validate()?;

        let topology = Topology::new(dataset.input_count(), &config.hidden, dataset.output_count())?;
        let mask = ExclusionMask::resolve(&topology, config.exclude.as_ref(), &config.constant_weights)?;
        let free = mask.free_positions(&topology);

        let error = if config.error.is_cross_entropy() && !dataset.is_binary_response() {
            warn!("error function switched to sse because the response is not binary");
            ErrorFunction::Sse
        } else {
            config.error.clone()
        };
        let functions = NetFunctions::new(config.activation.clone(), error, config.linear_output);

        if let Some(start) = &config.start_weights {
            if start.len() < free.len() {
                warn!(
                    "{} start weights given for {} free weights; drawing random weights instead",
                    start.len(),
                    free.len()
                );
            }
        }

        Ok(TrainingSetup {
            config,
            dataset,
            topology,
            functions,
            mask,
            free,
        })
    }

    /// Weights that count as model parameters: the free ones plus excluded
    /// weights pinned to a non-zero constant.
    pub fn synapse_count(&self) -> usize {
        self.topology.weight_count() - self.mask.len() + self.mask.nonzero_constants()
    }
}
