use rand::Rng;

use crate::network::exclusion::ExclusionMask;
use crate::network::network::{Network, WeightPos};
use crate::network::topology::Topology;

/// Produces the starting weights of each repetition.
///
/// Free weights come from `start_weights` when it holds at least one full
/// slot of `free_count` values; repetition `r` reads slot `r mod slots`.
/// Otherwise every free weight is drawn from N(0, 1). Excluded weights get
/// their constant or 0.
pub struct WeightInitializer<'a> {
    topology: &'a Topology,
    mask: &'a ExclusionMask,
    free: &'a [WeightPos],
    start_weights: Option<&'a [f64]>,
}

impl<'a> WeightInitializer<'a> {
    pub fn new(
        topology: &'a Topology,
        mask: &'a ExclusionMask,
        free: &'a [WeightPos],
        start_weights: Option<&'a [f64]>,
    ) -> Self {
        WeightInitializer {
            topology,
            mask,
            free,
            start_weights,
        }
    }

    fn slot(&self, repetition: usize) -> Option<&'a [f64]> {
        let values = self.start_weights?;
        let width = self.free.len();
        let slots = values.len() / width;
        if slots == 0 {
            return None;
        }
        let start = (repetition % slots) * width;
        Some(&values[start..start + width])
    }

    pub fn initialize<R: Rng + ?Sized>(&self, repetition: usize, rng: &mut R) -> Network {
        let mut network = match self.slot(repetition) {
            Some(values) => {
                let mut network = Network::zeros(self.topology);
                network.scatter(self.free, values);
                network
            }
            None => Network::standard_normal(self.topology, rng),
        };

        for &pos in self.mask.positions() {
            network.set(pos, self.mask.constant(pos));
        }

        network
    }
}
