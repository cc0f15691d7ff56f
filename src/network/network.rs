use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::network::topology::Topology;

/// Address of one weight: matrix `layer`, source neuron `row` (0 = bias),
/// destination neuron `col`. All zero-based.
///
/// Field order fixes the derived ordering to layer, then destination, then
/// source, which is the canonical order of flat weight vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WeightPos {
    pub layer: usize,
    pub col: usize,
    pub row: usize,
}

impl WeightPos {
    pub fn new(layer: usize, row: usize, col: usize) -> WeightPos {
        WeightPos { layer, col, row }
    }
}

/// The weights of a feed-forward network: one matrix per layer boundary,
/// `(prior size + 1) x next size`, bias in row 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub layers: Vec<Matrix>,
}

impl Network {
    pub fn zeros(topology: &Topology) -> Network {
        let layers = (0..topology.boundaries())
            .map(|l| {
                let (rows, cols) = topology.shape(l);
                Matrix::zeros(rows, cols)
            })
            .collect();
        Network { layers }
    }

    /// Every weight drawn from N(0, 1).
    pub fn standard_normal<R: Rng + ?Sized>(topology: &Topology, rng: &mut R) -> Network {
        let layers = (0..topology.boundaries())
            .map(|l| {
                let (rows, cols) = topology.shape(l);
                Matrix::standard_normal(rows, cols, rng)
            })
            .collect();
        Network { layers }
    }

    /// Builds a network from a flat vector in canonical order.
    pub fn from_flat(topology: &Topology, values: &[f64]) -> Result<Network> {
        if values.len() != topology.weight_count() {
            return Err(Error::InvalidData(format!(
                "expected {} weights, got {}",
                topology.weight_count(),
                values.len()
            )));
        }
        let mut network = Network::zeros(topology);
        let positions: Vec<WeightPos> = network.positions().collect();
        network.scatter(&positions, values);
        Ok(network)
    }

    pub fn get(&self, pos: WeightPos) -> f64 {
        self.layers[pos.layer].get(pos.row, pos.col)
    }

    pub fn set(&mut self, pos: WeightPos, value: f64) {
        self.layers[pos.layer].set(pos.row, pos.col, value);
    }

    pub fn weight_count(&self) -> usize {
        self.layers.iter().map(|m| m.rows * m.cols).sum()
    }

    /// Every position in canonical order.
    pub fn positions(&self) -> impl Iterator<Item = WeightPos> + '_ {
        self.layers.iter().enumerate().flat_map(|(layer, m)| {
            (0..m.cols).flat_map(move |col| (0..m.rows).map(move |row| WeightPos::new(layer, row, col)))
        })
    }

    pub fn flatten(&self) -> Vec<f64> {
        self.positions().map(|pos| self.get(pos)).collect()
    }

    pub fn gather(&self, positions: &[WeightPos]) -> Vec<f64> {
        gather(&self.layers, positions)
    }

    pub fn scatter(&mut self, positions: &[WeightPos], values: &[f64]) {
        for (&pos, &value) in positions.iter().zip(values) {
            self.set(pos, value);
        }
    }
}

/// Reads `positions` out of per-layer matrices, e.g. a gradient laid out like the weights.
pub fn gather(layers: &[Matrix], positions: &[WeightPos]) -> Vec<f64> {
    positions
        .iter()
        .map(|pos| layers[pos.layer].get(pos.row, pos.col))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_order_is_column_major_per_layer() {
        let t = Topology::new(1, &[2], 1).unwrap();
        let values: Vec<f64> = (1..=7).map(f64::from).collect();
        let net = Network::from_flat(&t, &values).unwrap();

        // first matrix is 2x2: [bias; x] -> [h1, h2]
        assert_eq!(net.layers[0].data, vec![vec![1.0, 3.0], vec![2.0, 4.0]]);
        assert_eq!(net.layers[1].column(0), vec![5.0, 6.0, 7.0]);
        assert_eq!(net.flatten(), values);
    }

    #[test]
    fn gather_and_scatter_touch_only_the_given_positions() {
        let t = Topology::new(1, &[0], 1).unwrap();
        let mut net = Network::zeros(&t);
        let positions = [WeightPos::new(0, 1, 0)];
        net.scatter(&positions, &[2.5]);
        assert_eq!(net.flatten(), vec![0.0, 2.5]);
        assert_eq!(net.gather(&positions), vec![2.5]);
    }
}
