use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};
use crate::network::network::WeightPos;
use crate::network::topology::Topology;

/// Which weights are held out of training, as the caller writes them down.
///
/// Both forms are 1-based: `Indices` counts through the flat canonical weight
/// vector, `Triples` names `[layer, row, col]` with row 1 being the bias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionSpec {
    Indices(Vec<usize>),
    Triples(Vec<[usize; 3]>),
}

/// Resolved set of excluded weights and the constants pinned to them.
///
/// Constants fill the excluded positions in the order they were listed;
/// positions past the end of the constant list hold 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExclusionMask {
    order: Vec<WeightPos>,
    excluded: BTreeSet<WeightPos>,
    constants: BTreeMap<WeightPos, f64>,
}

impl ExclusionMask {
    pub fn none() -> ExclusionMask {
        ExclusionMask::default()
    }

    pub fn resolve(
        topology: &Topology,
        spec: Option<&ExclusionSpec>,
        constants: &[f64],
    ) -> Result<ExclusionMask> {
        let order = match spec {
            None => Vec::new(),
            Some(ExclusionSpec::Indices(indices)) => from_indices(topology, indices)?,
            Some(ExclusionSpec::Triples(triples)) => from_triples(topology, triples)?,
        };

        if constants.len() > order.len() {
            return Err(Error::InvalidExclusion(format!(
                "{} constant weights given for {} excluded weights",
                constants.len(),
                order.len()
            )));
        }
        if let Some(c) = constants.iter().find(|c| !c.is_finite()) {
            return Err(Error::InvalidExclusion(format!("constant weight {c} is not finite")));
        }

        let mut excluded = BTreeSet::new();
        for &pos in &order {
            if !excluded.insert(pos) {
                return Err(Error::InvalidExclusion(format!(
                    "weight [{}, {}, {}] is excluded more than once",
                    pos.layer + 1,
                    pos.row + 1,
                    pos.col + 1
                )));
            }
        }
        if excluded.len() >= topology.weight_count() {
            return Err(Error::InvalidExclusion("all weights are excluded".to_owned()));
        }

        let constants = order.iter().copied().zip(constants.iter().copied()).collect();
        Ok(ExclusionMask {
            order,
            excluded,
            constants,
        })
    }

    pub fn is_excluded(&self, pos: WeightPos) -> bool {
        self.excluded.contains(&pos)
    }

    pub fn len(&self) -> usize {
        self.excluded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.excluded.is_empty()
    }

    /// Excluded positions in the order they were listed.
    pub fn positions(&self) -> &[WeightPos] {
        &self.order
    }

    /// Fixed value of an excluded weight.
    pub fn constant(&self, pos: WeightPos) -> f64 {
        self.constants.get(&pos).copied().unwrap_or(0.0)
    }

    /// Excluded weights pinned to a non-zero value; these still count as synapses.
    pub fn nonzero_constants(&self) -> usize {
        self.constants.values().filter(|&&c| c != 0.0).count()
    }

    /// Trainable positions in canonical order.
    pub fn free_positions(&self, topology: &Topology) -> Vec<WeightPos> {
        let mut free = Vec::with_capacity(topology.weight_count() - self.len());
        for layer in 0..topology.boundaries() {
            let (rows, cols) = topology.shape(layer);
            for col in 0..cols {
                for row in 0..rows {
                    let pos = WeightPos::new(layer, row, col);
                    if !self.is_excluded(pos) {
                        free.push(pos);
                    }
                }
            }
        }
        free
    }
}

fn from_indices(topology: &Topology, indices: &[usize]) -> Result<Vec<WeightPos>> {
    let total = topology.weight_count();
    let mut layout = Vec::with_capacity(total);
    for layer in 0..topology.boundaries() {
        let (rows, cols) = topology.shape(layer);
        for col in 0..cols {
            for row in 0..rows {
                layout.push(WeightPos::new(layer, row, col));
            }
        }
    }

    indices
        .iter()
        .map(|&i| {
            if i == 0 || i > total {
                Err(Error::InvalidExclusion(format!(
                    "weight index {i} is outside 1..={total}"
                )))
            } else {
                Ok(layout[i - 1])
            }
        })
        .collect()
}

fn from_triples(topology: &Topology, triples: &[[usize; 3]]) -> Result<Vec<WeightPos>> {
    triples
        .iter()
        .map(|&[layer, row, col]| {
            if layer == 0 || layer > topology.boundaries() {
                return Err(Error::InvalidExclusion(format!(
                    "layer {layer} is outside 1..={}",
                    topology.boundaries()
                )));
            }
            let (rows, cols) = topology.shape(layer - 1);
            if row == 0 || row > rows || col == 0 || col > cols {
                return Err(Error::InvalidExclusion(format!(
                    "weight [{layer}, {row}, {col}] is outside the {rows}x{cols} matrix of layer {layer}"
                )));
            }
            Ok(WeightPos::new(layer - 1, row - 1, col - 1))
        })
        .collect()
}
