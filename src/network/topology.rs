use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Layer sizes `[input, hidden_1, …, hidden_k, output]`, bias neurons not counted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    sizes: Vec<usize>,
}

impl Topology {
    /// Builds the topology for `input_count` covariates, the requested hidden
    /// layers and `output_count` responses.
    ///
    /// `hidden` of `[]` or `[0]` means no hidden layer at all; any other zero
    /// size is rejected.
    pub fn new(input_count: usize, hidden: &[usize], output_count: usize) -> Result<Topology> {
        if input_count == 0 {
            return Err(Error::InvalidConfig("the network needs at least one input".to_owned()));
        }
        if output_count == 0 {
            return Err(Error::InvalidConfig("the network needs at least one output".to_owned()));
        }
        if hidden.len() > 1 && hidden.contains(&0) {
            return Err(Error::InvalidConfig(format!(
                "hidden layer sizes {hidden:?} contain 0; only a single 0 (no hidden layer) is allowed"
            )));
        }

        let mut sizes = Vec::with_capacity(hidden.len() + 2);
        sizes.push(input_count);
        sizes.extend(hidden.iter().copied().filter(|&h| h > 0));
        sizes.push(output_count);
        Ok(Topology { sizes })
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn input_count(&self) -> usize {
        self.sizes[0]
    }

    pub fn output_count(&self) -> usize {
        self.sizes[self.sizes.len() - 1]
    }

    pub fn hidden_layers(&self) -> &[usize] {
        &self.sizes[1..self.sizes.len() - 1]
    }

    /// Number of weight matrices, one per pair of adjacent layers.
    pub fn boundaries(&self) -> usize {
        self.sizes.len() - 1
    }

    /// `(rows, cols)` of the weight matrix feeding layer `layer + 1`; row 0 is the bias.
    pub fn shape(&self, layer: usize) -> (usize, usize) {
        (self.sizes[layer] + 1, self.sizes[layer + 1])
    }

    pub fn weight_count(&self) -> usize {
        (0..self.boundaries())
            .map(|l| {
                let (rows, cols) = self.shape(l);
                rows * cols
            })
            .sum()
    }

    /// Names every weight in canonical order, e.g. `Intercept.to.1layhid1`,
    /// `x1.to.1layhid1`, `1layhid1.to.y`.
    pub fn weight_names(&self, covariate_names: &[String], response_names: &[String]) -> Vec<String> {
        let last = self.boundaries() - 1;
        let mut names = Vec::with_capacity(self.weight_count());

        for layer in 0..self.boundaries() {
            let (rows, cols) = self.shape(layer);
            for col in 0..cols {
                let target = if layer == last {
                    response_names[col].clone()
                } else {
                    format!("{}layhid{}", layer + 1, col + 1)
                };
                for row in 0..rows {
                    let source = if row == 0 {
                        "Intercept".to_owned()
                    } else if layer == 0 {
                        covariate_names[row - 1].clone()
                    } else {
                        format!("{layer}layhid{row}")
                    };
                    names.push(format!("{source}.to.{target}"));
                }
            }
        }

        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(prefix: &str, n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("{prefix}{i}")).collect()
    }

    #[test]
    fn shapes_include_the_bias_row() {
        let t = Topology::new(3, &[4, 2], 1).unwrap();
        assert_eq!(t.sizes(), &[3, 4, 2, 1]);
        assert_eq!(t.shape(0), (4, 4));
        assert_eq!(t.shape(2), (3, 1));
        assert_eq!(t.weight_count(), 16 + 10 + 3);
    }

    #[test]
    fn single_zero_means_no_hidden_layer() {
        let t = Topology::new(2, &[0], 1).unwrap();
        assert_eq!(t.sizes(), &[2, 1]);
        assert_eq!(t.boundaries(), 1);
        assert!(t.hidden_layers().is_empty());
    }

    #[test]
    fn zero_among_several_hidden_layers_is_rejected() {
        assert!(matches!(Topology::new(2, &[3, 0], 1), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn weight_names_follow_source_and_destination() {
        let t = Topology::new(2, &[2], 1).unwrap();
        let got = t.weight_names(&names("x", 2), &["y".to_owned()]);
        assert_eq!(
            got,
            vec![
                "Intercept.to.1layhid1",
                "x1.to.1layhid1",
                "x2.to.1layhid1",
                "Intercept.to.1layhid2",
                "x1.to.1layhid2",
                "x2.to.1layhid2",
                "Intercept.to.y",
                "1layhid1.to.y",
                "1layhid2.to.y",
            ]
        );
    }
}
