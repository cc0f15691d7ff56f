use crate::math::sign;
use crate::optim::algorithm::{LearningRateFactor, LearningRateLimit, UpdateRule};

const INITIAL_LEARNING_RATE: f64 = 0.1;
const SUM_OFFSET: f64 = 1e-6;

fn initial_rates(len: usize, limit: LearningRateLimit) -> Vec<f64> {
    vec![INITIAL_LEARNING_RATE.clamp(limit.min, limit.max); len]
}

/// Resilient backpropagation with weight backtracking.
///
/// Each weight carries its own rate. While the gradient keeps its sign the
/// rate grows by `plus`; on a sign change the previous step is taken back,
/// the rate shrinks by `minus` and the next step is skipped.
pub struct RpropPlus {
    limit: LearningRateLimit,
    factor: LearningRateFactor,
    learning_rates: Vec<f64>,
    /// Sign of the last gradient a step was taken on, 0 after a backtrack.
    gradients_old: Vec<f64>,
}

impl RpropPlus {
    pub fn new(len: usize, limit: LearningRateLimit, factor: LearningRateFactor) -> Self {
        RpropPlus {
            limit,
            factor,
            learning_rates: initial_rates(len, limit),
            gradients_old: vec![0.0; len],
        }
    }
}

impl UpdateRule for RpropPlus {
    fn update_params(&mut self, params: &mut [f64], grad: &[f64]) {
        let LearningRateLimit { min, max } = self.limit;
        let LearningRateFactor { minus, plus } = self.factor;

        for ((w, &g), (lr, old)) in params
            .iter_mut()
            .zip(grad)
            .zip(self.learning_rates.iter_mut().zip(self.gradients_old.iter_mut()))
        {
            let s = sign(g);
            let t = *old * s;

            if t < 0.0 {
                *w += *old * *lr;
                *lr = (*lr * minus).max(min);
                *old = 0.0;
                continue;
            }
            if t > 0.0 {
                *lr = (*lr * plus).min(max);
            }
            *w -= s * *lr;
            *old = s;
        }
    }

    fn learning_rates(&self) -> &[f64] {
        &self.learning_rates
    }
}

/// How [`RpropMinus`] post-processes the adapted rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpropVariant {
    Plain,
    /// Adjust the rate of the smallest absolute non-zero gradient.
    Sag,
    /// Adjust the smallest rate among non-zero gradients.
    Slr,
}

/// Resilient backpropagation without backtracking, plus the two globally
/// convergent variants that re-solve one rate per step so the weighted
/// gradient sum stays just above zero.
pub struct RpropMinus {
    limit: LearningRateLimit,
    factor: LearningRateFactor,
    variant: RpropVariant,
    learning_rates: Vec<f64>,
    gradients_old: Vec<f64>,
}

impl RpropMinus {
    pub fn new(
        len: usize,
        limit: LearningRateLimit,
        factor: LearningRateFactor,
        variant: RpropVariant,
    ) -> Self {
        RpropMinus {
            limit,
            factor,
            variant,
            learning_rates: initial_rates(len, limit),
            gradients_old: vec![0.0; len],
        }
    }

    /// Index whose rate gets re-solved, first minimum on ties.
    fn pick(&self, grad: &[f64]) -> Option<usize> {
        let key = |i: usize| match self.variant {
            RpropVariant::Sag => grad[i].abs(),
            _ => self.learning_rates[i],
        };
        let mut best: Option<usize> = None;
        for i in (0..grad.len()).filter(|&i| grad[i] != 0.0) {
            match best {
                Some(b) if key(b) <= key(i) => {}
                _ => best = Some(i),
            }
        }
        best
    }

    fn rebalance(&mut self, grad: &[f64]) {
        let Some(m) = self.pick(grad) else {
            return;
        };
        let sum: f64 = grad
            .iter()
            .zip(&self.learning_rates)
            .enumerate()
            .filter(|&(j, (&g, _))| j != m && g != 0.0)
            .map(|(_, (&g, &lr))| lr * g)
            .sum::<f64>()
            + SUM_OFFSET;
        self.learning_rates[m] = (-sum / grad[m]).max(self.limit.min).min(self.limit.max);
    }
}

impl UpdateRule for RpropMinus {
    fn update_params(&mut self, params: &mut [f64], grad: &[f64]) {
        let LearningRateLimit { min, max } = self.limit;
        let LearningRateFactor { minus, plus } = self.factor;

        for ((&g, lr), old) in grad
            .iter()
            .zip(self.learning_rates.iter_mut())
            .zip(self.gradients_old.iter())
        {
            let t = *old * sign(g);
            if t > 0.0 {
                *lr = (*lr * plus).min(max);
            } else if t < 0.0 {
                *lr = (*lr * minus).max(min);
            }
        }

        if self.variant != RpropVariant::Plain {
            self.rebalance(grad);
        }

        for ((w, &g), (lr, old)) in params
            .iter_mut()
            .zip(grad)
            .zip(self.learning_rates.iter().zip(self.gradients_old.iter_mut()))
        {
            *w -= sign(g) * *lr;
            *old = g;
        }
    }

    fn learning_rates(&self) -> &[f64] {
        &self.learning_rates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limit(min: f64, max: f64) -> LearningRateLimit {
        LearningRateLimit { min, max }
    }

    #[test]
    fn rprop_plus_backtracks_on_a_sign_change() {
        let mut rule = RpropPlus::new(1, limit(1e-10, 0.0625), LearningRateFactor::default());
        let mut w = [0.25];

        rule.update_params(&mut w, &[1.0]);
        assert_eq!(w, [0.1875]);
        rule.update_params(&mut w, &[2.0]);
        assert_eq!(w, [0.125]);
        assert_eq!(rule.learning_rates(), &[0.0625]);

        // sign flips: undo the last step, halve the rate, skip moving forward
        rule.update_params(&mut w, &[-1.0]);
        assert_eq!(w, [0.1875]);
        assert_eq!(rule.learning_rates(), &[0.03125]);

        rule.update_params(&mut w, &[-1.0]);
        assert_eq!(w, [0.21875]);
        assert_eq!(rule.learning_rates(), &[0.03125]);
    }

    #[test]
    fn zero_gradient_leaves_the_weight_alone() {
        let mut rule = RpropPlus::new(1, LearningRateLimit::default(), LearningRateFactor::default());
        let mut w = [0.5];
        rule.update_params(&mut w, &[0.0]);
        assert_eq!(w, [0.5]);
    }

    #[test]
    fn initial_rate_is_clamped_into_the_limit() {
        let rule = RpropPlus::new(2, limit(0.2, 0.5), LearningRateFactor::default());
        assert_eq!(rule.learning_rates(), &[0.2, 0.2]);
    }

    #[test]
    fn rprop_minus_adapts_without_backtracking() {
        let mut rule = RpropMinus::new(
            1,
            limit(1e-10, 1.0),
            LearningRateFactor { minus: 0.5, plus: 2.0 },
            RpropVariant::Plain,
        );
        let mut w = [0.0];
        rule.update_params(&mut w, &[1.0]);
        assert_eq!(w, [-0.1]);
        rule.update_params(&mut w, &[1.0]);
        assert!((w[0] + 0.3).abs() < 1e-12);
        rule.update_params(&mut w, &[-1.0]);
        assert!((w[0] + 0.2).abs() < 1e-12);
        assert!((rule.learning_rates()[0] - 0.1).abs() < 1e-12);
    }

    #[test]
    fn sag_resolves_the_smallest_gradient() {
        let mut rule = RpropMinus::new(
            3,
            limit(1e-10, 1.0),
            LearningRateFactor::default(),
            RpropVariant::Sag,
        );
        let mut w = [0.0; 3];
        rule.update_params(&mut w, &[-2.0, 0.5, 0.0]);

        let expected = (0.2 - SUM_OFFSET) / 0.5;
        let lr = rule.learning_rates();
        assert!((lr[1] - expected).abs() < 1e-12);
        assert_eq!(lr[0], 0.1);
        assert_eq!(lr[2], 0.1);
        assert_eq!(w[2], 0.0);
    }

    #[test]
    fn slr_resolves_the_first_smallest_rate() {
        let mut rule = RpropMinus::new(
            2,
            limit(1e-10, 1.0),
            LearningRateFactor::default(),
            RpropVariant::Slr,
        );
        let mut w = [0.0; 2];
        rule.update_params(&mut w, &[-2.0, 0.5]);

        let expected = (0.05 + SUM_OFFSET) / 2.0;
        assert!((rule.learning_rates()[0] - expected).abs() < 1e-12);
        assert_eq!(rule.learning_rates()[1], 0.1);
    }

    #[test]
    fn rates_stay_within_the_limit() {
        let bounds = limit(1e-4, 0.05);
        let factor = LearningRateFactor::default();
        let mut rules: Vec<Box<dyn UpdateRule>> = vec![
            Box::new(RpropPlus::new(4, bounds, factor)),
            Box::new(RpropMinus::new(4, bounds, factor, RpropVariant::Plain)),
            Box::new(RpropMinus::new(4, bounds, factor, RpropVariant::Sag)),
            Box::new(RpropMinus::new(4, bounds, factor, RpropVariant::Slr)),
        ];

        for rule in rules.iter_mut() {
            let mut w = [0.0; 4];
            for step in 0..200 {
                let grad: Vec<f64> = (0..4)
                    .map(|i| ((step * 7 + i * 3) as f64).sin() * 10f64.powi(i as i32 - 2))
                    .collect();
                rule.update_params(&mut w, &grad);
                for &lr in rule.learning_rates() {
                    assert!((bounds.min..=bounds.max).contains(&lr), "rate {lr} escaped");
                }
            }
        }
    }
}
