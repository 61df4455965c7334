//! Perplexity-based convergence detection
//!
//! Instead of an L1 residual, the stopping rule tracks the perplexity of
//! the rank distribution, `2^H(PR)`. A uniform distribution over N pages
//! has perplexity N, so the value reads as the effective number of pages
//! still carrying mass. The run is declared stable once the perplexity has
//! moved by less than a threshold for several consecutive iterations.

/// Default absolute perplexity change considered "small"
pub const DEFAULT_PERPLEXITY_THRESHOLD: f64 = 1.0;

/// Default number of consecutive small changes required
pub const DEFAULT_CONSECUTIVE_ROUNDS: usize = 4;

/// Perplexity of a probability distribution, `2^(-Σ p·log2 p)`
///
/// Zero entries contribute nothing to the entropy.
pub fn perplexity(distribution: &[f64]) -> f64 {
    let entropy: f64 = distribution
        .iter()
        .filter(|&&p| p > 0.0)
        .map(|&p| -p * p.log2())
        .sum();
    entropy.exp2()
}

/// Outcome of observing one iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Continue,
    Converged,
}

impl Verdict {
    pub fn is_converged(self) -> bool {
        matches!(self, Verdict::Converged)
    }
}

/// Tracks perplexity across iterations and applies the hysteresis rule
///
/// A monitor is created per ranking run. The first observation primes it
/// and never converges; every later observation compares against the
/// previous value.
#[derive(Debug, Clone)]
pub struct PerplexityMonitor {
    threshold: f64,
    rounds: usize,
    /// Consecutive small-delta observations so far
    streak: usize,
    trace: Vec<f64>,
}

impl Default for PerplexityMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_PERPLEXITY_THRESHOLD, DEFAULT_CONSECUTIVE_ROUNDS)
    }
}

impl PerplexityMonitor {
    /// Create a monitor with the given threshold and required streak length
    pub fn new(threshold: f64, rounds: usize) -> Self {
        Self {
            threshold,
            rounds,
            streak: 0,
            trace: Vec::new(),
        }
    }

    /// Observe a rank vector
    pub fn observe(&mut self, ranks: &[f64]) -> Verdict {
        self.observe_perplexity(perplexity(ranks))
    }

    /// Observe an already computed perplexity value
    pub fn observe_perplexity(&mut self, current: f64) -> Verdict {
        let verdict = match self.trace.last() {
            None => Verdict::Continue,
            Some(&previous) if (current - previous).abs() < self.threshold => {
                self.streak += 1;
                if self.streak >= self.rounds {
                    Verdict::Converged
                } else {
                    Verdict::Continue
                }
            }
            Some(_) => {
                self.streak = 0;
                Verdict::Continue
            }
        };

        self.trace.push(current);
        verdict
    }

    /// Change between the last two observations, if there are two
    pub fn last_delta(&self) -> Option<f64> {
        match self.trace.as_slice() {
            [.., prev, last] => Some((last - prev).abs()),
            _ => None,
        }
    }

    /// Perplexity history, one entry per observation
    pub fn trace(&self) -> &[f64] {
        &self.trace
    }

    pub fn into_trace(self) -> Vec<f64> {
        self.trace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a perplexity sequence starting at `start` with the given deltas
    fn sequence(start: f64, deltas: &[f64]) -> Vec<f64> {
        let mut values = vec![start];
        for d in deltas {
            let next = values.last().unwrap() + d;
            values.push(next);
        }
        values
    }

    #[test]
    fn test_uniform_perplexity_equals_page_count() {
        let uniform = vec![1.0 / 3.0; 3];
        assert!((perplexity(&uniform) - 3.0).abs() < 1e-9);

        let uniform = vec![0.01; 100];
        assert!((perplexity(&uniform) - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_point_mass_perplexity_is_one() {
        assert!((perplexity(&[1.0, 0.0, 0.0]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_needs_consecutive_small_deltas() {
        let values = sequence(50.0, &[0.5, 0.5, 0.5, 2.0, 0.5, 0.5, 0.5, 0.5]);
        let mut monitor = PerplexityMonitor::default();

        let verdicts: Vec<_> = values
            .iter()
            .map(|&v| monitor.observe_perplexity(v))
            .collect();

        let last = verdicts.len() - 1;
        for verdict in &verdicts[..last] {
            assert_eq!(*verdict, Verdict::Continue);
        }
        assert_eq!(verdicts[last], Verdict::Converged);
    }

    #[test]
    fn test_first_observation_never_converges() {
        let mut monitor = PerplexityMonitor::new(1.0, 1);
        assert_eq!(monitor.observe_perplexity(3.0), Verdict::Continue);
        assert_eq!(monitor.observe_perplexity(3.0), Verdict::Converged);
    }

    #[test]
    fn test_delta_at_threshold_resets() {
        let mut monitor = PerplexityMonitor::new(1.0, 2);
        monitor.observe_perplexity(10.0);
        assert_eq!(monitor.observe_perplexity(10.5), Verdict::Continue);
        // exactly 1.0 is not small
        assert_eq!(monitor.observe_perplexity(11.5), Verdict::Continue);
        assert_eq!(monitor.observe_perplexity(11.6), Verdict::Continue);
        assert_eq!(monitor.observe_perplexity(11.7), Verdict::Converged);
    }

    #[test]
    fn test_trace_records_every_observation() {
        let mut monitor = PerplexityMonitor::default();
        monitor.observe(&[0.5, 0.5]);
        monitor.observe(&[0.25, 0.75]);

        assert_eq!(monitor.trace().len(), 2);
        assert!((monitor.trace()[0] - 2.0).abs() < 1e-12);
        assert!(monitor.last_delta().unwrap() > 0.0);
    }
}
