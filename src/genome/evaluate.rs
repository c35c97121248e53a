//! Feed-forward evaluation.

use super::{Genome, NeuronType};
use crate::error::NeatError;

/// Activation applied by hidden and output neurons: `x / (1 + |x|)`.
///
/// Odd, monotonic and bounded in `(-1, 1)`.
pub fn activation(x: f64) -> f64 {
    x / (1.0 + x.abs())
}

/// Per-neuron scratch for a single query.
#[derive(Debug, Clone, Copy, Default)]
struct NeuronState {
    sum: f64,
    received: usize,
    fired: bool,
}

impl Genome {
    /// Evaluates the network for one input vector.
    ///
    /// Input neurons pass their value through unchanged. A hidden neuron
    /// fires once it has received a value over every enabled incoming edge;
    /// hidden neurons are rescanned until all have fired, which walks the
    /// graph in topological order without computing one. Outputs are the
    /// activation of each output neuron's accumulated sum, in output order.
    ///
    /// All transient state lives in a scratch buffer owned by this call, so
    /// repeated queries with the same input return the same output.
    ///
    /// # Errors
    ///
    /// [`NeatError::InputSize`] if `inputs.len()` differs from the number of
    /// input neurons.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_neuroevo::genome::Genome;
    /// use u_neuroevo::innovation::InnovationTracker;
    ///
    /// let tracker = InnovationTracker::new();
    /// let genome = Genome::fully_connected(2, 1, &tracker);
    /// let out = genome.query(&[1.0, 1.0]).unwrap();
    /// assert!((out[0] - 2.0 / 3.0).abs() < 1e-12);
    /// ```
    pub fn query(&self, inputs: &[f64]) -> Result<Vec<f64>, NeatError> {
        if inputs.len() != self.inputs.len() {
            return Err(NeatError::InputSize {
                expected: self.inputs.len(),
                actual: inputs.len(),
            });
        }

        let mut state = vec![NeuronState::default(); self.neurons.len()];
        let mut enabled_in_degree = vec![0usize; self.neurons.len()];
        for gene in self.connections.values().filter(|gene| gene.enabled) {
            enabled_in_degree[self.index[&gene.destination]] += 1;
        }

        for (&idx, &value) in self.inputs.iter().zip(inputs) {
            self.fire(idx, value, &mut state);
        }

        let hidden: Vec<usize> = (0..self.neurons.len())
            .filter(|&idx| self.neurons[idx].neuron_type() == NeuronType::Hidden)
            .collect();
        let mut pending = hidden.len();

        while pending > 0 {
            let mut fired = 0;
            for &idx in &hidden {
                let s = state[idx];
                if !s.fired && s.received == enabled_in_degree[idx] {
                    self.fire(idx, activation(s.sum), &mut state);
                    fired += 1;
                }
            }
            // Acyclicity guarantees progress; an empty scan means nothing else can fire.
            debug_assert!(fired > 0, "hidden neurons stalled during evaluation");
            if fired == 0 {
                break;
            }
            pending -= fired;
        }

        Ok(self
            .outputs
            .iter()
            .map(|&idx| activation(state[idx].sum))
            .collect())
    }

    /// Sends `value` along every enabled outgoing edge of `idx`.
    fn fire(&self, idx: usize, value: f64, state: &mut [NeuronState]) {
        for innovation in &self.neurons[idx].outgoing {
            let gene = &self.connections[innovation];
            if gene.enabled {
                let target = &mut state[self.index[&gene.destination]];
                target.sum += value * gene.weight;
                target.received += 1;
            }
        }
        state[idx] = NeuronState {
            sum: 0.0,
            received: 0,
            fired: true,
        };
    }
}
