//! Weight and structural mutation operators.

use super::{ConnectionGene, Genome, Neuron, NeuronType};
use crate::config::NeatConfig;
use crate::innovation::{Innovation, InnovationTracker, NeuronId};
use rand::Rng;

impl Genome {
    /// Applies the three gated mutation steps, in order:
    ///
    /// 1. weight mutation with probability `weight_mutation_rate`
    /// 2. add-connection mutation with probability `add_connection_rate`
    /// 3. add-neuron mutation with probability `add_neuron_rate`
    pub fn mutate<R: Rng>(&mut self, config: &NeatConfig, tracker: &InnovationTracker, rng: &mut R) {
        if rng.random_range(0.0..1.0) < config.weight_mutation_rate {
            self.mutate_weights(config, rng);
        }
        if rng.random_range(0.0..1.0) < config.add_connection_rate {
            self.add_connection_mutation(config, tracker, rng);
        }
        if rng.random_range(0.0..1.0) < config.add_neuron_rate {
            self.add_neuron_mutation(tracker, rng);
        }
    }

    /// Perturbs every connection weight.
    ///
    /// Each connection is independently scaled by a factor drawn from
    /// `[-weight_range, weight_range]` with probability `weight_perturb_rate`,
    /// and otherwise replaced by a fresh weight from the same range.
    pub fn mutate_weights<R: Rng>(&mut self, config: &NeatConfig, rng: &mut R) {
        let range = config.weight_range;
        for gene in self.connections.values_mut() {
            if rng.random_range(0.0..1.0) < config.weight_perturb_rate {
                gene.weight *= rng.random_range(-range..=range);
            } else {
                gene.weight = rng.random_range(-range..=range);
            }
        }
    }

    /// Replaces every connection weight with a fresh draw from
    /// `[-weight_range, weight_range]`.
    pub fn randomize_weights<R: Rng>(&mut self, weight_range: f64, rng: &mut R) {
        for gene in self.connections.values_mut() {
            gene.weight = rng.random_range(-weight_range..=weight_range);
        }
    }

    /// Tries to connect two previously unconnected neurons.
    ///
    /// Samples up to `max_add_connection_attempts` ordered neuron pairs. A pair
    /// is skipped when the neurons are already connected in either direction,
    /// when both are inputs or both are outputs, or when the edge would be
    /// rejected by [`can_connect`](Genome::can_connect). The edge direction
    /// follows neuron types (input → hidden/output, hidden → output) and the
    /// sampled order only decides between two hidden neurons.
    ///
    /// Returns `true` if a connection was added. Running out of attempts is
    /// not an error.
    pub fn add_connection_mutation<R: Rng>(
        &mut self,
        config: &NeatConfig,
        tracker: &InnovationTracker,
        rng: &mut R,
    ) -> bool {
        if self.neurons.len() < 2 {
            return false;
        }

        let candidates: Vec<(NeuronId, NeuronType)> = self
            .neurons
            .iter()
            .map(|n| (n.id(), n.neuron_type()))
            .collect();

        for _ in 0..config.max_add_connection_attempts {
            let a = candidates[rng.random_range(0..candidates.len())];
            let b = candidates[rng.random_range(0..candidates.len())];

            if a.0 == b.0 || self.has_edge_between(a.0, b.0) {
                continue;
            }
            if a.1 != NeuronType::Hidden && a.1 == b.1 {
                continue;
            }

            let (source, destination) = orient(a, b);
            if !self.can_connect(source, destination) {
                continue;
            }

            let weight = rng.random_range(-config.weight_range..=config.weight_range);
            let gene = ConnectionGene::new(source, destination, weight, true, tracker.next_innovation());
            let added = self.add_connection_gene(gene);
            debug_assert!(added, "validated connection was rejected");
            log::trace!(
                "added connection {} -> {} (innovation {})",
                source,
                destination,
                gene.innovation
            );
            return true;
        }
        false
    }

    /// Splits a random enabled connection with a new hidden neuron.
    ///
    /// The split connection is disabled (never removed). Two enabled
    /// connections replace it: `source → new` with weight 1.0 and
    /// `new → destination` with the split connection's weight, so the
    /// network's behaviour is initially close to unchanged.
    ///
    /// Returns the new neuron's id, or `None` when there is no enabled
    /// connection to split.
    pub fn add_neuron_mutation<R: Rng>(
        &mut self,
        tracker: &InnovationTracker,
        rng: &mut R,
    ) -> Option<NeuronId> {
        let enabled: Vec<Innovation> = self
            .connections
            .values()
            .filter(|gene| gene.enabled)
            .map(|gene| gene.innovation)
            .collect();
        if enabled.is_empty() {
            return None;
        }

        let innovation = enabled[rng.random_range(0..enabled.len())];
        let split = {
            let gene = self.connections.get_mut(&innovation)?;
            gene.enabled = false;
            *gene
        };

        let id = tracker.next_neuron_id();
        self.add_neuron(Neuron::new(id, NeuronType::Hidden));

        let head = ConnectionGene::new(split.source, id, 1.0, true, tracker.next_innovation());
        let tail = ConnectionGene::new(id, split.destination, split.weight, true, tracker.next_innovation());
        let added = self.add_connection_gene(head) && self.add_connection_gene(tail);
        debug_assert!(added, "split connections were rejected");

        log::trace!("split connection {} with neuron {}", innovation, id);
        Some(id)
    }
}

/// Orders a sampled pair so that signal flows from inputs towards outputs.
fn orient(a: (NeuronId, NeuronType), b: (NeuronId, NeuronType)) -> (NeuronId, NeuronId) {
    use NeuronType::{Hidden, Input, Output};
    match (a.1, b.1) {
        (Hidden, Input) | (Output, Hidden) | (Output, Input) => (b.0, a.0),
        _ => (a.0, b.0),
    }
}
