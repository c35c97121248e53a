//! Genome: a network topology plus weighted connection genes.
//!
//! A [`Genome`] owns its neurons in an arena (`Vec<Neuron>` in insertion
//! order, plus an id → index map) and its connection genes keyed by
//! innovation number. Structural operations keep three invariants:
//!
//! - the connection graph is acyclic (checked over *all* genes, so flipping
//!   an `enabled` flag can never introduce a cycle);
//! - no gene connects a neuron to itself;
//! - innovation numbers are unique within the genome.
//!
//! # Submodules
//!
//! - [`types`]: [`Neuron`], [`NeuronType`] and [`ConnectionGene`]
//! - `evaluate`: feed-forward [`query`](Genome::query)
//! - `mutation`: weight and structural mutation operators
//! - `crossover`: gene alignment, crossover and compatibility distance

mod crossover;
mod evaluate;
mod mutation;
pub mod types;

pub use evaluate::activation;
pub use types::{ConnectionGene, Neuron, NeuronType};

use crate::innovation::{Innovation, InnovationTracker, NeuronId};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// An individual's encoded network.
#[derive(Debug, Clone, Default)]
pub struct Genome {
    neurons: Vec<Neuron>,
    index: HashMap<NeuronId, usize>,
    inputs: Vec<usize>,
    outputs: Vec<usize>,
    connections: BTreeMap<Innovation, ConnectionGene>,
    fitness: f64,
}

impl Genome {
    /// Creates an empty genome.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an unconnected genome with `inputs` input neurons followed by
    /// `outputs` output neurons, all with fresh ids from `tracker`.
    pub fn with_io(inputs: usize, outputs: usize, tracker: &InnovationTracker) -> Self {
        let mut genome = Self::new();
        for _ in 0..inputs {
            genome.add_neuron(Neuron::new(tracker.next_neuron_id(), NeuronType::Input));
        }
        for _ in 0..outputs {
            genome.add_neuron(Neuron::new(tracker.next_neuron_id(), NeuronType::Output));
        }
        genome
    }

    /// Creates a genome with every input connected to every output, weight 1.0.
    pub fn fully_connected(inputs: usize, outputs: usize, tracker: &InnovationTracker) -> Self {
        let mut genome = Self::with_io(inputs, outputs, tracker);
        genome.connect_inputs_to_outputs(tracker);
        genome
    }

    /// Connects every input neuron to every output neuron with weight 1.0.
    ///
    /// Pairs that are already connected are left alone.
    pub fn connect_inputs_to_outputs(&mut self, tracker: &InnovationTracker) {
        let inputs: Vec<NeuronId> = self.input_ids().collect();
        let outputs: Vec<NeuronId> = self.output_ids().collect();
        for &source in &inputs {
            for &destination in &outputs {
                if self.has_edge_between(source, destination) {
                    continue;
                }
                let gene = ConnectionGene::new(source, destination, 1.0, true, tracker.next_innovation());
                self.add_connection_gene(gene);
            }
        }
    }

    /// Registers a neuron. Input and output neurons are appended to the
    /// ordered input/output lists.
    ///
    /// Any adjacency carried by `neuron` is dropped; connections are
    /// registered through [`add_connection_gene`](Self::add_connection_gene).
    /// Returns `false` (and does nothing) if the id is already present.
    pub fn add_neuron(&mut self, neuron: Neuron) -> bool {
        if self.index.contains_key(&neuron.id()) {
            return false;
        }
        let idx = self.neurons.len();
        match neuron.neuron_type() {
            NeuronType::Input => self.inputs.push(idx),
            NeuronType::Output => self.outputs.push(idx),
            NeuronType::Hidden => {}
        }
        self.index.insert(neuron.id(), idx);
        self.neurons.push(neuron.detached());
        true
    }

    /// Adds a connection gene.
    ///
    /// Returns `false` and leaves the genome unchanged if the gene's
    /// innovation number is already present or if
    /// [`can_connect`](Self::can_connect) rejects its endpoints.
    pub fn add_connection_gene(&mut self, gene: ConnectionGene) -> bool {
        if self.connections.contains_key(&gene.innovation)
            || !self.can_connect(gene.source, gene.destination)
        {
            return false;
        }
        let source = self.index[&gene.source];
        let destination = self.index[&gene.destination];
        self.neurons[source].outgoing.push(gene.innovation);
        self.neurons[destination].incoming.push(gene.innovation);
        self.connections.insert(gene.innovation, gene);
        true
    }

    /// Whether an edge `source → destination` may be added.
    ///
    /// Rejects self-loops, unknown endpoints, edges into input neurons,
    /// edges out of output neurons, and edges that would close a cycle.
    pub fn can_connect(&self, source: NeuronId, destination: NeuronId) -> bool {
        if source == destination {
            return false;
        }
        let (Some(&s), Some(&d)) = (self.index.get(&source), self.index.get(&destination)) else {
            return false;
        };
        if self.neurons[d].neuron_type() == NeuronType::Input
            || self.neurons[s].neuron_type() == NeuronType::Output
        {
            return false;
        }
        !self.reaches_upstream(s, d)
    }

    /// Walks incoming edges backwards from `from` and reports whether
    /// `target` is upstream of it.
    fn reaches_upstream(&self, from: usize, target: usize) -> bool {
        let mut visited = vec![false; self.neurons.len()];
        let mut stack = vec![from];
        visited[from] = true;

        while let Some(idx) = stack.pop() {
            for innovation in &self.neurons[idx].incoming {
                let upstream = self.index[&self.connections[innovation].source];
                if upstream == target {
                    return true;
                }
                if !visited[upstream] && self.neurons[upstream].neuron_type() != NeuronType::Input {
                    visited[upstream] = true;
                    stack.push(upstream);
                }
            }
        }
        false
    }

    /// Whether any gene (enabled or not) connects `a` and `b` in either direction.
    pub fn has_edge_between(&self, a: NeuronId, b: NeuronId) -> bool {
        let touches = |from: NeuronId, to: NeuronId| {
            self.index.get(&from).is_some_and(|&idx| {
                self.neurons[idx]
                    .outgoing
                    .iter()
                    .any(|innovation| self.connections[innovation].destination == to)
            })
        };
        touches(a, b) || touches(b, a)
    }

    /// Deep copy with fitness reset to zero.
    ///
    /// Ids, innovation numbers, weights and enabled flags are preserved; the
    /// copy shares no state with `self`.
    pub fn copy(&self) -> Genome {
        Genome {
            fitness: 0.0,
            ..self.clone()
        }
    }

    /// Neurons in insertion order.
    pub fn neurons(&self) -> impl Iterator<Item = &Neuron> {
        self.neurons.iter()
    }

    /// Looks up a neuron by id.
    pub fn neuron(&self, id: NeuronId) -> Option<&Neuron> {
        self.index.get(&id).map(|&idx| &self.neurons[idx])
    }

    /// Connection genes in ascending innovation order.
    pub fn connections(&self) -> impl Iterator<Item = &ConnectionGene> {
        self.connections.values()
    }

    /// Looks up a connection gene by innovation number.
    pub fn connection(&self, innovation: Innovation) -> Option<&ConnectionGene> {
        self.connections.get(&innovation)
    }

    /// Input neuron ids in input order.
    pub fn input_ids(&self) -> impl Iterator<Item = NeuronId> + '_ {
        self.inputs.iter().map(|&idx| self.neurons[idx].id())
    }

    /// Output neuron ids in output order.
    pub fn output_ids(&self) -> impl Iterator<Item = NeuronId> + '_ {
        self.outputs.iter().map(|&idx| self.neurons[idx].id())
    }

    /// Number of input neurons.
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Number of output neurons.
    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Number of neurons of every type.
    pub fn neuron_count(&self) -> usize {
        self.neurons.len()
    }

    /// Number of connection genes, enabled or not.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Number of enabled connection genes.
    pub fn enabled_connection_count(&self) -> usize {
        self.connections.values().filter(|gene| gene.enabled).count()
    }

    /// Highest innovation number present, `None` for a genome without genes.
    pub fn max_innovation(&self) -> Option<Innovation> {
        self.connections.keys().next_back().copied()
    }

    /// Highest neuron id present.
    pub fn max_neuron_id(&self) -> Option<NeuronId> {
        self.index.keys().max().copied()
    }

    /// Fitness assigned by the last evaluation.
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Sets the fitness.
    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Genome{{neurons={}, connections={}, fitness={}}}",
            self.neurons.len(),
            self.connections.len(),
            self.fitness
        )
    }
}
