//! Neuron and connection gene definitions.

use crate::innovation::{Innovation, NeuronId};

/// Role of a neuron in the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NeuronType {
    /// Receives one external input value per query. Never activated.
    Input,
    /// Created by node-insertion mutations.
    Hidden,
    /// Produces one external output value per query.
    Output,
}

/// A node of the network graph.
///
/// Identity (`id`, `neuron_type`) is immutable. The adjacency lists hold the
/// innovation numbers of the connection genes that touch this neuron, in the
/// order they were added to the genome. They include disabled genes.
#[derive(Debug, Clone, PartialEq)]
pub struct Neuron {
    id: NeuronId,
    neuron_type: NeuronType,
    pub(crate) incoming: Vec<Innovation>,
    pub(crate) outgoing: Vec<Innovation>,
}

impl Neuron {
    /// Creates an unconnected neuron.
    pub fn new(id: NeuronId, neuron_type: NeuronType) -> Self {
        Self {
            id,
            neuron_type,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        }
    }

    /// The neuron's id.
    pub fn id(&self) -> NeuronId {
        self.id
    }

    /// The neuron's role.
    pub fn neuron_type(&self) -> NeuronType {
        self.neuron_type
    }

    /// Innovation numbers of connection genes ending at this neuron.
    pub fn incoming(&self) -> &[Innovation] {
        &self.incoming
    }

    /// Innovation numbers of connection genes starting at this neuron.
    pub fn outgoing(&self) -> &[Innovation] {
        &self.outgoing
    }

    /// Identity only, with empty adjacency.
    pub(crate) fn detached(&self) -> Self {
        Self::new(self.id, self.neuron_type)
    }
}

/// A directed, weighted edge between two neurons.
///
/// The innovation number is the gene's identity for alignment: two genes
/// with the same number are homologous even when their weights or enabled
/// flags differ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionGene {
    /// Id of the neuron the edge starts at.
    pub source: NeuronId,
    /// Id of the neuron the edge ends at.
    pub destination: NeuronId,
    /// Multiplier applied to the source's output.
    pub weight: f64,
    /// Disabled genes do not carry signal but stay in the genome for alignment.
    pub enabled: bool,
    /// Historical marker, assigned once at creation.
    pub innovation: Innovation,
}

impl ConnectionGene {
    /// Creates a gene.
    pub fn new(
        source: NeuronId,
        destination: NeuronId,
        weight: f64,
        enabled: bool,
        innovation: Innovation,
    ) -> Self {
        Self {
            source,
            destination,
            weight,
            enabled,
            innovation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detached_drops_adjacency() {
        let mut n = Neuron::new(4, NeuronType::Hidden);
        n.incoming.push(1);
        n.outgoing.push(2);

        let d = n.detached();
        assert_eq!(d.id(), 4);
        assert_eq!(d.neuron_type(), NeuronType::Hidden);
        assert!(d.incoming().is_empty());
        assert!(d.outgoing().is_empty());
    }
}
