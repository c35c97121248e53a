//! Gene alignment: crossover and compatibility distance.
//!
//! Genes are aligned purely by innovation number. Genes present in both
//! genomes are *matching*; the rest are *disjoint* when they fall inside the
//! other genome's innovation range and *excess* when they lie beyond it.

use super::Genome;
use crate::config::NeatConfig;
use crate::innovation::Innovation;
use rand::Rng;
use std::cmp::Ordering;

impl Genome {
    /// Recombines two parents into a new genome.
    ///
    /// The child takes every neuron of `fitter`. For each gene of `fitter`,
    /// a matching gene in `less_fit` is inherited from either parent with
    /// equal probability; disjoint and excess genes come from `fitter`.
    /// Genes only `less_fit` carries are never inherited.
    pub fn crossover<R: Rng>(fitter: &Genome, less_fit: &Genome, rng: &mut R) -> Genome {
        let mut child = Genome::new();
        for neuron in &fitter.neurons {
            child.add_neuron(neuron.clone());
        }

        for (innovation, gene) in &fitter.connections {
            let inherited = match less_fit.connections.get(innovation) {
                Some(other) if rng.random_bool(0.5) => *other,
                _ => *gene,
            };
            if !child.add_connection_gene(inherited) && inherited != *gene {
                // Homologous genes share endpoints; this only triggers for
                // hand-built genomes that reuse innovation numbers.
                child.add_connection_gene(*gene);
            }
        }
        child
    }

    /// Compatibility distance `C1·E/N + C2·D/N + C3·W`.
    ///
    /// - `E`: excess genes, see [`excess_and_disjoint`](Self::excess_and_disjoint)
    /// - `D`: disjoint genes
    /// - `W`: mean absolute weight difference of matching genes (0 if none)
    /// - `N`: size of the larger gene set, at least 1
    ///
    /// # Examples
    ///
    /// ```
    /// use u_neuroevo::genome::Genome;
    /// use u_neuroevo::innovation::InnovationTracker;
    /// use u_neuroevo::NeatConfig;
    ///
    /// let tracker = InnovationTracker::new();
    /// let genome = Genome::fully_connected(3, 2, &tracker);
    /// assert_eq!(genome.compatibility_distance(&genome, &NeatConfig::default()), 0.0);
    /// ```
    pub fn compatibility_distance(&self, other: &Genome, config: &NeatConfig) -> f64 {
        let (excess, disjoint) = self.excess_and_disjoint(other);
        let weight = self.mean_weight_difference(other);
        let n = self.connections.len().max(other.connections.len()).max(1) as f64;

        config.excess_coefficient * excess as f64 / n
            + config.disjoint_coefficient * disjoint as f64 / n
            + config.weight_coefficient * weight
    }

    /// Whether `other` is within `compatibility_threshold` of `self`.
    pub fn is_compatible(&self, other: &Genome, config: &NeatConfig) -> bool {
        self.compatibility_distance(other, config) <= config.compatibility_threshold
    }

    /// Counts `(excess, disjoint)` genes between two genomes.
    ///
    /// Excess genes belong to the genome with the higher maximum innovation
    /// and lie above the other genome's maximum. Disjoint genes belong to the
    /// genome with the lower maximum, lie below the other's maximum, and have
    /// no match. Equal maxima give `(0, 0)`: there is no lower-max genome.
    pub fn excess_and_disjoint(&self, other: &Genome) -> (usize, usize) {
        let max_self = self.max_innovation();
        let max_other = other.max_innovation();

        match max_self.cmp(&max_other) {
            Ordering::Less => (
                other.count_above(max_self),
                self.count_unmatched_below(other, max_other),
            ),
            Ordering::Greater => (
                self.count_above(max_other),
                other.count_unmatched_below(self, max_self),
            ),
            Ordering::Equal => (0, 0),
        }
    }

    /// Mean absolute weight difference over matching genes, 0 if none match.
    pub fn mean_weight_difference(&self, other: &Genome) -> f64 {
        let (total, matching) = self
            .connections
            .iter()
            .filter_map(|(innovation, gene)| {
                other
                    .connections
                    .get(innovation)
                    .map(|o| (gene.weight - o.weight).abs())
            })
            .fold((0.0, 0usize), |(sum, count), diff| (sum + diff, count + 1));

        if matching == 0 {
            0.0
        } else {
            total / matching as f64
        }
    }

    /// Genes with an innovation number above `limit` (`None` is below everything).
    fn count_above(&self, limit: Option<Innovation>) -> usize {
        self.connections
            .keys()
            .filter(|&&innovation| Some(innovation) > limit)
            .count()
    }

    /// Genes below `limit` that `other` does not carry.
    fn count_unmatched_below(&self, other: &Genome, limit: Option<Innovation>) -> usize {
        self.connections
            .keys()
            .filter(|&&innovation| Some(innovation) < limit && !other.connections.contains_key(&innovation))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::{ConnectionGene, Neuron, NeuronType};
    use crate::innovation::{InnovationTracker, NeuronId};
    use crate::random::create_rng;
    use std::collections::BTreeSet;

    /// Genome over inputs {0, 1}, output 2 and hidden {3, 4} with the given
    /// `(innovation, source, destination, weight)` genes.
    fn genome_with(genes: &[(Innovation, NeuronId, NeuronId, f64)]) -> Genome {
        let mut genome = Genome::new();
        genome.add_neuron(Neuron::new(0, NeuronType::Input));
        genome.add_neuron(Neuron::new(1, NeuronType::Input));
        genome.add_neuron(Neuron::new(2, NeuronType::Output));
        genome.add_neuron(Neuron::new(3, NeuronType::Hidden));
        genome.add_neuron(Neuron::new(4, NeuronType::Hidden));
        for &(innovation, s, d, w) in genes {
            assert!(genome.add_connection_gene(ConnectionGene::new(s, d, w, true, innovation)));
        }
        genome
    }

    fn innovations(genome: &Genome) -> BTreeSet<Innovation> {
        genome.connections().map(|c| c.innovation).collect()
    }

    #[test]
    fn test_distance_weights_only() {
        let x = genome_with(&[(0, 0, 2, 1.0), (1, 1, 2, 1.0), (2, 0, 3, 1.0)]);
        let y = genome_with(&[(0, 0, 2, 1.0), (1, 1, 2, 1.0), (2, 0, 3, 3.0)]);
        let config = NeatConfig::default();

        assert_eq!(x.excess_and_disjoint(&y), (0, 0));
        assert!((x.mean_weight_difference(&y) - 2.0 / 3.0).abs() < 1e-12);

        let d = x.compatibility_distance(&y, &config);
        assert!((d - 0.4 * 2.0 / 3.0).abs() < 1e-12, "got {d}");
        assert!(x.is_compatible(&y, &config));
    }

    #[test]
    fn test_self_distance_is_zero() {
        let g = genome_with(&[(0, 0, 2, 0.3), (4, 1, 3, -1.1), (9, 3, 2, 0.8)]);
        assert_eq!(g.compatibility_distance(&g, &NeatConfig::default()), 0.0);
        assert_eq!(Genome::new().compatibility_distance(&Genome::new(), &NeatConfig::default()), 0.0);
    }

    #[test]
    fn test_excess_and_disjoint() {
        // a: {0, 1, 3}, b: {0, 2, 5, 6}
        let a = genome_with(&[(0, 0, 2, 1.0), (1, 1, 2, 1.0), (3, 0, 3, 1.0)]);
        let b = genome_with(&[(0, 0, 2, 1.0), (2, 1, 3, 1.0), (5, 3, 2, 1.0), (6, 0, 4, 1.0)]);

        // b has the higher max (6): 5 and 6 exceed a's max (3).
        // a's unmatched genes below 6: 1 and 3.
        assert_eq!(a.excess_and_disjoint(&b), (2, 2));
        assert_eq!(b.excess_and_disjoint(&a), (2, 2));

        let config = NeatConfig::default();
        let expected = 1.0 * 2.0 / 4.0 + 1.0 * 2.0 / 4.0 + 0.4 * 0.0;
        assert!((a.compatibility_distance(&b, &config) - expected).abs() < 1e-12);
        assert!((b.compatibility_distance(&a, &config) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_equal_max_has_no_disjoint_genes() {
        let a = genome_with(&[(0, 0, 2, 1.0), (2, 0, 3, 1.0)]);
        let b = genome_with(&[(1, 1, 2, 1.0), (2, 0, 3, 1.0)]);
        assert_eq!(a.excess_and_disjoint(&b), (0, 0));
        assert_eq!(b.excess_and_disjoint(&a), (0, 0));
        // Only gene 2 matches and its weights agree.
        assert_eq!(a.compatibility_distance(&b, &NeatConfig::default()), 0.0);
    }

    #[test]
    fn test_distance_against_empty() {
        let a = genome_with(&[(0, 0, 2, 1.0), (1, 1, 2, 1.0)]);
        let empty = genome_with(&[]);
        assert_eq!(a.excess_and_disjoint(&empty), (2, 0));
        assert_eq!(empty.excess_and_disjoint(&a), (2, 0));
        assert!((a.compatibility_distance(&empty, &NeatConfig::default()) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_incompatible_beyond_threshold() {
        let a = genome_with(&[(0, 0, 2, 1.0)]);
        let b = genome_with(&[(0, 0, 2, -1.0)]);
        let config = NeatConfig::default().with_compatibility_threshold(0.5);
        // W = 2, distance = 0.8
        assert!(!a.is_compatible(&b, &config));
        assert!(a.is_compatible(&b, &config.with_compatibility_threshold(0.8)));
    }

    #[test]
    fn test_crossover_provenance() {
        let fitter = genome_with(&[(0, 0, 2, 1.0), (1, 1, 2, 1.0), (3, 0, 3, 0.5), (4, 3, 2, 0.5)]);
        let less_fit = genome_with(&[(0, 0, 2, -1.0), (1, 1, 2, -1.0), (2, 1, 4, 0.2), (5, 4, 2, 0.2)]);
        let mut rng = create_rng(42);

        for _ in 0..50 {
            let child = Genome::crossover(&fitter, &less_fit, &mut rng);

            // Exactly the fitter parent's genes, whatever copy was taken.
            assert_eq!(innovations(&child), innovations(&fitter));
            for gene in child.connections() {
                let from_fitter = fitter.connection(gene.innovation).unwrap();
                let from_less = less_fit.connection(gene.innovation);
                assert!(gene == from_fitter || Some(gene) == from_less);
            }
            assert_eq!(child.neuron_count(), fitter.neuron_count());
            for neuron in fitter.neurons() {
                let inherited = child.neuron(neuron.id()).unwrap();
                assert_eq!(inherited.neuron_type(), neuron.neuron_type());
                assert_eq!(inherited.incoming(), neuron.incoming());
                assert_eq!(inherited.outgoing(), neuron.outgoing());
            }
            assert_eq!(child.fitness(), 0.0);
        }
    }

    #[test]
    fn test_crossover_mixes_matching_genes() {
        let fitter = genome_with(&[(0, 0, 2, 1.0), (1, 1, 2, 1.0)]);
        let less_fit = genome_with(&[(0, 0, 2, -1.0), (1, 1, 2, -1.0)]);
        let mut rng = create_rng(42);

        let mut saw_fitter = false;
        let mut saw_less = false;
        for _ in 0..100 {
            let child = Genome::crossover(&fitter, &less_fit, &mut rng);
            for gene in child.connections() {
                if gene.weight > 0.0 {
                    saw_fitter = true;
                } else {
                    saw_less = true;
                }
            }
        }
        assert!(saw_fitter && saw_less);
    }

    #[test]
    fn test_crossover_of_diverged_lineages() {
        let tracker = InnovationTracker::new();
        let seed = Genome::fully_connected(2, 1, &tracker);
        let config = NeatConfig::default().with_add_connection_rate(0.5).with_add_neuron_rate(0.5);
        let mut rng = create_rng(5);

        let mut a = seed.copy();
        let mut b = seed.copy();
        for _ in 0..20 {
            a.mutate(&config, &tracker, &mut rng);
            b.mutate(&config, &tracker, &mut rng);
        }

        let child = Genome::crossover(&a, &b, &mut rng);
        let only_b: BTreeSet<Innovation> = innovations(&b).difference(&innovations(&a)).copied().collect();

        assert!(child.connections().all(|c| !only_b.contains(&c.innovation)));
        assert_eq!(child.connection_count(), a.connection_count());
        assert!(child.query(&[0.5, 0.5]).is_ok());
    }
}
