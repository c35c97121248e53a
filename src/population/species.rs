//! Species: clusters of mutually compatible genomes.

use crate::config::NeatConfig;
use crate::genome::Genome;

/// A cluster of genomes from one generation.
///
/// Members are indices into the population's genome list. The species is
/// rebuilt from scratch every generation, so indices never go stale.
#[derive(Debug, Clone, PartialEq)]
pub struct Species {
    representative: usize,
    members: Vec<usize>,
    adjusted_fitness_sum: f64,
}

impl Species {
    /// Founds a species whose representative (and first member) is `founder`.
    pub fn new(founder: usize) -> Self {
        Self {
            representative: founder,
            members: vec![founder],
            adjusted_fitness_sum: 0.0,
        }
    }

    /// Index of the genome new members are compared against.
    pub fn representative(&self) -> usize {
        self.representative
    }

    /// Member indices, founder first.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the species has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub(crate) fn add_member(&mut self, idx: usize) {
        self.members.push(idx);
    }

    /// Shared fitness computed by the last
    /// [`calculate_adjusted_fitness`](Self::calculate_adjusted_fitness).
    pub fn adjusted_fitness_sum(&self) -> f64 {
        self.adjusted_fitness_sum
    }

    /// Computes and stores `Σ(member fitness) / member_count`.
    pub fn calculate_adjusted_fitness(&mut self, genomes: &[Genome]) -> f64 {
        let sum: f64 = self.members.iter().map(|&idx| genomes[idx].fitness()).sum();
        self.adjusted_fitness_sum = if self.members.is_empty() {
            0.0
        } else {
            sum / self.members.len() as f64
        };
        self.adjusted_fitness_sum
    }

    /// Member with the highest raw fitness; the earliest member wins ties.
    pub fn best_member(&self, genomes: &[Genome]) -> usize {
        let mut best = self.representative;
        for &idx in &self.members {
            if genomes[idx].fitness() > genomes[best].fitness() {
                best = idx;
            }
        }
        best
    }
}

/// Partitions `genomes` into species by greedy first fit.
///
/// Genomes are visited in order; each joins the first species whose
/// representative it is compatible with, or founds a new one.
pub fn speciate(genomes: &[Genome], config: &NeatConfig) -> Vec<Species> {
    let mut species: Vec<Species> = Vec::new();
    for (idx, genome) in genomes.iter().enumerate() {
        match species
            .iter_mut()
            .find(|s| genomes[s.representative].is_compatible(genome, config))
        {
            Some(s) => s.add_member(idx),
            None => species.push(Species::new(idx)),
        }
    }
    species
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::{ConnectionGene, Neuron, NeuronType};
    use crate::innovation::InnovationTracker;

    fn with_fitness(fitness: &[f64]) -> Vec<Genome> {
        fitness
            .iter()
            .map(|&f| {
                let mut g = Genome::new();
                g.set_fitness(f);
                g
            })
            .collect()
    }

    #[test]
    fn test_adjusted_fitness() {
        let genomes = with_fitness(&[2.0, 4.0, 9.0]);
        let mut s = Species::new(0);
        s.add_member(1);
        assert!((s.calculate_adjusted_fitness(&genomes) - 3.0).abs() < 1e-12);
        assert!((s.adjusted_fitness_sum() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_best_member_first_on_ties() {
        let genomes = with_fitness(&[1.0, 5.0, 5.0, 0.5]);
        let mut s = Species::new(0);
        for idx in 1..4 {
            s.add_member(idx);
        }
        assert_eq!(s.best_member(&genomes), 1);
    }

    #[test]
    fn test_identical_genomes_share_a_species() {
        let tracker = InnovationTracker::new();
        let seed = Genome::fully_connected(2, 1, &tracker);
        let genomes: Vec<Genome> = (0..5).map(|_| seed.copy()).collect();

        let species = speciate(&genomes, &NeatConfig::default());
        assert_eq!(species.len(), 1);
        assert_eq!(species[0].members(), &[0, 1, 2, 3, 4]);
        assert_eq!(species[0].representative(), 0);
    }

    #[test]
    fn test_incompatible_genomes_split() {
        let tracker = InnovationTracker::new();
        let seed = Genome::fully_connected(2, 1, &tracker);

        let mut far = seed.copy();
        let h = tracker.next_neuron_id();
        far.add_neuron(Neuron::new(h, NeuronType::Hidden));
        for (s, d) in [(0, h), (h, 2), (1, h)] {
            far.add_connection_gene(ConnectionGene::new(s, d, 1.0, true, tracker.next_innovation()));
        }

        let genomes = vec![seed.copy(), far.clone(), seed.copy(), far];
        // 3 excess genes over N = 5 is 0.6 for C1 = 1.
        let config = NeatConfig::default().with_compatibility_threshold(0.5);
        let species = speciate(&genomes, &config);

        assert_eq!(species.len(), 2);
        assert_eq!(species[0].members(), &[0, 2]);
        assert_eq!(species[1].members(), &[1, 3]);

        let loose = speciate(&genomes, &NeatConfig::default());
        assert_eq!(loose.len(), 1);
    }

    #[test]
    fn test_every_genome_assigned_once() {
        let tracker = InnovationTracker::new();
        let seed = Genome::fully_connected(3, 2, &tracker);
        let config = NeatConfig::default()
            .with_add_connection_rate(0.8)
            .with_add_neuron_rate(0.6)
            .with_compatibility_threshold(1.0);
        let mut rng = crate::random::create_rng(11);

        let genomes: Vec<Genome> = (0..30)
            .map(|_| {
                let mut g = seed.copy();
                for _ in 0..5 {
                    g.mutate(&config, &tracker, &mut rng);
                }
                g
            })
            .collect();

        let species = speciate(&genomes, &config);
        let mut seen: Vec<usize> = species.iter().flat_map(|s| s.members().to_vec()).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..30).collect::<Vec<_>>());
        for s in &species {
            assert_eq!(s.members()[0], s.representative());
        }
    }
}
