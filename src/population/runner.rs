//! Generational loop execution.
//!
//! [`Population`] orchestrates the complete evolutionary process:
//! speciation → evaluation → fitness sharing → selection → reproduction → repeat.

use super::selection::proportionate;
use super::species::{speciate, Species};
use crate::config::NeatConfig;
use crate::error::NeatError;
use crate::genome::Genome;
use crate::innovation::InnovationTracker;
use crate::random::rng_from_option;
use rand::rngs::StdRng;
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Host-supplied fitness function. Higher is better.
pub type FitnessFn = Box<dyn Fn(&Genome) -> f64 + Send + Sync>;

/// Summary of one generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationStats {
    /// Generation number, starting at 1.
    pub generation: usize,

    /// Number of genomes evaluated.
    pub population_size: usize,

    /// Number of species formed at the start of the generation.
    pub species_count: usize,

    /// Highest raw fitness in the generation.
    pub best_fitness: f64,

    /// Mean raw fitness over the generation.
    pub mean_fitness: f64,
}

/// Result of [`Population::run`].
#[derive(Debug, Clone)]
pub struct NeatResult {
    /// The best genome found during the entire run.
    pub best: Genome,

    /// Best fitness value (same as `best.fitness()`).
    pub best_fitness: f64,

    /// Total number of generations executed.
    pub generations: usize,

    /// Whether the run stopped because `fitness_target` was reached.
    pub target_reached: bool,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Best fitness seen so far, at the end of each generation.
    pub fitness_history: Vec<f64>,
}

/// A speciated population of genomes.
///
/// # Usage
///
/// ```
/// use u_neuroevo::{Genome, InnovationTracker, NeatConfig, Population};
///
/// let tracker = InnovationTracker::new();
/// let seed = Genome::fully_connected(2, 1, &tracker);
/// let config = NeatConfig::default()
///     .with_population_size(20)
///     .with_max_generations(5)
///     .with_seed(42);
///
/// let mut population = Population::new(seed, tracker, config, |genome: &Genome| {
///     let out = genome.query(&[1.0, 0.0]).unwrap_or_default();
///     1.0 - (out[0] - 0.5).abs()
/// })
/// .unwrap();
///
/// let result = population.run();
/// assert_eq!(result.generations, 5);
/// ```
pub struct Population {
    config: NeatConfig,
    tracker: InnovationTracker,
    genomes: Vec<Genome>,
    species: Vec<Species>,
    generation: usize,
    champion: Option<Genome>,
    best: Option<Genome>,
    fitness: FitnessFn,
    rng: StdRng,
}

impl Population {
    /// Creates the initial population from `seed`.
    ///
    /// The population holds `population_size` copies of the seed, each with
    /// freshly randomized weights. `tracker` must be the tracker that
    /// allocated the seed's neuron ids and innovation numbers; it is then
    /// owned by the population and used for every structural mutation.
    ///
    /// # Errors
    ///
    /// - [`NeatError::InvalidConfig`] if [`NeatConfig::validate`] fails
    /// - [`NeatError::InvalidSeed`] if the seed has no input or no output
    ///   neurons, or uses ids the tracker has not yet issued
    pub fn new<F>(
        seed: Genome,
        tracker: InnovationTracker,
        config: NeatConfig,
        fitness: F,
    ) -> Result<Self, NeatError>
    where
        F: Fn(&Genome) -> f64 + Send + Sync + 'static,
    {
        config.validate().map_err(NeatError::InvalidConfig)?;
        validate_seed(&seed, &tracker)?;

        let mut rng = rng_from_option(config.seed);
        let genomes: Vec<Genome> = (0..config.population_size)
            .map(|_| {
                let mut genome = seed.copy();
                genome.randomize_weights(config.weight_range, &mut rng);
                genome
            })
            .collect();

        Ok(Self {
            config,
            tracker,
            genomes,
            species: Vec::new(),
            generation: 1,
            champion: None,
            best: None,
            fitness: Box::new(fitness),
            rng,
        })
    }

    /// Runs one generation and replaces the population with its offspring.
    pub fn evolve(&mut self) -> GenerationStats {
        // 1. Speciate
        self.species = speciate(&self.genomes, &self.config);
        log::debug!(
            "generation {}: {} species",
            self.generation,
            self.species.len()
        );

        // 2. Evaluate
        evaluate_population(&mut self.genomes, &self.fitness, self.config.parallel);

        // 3. Share fitness within species
        for species in &mut self.species {
            species.calculate_adjusted_fitness(&self.genomes);
        }

        // 4. Select the generation's best among species champions
        let champion = find_champion(&self.species, &self.genomes);
        let best_fitness = self.genomes[champion].fitness();
        let improved = match &self.best {
            Some(best) => best_fitness > best.fitness(),
            None => true,
        };
        let champion = self.genomes[champion].clone();
        if improved {
            self.best = Some(champion.clone());
        }
        self.champion = Some(champion);

        let mean_fitness =
            self.genomes.iter().map(Genome::fitness).sum::<f64>() / self.genomes.len() as f64;
        let stats = GenerationStats {
            generation: self.generation,
            population_size: self.genomes.len(),
            species_count: self.species.len(),
            best_fitness,
            mean_fitness,
        };
        log::info!(
            "generation {}: population={} species={} best={:.6} mean={:.6}",
            stats.generation,
            stats.population_size,
            stats.species_count,
            stats.best_fitness,
            stats.mean_fitness
        );

        // 5. Reproduce
        let mut next_gen = Vec::with_capacity(self.config.population_size);
        while next_gen.len() < self.config.population_size {
            let p1 = select_parent(&self.species, &self.genomes, &mut self.rng);
            let p2 = select_parent(&self.species, &self.genomes, &mut self.rng);
            let (p1, p2) = (&self.genomes[p1], &self.genomes[p2]);

            let mut child = if self.rng.random_range(0.0..1.0) < self.config.crossover_rate {
                if p1.fitness() > p2.fitness() {
                    Genome::crossover(p1, p2, &mut self.rng)
                } else {
                    Genome::crossover(p2, p1, &mut self.rng)
                }
            } else if self.rng.random_bool(0.5) {
                p1.copy()
            } else {
                p2.copy()
            };

            child.mutate(&self.config, &self.tracker, &mut self.rng);
            next_gen.push(child);
        }

        self.genomes = next_gen;
        self.generation += 1;
        stats
    }

    /// Evolves until `max_generations` is reached or a generation's best
    /// fitness reaches `fitness_target`.
    pub fn run(&mut self) -> NeatResult {
        self.run_with_cancel(None)
    }

    /// Runs with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the run stops at
    /// the end of the current generation and returns the best genome found
    /// so far. At least one generation is always executed.
    pub fn run_with_cancel(&mut self, cancel: Option<Arc<AtomicBool>>) -> NeatResult {
        log::info!(
            "starting run: population={} max_generations={}",
            self.config.population_size,
            self.config.max_generations
        );

        let mut fitness_history = Vec::with_capacity(self.config.max_generations);
        let mut target_reached = false;
        let mut cancelled = false;

        for _ in 0..self.config.max_generations {
            let stats = self.evolve();
            let best_so_far = self.best.as_ref().map_or(stats.best_fitness, Genome::fitness);
            fitness_history.push(best_so_far);

            if let Some(target) = self.config.fitness_target {
                if stats.best_fitness >= target {
                    log::debug!("fitness target {} reached at generation {}", target, stats.generation);
                    target_reached = true;
                    break;
                }
            }

            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    log::debug!("cancelled after generation {}", stats.generation);
                    cancelled = true;
                    break;
                }
            }
        }

        let best = match &self.best {
            Some(best) => best.clone(),
            None => self.genomes[0].clone(),
        };
        log::info!(
            "run finished after {} generation(s): best={:.6}",
            fitness_history.len(),
            best.fitness()
        );

        NeatResult {
            best_fitness: best.fitness(),
            best,
            generations: fitness_history.len(),
            target_reached,
            cancelled,
            fitness_history,
        }
    }

    /// Genomes of the current generation.
    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    /// Species formed by the last [`evolve`](Self::evolve).
    pub fn species(&self) -> &[Species] {
        &self.species
    }

    /// Number of the next generation to be evaluated, starting at 1.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Best genome evaluated so far, `None` before the first generation.
    pub fn best_genome(&self) -> Option<&Genome> {
        self.best.as_ref()
    }

    /// Fittest genome of the generation evaluated by the last
    /// [`evolve`](Self::evolve), with its fitness.
    pub fn champion(&self) -> Option<&Genome> {
        self.champion.as_ref()
    }

    /// Tracker used for every structural mutation of this population.
    pub fn tracker(&self) -> &InnovationTracker {
        &self.tracker
    }

    /// Configuration the population was created with.
    pub fn config(&self) -> &NeatConfig {
        &self.config
    }
}

fn validate_seed(seed: &Genome, tracker: &InnovationTracker) -> Result<(), NeatError> {
    if seed.input_count() == 0 {
        return Err(NeatError::InvalidSeed("no input neurons".into()));
    }
    if seed.output_count() == 0 {
        return Err(NeatError::InvalidSeed("no output neurons".into()));
    }
    if let Some(id) = seed.max_neuron_id() {
        if id >= tracker.peek_neuron_id() {
            return Err(NeatError::InvalidSeed(format!(
                "neuron id {id} was not issued by the tracker"
            )));
        }
    }
    if let Some(innovation) = seed.max_innovation() {
        if innovation >= tracker.peek_innovation() {
            return Err(NeatError::InvalidSeed(format!(
                "innovation {innovation} was not issued by the tracker"
            )));
        }
    }
    Ok(())
}

/// Evaluate all genomes in the population.
#[cfg(feature = "parallel")]
fn evaluate_population(genomes: &mut [Genome], fitness: &FitnessFn, parallel: bool) {
    if parallel {
        genomes.par_iter_mut().for_each(|genome| {
            let f = fitness(genome);
            genome.set_fitness(f);
        });
    } else {
        for genome in genomes.iter_mut() {
            let f = fitness(genome);
            genome.set_fitness(f);
        }
    }
}

/// Evaluate all genomes in the population.
#[cfg(not(feature = "parallel"))]
fn evaluate_population(genomes: &mut [Genome], fitness: &FitnessFn, _parallel: bool) {
    for genome in genomes.iter_mut() {
        let f = fitness(genome);
        genome.set_fitness(f);
    }
}

/// Best of the species' best members; the first species wins ties.
fn find_champion(species: &[Species], genomes: &[Genome]) -> usize {
    let mut champion = species[0].best_member(genomes);
    for s in &species[1..] {
        let candidate = s.best_member(genomes);
        if genomes[candidate].fitness() > genomes[champion].fitness() {
            champion = candidate;
        }
    }
    champion
}

/// Draws a species by adjusted fitness, then a member by raw fitness.
fn select_parent<R: Rng>(species: &[Species], genomes: &[Genome], rng: &mut R) -> usize {
    let species_weights: Vec<f64> = species.iter().map(Species::adjusted_fitness_sum).collect();
    let chosen = &species[proportionate(&species_weights, rng)];

    let member_weights: Vec<f64> = chosen
        .members()
        .iter()
        .map(|&idx| genomes[idx].fitness())
        .collect();
    chosen.members()[proportionate(&member_weights, rng)]
}

// ============================================================================
// Tests
// ============================================================================
