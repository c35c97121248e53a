//! NEAT-style neuroevolution.
//!
//! Evolves both the topology and the weights of feed-forward neural
//! networks with a speciated genetic algorithm:
//!
//! - **Genome**: neurons plus innovation-numbered connection genes, kept
//!   acyclic by construction. Provides evaluation, structural and weight
//!   mutation, crossover and compatibility distance.
//! - **Innovation tracking**: monotonic neuron-id and innovation counters
//!   shared by every structural mutation of a run.
//! - **Population**: greedy speciation, explicit fitness sharing,
//!   species-weighted roulette selection and reproduction.
//!
//! # Example
//!
//! ```
//! use u_neuroevo::{Genome, InnovationTracker, NeatConfig, Population};
//!
//! let tracker = InnovationTracker::new();
//! let seed = Genome::fully_connected(2, 1, &tracker);
//! let config = NeatConfig::default()
//!     .with_population_size(30)
//!     .with_max_generations(10)
//!     .with_seed(1);
//!
//! let mut population = Population::new(seed, tracker, config, |genome: &Genome| {
//!     match genome.query(&[0.5, -0.5]) {
//!         Ok(out) => 1.0 - out[0].abs(),
//!         Err(_) => 0.0,
//!     }
//! })
//! .unwrap();
//!
//! let result = population.run();
//! assert!(result.best_fitness > 0.0);
//! ```
//!
//! # Features
//!
//! - `parallel`: evaluates genomes with rayon when `NeatConfig::parallel` is set
//! - `serde`: `Serialize`/`Deserialize` for [`NeatConfig`]

pub mod config;
pub mod error;
pub mod genome;
pub mod innovation;
pub mod population;
pub mod random;

pub use config::NeatConfig;
pub use error::NeatError;
pub use genome::{activation, ConnectionGene, Genome, Neuron, NeuronType};
pub use innovation::{Innovation, InnovationTracker, NeuronId};
pub use population::{GenerationStats, NeatResult, Population, Species};
