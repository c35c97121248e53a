//! Speciated population and the generational loop.
//!
//! [`Population`] owns the genomes of the current generation, the
//! [`InnovationTracker`](crate::innovation::InnovationTracker) that allocates
//! ids for every structural mutation, and the host-supplied fitness function.
//! Each call to [`Population::evolve`] runs one generation:
//!
//! speciation → evaluation → fitness sharing → selection → reproduction.
//!
//! # Key Types
//!
//! - [`Population`]: the controller
//! - [`Species`]: a cluster of mutually compatible genomes
//! - [`GenerationStats`]: per-generation summary returned by `evolve`
//! - [`NeatResult`]: outcome of [`Population::run`]
//!
//! # References
//!
//! - Stanley & Miikkulainen (2002), *Evolving Neural Networks through
//!   Augmenting Topologies*

mod runner;
pub mod selection;
mod species;

pub use runner::{FitnessFn, GenerationStats, NeatResult, Population};
pub use species::{speciate, Species};
