//! NEAT configuration.
//!
//! [`NeatConfig`] holds every parameter that controls mutation, speciation
//! and the generational loop. It is read-only for the duration of a run.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for a neuroevolution run.
///
/// # Defaults
///
/// ```
/// use u_neuroevo::NeatConfig;
///
/// let config = NeatConfig::default();
/// assert_eq!(config.population_size, 150);
/// assert!((config.compatibility_threshold - 3.0).abs() < 1e-12);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_neuroevo::NeatConfig;
///
/// let config = NeatConfig::default()
///     .with_population_size(50)
///     .with_add_neuron_rate(0.1)
///     .with_compatibility_threshold(2.0)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NeatConfig {
    /// Number of genomes in every generation.
    pub population_size: usize,

    /// Probability that a child's weights are mutated at all.
    pub weight_mutation_rate: f64,

    /// Per-connection probability of scaling the weight rather than replacing it,
    /// once weight mutation has been triggered.
    pub weight_perturb_rate: f64,

    /// Probability of an add-connection mutation per child.
    pub add_connection_rate: f64,

    /// Probability of an add-neuron mutation per child.
    pub add_neuron_rate: f64,

    /// Probability that a child is produced by crossover instead of cloning.
    pub crossover_rate: f64,

    /// Coefficient of the excess-gene term of the compatibility distance (C1).
    pub excess_coefficient: f64,

    /// Coefficient of the disjoint-gene term of the compatibility distance (C2).
    pub disjoint_coefficient: f64,

    /// Coefficient of the mean weight difference term (C3).
    pub weight_coefficient: f64,

    /// Genomes within this distance of a species representative join that species.
    pub compatibility_threshold: f64,

    /// Random neuron pairs tried per add-connection mutation.
    ///
    /// On dense genomes most pairs are already connected, so a low bound
    /// lowers the effective rate of `add_connection_rate`.
    pub max_add_connection_attempts: usize,

    /// Fresh weights and perturbation factors are drawn from
    /// `[-weight_range, weight_range]`.
    pub weight_range: f64,

    /// Generations executed by [`Population::run`](crate::population::Population::run).
    pub max_generations: usize,

    /// Stop a run once a generation's best fitness reaches this value.
    pub fitness_target: Option<f64>,

    /// Whether to evaluate genomes in parallel (requires the `parallel` feature).
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for NeatConfig {
    fn default() -> Self {
        Self {
            population_size: 150,
            weight_mutation_rate: 0.80,
            weight_perturb_rate: 0.90,
            add_connection_rate: 0.05,
            add_neuron_rate: 0.03,
            crossover_rate: 0.75,
            excess_coefficient: 1.0,
            disjoint_coefficient: 1.0,
            weight_coefficient: 0.4,
            compatibility_threshold: 3.0,
            max_add_connection_attempts: 10,
            weight_range: 2.0,
            max_generations: 100,
            fitness_target: None,
            parallel: true,
            seed: None,
        }
    }
}

impl NeatConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the weight mutation rate.
    pub fn with_weight_mutation_rate(mut self, rate: f64) -> Self {
        self.weight_mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the weight perturbation rate.
    pub fn with_weight_perturb_rate(mut self, rate: f64) -> Self {
        self.weight_perturb_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the add-connection mutation rate.
    pub fn with_add_connection_rate(mut self, rate: f64) -> Self {
        self.add_connection_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the add-neuron mutation rate.
    pub fn with_add_neuron_rate(mut self, rate: f64) -> Self {
        self.add_neuron_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the three compatibility distance coefficients (C1, C2, C3).
    pub fn with_distance_coefficients(mut self, excess: f64, disjoint: f64, weight: f64) -> Self {
        self.excess_coefficient = excess;
        self.disjoint_coefficient = disjoint;
        self.weight_coefficient = weight;
        self
    }

    /// Sets the compatibility threshold.
    pub fn with_compatibility_threshold(mut self, threshold: f64) -> Self {
        self.compatibility_threshold = threshold;
        self
    }

    /// Sets the attempt bound of the add-connection mutation.
    pub fn with_max_add_connection_attempts(mut self, attempts: usize) -> Self {
        self.max_add_connection_attempts = attempts;
        self
    }

    /// Sets the weight range.
    pub fn with_weight_range(mut self, range: f64) -> Self {
        self.weight_range = range;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the fitness at which a run stops early.
    pub fn with_fitness_target(mut self, target: f64) -> Self {
        self.fitness_target = Some(target);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size == 0 {
            return Err("population_size must be at least 1".into());
        }
        let rates = [
            ("weight_mutation_rate", self.weight_mutation_rate),
            ("weight_perturb_rate", self.weight_perturb_rate),
            ("add_connection_rate", self.add_connection_rate),
            ("add_neuron_rate", self.add_neuron_rate),
            ("crossover_rate", self.crossover_rate),
        ];
        for (name, rate) in rates {
            if !(0.0..=1.0).contains(&rate) {
                return Err(format!("{name} must be within [0, 1], got {rate}"));
            }
        }
        let coefficients = [
            ("excess_coefficient", self.excess_coefficient),
            ("disjoint_coefficient", self.disjoint_coefficient),
            ("weight_coefficient", self.weight_coefficient),
        ];
        for (name, c) in coefficients {
            if !c.is_finite() || c < 0.0 {
                return Err(format!("{name} must be finite and non-negative, got {c}"));
            }
        }
        if !self.compatibility_threshold.is_finite() || self.compatibility_threshold < 0.0 {
            return Err("compatibility_threshold must be finite and non-negative".into());
        }
        if self.max_add_connection_attempts == 0 {
            return Err("max_add_connection_attempts must be at least 1".into());
        }
        if !self.weight_range.is_finite() || self.weight_range <= 0.0 {
            return Err("weight_range must be finite and positive".into());
        }
        if self.max_generations == 0 {
            return Err("max_generations must be at least 1".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NeatConfig::default();
        assert_eq!(config.population_size, 150);
        assert!((config.weight_mutation_rate - 0.8).abs() < 1e-10);
        assert!((config.weight_perturb_rate - 0.9).abs() < 1e-10);
        assert!((config.add_connection_rate - 0.05).abs() < 1e-10);
        assert!((config.add_neuron_rate - 0.03).abs() < 1e-10);
        assert!((config.crossover_rate - 0.75).abs() < 1e-10);
        assert!((config.excess_coefficient - 1.0).abs() < 1e-10);
        assert!((config.disjoint_coefficient - 1.0).abs() < 1e-10);
        assert!((config.weight_coefficient - 0.4).abs() < 1e-10);
        assert!((config.compatibility_threshold - 3.0).abs() < 1e-10);
        assert_eq!(config.max_add_connection_attempts, 10);
        assert!((config.weight_range - 2.0).abs() < 1e-10);
        assert!(config.fitness_target.is_none());
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = NeatConfig::default()
            .with_population_size(40)
            .with_weight_mutation_rate(0.5)
            .with_weight_perturb_rate(0.6)
            .with_add_connection_rate(0.2)
            .with_add_neuron_rate(0.1)
            .with_crossover_rate(0.3)
            .with_distance_coefficients(2.0, 1.5, 0.1)
            .with_compatibility_threshold(1.0)
            .with_max_add_connection_attempts(25)
            .with_weight_range(1.0)
            .with_max_generations(12)
            .with_fitness_target(3.9)
            .with_parallel(false)
            .with_seed(42);

        assert_eq!(config.population_size, 40);
        assert!((config.weight_mutation_rate - 0.5).abs() < 1e-10);
        assert!((config.weight_perturb_rate - 0.6).abs() < 1e-10);
        assert!((config.add_connection_rate - 0.2).abs() < 1e-10);
        assert!((config.add_neuron_rate - 0.1).abs() < 1e-10);
        assert!((config.crossover_rate - 0.3).abs() < 1e-10);
        assert!((config.excess_coefficient - 2.0).abs() < 1e-10);
        assert!((config.disjoint_coefficient - 1.5).abs() < 1e-10);
        assert!((config.weight_coefficient - 0.1).abs() < 1e-10);
        assert!((config.compatibility_threshold - 1.0).abs() < 1e-10);
        assert_eq!(config.max_add_connection_attempts, 25);
        assert!((config.weight_range - 1.0).abs() < 1e-10);
        assert_eq!(config.max_generations, 12);
        assert_eq!(config.fitness_target, Some(3.9));
        assert!(!config.parallel);
        assert_eq!(config.seed, Some(42));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_ok() {
        assert!(NeatConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_population() {
        let config = NeatConfig::default().with_population_size(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rate_out_of_range() {
        let mut config = NeatConfig::default();
        config.crossover_rate = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.contains("crossover_rate"), "unexpected message: {err}");
    }

    #[test]
    fn test_validate_negative_coefficient() {
        let config = NeatConfig::default().with_distance_coefficients(1.0, -1.0, 0.4);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_threshold() {
        assert!(NeatConfig::default()
            .with_compatibility_threshold(-0.1)
            .validate()
            .is_err());
        assert!(NeatConfig::default()
            .with_compatibility_threshold(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_zero_attempts() {
        let config = NeatConfig::default().with_max_add_connection_attempts(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_weight_range() {
        assert!(NeatConfig::default().with_weight_range(0.0).validate().is_err());
        assert!(NeatConfig::default()
            .with_weight_range(f64::INFINITY)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_zero_generations() {
        let config = NeatConfig::default().with_max_generations(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_clamp_rates() {
        let config = NeatConfig::default()
            .with_weight_mutation_rate(1.5)
            .with_crossover_rate(-0.5)
            .with_add_neuron_rate(2.0);

        assert!((config.weight_mutation_rate - 1.0).abs() < 1e-10);
        assert!((config.crossover_rate - 0.0).abs() < 1e-10);
        assert!((config.add_neuron_rate - 1.0).abs() < 1e-10);
    }
}
