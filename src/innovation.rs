//! Historical markers for neurons and connection genes.
//!
//! Every structural mutation draws fresh identifiers from an
//! [`InnovationTracker`]. Because ids are only ever copied (never reissued),
//! two genes with the same innovation number in different genomes descend
//! from the same mutation event and can be aligned during crossover and
//! compatibility measurement.
//!
//! Two structurally identical mutations that happen independently receive
//! *different* innovation numbers. Deduplicating them per generation is not
//! attempted.

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifier of a neuron, unique across a run.
pub type NeuronId = u64;

/// Innovation number of a connection gene, unique across a run.
pub type Innovation = u64;

/// Issues neuron ids and connection innovation numbers.
///
/// The two counters are independent and monotonic. Allocation takes `&self`
/// and is atomic, so one tracker can be shared by genomes mutating on
/// different threads.
///
/// # Examples
///
/// ```
/// use u_neuroevo::innovation::InnovationTracker;
///
/// let tracker = InnovationTracker::new();
/// assert_eq!(tracker.next_neuron_id(), 0);
/// assert_eq!(tracker.next_neuron_id(), 1);
/// assert_eq!(tracker.next_innovation(), 0);
/// ```
#[derive(Debug, Default)]
pub struct InnovationTracker {
    next_neuron_id: AtomicU64,
    next_innovation: AtomicU64,
}

impl InnovationTracker {
    /// Creates a tracker with both counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tracker whose counters start at the given values.
    pub fn starting_at(neuron_id: NeuronId, innovation: Innovation) -> Self {
        Self {
            next_neuron_id: AtomicU64::new(neuron_id),
            next_innovation: AtomicU64::new(innovation),
        }
    }

    /// Returns the next neuron id and advances the counter.
    pub fn next_neuron_id(&self) -> NeuronId {
        self.next_neuron_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Returns the next connection innovation number and advances the counter.
    pub fn next_innovation(&self) -> Innovation {
        self.next_innovation.fetch_add(1, Ordering::Relaxed)
    }

    /// The id the next call to [`next_neuron_id`](Self::next_neuron_id) will return.
    pub fn peek_neuron_id(&self) -> NeuronId {
        self.next_neuron_id.load(Ordering::Relaxed)
    }

    /// The number the next call to [`next_innovation`](Self::next_innovation) will return.
    pub fn peek_innovation(&self) -> Innovation {
        self.next_innovation.load(Ordering::Relaxed)
    }
}
