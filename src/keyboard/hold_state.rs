//! Key hold bookkeeping
//!
//! Owns the held-keys set and one accumulator per in-flight key. Every event
//! it builds carries a copy of the set taken at emission time.

use crate::event::{KeyInput, KeyPhase};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Key names are case-folded so Shift never splits one physical key in two.
pub fn normalize_key(key: &str) -> String {
    key.to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Sequence {
    generation: u64,
    held: f64,
}

/// Held-keys set plus one accumulator per running hold sequence
///
/// Synchronous; the composer task is its single owner.
#[derive(Debug, Default)]
pub struct KeyHoldState {
    keys_held: BTreeSet<String>,
    sequences: HashMap<String, Sequence>,
    next_generation: u64,
}

impl KeyHoldState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys between their press and release, sorted.
    pub fn keys_held(&self) -> &BTreeSet<String> {
        &self.keys_held
    }

    /// Starts a sequence for `key`. `None` if one is already running.
    ///
    /// Returns the generation that ticks for this sequence must carry.
    pub fn press(&mut self, key: &str) -> Option<(u64, KeyInput)> {
        if self.sequences.contains_key(key) {
            debug!("Key '{}' already in flight, ignoring press", key);
            return None;
        }
        let generation = self.next_generation;
        self.next_generation += 1;
        self.sequences.insert(
            key.to_string(),
            Sequence {
                generation,
                held: 0.0,
            },
        );
        self.keys_held.insert(key.to_string());
        Some((generation, self.event(key, 0.0, 0.0, KeyPhase::Press)))
    }

    /// Accumulates one interval. Ticks from an ended sequence are dropped.
    pub fn tick(&mut self, key: &str, generation: u64, dt: f64) -> Option<KeyInput> {
        let sequence = self.sequences.get_mut(key)?;
        if sequence.generation != generation {
            debug!("Dropping stale tick for '{}' (generation {})", key, generation);
            return None;
        }
        sequence.held += dt;
        let held = sequence.held;
        Some(self.event(key, dt, held, KeyPhase::Held))
    }

    /// Ends the sequence for `key`. `None` if it was not in flight.
    pub fn release(&mut self, key: &str) -> Option<KeyInput> {
        self.sequences.remove(key)?;
        self.keys_held.remove(key);
        Some(self.event(key, 0.0, 0.0, KeyPhase::Release))
    }

    fn event(&self, key: &str, dt: f64, held: f64, event: KeyPhase) -> KeyInput {
        KeyInput {
            key: key.to_string(),
            dt,
            held,
            event,
            keys_held: self.keys_held.clone(),
        }
    }
}
