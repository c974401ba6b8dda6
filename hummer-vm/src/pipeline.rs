//! Per-resource countdown bookkeeping.
//!
//! Every pipelined constraint in the machine — register result latency,
//! functional-unit issue spacing, load/store in-use windows — is a small
//! table of `key -> remaining cycles` entries that drain uniformly, one per
//! advanced cycle. The write-through queue is the same idea without keys: a
//! bounded set of in-flight token countdowns.

use crate::error::InterpreterError;

/// Ordered countdown table mapping keys to remaining cycles.
///
/// Entries keep insertion order so conflict reporting is stable; overwriting
/// a key updates it in place. Entries are always positive — a countdown that
/// reaches zero is removed.
#[derive(Debug, Clone)]
pub struct Scoreboard<K> {
    slots: Vec<(K, u32)>,
}

impl<K> Default for Scoreboard<K> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<K: PartialEq + Clone> Scoreboard<K> {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remaining cycles for `key`, if present.
    pub fn get(&self, key: &K) -> Option<u32> {
        self.slots
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, cycles)| *cycles)
    }

    /// Maximum remaining cycles among `keys`; zero when none is present.
    pub fn stall<I>(&self, keys: I) -> u32
    where
        I: IntoIterator<Item = K>,
    {
        keys.into_iter()
            .map(|key| self.get(&key).unwrap_or(0))
            .max()
            .unwrap_or(0)
    }

    /// The subset of `keys` currently counting down, in queried order.
    pub fn conflicts<I>(&self, keys: I) -> Vec<(K, u32)>
    where
        I: IntoIterator<Item = K>,
    {
        keys.into_iter()
            .filter_map(|key| self.get(&key).map(|cycles| (key, cycles)))
            .collect()
    }

    /// Overwrite the countdown for `key`. A zero-cycle countdown is the same
    /// as no entry.
    pub fn set(&mut self, key: K, cycles: u32) {
        if cycles == 0 {
            self.slots.retain(|(k, _)| *k != key);
        } else if let Some(slot) = self.slots.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = cycles;
        } else {
            self.slots.push((key, cycles));
        }
    }

    /// Advance `cycles` cycles: decrement every entry and drop the ones that
    /// reach zero.
    pub fn retire(&mut self, cycles: u32) {
        self.slots.retain_mut(|(_, remaining)| {
            if *remaining <= cycles {
                false
            } else {
                *remaining -= cycles;
                true
            }
        });
    }

    /// Drop every entry.
    pub fn flush(&mut self) {
        self.slots.clear();
    }

    /// Whether the table has no entry counting down.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Bounded queue of in-flight write-through tokens.
///
/// A store consumes one token slot at issue; the token drains after a fixed
/// latency. Once all slots are in flight, further stores stall until the
/// oldest token retires.
#[derive(Debug, Clone)]
pub struct WriteThroughBucket {
    tokens: Vec<u32>,
    max_tokens: usize,
    token_latency: u32,
}

impl WriteThroughBucket {
    /// An empty bucket with `max_tokens` slots draining in `token_latency`
    /// cycles each.
    pub fn new(max_tokens: usize, token_latency: u32) -> Self {
        Self {
            tokens: Vec::with_capacity(max_tokens),
            max_tokens,
            token_latency,
        }
    }

    /// Cycles until a token slot frees up for a store of `writethrough`
    /// bytes. Zero when `writethrough` is zero or a slot is free.
    pub fn stall(&self, writethrough: u32) -> u32 {
        if writethrough == 0 || self.tokens.len() < self.max_tokens {
            0
        } else {
            self.tokens.iter().copied().min().unwrap_or(0)
        }
    }

    /// Consume a token slot for a store of `writethrough` bytes.
    ///
    /// Precondition: `stall(writethrough) == 0`. A full bucket means the
    /// caller skipped the stall loop.
    pub fn issue(&mut self, writethrough: u32) -> Result<(), InterpreterError> {
        if writethrough == 0 {
            return Ok(());
        }
        if self.tokens.len() >= self.max_tokens {
            return Err(InterpreterError::WriteThroughOverflow);
        }
        self.tokens.push(self.token_latency);
        Ok(())
    }

    /// Advance `cycles` cycles; tokens that finish draining retire.
    pub fn retire(&mut self, cycles: u32) {
        self.tokens.retain_mut(|remaining| {
            if *remaining <= cycles {
                false
            } else {
                *remaining -= cycles;
                true
            }
        });
    }

    /// Drop every in-flight token.
    pub fn flush(&mut self) {
        self.tokens.clear();
    }

    /// Number of tokens currently in flight.
    pub fn in_flight(&self) -> usize {
        self.tokens.len()
    }

    /// Whether no token is in flight.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
