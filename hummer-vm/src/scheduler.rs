//! Greedy list scheduling over an unordered instruction bag.
//!
//! One step walks the pending list in its current order, collecting every
//! position whose operands are untouched by all earlier pending
//! instructions, then issues the candidate with the cheapest current stall,
//! breaking ties toward the earliest position. Any candidate is safe to
//! hoist: no earlier pending instruction writes a value it reads, reads a
//! value it writes, or writes a value it writes, so every true, anti and
//! output dependency of the original order survives. The heuristic is depth
//! one and never backtracks.

use std::collections::HashSet;

use hummer_asm::{FpRef, IntRegister, Opcode};

use crate::error::InterpreterError;
use crate::interpreter::Interpreter;

/// Dependency key: an operand as written, symbolic names distinct from
/// physical identities.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DepKey {
    Fp(FpRef),
    Int(IntRegister),
}

fn read_keys(op: &Opcode) -> Vec<DepKey> {
    op.reads()
        .into_iter()
        .map(DepKey::Fp)
        .chain(op.ireads().into_iter().map(DepKey::Int))
        .collect()
}

fn write_keys(op: &Opcode) -> Vec<DepKey> {
    op.writes()
        .into_iter()
        .map(DepKey::Fp)
        .chain(op.iwrites().into_iter().map(DepKey::Int))
        .collect()
}

/// Positions in `pending` that may issue ahead of everything before them.
fn candidates(pending: &[Opcode]) -> Vec<usize> {
    let mut stream_write: HashSet<DepKey> = HashSet::new();
    let mut stream_read: HashSet<DepKey> = HashSet::new();
    let mut safe = Vec::new();

    for (index, op) in pending.iter().enumerate() {
        let reads = read_keys(op);
        let writes = write_keys(op);

        let hoistable = reads.iter().all(|key| !stream_write.contains(key))
            && writes.iter().all(|key| !stream_write.contains(key))
            && writes.iter().all(|key| !stream_read.contains(key));
        if hoistable {
            safe.push(index);
        }

        stream_write.extend(writes);
        stream_read.extend(reads);
    }

    safe
}

impl Interpreter {
    /// Issue every pending instruction, cheapest-safe first, and return the
    /// issue order for emission.
    pub fn schedule(&mut self, pending: &mut Vec<Opcode>) -> Result<Vec<Opcode>, InterpreterError> {
        let mut issued = Vec::with_capacity(pending.len());
        while !pending.is_empty() {
            issued.push(self.schedule_one(pending)?);
        }
        Ok(issued)
    }

    /// Issue the safe pending instruction with the minimum current cost,
    /// remove it from the list and return it. Fails when no position is
    /// safe, which means the bag carries a dependency cycle.
    pub fn schedule_one(&mut self, pending: &mut Vec<Opcode>) -> Result<Opcode, InterpreterError> {
        let mut best: Option<(u32, usize)> = None;
        for index in candidates(pending) {
            let cost = self.cost(&pending[index])?;
            if best.map_or(true, |b| (cost, index) < b) {
                best = Some((cost, index));
            }
        }

        let Some((_, index)) = best else {
            return Err(InterpreterError::NoSafeInstruction);
        };

        let op = pending[index].clone();
        self.execute_one(&op)?;
        pending.remove(index);
        Ok(op)
    }
}
