use std::collections::{BTreeMap, BTreeSet};

use hummer_asm::FpRegister;

use super::{Interpreter, InterpreterParams, UnitCounters};
use crate::pipeline::{Scoreboard, WriteThroughBucket};
use crate::trace::TraceSink;

impl Interpreter {
    /// A fresh core: zeroed registers and memory, empty scoreboards, every
    /// FP register in the free pool.
    pub fn new(params: InterpreterParams) -> Self {
        let fppool = (0..params.fp_registers)
            .map(|n| FpRegister::new(n as u8))
            .collect::<BTreeSet<_>>();

        Self {
            cycle: 0,
            fp: vec![Default::default(); params.fp_registers],
            int: vec![0; params.int_registers],
            mem: vec![0.0; params.memory_doubles],
            hazards: Scoreboard::new(),
            units: Scoreboard::new(),
            inuse_src: Scoreboard::new(),
            inuse_dst: Scoreboard::new(),
            writethrough: WriteThroughBucket::new(
                params.writethrough_tokens,
                params.writethrough_latency,
            ),
            regnames: BTreeMap::new(),
            fppool,
            fpeternal: BTreeSet::new(),
            counters: UnitCounters::default(),
            trace: TraceSink::default(),
            params,
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(InterpreterParams::default())
    }
}
