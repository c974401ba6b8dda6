//! [`Interpreter`] implementation.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use hummer_asm::{ExecUnit, FpRegister, FpVal};

use crate::consts::*;
use crate::pipeline::{Scoreboard, WriteThroughBucket};
use crate::trace::TraceSink;

mod alu;
mod constructors;
mod executors;
mod internal;
mod memory;

/// Machine geometry.
///
/// `Default` reproduces the modeled hardware; tests shrink the write-through
/// bucket or the memory to provoke edge conditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterParams {
    /// Memory size, in doubles.
    pub memory_doubles: usize,
    /// Paired floating-point register count.
    pub fp_registers: usize,
    /// Integer register count.
    pub int_registers: usize,
    /// Write-through queue depth.
    pub writethrough_tokens: usize,
    /// Cycles a write-through token takes to drain.
    pub writethrough_latency: u32,
}

impl Default for InterpreterParams {
    fn default() -> Self {
        Self {
            memory_doubles: VM_MEMORY_DOUBLES,
            fp_registers: FP_REGISTER_COUNT,
            int_registers: INT_REGISTER_COUNT,
            writethrough_tokens: WRITETHROUGH_MAX_TOKENS,
            writethrough_latency: WRITETHROUGH_TOKEN_LATENCY,
        }
    }
}

/// Instructions issued per functional unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitCounters {
    /// Issues on the paired floating-point unit.
    pub fp: u64,
    /// Issues on the integer unit.
    pub int: u64,
    /// Issues on the load/store unit.
    pub ls: u64,
}

impl UnitCounters {
    /// Issues on `unit`.
    pub const fn count(&self, unit: ExecUnit) -> u64 {
        match unit {
            ExecUnit::Fp => self.fp,
            ExecUnit::Int => self.int,
            ExecUnit::Ls => self.ls,
        }
    }

    pub(crate) fn bump(&mut self, unit: Option<ExecUnit>) {
        match unit {
            Some(ExecUnit::Fp) => self.fp += 1,
            Some(ExecUnit::Int) => self.int += 1,
            Some(ExecUnit::Ls) => self.ls += 1,
            None => {}
        }
    }
}

/// One in-order FP2 core.
///
/// Owns the architectural state (register files, memory), the pipeline
/// bookkeeping (hazard, unit and in-use scoreboards, write-through queue),
/// the symbolic register bindings and free pool, and the trace sink. State
/// persists across `execute`/`schedule` calls; [`Interpreter::flush_pipeline`]
/// clears the countdown tables without touching registers or bindings.
#[derive(Debug, Clone)]
pub struct Interpreter {
    cycle: u64,
    fp: Vec<FpVal>,
    int: Vec<i64>,
    mem: Vec<f64>,
    hazards: Scoreboard<FpRegister>,
    units: Scoreboard<ExecUnit>,
    inuse_src: Scoreboard<FpRegister>,
    inuse_dst: Scoreboard<FpRegister>,
    writethrough: WriteThroughBucket,
    regnames: BTreeMap<String, FpRegister>,
    fppool: BTreeSet<FpRegister>,
    fpeternal: BTreeSet<FpRegister>,
    counters: UnitCounters,
    trace: TraceSink,
    params: InterpreterParams,
}

impl Interpreter {
    /// Current cycle.
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// The memory array, indexed in doubles.
    pub fn memory(&self) -> &[f64] {
        &self.mem
    }

    /// Mutable access to the memory array, for seeding test data.
    pub fn memory_mut(&mut self) -> &mut [f64] {
        &mut self.mem
    }

    /// Current contents of the FP register file.
    pub fn fp_registers(&self) -> &[FpVal] {
        &self.fp
    }

    /// Current contents of the integer register file.
    pub fn int_registers(&self) -> &[i64] {
        &self.int
    }

    /// Per-unit issue counters.
    pub const fn counters(&self) -> &UnitCounters {
        &self.counters
    }

    /// Machine geometry.
    pub const fn params(&self) -> &InterpreterParams {
        &self.params
    }

    /// The register hazard scoreboard.
    pub const fn hazards(&self) -> &Scoreboard<FpRegister> {
        &self.hazards
    }

    /// The functional-unit scoreboard.
    pub const fn units(&self) -> &Scoreboard<ExecUnit> {
        &self.units
    }

    /// The in-use-as-source scoreboard.
    pub const fn inuse_source(&self) -> &Scoreboard<FpRegister> {
        &self.inuse_src
    }

    /// The in-use-as-destination scoreboard.
    pub const fn inuse_destination(&self) -> &Scoreboard<FpRegister> {
        &self.inuse_dst
    }

    /// The write-through queue.
    pub const fn writethrough(&self) -> &WriteThroughBucket {
        &self.writethrough
    }

    /// Label bindings established so far.
    pub const fn bindings(&self) -> &BTreeMap<String, FpRegister> {
        &self.regnames
    }

    /// Number of registers still in the free pool.
    pub fn free_registers(&self) -> usize {
        self.fppool.len()
    }

    /// The trace sink.
    pub const fn trace(&self) -> &TraceSink {
        &self.trace
    }

    /// Replace the trace sink; `TraceSink::Buffer` captures the issue log.
    pub fn set_trace(&mut self, trace: TraceSink) {
        self.trace = trace;
    }

    /// Clear the four countdown scoreboards and the write-through queue.
    /// Register contents, bindings and the cycle counter are untouched.
    pub fn flush_pipeline(&mut self) {
        self.hazards.flush();
        self.units.flush();
        self.inuse_src.flush();
        self.inuse_dst.flush();
        self.writethrough.flush();
    }

    /// Render the architectural and bookkeeping state, for `inspect`.
    pub fn state_dump(&self) -> String {
        let fp = self
            .fp
            .iter()
            .enumerate()
            .map(|(i, v)| format!("f{i}={v}"))
            .collect::<Vec<_>>()
            .join(", ");
        let int = self
            .int
            .iter()
            .enumerate()
            .map(|(i, v)| format!("r{i}={v}"))
            .collect::<Vec<_>>()
            .join(", ");
        let names = self
            .regnames
            .iter()
            .map(|(label, reg)| format!("{label}={reg}"))
            .collect::<Vec<_>>()
            .join(", ");

        let mut out = String::new();
        let _ = write!(out, "Core(cycle={}", self.cycle);
        let _ = write!(out, ",\n\tfp=[{fp}]");
        let _ = write!(out, ",\n\tint=[{int}]");
        let _ = write!(out, ",\n\tmem={:?}", self.mem);
        let _ = write!(out, ",\n\tregnames={{{names}}}");
        let _ = write!(
            out,
            ",\n\tcounter={{fp={}, int={}, ls={}}})",
            self.counters.fp, self.counters.int, self.counters.ls
        );
        out
    }
}
