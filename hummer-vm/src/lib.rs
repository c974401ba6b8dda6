//! In-order pipeline interpreter and list scheduler for the PPC FP2
//! ("Double Hummer") paired-floating-point instruction subset.
//!
//! The [`interpreter::Interpreter`] models a single in-order core: a cycle
//! counter, paired-FP and integer register files, a small double-word memory,
//! per-resource countdown scoreboards (register hazards, functional units,
//! load/store in-use windows) and a bounded write-through queue. Issuing an
//! instruction stalls until every resource is simultaneously free, applies
//! the instruction's semantics, then charges the resources; issue itself is
//! zero-cost. The greedy list scheduler reorders an unordered bag of
//! instructions into a cycle-minimal sequence that preserves every data
//! dependency of the original program order.

pub mod consts;
pub mod error;
pub mod interpreter;
pub mod pipeline;
pub mod scheduler;
pub mod trace;
pub mod view;

pub mod prelude {
    //! Required types for working with the simulator.

    pub use hummer_asm::{ExecUnit, FpRef, FpRegister, FpVal, InUse, IntRegister, Opcode};

    pub use crate::error::InterpreterError;
    pub use crate::interpreter::{Interpreter, InterpreterParams, UnitCounters};
    pub use crate::pipeline::{Scoreboard, WriteThroughBucket};
    pub use crate::trace::TraceSink;
    pub use crate::view::AsmView;
}
