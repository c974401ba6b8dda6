//! Atomic types of the PPC FP2 ("Double Hummer") pipeline simulator.
//!
//! The FP2 unit executes one paired-double operation per instruction: every
//! floating-point register holds a primary and a secondary slot, and the
//! cross/copy opcode families route the slots of their sources into the slots
//! of their target. This crate defines the register identities, the paired
//! value type, the closed [`Opcode`] set, and the per-opcode attribute tables
//! (functional unit, latency, inverse throughput, write-through bytes,
//! architectural read/write sets, in-use latencies) that the simulator's
//! issue engine and list scheduler consume.

#![warn(missing_docs)]

pub mod consts;

mod opcode;
mod types;

pub use opcode::Opcode;
pub use types::{ExecUnit, FpRef, FpRegister, FpVal, InUse, IntRegister};
