//! Runtime interpreter error implementation.

use hummer_asm::{FpRegister, IntRegister};

use thiserror::Error;

/// Interpreter runtime error variants. All are fatal to the current run; the
/// machine is left as of the last successful issue.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InterpreterError {
    /// Computed an effective address that violates the opcode's alignment.
    #[error("effective address {addr} is not a multiple of {align} bytes")]
    MisalignedAddress {
        /// The offending byte address.
        addr: i64,
        /// Required alignment in bytes: 8, or 16 for paired forms.
        align: u32,
    },

    /// Effective address falls outside the memory array.
    #[error("memory access at double index {index} is out of bounds")]
    MemoryOverflow {
        /// The out-of-range double index.
        index: i64,
    },

    /// Label resolution found the free register pool empty. There is no
    /// garbage collector; spilling a binding back to the pool is undefined.
    #[error("no free floating-point register available for `{label}`")]
    NoFreeRegister {
        /// The label that could not be bound.
        label: String,
    },

    /// Label resolution with allocation disabled found no binding.
    #[error("register `{label}` has not been allocated")]
    UnknownLabel {
        /// The unresolved label.
        label: String,
    },

    /// `name_registers` tried to rebind a label or a physical register that
    /// is already bound differently.
    #[error("register {reg} is already bound; cannot bind `{label}`")]
    RegisterAlreadyBound {
        /// The requested label.
        label: String,
        /// The conflicting physical register.
        reg: FpRegister,
    },

    /// The scheduler found no instruction whose operands are untouched by
    /// every earlier pending instruction; the input bag has a dependency
    /// cycle.
    #[error("cannot find a safe instruction")]
    NoSafeInstruction,

    /// A write-through token was requested while the queue was full. The
    /// stall loop prevents this; reaching it is an internal assertion.
    #[error("write-through queue overflow")]
    WriteThroughOverflow,

    /// The assembly view needs a C variable name for an integer register
    /// that was never bound.
    #[error("integer register {reg} has no C variable binding")]
    NoCVariable {
        /// The unbound integer register.
        reg: IntRegister,
    },
}
