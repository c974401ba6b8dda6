//! Machine parameters.

/// Number of paired floating-point registers.
pub const FP_REGISTER_COUNT: usize = 32;

/// Number of integer registers.
pub const INT_REGISTER_COUNT: usize = 32;

/// Memory size, in doubles.
pub const VM_MEMORY_DOUBLES: usize = 32;

/// Size of a double, in bytes. Effective addresses are computed in bytes and
/// divided down to double indices.
pub const DOUBLE_SIZE: i64 = 8;

/// Maximum number of in-flight write-through tokens.
pub const WRITETHROUGH_MAX_TOKENS: usize = 6;

/// Cycles an in-flight write-through token takes to drain.
pub const WRITETHROUGH_TOKEN_LATENCY: u32 = 40;
