//! ISA timing parameters, in cycles.
//!
//! The values model the PPC 440 FP2 pipeline: a five-stage FP arithmetic
//! pipe, a four-cycle load-to-use path, and stores that serialize through
//! load/store throughput and the write-through queue rather than through a
//! result latency.

/// Result latency of paired floating-point arithmetic.
pub const FP_LATENCY: u32 = 5;

/// Result latency of a floating-point load.
pub const LOAD_LATENCY: u32 = 4;

/// Result latency of a store. Not meaningful on its own; stores block through
/// [`STORE_CYCLES`] and the write-through queue.
pub const STORE_LATENCY: u32 = 0;

/// Minimum issue spacing of back-to-back loads on the load/store unit.
pub const LOAD_THROUGHPUT: u32 = 2;

/// Minimum issue spacing of back-to-back stores on the load/store unit.
pub const STORE_CYCLES: u32 = 4;

/// Bytes a paired store pushes into the write-through queue.
pub const STORE_WRITETHROUGH: u32 = 16;

/// Bytes a single-double store pushes into the write-through queue.
pub const SINGLE_STORE_WRITETHROUGH: u32 = 8;

/// Cycles a load target is unavailable as the source of an FP operation.
pub const FPREG_LOAD_SOURCE_LATENCY: u32 = 5;

/// Cycles a load target is unavailable as the destination of an FP operation.
pub const FPREG_LOAD_DEST_LATENCY: u32 = 5;

/// Cycles a store source is unavailable as the source of an FP operation.
pub const FPREG_STORE_SOURCE_LATENCY: u32 = 2;

/// Cycles a store source is unavailable as the destination of an FP operation.
pub const FPREG_STORE_DEST_LATENCY: u32 = 2;
