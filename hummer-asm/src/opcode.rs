use core::fmt;

use crate::consts::*;
use crate::types::{ExecUnit, FpRef, InUse, IntRegister};

/// Instruction representation for the simulator.
///
/// One variant per opcode, carrying the operand tuple in declared order. The
/// simulator never decodes machine words; an `Opcode` value is the
/// instruction. Floating-point operands are [`FpRef`]s so a kernel can name
/// them symbolically and let the allocator pick physical registers; integer
/// operands are always physical.
///
/// ## Paired arithmetic
///
/// All arithmetic opcodes read and write whole paired values. The `cp`/`cs`
/// and `x` families differ only in which source slots feed which target
/// slots.
///
/// ## Loads and stores
///
/// Paired forms (`lfpd*`, `lfxdux`, `stfpdux`, `stfxdux`) require 16-byte
/// alignment; single-double forms require 8-byte alignment and preserve the
/// untouched slot of the target. `u` forms write the effective byte address
/// back to the base register.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Opcode {
    /// Floating cross-copy multiply-add.
    ///
    /// | Operation | `rt := (ra.p·rc.p + rb.p, ra.p·rc.s + rb.s)` |
    /// | Syntax    | `fxcpmadd rt, ra, rc, rb`                    |
    FXCPMADD(FpRef, FpRef, FpRef, FpRef),

    /// Floating cross-copy (secondary) multiply-add.
    ///
    /// | Operation | `rt := (ra.s·rc.p + rb.p, ra.s·rc.s + rb.s)` |
    /// | Syntax    | `fxcsmadd rt, ra, rc, rb`                    |
    FXCSMADD(FpRef, FpRef, FpRef, FpRef),

    /// Floating cross multiply-add, slot-exchanged.
    ///
    /// | Operation | `rt := (ra.s·rc.s + rb.p, ra.s·rc.p + rb.s)` |
    /// | Syntax    | `fxcxma rt, ra, rc, rb`                      |
    FXCXMA(FpRef, FpRef, FpRef, FpRef),

    /// Floating cross multiply.
    ///
    /// | Operation | `rt := (ra.s·rc.p, ra.p·rc.s)` |
    /// | Syntax    | `fxmul rt, ra, rc`             |
    FXMUL(FpRef, FpRef, FpRef),

    /// Floating copy-primary multiply.
    ///
    /// | Operation | `rt := (ra.p·rc.p, ra.p·rc.s)` |
    /// | Syntax    | `fxpmul rt, ra, rc`            |
    FXPMUL(FpRef, FpRef, FpRef),

    /// Floating copy-secondary multiply.
    ///
    /// | Operation | `rt := (ra.s·rc.p, ra.s·rc.s)` |
    /// | Syntax    | `fxsmul rt, ra, rc`            |
    FXSMUL(FpRef, FpRef, FpRef),

    /// Floating parallel add.
    ///
    /// | Operation | `rt := (ra.p + rb.p, ra.s + rb.s)` |
    /// | Syntax    | `fpadd rt, ra, rb`                 |
    FPADD(FpRef, FpRef, FpRef),

    /// Floating move register, primary slot only; the secondary slot of the
    /// target is preserved.
    FMR(FpRef, FpRef),

    /// Paired load, 16-byte aligned: `frt := (mem[ea], mem[ea+1])`.
    LFPD(FpRef, IntRegister, i64),

    /// Paired load with update: as `lfpd`, then `ra := ea` (bytes).
    LFPDU(FpRef, IntRegister, i64),

    /// Paired load, indexed form.
    LFPDX(FpRef, IntRegister, IntRegister),

    /// Paired load, indexed form with update.
    LFPDUX(FpRef, IntRegister, IntRegister),

    /// Paired load with slots exchanged, indexed form with update:
    /// `frt := (mem[ea+1], mem[ea])`.
    LFXDUX(FpRef, IntRegister, IntRegister),

    /// Single-double load into the primary slot; secondary preserved.
    LFD(FpRef, IntRegister, i64),

    /// Single-double load into the primary slot, with update.
    LFDU(FpRef, IntRegister, i64),

    /// Single-double load into the primary slot, indexed form.
    LFDX(FpRef, IntRegister, IntRegister),

    /// Single-double load into the primary slot, indexed form with update.
    LFDUX(FpRef, IntRegister, IntRegister),

    /// Single-double load into the secondary slot; primary preserved.
    LFSDX(FpRef, IntRegister, IntRegister),

    /// Single-double load into the secondary slot, with update.
    LFSDUX(FpRef, IntRegister, IntRegister),

    /// Paired store with update: `mem[ea] := frs.p; mem[ea+1] := frs.s;
    /// ra := ea` (bytes).
    STFPDUX(FpRef, IntRegister, IntRegister),

    /// Paired store with slots exchanged, with update:
    /// `mem[ea] := frs.s; mem[ea+1] := frs.p`.
    STFXDUX(FpRef, IntRegister, IntRegister),

    /// Single-double store of the primary slot: `mem[ea] := frs.p`.
    STFDX(FpRef, IntRegister, IntRegister),

    /// Single-double store of the secondary slot: `mem[ea] := frs.s`.
    STFSDX(FpRef, IntRegister, IntRegister),

    /// Load an immediate paired value. Not a real opcode; handy for test
    /// prologues. Participates in hazards like a one-cycle FP op.
    FPSET2(FpRef, f64, f64),

    /// Load an immediate integer. Not a real opcode.
    INTSET(IntRegister, i64),

    /// No operation; occupies the FP unit for one cycle.
    NOP,

    /// Dump the machine state to the trace sink. Not a real opcode and
    /// occupies no functional unit.
    INSPECT,
}

impl Opcode {
    /// Lowercase mnemonic, as it appears in assembly text.
    pub const fn name(&self) -> &'static str {
        use Opcode::*;

        match self {
            FXCPMADD(..) => "fxcpmadd",
            FXCSMADD(..) => "fxcsmadd",
            FXCXMA(..) => "fxcxma",
            FXMUL(..) => "fxmul",
            FXPMUL(..) => "fxpmul",
            FXSMUL(..) => "fxsmul",
            FPADD(..) => "fpadd",
            FMR(..) => "fmr",
            LFPD(..) => "lfpd",
            LFPDU(..) => "lfpdu",
            LFPDX(..) => "lfpdx",
            LFPDUX(..) => "lfpdux",
            LFXDUX(..) => "lfxdux",
            LFD(..) => "lfd",
            LFDU(..) => "lfdu",
            LFDX(..) => "lfdx",
            LFDUX(..) => "lfdux",
            LFSDX(..) => "lfsdx",
            LFSDUX(..) => "lfsdux",
            STFPDUX(..) => "stfpdux",
            STFXDUX(..) => "stfxdux",
            STFDX(..) => "stfdx",
            STFSDX(..) => "stfsdx",
            FPSET2(..) => "fpset2",
            INTSET(..) => "intset",
            NOP => "nop",
            INSPECT => "inspect",
        }
    }

    /// Functional unit the opcode occupies. Only `inspect` has none.
    pub const fn unit(&self) -> Option<ExecUnit> {
        use Opcode::*;

        match self {
            FXCPMADD(..) | FXCSMADD(..) | FXCXMA(..) | FXMUL(..) | FXPMUL(..)
            | FXSMUL(..) | FPADD(..) | FMR(..) | FPSET2(..) | NOP => Some(ExecUnit::Fp),
            INTSET(..) => Some(ExecUnit::Int),
            LFPD(..) | LFPDU(..) | LFPDX(..) | LFPDUX(..) | LFXDUX(..) | LFD(..)
            | LFDU(..) | LFDX(..) | LFDUX(..) | LFSDX(..) | LFSDUX(..)
            | STFPDUX(..) | STFXDUX(..) | STFDX(..) | STFSDX(..) => Some(ExecUnit::Ls),
            INSPECT => None,
        }
    }

    /// Result latency in cycles: how long the written registers stay hazarded.
    pub const fn latency(&self) -> u32 {
        use Opcode::*;

        match self {
            FXCPMADD(..) | FXCSMADD(..) | FXCXMA(..) | FXMUL(..) | FXPMUL(..)
            | FXSMUL(..) | FPADD(..) => FP_LATENCY,
            FMR(..) | FPSET2(..) | INTSET(..) | NOP => 1,
            LFPD(..) | LFPDU(..) | LFPDX(..) | LFPDUX(..) | LFXDUX(..) | LFD(..)
            | LFDU(..) | LFDX(..) | LFDUX(..) | LFSDX(..) | LFSDUX(..) => LOAD_LATENCY,
            STFPDUX(..) | STFXDUX(..) | STFDX(..) | STFSDX(..) => STORE_LATENCY,
            INSPECT => 0,
        }
    }

    /// Inverse throughput in cycles: minimum spacing before the functional
    /// unit accepts another instruction.
    pub const fn inv_throughput(&self) -> u32 {
        use Opcode::*;

        match self {
            LFPD(..) | LFPDU(..) | LFPDX(..) | LFPDUX(..) | LFXDUX(..) | LFD(..)
            | LFDU(..) | LFDX(..) | LFDUX(..) | LFSDX(..) | LFSDUX(..) => LOAD_THROUGHPUT,
            STFPDUX(..) | STFXDUX(..) | STFDX(..) | STFSDX(..) => STORE_CYCLES,
            _ => 1,
        }
    }

    /// Bytes pushed into the write-through queue at issue; zero for
    /// everything but stores.
    pub const fn writethrough(&self) -> u32 {
        use Opcode::*;

        match self {
            STFPDUX(..) | STFXDUX(..) => STORE_WRITETHROUGH,
            STFDX(..) | STFSDX(..) => SINGLE_STORE_WRITETHROUGH,
            _ => 0,
        }
    }

    /// Architectural floating-point read set.
    pub fn reads(&self) -> Vec<FpRef> {
        use Opcode::*;

        match self {
            FXCPMADD(_, ra, rc, rb) | FXCSMADD(_, ra, rc, rb) | FXCXMA(_, ra, rc, rb) => {
                vec![ra.clone(), rc.clone(), rb.clone()]
            }
            FXMUL(_, ra, rc) | FXPMUL(_, ra, rc) | FXSMUL(_, ra, rc) => {
                vec![ra.clone(), rc.clone()]
            }
            FPADD(_, ra, rb) => vec![ra.clone(), rb.clone()],
            FMR(_, frb) => vec![frb.clone()],
            STFPDUX(frs, ..) | STFXDUX(frs, ..) | STFDX(frs, ..) | STFSDX(frs, ..) => {
                vec![frs.clone()]
            }
            _ => Vec::new(),
        }
    }

    /// Architectural floating-point write set.
    pub fn writes(&self) -> Vec<FpRef> {
        use Opcode::*;

        match self {
            FXCPMADD(rt, ..) | FXCSMADD(rt, ..) | FXCXMA(rt, ..) | FXMUL(rt, ..)
            | FXPMUL(rt, ..) | FXSMUL(rt, ..) | FPADD(rt, ..) | FMR(rt, ..)
            | FPSET2(rt, ..) => vec![rt.clone()],
            LFPD(frt, ..) | LFPDU(frt, ..) | LFPDX(frt, ..) | LFPDUX(frt, ..)
            | LFXDUX(frt, ..) | LFD(frt, ..) | LFDU(frt, ..) | LFDX(frt, ..)
            | LFDUX(frt, ..) | LFSDX(frt, ..) | LFSDUX(frt, ..) => vec![frt.clone()],
            _ => Vec::new(),
        }
    }

    /// Integer read set.
    pub fn ireads(&self) -> Vec<IntRegister> {
        use Opcode::*;

        match self {
            LFPD(_, ra, _) | LFPDU(_, ra, _) | LFD(_, ra, _) | LFDU(_, ra, _) => vec![*ra],
            LFPDX(_, ra, rb) | LFPDUX(_, ra, rb) | LFXDUX(_, ra, rb) | LFDX(_, ra, rb)
            | LFDUX(_, ra, rb) | LFSDX(_, ra, rb) | LFSDUX(_, ra, rb)
            | STFPDUX(_, ra, rb) | STFXDUX(_, ra, rb) | STFDX(_, ra, rb)
            | STFSDX(_, ra, rb) => vec![*ra, *rb],
            _ => Vec::new(),
        }
    }

    /// Integer write set. Kept separate from the FP write set; the
    /// base-register writeback of `u` forms lands here.
    pub fn iwrites(&self) -> Vec<IntRegister> {
        use Opcode::*;

        match self {
            LFPDU(_, ra, _) | LFPDUX(_, ra, _) | LFXDUX(_, ra, _) | LFDU(_, ra, _)
            | LFDUX(_, ra, _) | LFSDUX(_, ra, _) | STFPDUX(_, ra, _)
            | STFXDUX(_, ra, _) => vec![*ra],
            INTSET(ra, _) => vec![*ra],
            _ => Vec::new(),
        }
    }

    /// In-use latencies of the FP register the load/store unit touches, if
    /// any. The register is unavailable to FP operations without being a
    /// read/write hazard, and without occupying the FP unit.
    pub fn inuse(&self) -> Option<(FpRef, InUse)> {
        use Opcode::*;

        match self {
            LFPD(frt, ..) | LFPDU(frt, ..) | LFPDX(frt, ..) | LFPDUX(frt, ..)
            | LFXDUX(frt, ..) | LFD(frt, ..) | LFDU(frt, ..) | LFDX(frt, ..)
            | LFDUX(frt, ..) | LFSDX(frt, ..) | LFSDUX(frt, ..) => Some((
                frt.clone(),
                InUse {
                    src: FPREG_LOAD_SOURCE_LATENCY,
                    dst: FPREG_LOAD_DEST_LATENCY,
                },
            )),
            STFPDUX(frs, ..) | STFXDUX(frs, ..) | STFDX(frs, ..) | STFSDX(frs, ..) => Some((
                frs.clone(),
                InUse {
                    src: FPREG_STORE_SOURCE_LATENCY,
                    dst: FPREG_STORE_DEST_LATENCY,
                },
            )),
            _ => None,
        }
    }

    /// Whether this is a pseudo-instruction used for prologues and debugging
    /// rather than a real opcode. Pragmatics still carry unit and latency and
    /// participate in hazards; the assembly view suppresses them.
    pub const fn is_pragmatic(&self) -> bool {
        use Opcode::*;

        matches!(self, FPSET2(..) | INTSET(..) | NOP | INSPECT)
    }

    /// Floating-point operands in declared operand order, as the assembly
    /// view renders them.
    pub fn fp_operands(&self) -> Vec<FpRef> {
        use Opcode::*;

        match self {
            FXCPMADD(rt, ra, rc, rb) | FXCSMADD(rt, ra, rc, rb) | FXCXMA(rt, ra, rc, rb) => {
                vec![rt.clone(), ra.clone(), rc.clone(), rb.clone()]
            }
            FXMUL(rt, ra, rc) | FXPMUL(rt, ra, rc) | FXSMUL(rt, ra, rc)
            | FPADD(rt, ra, rc) => vec![rt.clone(), ra.clone(), rc.clone()],
            FMR(frt, frb) => vec![frt.clone(), frb.clone()],
            FPSET2(frt, ..) => vec![frt.clone()],
            _ => {
                let mut ops = self.writes();
                if ops.is_empty() {
                    ops = self.reads();
                }
                ops
            }
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Opcode::*;

        match self {
            FXCPMADD(rt, ra, rc, rb) | FXCSMADD(rt, ra, rc, rb) | FXCXMA(rt, ra, rc, rb) => {
                write!(f, "{}(rt={rt}, ra={ra}, rc={rc}, rb={rb})", self.name())
            }
            FXMUL(rt, ra, rc) | FXPMUL(rt, ra, rc) | FXSMUL(rt, ra, rc) => {
                write!(f, "{}(rt={rt}, ra={ra}, rc={rc})", self.name())
            }
            FPADD(rt, ra, rb) => write!(f, "fpadd(rt={rt}, ra={ra}, rb={rb})"),
            FMR(frt, frb) => write!(f, "fmr(frt={frt}, frb={frb})"),
            LFPD(frt, ra, d) | LFPDU(frt, ra, d) | LFD(frt, ra, d) | LFDU(frt, ra, d) => {
                write!(f, "{}(frt={frt}, ra={ra}, d={d})", self.name())
            }
            LFPDX(frt, ra, rb) | LFPDUX(frt, ra, rb) | LFXDUX(frt, ra, rb)
            | LFDX(frt, ra, rb) | LFDUX(frt, ra, rb) | LFSDX(frt, ra, rb)
            | LFSDUX(frt, ra, rb) => {
                write!(f, "{}(frt={frt}, ra={ra}, rb={rb})", self.name())
            }
            STFPDUX(frs, ra, rb) | STFXDUX(frs, ra, rb) | STFDX(frs, ra, rb)
            | STFSDX(frs, ra, rb) => {
                write!(f, "{}(frs={frs}, ra={ra}, rb={rb})", self.name())
            }
            FPSET2(frt, p, s) => write!(f, "fpset2(frt={frt}, p={p}, s={s})"),
            INTSET(ra, v) => write!(f, "intset(ra={ra}, v={v})"),
            NOP => f.write_str("nop()"),
            INSPECT => f.write_str("inspect()"),
        }
    }
}
