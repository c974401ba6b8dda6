use hummer_asm::{FpRef, FpRegister, FpVal, Opcode};

use super::Interpreter;
use crate::consts::DOUBLE_SIZE;
use crate::error::InterpreterError;
use crate::pipeline::Scoreboard;

impl Interpreter {
    /// Issue `code` in order.
    pub fn execute<'a, I>(&mut self, code: I) -> Result<(), InterpreterError>
    where
        I: IntoIterator<Item = &'a Opcode>,
    {
        for op in code {
            self.execute_one(op)?;
        }
        Ok(())
    }

    /// Stall until every resource `op` needs is simultaneously free, then
    /// issue it. Issue itself is zero-cost: the cycle counter only advances
    /// while stalled.
    pub fn execute_one(&mut self, op: &Opcode) -> Result<(), InterpreterError> {
        self.stall_until_ready(op)?;

        self.apply(op)?;

        tracing::trace!(cycle = self.cycle, "issue {op}");
        if !self.trace.is_silent() {
            let line = op.to_string();
            let cycle = self.cycle;
            self.trace.instruction(cycle, line);
        }

        self.counters.bump(op.unit());
        if let Some(unit) = op.unit() {
            self.units.set(unit, op.inv_throughput());
        }
        let latency = op.latency();
        for reg in op.writes() {
            let phys = self.resolve_fp(&reg, true)?;
            self.hazards.set(phys, latency);
        }
        if let Some((reg, inuse)) = op.inuse() {
            let phys = self.resolve_fp(&reg, true)?;
            self.inuse_src.set(phys, inuse.src);
            self.inuse_dst.set(phys, inuse.dst);
        }
        self.writethrough.issue(op.writethrough())?;

        Ok(())
    }

    /// Current issue cost of `op`: the maximum of the five stall values,
    /// without issuing and without allocating registers. An unbound read
    /// label is an error; an unbound write label contributes no stall, since
    /// a freshly allocated register cannot be counting down.
    pub fn cost(&mut self, op: &Opcode) -> Result<u32, InterpreterError> {
        let unit = op.unit().map_or(0, |u| self.units.stall([u]));

        let reads = self.resolve_refs(&op.reads(), false)?;
        let hazard = self.hazards.stall(reads.iter().copied());
        let src = self.inuse_src.stall(reads.iter().copied());

        let mut writes = Vec::new();
        for reg in op.writes() {
            match self.resolve_fp(&reg, false) {
                Ok(phys) => writes.push(phys),
                Err(InterpreterError::UnknownLabel { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        let dst = self.inuse_dst.stall(writes);

        let wt = self.writethrough.stall(op.writethrough());

        Ok(unit.max(hazard).max(src).max(dst).max(wt))
    }

    /// Advance one cycle, retiring every countdown table.
    pub fn next_cycle(&mut self) {
        self.cycle += 1;
        self.hazards.retire(1);
        self.units.retire(1);
        self.inuse_src.retire(1);
        self.inuse_dst.retire(1);
        self.writethrough.retire(1);
    }

    fn stall_until_ready(&mut self, op: &Opcode) -> Result<(), InterpreterError> {
        loop {
            if let Some(unit) = op.unit() {
                if self.units.stall([unit]) > 0 {
                    self.stall_diagnostic(format!("instruction unit in use: {unit}"));
                    self.next_cycle();
                    continue;
                }
            }

            let read_refs = op.reads();
            let reads = self.resolve_refs(&read_refs, true)?;
            if self.hazards.stall(reads.iter().copied()) > 0 {
                let msg = conflict_diagnostic("register hazards", &read_refs, &reads, &self.hazards);
                self.stall_diagnostic(msg);
                self.next_cycle();
                continue;
            }
            if self.inuse_src.stall(reads.iter().copied()) > 0 {
                let msg =
                    conflict_diagnostic("source registers in use", &read_refs, &reads, &self.inuse_src);
                self.stall_diagnostic(msg);
                self.next_cycle();
                continue;
            }

            let write_refs = op.writes();
            let writes = self.resolve_refs(&write_refs, true)?;
            if self.inuse_dst.stall(writes.iter().copied()) > 0 {
                let msg = conflict_diagnostic(
                    "destination registers in use",
                    &write_refs,
                    &writes,
                    &self.inuse_dst,
                );
                self.stall_diagnostic(msg);
                self.next_cycle();
                continue;
            }

            if self.writethrough.stall(op.writethrough()) > 0 {
                self.stall_diagnostic("write-through queue full".to_owned());
                self.next_cycle();
                continue;
            }

            return Ok(());
        }
    }

    fn stall_diagnostic(&mut self, msg: String) {
        tracing::trace!(cycle = self.cycle, "{msg}");
        if !self.trace.is_silent() {
            let cycle = self.cycle;
            self.trace.diagnostic(cycle, msg);
        }
    }

    fn apply(&mut self, op: &Opcode) -> Result<(), InterpreterError> {
        use Opcode::*;

        match op {
            FXCPMADD(rt, ra, rc, rb) => self.fp_ternary(rt, ra, rc, rb, |a, c, b| {
                FpVal::new(a.p * c.p + b.p, a.p * c.s + b.s)
            }),
            FXCSMADD(rt, ra, rc, rb) => self.fp_ternary(rt, ra, rc, rb, |a, c, b| {
                FpVal::new(a.s * c.p + b.p, a.s * c.s + b.s)
            }),
            FXCXMA(rt, ra, rc, rb) => self.fp_ternary(rt, ra, rc, rb, |a, c, b| {
                FpVal::new(a.s * c.s + b.p, a.s * c.p + b.s)
            }),
            FXMUL(rt, ra, rc) => {
                self.fp_binary(rt, ra, rc, |a, c| FpVal::new(a.s * c.p, a.p * c.s))
            }
            FXPMUL(rt, ra, rc) => {
                self.fp_binary(rt, ra, rc, |a, c| FpVal::new(a.p * c.p, a.p * c.s))
            }
            FXSMUL(rt, ra, rc) => {
                self.fp_binary(rt, ra, rc, |a, c| FpVal::new(a.s * c.p, a.s * c.s))
            }
            FPADD(rt, ra, rb) => {
                self.fp_binary(rt, ra, rb, |a, b| FpVal::new(a.p + b.p, a.s + b.s))
            }
            FMR(frt, frb) => {
                let b = self.fp_value(frb)?;
                let t = self.fp_value(frt)?;
                self.set_fp(frt, FpVal::new(b.p, t.s))
            }

            LFPD(frt, ra, d) => {
                let ea = self.fp_effective_addr_aligned(*ra, *d)?;
                let (p, s) = self.load_pair(ea)?;
                self.set_fp(frt, FpVal::new(p, s))
            }
            LFPDU(frt, ra, d) => {
                let ea = self.fp_effective_addr_aligned(*ra, *d)?;
                let (p, s) = self.load_pair(ea)?;
                self.set_fp(frt, FpVal::new(p, s))?;
                self.set_int(*ra, ea as i64 * DOUBLE_SIZE);
                Ok(())
            }
            LFPDX(frt, ra, rb) => {
                let ea = self.fp_effective_addr_aligned(*ra, self.int_value(*rb))?;
                let (p, s) = self.load_pair(ea)?;
                self.set_fp(frt, FpVal::new(p, s))
            }
            LFPDUX(frt, ra, rb) => {
                let ea = self.fp_effective_addr_aligned(*ra, self.int_value(*rb))?;
                let (p, s) = self.load_pair(ea)?;
                self.set_fp(frt, FpVal::new(p, s))?;
                self.set_int(*ra, ea as i64 * DOUBLE_SIZE);
                Ok(())
            }
            LFXDUX(frt, ra, rb) => {
                let ea = self.fp_effective_addr_aligned(*ra, self.int_value(*rb))?;
                let (p, s) = self.load_pair(ea)?;
                self.set_fp(frt, FpVal::new(s, p))?;
                self.set_int(*ra, ea as i64 * DOUBLE_SIZE);
                Ok(())
            }

            LFD(frt, ra, d) => {
                let ea = self.fp_effective_addr(*ra, *d)?;
                let old = self.fp_value(frt)?;
                self.set_fp(frt, FpVal::new(self.mem[ea], old.s))
            }
            LFDU(frt, ra, d) => {
                let ea = self.fp_effective_addr(*ra, *d)?;
                let old = self.fp_value(frt)?;
                self.set_fp(frt, FpVal::new(self.mem[ea], old.s))?;
                self.set_int(*ra, ea as i64 * DOUBLE_SIZE);
                Ok(())
            }
            LFDX(frt, ra, rb) => {
                let ea = self.fp_effective_addr(*ra, self.int_value(*rb))?;
                let old = self.fp_value(frt)?;
                self.set_fp(frt, FpVal::new(self.mem[ea], old.s))
            }
            LFDUX(frt, ra, rb) => {
                let ea = self.fp_effective_addr(*ra, self.int_value(*rb))?;
                let old = self.fp_value(frt)?;
                self.set_fp(frt, FpVal::new(self.mem[ea], old.s))?;
                self.set_int(*ra, ea as i64 * DOUBLE_SIZE);
                Ok(())
            }
            LFSDX(frt, ra, rb) => {
                let ea = self.fp_effective_addr(*ra, self.int_value(*rb))?;
                let old = self.fp_value(frt)?;
                self.set_fp(frt, FpVal::new(old.p, self.mem[ea]))
            }
            LFSDUX(frt, ra, rb) => {
                let ea = self.fp_effective_addr(*ra, self.int_value(*rb))?;
                let old = self.fp_value(frt)?;
                self.set_fp(frt, FpVal::new(old.p, self.mem[ea]))?;
                self.set_int(*ra, ea as i64 * DOUBLE_SIZE);
                Ok(())
            }

            STFPDUX(frs, ra, rb) => {
                let ea = self.fp_effective_addr(*ra, self.int_value(*rb))?;
                let v = self.fp_value(frs)?;
                self.store_pair(ea, v.p, v.s)?;
                self.set_int(*ra, ea as i64 * DOUBLE_SIZE);
                Ok(())
            }
            STFXDUX(frs, ra, rb) => {
                let ea = self.fp_effective_addr(*ra, self.int_value(*rb))?;
                let v = self.fp_value(frs)?;
                self.store_pair(ea, v.s, v.p)?;
                self.set_int(*ra, ea as i64 * DOUBLE_SIZE);
                Ok(())
            }
            STFDX(frs, ra, rb) => {
                let ea = self.fp_effective_addr(*ra, self.int_value(*rb))?;
                let v = self.fp_value(frs)?;
                self.mem[ea] = v.p;
                Ok(())
            }
            STFSDX(frs, ra, rb) => {
                let ea = self.fp_effective_addr(*ra, self.int_value(*rb))?;
                let v = self.fp_value(frs)?;
                self.mem[ea] = v.s;
                Ok(())
            }

            FPSET2(frt, p, s) => self.set_fp(frt, FpVal::new(*p, *s)),
            INTSET(ra, v) => {
                self.set_int(*ra, *v);
                Ok(())
            }
            NOP => Ok(()),
            INSPECT => {
                let dump = self.state_dump();
                let cycle = self.cycle;
                self.trace.diagnostic(cycle, dump);
                Ok(())
            }
        }
    }
}

/// `label: (ref:phys,cycles), ...` over the refs present in `board`, in
/// operand order.
fn conflict_diagnostic(
    label: &str,
    refs: &[FpRef],
    resolved: &[FpRegister],
    board: &Scoreboard<FpRegister>,
) -> String {
    let parts = refs
        .iter()
        .zip(resolved)
        .filter_map(|(r, phys)| board.get(phys).map(|cycles| format!("({r}:{phys},{cycles})")))
        .collect::<Vec<_>>();
    format!("{label}: {}", parts.join(", "))
}
