//! C inline-assembly rendering of scheduled code.
//!
//! Each instruction becomes one `asm volatile` statement for embedding in a
//! host C program. Floating-point operands render as resolved physical
//! register numbers; load/store base and index registers render as
//! constraints on the C variables that hold them. Pragmatic
//! pseudo-instructions are suppressed.

use std::collections::BTreeMap;

use hummer_asm::{IntRegister, Opcode};

use crate::error::InterpreterError;
use crate::interpreter::Interpreter;

/// Renderer over a core's register bindings.
pub struct AsmView<'a> {
    core: &'a Interpreter,
    c_vars: BTreeMap<IntRegister, String>,
}

impl<'a> AsmView<'a> {
    /// A view over `core`'s bindings with no C variables bound yet.
    pub fn new(core: &'a Interpreter) -> Self {
        Self {
            core,
            c_vars: BTreeMap::new(),
        }
    }

    /// Name the C variable that holds `reg` in the host program.
    pub fn bind_c_var(&mut self, reg: IntRegister, name: impl Into<String>) -> &mut Self {
        self.c_vars.insert(reg, name.into());
        self
    }

    /// Render `code` to one line per non-pragmatic instruction.
    pub fn render<'b, I>(&self, code: I) -> Result<Vec<String>, InterpreterError>
    where
        I: IntoIterator<Item = &'b Opcode>,
    {
        let mut lines = Vec::new();
        for op in code {
            if let Some(line) = self.line(op)? {
                lines.push(line);
            }
        }
        Ok(lines)
    }

    /// One `asm volatile` statement, or `None` for pragmatics.
    pub fn line(&self, op: &Opcode) -> Result<Option<String>, InterpreterError> {
        use Opcode::*;

        if op.is_pragmatic() {
            return Ok(None);
        }

        let name = op.name();

        // FP-class opcodes carry only FP operands: registers by number, with
        // a comment mapping each number back to the operand as written.
        if name.starts_with('f') {
            let refs = op.fp_operands();
            let mut nums = Vec::with_capacity(refs.len());
            let mut notes = Vec::with_capacity(refs.len());
            for r in &refs {
                let phys = self.core.resolve_fp_bound(r)?;
                nums.push(phys.num().to_string());
                notes.push(format!("{}:{r}", phys.num()));
            }
            return Ok(Some(format!(
                "    asm volatile(\"{name} {}\"); // {}",
                nums.join(", "),
                notes.join(", ")
            )));
        }

        match op {
            LFPD(frt, ra, d) | LFPDU(frt, ra, d) | LFD(frt, ra, d) | LFDU(frt, ra, d) => {
                let num = self.core.resolve_fp_bound(frt)?.num();
                let ra_var = self.c_var(*ra)?;
                let line = if op.iwrites().is_empty() {
                    format!("    asm volatile(\"{name} {num}, %0, {d}\"::\"b\" ({ra_var}));")
                } else {
                    format!("    asm volatile(\"{name} {num}, %0, {d}\":\"+b\" ({ra_var}));")
                };
                Ok(Some(line))
            }
            LFPDX(frt, ra, rb) | LFPDUX(frt, ra, rb) | LFXDUX(frt, ra, rb)
            | LFDX(frt, ra, rb) | LFDUX(frt, ra, rb) | LFSDX(frt, ra, rb)
            | LFSDUX(frt, ra, rb) | STFPDUX(frt, ra, rb) | STFXDUX(frt, ra, rb)
            | STFDX(frt, ra, rb) | STFSDX(frt, ra, rb) => {
                let num = self.core.resolve_fp_bound(frt)?.num();
                let ra_var = self.c_var(*ra)?;
                let rb_var = self.c_var(*rb)?;
                let line = if op.iwrites().is_empty() {
                    format!(
                        "    asm volatile(\"{name} {num}, %0, %1\"::\"b\" ({ra_var}),\"b\" ({rb_var}));"
                    )
                } else {
                    format!(
                        "    asm volatile(\"{name} {num}, %0, %1\":\"+b\" ({ra_var}):\"b\" ({rb_var}));"
                    )
                };
                Ok(Some(line))
            }
            // FP-class and pragmatic opcodes were handled above.
            _ => Ok(None),
        }
    }

    fn c_var(&self, reg: IntRegister) -> Result<&str, InterpreterError> {
        self.c_vars
            .get(&reg)
            .map(String::as_str)
            .ok_or(InterpreterError::NoCVariable { reg })
    }
}
