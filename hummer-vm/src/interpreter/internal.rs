use hummer_asm::{FpRef, FpRegister};

use super::Interpreter;
use crate::error::InterpreterError;

impl Interpreter {
    /// Bind each `label -> physical register` pair and remove the physicals
    /// from the free pool. Rebinding either side differently is fatal.
    pub fn name_registers<I, S>(&mut self, bindings: I) -> Result<(), InterpreterError>
    where
        I: IntoIterator<Item = (S, FpRegister)>,
        S: Into<String>,
    {
        for (label, reg) in bindings {
            let label = label.into();

            if let Some(existing) = self.regnames.get(&label) {
                if *existing != reg {
                    return Err(InterpreterError::RegisterAlreadyBound { label, reg });
                }
            }
            let taken = self
                .regnames
                .iter()
                .any(|(bound, phys)| *phys == reg && *bound != label);
            if taken {
                return Err(InterpreterError::RegisterAlreadyBound { label, reg });
            }

            self.regnames.insert(label, reg);
            self.fppool.remove(&reg);
        }
        Ok(())
    }

    /// Pull the listed FP registers out of the free pool permanently. They
    /// never auto-allocate for a label.
    pub fn acquire_fpregisters<I>(&mut self, numbers: I) -> Vec<FpRegister>
    where
        I: IntoIterator<Item = u8>,
    {
        let regs: Vec<FpRegister> = numbers.into_iter().map(FpRegister::new).collect();
        for reg in &regs {
            self.fpeternal.insert(*reg);
            self.fppool.remove(reg);
        }
        regs
    }

    /// Resolve an operand reference to a physical register.
    ///
    /// Physical references are returned as-is (and withdrawn from the free
    /// pool). Symbolic references look up the binding map; with `allocate`
    /// the first reference pops the lowest-indexed free register and binds
    /// it, without it an unbound label is an error. An empty pool is fatal:
    /// there is no garbage collector to spill a binding.
    pub fn resolve_fp(&mut self, reg: &FpRef, allocate: bool) -> Result<FpRegister, InterpreterError> {
        match reg {
            FpRef::Phys(phys) => {
                self.fppool.remove(phys);
                Ok(*phys)
            }
            FpRef::Sym(label) => {
                if let Some(phys) = self.regnames.get(label) {
                    return Ok(*phys);
                }
                if !allocate {
                    return Err(InterpreterError::UnknownLabel {
                        label: label.clone(),
                    });
                }
                let phys = self.fppool.iter().next().copied().ok_or_else(|| {
                    InterpreterError::NoFreeRegister {
                        label: label.clone(),
                    }
                })?;
                self.fppool.remove(&phys);
                self.regnames.insert(label.clone(), phys);
                Ok(phys)
            }
        }
    }

    /// Resolve without touching allocator state; used by read-only
    /// consumers such as the assembly view.
    pub fn resolve_fp_bound(&self, reg: &FpRef) -> Result<FpRegister, InterpreterError> {
        match reg {
            FpRef::Phys(phys) => Ok(*phys),
            FpRef::Sym(label) => {
                self.regnames
                    .get(label)
                    .copied()
                    .ok_or_else(|| InterpreterError::UnknownLabel {
                        label: label.clone(),
                    })
            }
        }
    }

    pub(crate) fn resolve_refs(
        &mut self,
        refs: &[FpRef],
        allocate: bool,
    ) -> Result<Vec<FpRegister>, InterpreterError> {
        refs.iter().map(|r| self.resolve_fp(r, allocate)).collect()
    }
}
