use hummer_asm::{FpRef, FpVal, IntRegister};

use super::Interpreter;
use crate::error::InterpreterError;

impl Interpreter {
    pub(crate) fn fp_value(&mut self, reg: &FpRef) -> Result<FpVal, InterpreterError> {
        let phys = self.resolve_fp(reg, true)?;
        Ok(self.fp[phys.index()])
    }

    pub(crate) fn set_fp(&mut self, reg: &FpRef, val: FpVal) -> Result<(), InterpreterError> {
        let phys = self.resolve_fp(reg, true)?;
        self.fp[phys.index()] = val;
        Ok(())
    }

    pub(crate) fn int_value(&self, reg: IntRegister) -> i64 {
        self.int[reg.index()]
    }

    pub(crate) fn set_int(&mut self, reg: IntRegister, val: i64) {
        self.int[reg.index()] = val;
    }

    /// Two-source paired operation: `rt := f(ra, rc)`.
    pub(crate) fn fp_binary<F>(
        &mut self,
        rt: &FpRef,
        ra: &FpRef,
        rc: &FpRef,
        f: F,
    ) -> Result<(), InterpreterError>
    where
        F: FnOnce(FpVal, FpVal) -> FpVal,
    {
        let a = self.fp_value(ra)?;
        let c = self.fp_value(rc)?;
        self.set_fp(rt, f(a, c))
    }

    /// Three-source multiply-add: `rt := f(ra, rc, rb)`.
    pub(crate) fn fp_ternary<F>(
        &mut self,
        rt: &FpRef,
        ra: &FpRef,
        rc: &FpRef,
        rb: &FpRef,
        f: F,
    ) -> Result<(), InterpreterError>
    where
        F: FnOnce(FpVal, FpVal, FpVal) -> FpVal,
    {
        let a = self.fp_value(ra)?;
        let c = self.fp_value(rc)?;
        let b = self.fp_value(rb)?;
        self.set_fp(rt, f(a, c, b))
    }
}
