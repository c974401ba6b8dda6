use hummer_asm::IntRegister;

use super::Interpreter;
use crate::consts::DOUBLE_SIZE;
use crate::error::InterpreterError;

impl Interpreter {
    /// Effective address in double units: `(ra + offset) / 8`, where the sum
    /// is a byte address that must be 8-byte aligned and in bounds.
    pub(crate) fn fp_effective_addr(
        &self,
        ra: IntRegister,
        offset: i64,
    ) -> Result<usize, InterpreterError> {
        let addr = self.int_value(ra) + offset;
        if addr % DOUBLE_SIZE != 0 {
            return Err(InterpreterError::MisalignedAddress { addr, align: 8 });
        }
        let index = addr / DOUBLE_SIZE;
        if index < 0 || index as usize >= self.mem.len() {
            return Err(InterpreterError::MemoryOverflow { index });
        }
        Ok(index as usize)
    }

    /// As [`Self::fp_effective_addr`], but for paired accesses: the double
    /// index must additionally be even (16-byte alignment).
    pub(crate) fn fp_effective_addr_aligned(
        &self,
        ra: IntRegister,
        offset: i64,
    ) -> Result<usize, InterpreterError> {
        let index = self.fp_effective_addr(ra, offset)?;
        if index % 2 != 0 {
            return Err(InterpreterError::MisalignedAddress {
                addr: index as i64 * DOUBLE_SIZE,
                align: 16,
            });
        }
        Ok(index)
    }

    pub(crate) fn load_pair(&self, ea: usize) -> Result<(f64, f64), InterpreterError> {
        if ea + 1 >= self.mem.len() {
            return Err(InterpreterError::MemoryOverflow {
                index: ea as i64 + 1,
            });
        }
        Ok((self.mem[ea], self.mem[ea + 1]))
    }

    pub(crate) fn store_pair(
        &mut self,
        ea: usize,
        first: f64,
        second: f64,
    ) -> Result<(), InterpreterError> {
        if ea + 1 >= self.mem.len() {
            return Err(InterpreterError::MemoryOverflow {
                index: ea as i64 + 1,
            });
        }
        self.mem[ea] = first;
        self.mem[ea + 1] = second;
        Ok(())
    }
}
