use super::trap_overflow;
use crate::instruction::IFields;
use crate::Processor;

impl Processor {
    /// Add immediate (with overflow)
    pub(crate) fn op_addi(&mut self, i: IFields, output: &mut String) {
        let a = self.read_register(i.rs);

        match a.checked_add(i.immediate as i32) {
            Some(value) => self.write_register(i.rt, value),
            None => trap_overflow("addi", output),
        }
    }

    /// Add immediate unsigned (no overflow)
    pub(crate) fn op_addiu(&mut self, i: IFields) {
        let value = self.read_register(i.rs).wrapping_add(i.immediate as i32);
        self.write_register(i.rt, value);
    }

    /// Set on less than immediate (signed)
    pub(crate) fn op_slti(&mut self, i: IFields) {
        let s = self.read_register(i.rs);
        self.write_register(i.rt, (s < i.immediate as i32) as i32);
    }

    /// Bitwise and immediate. The immediate is zero-extended.
    pub(crate) fn op_andi(&mut self, i: IFields) {
        let value = self.read_register(i.rs) & i.unsigned_immediate() as i32;
        self.write_register(i.rt, value);
    }

    /// Bitwise or immediate
    pub(crate) fn op_ori(&mut self, i: IFields) {
        let value = self.read_register(i.rs) | i.unsigned_immediate() as i32;
        self.write_register(i.rt, value);
    }

    /// Bitwise exclusive or immediate
    pub(crate) fn op_xori(&mut self, i: IFields) {
        let value = self.read_register(i.rs) ^ i.unsigned_immediate() as i32;
        self.write_register(i.rt, value);
    }
}
