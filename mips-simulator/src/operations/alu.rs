use super::trap_overflow;
use crate::instruction::RFields;
use crate::math::split_halves;
use crate::Processor;

impl Processor {
    /// Add (with overflow)
    pub(crate) fn op_add(&mut self, r: RFields, output: &mut String) {
        let a = self.read_register(r.rs);
        let b = self.read_register(r.rt);

        match a.checked_add(b) {
            Some(value) => self.write_register(r.rd, value),
            None => trap_overflow("add", output),
        }
    }

    /// Add unsigned (no overflow)
    pub(crate) fn op_addu(&mut self, r: RFields) {
        let a = self.read_register(r.rs) as u32;
        let b = self.read_register(r.rt) as u32;
        self.write_register(r.rd, a.wrapping_add(b) as i32);
    }

    /// Subtract (with overflow)
    pub(crate) fn op_sub(&mut self, r: RFields, output: &mut String) {
        let a = self.read_register(r.rs);
        let b = self.read_register(r.rt);

        match a.checked_sub(b) {
            Some(value) => self.write_register(r.rd, value),
            None => trap_overflow("sub", output),
        }
    }

    /// Subtract unsigned (no overflow)
    pub(crate) fn op_subu(&mut self, r: RFields) {
        let a = self.read_register(r.rs) as u32;
        let b = self.read_register(r.rt) as u32;
        self.write_register(r.rd, a.wrapping_sub(b) as i32);
    }

    /// Multiply. HI gets the upper half of the product, LO the lower.
    pub(crate) fn op_mult(&mut self, r: RFields) {
        let a = self.read_register(r.rs) as i64;
        let b = self.read_register(r.rt) as i64;
        self.set_hi_lo(split_halves((a * b) as u64));
    }

    /// Multiply unsigned
    pub(crate) fn op_multu(&mut self, r: RFields) {
        let a = self.read_register(r.rs) as u32 as u64;
        let b = self.read_register(r.rt) as u32 as u64;
        self.set_hi_lo(split_halves(a * b));
    }

    /// Divide. HI gets the remainder, LO the quotient. A zero divisor leaves
    /// both zero.
    pub(crate) fn op_div(&mut self, r: RFields) {
        let a = self.read_register(r.rs);
        let b = self.read_register(r.rt);

        if b == 0 {
            warn!("div by zero");
            self.set_hi_lo((0, 0));
        } else {
            self.set_hi_lo((a.wrapping_rem(b), a.wrapping_div(b)));
        }
    }

    /// Divide unsigned
    pub(crate) fn op_divu(&mut self, r: RFields) {
        let a = self.read_register(r.rs) as u32;
        let b = self.read_register(r.rt) as u32;

        if b == 0 {
            warn!("divu by zero");
            self.set_hi_lo((0, 0));
        } else {
            self.set_hi_lo(((a % b) as i32, (a / b) as i32));
        }
    }

    /// Shift left logical
    pub(crate) fn op_sll(&mut self, r: RFields) {
        let value = (self.read_register(r.rt) as u32) << r.shamt;
        self.write_register(r.rd, value as i32);
    }

    /// Shift right logical
    pub(crate) fn op_srl(&mut self, r: RFields) {
        let value = (self.read_register(r.rt) as u32) >> r.shamt;
        self.write_register(r.rd, value as i32);
    }

    /// Shift right arithmetic
    pub(crate) fn op_sra(&mut self, r: RFields) {
        let value = self.read_register(r.rt) >> r.shamt;
        self.write_register(r.rd, value);
    }

    /// Shift left logical variable
    pub(crate) fn op_sllv(&mut self, r: RFields) {
        let shift = self.shift_amount(r.rs);
        let value = (self.read_register(r.rt) as u32) << shift;
        self.write_register(r.rd, value as i32);
    }

    /// Shift right logical variable
    pub(crate) fn op_srlv(&mut self, r: RFields) {
        let shift = self.shift_amount(r.rs);
        let value = (self.read_register(r.rt) as u32) >> shift;
        self.write_register(r.rd, value as i32);
    }

    /// Shift right arithmetic variable
    pub(crate) fn op_srav(&mut self, r: RFields) {
        let shift = self.shift_amount(r.rs);
        let value = self.read_register(r.rt) >> shift;
        self.write_register(r.rd, value);
    }

    /// Set on less than (signed)
    pub(crate) fn op_slt(&mut self, r: RFields) {
        let a = self.read_register(r.rs);
        let b = self.read_register(r.rt);
        self.write_register(r.rd, (a < b) as i32);
    }

    /// Bitwise and
    pub(crate) fn op_and(&mut self, r: RFields) {
        let value = self.read_register(r.rs) & self.read_register(r.rt);
        self.write_register(r.rd, value);
    }

    /// Bitwise or
    pub(crate) fn op_or(&mut self, r: RFields) {
        let value = self.read_register(r.rs) | self.read_register(r.rt);
        self.write_register(r.rd, value);
    }

    /// Bitwise exclusive or
    pub(crate) fn op_xor(&mut self, r: RFields) {
        let value = self.read_register(r.rs) ^ self.read_register(r.rt);
        self.write_register(r.rd, value);
    }

    /// Bitwise nor
    pub(crate) fn op_nor(&mut self, r: RFields) {
        let value = !(self.read_register(r.rs) | self.read_register(r.rt));
        self.write_register(r.rd, value);
    }

    /// Move from HI
    pub(crate) fn op_mfhi(&mut self, r: RFields) {
        let value = self.memory.hi().read();
        self.write_register(r.rd, value);
    }

    /// Move from LO
    pub(crate) fn op_mflo(&mut self, r: RFields) {
        let value = self.memory.lo().read();
        self.write_register(r.rd, value);
    }

    /// The low five bits of a register, for variable shifts
    fn shift_amount(&self, register: u8) -> u32 {
        self.read_register(register) as u32 & 0x1F
    }

    fn set_hi_lo(&mut self, (hi, lo): (i32, i32)) {
        self.memory.hi().write(hi);
        self.memory.lo().write(lo);
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::instruction::RFields;
    use crate::Processor;
    use mips_types::constants::*;

    fn r(funct: u8, rs: u8, rt: u8, rd: u8, shamt: u8) -> RFields {
        RFields {
            op_code: OP_R_TYPE,
            rs,
            rt,
            rd,
            shamt,
            funct,
        }
    }

    fn processor_with(registers: &[(u8, i32)]) -> Processor {
        let mut processor = Processor::new(Config::default());
        for (number, value) in registers {
            processor.write_register(*number, *value);
        }
        processor
    }

    #[test]
    fn add_overflow_is_reported_and_not_committed() {
        let mut processor = processor_with(&[(8, i32::MAX), (9, 1), (10, 77)]);
        let mut output = String::new();
        processor.op_add(r(FUNCTION_ADD, 8, 9, 10, 0), &mut output);

        assert!(output.contains("overflow"));
        assert_eq!(processor.read_register(10), 77);
    }

    #[test]
    fn add_without_overflow() {
        let mut processor = processor_with(&[(8, -5), (9, 12)]);
        let mut output = String::new();
        processor.op_add(r(FUNCTION_ADD, 8, 9, 10, 0), &mut output);

        assert!(output.is_empty());
        assert_eq!(processor.read_register(10), 7);
    }

    #[test]
    fn sub_overflow() {
        let mut processor = processor_with(&[(8, i32::MIN), (9, 1)]);
        let mut output = String::new();
        processor.op_sub(r(FUNCTION_SUB, 8, 9, 10, 0), &mut output);

        assert_eq!(output, "overflow");
        assert_eq!(processor.read_register(10), 0);
    }

    #[test]
    fn unsigned_arithmetic_wraps() {
        let mut processor = processor_with(&[(8, -1), (9, 2)]);
        processor.op_addu(r(FUNCTION_ADDU, 8, 9, 10, 0));
        assert_eq!(processor.read_register(10), 1);

        processor.op_subu(r(FUNCTION_SUBU, 0, 9, 11, 0));
        assert_eq!(processor.read_register(11), -2);
    }

    #[test]
    fn mult_splits_signed_product() {
        let mut processor = processor_with(&[(8, -3), (9, 0x4000_0000)]);
        processor.op_mult(r(FUNCTION_MULT, 8, 9, 0, 0));

        let product = -3i64 * 0x4000_0000;
        assert_eq!(processor.memory.hi().read(), (product >> 32) as i32);
        assert_eq!(processor.memory.lo().read(), product as i32);
    }

    #[test]
    fn multu_splits_unsigned_product() {
        let mut processor = processor_with(&[(8, -1), (9, -1)]);
        processor.op_multu(r(FUNCTION_MULTU, 8, 9, 0, 0));

        // 0xFFFFFFFF * 0xFFFFFFFF = 0xFFFFFFFE_00000001
        assert_eq!(processor.memory.hi().read(), 0xFFFF_FFFEu32 as i32);
        assert_eq!(processor.memory.lo().read(), 1);
    }

    #[test]
    fn division() {
        let mut processor = processor_with(&[(8, -7), (9, 2)]);
        processor.op_div(r(FUNCTION_DIV, 8, 9, 0, 0));
        assert_eq!(processor.memory.lo().read(), -3);
        assert_eq!(processor.memory.hi().read(), -1);

        processor.op_divu(r(FUNCTION_DIVU, 8, 9, 0, 0));
        assert_eq!(processor.memory.lo().read(), (0xFFFF_FFF9u32 / 2) as i32);
        assert_eq!(processor.memory.hi().read(), 1);
    }

    #[test]
    fn division_by_zero_is_not_a_fault() {
        let mut processor = processor_with(&[(8, 10)]);
        processor.memory.hi().write(5);
        processor.memory.lo().write(6);
        processor.op_divu(r(FUNCTION_DIVU, 8, 9, 0, 0));
        assert_eq!(processor.memory.lo().read(), 0);
        assert_eq!(processor.memory.hi().read(), 0);

        processor.op_div(r(FUNCTION_DIV, 8, 9, 0, 0));
        assert_eq!(processor.memory.lo().read(), 0);
        assert_eq!(processor.memory.hi().read(), 0);
    }

    #[test]
    fn div_min_by_minus_one_wraps() {
        let mut processor = processor_with(&[(8, i32::MIN), (9, -1)]);
        processor.op_div(r(FUNCTION_DIV, 8, 9, 0, 0));
        assert_eq!(processor.memory.lo().read(), i32::MIN);
        assert_eq!(processor.memory.hi().read(), 0);
    }

    #[test]
    fn shifts() {
        let mut processor = processor_with(&[(8, -16), (9, 33)]);

        processor.op_sll(r(FUNCTION_SLL, 0, 8, 10, 2));
        assert_eq!(processor.read_register(10), -64);

        processor.op_srl(r(FUNCTION_SRL, 0, 8, 10, 28));
        assert_eq!(processor.read_register(10), 0xF);

        processor.op_sra(r(FUNCTION_SRA, 0, 8, 10, 2));
        assert_eq!(processor.read_register(10), -4);

        // Only the low five bits of $9 (33 -> 1) count
        processor.op_sllv(r(FUNCTION_SLLV, 9, 8, 10, 0));
        assert_eq!(processor.read_register(10), -32);

        processor.op_srlv(r(FUNCTION_SRLV, 9, 8, 10, 0));
        assert_eq!(processor.read_register(10), 0x7FFF_FFF8);

        processor.op_srav(r(FUNCTION_SRAV, 9, 8, 10, 0));
        assert_eq!(processor.read_register(10), -8);
    }

    #[test]
    fn set_on_less_than_is_signed() {
        let mut processor = processor_with(&[(8, -1), (9, 1)]);
        processor.op_slt(r(FUNCTION_SLT, 8, 9, 10, 0));
        assert_eq!(processor.read_register(10), 1);

        processor.op_slt(r(FUNCTION_SLT, 9, 8, 10, 0));
        assert_eq!(processor.read_register(10), 0);
    }

    #[test]
    fn bitwise() {
        let mut processor = processor_with(&[(8, 0b1100), (9, 0b1010)]);

        processor.op_and(r(FUNCTION_AND, 8, 9, 10, 0));
        assert_eq!(processor.read_register(10), 0b1000);
        processor.op_or(r(FUNCTION_OR, 8, 9, 10, 0));
        assert_eq!(processor.read_register(10), 0b1110);
        processor.op_xor(r(FUNCTION_XOR, 8, 9, 10, 0));
        assert_eq!(processor.read_register(10), 0b0110);
        processor.op_nor(r(FUNCTION_NOR, 8, 9, 10, 0));
        assert_eq!(processor.read_register(10), !0b1110);
    }

    #[test]
    fn move_from_hi_lo() {
        let mut processor = processor_with(&[]);
        processor.memory.hi().write(11);
        processor.memory.lo().write(22);

        processor.op_mfhi(r(FUNCTION_MFHI, 0, 0, 8, 0));
        processor.op_mflo(r(FUNCTION_MFLO, 0, 0, 9, 0));
        assert_eq!(processor.read_register(8), 11);
        assert_eq!(processor.read_register(9), 22);
    }

    #[test]
    fn writes_to_zero_are_discarded() {
        let mut processor = processor_with(&[(8, 3), (9, 4)]);
        let mut output = String::new();
        processor.op_add(r(FUNCTION_ADD, 8, 9, 0, 0), &mut output);
        assert_eq!(processor.read_register(0), 0);
    }
}
