use crate::instruction::{IFields, JFields, RFields};
use crate::math::branch_target;
use crate::Processor;
use mips_types::constants::REG_RA;

impl Processor {
    /// Jump
    pub(crate) fn op_j(&mut self, j: JFields) {
        self.jump_to(j.address as i32);
    }

    /// Jump and link
    pub(crate) fn op_jal(&mut self, j: JFields) {
        let return_address = self.memory.pc().read().wrapping_add(4);
        self.write_register(REG_RA, return_address);
        self.jump_to(j.address as i32);
    }

    /// Jump register
    pub(crate) fn op_jr(&mut self, r: RFields) {
        let address = self.read_register(r.rs);
        self.jump_to(address);
    }

    /// Branch on equal
    pub(crate) fn op_beq(&mut self, i: IFields) {
        let taken = self.read_register(i.rs) == self.read_register(i.rt);
        self.branch(i, taken);
    }

    /// Branch on not equal
    pub(crate) fn op_bne(&mut self, i: IFields) {
        let taken = self.read_register(i.rs) != self.read_register(i.rt);
        self.branch(i, taken);
    }

    /// Branch on less than zero
    pub(crate) fn op_bltz(&mut self, i: IFields) {
        let taken = self.read_register(i.rs) < 0;
        self.branch(i, taken);
    }

    /// Branch on less than or equal to zero
    pub(crate) fn op_blez(&mut self, i: IFields) {
        let taken = self.read_register(i.rs) <= 0;
        self.branch(i, taken);
    }

    /// Branch on greater than zero
    pub(crate) fn op_bgtz(&mut self, i: IFields) {
        let taken = self.read_register(i.rs) > 0;
        self.branch(i, taken);
    }

    fn branch(&mut self, i: IFields, taken: bool) {
        let program_counter = self.memory.pc().read();
        let next = if taken {
            branch_target(program_counter, i.immediate)
        } else {
            program_counter.wrapping_add(4)
        };

        self.jump_to(next);
    }

    fn jump_to(&mut self, address: i32) {
        trace!("Jumping to 0x{:08x}", address);
        self.memory.pc().write(address);
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::instruction::{IFields, JFields, RFields};
    use crate::Processor;
    use mips_types::constants::*;

    fn i(op_code: u8, rs: u8, rt: u8, immediate: i16) -> IFields {
        IFields {
            op_code,
            rs,
            rt,
            immediate,
        }
    }

    fn pc(processor: &mut Processor) -> i32 {
        processor.memory.pc().read()
    }

    #[test]
    fn beq_taken_and_not_taken() {
        let mut processor = Processor::new(Config::default());
        processor.write_register(1, 9);
        processor.write_register(2, 9);
        processor.op_beq(i(OP_BEQ, 1, 2, 2));
        assert_eq!(pc(&mut processor), 0x0040_000C);

        processor.memory.pc().write(0x0040_0000);
        processor.write_register(2, 8);
        processor.op_beq(i(OP_BEQ, 1, 2, 2));
        assert_eq!(pc(&mut processor), 0x0040_0004);
    }

    #[test]
    fn bne_backwards() {
        let mut processor = Processor::new(Config::default());
        processor.memory.pc().write(0x0040_0010);
        processor.write_register(1, 1);
        processor.op_bne(i(OP_BNE, 1, 0, -3));
        assert_eq!(pc(&mut processor), 0x0040_0008);
    }

    #[test]
    fn compare_with_zero_branches() {
        let mut processor = Processor::new(Config::default());
        processor.write_register(8, -1);

        processor.op_bltz(i(OP_BLTZ, 8, 0, 1));
        assert_eq!(pc(&mut processor), 0x0040_0008);

        processor.op_bgtz(i(OP_BGTZ, 8, 0, 1));
        assert_eq!(pc(&mut processor), 0x0040_000C);

        processor.op_blez(i(OP_BLEZ, 0, 0, 4));
        assert_eq!(pc(&mut processor), 0x0040_0020);
    }

    #[test]
    fn jal_links_next_instruction() {
        let mut processor = Processor::new(Config::default());
        processor.memory.pc().write(0x0040_0008);
        processor.op_jal(JFields {
            op_code: OP_JAL,
            address: 0x0040_0100,
        });

        assert_eq!(pc(&mut processor), 0x0040_0100);
        assert_eq!(processor.read_register(REG_RA), 0x0040_000C);
    }

    #[test]
    fn j_and_jr() {
        let mut processor = Processor::new(Config::default());
        processor.op_j(JFields {
            op_code: OP_J,
            address: 0x0040_0040,
        });
        assert_eq!(pc(&mut processor), 0x0040_0040);

        processor.write_register(REG_RA, 0x0040_0004);
        processor.op_jr(RFields {
            op_code: OP_R_TYPE,
            rs: REG_RA,
            rt: 0,
            rd: 0,
            shamt: 0,
            funct: FUNCTION_JR,
        });
        assert_eq!(pc(&mut processor), 0x0040_0004);
    }
}
