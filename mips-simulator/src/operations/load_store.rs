use crate::instruction::IFields;
use crate::math::effective_address;
use crate::Processor;

impl Processor {
    /// Load word
    pub(crate) fn op_lw(&mut self, i: IFields) {
        let address = self.address_of(i);

        match self.memory.word_at(address).map(|word| word.read()) {
            Ok(value) => self.write_register(i.rt, value),
            Err(error) => warn!("lw: {}", error),
        }
    }

    /// Store word
    pub(crate) fn op_sw(&mut self, i: IFields) {
        let address = self.address_of(i);
        let value = self.read_register(i.rt);

        if let Err(error) = self.memory.word_at(address).map(|mut word| word.write(value)) {
            warn!("sw: {}", error);
        }
    }

    /// Load byte (sign-extended)
    pub(crate) fn op_lb(&mut self, i: IFields) {
        let address = self.address_of(i);

        match self.memory.byte_at(address).map(|cell| cell.read()) {
            Ok(byte) => self.write_register(i.rt, byte as i8 as i32),
            Err(error) => warn!("lb: {}", error),
        }
    }

    /// Load byte unsigned
    pub(crate) fn op_lbu(&mut self, i: IFields) {
        let address = self.address_of(i);

        match self.memory.byte_at(address).map(|cell| cell.read()) {
            Ok(byte) => self.write_register(i.rt, byte as i32),
            Err(error) => warn!("lbu: {}", error),
        }
    }

    /// Store byte
    pub(crate) fn op_sb(&mut self, i: IFields) {
        let address = self.address_of(i);
        let value = self.read_register(i.rt) as u8;

        if let Err(error) = self.memory.byte_at(address).map(|cell| cell.write(value)) {
            warn!("sb: {}", error);
        }
    }

    /// Load upper immediate
    pub(crate) fn op_lui(&mut self, i: IFields) {
        let value = i.unsigned_immediate() << 16;
        self.write_register(i.rt, value as i32);
    }

    /// Base register plus the sign-extended offset
    fn address_of(&self, i: IFields) -> u64 {
        effective_address(self.read_register(i.rs), i.immediate)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::instruction::IFields;
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

    #[test]
    fn store_then_load_word() {
        let mut processor = Processor::new(Config::default());
        processor.write_register(8, 0x1000_0010);
        processor.write_register(9, -123_456);

        processor.op_sw(i(OP_SW, 8, 9, -4));
        processor.op_lw(i(OP_LW, 8, 10, -4));

        assert_eq!(processor.read_register(10), -123_456);
        assert_eq!(
            processor.memory.word_at(0x1000_000C).unwrap().read(),
            -123_456
        );
    }

    #[test]
    fn misaligned_word_access_is_skipped() {
        let mut processor = Processor::new(Config::default());
        processor.write_register(8, 0x1000_0001);
        processor.write_register(10, 42);

        processor.op_lw(i(OP_LW, 8, 10, 0));
        processor.op_sw(i(OP_SW, 8, 10, 0));

        assert_eq!(processor.read_register(10), 42);
        assert_eq!(processor.memory.all_bytes().count(), 0);
    }

    #[test]
    fn reserved_access_is_skipped() {
        let mut processor = Processor::new(Config::default());
        processor.write_register(10, 5);
        processor.op_lb(i(OP_LB, 0, 10, 0x10));
        assert_eq!(processor.read_register(10), 5);
    }

    #[test]
    fn byte_loads_extend() {
        let mut processor = Processor::new(Config::default());
        processor.write_register(8, 0x1000_0000);
        processor.write_register(9, 0x1234_56F0);

        processor.op_sb(i(OP_SB, 8, 9, 3));
        processor.op_lb(i(OP_LB, 8, 10, 3));
        processor.op_lbu(i(OP_LBU, 8, 11, 3));

        assert_eq!(processor.read_register(10), -16);
        assert_eq!(processor.read_register(11), 0xF0);
        assert_eq!(processor.memory.word_at(0x1000_0000).unwrap().read(), 0xF0);
    }

    #[test]
    fn lui_shifts_raw_immediate() {
        let mut processor = Processor::new(Config::default());
        processor.op_lui(i(OP_LUI, 0, 8, -0x7FF0));
        assert_eq!(processor.read_register(8), 0x8010_0000u32 as i32);
    }
}
