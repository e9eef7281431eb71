use mips_types::registers::RegisterId;

/// A single 32-bit register
#[derive(Copy, Clone, Debug)]
pub struct Register {
    id: RegisterId,
    value: i32,
}

impl Register {
    pub fn new(id: RegisterId) -> Self {
        Register { id, value: 0 }
    }

    pub fn id(&self) -> RegisterId {
        self.id
    }

    /// Get the value of the register
    pub fn read(&self) -> i32 {
        self.value
    }

    /// Set the value of the register. Writes to `$zero` are discarded.
    pub fn write(&mut self, value: i32) {
        if self.id == RegisterId::General(0) {
            return;
        }

        self.value = value;
    }

    /// Reset the register to zero
    pub(crate) fn clear(&mut self) {
        self.value = 0;
    }
}

/// Holds the processor's registers
#[derive(Debug)]
pub struct Registers {
    general: [Register; 32],
    pub hi: Register,
    pub lo: Register,
    pub pc: Register,
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Registers {
    pub fn new() -> Self {
        let mut general = [Register::new(RegisterId::General(0)); 32];
        for (number, register) in general.iter_mut().enumerate() {
            register.id = RegisterId::General(number as u8);
        }

        Registers {
            general,
            hi: Register::new(RegisterId::Hi),
            lo: Register::new(RegisterId::Lo),
            pc: Register::new(RegisterId::Pc),
        }
    }

    /// Get a general register.
    ///
    /// Panics if `number` is not below 32. Instruction fields are 5 bits wide,
    /// so decoded register numbers always satisfy this.
    pub fn general(&self, number: u8) -> &Register {
        &self.general[number as usize]
    }

    pub fn general_mut(&mut self, number: u8) -> &mut Register {
        &mut self.general[number as usize]
    }

    /// Look a register up by identity
    pub fn get(&self, id: RegisterId) -> &Register {
        match id {
            RegisterId::General(number) => self.general(number),
            RegisterId::Pc => &self.pc,
            RegisterId::Hi => &self.hi,
            RegisterId::Lo => &self.lo,
        }
    }

    pub fn get_mut(&mut self, id: RegisterId) -> &mut Register {
        match id {
            RegisterId::General(number) => self.general_mut(number),
            RegisterId::Pc => &mut self.pc,
            RegisterId::Hi => &mut self.hi,
            RegisterId::Lo => &mut self.lo,
        }
    }

    /// All registers: general ones by number, then pc, hi, lo
    pub fn iter(&self) -> impl Iterator<Item = &Register> {
        self.general
            .iter()
            .chain(std::iter::once(&self.pc))
            .chain(std::iter::once(&self.hi))
            .chain(std::iter::once(&self.lo))
    }

    /// Zero every register
    pub fn clear(&mut self) {
        for register in self.general.iter_mut() {
            register.clear();
        }
        self.hi.clear();
        self.lo.clear();
        self.pc.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_register_is_hardwired() {
        let mut registers = Registers::new();
        registers.general_mut(0).write(42);
        assert_eq!(registers.general(0).read(), 0);
    }

    #[test]
    fn identities_are_fixed() {
        let registers = Registers::new();
        assert_eq!(registers.general(17).id(), RegisterId::General(17));
        assert_eq!(registers.get(RegisterId::Hi).id(), RegisterId::Hi);
        assert_eq!(registers.iter().count(), 35);
    }

    #[test]
    fn clear_zeroes_everything() {
        let mut registers = Registers::new();
        registers.general_mut(8).write(-1);
        registers.hi.write(3);
        registers.pc.write(0x0040_0000);
        registers.clear();
        assert!(registers.iter().all(|r| r.read() == 0));
    }
}
