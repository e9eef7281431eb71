use crate::memory::AddressSpace;
use crate::Processor;
use mips_types::constants::*;

impl Processor {
    /// Handle a syscall operation
    pub(crate) fn op_syscall(&mut self, output: &mut String) {
        match self.read_register(REG_V0) {
            SYSCALL_PRINT_INT => self.syscall_print_int(output),
            SYSCALL_PRINT_STR => self.syscall_print_str(output),
            SYSCALL_READ_INT => self.syscall_read_int(),
            SYSCALL_READ_STRING => self.syscall_read_str(),
            operation => warn!("Unknown syscall operation {}", operation),
        }
    }

    /// Print an integer
    fn syscall_print_int(&mut self, output: &mut String) {
        trace!("PRINT_INT");
        let value = self.read_register(REG_A0);
        output.push_str(&value.to_string());
    }

    /// Print a string
    fn syscall_print_str(&mut self, output: &mut String) {
        trace!("PRINT_STR");
        let str_address = self.read_register(REG_A0) as u32 as u64;
        let bytes = self.memory.c_string_at(str_address);
        output.push_str(&String::from_utf8_lossy(&bytes));
    }

    /// Read an integer from the input
    fn syscall_read_int(&mut self) {
        trace!("READ_INT");
        let line = match self.read_input_line() {
            Some(line) => line,
            None => return,
        };

        match line.trim().parse::<i32>() {
            Ok(value) => self.write_register(REG_V0, value),
            Err(_) => warn!("Input '{}' was not an integer", line),
        }
    }

    /// Read a line from the input into a null-terminated string
    fn syscall_read_str(&mut self) {
        trace!("READ_STR");
        let output_address = self.read_register(REG_A0) as u32 as u64;
        let max_length = self.read_register(REG_A1);

        if max_length < 1 {
            return;
        }

        // Only room for the null byte
        if max_length == 1 {
            self.store_bytes(output_address, &[0]);
            return;
        }

        let line = match self.read_input_line() {
            Some(line) => line,
            None => return,
        };

        if line.len() + 1 > max_length as usize {
            warn!(
                "Input of {} bytes does not fit in a buffer of {}",
                line.len(),
                max_length
            );
            return;
        }

        let mut bytes = line.into_bytes();
        bytes.push(0);
        self.store_bytes(output_address, &bytes);
    }

    /// One line of input without its line ending. `None` at end of input.
    fn read_input_line(&mut self) -> Option<String> {
        let mut buffer = String::new();

        match self.input.read_line(&mut buffer) {
            Ok(0) => {
                warn!("Reached the end of the program input");
                None
            }
            Ok(_) => {
                let line = buffer.trim_end_matches(&['\n', '\r'][..]);
                Some(line.to_string())
            }
            Err(error) => {
                warn!("Reading program input failed: {}", error);
                None
            }
        }
    }

    /// Store the bytes only if the whole range is writable
    fn store_bytes(&mut self, address: u64, bytes: &[u8]) {
        if !AddressSpace::is_accessible(address, bytes.len() as u64) {
            warn!(
                "Could not store program input: 0x{:08x}..0x{:08x} is not writable",
                address,
                address + bytes.len() as u64
            );
            return;
        }

        for (i, byte) in bytes.iter().enumerate() {
            match self.memory.byte_at(address + i as u64) {
                Ok(cell) => cell.write(*byte),
                Err(error) => {
                    warn!("Could not store program input: {}", error);
                    return;
                }
            }
        }
    }
}
