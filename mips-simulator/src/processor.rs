use crate::config::Config;
use crate::error::{Result, SimError};
use crate::instruction::{decode, DecodedInstruction, Instruction};
use crate::memory::AddressSpace;
use mips_types::constants::{GLOBAL_POINTER, REG_GP, REG_SP, STACK_START, TEXT_OFFSET};
use mips_types::registers::RegisterId;
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::{Debug, Formatter};
use std::io;
use std::io::BufRead;

/// Where the processor is in its lifecycle
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum State {
    /// No program loaded
    Idle,
    /// Program loaded, nothing executed yet
    Ready,
    Running,
    /// Past the last loaded instruction
    Halted,
}

/// A MIPS32 processor
pub struct Processor {
    config: Config,
    pub(crate) memory: AddressSpace,
    /// Source of program input for the read syscalls
    pub(crate) input: Box<dyn BufRead>,
    last_instruction: Option<DecodedInstruction>,
    output: String,
    hex: String,
    /// Address of the last loaded instruction word
    end_of_text: Option<u64>,
    steps: u64,
}

impl Processor {
    /// Create a processor which reads program input from stdin
    pub fn new(config: Config) -> Self {
        Self::with_input(config, io::BufReader::new(io::stdin()))
    }

    pub fn with_input<R: BufRead + 'static>(config: Config, input: R) -> Self {
        let mut processor = Processor {
            config,
            memory: AddressSpace::new(),
            input: Box::new(input),
            last_instruction: None,
            output: String::new(),
            hex: String::new(),
            end_of_text: None,
            steps: 0,
        };
        processor.reset();
        processor
    }

    /// Clear memory and registers and point the processor at the text segment
    pub fn reset(&mut self) {
        self.memory.clear();
        self.memory.pc().write(TEXT_OFFSET as i32);
        self.memory.register(REG_GP).write(GLOBAL_POINTER as i32);
        self.memory.register(REG_SP).write(STACK_START as i32);

        self.last_instruction = None;
        self.output.clear();
        self.hex.clear();
        self.end_of_text = None;
        self.steps = 0;
    }

    /// Write the instructions into consecutive words starting at the PC
    pub fn load_instructions(&mut self, words: &[u32]) -> Result<()> {
        let base = self.program_counter() as u64;

        for (i, word) in words.iter().enumerate() {
            let address = base + 4 * i as u64;
            self.memory.word_at(address)?.write(*word as i32);
            self.end_of_text = Some(address);
        }

        debug!("Loaded {} instructions at 0x{:08x}", words.len(), base);
        Ok(())
    }

    pub fn load_registers<I>(&mut self, registers: I)
    where
        I: IntoIterator<Item = (RegisterId, i32)>,
    {
        for (id, value) in registers {
            debug!("Setting {} = {}", id, value);
            self.memory.registers_mut().get_mut(id).write(value);
        }
    }

    /// Write words into main memory
    pub fn load_memory<I>(&mut self, words: I) -> Result<()>
    where
        I: IntoIterator<Item = (u64, i32)>,
    {
        for (address, value) in words {
            self.memory.word_at(address)?.write(value);
        }

        Ok(())
    }

    /// Write words into the data segment. Identical to `load_memory`.
    pub fn load_data<I>(&mut self, words: I) -> Result<()>
    where
        I: IntoIterator<Item = (u64, i32)>,
    {
        self.load_memory(words)
    }

    /// Whether the PC still points at or before the last loaded instruction
    pub fn has_next(&self) -> bool {
        match self.end_of_text {
            Some(end) => self.program_counter() as u64 <= end,
            None => false,
        }
    }

    pub fn state(&self) -> State {
        if self.end_of_text.is_none() {
            State::Idle
        } else if !self.has_next() {
            State::Halted
        } else if self.steps == 0 {
            State::Ready
        } else {
            State::Running
        }
    }

    /// Get the instruction at the PC
    pub fn load_next_instruction(&mut self) -> Result<Instruction> {
        let address = self.program_counter() as u64;
        let word = self.memory.word_at(address)?.read();
        Ok(Instruction(word as u32))
    }

    /// Execute one instruction.
    ///
    /// Only fetch and decode failures are errors; faults inside an instruction
    /// are logged and execution carries on.
    pub fn step(&mut self) -> Result<()> {
        self.output.clear();
        self.hex.clear();
        self.last_instruction = None;

        let address = self.program_counter();
        let instruction = self.load_next_instruction()?;
        self.hex = format!("0x{:08x}", instruction.0);

        let decoded = decode(instruction.0)?;
        trace!("0x{:08x}: {}", address, decoded.assembly);

        let mut output = String::new();
        if !self.execute(&decoded, &mut output) {
            warn!(
                "Instruction '{}' at 0x{:08x} is not implemented",
                decoded.assembly, address
            );
        }
        self.output = output;

        if !decoded.mnemonic.sets_program_counter() {
            self.memory.pc().write(address.wrapping_add(4) as i32);
        }

        self.last_instruction = Some(decoded);
        self.steps += 1;
        Ok(())
    }

    /// Step until the program runs out of instructions. Returns the number of
    /// steps taken.
    pub fn run(&mut self) -> Result<u64> {
        let mut steps = 0;

        while self.has_next() {
            if let Some(limit) = self.config.step_limit {
                if steps >= limit {
                    return Err(SimError::StepLimitExceeded(limit));
                }
            }

            self.step()?;
            steps += 1;
        }

        debug!("Halted after {} steps", steps);
        Ok(steps)
    }

    pub fn program_counter(&self) -> u32 {
        self.memory.registers().pc.read() as u32
    }

    /// Output of the most recent step
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Assembly text of the most recent step
    pub fn assembly(&self) -> &str {
        self.last_instruction
            .as_ref()
            .map_or("", |instruction| instruction.assembly.as_str())
    }

    /// Hex word of the most recent step
    pub fn hex(&self) -> &str {
        &self.hex
    }

    pub fn last_instruction(&self) -> Option<&DecodedInstruction> {
        self.last_instruction.as_ref()
    }

    /// Every register: general ones by number, then pc, hi, lo
    pub fn registers(&self) -> Vec<(RegisterId, i32)> {
        self.memory
            .registers()
            .iter()
            .map(|register| (register.id(), register.read()))
            .collect()
    }

    /// Every touched word of memory, by address
    pub fn memory(&self) -> BTreeMap<u64, i32> {
        self.memory.all_words()
    }

    pub fn address_space(&self) -> &AddressSpace {
        &self.memory
    }

    pub fn address_space_mut(&mut self) -> &mut AddressSpace {
        &mut self.memory
    }

    pub(crate) fn read_register(&self, number: u8) -> i32 {
        self.memory.registers().general(number).read()
    }

    pub(crate) fn write_register(&mut self, number: u8, value: i32) {
        self.memory.register(number).write(value);
    }
}

impl Debug for Processor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Processor")
            .field("config", &self.config)
            .field("memory", &self.memory)
            .field("last_instruction", &self.last_instruction)
            .field("end_of_text", &self.end_of_text)
            .field("steps", &self.steps)
            .finish()
    }
}
