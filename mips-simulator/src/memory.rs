use crate::error::{Result, SimError};
use crate::registers::{Register, Registers};
use mips_types::constants::{
    DATA_LIMIT, DATA_OFFSET, STACK_BASE, STACK_LIMIT, TEXT_LIMIT, TEXT_OFFSET,
};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::{Debug, Formatter};

/// The role of an address range
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Text,
    StaticData,
    Stack,
    Reserved,
}

impl Segment {
    /// Classify an address. The stack lies inside the static data range, so it
    /// is checked first.
    pub fn classify(address: u64) -> Self {
        if (TEXT_OFFSET as u64..=TEXT_LIMIT).contains(&address) {
            Segment::Text
        } else if (STACK_BASE..=STACK_LIMIT).contains(&address) {
            Segment::Stack
        } else if (DATA_OFFSET as u64..=DATA_LIMIT).contains(&address) {
            Segment::StaticData
        } else {
            Segment::Reserved
        }
    }
}

/// One byte of memory
#[derive(Copy, Clone, Debug)]
pub struct ByteCell {
    address: u64,
    segment: Segment,
    value: u8,
}

impl ByteCell {
    fn new(address: u64) -> Self {
        ByteCell {
            address,
            segment: Segment::classify(address),
            value: 0,
        }
    }

    pub fn address(&self) -> u64 {
        self.address
    }

    pub fn segment(&self) -> Segment {
        self.segment
    }

    pub fn read(&self) -> u8 {
        self.value
    }

    pub fn write(&mut self, value: u8) {
        self.value = value;
    }
}

/// A big-endian view over the four byte cells of an aligned word
pub struct WordView<'a> {
    cells: &'a mut BTreeMap<u64, ByteCell>,
    address: u64,
}

impl WordView<'_> {
    pub fn address(&self) -> u64 {
        self.address
    }

    /// Compose the four bytes, most significant first
    pub fn read(&self) -> i32 {
        let mut bytes = [0; 4];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = self
                .cells
                .get(&(self.address + i as u64))
                .map_or(0, ByteCell::read);
        }

        i32::from_be_bytes(bytes)
    }

    pub fn write(&mut self, value: i32) {
        for (i, byte) in value.to_be_bytes().iter().enumerate() {
            materialize(self.cells, self.address + i as u64).write(*byte);
        }
    }
}

/// Registers plus sparse, lazily allocated byte-addressed memory
#[derive(Default)]
pub struct AddressSpace {
    registers: Registers,
    /// Byte cells indexed by address, created on first access
    cells: BTreeMap<u64, ByteCell>,
}

impl AddressSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the byte cell at the address, allocating it on first access
    pub fn byte_at(&mut self, address: u64) -> Result<&mut ByteCell> {
        if Segment::classify(address) == Segment::Reserved {
            return Err(SimError::InvalidAddress { address });
        }

        Ok(materialize(&mut self.cells, address))
    }

    /// Get the word (4 bytes) at the address
    pub fn word_at(&mut self, address: u64) -> Result<WordView<'_>> {
        if !Self::is_word_aligned(address) || !Self::is_accessible(address, 4) {
            return Err(SimError::InvalidAddress { address });
        }

        for offset in 0..4 {
            materialize(&mut self.cells, address + offset);
        }

        Ok(WordView {
            cells: &mut self.cells,
            address,
        })
    }

    pub fn is_word_aligned(address: u64) -> bool {
        address % 4 == 0
    }

    /// Whether every byte of `address..address + length` lies outside the
    /// reserved ranges
    pub fn is_accessible(address: u64, length: u64) -> bool {
        (address..address + length).all(|byte| Segment::classify(byte) != Segment::Reserved)
    }

    /// Read a null-terminated string starting from the address. Stops early at
    /// the first address that cannot be read.
    pub fn c_string_at(&mut self, address: u64) -> Vec<u8> {
        let mut bytes = Vec::new();

        for address in address.. {
            let byte = match self.byte_at(address) {
                Ok(cell) => cell.read(),
                Err(_) => break,
            };

            if byte == 0 {
                break;
            }

            bytes.push(byte);
        }

        bytes
    }

    /// Get a general register
    pub fn register(&mut self, number: u8) -> &mut Register {
        self.registers.general_mut(number)
    }

    pub fn hi(&mut self) -> &mut Register {
        &mut self.registers.hi
    }

    pub fn lo(&mut self) -> &mut Register {
        &mut self.registers.lo
    }

    pub fn pc(&mut self) -> &mut Register {
        &mut self.registers.pc
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.registers
    }

    /// Zero every register and drop every byte cell
    pub fn clear(&mut self) {
        self.registers.clear();
        self.cells.clear();
    }

    /// Every byte cell touched so far, in address order. Untouched addresses
    /// are absent and read as zero.
    pub fn all_bytes(&self) -> impl Iterator<Item = &ByteCell> {
        self.cells.values()
    }

    /// The value of every word containing at least one touched byte, keyed by
    /// its aligned address
    pub fn all_words(&self) -> BTreeMap<u64, i32> {
        let mut words = BTreeMap::new();

        for cell in self.cells.values() {
            let base = cell.address - cell.address % 4;
            let shift = 8 * (3 - cell.address % 4);
            let word = words.entry(base).or_insert(0u32);
            *word |= (cell.value as u32) << shift;
        }

        words
            .into_iter()
            .map(|(address, word)| (address, word as i32))
            .collect()
    }
}

impl Debug for AddressSpace {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "AddressSpace({} cells)", self.cells.len())
    }
}

fn materialize(cells: &mut BTreeMap<u64, ByteCell>, address: u64) -> &mut ByteCell {
    match cells.entry(address) {
        Entry::Occupied(entry) => entry.into_mut(),
        Entry::Vacant(entry) => {
            trace!("Allocating byte cell at 0x{:08x}", address);
            entry.insert(ByteCell::new(address))
        }
    }
}
