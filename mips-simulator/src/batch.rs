//! Batch input and output files.
//!
//! An input file describes one program:
//!
//! ```json
//! {
//!   "config": { "regs": { "$t0": "5" }, "mem": { "268500992": "7" } },
//!   "data": { "268435456": "-1" },
//!   "text": ["0x20010005", "0x00221820"]
//! }
//! ```
//!
//! The output file holds the state after the program halts, restricted to
//! non-zero registers and memory words.

use crate::error::{Result, SimError};
use crate::Processor;
use mips_types::registers::RegisterId;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::io;
use std::path::{Path, PathBuf};

/// A number given either as JSON number or as a decimal/hex string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Number(i64),
    Text(String),
}

impl Literal {
    /// The value truncated to 32 bits
    pub fn to_word(&self) -> Result<i32> {
        let value = match self {
            Literal::Number(value) => *value,
            Literal::Text(text) => parse_integer(text)?,
        };

        Ok(value as i32)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct InputConfig {
    #[serde(default)]
    pub regs: BTreeMap<String, Literal>,
    #[serde(default)]
    pub mem: BTreeMap<String, Literal>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BatchInput {
    #[serde(default)]
    pub config: InputConfig,
    #[serde(default)]
    pub data: BTreeMap<String, Literal>,
    #[serde(default)]
    pub text: Vec<String>,
}

impl BatchInput {
    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The text section as instruction words
    pub fn instructions(&self) -> Result<Vec<u32>> {
        self.text.iter().map(|hex| parse_instruction(hex)).collect()
    }

    pub fn registers(&self) -> Result<Vec<(RegisterId, i32)>> {
        self.config
            .regs
            .iter()
            .map(|(label, value)| {
                let id = RegisterId::from_label(label)
                    .ok_or_else(|| SimError::UnknownRegister(label.clone()))?;
                Ok((id, value.to_word()?))
            })
            .collect()
    }

    pub fn memory(&self) -> Result<Vec<(u64, i32)>> {
        words(&self.config.mem)
    }

    pub fn data(&self) -> Result<Vec<(u64, i32)>> {
        words(&self.data)
    }

    /// Reset the processor and load the whole program into it
    pub fn load_into(&self, processor: &mut Processor) -> Result<()> {
        processor.reset();
        processor.load_instructions(&self.instructions()?)?;
        processor.load_registers(self.registers()?);
        processor.load_memory(self.memory()?)?;
        processor.load_data(self.data()?)?;
        Ok(())
    }
}

/// Key/value pairs serialized as a JSON object in their given order
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Entries(pub Vec<(String, i32)>);

impl Entries {
    pub fn get(&self, key: &str) -> Option<i32> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }
}

impl Serialize for Entries {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(key, value)| (key, value)))
    }
}

#[derive(Debug, Serialize)]
pub struct BatchOutput {
    pub hex: String,
    pub text: String,
    pub stdout: String,
    pub regs: Entries,
    pub mem: Entries,
}

impl BatchOutput {
    /// Snapshot the processor: non-zero registers (general by number, then
    /// pc, hi, lo) and non-zero memory words by ascending address
    pub fn capture(processor: &Processor) -> Self {
        let regs = processor
            .registers()
            .into_iter()
            .filter(|(_, value)| *value != 0)
            .map(|(id, value)| (id.to_string(), value))
            .collect();
        let mem = processor
            .memory()
            .into_iter()
            .filter(|(_, value)| *value != 0)
            .map(|(address, value)| (address.to_string(), value))
            .collect();

        BatchOutput {
            hex: processor.hex().to_string(),
            text: processor.assembly().to_string(),
            stdout: processor.output().to_string(),
            regs: Entries(regs),
            mem: Entries(mem),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Load and run one program, then snapshot it. A failure while running is
/// logged and the snapshot is still taken.
pub fn run_program(processor: &mut Processor, input: &BatchInput) -> Result<BatchOutput> {
    input.load_into(processor)?;

    match processor.run() {
        Ok(steps) => debug!("Program finished after {} steps", steps),
        Err(error) => error!("Program stopped early: {}", error),
    }

    Ok(BatchOutput::capture(processor))
}

/// The JSON files to run: the path itself, or every `.json` file below it
pub fn collect_inputs(path: &Path) -> io::Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();

    if path.is_dir() {
        for entry in path.read_dir()? {
            inputs.extend(collect_inputs(&entry?.path())?);
        }
        inputs.sort();
    } else if is_json(path) {
        inputs.push(path.to_path_buf());
    } else {
        trace!("Skipping {}", path.display());
    }

    Ok(inputs)
}

/// `<group>.<name>.output.json` for an input file `<name>.json`
pub fn output_file_name(group: &str, input: &Path) -> String {
    let name = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    format!("{}.{}.output.json", group, name)
}

fn is_json(path: &Path) -> bool {
    path.extension().map_or(false, |extension| extension == "json")
}

fn words(entries: &BTreeMap<String, Literal>) -> Result<Vec<(u64, i32)>> {
    entries
        .iter()
        .map(|(address, value)| {
            let address = u64::try_from(parse_integer(address)?)
                .map_err(|_| SimError::InvalidValue(address.clone()))?;
            Ok((address, value.to_word()?))
        })
        .collect()
}

/// Parse a decimal or `0x`-prefixed hexadecimal integer, optionally negative
pub fn parse_integer(text: &str) -> Result<i64> {
    let trimmed = text.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let magnitude = match strip_hex_prefix(digits) {
        Some(hex) => i64::from_str_radix(hex, 16),
        None => digits.parse::<i64>(),
    }
    .map_err(|_| SimError::InvalidValue(text.to_string()))?;

    Ok(if negative { -magnitude } else { magnitude })
}

/// Parse an instruction word: hexadecimal with or without `0x`, unsigned
pub fn parse_instruction(text: &str) -> Result<u32> {
    let trimmed = text.trim();
    let hex = strip_hex_prefix(trimmed).unwrap_or(trimmed);

    u32::from_str_radix(hex, 16).map_err(|_| SimError::InvalidValue(text.to_string()))
}

fn strip_hex_prefix(text: &str) -> Option<&str> {
    text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"))
}
