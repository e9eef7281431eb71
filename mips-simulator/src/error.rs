//! Errors surfaced by the simulator

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// The word matches no known opcode/funct pair
    #[error("Unable to decode instruction word 0x{word:08x}")]
    Decode { word: u32 },

    /// The address is reserved, or not aligned for a word access
    #[error("Invalid memory address 0x{address:08x}")]
    InvalidAddress { address: u64 },

    #[error("Unknown register '{0}'")]
    UnknownRegister(String),

    /// A value which could not be read as a 32-bit integer
    #[error("Invalid value '{0}'")]
    InvalidValue(String),

    #[error("Program did not halt within {0} steps")]
    StepLimitExceeded(u64),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
