#[macro_use]
extern crate log;

pub mod batch;
pub mod config;
pub mod error;
pub mod instruction;
mod math;
pub mod memory;
mod operations;
mod processor;
pub mod registers;

pub use error::{Result, SimError};
pub use processor::{Processor, State};
