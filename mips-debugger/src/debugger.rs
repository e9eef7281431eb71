use mips_simulator::batch::{BatchInput, BatchOutput};
use mips_simulator::{Processor, Result};
use std::io;
use std::io::{BufRead, Write};

pub struct Debugger {
    pub processor: Processor,
    pub program: BatchInput,
    pub trace: bool,
}

impl Debugger {
    /// Load the program and get ready to step through it
    pub fn new(mut processor: Processor, program: BatchInput) -> Result<Self> {
        program.load_into(&mut processor)?;

        Ok(Debugger {
            processor,
            program,
            trace: false,
        })
    }

    /// Read and run commands until the program halts or the user exits
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut line = String::new();

        while self.processor.has_next() {
            eprint!("(mips) ");
            io::stderr().flush()?;

            line.clear();
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }

            if !self.run_command(&line) {
                break;
            }
        }

        eprintln!("Program halted at 0x{:08x}", self.processor.program_counter());
        Ok(())
    }

    /// Run a command. Returns true if execution should continue, else false.
    pub fn run_command(&mut self, command: &str) -> bool {
        let command: Vec<_> = command.split_whitespace().collect();

        match command.as_slice() {
            ["trace", enabled] => match *enabled {
                "on" => {
                    self.trace = true;
                    eprintln!("Instruction tracing is ON");
                }
                "off" => {
                    self.trace = false;
                    eprintln!("Instruction tracing is OFF");
                }
                _ => eprintln!("Unknown input"),
            },
            ["step"] | ["s"] => return self.step(),
            ["run"] | ["r"] => {
                while self.processor.has_next() {
                    if !self.step() {
                        return false;
                    }
                }
            }
            ["regs"] => {
                for (key, value) in BatchOutput::capture(&self.processor).regs.0 {
                    eprintln!("{:>5} = {} (0x{:08x})", key, value, value);
                }
            }
            ["mem"] => {
                for (address, value) in BatchOutput::capture(&self.processor).mem.0 {
                    eprintln!("{} = {} (0x{:08x})", address, value, value);
                }
            }
            ["reset"] => {
                if let Err(error) = self.program.load_into(&mut self.processor) {
                    eprintln!("Reloading failed: {}", error);
                    return false;
                }
                eprintln!("Program reloaded");
            }
            ["exit"] => return false,
            [] => {}
            _ => eprintln!("Unknown input"),
        }

        true
    }

    fn step(&mut self) -> bool {
        if self.trace {
            match self.processor.load_next_instruction() {
                Ok(instruction) => eprintln!(
                    "0x{:08x}: 0x{:08x}",
                    self.processor.program_counter(),
                    instruction.0
                ),
                Err(error) => eprintln!("{}", error),
            }
        }

        if let Err(error) = self.processor.step() {
            eprintln!("{}", error);
            return false;
        }

        eprintln!("{}", self.processor.assembly());
        let output = self.processor.output();
        if !output.is_empty() {
            println!("{}", output);
        }

        true
    }
}
