use crate::debugger::Debugger;
use env_logger::Env;
use mips_simulator::batch::BatchInput;
use mips_simulator::config::Config;
use mips_simulator::Processor;
use std::error::Error;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use structopt::StructOpt;

#[macro_use]
extern crate log;

mod debugger;

#[derive(StructOpt)]
struct CliArgs {
    /// A batch input JSON file
    #[structopt(parse(from_os_str))]
    file_path: PathBuf,

    /// Start with instruction tracing enabled
    #[structopt(long)]
    trace: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Setup logging and parse CLI args
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();
    let args = CliArgs::from_args();

    // Load the program
    let program = BatchInput::parse(&fs::read_to_string(&args.file_path)?)?;
    info!("Loaded {} instructions", program.text.len());

    // Setup the processor and debugger
    let processor = Processor::new(Config::default());
    let mut debugger = Debugger::new(processor, program)?;
    debugger.trace = args.trace;

    debugger.run()?;

    Ok(())
}
