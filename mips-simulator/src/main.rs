use env_logger::Env;
use mips_simulator::batch::{collect_inputs, output_file_name, run_program, BatchInput};
use mips_simulator::config::Config;
use mips_simulator::Processor;
use std::error::Error;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use structopt::StructOpt;

#[macro_use]
extern crate log;

#[derive(StructOpt)]
struct CliArgs {
    /// An input JSON file, or a directory searched for them
    #[structopt(parse(from_os_str), default_value = "input")]
    input: PathBuf,

    /// Directory the output JSON files are written to
    #[structopt(parse(from_os_str), long = "output", short = "o", default_value = "output")]
    output_dir: PathBuf,

    /// Prefix for output file names
    #[structopt(long, default_value = "Grupo")]
    group: String,

    /// Give up on a program after this many instructions
    #[structopt(long)]
    step_limit: Option<u64>,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Setup logging and parse CLI args
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();
    let args = CliArgs::from_args();

    let inputs = collect_inputs(&args.input)?;
    info!("Found {} input files", inputs.len());
    fs::create_dir_all(&args.output_dir)?;

    let mut processor = Processor::new(Config {
        step_limit: args.step_limit,
    });

    for input_path in &inputs {
        if let Err(error) = run_file(&mut processor, input_path, &args) {
            error!("Skipping {}: {}", input_path.display(), error);
        }
    }

    Ok(())
}

fn run_file(
    processor: &mut Processor,
    input_path: &Path,
    args: &CliArgs,
) -> Result<(), Box<dyn Error>> {
    info!("Running {}", input_path.display());
    let input = BatchInput::parse(&fs::read_to_string(input_path)?)?;
    let output = run_program(processor, &input)?;

    let output_path = args
        .output_dir
        .join(output_file_name(&args.group, input_path));
    fs::write(&output_path, output.to_json()?)?;
    info!("Wrote {}", output_path.display());

    Ok(())
}
