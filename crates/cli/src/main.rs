//! MIPS cycle-accurate simulator CLI.
//!
//! This binary provides the simulation entry point. It performs:
//! 1. **Loading:** Reads a flat program image into functional memory.
//! 2. **Running:** Clocks the pipeline until a clean halt (jump to PC 0),
//!    the instruction budget, or a fatal error.
//! 3. **Reporting:** Prints run statistics and maps the outcome to an exit code.

use clap::Parser;
use std::process;

use mips_core::core::ExitStatus;
use mips_core::config::{BranchPredictorKind, Config};
use mips_core::{FuncMemory, PerfSim};

#[derive(Parser, Debug)]
#[command(
    name = "sim",
    author,
    version,
    about = "MIPS cycle-accurate simulator",
    long_about = "Run a flat MIPS binary through the five-stage pipeline with the\n\
                  functional checker enabled.\n\n\
                  Examples:\n  sim -f program.bin -n 100000\n  sim -f program.bin --trace --bp static"
)]
struct Cli {
    /// Program image to execute (placed at the memory base).
    #[arg(short, long)]
    file: String,

    /// Instruction budget: stop cleanly after this many retires.
    #[arg(short = 'n', long, default_value_t = u64::MAX)]
    instrs: u64,

    /// Entry-point PC (defaults to the memory base).
    #[arg(long)]
    start_pc: Option<u32>,

    /// Branch predictor policy.
    #[arg(long, default_value = "bimodal")]
    bp: String,

    /// Emit the per-cycle pipeline dump on stderr.
    #[arg(long)]
    trace: bool,
}

/// Reads a binary image from disk, exiting with a message on failure.
fn load_binary(path: &str) -> Vec<u8> {
    std::fs::read(path).unwrap_or_else(|e| {
        eprintln!("[!] FATAL: could not read file '{}': {}", path, e);
        process::exit(1);
    })
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = Config::default();
    config.general.trace = cli.trace;
    if let Some(pc) = cli.start_pc {
        config.general.start_pc = pc;
    }
    config.pipeline.branch_predictor = match cli.bp.as_str() {
        "static" => BranchPredictorKind::Static,
        "bimodal" => BranchPredictorKind::Bimodal,
        other => {
            eprintln!("[!] unknown branch predictor '{}'", other);
            process::exit(1);
        }
    };

    let image = load_binary(&cli.file);
    let mut mem = FuncMemory::new(config.memory.base, config.memory.size);
    if let Err(e) = mem.load_image_at(&image, config.general.start_pc) {
        eprintln!("[!] FATAL: {}", e);
        process::exit(1);
    }

    println!(
        "[*] {}: {} bytes at {:#010x}, budget {}",
        cli.file,
        image.len(),
        config.general.start_pc,
        cli.instrs
    );

    let mut sim = match PerfSim::new(mem, &config) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("[!] FATAL: {}", e);
            process::exit(1);
        }
    };

    match sim.run(cli.instrs) {
        Ok(ExitStatus::Halted) => {
            println!("[*] clean halt after {} instructions", sim.executed_instrs());
            sim.stats().print();
        }
        Ok(ExitStatus::BudgetReached) => {
            println!("[*] instruction budget reached");
            sim.stats().print();
        }
        Err(e) => {
            eprintln!("\n[!] FATAL: {}", e);
            sim.stats().print();
            process::exit(1);
        }
    }
}
