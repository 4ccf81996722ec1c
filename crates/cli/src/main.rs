//! Cycle-accurate RV32I simulator CLI.
//!
//! This binary provides the command-line entry points:
//! 1. **Run:** Load a workload (program image, optional data image and
//!    offsets) and simulate until the program halts.
//! 2. **Disasm:** Print the annotated listing of a program image.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use tomasulo_core::sim::loader::{self, Workload};
use tomasulo_core::{Config, ExitReason, Simulator, isa};

#[derive(Parser, Debug)]
#[command(
    name = "tsim",
    author,
    version,
    about = "Cycle-accurate out-of-order RV32I pipeline simulator",
    long_about = "Run a hex-word workload on the Tomasulo pipeline model.\n\n\
        Workloads are plain text: one 32-bit hex word per line (the program \
        image may carry `//` disassembly comments), plus an optional data \
        image and an optional `offset: <hex>, data_offset: <hex>` config \
        line.\n\nExamples:\n  \
        tsim run --exe workloads/loop.exe --data workloads/loop.data\n  \
        tsim disasm --exe workloads/loop.exe"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a workload to completion and print statistics.
    Run {
        /// Program image (one hex word per line).
        #[arg(short, long)]
        exe: PathBuf,

        /// Data image preloaded into data memory.
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Workload config line (`offset: <hex>, data_offset: <hex>`).
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Simulator configuration as JSON.
        #[arg(long)]
        sim_config: Option<PathBuf>,

        /// Override the cycle limit.
        #[arg(long)]
        max_cycles: Option<u64>,
    },

    /// Print the disassembled listing of a program image.
    Disasm {
        /// Program image (one hex word per line).
        #[arg(short, long)]
        exe: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            exe,
            data,
            config,
            sim_config,
            max_cycles,
        } => cmd_run(&exe, data.as_deref(), config.as_deref(), sim_config.as_deref(), max_cycles),
        Commands::Disasm { exe } => cmd_disasm(&exe),
    }
}

/// Loads the workload, runs the simulation, and exits with the program's
/// status (0 on a normal halt, 1 on a wedged or truncated run).
fn cmd_run(
    exe: &std::path::Path,
    data: Option<&std::path::Path>,
    config: Option<&std::path::Path>,
    sim_config: Option<&std::path::Path>,
    max_cycles: Option<u64>,
) {
    let mut sim_cfg = match sim_config {
        Some(path) => {
            let text = std::fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("error: cannot read '{}': {e}", path.display());
                process::exit(1);
            });
            Config::from_json(&text).unwrap_or_else(|e| {
                eprintln!("error: {e}");
                process::exit(1);
            })
        }
        None => Config::default(),
    };
    if let Some(limit) = max_cycles {
        sim_cfg.sim.max_cycles = limit;
    }

    let workload = Workload::load(exe, data, config).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(1);
    });

    // Preloader contract: the data offset is published next to the images.
    if let Some(ref offsets) = workload.config {
        let dir = exe.parent().unwrap_or_else(|| std::path::Path::new("."));
        if let Err(e) = loader::write_init_file(dir, offsets) {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }

    println!(
        "[*] {} ({} program words, {} data words)",
        exe.display(),
        workload.program.len(),
        workload.data.len()
    );

    let mut sim = Simulator::from_workload(&sim_cfg, &workload);
    let reason = sim.run();
    match reason {
        ExitReason::Halted => println!("\n[*] Halted normally"),
        ExitReason::IdleTimeout => eprintln!("\n[!] No commit for {} cycles", sim_cfg.sim.idle_threshold),
        ExitReason::CycleLimit => eprintln!("\n[!] Cycle limit {} reached", sim_cfg.sim.max_cycles),
    }
    sim.stats.print();
    process::exit(sim.exit_code());
}

/// Prints one line per program word: address, raw word, mnemonic.
fn cmd_disasm(exe: &std::path::Path) {
    let words = loader::load_hex_words(exe).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(1);
    });
    for (i, word) in words.iter().enumerate() {
        println!("{:#06x}: {word:08x}  {}", i * 4, isa::disassemble(*word));
    }
}
