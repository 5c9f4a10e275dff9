use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use log::{debug, info};

use embattled::arena::io::IO_BASE;
use embattled::assembler::{assemble, render_diagnostic, BinaryProgram};
use embattled::config::ArenaConfig;
use embattled::engine::Engine;
use embattled::processor::{disassemble, fetch, step, Memory, Process, Step, MEMORY_SIZE};

use crate::ui::{self, App};

/// Robot programming arena
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Assemble a program into a 64 KiB memory image
    Assemble {
        /// Assembly source
        source: PathBuf,

        /// Output image (defaults to the source path with a .bin extension)
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
    /// Run a single program and print its registers
    Run {
        #[command(flatten)]
        input: Input,

        /// Number of steps to execute
        #[clap(long, default_value_t = 1000)]
        steps: u64,

        /// Print every executed instruction
        #[clap(long)]
        trace: bool,
    },
    /// List the instructions of a program
    Disasm {
        #[command(flatten)]
        input: Input,

        /// First address to decode (hex)
        #[clap(long, value_parser = parse_address, default_value = "0")]
        start: u16,

        /// Number of instructions to list
        #[clap(long, default_value_t = 32)]
        count: usize,
    },
    /// Watch two programs fight in the terminal
    Arena {
        /// Program for robot A
        a: PathBuf,

        /// Program for robot B
        b: PathBuf,

        /// Simulated speed, 1000 is real time and 0 starts paused
        #[clap(long)]
        time_scale: Option<u32>,
    },
}

/// A program given either as source or as a prebuilt image.
#[derive(ClapArgs)]
struct Input {
    /// Assembly source
    #[clap(required_unless_present = "binary")]
    source: Option<PathBuf>,

    /// Prebuilt memory image instead of source
    #[clap(long, conflicts_with = "source")]
    binary: Option<PathBuf>,
}

fn parse_address(s: &str) -> Result<u16, String> {
    let digits = s.trim_start_matches("0x").trim_start_matches("0X");
    u16::from_str_radix(digits, 16).map_err(|e| format!("invalid address {s:?}: {e}"))
}

pub fn main() -> Result<()> {
    let args = Args::parse();

    // the terminal host owns the screen, so it stays quiet unless asked
    let default_filter = match args.command {
        Command::Arena { .. } => "off",
        _ => "warn",
    };
    let env = env_logger::Env::default()
        .filter_or("EMBATTLED_LOG", default_filter)
        .write_style_or("EMBATTLED_LOG_STYLE", "auto");
    env_logger::init_from_env(env);

    match args.command {
        Command::Assemble { source, output } => {
            let program = assemble_file(&source)?;
            let output = output.unwrap_or_else(|| source.with_extension("bin"));
            std::fs::write(&output, &program.bytes)
                .with_context(|| format!("failed to write {:?}", output))?;
            info!("wrote {} statements to {:?}", program.mappings.len(), output);
        }
        Command::Run { input, steps, trace } => {
            let mut process = Process::with_image(&load_image(&input)?)?;
            process.registers.sp = IO_BASE;
            for _ in 0..steps {
                let ip = process.registers.ip;
                match step(&mut process) {
                    Step::Executed(inst) if trace => println!("{ip:04X}: {}", disassemble(&inst)),
                    _ => {}
                }
            }
            println!("{}", process.registers);
        }
        Command::Disasm { input, start, count } => {
            let memory = Memory::from_image(&load_image(&input)?)?;
            let mut ip = start;
            for _ in 0..count {
                let at = ip;
                let inst = fetch(&memory, &mut ip);
                let bytes: Vec<String> = (0..inst.size())
                    .map(|i| format!("{:02X}", memory.read_byte(at.wrapping_add(i as u16))))
                    .collect();
                println!("{at:04X}: {:<15} {}", bytes.join(" "), disassemble(&inst));
            }
        }
        Command::Arena { a, b, time_scale } => {
            let engine = Engine::new(ArenaConfig::default());
            if let Some(scale) = time_scale {
                engine.lock().runner.set_time_scale(scale);
            }
            let app = App::new(engine, [a, b]);
            let mut terminal = ratatui::init();
            let result = ui::run(&mut terminal, app);
            ratatui::restore();
            result.context("terminal error")?;
        }
    }
    Ok(())
}

/// Assembles `path`, printing a rendered diagnostic and exiting on failure.
fn assemble_file(path: &Path) -> Result<BinaryProgram> {
    let source =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {:?}", path))?;
    match assemble(&source) {
        Ok(program) => Ok(program),
        Err(e) => {
            eprint!("{}", render_diagnostic(&path.display().to_string(), &source, &e));
            std::process::exit(1);
        }
    }
}

fn load_image(input: &Input) -> Result<Vec<u8>> {
    match (&input.source, &input.binary) {
        (_, Some(path)) => {
            let bytes = std::fs::read(path).with_context(|| format!("failed to read {:?}", path))?;
            debug!("loaded {} byte image", bytes.len());
            anyhow::ensure!(
                bytes.len() == MEMORY_SIZE,
                "{:?} is {} bytes, images must be {MEMORY_SIZE}",
                path,
                bytes.len()
            );
            Ok(bytes)
        }
        (Some(path), None) => Ok(assemble_file(path)?.bytes),
        (None, None) => anyhow::bail!("no program given"),
    }
}
