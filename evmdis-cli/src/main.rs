use clap::{Parser, Subcommand};
use std::fs::File;
use std::path::{Path, PathBuf};

use evmdis_analyzer::{AnalysisError, InputError, Program};
use evmdis_ir::Instruction;
use memmap2::Mmap;
use thiserror::Error;

#[derive(Parser)]
#[command(name = "evmdis", about = "EVM bytecode disassembler and basic-block splitter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Disassemble a hex-encoded bytecode file, grouped by basic block
    Disasm {
        /// Path to the hex file (an optional 0x prefix is accepted)
        input: PathBuf,
    },
    /// List the byte range of every basic block
    Blocks {
        /// Path to the hex file
        input: PathBuf,
    },
    /// Show bytecode statistics
    Info {
        /// Path to the hex file
        input: PathBuf,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Disasm { input } => cmd_disasm(&input),
        Commands::Blocks { input } => cmd_blocks(&input),
        Commands::Info { input } => cmd_info(&input),
    }
}

#[derive(Debug, Error)]
enum LoadError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{}: {source}", path.display())]
    Hex { path: PathBuf, source: InputError },
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// Read, hex-decode and analyze `path`, exiting with status 1 on failure.
fn open_program(path: &Path) -> Program {
    match load_program(path) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn load_program(path: &Path) -> Result<Program, LoadError> {
    let io_error = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_error)?;
    // SAFETY: the mapping is read-only and only lives until the bytes are
    // hex-decoded below.
    let mmap = unsafe { Mmap::map(&file) }.map_err(io_error)?;
    let code = match evmdis_analyzer::parse_hex(&mmap[..]) {
        Ok(code) => code,
        Err(source) => {
            return Err(LoadError::Hex {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    drop(mmap);

    log::info!("{}: {} bytes of bytecode", path.display(), code.len());
    Ok(Program::analyze(code)?)
}

fn cmd_disasm(path: &Path) {
    let program = open_program(path);

    for block in program.blocks() {
        println!();
        println!("block {}..{}", block.start, block.end);
        for insn in program.block_instructions(block) {
            println!("    {}", format_instruction(insn));
        }
    }
}

fn format_instruction(insn: &Instruction) -> String {
    format!("{:>6} ({:#06x}): {insn}", insn.offset, insn.offset)
}

fn cmd_blocks(path: &Path) {
    let program = open_program(path);
    for block in program.blocks() {
        println!("{}..{}", block.start, block.end);
    }
}

fn cmd_info(path: &Path) {
    let program = open_program(path);
    let instructions = program.instructions();

    let unassigned = instructions
        .instructions()
        .filter(|insn| insn.opcode.mnemonic().is_none())
        .count();
    let truncated = instructions
        .instructions()
        .filter(|insn| insn.is_truncated())
        .count();
    let jump_targets = instructions
        .instructions()
        .filter(|insn| insn.opcode.is_block_start())
        .count();
    let covered: usize = program.blocks().iter().map(|b| b.len()).sum();

    println!("=== Bytecode Info ===");
    println!("Code size:          {} bytes", program.code().len());
    println!("Instructions:       {}", instructions.len());
    println!("Basic blocks:       {}", program.layout().len());
    println!("Bytes in blocks:    {covered}");
    println!("JUMPDESTs:          {jump_targets}");
    println!("Unassigned opcodes: {unassigned}");
    println!("Truncated pushes:   {truncated}");
}
