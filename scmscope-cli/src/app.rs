use std::path::PathBuf;

use anyhow::bail;
use clap::{Args, Parser, Subcommand};

use crate::commands::common::PrototypeSource;

/// scmscope - disassembler for compiled SCM scripts
#[derive(Debug, Parser)]
#[command(name = "scmscope", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared across all subcommands.
#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Emit output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Where to load opcode prototypes from: a dump, or a counts and a names file.
#[derive(Debug, Args)]
pub struct PrototypeArgs {
    /// Prototype dump written by `dump-prototypes`.
    #[arg(
        short,
        long,
        value_name = "DUMP",
        required_unless_present = "counts",
        conflicts_with_all = ["counts", "names"]
    )]
    pub prototypes: Option<PathBuf>,

    /// INI-style operand counts file (`<opcode>=<count>,...`).
    #[arg(long, value_name = "INI", requires = "names")]
    pub counts: Option<PathBuf>,

    /// Opcode names file (`<opcode> <name>(...)`).
    #[arg(long, value_name = "DEF", requires = "counts")]
    pub names: Option<PathBuf>,
}

impl PrototypeArgs {
    /// Resolve the argument combination into a prototype source.
    pub fn source(&self) -> anyhow::Result<PrototypeSource<'_>> {
        match (&self.prototypes, &self.counts, &self.names) {
            (Some(dump), _, _) => Ok(PrototypeSource::Dump(dump)),
            (None, Some(counts), Some(names)) => Ok(PrototypeSource::Definitions { counts, names }),
            _ => bail!("either --prototypes or both --counts and --names are required"),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Disassemble a compiled script, one pseudo-source line per instruction.
    Disasm {
        /// Path to the compiled script.
        #[arg(value_name = "SCRIPT")]
        path: PathBuf,

        #[command(flatten)]
        prototypes: PrototypeArgs,

        /// Prefix every line with the byte offset of its instruction.
        #[arg(long)]
        offsets: bool,

        /// Fail on opcodes without prototype instead of decoding them without operands.
        #[arg(long)]
        strict: bool,
    },

    /// Build a prototype dump from a counts and a names file.
    DumpPrototypes {
        /// INI-style operand counts file.
        #[arg(long, value_name = "INI")]
        counts: PathBuf,

        /// Opcode names file.
        #[arg(long, value_name = "DEF")]
        names: PathBuf,

        /// Where to write the dump.
        #[arg(short, long, value_name = "DUMP")]
        output: PathBuf,
    },
}
