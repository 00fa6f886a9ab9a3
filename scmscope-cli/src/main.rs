mod app;
mod commands;
mod output;

use anyhow::Context;
use clap::Parser;

use crate::app::{Cli, Command};

fn main() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        eprintln!("\nCancelled.");
        std::process::exit(130);
    })
    .context("failed to set Ctrl+C handler")?;

    let cli = Cli::parse();

    // Show scmscope info+ on stderr unless --json; --verbose enables debug; RUST_LOG overrides
    if !cli.global.json {
        let level = if cli.global.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };
        env_logger::Builder::new()
            .filter_module("scmscope", level)
            .parse_default_env()
            .target(env_logger::Target::Stderr)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(false)
            .init();
    }

    match &cli.command {
        Command::Disasm {
            path,
            prototypes,
            offsets,
            strict,
        } => commands::disasm::run(
            path,
            &prototypes.source()?,
            commands::disasm::DisasmOptions {
                offsets: *offsets,
                strict: *strict,
            },
            &cli.global,
        ),
        Command::DumpPrototypes {
            counts,
            names,
            output,
        } => commands::dump::run(counts, names, output, &cli.global),
    }
}
