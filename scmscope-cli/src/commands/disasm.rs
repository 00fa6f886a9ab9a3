use std::path::Path;

use anyhow::Context;
use log::info;
use scmscope::{
    disassembler::{render, Decoder, DecoderConfig, UnknownOpcodePolicy},
    Script,
};
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::{load_prototypes, PrototypeSource},
    output::print_output,
};

/// Formatting and decoding switches of the `disasm` command.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisasmOptions {
    /// Prefix each line with its byte offset
    pub offsets: bool,
    /// Reject opcodes without prototype
    pub strict: bool,
}

#[derive(Serialize)]
struct DisasmLine {
    offset: usize,
    opcode: u16,
    text: String,
}

pub fn run(
    path: &Path,
    source: &PrototypeSource,
    opts: DisasmOptions,
    global: &GlobalOptions,
) -> anyhow::Result<()> {
    let table = load_prototypes(source)?;
    let script = Script::from_file(path)
        .with_context(|| format!("failed to load script: {}", path.display()))?;

    let config = DecoderConfig {
        unknown_opcodes: if opts.strict {
            UnknownOpcodePolicy::Strict
        } else {
            UnknownOpcodePolicy::Lenient
        },
    };

    let mut parser = script.parser();
    let mut lines = Vec::new();
    let mut failure = None;

    for result in Decoder::with_config(&table, config).iter(&mut parser) {
        let rendered = result.and_then(|instruction| {
            render(&instruction, &table).map(|text| DisasmLine {
                offset: instruction.offset,
                opcode: instruction.opcode,
                text,
            })
        });

        match rendered {
            Ok(line) => lines.push(line),
            Err(error) => {
                failure = Some(error);
                break;
            }
        }
    }

    // Instructions decoded before a failure are still printed
    print_output(&lines, global, |lines| {
        for line in lines {
            if opts.offsets {
                println!("{:08x}  {}", line.offset, line.text);
            } else {
                println!("{}", line.text);
            }
        }
    })?;

    if let Some(error) = failure {
        return Err(error).with_context(|| {
            format!(
                "failed to disassemble {} after {} instructions",
                path.display(),
                lines.len()
            )
        });
    }

    info!("{} instructions in {} bytes", lines.len(), script.len());
    Ok(())
}
