use std::path::Path;

use anyhow::Context;
use scmscope::prototypes::write_dump_file;
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::{load_prototypes, PrototypeSource},
    output::print_output,
};

#[derive(Serialize)]
struct DumpSummary<'a> {
    output: &'a Path,
    prototypes: usize,
    named: usize,
}

pub fn run(
    counts: &Path,
    names: &Path,
    output: &Path,
    global: &GlobalOptions,
) -> anyhow::Result<()> {
    let table = load_prototypes(&PrototypeSource::Definitions { counts, names })?;

    write_dump_file(&table, output)
        .with_context(|| format!("failed to write prototypes: {}", output.display()))?;

    let summary = DumpSummary {
        output,
        prototypes: table.len(),
        named: table.iter().filter(|p| p.name.is_some()).count(),
    };

    print_output(&summary, global, |summary| {
        println!(
            "Wrote {} prototypes ({} named) to {}",
            summary.prototypes,
            summary.named,
            summary.output.display()
        );
    })
}
