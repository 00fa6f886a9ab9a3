use std::path::Path;

use anyhow::Context;
use log::debug;
use scmscope::prototypes::{
    load_counts_file, load_dump_file, load_names_file, PrototypeTable, PrototypeTableBuilder,
};

/// Where a prototype table is loaded from.
#[derive(Debug)]
pub enum PrototypeSource<'a> {
    /// A dump written by `dump-prototypes`
    Dump(&'a Path),
    /// A counts file plus a names file
    Definitions { counts: &'a Path, names: &'a Path },
}

/// Build the prototype table for a run; counts are loaded before names.
pub fn load_prototypes(source: &PrototypeSource) -> anyhow::Result<PrototypeTable> {
    let mut builder = PrototypeTableBuilder::new();

    match source {
        PrototypeSource::Dump(path) => {
            load_dump_file(&mut builder, path)
                .with_context(|| format!("failed to load prototypes: {}", path.display()))?;
        }
        PrototypeSource::Definitions { counts, names } => {
            load_counts_file(&mut builder, counts)
                .with_context(|| format!("failed to load counts: {}", counts.display()))?;
            load_names_file(&mut builder, names)
                .with_context(|| format!("failed to load names: {}", names.display()))?;
        }
    }

    let table = builder.build();
    debug!("{} prototypes available", table.len());
    Ok(table)
}
