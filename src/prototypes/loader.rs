//! Readers and writers for the three prototype text formats.
//!
//! - counts (`.ini` style): `<hex opcode>=<decimal count>,<ignored>`, lines starting with `;`
//!   are comments
//! - names: `<4 hex digits> <name>(<ignored>`, everything after `;` is a comment
//! - dump: one [`Prototype`] per line as written by its `Display` impl, `0004 (oper 2) =`
//!
//! Counts and names files describe the same opcodes from two sides and are usually loaded into
//! one builder, counts first: [`PrototypeTableBuilder::register`] replaces whole entries, while
//! [`PrototypeTableBuilder::apply_name`] only fills in the name. A dump carries both and
//! round-trips through [`dump`] and [`load_dump`].
//!
//! Lines that can not be parsed are skipped with a warning, a bad line never fails a whole load.

use std::{fs, path::Path};

use crate::{
    prototypes::{parse_opcode, OperandCount, Prototype, PrototypeTable, PrototypeTableBuilder},
    Result,
};

/// Loads operand counts into `builder`, returning the number of entries registered.
///
/// # Examples
///
/// ```rust
/// use scmscope::prototypes::{load_counts, OperandCount, PrototypeLookup, PrototypeTableBuilder};
///
/// let mut builder = PrototypeTableBuilder::new();
/// let loaded = load_counts(&mut builder, "[OPCODES]\n; comment\n0001=1,wait %d%\n004f=-1,start\n");
///
/// let table = builder.build();
/// assert_eq!(loaded, 2);
/// assert_eq!(table.lookup(0x004f).map(|p| p.operand_count), Some(OperandCount::Variadic));
/// ```
pub fn load_counts(builder: &mut PrototypeTableBuilder, text: &str) -> usize {
    let mut loaded = 0;

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        let Some((opcode, rest)) = line.split_once('=') else {
            continue;
        };
        let Some((count, _)) = rest.split_once(',') else {
            continue;
        };

        match parse_count_entry(opcode, count) {
            Ok((opcode, operand_count)) => {
                builder.register(opcode, operand_count);
                loaded += 1;
            }
            Err(error) => log::warn!("Skipping counts line {}: {}", index + 1, error),
        }
    }

    log::debug!("Loaded {} operand counts", loaded);
    loaded
}

fn parse_count_entry(opcode: &str, count: &str) -> Result<(u16, OperandCount)> {
    Ok((parse_opcode(opcode)?, count.parse()?))
}

/// Loads opcode names into `builder`, returning the number of names applied.
///
/// # Examples
///
/// ```rust
/// use scmscope::prototypes::{load_names, PrototypeLookup, PrototypeTableBuilder};
///
/// let mut builder = PrototypeTableBuilder::new();
/// load_names(&mut builder, "0001 wait(time) ; pauses the script\n");
///
/// let table = builder.build();
/// assert_eq!(table.lookup(0x0001).and_then(|p| p.name.as_deref()), Some("wait"));
/// ```
pub fn load_names(builder: &mut PrototypeTableBuilder, text: &str) -> usize {
    let mut loaded = 0;

    for (index, line) in text.lines().enumerate() {
        let line = match line.split_once(';') {
            Some((content, _)) => content,
            None => line,
        }
        .trim();
        if line.is_empty() {
            continue;
        }

        let Some((opcode, rest)) = line.split_at_checked(4) else {
            log::warn!("Skipping names line {}: too short - '{}'", index + 1, line);
            continue;
        };

        let opcode = match parse_opcode(opcode) {
            Ok(opcode) => opcode,
            Err(error) => {
                log::warn!("Skipping names line {}: {}", index + 1, error);
                continue;
            }
        };

        let name = match rest.split_once('(') {
            Some((name, _)) => name,
            None => rest,
        }
        .trim();
        if name.is_empty() {
            log::warn!("Skipping names line {}: no name for 0x{:04x}", index + 1, opcode);
            continue;
        }

        builder.apply_name(opcode, name);
        loaded += 1;
    }

    log::debug!("Loaded {} opcode names", loaded);
    loaded
}

/// Loads a prototype dump into `builder`, returning the number of prototypes inserted.
///
/// Blank lines are ignored and a `;` starts a comment.
pub fn load_dump(builder: &mut PrototypeTableBuilder, text: &str) -> usize {
    let mut loaded = 0;

    for (index, line) in text.lines().enumerate() {
        let line = match line.split_once(';') {
            Some((content, _)) => content,
            None => line,
        };
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Prototype>() {
            Ok(prototype) => {
                builder.insert(prototype);
                loaded += 1;
            }
            Err(error) => log::warn!("Skipping dump line {}: {}", index + 1, error),
        }
    }

    log::debug!("Loaded {} prototypes from dump", loaded);
    loaded
}

/// Writes `table` in dump format, one prototype per line in ascending opcode order.
///
/// # Examples
///
/// ```rust
/// use scmscope::prototypes::{dump, Prototype, PrototypeTable};
///
/// let table: PrototypeTable = [
///     Prototype::operator(0x0004, "=", 2),
///     Prototype::function(0x0001, "wait", 1),
/// ]
/// .into_iter()
/// .collect();
///
/// assert_eq!(dump(&table), "0001 (func 1) wait\n0004 (oper 2) =\n");
/// ```
#[must_use]
pub fn dump(table: &PrototypeTable) -> String {
    let mut output = String::new();
    for prototype in table.iter() {
        output.push_str(&prototype.to_string());
        output.push('\n');
    }
    output
}

fn read_text(path: &Path) -> Result<String> {
    let data = fs::read(path)?;
    Ok(String::from_utf8_lossy(&data).into_owned())
}

/// Reads a counts file from disk and loads it with [`load_counts`].
///
/// # Errors
///
/// Returns [`crate::Error::FileError`] if the file can not be read.
pub fn load_counts_file(builder: &mut PrototypeTableBuilder, path: &Path) -> Result<usize> {
    let text = read_text(path)?;
    Ok(load_counts(builder, &text))
}

/// Reads a names file from disk and loads it with [`load_names`].
///
/// # Errors
///
/// Returns [`crate::Error::FileError`] if the file can not be read.
pub fn load_names_file(builder: &mut PrototypeTableBuilder, path: &Path) -> Result<usize> {
    let text = read_text(path)?;
    Ok(load_names(builder, &text))
}

/// Reads a dump file from disk and loads it with [`load_dump`].
///
/// # Errors
///
/// Returns [`crate::Error::FileError`] if the file can not be read.
pub fn load_dump_file(builder: &mut PrototypeTableBuilder, path: &Path) -> Result<usize> {
    let text = read_text(path)?;
    Ok(load_dump(builder, &text))
}

/// Writes `table` to `path` in dump format.
///
/// # Errors
///
/// Returns [`crate::Error::FileError`] if the file can not be written.
pub fn write_dump_file(table: &PrototypeTable, path: &Path) -> Result<()> {
    fs::write(path, dump(table))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prototypes::{InvokeType, PrototypeLookup};

    const COUNTS: &str = "\
[OPCODES]
; opcode=params,description
0000=0,NOP
0001=1,wait %1d% ms
 0002=1,goto %1p%
0004=2,%1d% = %2d%
004F=-1,create_thread %1p%
zzzz=1,broken opcode
0005=x,broken count
0006 no equals sign
0007=3 no comma
";

    const NAMES: &str = "\
; names for the opcodes above
0000 nop
0001 wait(ms)
0002 goto   (label) ; jump
004f start_new_script(label, ...)
0009
nope not_hex
000a ()
";

    #[test]
    fn counts_file() {
        let mut builder = PrototypeTableBuilder::new();
        assert_eq!(load_counts(&mut builder, COUNTS), 5);

        let table = builder.build();
        assert_eq!(table.lookup(0x0000).unwrap().operand_count, OperandCount::Fixed(0));
        assert_eq!(table.lookup(0x0002).unwrap().operand_count, OperandCount::Fixed(1));
        assert_eq!(table.lookup(0x0004).unwrap().operand_count, OperandCount::Fixed(2));
        assert_eq!(table.lookup(0x004f).unwrap().operand_count, OperandCount::Variadic);
        assert!(table.lookup(0x0005).is_none());
        assert!(table.lookup(0x0006).is_none());
        assert!(table.lookup(0x0007).is_none());
        assert!(table.iter().all(|p| p.name.is_none()));
    }

    #[test]
    fn names_file() {
        let mut builder = PrototypeTableBuilder::new();
        assert_eq!(load_names(&mut builder, NAMES), 4);

        let table = builder.build();
        assert_eq!(table.lookup(0x0000).unwrap().name.as_deref(), Some("nop"));
        assert_eq!(table.lookup(0x0001).unwrap().name.as_deref(), Some("wait"));
        assert_eq!(table.lookup(0x0002).unwrap().name.as_deref(), Some("goto"));
        assert_eq!(
            table.lookup(0x004f).unwrap().name.as_deref(),
            Some("start_new_script")
        );
        assert!(table.lookup(0x0009).is_none());
        assert!(table.lookup(0x000a).is_none());
    }

    #[test]
    fn counts_then_names() {
        let mut builder = PrototypeTableBuilder::new();
        load_counts(&mut builder, COUNTS);
        load_names(&mut builder, NAMES);
        let table = builder.build();

        let wait = table.lookup(0x0001).unwrap();
        assert_eq!(wait.name.as_deref(), Some("wait"));
        assert_eq!(wait.operand_count, OperandCount::Fixed(1));

        let variadic = table.lookup(0x004f).unwrap();
        assert_eq!(variadic.name.as_deref(), Some("start_new_script"));
        assert_eq!(variadic.operand_count, OperandCount::Variadic);

        assert_eq!(table.lookup(0x0004).unwrap().name, None);
    }

    #[test]
    fn names_then_counts_drops_names() {
        let mut builder = PrototypeTableBuilder::new();
        load_names(&mut builder, NAMES);
        load_counts(&mut builder, COUNTS);
        let table = builder.build();

        assert_eq!(table.lookup(0x0001).unwrap().name, None);
    }

    #[test]
    fn dump_round_trip() {
        let mut builder = PrototypeTableBuilder::new();
        load_counts(&mut builder, COUNTS);
        load_names(&mut builder, NAMES);
        builder.insert(Prototype::operator(0x0008, "+=", 2));
        let table = builder.build();

        let text = dump(&table);
        assert!(text.starts_with("0000 (func 0) nop\n0001 (func 1) wait\n"));
        assert!(text.contains("0004 (func 2)\n"));
        assert!(text.contains("0008 (oper 2) +=\n"));
        assert!(text.contains("004f (func -1) start_new_script\n"));

        let mut reloaded = PrototypeTableBuilder::new();
        assert_eq!(load_dump(&mut reloaded, &text), table.len());
        let reloaded = reloaded.build();

        assert!(table.iter().eq(reloaded.iter()));
        assert_eq!(dump(&reloaded), text);
    }

    #[test]
    fn dump_skips_bad_lines() {
        let mut builder = PrototypeTableBuilder::new();
        let text = "; cached\n0001 (func 1) wait\n\nnot a prototype\n0019 (oper 2) > ; gt\n";
        assert_eq!(load_dump(&mut builder, text), 2);

        let table = builder.build();
        assert_eq!(table.lookup(0x0019).unwrap().invoke, InvokeType::Operator);
    }

    #[test]
    fn file_wrappers() {
        let dir = tempfile::tempdir().unwrap();
        let counts = dir.path().join("counts.ini");
        let names = dir.path().join("names.def");
        let output = dir.path().join("prototypes.txt");
        fs::write(&counts, COUNTS).unwrap();
        fs::write(&names, NAMES).unwrap();

        let mut builder = PrototypeTableBuilder::new();
        assert_eq!(load_counts_file(&mut builder, &counts).unwrap(), 5);
        assert_eq!(load_names_file(&mut builder, &names).unwrap(), 4);
        let table = builder.build();

        write_dump_file(&table, &output).unwrap();
        let mut reloaded = PrototypeTableBuilder::new();
        load_dump_file(&mut reloaded, &output).unwrap();
        assert!(table.iter().eq(reloaded.build().iter()));

        let missing = dir.path().join("missing.ini");
        assert!(matches!(
            load_counts_file(&mut PrototypeTableBuilder::new(), &missing),
            Err(crate::Error::FileError(_))
        ));
    }
}
