//! Opcode prototypes: the metadata that tells the decoder how many operands an instruction
//! carries and tells the renderer how to write it.
//!
//! Scripts do not describe their own instruction set, so every opcode's operand count, name and
//! call/operator form comes from external definition files. This module models one such entry
//! as a [`Prototype`], collects entries through a [`PrototypeTableBuilder`] and hands out an
//! immutable [`PrototypeTable`] for decoding. Decoding and rendering accept anything
//! implementing [`PrototypeLookup`], so tests and embedders can also use a plain map.
//!
//! # Example
//!
//! ```rust
//! use scmscope::prototypes::{load_counts, load_names, PrototypeLookup, PrototypeTableBuilder};
//!
//! let mut builder = PrototypeTableBuilder::new();
//! load_counts(&mut builder, "0001=1,wait\n");
//! load_names(&mut builder, "0001 wait(ms)\n");
//! let table = builder.build();
//!
//! let wait = table.lookup(0x0001).unwrap();
//! assert_eq!(wait.to_string(), "0001 (func 1) wait");
//! ```

mod loader;
mod prototype;
mod table;

pub use loader::{
    dump, load_counts, load_counts_file, load_dump, load_dump_file, load_names, load_names_file,
    write_dump_file,
};
pub(crate) use prototype::parse_opcode;
pub use prototype::{InvokeType, OperandCount, Prototype};
pub use table::{PrototypeLookup, PrototypeTable, PrototypeTableBuilder};
