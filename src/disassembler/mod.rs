//! SCM bytecode disassembler: operand types, value decoding, instruction decoding and
//! pseudo-source rendering.
//!
//! The pipeline runs in two steps. Decoding turns bytes into [`Instruction`]s, reading
//! operand counts from a [`crate::prototypes::PrototypeLookup`]; rendering turns each
//! instruction into one line of text, reading names and operator forms from the same lookup.
//! Decoding is forward-only and stops at the first malformed field.
//!
//! # Key Types
//! - [`ConcreteType`] / [`SemanticKind`] - Operand type tags and what they mean
//! - [`Value`] / [`Payload`] - A decoded operand
//! - [`Instruction`] - A decoded instruction
//! - [`Decoder`] / [`DecoderConfig`] - Decoding with non-default options
//!
//! # Main Functions
//! - [`decode_value`] - Decode a single operand
//! - [`decode_instruction`] - Decode a single instruction
//! - [`decode_stream`] - Decode a sequence of instructions
//! - [`render`] - Render an instruction as pseudo-source
//!
//! # Example
//! ```rust
//! use scmscope::{
//!     disassembler::{decode_stream, render},
//!     prototypes::{Prototype, PrototypeTable},
//!     Parser,
//! };
//!
//! let table: PrototypeTable = [Prototype::function(0x0001, "wait", 1)].into_iter().collect();
//!
//! let mut parser = Parser::new(&[0x01, 0x00, 0x05, 0xe8, 0x03]);
//! let lines = decode_stream(&mut parser, &table)?
//!     .iter()
//!     .map(|instruction| render(instruction, &table))
//!     .collect::<Result<Vec<_>, _>>()?;
//!
//! assert_eq!(lines, vec!["wait(1000)"]);
//! # Ok::<(), scmscope::Error>(())
//! ```

mod decoder;
mod instruction;
mod render;
mod types;
mod value;

pub use decoder::{
    decode_instruction, decode_stream, Decoder, DecoderConfig, InstructionIter,
    UnknownOpcodePolicy,
};
pub use instruction::{HeaderFlags, Instruction, OPCODE_MASK};
pub use render::render;
pub use types::{ConcreteType, DataType, SemanticKind, Width};
pub use value::{decode_value, ArrayAccess, ElementType, Payload, Value};
