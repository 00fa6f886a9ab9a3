// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
//#![deny(unsafe_code)]
// - 'file/physical.rs' uses mmap to map a file into memory

//! # scmscope
//!
//! A disassembler for compiled SCM scripts, the bytecode format of a scripted-automation
//! engine. `scmscope` decodes the instruction stream of a script and renders every instruction
//! as one line of readable pseudo-source.
//!
//! ## Features
//!
//! - **Memory-mapped input** - Scripts are mapped, not copied, and decoded in place
//! - **Complete operand support** - All 20 operand type tags, including array-element references
//! - **External instruction sets** - Opcode names and operand counts come from text files
//! - **Strict error handling** - Decoding stops at the first malformed field and reports where
//!
//! ## Quick Start
//!
//! ```rust
//! use scmscope::prelude::*;
//!
//! let mut builder = PrototypeTableBuilder::new();
//! load_counts(&mut builder, "0001=1,wait %1d% ms\n0004=2,%1d% = %2d%\n");
//! load_names(&mut builder, "0001 wait\n");
//! builder.insert(Prototype::operator(0x0004, "=", 2));
//! let table = builder.build();
//!
//! let script = Script::from_mem(vec![
//!     0x01, 0x00, 0x05, 0xfa, 0x00, // wait(250)
//!     0x04, 0x00, 0x02, 0x08, 0x00, 0x04, 0x01, // global_8 = 1
//! ]);
//!
//! let mut parser = script.parser();
//! let lines = decode_stream(&mut parser, &table)?
//!     .iter()
//!     .map(|instruction| render(instruction, &table))
//!     .collect::<Result<Vec<_>>>()?;
//!
//! assert_eq!(lines, vec!["wait(250)", "global_8 = 1"]);
//! # Ok::<(), scmscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`prelude`] - Convenient re-exports of commonly used types and traits
//! - [`disassembler`] - Operand types, value and instruction decoding, rendering
//! - [`prototypes`] - Opcode prototypes and the text formats they are loaded from
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`](Result). Decoding errors carry the byte offset
//! and opcode of the instruction that failed:
//!
//! ```rust
//! use scmscope::{disassembler::decode_stream, prototypes::Prototype, Error, Parser};
//! use std::collections::HashMap;
//!
//! let mut prototypes = HashMap::new();
//! prototypes.insert(0x0001, Prototype::function(0x0001, "wait", 1));
//!
//! // wait, with an operand tag that does not exist
//! let mut parser = Parser::new(&[0x01, 0x00, 0x99]);
//! match decode_stream(&mut parser, &prototypes) {
//!     Err(Error::Instruction { opcode, offset, source }) => {
//!         assert_eq!((opcode, offset), (0x0001, 0));
//!         assert!(matches!(*source, Error::InvalidTypeTag(0x99)));
//!     }
//!     other => panic!("unexpected result: {:?}", other),
//! }
//! ```
//!
//! ## Development and Testing
//!
//! ### Fuzzing
//!
//! ```bash
//! cargo +nightly fuzz run decode_stream --release
//! ```
//!
//! ### Benchmarks
//!
//! ```bash
//! cargo bench
//! ```
#[macro_use]
pub(crate) mod error;
pub(crate) mod file;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use scmscope::prelude::*;
///
/// let table = PrototypeTable::default();
/// let mut parser = Parser::new(&[0x00, 0x00]);
/// let instructions = decode_stream(&mut parser, &table)?;
/// assert_eq!(render(&instructions[0], &table)?, "0x0()");
/// # Ok::<(), scmscope::Error>(())
/// ```
pub mod prelude;

/// Operand types, value decoding, instruction decoding and pseudo-source rendering
///
/// # Key Types
///
/// - [`disassembler::Instruction`] - A decoded instruction
/// - [`disassembler::Value`] - A decoded operand
/// - [`disassembler::ConcreteType`] - The on-wire operand type tags
/// - [`disassembler::SemanticKind`] - What an operand type means
///
/// # Main Functions
///
/// - [`disassembler::decode_instruction`] - Decode a single instruction
/// - [`disassembler::decode_stream`] - Decode a sequence of instructions
/// - [`disassembler::render`] - Render an instruction as pseudo-source
pub mod disassembler;

/// Opcode prototypes, prototype tables and their text formats
///
/// Decoding needs to know how many operands each opcode takes, and rendering needs its name
/// and whether it is an operator. Both come from a [`prototypes::PrototypeTable`] assembled
/// from counts and names files, or from a previously written dump.
pub mod prototypes;

/// `scmscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `scmscope` Error type
///
/// The main error type for all operations in this crate.
pub use error::Error;

/// Low-level byte access: the [`Parser`] cursor used for decoding, and [`Script`], which owns
/// the bytes of a script loaded from disk or memory.
///
/// # Example
///
/// ```rust
/// use scmscope::{disassembler::decode_value, Parser};
///
/// let mut parser = Parser::new(&[0x06, 0x00, 0x00, 0x20, 0x41]);
/// assert_eq!(decode_value(&mut parser)?.code_string()?, "10");
/// # Ok::<(), scmscope::Error>(())
/// ```
pub use file::{parser::Parser, Script};
