//! # scmscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the scmscope library. Import this module to get quick access to everything needed
//! to load prototypes, decode a script and render it.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all scmscope operations
pub use crate::Error;

/// The result type used throughout scmscope
pub use crate::Result;

// ================================================================================================
// Input
// ================================================================================================

/// Script input and the byte cursor used for decoding
pub use crate::{Parser, Script};

// ================================================================================================
// Disassembly
// ================================================================================================

/// Decoding and rendering entry points
pub use crate::disassembler::{decode_instruction, decode_stream, decode_value, render};

/// Decoder configuration and incremental decoding
pub use crate::disassembler::{Decoder, DecoderConfig, InstructionIter, UnknownOpcodePolicy};

/// Decoded instructions and operands
pub use crate::disassembler::{
    ArrayAccess, ConcreteType, ElementType, Instruction, Payload, SemanticKind, Value,
};

// ================================================================================================
// Prototypes
// ================================================================================================

/// Prototype model and tables
pub use crate::prototypes::{
    InvokeType, OperandCount, Prototype, PrototypeLookup, PrototypeTable, PrototypeTableBuilder,
};

/// Prototype text formats
pub use crate::prototypes::{
    dump, load_counts, load_counts_file, load_dump, load_dump_file, load_names, load_names_file,
    write_dump_file,
};
