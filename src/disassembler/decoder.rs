//! Instruction decoding.
//!
//! An instruction is a little-endian 16-bit header followed by its operands. The low 15 bits
//! of the header select the opcode, bit 15 requests the result to be inverted. Scripts do not
//! encode how many operands follow; that comes from the opcode's
//! [`Prototype`](crate::prototypes::Prototype) in a [`PrototypeLookup`], which must be fully
//! populated before decoding starts.
//!
//! # Example: Decoding a Single Instruction
//!
//! ```rust
//! use scmscope::{disassembler::decode_instruction, prototypes::Prototype, Parser};
//! use std::collections::HashMap;
//!
//! let mut prototypes = HashMap::new();
//! prototypes.insert(0x0001, Prototype::function(0x0001, "wait", 1));
//!
//! // wait(100)
//! let mut parser = Parser::new(&[0x01, 0x00, 0x04, 0x64]);
//! let instruction = decode_instruction(&mut parser, &prototypes)?;
//!
//! assert_eq!(instruction.opcode, 0x0001);
//! assert_eq!(instruction.arguments.len(), 1);
//! assert_eq!(instruction.size, 4);
//! # Ok::<(), scmscope::Error>(())
//! ```
//!
//! # Example: Decoding a Stream of Instructions
//!
//! ```rust
//! use scmscope::{disassembler::decode_stream, prototypes::PrototypeTable, Parser};
//!
//! // Without prototypes every opcode decodes without operands
//! let mut parser = Parser::new(&[0x00, 0x00, 0x4e, 0x00]);
//! let instructions = decode_stream(&mut parser, &PrototypeTable::default())?;
//!
//! assert_eq!(instructions.len(), 2);
//! assert_eq!(instructions[1].opcode, 0x004e);
//! assert_eq!(instructions[1].offset, 2);
//! # Ok::<(), scmscope::Error>(())
//! ```

use std::iter::FusedIterator;

use crate::{
    disassembler::{decode_value, HeaderFlags, Instruction, SemanticKind, Value, OPCODE_MASK},
    file::parser::Parser,
    prototypes::{OperandCount, PrototypeLookup},
    Error, Result,
};

/// How the decoder treats an opcode that has no prototype.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum UnknownOpcodePolicy {
    /// Decode it as an instruction without operands and carry on
    #[default]
    Lenient,
    /// Abort with [`Error::UnknownOpcode`]
    Strict,
}

/// Options for a decoding run.
///
/// # Examples
///
/// ```rust
/// use scmscope::disassembler::{DecoderConfig, UnknownOpcodePolicy};
///
/// let config = DecoderConfig {
///     unknown_opcodes: UnknownOpcodePolicy::Strict,
/// };
/// assert_ne!(config, DecoderConfig::default());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct DecoderConfig {
    /// Policy for opcodes missing from the prototype lookup
    pub unknown_opcodes: UnknownOpcodePolicy,
}

/// A decoder bound to a prototype lookup and a configuration.
///
/// The free functions [`decode_instruction`] and [`decode_stream`] cover the default
/// configuration; a `Decoder` is the way to decode with a non-default one, or to decode
/// incrementally through [`Decoder::iter`].
///
/// # Examples
///
/// ```rust
/// use scmscope::{
///     disassembler::{Decoder, DecoderConfig, UnknownOpcodePolicy},
///     prototypes::PrototypeTable,
///     Error, Parser,
/// };
///
/// let table = PrototypeTable::default();
/// let decoder = Decoder::with_config(
///     &table,
///     DecoderConfig {
///         unknown_opcodes: UnknownOpcodePolicy::Strict,
///     },
/// );
///
/// let mut parser = Parser::new(&[0x34, 0x12]);
/// assert!(matches!(
///     decoder.decode_instruction(&mut parser),
///     Err(Error::UnknownOpcode { opcode: 0x1234, offset: 0 })
/// ));
/// ```
#[derive(Debug)]
pub struct Decoder<'t, L: PrototypeLookup + ?Sized> {
    prototypes: &'t L,
    config: DecoderConfig,
}

impl<L: PrototypeLookup + ?Sized> Clone for Decoder<'_, L> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<L: PrototypeLookup + ?Sized> Copy for Decoder<'_, L> {}

impl<'t, L: PrototypeLookup + ?Sized> Decoder<'t, L> {
    /// Create a decoder with the default configuration
    ///
    /// ## Arguments
    /// * 'prototypes' - The lookup providing operand counts per opcode
    pub fn new(prototypes: &'t L) -> Self {
        Self::with_config(prototypes, DecoderConfig::default())
    }

    /// Create a decoder with an explicit configuration
    ///
    /// ## Arguments
    /// * 'prototypes'  - The lookup providing operand counts per opcode
    /// * 'config'      - Options for this decoder
    pub fn with_config(prototypes: &'t L, config: DecoderConfig) -> Self {
        Decoder { prototypes, config }
    }

    /// The configuration this decoder runs with.
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decodes one instruction at the current parser position.
    ///
    /// # Errors
    ///
    /// - [`Error::TruncatedInput`] if the stream ends inside the header
    /// - [`Error::UnknownOpcode`] for an opcode without prototype under
    ///   [`UnknownOpcodePolicy::Strict`]
    /// - [`Error::Instruction`] wrapping the operand error if an operand fails to decode
    pub fn decode_instruction(&self, parser: &mut Parser) -> Result<Instruction> {
        let offset = parser.pos();
        let header = parser.read_le::<u16>()?;

        let opcode = header & OPCODE_MASK;
        let flags = HeaderFlags::from_header(header);

        let operand_count = match self.prototypes.lookup(opcode) {
            Some(prototype) => prototype.operand_count,
            None => match self.config.unknown_opcodes {
                UnknownOpcodePolicy::Lenient => {
                    log::debug!(
                        "Opcode 0x{:04x} at offset 0x{:x} has no prototype, assuming no operands",
                        opcode,
                        offset
                    );
                    OperandCount::Fixed(0)
                }
                UnknownOpcodePolicy::Strict => {
                    return Err(Error::UnknownOpcode { opcode, offset });
                }
            },
        };

        let arguments =
            decode_arguments(parser, operand_count).map_err(|source| Error::Instruction {
                opcode,
                offset,
                source: Box::new(source),
            })?;

        Ok(Instruction {
            offset,
            size: parser.pos() - offset,
            opcode,
            invert_result: flags.contains(HeaderFlags::INVERT_RESULT),
            arguments,
        })
    }

    /// Decodes instructions until the parser is exhausted.
    ///
    /// # Errors
    ///
    /// Returns the first error [`Decoder::decode_instruction`] produces; instructions decoded
    /// before it are dropped. Use [`Decoder::iter`] to keep them.
    pub fn decode_stream(&self, parser: &mut Parser) -> Result<Vec<Instruction>> {
        self.iter(parser).collect()
    }

    /// Returns an iterator decoding one instruction per step.
    pub fn iter<'a, 'd>(&self, parser: &'a mut Parser<'d>) -> InstructionIter<'a, 'd, 't, L> {
        InstructionIter {
            decoder: *self,
            parser,
            failed: false,
        }
    }
}

/// Decodes the operands of one instruction.
fn decode_arguments(parser: &mut Parser, operand_count: OperandCount) -> Result<Vec<Value>> {
    match operand_count {
        OperandCount::Fixed(count) => {
            // A bogus count must not turn into a huge allocation, every operand takes a byte
            let mut arguments = Vec::with_capacity(count.min(parser.remaining()));
            for _ in 0..count {
                arguments.push(decode_value(parser)?);
            }
            Ok(arguments)
        }
        OperandCount::Variadic => {
            let mut arguments = Vec::new();
            loop {
                let value = decode_value(parser)?;
                if value.kind() == SemanticKind::End {
                    return Ok(arguments);
                }
                arguments.push(value);
            }
        }
    }
}

/// Incremental decoder over a parser, see [`Decoder::iter`].
///
/// Yields `Err` at most once: after the first error the stream position can no longer be
/// trusted and the iterator is exhausted.
///
/// # Examples
///
/// ```rust
/// use scmscope::{disassembler::Decoder, prototypes::PrototypeTable, Parser};
///
/// let table = PrototypeTable::default();
/// // two instructions, then half a header
/// let mut parser = Parser::new(&[0x01, 0x00, 0x02, 0x00, 0x03]);
///
/// let results: Vec<_> = Decoder::new(&table).iter(&mut parser).collect();
/// assert_eq!(results.len(), 3);
/// assert!(results[0].is_ok() && results[1].is_ok());
/// assert!(results[2].is_err());
/// ```
pub struct InstructionIter<'a, 'd, 't, L: PrototypeLookup + ?Sized> {
    decoder: Decoder<'t, L>,
    parser: &'a mut Parser<'d>,
    failed: bool,
}

impl<L: PrototypeLookup + ?Sized> Iterator for InstructionIter<'_, '_, '_, L> {
    type Item = Result<Instruction>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || !self.parser.has_more_data() {
            return None;
        }

        let result = self.decoder.decode_instruction(self.parser);
        self.failed = result.is_err();
        Some(result)
    }
}

impl<L: PrototypeLookup + ?Sized> FusedIterator for InstructionIter<'_, '_, '_, L> {}

/// Decodes a single instruction from the current parser position, treating opcodes without
/// prototype as instructions without operands.
///
/// On success the parser is positioned at the next instruction.
///
/// # Errors
///
/// - [`Error::TruncatedInput`] if the stream ends inside the header
/// - [`Error::Instruction`] wrapping [`Error::InvalidTypeTag`] or [`Error::TruncatedInput`]
///   if an operand fails to decode
pub fn decode_instruction<L: PrototypeLookup + ?Sized>(
    parser: &mut Parser,
    prototypes: &L,
) -> Result<Instruction> {
    Decoder::new(prototypes).decode_instruction(parser)
}

/// Decodes a sequence of instructions until the parser is exhausted.
///
/// An empty stream decodes to no instructions. Decoding stops at the first error, which is
/// returned unchanged.
///
/// # Errors
///
/// Same as [`decode_instruction`]; a single trailing byte is reported as
/// [`Error::TruncatedInput`].
pub fn decode_stream<L: PrototypeLookup + ?Sized>(
    parser: &mut Parser,
    prototypes: &L,
) -> Result<Vec<Instruction>> {
    Decoder::new(prototypes).decode_stream(parser)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::{
        disassembler::{ConcreteType, Payload},
        prototypes::{Prototype, PrototypeTable},
        test::ScriptBuilder,
    };

    fn prototypes() -> PrototypeTable {
        [
            Prototype::function(0x0000, "nop", 0),
            Prototype::function(0x0001, "wait", 1),
            Prototype::operator(0x0008, "+=", 2),
            Prototype::function(0x00a4, "locate_char_2d", 6),
            Prototype::new(0x004f, OperandCount::Variadic),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn decode_instruction_no_operands() {
        let mut parser = Parser::new(&[0x00, 0x00]);
        let instruction = decode_instruction(&mut parser, &prototypes()).unwrap();

        assert_eq!(instruction.offset, 0);
        assert_eq!(instruction.size, 2);
        assert_eq!(instruction.opcode, 0x0000);
        assert!(!instruction.invert_result);
        assert!(instruction.arguments.is_empty());
        assert!(!parser.has_more_data());
    }

    #[test]
    fn decode_instruction_inverted() {
        let mut parser = Parser::new(&[0x00, 0x80]);
        let instruction = decode_instruction(&mut parser, &prototypes()).unwrap();

        assert_eq!(instruction.opcode, 0x0000);
        assert!(instruction.invert_result);
        assert_eq!(instruction.header(), 0x8000);
    }

    #[test]
    fn decode_instruction_operands() {
        let bytes = ScriptBuilder::new()
            .header(0x0008, false)
            .global_var(0x0c)
            .float(1.5)
            .build();
        let mut parser = Parser::new(&bytes);
        let instruction = decode_instruction(&mut parser, &prototypes()).unwrap();

        assert_eq!(instruction.size, bytes.len());
        assert_eq!(instruction.arguments.len(), 2);
        assert_eq!(instruction.arguments[0].kind(), SemanticKind::GlobalScalar);
        assert_eq!(instruction.arguments[0].payload, Payload::Integer(0x0c));
        assert_eq!(instruction.arguments[1].payload, Payload::Float(1.5));
    }

    #[test]
    fn decode_instruction_mixed_operands() {
        let bytes = ScriptBuilder::new()
            .header(0x00a4, true)
            .local_var(0)
            .int32(-1234)
            .int16(300)
            .string8("BOAT")
            .var_string("mission")
            .element(ConcreteType::Local32Element, 0, 0x10, 0x02, 0x81)
            .build();
        let mut parser = Parser::new(&bytes);
        let instruction = decode_instruction(&mut parser, &prototypes()).unwrap();

        assert!(instruction.invert_result);
        assert_eq!(instruction.size, bytes.len());
        let kinds: Vec<SemanticKind> = instruction.arguments.iter().map(Value::kind).collect();
        assert_eq!(
            kinds,
            vec![
                SemanticKind::LocalScalar,
                SemanticKind::Integer,
                SemanticKind::Integer,
                SemanticKind::String,
                SemanticKind::String,
                SemanticKind::LocalArray,
            ]
        );
    }

    #[test]
    fn decode_instruction_unknown_opcode_lenient() {
        // header 0x1234 followed by bytes that must stay unread
        let mut parser = Parser::new(&[0x34, 0x12, 0x04, 0x05]);
        let instruction = decode_instruction(&mut parser, &prototypes()).unwrap();

        assert_eq!(instruction.opcode, 0x1234);
        assert!(instruction.arguments.is_empty());
        assert_eq!(parser.pos(), 2);
    }

    #[test]
    fn decode_instruction_unknown_opcode_strict() {
        let table = prototypes();
        let decoder = Decoder::with_config(
            &table,
            DecoderConfig {
                unknown_opcodes: UnknownOpcodePolicy::Strict,
            },
        );

        let mut parser = Parser::new(&[0x00, 0x00, 0x34, 0x92]);
        assert!(decoder.decode_instruction(&mut parser).is_ok());
        match decoder.decode_instruction(&mut parser) {
            Err(Error::UnknownOpcode { opcode, offset }) => {
                assert_eq!(opcode, 0x1234);
                assert_eq!(offset, 2);
            }
            other => panic!("Expected UnknownOpcode, got {other:?}"),
        }
    }

    #[test]
    fn decode_instruction_variadic() {
        let bytes = ScriptBuilder::new()
            .header(0x004f, false)
            .int32(0x1f4)
            .local_var(1)
            .int8(3)
            .end()
            .header(0x0000, false)
            .build();
        let mut parser = Parser::new(&bytes);
        let table = prototypes();

        let instruction = decode_instruction(&mut parser, &table).unwrap();
        assert_eq!(instruction.arguments.len(), 3);
        assert_eq!(instruction.size, 2 + 5 + 3 + 2 + 1);
        assert!(instruction
            .arguments
            .iter()
            .all(|argument| argument.kind() != SemanticKind::End));

        let next = decode_instruction(&mut parser, &table).unwrap();
        assert_eq!(next.offset, instruction.size);
        assert!(!parser.has_more_data());
    }

    #[test]
    fn decode_instruction_variadic_without_end() {
        let bytes = ScriptBuilder::new().header(0x004f, false).int8(1).build();
        let mut parser = Parser::new(&bytes);

        match decode_instruction(&mut parser, &prototypes()) {
            Err(Error::Instruction { opcode, source, .. }) => {
                assert_eq!(opcode, 0x004f);
                assert!(matches!(*source, Error::TruncatedInput { offset: 4, .. }));
            }
            other => panic!("Expected Instruction error, got {other:?}"),
        }
    }

    #[test]
    fn decode_instruction_truncated_header() {
        let mut parser = Parser::new(&[0x01]);
        match decode_instruction(&mut parser, &prototypes()) {
            Err(Error::TruncatedInput {
                offset,
                requested,
                available,
            }) => {
                assert_eq!(offset, 0);
                assert_eq!(requested, 2);
                assert_eq!(available, 1);
            }
            other => panic!("Expected TruncatedInput, got {other:?}"),
        }
    }

    #[test]
    fn decode_instruction_truncated_operand() {
        // wait, with its operand list cut short
        let mut parser = Parser::new(&[0x00, 0x00, 0x01, 0x00, 0x01, 0x10]);
        let table = prototypes();

        decode_instruction(&mut parser, &table).unwrap();
        let error = decode_instruction(&mut parser, &table).unwrap_err();

        assert!(matches!(
            error,
            Error::Instruction {
                opcode: 0x0001,
                offset: 2,
                ..
            }
        ));
        assert!(matches!(
            error.root_cause(),
            Error::TruncatedInput {
                offset: 5,
                requested: 4,
                available: 1
            }
        ));
    }

    #[test]
    fn decode_instruction_invalid_tag() {
        let mut parser = Parser::new(&[0x01, 0x00, 0x7f, 0x00]);
        let error = decode_instruction(&mut parser, &prototypes()).unwrap_err();

        assert!(matches!(error.root_cause(), Error::InvalidTypeTag(0x7f)));
        assert!(error.to_string().contains("0x0001"));
    }

    #[test]
    fn decode_stream_empty() {
        let mut parser = Parser::new(&[]);
        let instructions = decode_stream(&mut parser, &prototypes()).unwrap();
        assert!(instructions.is_empty());
    }

    #[test]
    fn decode_stream_sequence() {
        let bytes = ScriptBuilder::new()
            .header(0x0001, false)
            .int16(250)
            .header(0x0000, true)
            .header(0x0008, false)
            .local_var(4)
            .int8(1)
            .build();
        let mut parser = Parser::new(&bytes);
        let instructions = decode_stream(&mut parser, &prototypes()).unwrap();

        let summary: Vec<(usize, usize, u16)> = instructions
            .iter()
            .map(|i| (i.offset, i.size, i.opcode))
            .collect();
        assert_eq!(
            summary,
            vec![(0, 5, 0x0001), (5, 2, 0x0000), (7, 7, 0x0008)]
        );
        assert!(instructions[1].invert_result);
    }

    #[test]
    fn decode_stream_trailing_byte() {
        let bytes = ScriptBuilder::new().header(0x0000, false).raw(&[0x00]).build();
        let mut parser = Parser::new(&bytes);

        assert!(matches!(
            decode_stream(&mut parser, &prototypes()),
            Err(Error::TruncatedInput { offset: 2, .. })
        ));
    }

    #[test]
    fn iter_stops_after_error() {
        let bytes = ScriptBuilder::new()
            .header(0x0000, false)
            .header(0x0001, false)
            .raw(&[0x42])
            .header(0x0000, false)
            .build();
        let table = prototypes();
        let mut parser = Parser::new(&bytes);
        let mut iter = Decoder::new(&table).iter(&mut parser);

        assert_eq!(iter.next().unwrap().unwrap().opcode, 0x0000);
        assert!(iter.next().unwrap().is_err());
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }

    #[test]
    fn decode_with_hashmap_lookup() {
        let mut map = HashMap::new();
        map.insert(0x0002, Prototype::function(0x0002, "goto", 1));

        let bytes = ScriptBuilder::new()
            .header(0x0002, false)
            .int32(-120)
            .build();
        let mut parser = Parser::new(&bytes);
        let instructions = decode_stream(&mut parser, &map).unwrap();

        assert_eq!(instructions.len(), 1);
        assert_eq!(instructions[0].arguments[0].payload, Payload::Integer(-120));
    }

    #[test]
    fn decode_huge_operand_count() {
        let mut map = HashMap::new();
        map.insert(
            0x0003,
            Prototype::new(0x0003, OperandCount::Fixed(usize::MAX)),
        );

        let mut parser = Parser::new(&[0x03, 0x00, 0x04, 0x01]);
        let error = decode_instruction(&mut parser, &map).unwrap_err();
        assert!(matches!(error.root_cause(), Error::TruncatedInput { .. }));
    }
}
