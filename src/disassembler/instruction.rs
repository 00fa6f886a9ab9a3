use bitflags::bitflags;

use crate::disassembler::Value;

/// Bitmask for the opcode part of an instruction header
pub const OPCODE_MASK: u16 = 0x7fff;

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    /// Flag bits of the 16-bit instruction header
    pub struct HeaderFlags: u16 {
        /// Negate the result of the instruction, rendered as `!(...)`
        const INVERT_RESULT = 0x8000;
    }
}

impl HeaderFlags {
    /// Extract the flag bits from a raw instruction header
    #[must_use]
    pub fn from_header(header: u16) -> Self {
        Self::from_bits_truncate(header & !OPCODE_MASK)
    }
}

/// A decoded instruction: opcode, invert flag and operands in read order.
///
/// Instructions are produced by [`crate::disassembler::decode_instruction`] and never change
/// afterwards. They carry no display name; [`crate::disassembler::render`] resolves it from a
/// prototype lookup.
#[derive(Clone, PartialEq, Debug)]
pub struct Instruction {
    /// Byte position of the instruction header in the decoded stream
    pub offset: usize,
    /// Number of bytes the instruction occupies, header included
    pub size: usize,
    /// The 15-bit opcode
    pub opcode: u16,
    /// Whether the header's invert-result bit was set
    pub invert_result: bool,
    /// Decoded operands, in stream order
    pub arguments: Vec<Value>,
}

impl Instruction {
    /// Reassembles the raw 16-bit header this instruction was decoded from.
    #[must_use]
    pub fn header(&self) -> u16 {
        let mut flags = HeaderFlags::empty();
        flags.set(HeaderFlags::INVERT_RESULT, self.invert_result);

        (self.opcode & OPCODE_MASK) | flags.bits()
    }
}
