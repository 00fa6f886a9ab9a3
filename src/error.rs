use thiserror::Error;

use crate::{disassembler::SemanticKind, prototypes::OperandCount};

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Decoding errors ([`Error::InvalidTypeTag`], [`Error::TruncatedInput`],
/// [`Error::UnknownOpcode`]) are fatal for the parse run that produced them: once a field has been
/// misread, the cursor position can no longer be trusted. Operand failures reach the caller
/// wrapped in [`Error::Instruction`], which adds the opcode and byte offset of the instruction
/// being decoded.
///
/// # Error Categories
///
/// ## Decoding Errors
/// - [`Error::InvalidTypeTag`] - An operand type byte outside the known tag set
/// - [`Error::TruncatedInput`] - A field declares more bytes than the stream holds
/// - [`Error::UnknownOpcode`] - An opcode without prototype, under the strict policy
/// - [`Error::Instruction`] - Context wrapper around an operand failure
///
/// ## Rendering Errors
/// - [`Error::UnrenderableValue`] - A decoded value without a renderable payload
/// - [`Error::OperatorArityMismatch`] - An operator prototype that is neither unary nor binary
///
/// ## Configuration and I/O Errors
/// - [`Error::Malformed`] - A prototype definition that could not be parsed
/// - [`Error::FileError`] - Filesystem I/O errors
///
/// # Examples
///
/// ```rust
/// use scmscope::{disassembler::decode_stream, prototypes::PrototypeTable, Error, Parser};
///
/// let table = PrototypeTable::default();
/// let mut parser = Parser::new(&[0x01]);
///
/// match decode_stream(&mut parser, &table) {
///     Err(Error::TruncatedInput { offset, requested, .. }) => {
///         assert_eq!((offset, requested), (0, 2));
///     }
///     other => panic!("unexpected result: {:?}", other),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// An operand type tag outside the known enumeration.
    ///
    /// Only corrupt or non-script input produces this, since tags are read one byte at a
    /// time straight from the stream.
    #[error("Invalid operand type tag - 0x{0:02x}")]
    InvalidTypeTag(u8),

    /// Fewer bytes are available than a field declares.
    ///
    /// # Fields
    ///
    /// * `offset` - Position of the field that could not be read
    /// * `requested` - Number of bytes the field needs
    /// * `available` - Number of bytes left from `offset`
    #[error("Truncated input at offset 0x{offset:x}: needed {requested} bytes, {available} available")]
    TruncatedInput {
        /// Position of the field that could not be read
        offset: usize,
        /// Number of bytes the field needs
        requested: usize,
        /// Number of bytes left from `offset`
        available: usize,
    },

    /// A decoded value has no payload matching any render rule.
    ///
    /// This indicates a decoder/renderer mismatch rather than bad user input. The value of
    /// an end-of-arguments operand is the only decoded value without a payload.
    #[error("Value of kind {0} can not be rendered")]
    UnrenderableValue(SemanticKind),

    /// An operator prototype declares an operand count other than 1 or 2.
    ///
    /// Rendering recovers from this by falling back to call form and logging the error as a
    /// warning; it is never returned from [`crate::disassembler::render`].
    #[error("Operator 0x{opcode:04x} declares {operand_count} operands, only unary and binary operators are supported")]
    OperatorArityMismatch {
        /// The offending opcode
        opcode: u16,
        /// The operand count declared by its prototype
        operand_count: OperandCount,
    },

    /// An opcode without prototype, rejected because the decoder runs with
    /// [`crate::disassembler::UnknownOpcodePolicy::Strict`].
    #[error("Unknown opcode 0x{opcode:04x} at offset 0x{offset:x}")]
    UnknownOpcode {
        /// The opcode, with the invert flag masked off
        opcode: u16,
        /// Position of the instruction header
        offset: usize,
    },

    /// Decoding an operand of an instruction failed.
    #[error("Failed to decode instruction 0x{opcode:04x} at offset 0x{offset:x}: {source}")]
    Instruction {
        /// The opcode of the instruction being decoded
        opcode: u16,
        /// Position of the instruction header
        offset: usize,
        /// The operand error
        #[source]
        source: Box<Error>,
    },

    /// A prototype definition could not be parsed.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// File I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),
}

impl Error {
    /// Returns the innermost error, looking through [`Error::Instruction`] wrappers.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scmscope::Error;
    ///
    /// let error = Error::Instruction {
    ///     opcode: 0x0004,
    ///     offset: 0x10,
    ///     source: Box::new(Error::InvalidTypeTag(0xff)),
    /// };
    /// assert!(matches!(error.root_cause(), Error::InvalidTypeTag(0xff)));
    /// ```
    #[must_use]
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Instruction { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
