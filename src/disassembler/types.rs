//! Operand type tags and the semantic kinds they lift to.
//!
//! Every operand in a compiled script starts with a one-byte [`ConcreteType`] tag describing
//! its binary encoding: how wide the payload is and how to read it. The rest of the pipeline
//! does not care about most of those distinctions (an 8-bit and a 32-bit immediate are both
//! just integers), so each tag lifts to one of a smaller set of [`SemanticKind`]s. The pair of
//! both is a [`DataType`].
//!
//! The mapping from tag to kind is total and stateless; only a byte outside the tag
//! enumeration can fail to lift.

use strum::{EnumCount, EnumIter};

use crate::{Error, Result};

/// The on-wire operand type tag.
///
/// The discriminants are the tag byte values as they appear in the bytecode.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, EnumIter, EnumCount, strum::Display)]
#[repr(u8)]
pub enum ConcreteType {
    /// Terminates the operand list of a variadic instruction
    EndOfArguments = 0x00,
    /// Immediate signed 32-bit integer
    Signed32 = 0x01,
    /// Global 32-bit variable, addressed by a 16-bit offset
    Global32 = 0x02,
    /// Local 32-bit variable, addressed by a 16-bit index
    Local32 = 0x03,
    /// Immediate signed 8-bit integer
    Signed8 = 0x04,
    /// Immediate signed 16-bit integer
    Signed16 = 0x05,
    /// Immediate IEEE-754 single precision float
    Float32 = 0x06,
    /// Element of a global 32-bit array
    Global32Element = 0x07,
    /// Element of a local 32-bit array
    Local32Element = 0x08,
    /// Immediate string in an 8-byte, null-padded field
    String8 = 0x09,
    /// Global 8-byte string variable
    GlobalString8 = 0x0a,
    /// Local 8-byte string variable
    LocalString8 = 0x0b,
    /// Element of a global 8-byte string array
    GlobalString8Element = 0x0c,
    /// Element of a local 8-byte string array
    LocalString8Element = 0x0d,
    /// Immediate string, preceded by a one-byte length
    VariableString = 0x0e,
    /// Immediate string in a 16-byte, null-padded field
    String16 = 0x0f,
    /// Global 16-byte string variable
    GlobalString16 = 0x10,
    /// Local 16-byte string variable
    LocalString16 = 0x11,
    /// Element of a global 16-byte string array
    GlobalString16Element = 0x12,
    /// Element of a local 16-byte string array
    LocalString16Element = 0x13,
}

/// Encoded payload width of an operand.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Width {
    /// The payload always occupies this many bytes
    Fixed(usize),
    /// The payload length is stored in the byte following the tag
    LengthPrefixed,
}

impl ConcreteType {
    /// Returns the tag byte as stored in the bytecode.
    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Returns the width of the payload following this tag.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scmscope::disassembler::{ConcreteType, Width};
    ///
    /// assert_eq!(ConcreteType::Signed16.width(), Width::Fixed(2));
    /// assert_eq!(ConcreteType::VariableString.width(), Width::LengthPrefixed);
    /// assert_eq!(ConcreteType::EndOfArguments.width(), Width::Fixed(0));
    /// ```
    #[must_use]
    pub fn width(self) -> Width {
        match self {
            ConcreteType::EndOfArguments => Width::Fixed(0),
            ConcreteType::Signed8 => Width::Fixed(1),
            ConcreteType::Global32
            | ConcreteType::Local32
            | ConcreteType::Signed16
            | ConcreteType::GlobalString8
            | ConcreteType::LocalString8
            | ConcreteType::GlobalString16
            | ConcreteType::LocalString16 => Width::Fixed(2),
            ConcreteType::Signed32 | ConcreteType::Float32 => Width::Fixed(4),
            ConcreteType::Global32Element
            | ConcreteType::Local32Element
            | ConcreteType::GlobalString8Element
            | ConcreteType::LocalString8Element
            | ConcreteType::GlobalString16Element
            | ConcreteType::LocalString16Element => Width::Fixed(6),
            ConcreteType::String8 => Width::Fixed(8),
            ConcreteType::String16 => Width::Fixed(16),
            ConcreteType::VariableString => Width::LengthPrefixed,
        }
    }

    /// Returns the semantic kind this tag lifts to.
    #[must_use]
    pub fn kind(self) -> SemanticKind {
        match self {
            ConcreteType::EndOfArguments => SemanticKind::End,
            ConcreteType::Signed8 | ConcreteType::Signed16 | ConcreteType::Signed32 => {
                SemanticKind::Integer
            }
            ConcreteType::Float32 => SemanticKind::Float,
            ConcreteType::String8 | ConcreteType::String16 | ConcreteType::VariableString => {
                SemanticKind::String
            }
            ConcreteType::Global32 => SemanticKind::GlobalScalar,
            ConcreteType::Local32 => SemanticKind::LocalScalar,
            ConcreteType::Global32Element => SemanticKind::GlobalArray,
            ConcreteType::Local32Element => SemanticKind::LocalArray,
            ConcreteType::GlobalString8 | ConcreteType::GlobalString16 => {
                SemanticKind::GlobalString
            }
            ConcreteType::LocalString8 | ConcreteType::LocalString16 => SemanticKind::LocalString,
            ConcreteType::GlobalString8Element | ConcreteType::GlobalString16Element => {
                SemanticKind::GlobalStringArray
            }
            ConcreteType::LocalString8Element | ConcreteType::LocalString16Element => {
                SemanticKind::LocalStringArray
            }
        }
    }
}

impl TryFrom<u8> for ConcreteType {
    type Error = Error;

    fn try_from(tag: u8) -> Result<Self> {
        Ok(match tag {
            0x00 => ConcreteType::EndOfArguments,
            0x01 => ConcreteType::Signed32,
            0x02 => ConcreteType::Global32,
            0x03 => ConcreteType::Local32,
            0x04 => ConcreteType::Signed8,
            0x05 => ConcreteType::Signed16,
            0x06 => ConcreteType::Float32,
            0x07 => ConcreteType::Global32Element,
            0x08 => ConcreteType::Local32Element,
            0x09 => ConcreteType::String8,
            0x0a => ConcreteType::GlobalString8,
            0x0b => ConcreteType::LocalString8,
            0x0c => ConcreteType::GlobalString8Element,
            0x0d => ConcreteType::LocalString8Element,
            0x0e => ConcreteType::VariableString,
            0x0f => ConcreteType::String16,
            0x10 => ConcreteType::GlobalString16,
            0x11 => ConcreteType::LocalString16,
            0x12 => ConcreteType::GlobalString16Element,
            0x13 => ConcreteType::LocalString16Element,
            _ => return Err(Error::InvalidTypeTag(tag)),
        })
    }
}

/// The reduced classification of an operand used for decoding and formatting decisions.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, EnumIter, EnumCount, strum::Display)]
pub enum SemanticKind {
    /// End of a variadic operand list
    End,
    /// Immediate integer of any width
    Integer,
    /// Immediate float
    Float,
    /// Immediate string of any encoding
    String,
    /// Global numeric variable
    GlobalScalar,
    /// Local numeric variable
    LocalScalar,
    /// Element of a global numeric array
    GlobalArray,
    /// Element of a local numeric array
    LocalArray,
    /// Global string variable
    GlobalString,
    /// Local string variable
    LocalString,
    /// Element of a global string array
    GlobalStringArray,
    /// Element of a local string array
    LocalStringArray,
}

impl SemanticKind {
    /// Local scalar variable, numeric or string.
    #[must_use]
    pub fn is_local(self) -> bool {
        matches!(self, SemanticKind::LocalScalar | SemanticKind::LocalString)
    }

    /// Global scalar variable, numeric or string.
    #[must_use]
    pub fn is_global(self) -> bool {
        matches!(self, SemanticKind::GlobalScalar | SemanticKind::GlobalString)
    }

    /// Any scalar variable reference.
    #[must_use]
    pub fn is_variable(self) -> bool {
        self.is_global() || self.is_local()
    }

    /// Any array-element reference.
    #[must_use]
    pub fn is_array_element(self) -> bool {
        matches!(
            self,
            SemanticKind::GlobalArray
                | SemanticKind::LocalArray
                | SemanticKind::GlobalStringArray
                | SemanticKind::LocalStringArray
        )
    }
}

/// A concrete tag together with the semantic kind it lifts to.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct DataType {
    /// The tag as read from the stream
    pub concrete: ConcreteType,
    /// The kind derived from `concrete`
    pub kind: SemanticKind,
}

impl DataType {
    /// Lifts a raw tag byte to its data type.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidTypeTag`] if `tag` is not part of the tag enumeration.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scmscope::disassembler::{ConcreteType, DataType, SemanticKind};
    ///
    /// let data_type = DataType::lift(0x0b)?;
    /// assert_eq!(data_type.concrete, ConcreteType::LocalString8);
    /// assert_eq!(data_type.kind, SemanticKind::LocalString);
    ///
    /// assert!(DataType::lift(0x42).is_err());
    /// # Ok::<(), scmscope::Error>(())
    /// ```
    pub fn lift(tag: u8) -> Result<DataType> {
        Ok(DataType::from(ConcreteType::try_from(tag)?))
    }
}

impl From<ConcreteType> for DataType {
    fn from(concrete: ConcreteType) -> Self {
        DataType {
            concrete,
            kind: concrete.kind(),
        }
    }
}
