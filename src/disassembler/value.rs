//! Operand values: decoding from the byte stream and rendering as pseudo-source.
//!
//! An operand is a type tag followed by its payload. [`decode_value`] reads both and produces a
//! [`Value`], whose [`Payload`] is chosen by the tag's semantic kind:
//!
//! | Kind                                   | Payload                 |
//! |----------------------------------------|-------------------------|
//! | integer, scalar and string variables   | [`Payload::Integer`]    |
//! | float                                  | [`Payload::Float`]      |
//! | string                                 | [`Payload::String`]     |
//! | any array element                      | [`Payload::Array`]      |
//! | end of arguments                       | [`Payload::Empty`]      |
//!
//! [`Value::code_string`] renders a value the way it is written in pseudo-source.

use crate::{
    disassembler::types::{DataType, SemanticKind, Width},
    file::{
        io::{read_le, read_le_at},
        parser::Parser,
    },
    Error, Result,
};

/// Element type of an array-access descriptor.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum ElementType {
    /// 32-bit integer elements
    Int,
    /// Float elements
    Float,
    /// 8-byte string elements
    String8,
    /// 16-byte string elements
    String16,
    /// An element type byte outside the known set, kept as read
    Other(u8),
}

impl From<u8> for ElementType {
    fn from(value: u8) -> Self {
        match value {
            0 => ElementType::Int,
            1 => ElementType::Float,
            2 => ElementType::String8,
            3 => ElementType::String16,
            other => ElementType::Other(other),
        }
    }
}

/// "The variable at `base`, indexed by the value currently held in the variable at `index`".
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct ArrayAccess {
    /// Type of the array elements
    pub element: ElementType,
    /// Offset of the first array variable
    pub base: u16,
    /// Offset of the variable holding the index
    pub index: u16,
    /// Info byte, stored as read
    pub info: u8,
}

impl ArrayAccess {
    /// Size of an encoded descriptor in bytes.
    pub const SIZE: usize = 6;

    /// Parses a descriptor from its 6-byte encoding: element type, base offset, index offset,
    /// info byte.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::TruncatedInput`] if `data` is shorter than [`ArrayAccess::SIZE`].
    pub fn parse(data: &[u8]) -> Result<ArrayAccess> {
        let mut offset = 0;

        Ok(ArrayAccess {
            element: ElementType::from(read_le_at::<u8>(data, &mut offset)?),
            base: read_le_at::<u16>(data, &mut offset)?,
            index: read_le_at::<u16>(data, &mut offset)?,
            info: read_le_at::<u8>(data, &mut offset)?,
        })
    }
}

/// The decoded payload of an operand. Exactly one shape per value.
#[derive(Clone, PartialEq, Debug)]
pub enum Payload {
    /// No payload; only produced for end-of-arguments markers
    Empty,
    /// Sign-extended integer, or the offset/index of a scalar variable
    Integer(i64),
    /// Float immediate
    Float(f32),
    /// String immediate, cut at its first null byte
    String(String),
    /// Array-element reference
    Array(ArrayAccess),
}

/// A decoded operand.
#[derive(Clone, PartialEq, Debug)]
pub struct Value {
    /// The tag and the kind it lifted to
    pub data_type: DataType,
    /// The decoded payload
    pub payload: Payload,
}

impl Value {
    /// Shorthand for the semantic kind of the value.
    #[must_use]
    pub fn kind(&self) -> SemanticKind {
        self.data_type.kind
    }

    /// Renders the value as it appears in pseudo-source.
    ///
    /// - array elements: `0x<base>[*0x<index>]`
    /// - floats: their shortest decimal form
    /// - integers: decimal, prefixed with `local_` or `global_` for variables
    /// - strings: the text in double quotes, unescaped
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnrenderableValue`] for a value without payload.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scmscope::{disassembler::decode_value, Parser};
    ///
    /// let mut parser = Parser::new(&[0x03, 0x07, 0x00]);
    /// assert_eq!(decode_value(&mut parser)?.code_string()?, "local_7");
    ///
    /// let mut parser = Parser::new(&[0x07, 0x00, 0x10, 0x00, 0x2A, 0x00, 0x81]);
    /// assert_eq!(decode_value(&mut parser)?.code_string()?, "0x10[*0x2a]");
    /// # Ok::<(), scmscope::Error>(())
    /// ```
    pub fn code_string(&self) -> Result<String> {
        match &self.payload {
            Payload::Array(access) => Ok(format!("0x{:x}[*0x{:x}]", access.base, access.index)),
            Payload::Float(value) => Ok(value.to_string()),
            Payload::Integer(value) => {
                let prefix = if self.kind().is_local() {
                    "local_"
                } else if self.kind().is_global() {
                    "global_"
                } else {
                    ""
                };

                Ok(format!("{prefix}{value}"))
            }
            Payload::String(text) => Ok(format!("\"{text}\"")),
            Payload::Empty => Err(Error::UnrenderableValue(self.kind())),
        }
    }
}

/// Sign-extends a 1, 2 or 4 byte little-endian integer.
fn int_from_le(bytes: &[u8]) -> Result<i64> {
    match bytes.len() {
        1 => Ok(i64::from(read_le::<i8>(bytes)?)),
        2 => Ok(i64::from(read_le::<i16>(bytes)?)),
        4 => Ok(i64::from(read_le::<i32>(bytes)?)),
        width => Err(malformed_error!(
            "Integer payloads are 1, 2 or 4 bytes wide, not {}",
            width
        )),
    }
}

/// Decodes one operand at the current parser position.
///
/// Reads the type tag, the length byte for variable-length strings, and exactly as many
/// payload bytes as the tag declares. On success the parser is positioned right after the
/// operand.
///
/// # Errors
///
/// - [`crate::Error::InvalidTypeTag`] if the tag byte is unknown
/// - [`crate::Error::TruncatedInput`] if the stream ends inside the operand
///
/// Either way the stream position is no longer meaningful and the parse run should stop.
///
/// # Examples
///
/// ```rust
/// use scmscope::{disassembler::{decode_value, Payload}, Parser};
///
/// // variable-length string "Hi"
/// let mut parser = Parser::new(&[0x0e, 0x02, b'H', b'i']);
/// let value = decode_value(&mut parser)?;
///
/// assert_eq!(value.payload, Payload::String("Hi".to_string()));
/// assert_eq!(parser.pos(), 4);
/// # Ok::<(), scmscope::Error>(())
/// ```
pub fn decode_value(parser: &mut Parser) -> Result<Value> {
    let data_type = DataType::lift(parser.read_le::<u8>()?)?;

    let width = match data_type.concrete.width() {
        Width::Fixed(width) => width,
        Width::LengthPrefixed => usize::from(parser.read_le::<u8>()?),
    };

    let buffer = parser.read_bytes(width)?;
    let kind = data_type.kind;

    let payload = if kind == SemanticKind::End {
        Payload::Empty
    } else if kind == SemanticKind::Integer || kind.is_variable() {
        Payload::Integer(int_from_le(buffer)?)
    } else if kind == SemanticKind::Float {
        Payload::Float(read_le::<f32>(buffer)?)
    } else if kind == SemanticKind::String {
        let text = match buffer.iter().position(|&byte| byte == 0) {
            Some(null_index) => &buffer[..null_index],
            None => buffer,
        };

        Payload::String(String::from_utf8_lossy(text).into_owned())
    } else {
        Payload::Array(ArrayAccess::parse(buffer)?)
    };

    Ok(Value { data_type, payload })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{disassembler::ConcreteType, test::ScriptBuilder};

    fn decode(bytes: &[u8]) -> Value {
        let mut parser = Parser::new(bytes);
        let value = decode_value(&mut parser).unwrap();
        assert!(!parser.has_more_data(), "operand not fully consumed");
        value
    }

    #[test]
    fn decode_integer_boundaries() {
        let cases: [(&[u8], i64); 9] = [
            (&[0x04, 0x7F], 127),
            (&[0x04, 0x80], -128),
            (&[0x04, 0xFF], -1),
            (&[0x05, 0xFF, 0x7F], 32767),
            (&[0x05, 0x00, 0x80], -32768),
            (&[0x01, 0xFF, 0xFF, 0xFF, 0x7F], 2_147_483_647),
            (&[0x01, 0x00, 0x00, 0x00, 0x80], -2_147_483_648),
            (&[0x01, 0xFE, 0xFF, 0xFF, 0xFF], -2),
            (&[0x01, 0x00, 0x00, 0x00, 0x00], 0),
        ];

        for (bytes, expected) in cases {
            let value = decode(bytes);
            assert_eq!(value.kind(), SemanticKind::Integer);
            assert_eq!(value.payload, Payload::Integer(expected), "{bytes:02x?}");
        }
    }

    #[test]
    fn decode_integer_widths_from_builder() {
        for sample in [i8::MIN as i32, -1, 0, 1, i8::MAX as i32] {
            let bytes = ScriptBuilder::new().int8(sample as i8).build();
            assert_eq!(decode(&bytes).payload, Payload::Integer(i64::from(sample)));
        }
        for sample in [i16::MIN, -300, 300, i16::MAX] {
            let bytes = ScriptBuilder::new().int16(sample).build();
            assert_eq!(decode(&bytes).payload, Payload::Integer(i64::from(sample)));
        }
        for sample in [i32::MIN, -70000, 70000, i32::MAX] {
            let bytes = ScriptBuilder::new().int32(sample).build();
            assert_eq!(decode(&bytes).payload, Payload::Integer(i64::from(sample)));
        }
    }

    #[test]
    fn decode_float_bit_patterns() {
        for bits in [
            0.0f32.to_bits(),
            (-0.0f32).to_bits(),
            1.5f32.to_bits(),
            f32::MIN_POSITIVE.to_bits(),
            f32::INFINITY.to_bits(),
            0x7FC0_0001,
        ] {
            let bytes = ScriptBuilder::new().float(f32::from_bits(bits)).build();
            match decode(&bytes).payload {
                Payload::Float(value) => assert_eq!(value.to_bits(), bits),
                other => panic!("Expected Payload::Float, got {other:?}"),
            }
        }
    }

    #[test]
    fn decode_variables() {
        let local = decode(&[0x03, 0x07, 0x00]);
        assert_eq!(local.kind(), SemanticKind::LocalScalar);
        assert_eq!(local.payload, Payload::Integer(7));
        assert_eq!(local.code_string().unwrap(), "local_7");

        let global = decode(&[0x02, 0x07, 0x00]);
        assert_eq!(global.code_string().unwrap(), "global_7");

        let global_string = decode(&[0x10, 0x20, 0x03]);
        assert_eq!(global_string.kind(), SemanticKind::GlobalString);
        assert_eq!(global_string.code_string().unwrap(), "global_800");

        let local_string = decode(&[0x0b, 0x02, 0x00]);
        assert_eq!(local_string.code_string().unwrap(), "local_2");
    }

    #[test]
    fn decode_fixed_strings() {
        let value = decode(&[0x09, b'M', b'A', b'I', b'N', 0x00, 0xCC, 0xCC, 0xCC]);
        assert_eq!(value.payload, Payload::String("MAIN".to_string()));
        assert_eq!(value.code_string().unwrap(), "\"MAIN\"");

        let value = decode(&[0x09, b'A', b'B', b'C', b'D', b'E', b'F', b'G', b'H']);
        assert_eq!(value.payload, Payload::String("ABCDEFGH".to_string()));

        let bytes = ScriptBuilder::new().string16("INTRO_TEXT").build();
        let value = decode(&bytes);
        assert_eq!(value.data_type.concrete, ConcreteType::String16);
        assert_eq!(value.payload, Payload::String("INTRO_TEXT".to_string()));
    }

    #[test]
    fn decode_variable_strings() {
        let value = decode(&[0x0e, 0x05, b'h', b'e', b'l', b'l', b'o']);
        assert_eq!(value.payload, Payload::String("hello".to_string()));

        let value = decode(&[0x0e, 0x04, b'a', b'b', 0x00, b'c']);
        assert_eq!(value.payload, Payload::String("ab".to_string()));

        let value = decode(&[0x0e, 0x00]);
        assert_eq!(value.payload, Payload::String(String::new()));
        assert_eq!(value.code_string().unwrap(), "\"\"");
    }

    #[test]
    fn decode_string_keeps_quotes_unescaped() {
        let value = decode(&[0x0e, 0x03, b'a', b'"', b'b']);
        assert_eq!(value.code_string().unwrap(), "\"a\"b\"");
    }

    #[test]
    fn decode_array_elements() {
        let value = decode(&[0x08, 0x01, 0x10, 0x00, 0x03, 0x00, 0x82]);
        assert_eq!(value.kind(), SemanticKind::LocalArray);
        assert_eq!(
            value.payload,
            Payload::Array(ArrayAccess {
                element: ElementType::Float,
                base: 0x10,
                index: 0x03,
                info: 0x82,
            })
        );
        assert_eq!(value.code_string().unwrap(), "0x10[*0x3]");

        let value = decode(&[0x12, 0x09, 0xAB, 0x01, 0xFF, 0xFF, 0x00]);
        assert_eq!(value.kind(), SemanticKind::GlobalStringArray);
        match value.payload {
            Payload::Array(access) => {
                assert_eq!(access.element, ElementType::Other(9));
                assert_eq!(access.base, 0x01AB);
                assert_eq!(access.index, 0xFFFF);
            }
            other => panic!("Expected Payload::Array, got {other:?}"),
        }
        assert_eq!(value.code_string().unwrap(), "0x1ab[*0xffff]");
    }

    #[test]
    fn decode_float_render() {
        let value = decode(&ScriptBuilder::new().float(2.5).build());
        assert_eq!(value.code_string().unwrap(), "2.5");

        let value = decode(&ScriptBuilder::new().float(-100.0).build());
        assert_eq!(value.code_string().unwrap(), "-100");
    }

    #[test]
    fn decode_end_marker() {
        let value = decode(&[0x00]);
        assert_eq!(value.kind(), SemanticKind::End);
        assert_eq!(value.payload, Payload::Empty);
        assert!(matches!(
            value.code_string(),
            Err(Error::UnrenderableValue(SemanticKind::End))
        ));
    }

    #[test]
    fn decode_invalid_tag() {
        let mut parser = Parser::new(&[0x42, 0x00, 0x00]);
        assert!(matches!(
            decode_value(&mut parser),
            Err(Error::InvalidTypeTag(0x42))
        ));
    }

    #[test]
    fn decode_truncated_payloads() {
        let cases: [&[u8]; 7] = [
            &[0x01, 0x00, 0x00],
            &[0x06, 0x00],
            &[0x09, b'A', b'B'],
            &[0x0e],
            &[0x0e, 0x05, b'a'],
            &[0x07, 0x00, 0x00, 0x00],
            &[],
        ];

        for bytes in cases {
            let mut parser = Parser::new(bytes);
            assert!(
                matches!(decode_value(&mut parser), Err(Error::TruncatedInput { .. })),
                "{bytes:02x?}"
            );
        }
    }

    #[test]
    fn decode_truncation_reports_field_offset() {
        let mut parser = Parser::new(&[0x05, 0x01, 0x00, 0x0e, 0x04, b'a']);
        decode_value(&mut parser).unwrap();

        match decode_value(&mut parser) {
            Err(Error::TruncatedInput {
                offset,
                requested,
                available,
            }) => {
                assert_eq!(offset, 5);
                assert_eq!(requested, 4);
                assert_eq!(available, 1);
            }
            other => panic!("Expected TruncatedInput, got {other:?}"),
        }
    }

    #[test]
    fn array_access_parse_short() {
        assert!(ArrayAccess::parse(&[0x00, 0x01, 0x00]).is_err());
    }
}
