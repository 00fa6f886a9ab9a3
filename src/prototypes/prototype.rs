use std::{fmt, str::FromStr};

use crate::{Error, Result};

/// How an instruction is written in pseudo-source.
#[derive(
    Clone, Copy, PartialEq, Eq, Debug, Hash, Default, strum::Display, strum::EnumString,
)]
pub enum InvokeType {
    /// `name(a, b)`
    #[default]
    #[strum(serialize = "func")]
    Function,
    /// `-a` or `a + b`
    #[strum(serialize = "oper")]
    Operator,
}

/// Number of operands an instruction carries.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum OperandCount {
    /// Exactly this many operands follow the header
    Fixed(usize),
    /// Operands follow until an end-of-arguments marker
    Variadic,
}

impl Default for OperandCount {
    fn default() -> Self {
        OperandCount::Fixed(0)
    }
}

impl fmt::Display for OperandCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandCount::Fixed(count) => write!(f, "{count}"),
            OperandCount::Variadic => write!(f, "-1"),
        }
    }
}

impl FromStr for OperandCount {
    type Err = Error;

    /// Parses the counts-file spelling: a non-negative count, or `-1` for variadic.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().parse::<i64>() {
            Ok(-1) => Ok(OperandCount::Variadic),
            Ok(count) if count >= 0 => usize::try_from(count)
                .map(OperandCount::Fixed)
                .map_err(|_| malformed_error!("Operand count out of range - {}", count)),
            _ => Err(malformed_error!("Invalid operand count - '{}'", s)),
        }
    }
}

/// Metadata describing how to decode and display one opcode.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub struct Prototype {
    /// The opcode, without invert flag
    pub opcode: u16,
    /// Display name; absent until a names file provides one
    pub name: Option<String>,
    /// Number of operands following the header
    pub operand_count: OperandCount,
    /// Call or operator form
    pub invoke: InvokeType,
}

impl Prototype {
    /// Creates a function-form prototype without a name.
    #[must_use]
    pub fn new(opcode: u16, operand_count: OperandCount) -> Prototype {
        Prototype {
            opcode,
            name: None,
            operand_count,
            invoke: InvokeType::Function,
        }
    }

    /// Creates a named function-form prototype with a fixed operand count.
    #[must_use]
    pub fn function(opcode: u16, name: &str, operand_count: usize) -> Prototype {
        Prototype {
            opcode,
            name: Some(name.to_string()),
            operand_count: OperandCount::Fixed(operand_count),
            invoke: InvokeType::Function,
        }
    }

    /// Creates a named operator-form prototype with a fixed operand count.
    #[must_use]
    pub fn operator(opcode: u16, name: &str, operand_count: usize) -> Prototype {
        Prototype {
            opcode,
            name: Some(name.to_string()),
            operand_count: OperandCount::Fixed(operand_count),
            invoke: InvokeType::Operator,
        }
    }

    /// Whether the opcode renders in operator form.
    #[must_use]
    pub fn is_operator(&self) -> bool {
        self.invoke == InvokeType::Operator
    }
}

/// Writes the prototype as one dump line, `0004 (oper 2) =`.
impl fmt::Display for Prototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04x} ({} {})",
            self.opcode, self.invoke, self.operand_count
        )?;

        match &self.name {
            Some(name) => write!(f, " {name}"),
            None => Ok(()),
        }
    }
}

/// Parses one dump line as written by the [`fmt::Display`] impl.
impl FromStr for Prototype {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();

        let Some((opcode, rest)) = line.split_once('(') else {
            return Err(malformed_error!("Missing '(' in prototype '{}'", line));
        };
        let Some((signature, name)) = rest.split_once(')') else {
            return Err(malformed_error!("Missing ')' in prototype '{}'", line));
        };

        let opcode = parse_opcode(opcode)?;

        let mut fields = signature.split_whitespace();
        let (Some(invoke), Some(count), None) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(malformed_error!(
                "Expected '(<func|oper> <count>)' in prototype '{}'",
                line
            ));
        };

        let invoke = InvokeType::from_str(invoke)
            .map_err(|_| malformed_error!("Unknown invoke type '{}'", invoke))?;
        let operand_count = OperandCount::from_str(count)?;

        let name = name.trim();

        Ok(Prototype {
            opcode,
            name: (!name.is_empty()).then(|| name.to_string()),
            operand_count,
            invoke,
        })
    }
}

/// Parses a hexadecimal opcode, which must fit in 15 bits.
pub(crate) fn parse_opcode(text: &str) -> Result<u16> {
    let text = text.trim();

    match u16::from_str_radix(text, 16) {
        Ok(opcode) if opcode <= crate::disassembler::OPCODE_MASK => Ok(opcode),
        Ok(opcode) => Err(malformed_error!("Opcode 0x{:x} does not fit in 15 bits", opcode)),
        Err(_) => Err(malformed_error!("Invalid opcode - '{}'", text)),
    }
}
