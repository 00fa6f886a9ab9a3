//! Pseudo-source rendering of decoded instructions.
//!
//! Every instruction renders to one line in one of three forms, chosen by its prototype:
//!
//! - call form, `name(a, b)`: the default, and the fallback for anything below
//! - unary operator, `-a`: operator prototypes with one operand
//! - binary operator, `a += b`: operator prototypes with two operands
//!
//! A set invert flag wraps the line as `!(...)`. Opcodes without a prototype, or without a
//! name in their prototype, are named by their hex value, `0x1a2()`.

use std::borrow::Cow;

use crate::{
    disassembler::{Instruction, Value},
    prototypes::{OperandCount, PrototypeLookup},
    Error, Result,
};

/// Renders `instruction` as a single line of pseudo-source, without trailing newline.
///
/// An operator prototype that is neither unary nor binary is a configuration problem, not a
/// decoding one: the instruction is rendered in call form and an
/// [`Error::OperatorArityMismatch`] is logged as a warning.
///
/// # Errors
///
/// Returns [`Error::UnrenderableValue`] if an argument has no renderable payload, which only
/// happens for end-of-arguments markers decoded as regular operands.
///
/// # Examples
///
/// ```rust
/// use scmscope::{
///     disassembler::{decode_instruction, render},
///     prototypes::{Prototype, PrototypeTable},
///     Parser,
/// };
///
/// let table: PrototypeTable = [Prototype::operator(0x0008, "+=", 2)].into_iter().collect();
///
/// // local_3 += 1, inverted
/// let mut parser = Parser::new(&[0x08, 0x80, 0x03, 0x03, 0x00, 0x04, 0x01]);
/// let instruction = decode_instruction(&mut parser, &table)?;
///
/// assert_eq!(render(&instruction, &table)?, "!(local_3 += 1)");
/// # Ok::<(), scmscope::Error>(())
/// ```
pub fn render<L: PrototypeLookup + ?Sized>(
    instruction: &Instruction,
    prototypes: &L,
) -> Result<String> {
    let operands = instruction
        .arguments
        .iter()
        .map(Value::code_string)
        .collect::<Result<Vec<String>>>()?;

    let prototype = prototypes.lookup(instruction.opcode);
    let name = match prototype.and_then(|prototype| prototype.name.as_deref()) {
        Some(name) => Cow::Borrowed(name),
        None => Cow::Owned(format!("0x{:x}", instruction.opcode)),
    };

    let text = match prototype {
        Some(prototype) if prototype.is_operator() => {
            match (prototype.operand_count, operands.as_slice()) {
                (OperandCount::Fixed(1), [operand]) => format!("{name}{operand}"),
                (OperandCount::Fixed(2), [left, right]) => format!("{left} {name} {right}"),
                // Decoded against a different table, the prototype itself is fine
                (OperandCount::Fixed(1 | 2), _) => call_form(&name, &operands),
                (operand_count, _) => {
                    log::warn!(
                        "{}",
                        Error::OperatorArityMismatch {
                            opcode: instruction.opcode,
                            operand_count,
                        }
                    );
                    call_form(&name, &operands)
                }
            }
        }
        _ => call_form(&name, &operands),
    };

    if instruction.invert_result {
        Ok(format!("!({text})"))
    } else {
        Ok(text)
    }
}

fn call_form(name: &str, operands: &[String]) -> String {
    format!("{name}({})", operands.join(", "))
}
