#![no_main]

use libfuzzer_sys::fuzz_target;
use scmscope::{
    disassembler::{decode_stream, render},
    prototypes::{OperandCount, Prototype, PrototypeTable},
    Parser,
};

fuzz_target!(|data: &[u8]| {
    // Every opcode below 0x40 gets operands, so most inputs reach the value decoder
    let table: PrototypeTable = (0..0x40u16)
        .map(|opcode| match opcode % 4 {
            0 => Prototype::new(opcode, OperandCount::Variadic),
            1 => Prototype::operator(opcode, "+", 2),
            2 => Prototype::operator(opcode, "-", 1),
            _ => Prototype::function(opcode, "call", 3),
        })
        .collect();

    let mut parser = Parser::new(data);
    if let Ok(instructions) = decode_stream(&mut parser, &table) {
        for instruction in &instructions {
            let _ = render(instruction, &table);
        }
    }
});
