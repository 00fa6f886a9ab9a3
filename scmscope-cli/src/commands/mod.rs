pub mod common;
pub mod disasm;
pub mod dump;
