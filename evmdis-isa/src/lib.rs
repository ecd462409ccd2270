//! EVM opcode definitions, generated from `isa/evm.yaml`.
//!
//! This crate provides the opcode table (mnemonics, immediate operand sizes
//! and control-flow flags) for the Ethereum Virtual Machine instruction set.

// The bitflags crate is used by generated code
pub use bitflags;

mod opcode;

pub use opcode::{Opcode, OpcodeInfo, lookup, opcode_count, opcode_table};

include!(concat!(env!("OUT_DIR"), "/generated.rs"));
