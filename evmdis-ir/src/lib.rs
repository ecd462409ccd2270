//! Decoded-instruction, expression and basic-block types for EVM bytecode.

pub mod cfg;
pub mod error;
pub mod expr;
pub mod instruction;

pub use cfg::{Block, BlockId, BlockLayout, segment};
pub use error::{ConsistencyError, ExprError};
pub use expr::{ExprType, Expression};
pub use instruction::{Instruction, InstructionMap};
