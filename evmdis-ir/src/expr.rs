use std::fmt;

use ethnum::U256;

use crate::error::ExprError;

/// Kind of an [`Expression`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprType {
    Constant,
    Argument,
    InstructionOutput,
}

/// A stack value as seen from inside a basic block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expression {
    /// Literal 256-bit word.
    Constant(U256),
    /// The N-th stack entry consumed from the incoming stack at block entry.
    Argument(usize),
    /// Result of the instruction at this byte offset.
    InstructionOutput(usize),
}

impl Expression {
    /// Build the constant a PUSH places on the stack from its immediate
    /// bytes, read big-endian. A truncated immediate is read as the bytes
    /// present; bytes beyond the 32 least significant are dropped.
    pub fn from_push_data(data: &[u8]) -> Self {
        let data = &data[data.len().saturating_sub(32)..];
        let mut word = [0u8; 32];
        word[32 - data.len()..].copy_from_slice(data);
        Expression::Constant(U256::from_be_bytes(word))
    }

    pub fn ty(&self) -> ExprType {
        match self {
            Expression::Constant(_) => ExprType::Constant,
            Expression::Argument(_) => ExprType::Argument,
            Expression::InstructionOutput(_) => ExprType::InstructionOutput,
        }
    }

    /// The literal value. Fails for anything but [`Expression::Constant`];
    /// callers are expected to handle the error.
    pub fn constant(&self) -> Result<U256, ExprError> {
        match self {
            Expression::Constant(v) => Ok(*v),
            other => Err(ExprError::NotConstant(other.ty())),
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Expression::Constant(_))
    }
}

impl fmt::Display for ExprType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExprType::Constant => "constant",
            ExprType::Argument => "argument",
            ExprType::InstructionOutput => "instruction output",
        };
        f.write_str(s)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Constant(v) => write!(f, "{v:#x}"),
            Expression::Argument(idx) => write!(f, "<argument.{idx}>"),
            Expression::InstructionOutput(offset) => write!(f, "<#{offset}>"),
        }
    }
}
