use thiserror::Error;

use crate::expr::ExprType;

/// Errors from querying an [`Expression`](crate::Expression).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExprError {
    #[error("not a constant expression: {0}")]
    NotConstant(ExprType),
}

/// The instruction map disagrees with itself. Only a defective decoder
/// produces this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConsistencyError {
    #[error("instruction map key {key:#x} holds an instruction at offset {offset:#x}")]
    OffsetMismatch { key: usize, offset: usize },
}
