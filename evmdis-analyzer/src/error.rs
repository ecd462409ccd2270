use evmdis_ir::ConsistencyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("internal consistency fault: {0}")]
    Consistency(#[from] ConsistencyError),
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("invalid hex input: {0}")]
    Hex(#[from] hex::FromHexError),
}
