//! Decode EVM bytecode into instructions and split it into basic blocks.

pub mod decode;
pub mod error;
pub mod input;
pub mod program;

pub use decode::decode;
pub use error::{AnalysisError, InputError};
pub use input::parse_hex;
pub use program::Program;

/// Decode `code` and segment it into basic blocks.
pub fn analyze(code: &[u8]) -> Result<Program, AnalysisError> {
    Program::analyze(code.to_vec())
}
