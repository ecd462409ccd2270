use evmdis_ir::{Block, BlockLayout, Instruction, InstructionMap};

use crate::decode::decode;
use crate::error::AnalysisError;

/// Decoded bytecode together with its basic-block layout.
#[derive(Debug, Clone)]
pub struct Program {
    code: Vec<u8>,
    instructions: InstructionMap,
    layout: BlockLayout,
}

impl Program {
    /// Decode `code` and segment it into basic blocks.
    pub fn analyze(code: Vec<u8>) -> Result<Self, AnalysisError> {
        let instructions = decode(&code);
        let layout = BlockLayout::build(&instructions)?;
        Ok(Self {
            code,
            instructions,
            layout,
        })
    }

    /// Get the raw bytecode.
    pub fn code(&self) -> &[u8] {
        &self.code
    }

    pub fn instructions(&self) -> &InstructionMap {
        &self.instructions
    }

    /// Instruction whose opcode byte is at `offset`; `None` inside an
    /// immediate operand.
    pub fn instruction_at(&self, offset: usize) -> Option<&Instruction> {
        self.instructions.get(offset)
    }

    pub fn blocks(&self) -> &[Block] {
        self.layout.blocks()
    }

    pub fn layout(&self) -> &BlockLayout {
        &self.layout
    }

    /// Block containing `offset`, if any.
    pub fn block_at_offset(&self, offset: usize) -> Option<&Block> {
        self.layout
            .block_at_offset(offset)
            .and_then(|id| self.layout.get(id))
    }

    /// Instructions of `block` in offset order, skipping immediate bytes.
    pub fn block_instructions(&self, block: &Block) -> impl Iterator<Item = &Instruction> {
        self.instructions.range(block.range())
    }
}
