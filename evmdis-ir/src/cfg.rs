use std::collections::BTreeMap;
use std::ops::Range;

use crate::error::ConsistencyError;
use crate::instruction::InstructionMap;

/// Index of a basic block within a [`BlockLayout`].
pub type BlockId = usize;

/// A basic block: the half-open byte range `[start, end)` of a maximal run
/// of instructions with no internal block boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Block {
    /// Byte offset of the first instruction.
    pub start: usize,
    /// Byte offset past the last instruction (exclusive).
    pub end: usize,
}

impl Block {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        (self.start..self.end).contains(&offset)
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// The block being accumulated while scanning. `end` is `None` until an
/// instruction has been added since the block was opened.
struct OpenBlock {
    start: usize,
    end: Option<usize>,
}

impl OpenBlock {
    fn open(start: usize) -> Self {
        Self { start, end: None }
    }

    /// Emit the block if its end is resolved and it covers at least one byte.
    fn close_into(self, blocks: &mut Vec<Block>) {
        if let Some(end) = self.end.filter(|&end| end > self.start) {
            self.emit(end, blocks);
        }
    }

    /// Emit the block if its end is resolved, even when it is zero-width.
    /// Only code with no instructions leaves the initial `0..0` block open.
    fn finish_into(self, blocks: &mut Vec<Block>) {
        if let Some(end) = self.end {
            self.emit(end, blocks);
        }
    }

    fn emit(&self, end: usize, blocks: &mut Vec<Block>) {
        log::trace!("block {:#x}..{:#x}", self.start, end);
        blocks.push(Block::new(self.start, end));
    }
}

/// Split decoded instructions into basic blocks.
///
/// Offsets are replayed in ascending order. A `JUMPDEST` closes the current
/// block and opens a new one at its own offset; every instruction extends
/// the current block to its end; a jump or terminal instruction closes the
/// current block and opens a new one right after it. The block still open
/// when the code ends is emitted if its end is resolved, so code with no
/// instructions yields the single empty block `0..0`.
///
/// Fails if a map key disagrees with the offset stored in its instruction.
pub fn segment(instructions: &InstructionMap) -> Result<Vec<Block>, ConsistencyError> {
    let code_len = instructions.code_len();
    let mut blocks = Vec::new();
    let mut current = OpenBlock {
        start: 0,
        end: Some(0),
    };

    for (key, insn) in instructions.iter().take_while(|&(key, _)| key < code_len) {
        if insn.offset != key {
            return Err(ConsistencyError::OffsetMismatch {
                key,
                offset: insn.offset,
            });
        }

        // Start trigger, then end resolution, then end trigger.
        if insn.opcode.is_block_start() {
            current.close_into(&mut blocks);
            current = OpenBlock::open(key);
        }

        let end = insn.end();
        current.end = Some(end);

        if insn.opcode.is_block_end() {
            current.close_into(&mut blocks);
            current = OpenBlock::open(end);
        }
    }

    current.finish_into(&mut blocks);

    log::debug!(
        "segmented {} instructions into {} blocks",
        instructions.len(),
        blocks.len()
    );
    Ok(blocks)
}

/// Basic blocks of a program in ascending order, with an index for
/// offset lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockLayout {
    blocks: Vec<Block>,
    /// Map from block start offset to block ID.
    offset_to_block: BTreeMap<usize, BlockId>,
}

impl BlockLayout {
    /// Segment `instructions` and index the resulting blocks.
    pub fn build(instructions: &InstructionMap) -> Result<Self, ConsistencyError> {
        Ok(Self::from_blocks(segment(instructions)?))
    }

    /// Index an ascending, non-overlapping block list.
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        let offset_to_block = blocks
            .iter()
            .enumerate()
            .map(|(id, block)| (block.start, id))
            .collect();
        Self {
            blocks,
            offset_to_block,
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    /// Look up which block contains the given byte offset.
    pub fn block_at_offset(&self, offset: usize) -> Option<BlockId> {
        // Find the block whose start <= offset < end
        self.offset_to_block
            .range(..=offset)
            .next_back()
            .map(|(_, &id)| id)
            .filter(|&id| self.blocks[id].contains(offset))
    }
}
