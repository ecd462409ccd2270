use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;

use ethnum::U256;
use evmdis_isa::{Opcode, OpcodeInfo};

use crate::error::ExprError;
use crate::expr::{ExprType, Expression};

/// A single decoded opcode occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Instruction {
    /// Byte offset of the opcode byte.
    pub offset: usize,
    /// The opcode.
    pub opcode: Opcode,
    /// Immediate operand bytes. Shorter than `opcode.immediate_size()` when
    /// the code ends inside the operand.
    pub data: Vec<u8>,
}

impl Instruction {
    pub fn new(offset: usize, opcode: Opcode, data: Vec<u8>) -> Self {
        Self {
            offset,
            opcode,
            data,
        }
    }

    /// Bytes occupied in the code: the opcode plus the immediate bytes present.
    #[inline]
    pub fn size(&self) -> usize {
        1 + self.data.len()
    }

    /// Offset just past this instruction.
    #[inline]
    pub fn end(&self) -> usize {
        self.offset + self.size()
    }

    /// The code ended before the full immediate operand was read.
    pub fn is_truncated(&self) -> bool {
        self.size() < self.opcode.info().map_or(1, OpcodeInfo::size)
    }

    /// The value this instruction pushes, for `PUSH0`..`PUSH32`.
    pub fn push_value(&self) -> Option<Expression> {
        self.opcode
            .is_push()
            .then(|| Expression::from_push_data(&self.data))
    }

    /// An instruction used as a stack value is always an instruction output.
    pub fn ty(&self) -> ExprType {
        ExprType::InstructionOutput
    }

    /// Always fails: an instruction's output is not a literal.
    pub fn constant(&self) -> Result<U256, ExprError> {
        Err(ExprError::NotConstant(self.ty()))
    }

    pub fn as_expression(&self) -> Expression {
        Expression::InstructionOutput(self.offset)
    }
}

impl From<&Instruction> for Expression {
    fn from(insn: &Instruction) -> Self {
        insn.as_expression()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opcode)?;
        if !self.data.is_empty() {
            f.write_str(" 0x")?;
            for byte in &self.data {
                write!(f, "{byte:02x}")?;
            }
        }
        Ok(())
    }
}

/// Decoded instructions keyed by the byte offset of their opcode.
///
/// Offsets inside an immediate operand have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstructionMap {
    by_offset: BTreeMap<usize, Instruction>,
    code_len: usize,
}

impl InstructionMap {
    /// An empty map over code of `code_len` bytes.
    pub fn new(code_len: usize) -> Self {
        Self {
            by_offset: BTreeMap::new(),
            code_len,
        }
    }

    /// Record `insn` under `offset`, returning any instruction it replaces.
    ///
    /// The key is taken as given; a key that differs from `insn.offset` is
    /// reported by [`segment`](crate::segment).
    pub fn insert(&mut self, offset: usize, insn: Instruction) -> Option<Instruction> {
        self.by_offset.insert(offset, insn)
    }

    /// Instruction starting exactly at `offset`.
    pub fn get(&self, offset: usize) -> Option<&Instruction> {
        self.by_offset.get(&offset)
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.by_offset.contains_key(&offset)
    }

    /// Length of the code the map was decoded from.
    pub fn code_len(&self) -> usize {
        self.code_len
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.by_offset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_offset.is_empty()
    }

    /// `(offset, instruction)` pairs in ascending offset order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Instruction)> {
        self.by_offset.iter().map(|(&offset, insn)| (offset, insn))
    }

    /// Instructions in ascending offset order.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.by_offset.values()
    }

    /// Instructions whose opcode byte lies in `range`.
    pub fn range(&self, range: Range<usize>) -> impl Iterator<Item = &Instruction> {
        // BTreeMap::range panics on start > end.
        let range = range.start..range.end.max(range.start);
        self.by_offset.range(range).map(|(_, insn)| insn)
    }
}
