use std::fmt;

use crate::{OPCODE_TABLE, OpcodeFlags};

/// A single EVM opcode byte.
///
/// Every byte value is a valid `Opcode`; only some of them have an entry in
/// the opcode table. Named values are available as associated constants
/// (`Opcode::JUMPDEST`, `Opcode::PUSH1`, ...).
///
/// ```
/// use evmdis_isa::Opcode;
///
/// assert_eq!(Opcode(0x60), Opcode::PUSH1);
/// assert_eq!(Opcode::PUSH1.immediate_size(), 1);
/// assert_eq!(Opcode(0x0c).to_string(), "0x0c");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Opcode(pub u8);

impl Opcode {
    /// Raw byte value.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Table entry for this opcode, `None` for unassigned byte values.
    #[inline]
    pub fn info(self) -> Option<&'static OpcodeInfo> {
        OPCODE_TABLE[self.0 as usize].as_ref()
    }

    /// Mnemonic, `None` for unassigned byte values.
    pub fn mnemonic(self) -> Option<&'static str> {
        self.info().map(OpcodeInfo::mnemonic)
    }

    /// Flags of this opcode; unassigned byte values have none.
    pub fn flags(self) -> OpcodeFlags {
        self.info().map_or(OpcodeFlags::empty(), OpcodeInfo::flags)
    }

    /// Number of immediate bytes following the opcode byte.
    pub fn immediate_size(self) -> usize {
        self.info().map_or(0, OpcodeInfo::immediate_size)
    }

    /// True for `PUSH0` through `PUSH32`.
    pub fn is_push(self) -> bool {
        self.flags().contains(OpcodeFlags::PUSH)
    }

    /// True for `JUMP` and `JUMPI`.
    pub fn is_jump(self) -> bool {
        self.flags().contains(OpcodeFlags::JUMP)
    }

    /// A jump target declaration. Always starts a new basic block.
    pub fn is_block_start(self) -> bool {
        self.flags().contains(OpcodeFlags::JUMP_TARGET)
    }

    /// Ends the current basic block: `JUMP`, `JUMPI`, `STOP`, `REVERT`,
    /// `INVALID` and `SELFDESTRUCT`.
    pub fn is_block_end(self) -> bool {
        self.flags().intersects(OpcodeFlags::JUMP | OpcodeFlags::HALT)
    }
}

impl From<u8> for Opcode {
    fn from(byte: u8) -> Self {
        Opcode(byte)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mnemonic() {
            Some(m) => f.write_str(m),
            None => write!(f, "{:#04x}", self.0),
        }
    }
}

impl fmt::Debug for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opcode({self})")
    }
}

/// Static metadata for one named opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpcodeInfo {
    opcode: Opcode,
    mnemonic: &'static str,
    immediate_size: u8,
    flags: OpcodeFlags,
}

impl OpcodeInfo {
    pub(crate) const fn new(
        opcode: Opcode,
        mnemonic: &'static str,
        immediate_size: u8,
        flags: OpcodeFlags,
    ) -> Self {
        Self {
            opcode,
            mnemonic,
            immediate_size,
            flags,
        }
    }

    #[inline]
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    #[inline]
    pub fn mnemonic(&self) -> &'static str {
        self.mnemonic
    }

    /// Immediate operand bytes (1..=32 for `PUSH1`..`PUSH32`, else 0).
    #[inline]
    pub fn immediate_size(&self) -> usize {
        self.immediate_size as usize
    }

    /// Encoded size in bytes: the opcode plus its immediate operand.
    #[inline]
    pub fn size(&self) -> usize {
        1 + self.immediate_size()
    }

    #[inline]
    pub fn flags(&self) -> OpcodeFlags {
        self.flags
    }
}

/// Look up the table entry for a raw opcode byte.
pub fn lookup(byte: u8) -> Option<&'static OpcodeInfo> {
    Opcode(byte).info()
}

/// All named opcodes in ascending byte order.
pub fn opcode_table() -> impl Iterator<Item = &'static OpcodeInfo> {
    OPCODE_TABLE.iter().flatten()
}

/// Number of named opcodes.
pub fn opcode_count() -> usize {
    opcode_table().count()
}
