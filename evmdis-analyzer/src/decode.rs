use evmdis_ir::{Instruction, InstructionMap};
use evmdis_isa::Opcode;

/// Decode a raw bytecode byte slice into instructions keyed by offset.
///
/// Never fails: unassigned opcode bytes decode as themselves, and a PUSH
/// whose immediate runs past the end of `code` keeps the bytes that remain.
pub fn decode(code: &[u8]) -> InstructionMap {
    let mut instructions = InstructionMap::new(code.len());
    let mut offset = 0usize;

    while offset < code.len() {
        let opcode = Opcode(code[offset]);
        if opcode.info().is_none() {
            log::trace!("Unassigned opcode at offset {offset:#x}: {:#04x}", opcode.raw());
        }

        let data_start = offset + 1;
        let data_end = (data_start + opcode.immediate_size()).min(code.len());
        let insn = Instruction::new(offset, opcode, code[data_start..data_end].to_vec());
        if insn.is_truncated() {
            log::debug!(
                "{opcode} at offset {offset:#x} truncated: {} of {} immediate bytes",
                insn.data.len(),
                opcode.immediate_size()
            );
        }

        let next = insn.end();
        instructions.insert(offset, insn);
        offset = next;
    }

    log::debug!(
        "decoded {} instructions from {} bytes",
        instructions.len(),
        code.len()
    );
    instructions
}
