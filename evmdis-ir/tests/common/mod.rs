use evmdis_ir::{Instruction, InstructionMap};
use evmdis_isa::Opcode;

/// Lay out `(opcode, immediate)` pairs back to back from offset 0.
pub fn layout(program: &[(u8, &[u8])]) -> InstructionMap {
    let code_len = program.iter().map(|(_, data)| 1 + data.len()).sum();
    let mut map = InstructionMap::new(code_len);
    let mut offset = 0;
    for &(opcode, data) in program {
        let insn = Instruction::new(offset, Opcode(opcode), data.to_vec());
        offset = insn.end();
        map.insert(insn.offset, insn);
    }
    map
}
