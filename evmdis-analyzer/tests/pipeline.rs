mod common;

use evmdis_analyzer::{AnalysisError, Program, analyze, decode, parse_hex};
use evmdis_ir::{Block, BlockLayout, ConsistencyError, Instruction, InstructionMap};
use evmdis_isa::Opcode;
use pretty_assertions::assert_eq;

fn ranges(program: &Program) -> Vec<(usize, usize)> {
    program.blocks().iter().map(|b| (b.start, b.end)).collect()
}

#[test]
fn push_then_stop() {
    let program = analyze(&[0x60, 0x01, 0x00]).unwrap();
    assert_eq!(program.instructions().len(), 2);
    assert_eq!(program.instruction_at(0).unwrap().data, vec![0x01]);
    assert!(program.instruction_at(2).unwrap().data.is_empty());
    assert_eq!(ranges(&program), vec![(0, 3)]);
}

#[test]
fn jumpdest_then_stop() {
    let program = analyze(&[0x5b, 0x00]).unwrap();
    assert_eq!(program.instruction_at(0).unwrap().opcode, Opcode::JUMPDEST);
    assert_eq!(program.instruction_at(1).unwrap().opcode, Opcode::STOP);
    assert_eq!(ranges(&program), vec![(0, 2)]);
}

#[test]
fn lone_truncated_push_still_forms_a_block() {
    let program = analyze(&[0x60]).unwrap();
    assert_eq!(program.instructions().len(), 1);
    assert!(program.instruction_at(0).unwrap().data.is_empty());
    assert_eq!(ranges(&program), vec![(0, 1)]);
}

#[test]
fn two_jumps() {
    let program = analyze(&[0x56, 0x56]).unwrap();
    assert_eq!(ranges(&program), vec![(0, 1), (1, 2)]);
}

#[test]
fn empty_code() {
    let program = analyze(&[]).unwrap();
    assert!(program.instructions().is_empty());
    assert_eq!(ranges(&program), vec![(0, 0)]);
    assert_eq!(program.block_at_offset(0), None);
    assert_eq!(program.layout().len(), 1);
}

#[test]
fn solidity_dispatcher_prologue() {
    // PUSH1 0x80 PUSH1 0x40 MSTORE CALLVALUE DUP1 ISZERO PUSH2 0x0010 JUMPI
    // PUSH1 0x00 DUP1 REVERT JUMPDEST POP STOP
    let code = parse_hex("0x608060405234801561001057600080fd5b5000").unwrap();
    let program = Program::analyze(code).unwrap();
    assert_eq!(ranges(&program), vec![(0, 12), (12, 16), (16, 19)]);

    let listing: Vec<String> = program
        .blocks()
        .iter()
        .map(|b| {
            program
                .block_instructions(b)
                .map(Instruction::to_string)
                .collect::<Vec<_>>()
                .join("; ")
        })
        .collect();
    assert_eq!(
        listing,
        vec![
            "PUSH1 0x80; PUSH1 0x40; MSTORE; CALLVALUE; DUP1; ISZERO; PUSH2 0x0010; JUMPI",
            "PUSH1 0x00; DUP1; REVERT",
            "JUMPDEST; POP; STOP",
        ]
    );
}

#[test]
fn block_at_offset_inside_immediate() {
    let program = analyze(&[0x61, 0x5b, 0x5b, 0x00, 0x5b, 0x00]).unwrap();
    assert_eq!(ranges(&program), vec![(0, 4), (4, 6)]);
    assert_eq!(program.block_at_offset(2), Some(&Block::new(0, 4)));
    assert_eq!(program.block_at_offset(5), Some(&Block::new(4, 6)));
    assert_eq!(program.block_at_offset(6), None);
}

#[test]
fn blocks_align_with_instruction_boundaries() {
    for code in common::random_programs(3, 200) {
        let program = analyze(&code).unwrap();
        if code.is_empty() {
            assert_eq!(ranges(&program), vec![(0, 0)]);
            continue;
        }
        let map = program.instructions();
        for block in program.blocks() {
            assert!(block.start < block.end);
            assert!(map.contains(block.start), "block start inside an instruction");
            assert!(
                block.end == code.len() || map.contains(block.end),
                "block end inside an instruction"
            );
            let last = program.block_instructions(block).last().unwrap();
            assert_eq!(last.end(), block.end);
        }
    }
}

#[test]
fn blocks_are_prefix_contiguous() {
    for code in common::random_programs(5, 200) {
        let program = analyze(&code).unwrap();
        let mut cursor = 0;
        for block in program.blocks() {
            assert_eq!(block.start, cursor, "gap before block in {code:02x?}");
            cursor = block.end;
        }
        // A discarded tail is always empty: it opens after a terminator
        // that ends the code.
        assert_eq!(cursor, code.len(), "uncovered tail in {code:02x?}");
    }
}

#[test]
fn blocks_contain_no_internal_boundaries() {
    for code in common::random_programs(9, 200) {
        let program = analyze(&code).unwrap();
        for block in program.blocks() {
            let insns: Vec<&Instruction> = program.block_instructions(block).collect();
            for (i, insn) in insns.iter().enumerate() {
                if i > 0 {
                    assert!(!insn.opcode.is_block_start());
                }
                if i + 1 < insns.len() {
                    assert!(!insn.opcode.is_block_end());
                }
            }
        }
    }
}

#[test]
fn analysis_is_idempotent() {
    for code in common::random_programs(17, 50) {
        let first = analyze(&code).unwrap();
        let second = analyze(&code).unwrap();
        assert_eq!(first.instructions(), second.instructions());
        assert_eq!(first.blocks(), second.blocks());
    }
}

#[test]
fn corrupted_map_aborts_segmentation() {
    let mut map: InstructionMap = decode(&[0x01, 0x02, 0x00]);
    map.insert(1, Instruction::new(2, Opcode::MUL, vec![]));
    let err = BlockLayout::build(&map).unwrap_err();
    assert_eq!(err, ConsistencyError::OffsetMismatch { key: 1, offset: 2 });

    let err = AnalysisError::from(err);
    assert_eq!(
        err.to_string(),
        "internal consistency fault: instruction map key 0x1 holds an instruction at offset 0x2"
    );
}
