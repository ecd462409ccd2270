use evmdis_ir::InstructionMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Deterministic random buffers, biased toward PUSH, JUMPDEST and
/// terminator bytes so segmentation boundaries are exercised.
pub fn random_programs(seed: u64, count: usize) -> Vec<Vec<u8>> {
    const INTERESTING: [u8; 10] = [0x00, 0x56, 0x57, 0x5b, 0x60, 0x61, 0x7f, 0xf3, 0xfd, 0xfe];
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let len = rng.gen_range(0..200);
            (0..len)
                .map(|_| {
                    if rng.gen_bool(0.4) {
                        INTERESTING[rng.gen_range(0..INTERESTING.len())]
                    } else {
                        rng.r#gen::<u8>()
                    }
                })
                .collect()
        })
        .collect()
}

/// `[offset, end)` of every instruction in ascending order.
pub fn spans(map: &InstructionMap) -> Vec<(usize, usize)> {
    map.instructions().map(|i| (i.offset, i.end())).collect()
}
