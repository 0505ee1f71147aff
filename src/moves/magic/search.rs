use rand::RngCore;

const MAX_ATTEMPTS: usize = 1_000_000;

#[inline(always)]
// AND-ing three draws gives a sparse candidate; sparse magics collide less.
pub fn random_sparse_u64<R: RngCore>(rng: &mut R) -> u64 {
    rng.next_u64() & rng.next_u64() & rng.next_u64()
}

/// Scratch space reused across candidates: `epoch[i]` marks slots written by
/// the current attempt, so the table never needs clearing.
struct Probe {
    epoch: Vec<u32>,
    slot: Vec<u64>,
    current: u32,
}

impl Probe {
    fn new(shift: u32) -> Self {
        let size = 1usize << (64 - shift);
        Probe {
            epoch: vec![0; size],
            slot: vec![0; size],
            current: 0,
        }
    }

    fn accepts(&mut self, blockers: &[u64], attacks: &[u64], magic: u64, shift: u32) -> bool {
        self.current += 1;
        for (&blocker, &attack) in blockers.iter().zip(attacks) {
            let index = (blocker.wrapping_mul(magic) >> shift) as usize;
            if self.epoch[index] != self.current {
                self.epoch[index] = self.current;
                self.slot[index] = attack;
            } else if self.slot[index] != attack {
                return false;
            }
        }
        true
    }
}

/// True when every blocker set hashes to a slot that holds only its own
/// attack set (constructive collisions are fine).
pub fn is_magic_candidate_valid(blockers: &[u64], attacks: &[u64], magic: u64, shift: u32) -> bool {
    Probe::new(shift).accepts(blockers, attacks, magic, shift)
}

pub fn find_magic_number_for_square<R: RngCore>(
    mask: u64,
    blockers: &[u64],
    attacks: &[u64],
    shift: u32,
    rng: &mut R,
) -> Result<u64, String> {
    let mut probe = Probe::new(shift);
    for _attempt in 0..MAX_ATTEMPTS {
        let magic = random_sparse_u64(rng);
        // Cheap reject: the top byte of mask*magic must be well populated.
        if (mask.wrapping_mul(magic) & 0xFF00_0000_0000_0000).count_ones() < 6 {
            continue;
        }
        if probe.accepts(blockers, attacks, magic, shift) {
            return Ok(magic);
        }
    }
    Err(format!(
        "Failed to find a valid magic number after {MAX_ATTEMPTS} attempts"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::magic::attacks::{
        blocker_subsets, get_rook_attack_bitboards, rook_relevance_mask,
    };
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn found_magic_validates_independently() {
        let sq = 0;
        let mask = rook_relevance_mask(sq);
        let blockers = blocker_subsets(mask);
        let attacks = get_rook_attack_bitboards(sq, &blockers);
        let shift = 64 - mask.count_ones();
        let mut rng = StdRng::seed_from_u64(7);

        let magic = find_magic_number_for_square(mask, &blockers, &attacks, shift, &mut rng)
            .expect("a1 rook magic");
        assert!(is_magic_candidate_valid(&blockers, &attacks, magic, shift));
    }

    #[test]
    fn zero_magic_is_rejected() {
        let sq = 27;
        let mask = rook_relevance_mask(sq);
        let blockers = blocker_subsets(mask);
        let attacks = get_rook_attack_bitboards(sq, &blockers);
        let shift = 64 - mask.count_ones();
        assert!(!is_magic_candidate_valid(&blockers, &attacks, 0, shift));
    }
}
