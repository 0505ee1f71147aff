#[inline]
/// Walk one ray from (rank, file), calling `on_square` until it returns false or
/// the ray leaves the board.
fn scan_ray<F>(
    mut rank: isize,
    mut file: isize,
    step: F,
    mut on_square: impl FnMut(usize) -> bool,
) where
    F: Fn(isize, isize) -> (isize, isize),
{
    while (0..=7).contains(&rank) && (0..=7).contains(&file) {
        let sq = (rank * 8 + file) as usize;
        if !on_square(sq) {
            break;
        }
        let (new_rank, new_file) = step(rank, file);
        rank = new_rank;
        file = new_file;
    }
}

const ROOK_DIRS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRS: [(isize, isize); 4] = [(1, 1), (-1, -1), (1, -1), (-1, 1)];

fn slide(square: usize, blockers: u64, dirs: &[(isize, isize)]) -> u64 {
    let rank = (square / 8) as isize;
    let file = (square % 8) as isize;
    let mut attacks = 0u64;

    for &(dr, df) in dirs {
        scan_ray(
            rank + dr,
            file + df,
            |r, f| (r + dr, f + df),
            |sq| {
                attacks |= 1 << sq;
                (blockers >> sq) & 1 == 0 // stop on the first blocker, inclusive
            },
        );
    }

    attacks
}

#[inline]
pub fn rook_attacks_per_square(square: usize, blockers: u64) -> u64 {
    slide(square, blockers, &ROOK_DIRS)
}

#[inline]
pub fn bishop_attacks_per_square(square: usize, blockers: u64) -> u64 {
    slide(square, blockers, &BISHOP_DIRS)
}

/// Squares whose occupancy can change the ray set; the last square of each
/// ray never matters and is left out.
fn relevance_mask(square: usize, dirs: &[(isize, isize)]) -> u64 {
    let rank = (square / 8) as isize;
    let file = (square % 8) as isize;
    let mut mask = 0u64;

    for &(dr, df) in dirs {
        let mut r = rank + dr;
        let mut f = file + df;
        while (0..=7).contains(&(r + dr)) && (0..=7).contains(&(f + df)) {
            mask |= 1 << (r * 8 + f);
            r += dr;
            f += df;
        }
    }

    mask
}

pub fn rook_relevance_mask(square: usize) -> u64 {
    relevance_mask(square, &ROOK_DIRS)
}

pub fn bishop_relevance_mask(square: usize) -> u64 {
    relevance_mask(square, &BISHOP_DIRS)
}

/// Every subset of `mask` (carry-rippler enumeration), empty set first.
pub fn blocker_subsets(mask: u64) -> Vec<u64> {
    let mut out = Vec::with_capacity(1 << mask.count_ones());
    let mut subset = 0u64;
    loop {
        out.push(subset);
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            break;
        }
    }
    out
}

pub fn get_rook_attack_bitboards(square: usize, blockers: &[u64]) -> Vec<u64> {
    blockers
        .iter()
        .map(|&b| rook_attacks_per_square(square, b))
        .collect()
}

pub fn get_bishop_attack_bitboards(square: usize, blockers: &[u64]) -> Vec<u64> {
    blockers
        .iter()
        .map(|&b| bishop_attacks_per_square(square, b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bit(sq: usize) -> u64 {
        1u64 << sq
    }

    #[test]
    fn rook_attacks_from_d4_no_blockers() {
        let result = rook_attacks_per_square(27, 0);

        let expected = bit(3)   // d1
            | bit(11)           // d2
            | bit(19)           // d3
            | bit(35)           // d5
            | bit(43)           // d6
            | bit(51)           // d7
            | bit(59)           // d8
            | bit(24)           // a4
            | bit(25)           // b4
            | bit(26)           // c4
            | bit(28)           // e4
            | bit(29)           // f4
            | bit(30)           // g4
            | bit(31); // h4

        assert_eq!(result, expected);
    }

    #[test]
    fn bishop_attacks_blocked_ne() {
        let result = bishop_attacks_per_square(27, bit(36)); // e5 blocks NE

        let expected = bit(36) // e5 (included)
            | bit(20)          // e3
            | bit(13)          // f2
            | bit(6)           // g1
            | bit(18)          // c3
            | bit(9)           // b2
            | bit(0)           // a1
            | bit(34)          // c5
            | bit(41)          // b6
            | bit(48); // a7

        assert_eq!(result, expected);
    }

    #[test]
    fn relevance_masks_have_known_sizes() {
        assert_eq!(rook_relevance_mask(0).count_ones(), 12); // a1
        assert_eq!(rook_relevance_mask(27).count_ones(), 10); // d4
        assert_eq!(bishop_relevance_mask(0).count_ones(), 6);
        assert_eq!(bishop_relevance_mask(27).count_ones(), 9);
    }

    #[test]
    fn subsets_enumerate_power_set() {
        let mask = bit(1) | bit(9) | bit(40);
        let subsets = blocker_subsets(mask);
        assert_eq!(subsets.len(), 8);
        assert!(subsets.iter().all(|s| s & !mask == 0));
    }
}
