use super::attacks::{
    bishop_relevance_mask, blocker_subsets, get_bishop_attack_bitboards,
    get_rook_attack_bitboards, rook_relevance_mask,
};
use super::search::find_magic_number_for_square;
use super::structs::{MagicEntry, MagicTables, SliderTable};
use rand::{SeedableRng, rngs::StdRng};
use tracing::debug;

/// Source of randomness for the magic search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagicTableSeed {
    Fixed(u64),
}

#[derive(Clone, Copy)]
enum Slider {
    Rook,
    Bishop,
}

fn build_entry(square: usize, slider: Slider, rng: &mut StdRng) -> Result<MagicEntry, String> {
    let mask = match slider {
        Slider::Rook => rook_relevance_mask(square),
        Slider::Bishop => bishop_relevance_mask(square),
    };
    let blockers = blocker_subsets(mask);
    let attacks = match slider {
        Slider::Rook => get_rook_attack_bitboards(square, &blockers),
        Slider::Bishop => get_bishop_attack_bitboards(square, &blockers),
    };
    let shift = 64 - mask.count_ones();

    let magic = find_magic_number_for_square(mask, &blockers, &attacks, shift, rng)
        .map_err(|e| format!("square {square}: {e}"))?;

    let mut table = vec![0u64; 1 << (64 - shift)].into_boxed_slice();
    for (&b, &a) in blockers.iter().zip(&attacks) {
        table[(b.wrapping_mul(magic) >> shift) as usize] = a;
    }

    Ok(MagicEntry {
        magic,
        shift,
        mask,
        table,
    })
}

/// Search magics for all 64 squares of both sliders.
pub fn generate_magic_tables(seed: MagicTableSeed) -> Result<MagicTables, String> {
    let MagicTableSeed::Fixed(s) = seed;
    let mut rng = StdRng::seed_from_u64(s);

    let rook = (0..64)
        .map(|sq| build_entry(sq, Slider::Rook, &mut rng))
        .collect::<Result<Vec<_>, _>>()?;
    let bishop = (0..64)
        .map(|sq| build_entry(sq, Slider::Bishop, &mut rng))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        seed = s,
        rook_slots = rook.iter().map(|e| e.table.len()).sum::<usize>(),
        bishop_slots = bishop.iter().map(|e| e.table.len()).sum::<usize>(),
        "magic tables generated"
    );

    Ok(MagicTables {
        rook: SliderTable { entries: rook },
        bishop: SliderTable { entries: bishop },
    })
}
