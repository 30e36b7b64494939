//! Synthetic disk-state generation
//!
//! Produces one plausible fragmented "before" picture per simulation run:
//! a density gradient that thins out toward the right, a single contiguous
//! unmovable cluster in the middle area, and data runs that skew fragmented.

use crate::constants::grid as tuning;
use crate::models::{BlockGrid, BlockState};
use rand::Rng;

/// Generates a fresh pseudo-random grid using the thread-local RNG.
pub fn generate() -> BlockGrid {
    generate_with(&mut rand::thread_rng())
}

/// Same as [`generate`] with an injected random source, so tests can supply
/// a seeded RNG and assert exact output.
pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> BlockGrid {
    let mut grid = vec![BlockState::Free; tuning::BLOCK_COUNT];

    // One unmovable cluster in the middle area, clipped to the grid bound
    let start = rng.gen_range(tuning::UNMOVABLE_START);
    let len = rng.gen_range(tuning::UNMOVABLE_LEN);
    for block in grid.iter_mut().skip(start).take(len) {
        *block = BlockState::Unmovable;
    }

    // Sweep left to right, alternating data runs and free gaps. Unmovable
    // blocks are skipped and never overwritten.
    let mut pos = 0;
    while pos < grid.len() {
        if grid[pos] == BlockState::Unmovable {
            pos += 1;
            continue;
        }

        if rng.gen_bool(tuning::data_probability(pos)) {
            let state = if rng.gen_bool(tuning::FRAGMENTED_PROB) {
                BlockState::Fragmented
            } else {
                BlockState::Contiguous
            };
            let run = if state == BlockState::Contiguous {
                rng.gen_range(tuning::CONTIGUOUS_RUN)
            } else {
                rng.gen_range(tuning::FRAGMENTED_RUN)
            };
            for j in 0..run {
                if pos + j >= grid.len() || grid[pos + j] == BlockState::Unmovable {
                    break;
                }
                grid[pos + j] = state;
            }
            pos += run;
        } else {
            let gap = if pos < tuning::SMALL_GAP_END {
                rng.gen_range(tuning::SMALL_GAP)
            } else {
                rng.gen_range(tuning::LARGE_GAP)
            };
            pos += gap;
        }
    }

    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_length_is_block_count() {
        for seed in 0..20 {
            let grid = generate_with(&mut StdRng::seed_from_u64(seed));
            assert_eq!(grid.len(), tuning::BLOCK_COUNT);
        }
    }

    #[test]
    fn test_same_seed_same_grid() {
        let a = generate_with(&mut StdRng::seed_from_u64(42));
        let b = generate_with(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_unmovable_cluster_is_contiguous_and_in_window() {
        for seed in 0..50 {
            let grid = generate_with(&mut StdRng::seed_from_u64(seed));
            let indices: Vec<usize> = grid
                .iter()
                .enumerate()
                .filter(|&(_, &b)| b == BlockState::Unmovable)
                .map(|(i, _)| i)
                .collect();

            assert!(!indices.is_empty(), "seed {} produced no unmovable blocks", seed);
            for pair in indices.windows(2) {
                assert_eq!(pair[1], pair[0] + 1, "cluster not contiguous (seed {})", seed);
            }

            let first = indices[0];
            assert!(tuning::UNMOVABLE_START.contains(&first));
            assert!(tuning::UNMOVABLE_LEN.contains(&indices.len()));
        }
    }

    #[test]
    fn test_gradient_front_is_denser_than_tail() {
        // Statistical check with a fixed seed: the first band should carry
        // clearly more data than the tail band.
        let grid = generate_with(&mut StdRng::seed_from_u64(7));
        let data = |range: std::ops::Range<usize>| {
            grid[range]
                .iter()
                .filter(|&&b| b == BlockState::Fragmented || b == BlockState::Contiguous)
                .count()
        };
        let front = data(0..tuning::DENSE_BAND_END);
        let tail = data(tuning::MID_BAND_END..tuning::BLOCK_COUNT);
        assert!(
            front * (tuning::BLOCK_COUNT - tuning::MID_BAND_END)
                > tail * tuning::DENSE_BAND_END,
            "front density {} not above tail density {}",
            front,
            tail
        );
    }

    #[test]
    fn test_grid_holds_fragmented_data() {
        // Not a hard guarantee of the algorithm, but with these tuning
        // values a grid without any fragmented block would be a regression.
        for seed in 0..20 {
            let grid = generate_with(&mut StdRng::seed_from_u64(seed));
            assert!(grid.iter().any(|&b| b == BlockState::Fragmented));
            assert!(grid.iter().any(|&b| b == BlockState::Free));
        }
    }
}
