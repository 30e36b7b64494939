//! Incremental defragmentation algorithm
//!
//! Pull-based: each `next()` performs exactly one block relocation and
//! yields an independent snapshot, so a driver can pace the animation by
//! deciding when to pull again. Nothing runs between pulls and a stepper
//! can be dropped at any point without cleanup.

use crate::models::{BlockGrid, BlockState};
use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Consolidates fragmented blocks one move at a time.
///
/// Owns a private copy of the grid handed to it; the caller's grid is
/// never mutated. The sequence ends when no free slot remains or nothing
/// fragmented is left to the right of the first free slot. Unmovable
/// blocks are invisible to both scans, so residual free/contiguous gaps
/// at the end of a run are expected.
pub struct DefragStepper<R: Rng = ThreadRng> {
    grid: BlockGrid,
    rng: R,
    done: bool,
}

impl DefragStepper<ThreadRng> {
    pub fn new(grid: &[BlockState]) -> Self {
        Self::with_rng(grid, rand::thread_rng())
    }
}

impl<R: Rng> DefragStepper<R> {
    /// Stepper with an injected random source, for deterministic tests.
    pub fn with_rng(grid: &[BlockState], rng: R) -> Self {
        Self {
            grid: grid.to_vec(),
            rng,
            done: false,
        }
    }
}

impl<R: Rng> Iterator for DefragStepper<R> {
    type Item = BlockGrid;

    fn next(&mut self) -> Option<BlockGrid> {
        if self.done {
            return None;
        }

        let free_idx = match self.grid.iter().position(|&b| b == BlockState::Free) {
            Some(i) => i,
            None => {
                self.done = true;
                return None;
            }
        };

        // Every fragmented block strictly right of the free slot is a
        // candidate. One is picked uniformly at random rather than
        // nearest-first; the erratic seek pattern is the point.
        let candidates: Vec<usize> = (free_idx + 1..self.grid.len())
            .filter(|&i| self.grid[i] == BlockState::Fragmented)
            .collect();

        let src = match candidates.choose(&mut self.rng) {
            Some(&i) => i,
            None => {
                self.done = true;
                return None;
            }
        };

        // The moved block lands in sorted position
        self.grid[free_idx] = BlockState::Contiguous;
        self.grid[src] = BlockState::Free;

        Some(self.grid.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::generate_with;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use BlockState::{Contiguous, Fragmented, Free, Unmovable};

    fn counts(grid: &[BlockState]) -> [usize; 4] {
        let mut c = [0; 4];
        for &b in grid {
            match b {
                Free => c[0] += 1,
                Fragmented => c[1] += 1,
                Contiguous => c[2] += 1,
                Unmovable => c[3] += 1,
            }
        }
        c
    }

    #[test]
    fn test_six_block_walkthrough() {
        let grid = vec![Free, Free, Fragmented, Fragmented, Unmovable, Free];
        let mut stepper = DefragStepper::with_rng(&grid, StdRng::seed_from_u64(1));

        // First move fills index 0 from either fragmented candidate
        let first = stepper.next().unwrap();
        assert_eq!(first[0], Contiguous);
        assert_eq!(first[4], Unmovable);
        assert_eq!(counts(&first), [3, 1, 1, 1]);

        // Second move fills index 1 from the last candidate; the final
        // layout is the same whichever source went first.
        let second = stepper.next().unwrap();
        assert_eq!(second, vec![Contiguous, Contiguous, Free, Free, Unmovable, Free]);

        // No fragmented blocks remain: exactly two yields
        assert!(stepper.next().is_none());
        assert!(stepper.next().is_none());
    }

    #[test]
    fn test_all_unmovable_terminates_immediately() {
        let grid = vec![Unmovable; 8];
        let mut stepper = DefragStepper::with_rng(&grid, StdRng::seed_from_u64(0));
        assert!(stepper.next().is_none());
    }

    #[test]
    fn test_no_free_slot_terminates_immediately() {
        let grid = vec![Fragmented, Contiguous, Fragmented, Unmovable];
        let mut stepper = DefragStepper::with_rng(&grid, StdRng::seed_from_u64(0));
        assert!(stepper.next().is_none());
    }

    #[test]
    fn test_caller_grid_is_not_mutated() {
        let grid = generate_with(&mut StdRng::seed_from_u64(3));
        let before = grid.clone();
        let stepper = DefragStepper::with_rng(&grid, StdRng::seed_from_u64(4));
        let steps = stepper.count();
        assert!(steps > 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_conservation_per_step() {
        let grid = generate_with(&mut StdRng::seed_from_u64(11));
        let mut prev = counts(&grid);
        let len = grid.len();

        for snapshot in DefragStepper::with_rng(&grid, StdRng::seed_from_u64(12)) {
            assert_eq!(snapshot.len(), len);
            let cur = counts(&snapshot);
            // One free slot became contiguous, one fragmented became free:
            // net free count is unchanged, fragmented -1, contiguous +1.
            assert_eq!(cur[0], prev[0]);
            assert_eq!(cur[1], prev[1] - 1);
            assert_eq!(cur[2], prev[2] + 1);
            assert_eq!(cur[3], prev[3]);
            prev = cur;
        }
    }

    #[test]
    fn test_unmovable_blocks_never_move() {
        let grid = generate_with(&mut StdRng::seed_from_u64(21));
        let unmovable: Vec<usize> = grid
            .iter()
            .enumerate()
            .filter(|&(_, &b)| b == Unmovable)
            .map(|(i, _)| i)
            .collect();

        for snapshot in DefragStepper::with_rng(&grid, StdRng::seed_from_u64(22)) {
            for &i in &unmovable {
                assert_eq!(snapshot[i], Unmovable);
            }
        }
    }

    #[test]
    fn test_terminates_with_nothing_left_to_consolidate() {
        let grid = generate_with(&mut StdRng::seed_from_u64(31));
        let last = DefragStepper::with_rng(&grid, StdRng::seed_from_u64(32))
            .last()
            .unwrap();

        // Termination condition: no fragmented block right of the first
        // free slot (or no free slot at all).
        if let Some(free_idx) = last.iter().position(|&b| b == Free) {
            assert!(last[free_idx + 1..].iter().all(|&b| b != Fragmented));
        }
    }

    #[test]
    fn test_sequence_is_finite_and_bounded() {
        // Each step consumes one fragmented block, so the sequence can
        // never be longer than the initial fragmented count.
        let grid = generate_with(&mut StdRng::seed_from_u64(41));
        let fragmented = counts(&grid)[1];
        let steps = DefragStepper::with_rng(&grid, StdRng::seed_from_u64(42)).count();
        assert!(steps > 0);
        assert!(steps <= fragmented);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let grid = generate_with(&mut StdRng::seed_from_u64(51));
        let a: Vec<_> = DefragStepper::with_rng(&grid, StdRng::seed_from_u64(52)).collect();
        let b: Vec<_> = DefragStepper::with_rng(&grid, StdRng::seed_from_u64(52)).collect();
        assert_eq!(a, b);
    }
}
