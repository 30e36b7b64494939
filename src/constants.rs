//! Constants for the defragmenter simulation
//!
//! Grid length, generator tuning and the block color map are contract
//! values shared by the generator, the stepper and the renderer: segment
//! colors and grid length are meaningless if the three disagree on them.

/// Grid dimensions and generator tuning
pub mod grid {
    use std::ops::{Range, RangeInclusive};

    /// Number of blocks on the simulated medium
    pub const BLOCK_COUNT: usize = 290;

    /// Window for the start offset of the unmovable cluster
    pub const UNMOVABLE_START: Range<usize> = 90..140;

    /// Window for the length of the unmovable cluster
    pub const UNMOVABLE_LEN: Range<usize> = 12..22;

    /// End of the high-density band (disk looks fullest here)
    pub const DENSE_BAND_END: usize = 80;

    /// End of the medium-density band
    pub const MID_BAND_END: usize = 180;

    /// Data probability inside each band
    pub const DENSE_DATA_PROB: f64 = 0.75;
    pub const MID_DATA_PROB: f64 = 0.45;
    pub const TAIL_DATA_PROB: f64 = 0.20;

    /// Chance a data run lands fragmented rather than already contiguous
    pub const FRAGMENTED_PROB: f64 = 0.75;

    /// Run length drawn for a contiguous data cluster
    pub const CONTIGUOUS_RUN: RangeInclusive<usize> = 1..=5;

    /// Run length drawn for a fragmented data cluster
    pub const FRAGMENTED_RUN: RangeInclusive<usize> = 1..=3;

    /// Free gaps stay short below this index and widen past it,
    /// simulating larger free extents later on disk
    pub const SMALL_GAP_END: usize = 100;
    pub const SMALL_GAP: RangeInclusive<usize> = 1..=5;
    pub const LARGE_GAP: RangeInclusive<usize> = 1..=15;

    /// Probability that a sweep position holds data, decreasing in three
    /// bands so the disk appears more full near the start.
    pub fn data_probability(pos: usize) -> f64 {
        if pos < DENSE_BAND_END {
            DENSE_DATA_PROB
        } else if pos < MID_BAND_END {
            MID_DATA_PROB
        } else {
            TAIL_DATA_PROB
        }
    }
}

/// Block state color map
pub mod colors {
    use crate::models::BlockState;
    use ratatui::style::Color;

    /// Unallocated space (#FFFFFF)
    pub const FREE: Color = Color::Rgb(255, 255, 255);

    /// Data waiting to be consolidated (#E00000)
    pub const FRAGMENTED: Color = Color::Rgb(224, 0, 0);

    /// Data in sorted position (#0000C0)
    pub const CONTIGUOUS: Color = Color::Rgb(0, 0, 192);

    /// Reserved system region (#00C000)
    pub const UNMOVABLE: Color = Color::Rgb(0, 192, 0);

    /// The one state-to-color lookup used everywhere a block is painted
    pub fn block_color(state: BlockState) -> Color {
        match state {
            BlockState::Free => FREE,
            BlockState::Fragmented => FRAGMENTED,
            BlockState::Contiguous => CONTIGUOUS,
            BlockState::Unmovable => UNMOVABLE,
        }
    }
}

/// Animation timing constants (driver-layer pacing; the engine itself
/// makes no timing decisions)
pub mod animation {
    use std::ops::RangeInclusive;

    /// Delay drawn between two stepper pulls, before speed scaling
    pub const STEP_DELAY_MS: RangeInclusive<u64> = 500..=1500;

    /// Keyboard poll interval inside the event loop
    pub const POLL_INTERVAL_MS: u64 = 10;

    /// How long the completion state is shown before demo mode restarts
    pub const FINISH_WAIT_MS: u64 = 4000;

    /// Multiplier applied to the drawn step delay
    pub fn speed_factor(speed: &str) -> f64 {
        match speed.to_lowercase().as_str() {
            "fast" => 0.2,
            "slow" => 2.0,
            _ => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BlockState;

    #[test]
    fn test_data_probability_bands() {
        assert_eq!(grid::data_probability(0), grid::DENSE_DATA_PROB);
        assert_eq!(grid::data_probability(79), grid::DENSE_DATA_PROB);
        assert_eq!(grid::data_probability(80), grid::MID_DATA_PROB);
        assert_eq!(grid::data_probability(179), grid::MID_DATA_PROB);
        assert_eq!(grid::data_probability(180), grid::TAIL_DATA_PROB);
        assert_eq!(grid::data_probability(289), grid::TAIL_DATA_PROB);
    }

    #[test]
    fn test_block_color_mapping() {
        assert_eq!(colors::block_color(BlockState::Free), colors::FREE);
        assert_eq!(
            colors::block_color(BlockState::Fragmented),
            colors::FRAGMENTED
        );
        assert_eq!(
            colors::block_color(BlockState::Contiguous),
            colors::CONTIGUOUS
        );
        assert_eq!(colors::block_color(BlockState::Unmovable), colors::UNMOVABLE);
    }

    #[test]
    fn test_speed_factor() {
        assert_eq!(animation::speed_factor("fast"), 0.2);
        assert_eq!(animation::speed_factor("SLOW"), 2.0);
        assert_eq!(animation::speed_factor("normal"), 1.0);
        assert_eq!(animation::speed_factor("anything else"), 1.0);
    }

    #[test]
    fn test_unmovable_window_fits_grid() {
        assert!(grid::UNMOVABLE_START.end + grid::UNMOVABLE_LEN.end < grid::BLOCK_COUNT);
    }
}
