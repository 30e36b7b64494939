use std::time::Instant;

/// State of one block on the simulated medium.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BlockState {
    /// Unallocated space
    Free,
    /// Allocated data not yet in its consolidated position (red)
    Fragmented,
    /// Allocated data in (or moved into) sorted position (blue)
    Contiguous,
    /// System/reserved data that is never relocated (green)
    Unmovable,
}

/// Fixed-length left-to-right sequence of blocks. The length is set at
/// creation and never changes for the lifetime of a grid.
pub type BlockGrid = Vec<BlockState>;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum DefragPhase {
    Idle,
    Running,
    Finished,
}

#[derive(Clone)]
pub struct DefragStats {
    /// Fragmented blocks counted when the run started
    pub total_to_move: usize,
    /// Relocations performed so far
    pub blocks_moved: usize,
    pub start_time: Instant,
}

impl DefragStats {
    pub fn new(total_to_move: usize) -> Self {
        Self {
            total_to_move,
            blocks_moved: 0,
            start_time: Instant::now(),
        }
    }
}
