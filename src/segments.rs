//! Run-length compression of a block grid for rendering
//!
//! A grid is painted as colored segments rather than one cell per block;
//! compressing maximal runs keeps the draw cost proportional to the number
//! of state changes instead of the grid length.

use crate::constants::colors;
use crate::models::BlockState;
use ratatui::style::Color;

/// One maximal run of identical blocks, ready to paint.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Segment {
    /// Index of the first block covered
    pub offset: usize,
    /// Number of blocks covered
    pub len: usize,
    pub color: Color,
}

/// Compresses a grid into its minimal ordered segment list.
///
/// Segments are emitted in increasing offset order, cover every index
/// exactly once, and adjacent segments never share a state. Pure and
/// side-effect-free; safe to call repeatedly on the same grid.
pub fn compress(grid: &[BlockState]) -> Vec<Segment> {
    let mut segments = Vec::new();

    let mut i = 0;
    while i < grid.len() {
        let state = grid[i];
        let mut run = 1;
        while i + run < grid.len() && grid[i + run] == state {
            run += 1;
        }
        segments.push(Segment {
            offset: i,
            len: run,
            color: colors::block_color(state),
        });
        i += run;
    }

    segments
}
