//! Disk defragmenter simulation
//!
//! The engine is three small pieces with no shared mutable state:
//! [`grid::generate`] builds one plausible fragmented disk,
//! [`stepper::DefragStepper`] consolidates it one block move per pull, and
//! [`segments::compress`] turns any snapshot into colored run-length
//! segments for display. Everything else (terminal UI, pacing, drive
//! sounds) is driver chrome layered on top in [`app`], [`ui`] and [`audio`].

pub mod app;
pub mod audio;
pub mod constants;
pub mod grid;
pub mod models;
pub mod segments;
pub mod stepper;
pub mod ui;
