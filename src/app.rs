use crate::audio::AudioEngine;
use crate::constants::animation;
use crate::grid;
use crate::models::{BlockGrid, BlockState, DefragPhase, DefragStats};
use crate::stepper::DefragStepper;
use rand::rngs::ThreadRng;
use rand::Rng;
use std::{
    io::Result,
    sync::mpsc,
    time::{Duration, Instant},
};

// -- CLI arguments ------------------------------------------------------------

#[derive(clap::Parser)]
#[command(
    name = "defrag-bar",
    version = "0.1.0",
    about = "Disk Defragmenter Simulation"
)]
pub struct Args {
    /// Animation speed: fast, normal, or slow
    #[arg(long, default_value = "normal")]
    pub speed: String,

    /// Enable drive sounds
    #[arg(long, short = 's', default_value_t = false)]
    pub sound: bool,

    /// Restart automatically once defragmentation completes
    #[arg(long, short = 'd', default_value_t = false)]
    pub demo: bool,
}

impl Args {
    pub fn speed_factor(&self) -> f64 {
        animation::speed_factor(&self.speed)
    }
}

// -- Application state ----------------------------------------------------------

/// Drives the simulation: owns the frozen "before" grid, the latest
/// snapshot, and the stepper being pulled. All pacing lives here; the
/// engine modules only answer pulls.
pub struct App {
    pub running: bool,
    pub paused: bool,
    pub phase: DefragPhase,
    pub initial_grid: BlockGrid,
    pub current_grid: BlockGrid,
    pub stats: DefragStats,
    pub demo_mode: bool,
    pub audio: Option<AudioEngine>,
    stepper: Option<DefragStepper>,
    speed_factor: f64,
    next_step_at: Option<Instant>,
    finished_at: Option<Instant>,
    rng: ThreadRng,
}

impl App {
    pub fn new(args: &Args) -> Self {
        let initial_grid = grid::generate();
        let current_grid = initial_grid.clone();
        let total_to_move = count_blocks(&initial_grid, BlockState::Fragmented);

        Self {
            running: true,
            paused: false,
            phase: DefragPhase::Idle,
            initial_grid,
            current_grid,
            stats: DefragStats::new(total_to_move),
            demo_mode: args.demo,
            audio: if args.sound { AudioEngine::new() } else { None },
            stepper: None,
            speed_factor: args.speed_factor(),
            next_step_at: None,
            finished_at: None,
            rng: rand::thread_rng(),
        }
    }

    /// Begins a run on a freshly generated disk. Also serves as restart.
    pub fn start(&mut self) {
        let fresh = grid::generate();
        self.stats = DefragStats::new(count_blocks(&fresh, BlockState::Fragmented));
        self.stepper = Some(DefragStepper::new(&fresh));
        self.current_grid = fresh.clone();
        self.initial_grid = fresh;
        self.phase = DefragPhase::Running;
        self.paused = false;
        self.finished_at = None;
        self.schedule_next_step();

        if let Some(ref audio) = self.audio {
            audio.start_spindle();
        }
    }

    /// Abandons the current run, keeping whatever the disk looks like now.
    pub fn stop(&mut self) {
        self.stepper = None;
        self.next_step_at = None;
        self.phase = DefragPhase::Idle;
        self.paused = false;
        if let Some(ref audio) = self.audio {
            audio.stop_spindle();
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.phase != DefragPhase::Running {
            return;
        }
        self.paused = !self.paused;
        if let Some(ref audio) = self.audio {
            if self.paused {
                audio.stop_spindle();
            } else {
                audio.start_spindle();
            }
        }
    }

    pub fn toggle_sound(&mut self) {
        match self.audio {
            Some(ref mut audio) => {
                audio.toggle();
                if audio.is_enabled() && self.phase == DefragPhase::Running && !self.paused {
                    audio.start_spindle();
                }
            }
            None => {
                self.audio = AudioEngine::new();
                if let Some(ref audio) = self.audio {
                    if self.phase == DefragPhase::Running && !self.paused {
                        audio.start_spindle();
                    }
                }
            }
        }
    }

    // Each pull is scheduled 500-1500ms out (scaled by --speed), matching
    // the erratic mechanical rhythm of a real drive.
    fn schedule_next_step(&mut self) {
        let delay_ms = self.rng.gen_range(animation::STEP_DELAY_MS) as f64 * self.speed_factor;
        self.next_step_at = Some(Instant::now() + Duration::from_millis(delay_ms as u64));
    }

    /// Advances the simulation if the per-step deadline has passed.
    pub fn tick(&mut self) {
        match self.phase {
            DefragPhase::Idle => {}
            DefragPhase::Running => {
                if self.paused {
                    return;
                }
                let due = self.next_step_at.map_or(true, |t| Instant::now() >= t);
                if !due {
                    return;
                }

                match self.stepper.as_mut().and_then(Iterator::next) {
                    Some(snapshot) => {
                        self.current_grid = snapshot;
                        self.stats.blocks_moved += 1;
                        if let Some(ref audio) = self.audio {
                            audio.play_burst();
                        }
                        self.schedule_next_step();
                    }
                    None => {
                        // Normal end of sequence: nothing left to move
                        self.stepper = None;
                        self.next_step_at = None;
                        self.phase = DefragPhase::Finished;
                        self.finished_at = Some(Instant::now());
                        if let Some(ref audio) = self.audio {
                            audio.stop_spindle();
                            audio.play_complete();
                        }
                    }
                }
            }
            DefragPhase::Finished => {
                let waited = self
                    .finished_at
                    .map_or(false, |t| t.elapsed() >= Duration::from_millis(animation::FINISH_WAIT_MS));
                if waited {
                    if self.demo_mode {
                        self.start();
                    } else {
                        self.phase = DefragPhase::Idle;
                    }
                }
            }
        }
    }

    pub fn progress_percent(&self) -> f32 {
        if self.stats.total_to_move == 0 {
            return 100.0;
        }
        (self.stats.blocks_moved as f32 / self.stats.total_to_move as f32) * 100.0
    }

    pub fn fragmentation_percent(&self) -> f32 {
        let fragmented = count_blocks(&self.current_grid, BlockState::Fragmented);
        let total_data = fragmented + count_blocks(&self.current_grid, BlockState::Contiguous);
        if total_data == 0 {
            return 0.0;
        }
        (fragmented as f32 / total_data as f32) * 100.0
    }

    pub fn status_text(&self) -> String {
        match self.phase {
            DefragPhase::Idle => "Press Space to start defragmenting".to_string(),
            DefragPhase::Running if self.paused => "Paused".to_string(),
            DefragPhase::Running => format!(
                "Defragmenting... {:.0}% complete ({} of {} blocks)",
                self.progress_percent(),
                self.stats.blocks_moved,
                self.stats.total_to_move
            ),
            DefragPhase::Finished => "Defragmentation complete".to_string(),
        }
    }

    pub fn run(&mut self, term: &mut crate::ui::TuiWrapper, rx: mpsc::Receiver<()>) -> Result<()> {
        use crossterm::event::{self, Event, KeyCode, KeyEventKind};

        while self.running {
            term.draw(|frame| crate::ui::render_app(self, frame))?;

            if rx.try_recv().is_ok() {
                self.running = false;
            }

            if event::poll(Duration::from_millis(animation::POLL_INTERVAL_MS))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        match key.code {
                            KeyCode::Char('q') | KeyCode::Esc => {
                                self.running = false;
                            }
                            KeyCode::Char(' ') | KeyCode::Enter => match self.phase {
                                DefragPhase::Idle => self.start(),
                                DefragPhase::Running => self.toggle_pause(),
                                DefragPhase::Finished => {}
                            },
                            KeyCode::Char('p') | KeyCode::Char('P') => {
                                self.toggle_pause();
                            }
                            KeyCode::Char('r') | KeyCode::Char('R') => {
                                self.start();
                            }
                            KeyCode::Char('x') | KeyCode::Char('X') => {
                                self.stop();
                            }
                            KeyCode::Char('s') | KeyCode::Char('S') => {
                                self.toggle_sound();
                            }
                            _ => {}
                        }
                    }
                }
            }

            self.tick();
        }

        if let Some(ref audio) = self.audio {
            audio.stop_spindle();
        }
        Ok(())
    }
}

fn count_blocks(grid: &[BlockState], state: BlockState) -> usize {
    grid.iter().filter(|&&b| b == state).count()
}
