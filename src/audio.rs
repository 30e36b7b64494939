use rodio::{OutputStream, Sink, Source};
use std::time::Duration;

// -- Procedural drive sounds ----------------------------------------------------

const SAMPLE_RATE: u32 = 44100;

#[derive(Clone, Copy, PartialEq)]
pub enum DriveSoundType {
    /// Continuous low motor hum, runs while the drive is "active"
    Spindle,
    /// Hard metallic click of the head slamming into position
    HeadClick,
    /// Longer grinding seek across tracks
    SeekGrind,
    /// Rapid staccato clicks of data being transferred
    ReadChatter,
}

/// Infinite procedural sample generator for one drive sound. Finite
/// playback length comes from `Source::take_duration` at the call site.
pub struct DriveSoundGenerator {
    sound_type: DriveSoundType,
    phase: f32,
    click_countdown: u32,
    burst_remaining: u32,
    rng_state: u64,
}

impl DriveSoundGenerator {
    pub fn new(sound_type: DriveSoundType, seed: u64) -> Self {
        Self {
            sound_type,
            phase: 0.0,
            click_countdown: 0,
            burst_remaining: 0,
            // xorshift must not start at zero
            rng_state: seed | 1,
        }
    }

    // Simple xorshift noise, enough for mechanical texture
    fn noise(&mut self) -> f32 {
        self.rng_state ^= self.rng_state << 13;
        self.rng_state ^= self.rng_state >> 7;
        self.rng_state ^= self.rng_state << 17;
        (self.rng_state as f32 / u64::MAX as f32) * 2.0 - 1.0
    }

    fn seconds(&self) -> f32 {
        self.phase / SAMPLE_RATE as f32
    }

    fn generate_sample(&mut self) -> f32 {
        self.phase += 1.0;
        match self.sound_type {
            DriveSoundType::Spindle => self.generate_spindle(),
            DriveSoundType::HeadClick => self.generate_head_click(),
            DriveSoundType::SeekGrind => self.generate_seek_grind(),
            DriveSoundType::ReadChatter => self.generate_read_chatter(),
        }
    }

    fn generate_spindle(&mut self) -> f32 {
        // Low rumble with a ~60Hz fundamental and a slightly detuned
        // harmonic for rotation wobble
        let t = self.seconds();
        let fundamental = (t * 60.0 * std::f32::consts::TAU).sin() * 0.015;
        let wobble = (t * 121.2 * std::f32::consts::TAU).sin() * 0.008;
        let floor = self.noise() * 0.03;

        fundamental + wobble + floor
    }

    fn generate_head_click(&mut self) -> f32 {
        // Sharp impulse that dies out within a few milliseconds, plus a
        // resonant ping for the metallic "tick"
        let t = self.seconds();
        let env = (-t * 450.0).exp();
        let impulse = if self.noise() > 0.0 { 1.0 } else { -1.0 };
        let ping = (t * 2600.0 * std::f32::consts::TAU).sin();

        (impulse * 0.5 + ping * 0.35) * env * 0.6
    }

    fn generate_seek_grind(&mut self) -> f32 {
        // Harsh square-ish noise for the gritty multi-track traverse
        let t = self.seconds();
        let env = (-t * 60.0).exp();
        let crunch = if self.noise() > 0.5 { 1.0 } else { -1.0 };

        crunch * self.noise().abs() * env * 0.35
    }

    fn generate_read_chatter(&mut self) -> f32 {
        // New click every 8-20ms, each a tiny decaying noise burst
        if self.click_countdown == 0 {
            self.click_countdown = 350 + (self.noise().abs() * 530.0) as u32;
            self.burst_remaining = 130;
        }
        self.click_countdown -= 1;

        if self.burst_remaining > 0 {
            self.burst_remaining -= 1;
            let env = self.burst_remaining as f32 / 130.0;
            self.noise() * env * 0.3
        } else {
            self.noise() * 0.02
        }
    }
}

impl Iterator for DriveSoundGenerator {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        Some(self.generate_sample())
    }
}

impl Source for DriveSoundGenerator {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

// -- Completion chime -----------------------------------------------------------

/// Three-note ascending arpeggio (C5, E5, G5) played when a run completes.
pub struct CompletionChime {
    sample: u32,
}

impl CompletionChime {
    const NOTES: [f32; 3] = [523.25, 659.25, 783.99];
    const NOTE_SPACING: f32 = 0.15;
    const NOTE_LENGTH: f32 = 0.4;
    const TOTAL: f32 = Self::NOTE_SPACING * 2.0 + Self::NOTE_LENGTH;

    pub fn new() -> Self {
        Self { sample: 0 }
    }
}

impl Default for CompletionChime {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for CompletionChime {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let t = self.sample as f32 / SAMPLE_RATE as f32;
        if t >= Self::TOTAL {
            return None;
        }
        self.sample += 1;

        let mut mix = 0.0;
        for (i, &freq) in Self::NOTES.iter().enumerate() {
            let local = t - i as f32 * Self::NOTE_SPACING;
            if local < 0.0 || local >= Self::NOTE_LENGTH {
                continue;
            }
            // Quick attack, exponential release
            let env = if local < 0.02 {
                local / 0.02
            } else {
                (-(local - 0.02) * 12.0).exp()
            };
            mix += (local * freq * std::f32::consts::TAU).sin() * env * 0.1;
        }

        Some(mix)
    }
}

impl Source for CompletionChime {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f32(Self::TOTAL))
    }
}

// -- Audio engine ---------------------------------------------------------------

/// Owns the output stream plus one sink for the continuous spindle hum and
/// one for short effects. Absent entirely when no output device exists.
pub struct AudioEngine {
    _stream: OutputStream,
    spindle: Sink,
    effects: Sink,
    enabled: bool,
}

impl AudioEngine {
    pub fn new() -> Option<Self> {
        let (stream, handle) = OutputStream::try_default().ok()?;
        let spindle = Sink::try_new(&handle).ok()?;
        let effects = Sink::try_new(&handle).ok()?;
        spindle.set_volume(0.35);
        spindle.pause();
        effects.set_volume(0.5);
        Some(Self {
            _stream: stream,
            spindle,
            effects,
            enabled: true,
        })
    }

    /// Starts (or resumes) the continuous motor hum.
    pub fn start_spindle(&self) {
        if !self.enabled {
            return;
        }
        if self.spindle.empty() {
            self.spindle
                .append(DriveSoundGenerator::new(DriveSoundType::Spindle, 0x5EED));
        }
        self.spindle.play();
    }

    pub fn stop_spindle(&self) {
        self.spindle.pause();
    }

    /// Burst of mechanical activity for one relocation: a randomized mix
    /// of head clicks, seek grinds and read chatter played back to back.
    pub fn play_burst(&self) {
        if !self.enabled {
            return;
        }
        use rand::Rng;
        let mut rng = rand::thread_rng();

        let events = rng.gen_range(4..9);
        for _ in 0..events {
            let seed: u64 = rng.gen();
            let (sound, duration_ms) = match rng.gen_range(0.0..1.0) {
                r if r < 0.35 => (DriveSoundType::HeadClick, 12),
                r if r < 0.6 => (DriveSoundType::SeekGrind, rng.gen_range(20..60)),
                _ => (DriveSoundType::ReadChatter, rng.gen_range(40..80)),
            };
            let source = DriveSoundGenerator::new(sound, seed)
                .take_duration(Duration::from_millis(duration_ms));
            self.effects.append(source);
        }
    }

    pub fn play_complete(&self) {
        if !self.enabled {
            return;
        }
        self.effects.append(CompletionChime::new());
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
        if !self.enabled {
            self.spindle.pause();
            self.effects.stop();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}
