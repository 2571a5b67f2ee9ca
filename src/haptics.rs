use std::io::{self, Write};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Pulse {
    Start,
    Pause,
    Food,
    GameOver,
    Button,
}

impl Pulse {
    /// Vibration pattern in milliseconds, alternating on/off.
    pub fn pattern(self) -> &'static [u64] {
        match self {
            Pulse::Start => &[10],
            Pulse::Pause => &[5],
            Pulse::Food => &[8],
            Pulse::GameOver => &[10, 40, 10],
            Pulse::Button => &[5],
        }
    }
}

/// Best-effort feedback sink. Implementations must never fail the caller.
pub trait Haptics {
    fn pulse(&mut self, pulse: Pulse);
}

// One bell per "on" segment of the pattern.
pub struct BellHaptics<W: Write = io::Stdout> {
    out: W,
}

impl BellHaptics {
    pub fn stdout() -> Self {
        BellHaptics { out: io::stdout() }
    }
}

impl<W: Write> BellHaptics<W> {
    pub fn new(out: W) -> Self {
        BellHaptics { out }
    }

    fn ring(&mut self, pulse: Pulse) -> io::Result<()> {
        let rings = pulse.pattern().iter().step_by(2).count();
        for _ in 0..rings {
            self.out.write_all(b"\x07")?;
        }
        self.out.flush()
    }
}

impl<W: Write> Haptics for BellHaptics<W> {
    fn pulse(&mut self, pulse: Pulse) {
        if let Err(e) = self.ring(pulse) {
            tracing::debug!("haptic {:?} ignored: {}", pulse, e);
        }
    }
}

impl<H: Haptics + ?Sized> Haptics for Box<H> {
    fn pulse(&mut self, pulse: Pulse) {
        (**self).pulse(pulse)
    }
}

pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn pulse(&mut self, _pulse: Pulse) {}
}
