/// The delay and sound timers. Both count down by one on every tick while they are not zero.
/// While the sound timer is not zero the host should play a tone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    pub fn new() -> Self {
        Timers::default()
    }

    /// Count both timers down. Returns true if the sound timer reached zero on this tick.
    pub fn tick(&mut self) -> bool {
        self.delay = self.delay.saturating_sub(1);

        if self.sound > 0 {
            self.sound -= 1;
            return self.sound == 0;
        }
        false
    }

    pub fn is_sounding(&self) -> bool {
        self.sound > 0
    }
}
