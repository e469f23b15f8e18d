//! Latch-based rising-edge detection for one digital input line.

/// Derives a single-cycle `true` from a held button level.
///
/// | level | latch | edge | latch after |
/// |-------|-------|------|-------------|
/// | high  | clear | true | set         |
/// | high  | set   | false| set         |
/// | low   | any   | false| clear       |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeDetector {
    latched: bool,
}

impl EdgeDetector {
    pub const fn new() -> Self {
        Self { latched: false }
    }

    /// Feed this cycle's level, returns the rising edge.
    #[inline]
    pub fn update(&mut self, level: bool) -> bool {
        match (level, self.latched) {
            (true, false) => {
                self.latched = true;
                true
            }
            (true, true) => false,
            (false, _) => {
                self.latched = false;
                false
            }
        }
    }

    /// Pressed and not yet seen released.
    #[inline]
    pub const fn is_latched(&self) -> bool {
        self.latched
    }
}
