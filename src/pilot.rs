//! Seeded demo input for headless runs
//!
//! Mostly runs right, sometimes backs off or stands still, and jumps now and
//! then. The same seed always produces the same input stream.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::host::InputSource;
use crate::sim::TickInput;

/// Chance per tick of pressing jump
const JUMP_CHANCE: f64 = 1.0 / 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    Right,
    Left,
    Wait,
}

#[derive(Debug, Clone)]
pub struct DemoPilot {
    rng: Pcg32,
    intent: Intent,
    /// Ticks left before picking a new intent
    hold: u32,
}

impl DemoPilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            intent: Intent::Wait,
            hold: 0,
        }
    }

    fn pick_intent(&mut self) {
        let roll: f32 = self.rng.random();
        self.intent = if roll < 0.6 {
            Intent::Right
        } else if roll < 0.75 {
            Intent::Left
        } else {
            Intent::Wait
        };
        self.hold = self.rng.random_range(20..60);
    }
}

impl InputSource for DemoPilot {
    fn poll(&mut self, _tick: u64) -> TickInput {
        if self.hold == 0 {
            self.pick_intent();
        }
        self.hold -= 1;

        TickInput {
            left: self.intent == Intent::Left,
            right: self.intent == Intent::Right,
            jump: self.rng.random_bool(JUMP_CHANCE),
            quit: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(seed: u64, n: u64) -> Vec<TickInput> {
        let mut pilot = DemoPilot::new(seed);
        (0..n).map(|t| pilot.poll(t)).collect()
    }

    #[test]
    fn test_same_seed_same_inputs() {
        assert_eq!(stream(42, 500), stream(42, 500));
        assert_ne!(stream(42, 500), stream(43, 500));
    }

    #[test]
    fn test_never_quits_or_holds_both() {
        for input in stream(7, 1000) {
            assert!(!input.quit);
            assert!(!(input.left && input.right));
        }
    }

    #[test]
    fn test_jumps_occasionally() {
        let jumps = stream(1, 3000).iter().filter(|i| i.jump).count();
        assert!(jumps > 20 && jumps < 300, "jumps = {jumps}");
    }
}
