//! Per-game session state: score, clock, counters, RNG and debug switches.
//!
//! One instance lives inside each [`crate::simulation::Simulation`] and is
//! only touched by the orchestration loop and the systems it calls.

use crate::config::DrivingConfig;
use crate::effects::EffectSink;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Developer toggles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugFlags {
    /// Log every obstacle hit at `info` level.
    pub log_collisions: bool,
    /// Skip the pedestrian update entirely.
    pub freeze_pedestrians: bool,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub score: u32,
    /// Accumulated simulation time (s).
    pub elapsed: f32,
    pub props_knocked: u32,
    pub pedestrians_hit: u32,
    pub jumps: u32,
    pub collisions: u32,
    pub rng: StdRng,
    pub debug: DebugFlags,
}

impl SessionState {
    pub fn new(config: &DrivingConfig) -> Self {
        Self {
            score: 0,
            elapsed: 0.0,
            props_knocked: 0,
            pedestrians_hit: 0,
            jumps: 0,
            collisions: 0,
            rng: StdRng::seed_from_u64(config.rng_seed),
            debug: DebugFlags {
                log_collisions: config.debug_log_collisions,
                freeze_pedestrians: false,
            },
        }
    }

    /// Add `points` and report the new total.
    pub fn award(&mut self, points: u32, sink: &mut impl EffectSink) {
        self.score = self.score.saturating_add(points);
        sink.on_score_changed(self.score);
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(&DrivingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::SimEffect;
    use rand::Rng;

    #[test]
    fn award_reports_running_total() {
        let mut session = SessionState::default();
        let mut fx: Vec<SimEffect> = Vec::new();
        session.award(50, &mut fx);
        session.award(10, &mut fx);
        assert_eq!(session.score, 60);
        assert_eq!(fx.last(), Some(&SimEffect::ScoreChanged { total: 60 }));
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SessionState::default();
        let mut b = SessionState::default();
        let xs: Vec<f32> = (0..5).map(|_| a.rng.gen_range(0.0..1.0)).collect();
        let ys: Vec<f32> = (0..5).map(|_| b.rng.gen_range(0.0..1.0)).collect();
        assert_eq!(xs, ys);
    }
}
