//! Countdown timer advanced once per tick.

use serde::{Deserialize, Serialize};

/// Counts `elapsed` up toward `goal`. The goal may be changed while running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CountdownTimer {
    pub elapsed: f32,
    pub goal: f32,
    pub running: bool,
}

impl CountdownTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart from zero toward `goal`.
    pub fn start(&mut self, goal: f32) {
        self.elapsed = 0.0;
        self.goal = goal;
        self.running = true;
    }

    pub fn set_goal(&mut self, goal: f32) {
        self.goal = goal;
    }

    /// Advance by one tick of length `dt`. Does nothing while stopped.
    pub fn update(&mut self, dt: f32) {
        if self.running {
            self.elapsed += dt;
        }
    }

    pub fn done(&self) -> bool {
        self.running && self.elapsed >= self.goal
    }

    pub fn stop(&mut self) {
        *self = Self::default();
    }

    /// Share of the goal still left, clamped to [0, 1]. `None` while stopped
    /// or when the goal is not positive.
    pub fn remaining_fraction(&self) -> Option<f32> {
        if !self.running || self.goal <= 0.0 {
            return None;
        }
        Some((1.0 - self.elapsed / self.goal).clamp(0.0, 1.0))
    }
}
