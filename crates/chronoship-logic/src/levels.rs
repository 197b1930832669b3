//! Temporal level table: cooldown, duration and strength per power level.
//!
//! Levels are stored per direction (accelerate / decelerate) and indexed by
//! the magnitude of a signed dilation amount. Accelerate is positive,
//! decelerate is negative. Unconfigured levels fall back to analytic defaults.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Fallback duration for unconfigured levels.
pub const DEFAULT_DURATION: i32 = 10;
/// Fallback cooldown for unconfigured levels.
pub const DEFAULT_COOLDOWN: i32 = 4;

/// Which way time is pushed in the target room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Accelerate,
    Decelerate,
}

impl Direction {
    /// +1 for accelerate, -1 for decelerate.
    pub fn sign(self) -> i32 {
        match self {
            Direction::Accelerate => 1,
            Direction::Decelerate => -1,
        }
    }

    /// Combine this direction with a power magnitude into a dilation amount.
    pub fn signed(self, power: i32) -> i32 {
        self.sign() * power.abs()
    }

    /// Direction whose table a signed amount is looked up in.
    ///
    /// Zero and negative amounts use the decelerate table.
    pub fn from_signed(level: i32) -> Self {
        if level > 0 {
            Direction::Accelerate
        } else {
            Direction::Decelerate
        }
    }
}

/// Parameters for one direction at one power level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemporalLevel {
    /// Lock applied to the drive after the effect ends (ticks).
    pub cooldown: i32,
    /// How long the effect lasts (ticks).
    pub duration: i32,
    /// Multiplier applied to affected per-tick deltas.
    pub strength: f32,
}

impl TemporalLevel {
    /// The analytic defaults for a signed level.
    pub fn fallback(signed_level: i32) -> Self {
        Self {
            cooldown: DEFAULT_COOLDOWN,
            duration: DEFAULT_DURATION,
            strength: fallback_strength(signed_level),
        }
    }
}

/// `2^level`, computed in double precision and narrowed.
pub fn fallback_strength(signed_level: i32) -> f32 {
    2.0_f64.powi(signed_level) as f32
}

/// One parsed configuration entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelRecord {
    pub direction: Direction,
    pub level: i32,
    pub cooldown: i32,
    pub duration: i32,
    pub strength: f32,
}

impl LevelRecord {
    pub fn params(&self) -> TemporalLevel {
        TemporalLevel {
            cooldown: self.cooldown,
            duration: self.duration,
            strength: self.strength,
        }
    }
}

/// Cooldown, duration and strength for both directions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelTable {
    accelerate: HashMap<i32, TemporalLevel>,
    decelerate: HashMap<i32, TemporalLevel>,
}

impl LevelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from records in order. Later records for the same
    /// `(direction, level)` overwrite earlier ones.
    pub fn load(records: impl IntoIterator<Item = LevelRecord>) -> Self {
        let mut table = Self::new();
        for record in records {
            table.map_mut(record.direction).insert(record.level, record.params());
        }
        log::debug!(
            "temporal level table loaded: {} accelerate, {} decelerate",
            table.accelerate.len(),
            table.decelerate.len()
        );
        table
    }

    fn map(&self, direction: Direction) -> &HashMap<i32, TemporalLevel> {
        match direction {
            Direction::Accelerate => &self.accelerate,
            Direction::Decelerate => &self.decelerate,
        }
    }

    fn map_mut(&mut self, direction: Direction) -> &mut HashMap<i32, TemporalLevel> {
        match direction {
            Direction::Accelerate => &mut self.accelerate,
            Direction::Decelerate => &mut self.decelerate,
        }
    }

    /// Raw lookup of a configured level.
    pub fn level(&self, direction: Direction, level: i32) -> Option<&TemporalLevel> {
        self.map(direction).get(&level)
    }

    fn lookup(&self, signed_level: i32) -> Option<&TemporalLevel> {
        self.level(Direction::from_signed(signed_level), signed_level.abs())
    }

    pub fn duration(&self, signed_level: i32) -> i32 {
        self.lookup(signed_level).map_or(DEFAULT_DURATION, |l| l.duration)
    }

    pub fn cooldown(&self, signed_level: i32) -> i32 {
        self.lookup(signed_level).map_or(DEFAULT_COOLDOWN, |l| l.cooldown)
    }

    pub fn strength(&self, signed_level: i32) -> f32 {
        self.lookup(signed_level)
            .map_or_else(|| fallback_strength(signed_level), |l| l.strength)
    }

    /// Multiplier for a propagated dilation amount.
    ///
    /// Zero means no effect and is always exactly 1.0, whatever the table holds.
    pub fn multiplier(&self, amount: i32) -> f32 {
        if amount == 0 {
            1.0
        } else {
            self.strength(amount)
        }
    }

    /// Number of configured levels for a direction.
    pub fn len(&self, direction: Direction) -> usize {
        self.map(direction).len()
    }

    pub fn is_empty(&self) -> bool {
        self.accelerate.is_empty() && self.decelerate.is_empty()
    }

    pub fn figures(&self, signed_level: i32) -> LevelFigures {
        LevelFigures {
            signed_level,
            strength: self.strength(signed_level),
            cooldown: self.cooldown(signed_level),
            duration: self.duration(signed_level),
        }
    }

    /// Figures for both directions at a power level, for tooltips and
    /// targeting previews.
    pub fn preview(&self, power: i32) -> LevelPreview {
        LevelPreview {
            accelerate: self.figures(Direction::Accelerate.signed(power)),
            decelerate: self.figures(Direction::Decelerate.signed(power)),
        }
    }
}

/// Resolved parameters at a signed level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelFigures {
    pub signed_level: i32,
    pub strength: f32,
    pub cooldown: i32,
    pub duration: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelPreview {
    pub accelerate: LevelFigures,
    pub decelerate: LevelFigures,
}

impl LevelPreview {
    pub fn for_direction(&self, direction: Direction) -> &LevelFigures {
        match direction {
            Direction::Accelerate => &self.accelerate,
            Direction::Decelerate => &self.decelerate,
        }
    }
}
