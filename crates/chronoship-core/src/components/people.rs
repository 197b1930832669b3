//! Crew components: CrewMember, CrewAction, CloneBay.

use serde::{Deserialize, Serialize};

use super::common::{RoomId, VesselId};

pub mod crew_constants {
    pub const MAX_HEALTH: f32 = 100.0;
    /// Seconds of work needed to finish one repair, manning or combat action.
    pub const ACTION_TIME: f32 = 4.0;
    /// Seconds a clone bay needs to rebuild a dead crew member.
    pub const CLONE_TIME: f32 = 12.0;
}

/// What a crew member is doing this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrewAction {
    #[default]
    Idle,
    Repairing,
    Manning,
    Fighting,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewMember {
    pub vessel_id: VesselId,
    pub room_id: RoomId,
    pub name: String,
    pub health: f32,
    pub action: CrewAction,
    /// Work accumulated toward the current action
    pub action_progress: f32,
    pub actions_completed: u32,
}

impl CrewMember {
    pub fn new(vessel_id: VesselId, room_id: RoomId, name: impl Into<String>) -> Self {
        Self {
            vessel_id,
            room_id,
            name: name.into(),
            health: crew_constants::MAX_HEALTH,
            action: CrewAction::Idle,
            action_progress: 0.0,
            actions_completed: 0,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub fn set_action(&mut self, action: CrewAction) {
        if self.action != action {
            self.action = action;
            self.action_progress = 0.0;
        }
    }

    /// Work on the current action. Returns true each time an action completes.
    pub fn work(&mut self, dt: f32) -> bool {
        if self.action == CrewAction::Idle {
            return false;
        }
        self.action_progress += dt;
        if self.action_progress >= crew_constants::ACTION_TIME {
            self.action_progress -= crew_constants::ACTION_TIME;
            self.actions_completed += 1;
            true
        } else {
            false
        }
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
    }
}

/// A crew member waiting to be rebuilt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingClone {
    pub name: String,
    pub progress: f32,
}

/// Clone queue, attached to the vessel's clonebay subsystem entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloneBay {
    pub queue: Vec<PendingClone>,
    pub clone_time: f32,
}

impl Default for CloneBay {
    fn default() -> Self {
        Self {
            queue: Vec::new(),
            clone_time: crew_constants::CLONE_TIME,
        }
    }
}

impl CloneBay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, name: impl Into<String>) {
        self.queue.push(PendingClone {
            name: name.into(),
            progress: 0.0,
        });
    }

    /// Advance the head of the queue. Returns the name of a finished clone.
    pub fn advance(&mut self, dt: f32) -> Option<String> {
        let head = self.queue.first_mut()?;
        head.progress += dt;
        if head.progress >= self.clone_time {
            Some(self.queue.remove(0).name)
        } else {
            None
        }
    }
}
