//! Propagation of room dilation into per-tick deltas.
//!
//! Each consumer batch (atmosphere, environment, spread damage, crew,
//! cloning) snapshots the non-zero room values of one vessel into a
//! [`RoomDilationMap`] and wraps it in a [`PropagationBus`]. Batch consumers
//! look up their room's multiplier directly. Scoped consumers enter a
//! [`DilationScope`] for their room so everything run inside it sees the
//! same current amount through [`PropagationBus::speed_factor`]. The bus is
//! dropped at the end of the batch, so nothing leaks into the next one.

use std::cell::Cell;
use std::collections::HashMap;

use chronoship_logic::LevelTable;
use hecs::World;

use crate::components::{Room, RoomDilation, RoomId, VesselId};

/// Snapshot of `room_id -> amount` for the rooms of one vessel whose value
/// is non-zero.
#[derive(Debug, Clone, Default)]
pub struct RoomDilationMap {
    amounts: HashMap<RoomId, i32>,
}

impl RoomDilationMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect(world: &World, vessel_id: VesselId) -> Self {
        let amounts = world
            .query::<(&Room, &RoomDilation)>()
            .iter()
            .filter(|(_, (room, dilation))| room.vessel_id == vessel_id && dilation.0 != 0)
            .map(|(_, (room, dilation))| (room.room_id, dilation.0))
            .collect();
        Self { amounts }
    }

    /// Amount for a room; rooms not in the map are unaffected.
    pub fn amount(&self, room_id: RoomId) -> i32 {
        self.amounts.get(&room_id).copied().unwrap_or(0)
    }

    pub fn insert(&mut self, room_id: RoomId, amount: i32) {
        if amount == 0 {
            self.amounts.remove(&room_id);
        } else {
            self.amounts.insert(room_id, amount);
        }
    }

    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }
}

/// Per-batch view of room dilation plus the current scoped amount.
pub struct PropagationBus<'a> {
    table: &'a LevelTable,
    rooms: RoomDilationMap,
    current: Cell<i32>,
    dt: f32,
}

impl<'a> PropagationBus<'a> {
    pub fn new(table: &'a LevelTable, rooms: RoomDilationMap, dt: f32) -> Self {
        Self {
            table,
            rooms,
            current: Cell::new(0),
            dt,
        }
    }

    /// Snapshot the rooms of `vessel_id` for one batch.
    pub fn for_vessel(table: &'a LevelTable, world: &World, vessel_id: VesselId, dt: f32) -> Self {
        Self::new(table, RoomDilationMap::collect(world, vessel_id), dt)
    }

    /// A bus with no dilated rooms.
    pub fn neutral(table: &'a LevelTable, dt: f32) -> Self {
        Self::new(table, RoomDilationMap::new(), dt)
    }

    pub fn rooms(&self) -> &RoomDilationMap {
        &self.rooms
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn room_amount(&self, room_id: RoomId) -> i32 {
        self.rooms.amount(room_id)
    }

    pub fn room_multiplier(&self, room_id: RoomId) -> f32 {
        self.table.multiplier(self.room_amount(room_id))
    }

    /// Set the current amount until the returned guard drops.
    pub fn enter(&self, amount: i32) -> DilationScope<'_> {
        let previous = self.current.replace(amount);
        DilationScope {
            current: &self.current,
            previous,
        }
    }

    /// Enter the scope of a room, using that room's amount.
    pub fn enter_room(&self, room_id: RoomId) -> DilationScope<'_> {
        self.enter(self.room_amount(room_id))
    }

    pub fn current_amount(&self) -> i32 {
        self.current.get()
    }

    /// Tick-rate multiplier for whatever runs in the current scope.
    pub fn speed_factor(&self) -> f32 {
        self.table.multiplier(self.current.get())
    }

    pub fn scaled_dt(&self) -> f32 {
        self.dt * self.speed_factor()
    }

    /// Scale a native per-tick delta by the current scope's multiplier.
    pub fn scale(&self, delta: f32) -> f32 {
        delta * self.speed_factor()
    }
}

/// Restores the bus's previous amount when dropped.
#[must_use = "the scope ends as soon as the guard is dropped"]
pub struct DilationScope<'b> {
    current: &'b Cell<i32>,
    previous: i32,
}

impl DilationScope<'_> {
    pub fn amount(&self) -> i32 {
        self.current.get()
    }
}

impl Drop for DilationScope<'_> {
    fn drop(&mut self) {
        self.current.set(self.previous);
    }
}
