//! Simulation engine - main entry point for running the simulation

use std::sync::Arc;

use chronoship_logic::atmosphere::RoomAtmosphere;
use chronoship_logic::{Direction, LevelTable};
use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::components::*;
use crate::systems::*;

/// Main simulation engine
pub struct SimulationEngine {
    /// ECS world containing all entities
    pub world: World,
    /// Ticks run since start
    pub tick: u64,
    /// Simulation time in seconds since start
    pub sim_time: f64,
    /// Level table shared by every drive; never mutated after construction
    levels: Arc<LevelTable>,
    arming: ArmingSignal,
    rng: StdRng,

    // Configuration
    time_scale: f32,
}

impl SimulationEngine {
    /// Create an empty simulation using analytic level defaults
    pub fn new() -> Self {
        Self::with_levels(LevelTable::new())
    }

    pub fn with_levels(levels: LevelTable) -> Self {
        Self::with_shared_levels(Arc::new(levels), 0)
    }

    /// Create a simulation sharing an already loaded table, with a fixed
    /// RNG seed so fire spread is reproducible.
    pub fn with_shared_levels(levels: Arc<LevelTable>, seed: u64) -> Self {
        Self {
            world: World::new(),
            tick: 0,
            sim_time: 0.0,
            levels,
            arming: ArmingSignal::new(),
            rng: StdRng::seed_from_u64(seed),
            time_scale: 1.0,
        }
    }

    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    pub fn shared_levels(&self) -> Arc<LevelTable> {
        Arc::clone(&self.levels)
    }

    /// Advance the simulation by one tick of `delta_seconds`.
    ///
    /// Locks count down first, then drives update (so an effect that ends
    /// this tick is already cleared), then each vessel's consumer batches
    /// run against the settled room values.
    pub fn update(&mut self, delta_seconds: f32) {
        let dt = delta_seconds * self.time_scale;
        self.tick += 1;
        self.sim_time += f64::from(dt);

        tick_locks(&mut self.world, dt);
        dilation_system(&mut self.world, &self.levels, dt);

        for vessel_id in vessel_ids(&self.world) {
            atmosphere_system(&mut self.world, &self.levels, vessel_id, dt);
            fire_system(&mut self.world, &self.levels, &mut self.rng, vessel_id, dt);
            spread_damage_system(&mut self.world, &self.levels, vessel_id, dt);
            crew_system(&mut self.world, &self.levels, vessel_id, dt);
            clone_system(&mut self.world, &self.levels, vessel_id, dt);
        }
    }

    /// Set time scale (1.0 = real-time, 2.0 = 2x speed, etc.)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    // ── Building ──

    pub fn spawn_vessel(&mut self, vessel: Vessel) -> Entity {
        log::debug!("spawning vessel {} ({})", vessel.id, vessel.name);
        self.world.spawn((vessel,))
    }

    /// Spawn a room with full oxygen and no dilation.
    pub fn spawn_room(&mut self, vessel_id: VesselId, room_id: RoomId, name: &str) -> Entity {
        self.world.spawn((
            Room::new(vessel_id, room_id, name),
            RoomConnections::new(),
            RoomAtmosphere::default(),
            RoomDilation::default(),
        ))
    }

    /// Connect two rooms of a vessel both ways.
    pub fn connect_rooms(&mut self, vessel_id: VesselId, a: RoomId, b: RoomId) {
        for (from, to) in [(a, b), (b, a)] {
            if let Some(room) = find_room(&self.world, vessel_id, from) {
                if let Ok(mut connections) = self.world.get::<&mut RoomConnections>(room) {
                    connections.connect(to);
                }
            }
        }
    }

    /// Spawn a subsystem. Temporal subsystems get a drive, clonebays a queue.
    pub fn spawn_subsystem(
        &mut self,
        vessel_id: VesselId,
        room_id: RoomId,
        kind: SubsystemKind,
        capacity: u8,
    ) -> Entity {
        let system = Subsystem::new(vessel_id, room_id, kind, capacity);
        match kind {
            SubsystemKind::Temporal => self.world.spawn((system, TemporalDrive::new())),
            SubsystemKind::Clonebay => self.world.spawn((system, CloneBay::new())),
            _ => self.world.spawn((system,)),
        }
    }

    pub fn spawn_crew(&mut self, vessel_id: VesselId, room_id: RoomId, name: &str) -> Entity {
        self.world.spawn((CrewMember::new(vessel_id, room_id, name),))
    }

    pub fn set_crew_action(&mut self, crew: Entity, action: CrewAction) {
        if let Ok(mut member) = self.world.get::<&mut CrewMember>(crew) {
            member.set_action(action);
        }
    }

    pub fn ignite(&mut self, vessel_id: VesselId, room_id: RoomId) -> Option<Entity> {
        ignite(&mut self.world, vessel_id, room_id)
    }

    pub fn set_breach(&mut self, vessel_id: VesselId, room_id: RoomId, breached: bool) {
        if let Some(room) = find_room(&self.world, vessel_id, room_id) {
            if let Ok(mut atmo) = self.world.get::<&mut RoomAtmosphere>(room) {
                atmo.breached = breached;
            }
        }
    }

    /// Despawn a vessel and everything on it. The vessel's own effect is
    /// stopped first so its target room is cleared; drives targeting it
    /// stop on their next update.
    pub fn remove_vessel(&mut self, vessel_id: VesselId) {
        if let Some(drive) = find_drive(&self.world, vessel_id) {
            stop_effect(&mut self.world, &self.levels, drive);
        }

        let mut doomed: Vec<Entity> = Vec::new();
        doomed.extend(
            self.world
                .query::<&Vessel>()
                .iter()
                .filter(|(_, v)| v.id == vessel_id)
                .map(|(e, _)| e),
        );
        doomed.extend(
            self.world
                .query::<&Room>()
                .iter()
                .filter(|(_, r)| r.vessel_id == vessel_id)
                .map(|(e, _)| e),
        );
        doomed.extend(
            self.world
                .query::<&Subsystem>()
                .iter()
                .filter(|(_, s)| s.vessel_id == vessel_id)
                .map(|(e, _)| e),
        );
        doomed.extend(
            self.world
                .query::<&CrewMember>()
                .iter()
                .filter(|(_, c)| c.vessel_id == vessel_id)
                .map(|(e, _)| e),
        );
        doomed.extend(
            self.world
                .query::<&Fire>()
                .iter()
                .filter(|(_, f)| f.vessel_id == vessel_id)
                .map(|(e, _)| e),
        );

        for entity in doomed {
            let _ = self.world.despawn(entity);
        }
        self.arming.disarm(vessel_id);
        log::info!("vessel {vessel_id} removed");
    }

    // ── Temporal drive ──

    pub fn arm(&mut self, vessel_id: VesselId, direction: Direction) -> bool {
        self.arming.arm(&self.world, vessel_id, direction)
    }

    pub fn disarm(&mut self, vessel_id: VesselId) {
        self.arming.disarm(vessel_id);
    }

    pub fn armed_state(&self, vessel_id: VesselId) -> ArmState {
        self.arming.armed_state(vessel_id)
    }

    pub fn any_armed(&self, vessel_id: VesselId) -> bool {
        self.arming.any_armed(vessel_id)
    }

    /// Feed a room selection to the armed drive of `acting_vessel`.
    pub fn select_target(
        &mut self,
        acting_vessel: VesselId,
        selection: TargetSelection,
    ) -> TargetOutcome {
        resolve_target(
            &mut self.world,
            &self.levels,
            &mut self.arming,
            acting_vessel,
            selection,
        )
    }

    pub fn preview_target(
        &self,
        acting_vessel: VesselId,
        selection: TargetSelection,
    ) -> Option<TargetNotice> {
        preview_target(&self.world, &self.levels, &self.arming, acting_vessel, selection)
    }

    /// Start an effect directly, bypassing the arming signal.
    pub fn start_effect(
        &mut self,
        vessel_id: VesselId,
        target_vessel: VesselId,
        room_id: RoomId,
        direction: Direction,
    ) -> bool {
        let Some(drive) = find_drive(&self.world, vessel_id) else {
            return false;
        };
        start_effect(&mut self.world, &self.levels, drive, target_vessel, room_id, direction)
    }

    pub fn stop_effect(&mut self, vessel_id: VesselId) {
        if let Some(drive) = find_drive(&self.world, vessel_id) {
            stop_effect(&mut self.world, &self.levels, drive);
        }
    }

    pub fn jump_arrive(&mut self, vessel_id: VesselId) {
        on_jump_arrive(&mut self.world, vessel_id);
    }

    pub fn jump_leave(&mut self, vessel_id: VesselId) {
        on_jump_leave(&mut self.world, vessel_id);
    }

    // ── Queries ──

    pub fn room_dilation(&self, vessel_id: VesselId, room_id: RoomId) -> i32 {
        room_dilation(&self.world, vessel_id, room_id)
    }

    pub fn room_visual(&self, vessel_id: VesselId, room_id: RoomId) -> DilationVisual {
        DilationVisual::from_amount(self.room_dilation(vessel_id, room_id))
    }

    /// Tick-rate multiplier of anything running in a room right now.
    pub fn speed_factor(&self, vessel_id: VesselId, room_id: RoomId) -> f32 {
        self.levels.multiplier(self.room_dilation(vessel_id, room_id))
    }

    pub fn charge_fraction(&self, vessel_id: VesselId) -> Option<f32> {
        charge_fraction(&self.world, vessel_id)
    }

    pub fn drive(&self, vessel_id: VesselId) -> Option<TemporalDrive> {
        let entity = find_drive(&self.world, vessel_id)?;
        let drive = self.world.get::<&TemporalDrive>(entity).ok()?;
        Some((*drive).clone())
    }

    pub fn subsystem(&self, vessel_id: VesselId, kind: SubsystemKind) -> Option<Subsystem> {
        let entity = find_subsystem(&self.world, vessel_id, kind)?;
        let system = self.world.get::<&Subsystem>(entity).ok()?;
        Some((*system).clone())
    }

    pub fn room_oxygen(&self, vessel_id: VesselId, room_id: RoomId) -> Option<f32> {
        let room = find_room(&self.world, vessel_id, room_id)?;
        let atmo = self.world.get::<&RoomAtmosphere>(room).ok()?;
        Some(atmo.oxygen)
    }

    pub fn vessel_count(&self) -> usize {
        self.world.query::<&Vessel>().iter().count()
    }

    pub fn crew_count(&self, vessel_id: VesselId) -> usize {
        self.world
            .query::<&CrewMember>()
            .iter()
            .filter(|(_, c)| c.vessel_id == vessel_id)
            .count()
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new()
    }
}
