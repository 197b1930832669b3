//! Chronoship Headless Simulation Harness
//!
//! Drives the temporal drive end to end against the bundled level table:
//! arming, targeting, expiry, cooldown and propagation into consumers.
//! Runs entirely in-process, no rendering.
//!
//! Usage:
//!   cargo run -p chronoship-simtest
//!   cargo run -p chronoship-simtest -- --verbose
//!   cargo run -p chronoship-simtest -- --levels overrides.json

use std::path::PathBuf;
use std::sync::Arc;

use chronoship_core::prelude::*;
use chronoship_logic::atmosphere::atmo_constants;
use chronoship_logic::config::BUILTIN_LEVELS;
use chronoship_logic::{Direction, LevelTable};

const PLAYER: VesselId = 0;
const ENEMY: VesselId = 1;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let verbose = std::env::args().any(|a| a == "--verbose");
    let overlay = level_overlay_arg();
    println!("=== Chronoship Simulation Harness ===\n");

    let levels = match load_levels(overlay) {
        Ok(levels) => Arc::new(levels),
        Err(e) => {
            log::error!("failed to load level table: {e}");
            std::process::exit(2);
        }
    };

    let mut results = Vec::new();

    // 1. Level table
    results.extend(validate_level_table(&levels, verbose));

    // 2. Drive lifecycle
    results.extend(validate_drive_lifecycle(&levels, verbose));

    // 3. Targeting
    results.extend(validate_targeting(&levels, verbose));

    // 4. Propagation into consumers
    results.extend(validate_propagation(&levels, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!("\n=== RESULT: {}/{} passed, {} failed ===", passed, total, failed);

    if failed > 0 {
        std::process::exit(1);
    }
}

fn level_overlay_arg() -> Option<PathBuf> {
    let args: Vec<String> = std::env::args().collect();
    args.iter()
        .position(|a| a == "--levels")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from)
}

/// The bundled table, optionally overridden level by level from a file.
fn load_levels(overlay: Option<PathBuf>) -> Result<LevelTable, chronoship_logic::LevelConfigError> {
    match overlay {
        None => LevelTable::builtin(),
        Some(path) => {
            let contents = std::fs::read_to_string(&path).map_err(|source| {
                chronoship_logic::LevelConfigError::Read {
                    path: path.clone(),
                    source,
                }
            })?;
            log::info!("applying level overrides from {}", path.display());
            LevelTable::from_documents(&[BUILTIN_LEVELS, contents.as_str()])
        }
    }
}

/// Player with bridge, galley and drive room; enemy with one room.
fn scenario(levels: &Arc<LevelTable>, power: u8, enemy_shields: u8) -> SimulationEngine {
    let mut engine = SimulationEngine::with_shared_levels(Arc::clone(levels), 42);
    engine.spawn_vessel(Vessel::new(PLAYER, "Kestrel"));
    engine.spawn_room(PLAYER, 1, "Bridge");
    engine.spawn_room(PLAYER, 2, "Galley");
    engine.spawn_room(PLAYER, 3, "Temporal");
    engine.connect_rooms(PLAYER, 1, 2);
    let drive = engine.spawn_subsystem(PLAYER, 3, SubsystemKind::Temporal, 4);
    if let Ok(mut system) = engine.world.get::<&mut Subsystem>(drive) {
        system.set_power(power);
    }

    engine.spawn_vessel(Vessel::new(ENEMY, "Rebel Fighter").with_shields(enemy_shields));
    engine.spawn_room(ENEMY, 7, "Weapons");
    engine
}

// ── 1. Level Table ──────────────────────────────────────────────────────

fn validate_level_table(levels: &LevelTable, verbose: bool) -> Vec<TestResult> {
    println!("--- Level Table ---");
    let mut results = Vec::new();

    let accel = levels.len(Direction::Accelerate);
    let decel = levels.len(Direction::Decelerate);
    results.push(TestResult {
        name: "levels_loaded".into(),
        passed: accel > 0 && decel > 0,
        detail: format!("{} accelerate, {} decelerate", accel, decel),
    });

    let monotone = (1..=accel as i32).all(|l| levels.strength(l) > 1.0)
        && (1..=decel as i32).all(|l| levels.strength(-l) < 1.0);
    results.push(TestResult {
        name: "levels_directional_strength".into(),
        passed: monotone,
        detail: "accelerate > 1.0, decelerate < 1.0".into(),
    });

    results.push(TestResult {
        name: "levels_neutral_multiplier".into(),
        passed: levels.multiplier(0) == 1.0,
        detail: format!("multiplier(0) = {}", levels.multiplier(0)),
    });

    let unconfigured = accel.max(decel) as i32 + 3;
    let fallback_ok = levels.duration(unconfigured) == 10
        && levels.cooldown(-unconfigured) == 4
        && levels.strength(-3 - decel as i32) == 2.0_f64.powi(-3 - decel as i32) as f32;
    results.push(TestResult {
        name: "levels_fallbacks".into(),
        passed: fallback_ok,
        detail: format!("level {} uses duration 10 / cooldown 4 / 2^level", unconfigured),
    });

    if verbose {
        for power in 1..=accel.max(decel) as i32 {
            let preview = levels.preview(power);
            println!(
                "  power {}: speed x{:.2} for {} (cd {}), slow x{:.2} for {} (cd {})",
                power,
                preview.accelerate.strength,
                preview.accelerate.duration,
                preview.accelerate.cooldown,
                preview.decelerate.strength,
                preview.decelerate.duration,
                preview.decelerate.cooldown
            );
        }
    }

    results
}

// ── 2. Drive Lifecycle ──────────────────────────────────────────────────

fn validate_drive_lifecycle(levels: &Arc<LevelTable>, verbose: bool) -> Vec<TestResult> {
    println!("--- Drive Lifecycle ---");
    let mut results = Vec::new();

    let mut engine = scenario(levels, 1, 0);
    let armed = engine.arm(PLAYER, Direction::Accelerate);
    let outcome = engine.select_target(PLAYER, TargetSelection::OwnRoom(1));
    results.push(TestResult {
        name: "drive_activates_from_armed".into(),
        passed: armed
            && outcome == TargetOutcome::Activated
            && engine.room_dilation(PLAYER, 1) == 1,
        detail: format!("outcome {:?}, room value {}", outcome, engine.room_dilation(PLAYER, 1)),
    });

    let duration = levels.duration(1);
    let mut ticks = 0;
    while engine.room_dilation(PLAYER, 1) != 0 && ticks < duration * 2 {
        engine.update(1.0);
        ticks += 1;
    }
    results.push(TestResult {
        name: "drive_expires_on_duration".into(),
        passed: ticks == duration,
        detail: format!("expired after {} ticks (duration {})", ticks, duration),
    });

    let cooldown = levels.cooldown(1);
    let locked_after_expiry = !engine.arm(PLAYER, Direction::Accelerate);
    for _ in 0..cooldown {
        engine.update(1.0);
    }
    let ready_after_cooldown = engine.arm(PLAYER, Direction::Accelerate);
    results.push(TestResult {
        name: "drive_cooldown".into(),
        passed: locked_after_expiry && ready_after_cooldown,
        detail: format!("locked {} ticks then ready", cooldown),
    });
    engine.disarm(PLAYER);

    let mut engine = scenario(levels, 1, 0);
    engine.start_effect(PLAYER, PLAYER, 1, Direction::Decelerate);
    let second = engine.start_effect(PLAYER, PLAYER, 2, Direction::Accelerate);
    results.push(TestResult {
        name: "drive_single_room".into(),
        passed: !second && engine.room_dilation(PLAYER, 2) == 0,
        detail: "second activation rejected".into(),
    });

    engine.jump_leave(PLAYER);
    engine.stop_effect(PLAYER);
    engine.jump_arrive(PLAYER);
    let ready = engine.arm(PLAYER, Direction::Accelerate);
    results.push(TestResult {
        name: "drive_jump_resets_cooldown".into(),
        passed: ready,
        detail: "ready after jump arrival".into(),
    });

    if verbose {
        println!("  lifecycle ran {} ticks", engine.tick);
    }

    results
}

// ── 3. Targeting ────────────────────────────────────────────────────────

fn validate_targeting(levels: &Arc<LevelTable>, _verbose: bool) -> Vec<TestResult> {
    println!("--- Targeting ---");
    let mut results = Vec::new();
    let enemy_room = TargetSelection::EnemyRoom {
        vessel_id: ENEMY,
        room_id: 7,
    };

    let mut engine = scenario(levels, 2, 1);
    engine.arm(PLAYER, Direction::Decelerate);
    let notice = engine.preview_target(PLAYER, enemy_room);
    let outcome = engine.select_target(PLAYER, enemy_room);
    results.push(TestResult {
        name: "targeting_shield_block".into(),
        passed: notice == Some(TargetNotice::ShieldBlocked)
            && outcome == TargetOutcome::ShieldBlocked
            && engine.room_dilation(ENEMY, 7) == 0
            && !engine.any_armed(PLAYER),
        detail: format!("notice {:?}, outcome {:?}", notice, outcome),
    });

    let mut engine = scenario(levels, 2, 0);
    engine.arm(PLAYER, Direction::Decelerate);
    let outcome = engine.select_target(PLAYER, enemy_room);
    results.push(TestResult {
        name: "targeting_enemy_room".into(),
        passed: outcome == TargetOutcome::Activated && engine.room_dilation(ENEMY, 7) == -2,
        detail: format!("enemy room value {}", engine.room_dilation(ENEMY, 7)),
    });

    results
}

// ── 4. Propagation ──────────────────────────────────────────────────────

fn validate_propagation(levels: &Arc<LevelTable>, verbose: bool) -> Vec<TestResult> {
    println!("--- Propagation ---");
    let mut results = Vec::new();

    // Breach loss in a sped-up room vs an untouched one. Rooms 1 and 2 are
    // connected, so compare against the sealed drive room instead.
    let mut engine = scenario(levels, 1, 0);
    engine.start_effect(PLAYER, PLAYER, 1, Direction::Accelerate);
    engine.set_breach(PLAYER, 1, true);
    engine.set_breach(PLAYER, 3, true);
    engine.update(1.0);
    let fast_loss = 100.0 - engine.room_oxygen(PLAYER, 1).unwrap_or(100.0);
    let plain_loss = 100.0 - engine.room_oxygen(PLAYER, 3).unwrap_or(100.0);
    let expected = levels.strength(1) * atmo_constants::BREACH_LOSS;
    results.push(TestResult {
        name: "propagation_atmosphere".into(),
        passed: (plain_loss - atmo_constants::BREACH_LOSS).abs() < 1e-3
            && (fast_loss - expected).abs() < 1e-3,
        detail: format!(
            "fast room lost {:.2} (expected {:.2}), plain room {:.2}",
            fast_loss, expected, plain_loss
        ),
    });

    // Crew work pace.
    let mut engine = scenario(levels, 1, 0);
    let fast = engine.spawn_crew(PLAYER, 1, "Hale");
    let plain = engine.spawn_crew(PLAYER, 3, "Ortiz");
    engine.set_crew_action(fast, CrewAction::Manning);
    engine.set_crew_action(plain, CrewAction::Manning);
    engine.start_effect(PLAYER, PLAYER, 1, Direction::Accelerate);
    let ticks = (crew_constants::ACTION_TIME * 2.0) as usize;
    for _ in 0..ticks {
        engine.update(1.0);
    }
    let done = |entity| {
        engine
            .world
            .get::<&CrewMember>(entity)
            .map(|c| c.actions_completed)
            .unwrap_or(0)
    };
    let (fast_done, plain_done) = (done(fast), done(plain));
    results.push(TestResult {
        name: "propagation_crew_pace".into(),
        passed: fast_done > plain_done,
        detail: format!("{} actions in sped-up room vs {}", fast_done, plain_done),
    });

    // Scoped value never leaks past its scope.
    let bus = PropagationBus::neutral(levels, 1.0);
    let inside = {
        let _scope = bus.enter(-1);
        bus.speed_factor()
    };
    results.push(TestResult {
        name: "propagation_scope_restores".into(),
        passed: bus.current_amount() == 0 && inside == levels.strength(-1),
        detail: format!("inside x{:.2}, after x{:.2}", inside, bus.speed_factor()),
    });

    if verbose {
        println!("  crew ran {} ticks", ticks);
    }

    results
}
