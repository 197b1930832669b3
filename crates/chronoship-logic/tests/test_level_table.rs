//! Integration tests for loading temporal level tables.
//!
//! Exercises: level document → records → LevelTable → previews.

use std::fs;

use chronoship_logic::config::{parse_level_document, BUILTIN_LEVELS};
use chronoship_logic::{CountdownTimer, Direction, LevelConfigError, LevelTable};

// ── Helpers ────────────────────────────────────────────────────────────

const OVERLAY: &str = r#"{
    "speed": { "level1": { "duration": "40" } },
    "slow": { "level5": { "cooldown": 12, "duration": 8, "strength": 0.1 } }
}"#;

// ── Builtin document ──────────────────────────────────────────────────

#[test]
fn test_builtin_covers_four_levels_each_way() {
    let table = LevelTable::builtin().unwrap();
    assert_eq!(table.len(Direction::Accelerate), 4);
    assert_eq!(table.len(Direction::Decelerate), 4);

    for level in 1..=4 {
        assert!(table.strength(level) > 1.0, "accelerate level {level} must speed up");
        assert!(table.strength(-level) < 1.0, "decelerate level {level} must slow down");
    }
}

#[test]
fn test_builtin_records_in_document_order() {
    let records = parse_level_document(BUILTIN_LEVELS).unwrap();
    let order: Vec<(Direction, i32)> = records.iter().map(|r| (r.direction, r.level)).collect();
    let expected: Vec<(Direction, i32)> = (1..=4)
        .map(|l| (Direction::Accelerate, l))
        .chain((1..=4).map(|l| (Direction::Decelerate, l)))
        .collect();
    assert_eq!(order, expected);
}

#[test]
fn test_aliased_keys_resolve_in_document_order() {
    // `level+1` and `level01` both name level 1; whichever comes last wins.
    let json = r#"{
        "slow": { "level01": { "duration": 30 }, "level1": { "duration": 12 } },
        "speed": { "level1": { "duration": 15 }, "level+1": { "duration": 99 } }
    }"#;
    let table = LevelTable::from_json_str(json).unwrap();
    assert_eq!(table.duration(1), 99);
    assert_eq!(table.duration(-1), 12);

    let records = parse_level_document(json).unwrap();
    assert_eq!(records[0].direction, Direction::Decelerate);
    assert_eq!(records[3].direction, Direction::Accelerate);
}

// ── Overlays ──────────────────────────────────────────────────────────

#[test]
fn test_overlay_replaces_whole_level() {
    let table = LevelTable::from_documents(&[BUILTIN_LEVELS, OVERLAY]).unwrap();

    // The overlay entry replaces level 1 wholesale; unspecified fields fall
    // back to the analytic defaults rather than the base document.
    assert_eq!(table.duration(1), 40);
    assert_eq!(table.cooldown(1), 4);
    assert_eq!(table.strength(1), 2.0);

    assert_eq!(table.duration(2), 20);
    assert_eq!(table.cooldown(-5), 12);
    assert_eq!(table.len(Direction::Decelerate), 5);
}

#[test]
fn test_bad_overlay_rejects_everything() {
    let bad = r#"{ "slow": { "level2": { "strength": "fast" } } }"#;
    let err = LevelTable::from_documents(&[BUILTIN_LEVELS, bad]).unwrap_err();
    assert!(matches!(err, LevelConfigError::Field { field: "strength", .. }));
    assert!(err.to_string().contains("slow.level2.strength"));
}

// ── Files ─────────────────────────────────────────────────────────────

#[test]
fn test_load_from_file() {
    let path = std::env::temp_dir().join(format!("chronoship-levels-{}.json", std::process::id()));
    fs::write(&path, OVERLAY).unwrap();
    let table = LevelTable::from_file(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(table.duration(1), 40);
    assert_eq!(table.strength(-5), 0.1);
    assert_eq!(table.strength(-1), 0.5);
}

// ── Timer against the table ───────────────────────────────────────────

#[test]
fn test_timer_runs_for_configured_duration() {
    let table = LevelTable::builtin().unwrap();
    let mut timer = CountdownTimer::new();
    timer.start(table.duration(3) as f32);

    let mut ticks = 0;
    while !timer.done() {
        timer.update(1.0);
        ticks += 1;
    }
    assert_eq!(ticks, 25);
}

#[test]
fn test_preview_matches_lookups() {
    let table = LevelTable::builtin().unwrap();
    let preview = table.preview(2);
    assert_eq!(preview.accelerate.strength, table.strength(2));
    assert_eq!(preview.decelerate.duration, table.duration(-2));
    assert_eq!(preview.decelerate.cooldown, table.cooldown(-2));
}
