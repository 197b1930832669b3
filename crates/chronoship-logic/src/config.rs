//! Level document loading.
//!
//! The document mirrors the hierarchical layout used by the game data:
//! a `speed` section (accelerate) and a `slow` section (decelerate), each
//! holding `levelN` entries with `cooldown`, `duration` and `strength`.
//! Values may be JSON numbers or numeric strings. Any malformed number
//! rejects the whole document.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde_json::{Map, Value};
use thiserror::Error;

use crate::levels::{Direction, LevelRecord, LevelTable, TemporalLevel};

pub const BUILTIN_LEVELS: &str = include_str!("data/temporal_levels.json");

pub const SECTION_ACCELERATE: &str = "speed";
pub const SECTION_DECELERATE: &str = "slow";
const LEVEL_PREFIX: &str = "level";

#[derive(Debug, Error)]
pub enum LevelConfigError {
    #[error("failed to parse level document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read level document from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("level document root must be an object")]
    NotAnObject,
    #[error("section `{section}` must be an object")]
    Section { section: String },
    #[error("`{section}.{name}` must be an object")]
    Entry { section: String, name: String },
    #[error("`{section}.{name}`: level suffix is not an integer")]
    LevelSuffix { section: String, name: String },
    #[error("`{section}.{name}.{field}`: expected {expected}, found {found}")]
    Field {
        section: String,
        name: String,
        field: &'static str,
        expected: &'static str,
        found: String,
    },
}

fn section_direction(section: &str) -> Option<Direction> {
    match section {
        SECTION_ACCELERATE => Some(Direction::Accelerate),
        SECTION_DECELERATE => Some(Direction::Decelerate),
        _ => None,
    }
}

/// Parse a level document into records, in document order.
pub fn parse_level_document(json: &str) -> Result<Vec<LevelRecord>, LevelConfigError> {
    let root: Value = serde_json::from_str(json)?;
    let Value::Object(sections) = root else {
        return Err(LevelConfigError::NotAnObject);
    };

    let mut records = Vec::new();
    for (section, body) in &sections {
        let Some(direction) = section_direction(section) else {
            log::debug!("ignoring unknown level section `{section}`");
            continue;
        };
        let Value::Object(levels) = body else {
            return Err(LevelConfigError::Section {
                section: section.clone(),
            });
        };

        for (name, entry) in levels {
            let Some(suffix) = name.strip_prefix(LEVEL_PREFIX) else {
                continue;
            };
            let level: i32 = suffix
                .parse()
                .map_err(|_| LevelConfigError::LevelSuffix {
                    section: section.clone(),
                    name: name.clone(),
                })?;
            let Value::Object(fields) = entry else {
                return Err(LevelConfigError::Entry {
                    section: section.clone(),
                    name: name.clone(),
                });
            };
            let params = parse_level(fields, direction.signed(level), section, name)?;
            records.push(LevelRecord {
                direction,
                level,
                cooldown: params.cooldown,
                duration: params.duration,
                strength: params.strength,
            });
        }
    }
    Ok(records)
}

/// Read the three known fields of a level entry. Missing fields keep the
/// analytic fallback for that level.
fn parse_level(
    fields: &Map<String, Value>,
    signed_level: i32,
    section: &str,
    name: &str,
) -> Result<TemporalLevel, LevelConfigError> {
    let mut params = TemporalLevel::fallback(signed_level);
    let err = |field: &'static str, expected: &'static str, value: &Value| LevelConfigError::Field {
        section: section.to_string(),
        name: name.to_string(),
        field,
        expected,
        found: value.to_string(),
    };

    if let Some(value) = fields.get("cooldown") {
        params.cooldown = int_value(value).ok_or_else(|| err("cooldown", "an integer", value))?;
    }
    if let Some(value) = fields.get("duration") {
        params.duration = int_value(value).ok_or_else(|| err("duration", "an integer", value))?;
    }
    if let Some(value) = fields.get("strength") {
        params.strength = float_value(value).ok_or_else(|| err("strength", "a number", value))?;
    }
    Ok(params)
}

fn int_value(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn float_value(value: &Value) -> Option<f32> {
    match value {
        Value::Number(n) => n.as_f64().map(|v| v as f32),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

impl LevelTable {
    pub fn from_json_str(json: &str) -> Result<Self, LevelConfigError> {
        Ok(Self::load(parse_level_document(json)?))
    }

    /// Load several documents in order; later documents override earlier
    /// ones level by level.
    pub fn from_documents<S: AsRef<str>>(documents: &[S]) -> Result<Self, LevelConfigError> {
        let mut records = Vec::new();
        for document in documents {
            records.extend(parse_level_document(document.as_ref())?);
        }
        Ok(Self::load(records))
    }

    pub fn from_file(path: &Path) -> Result<Self, LevelConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| LevelConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// The level table shipped with the crate.
    pub fn builtin() -> Result<Self, LevelConfigError> {
        Self::from_json_str(BUILTIN_LEVELS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numbers_and_strings() {
        let json = r#"{
            "speed": { "level1": { "cooldown": 4, "duration": 15, "strength": 2.0 } },
            "slow": { "level2": { "cooldown": "6", "duration": "12", "strength": "0.3" } }
        }"#;
        let table = LevelTable::from_json_str(json).unwrap();
        assert_eq!(table.duration(1), 15);
        assert_eq!(table.strength(1), 2.0);
        assert_eq!(table.cooldown(-2), 6);
        assert_eq!(table.duration(-2), 12);
        assert_eq!(table.strength(-2), 0.3);
    }

    #[test]
    fn test_malformed_number_is_fatal() {
        let json = r#"{ "speed": { "level1": { "cooldown": "four" } } }"#;
        let err = LevelTable::from_json_str(json).unwrap_err();
        match err {
            LevelConfigError::Field { field, section, name, .. } => {
                assert_eq!(field, "cooldown");
                assert_eq!(section, "speed");
                assert_eq!(name, "level1");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_fractional_duration_rejected() {
        let json = r#"{ "slow": { "level1": { "duration": 2.5 } } }"#;
        assert!(matches!(
            parse_level_document(json),
            Err(LevelConfigError::Field { field: "duration", .. })
        ));
    }

    #[test]
    fn test_bad_level_suffix_rejected() {
        let json = r#"{ "speed": { "levelX": { "duration": 3 } } }"#;
        assert!(matches!(
            parse_level_document(json),
            Err(LevelConfigError::LevelSuffix { .. })
        ));
    }

    #[test]
    fn test_non_level_children_and_unknown_sections_ignored() {
        let json = r#"{
            "speed": { "comment": "ignored", "level1": { "duration": 7 } },
            "rewind": { "level1": { "duration": 99 } }
        }"#;
        let records = parse_level_document(json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].direction, Direction::Accelerate);
        assert_eq!(records[0].duration, 7);
    }

    #[test]
    fn test_missing_fields_use_fallbacks() {
        let json = r#"{ "slow": { "level3": { "duration": 5 } } }"#;
        let table = LevelTable::from_json_str(json).unwrap();
        assert_eq!(table.duration(-3), 5);
        assert_eq!(table.cooldown(-3), 4);
        assert_eq!(table.strength(-3), 0.125);
    }

    #[test]
    fn test_later_document_overrides() {
        let base =
            r#"{ "speed": { "level1": { "cooldown": 4, "duration": 15, "strength": 2.0 } } }"#;
        let overlay =
            r#"{ "speed": { "level1": { "cooldown": 8, "duration": 20, "strength": 1.5 } } }"#;
        let table = LevelTable::from_documents(&[base, overlay]).unwrap();
        assert_eq!(table.cooldown(1), 8);
        assert_eq!(table.duration(1), 20);
        assert_eq!(table.strength(1), 1.5);
    }

    #[test]
    fn test_aliased_levels_last_entry_wins() {
        let json =
            r#"{ "speed": { "level1": { "duration": 15 }, "level01": { "duration": 99 } } }"#;
        let records = parse_level_document(json).unwrap();
        let durations: Vec<i32> = records.iter().map(|r| r.duration).collect();
        assert_eq!(durations, vec![15, 99]);

        let table = LevelTable::from_json_str(json).unwrap();
        assert_eq!(table.duration(1), 99);
        assert_eq!(table.len(Direction::Accelerate), 1);
    }

    #[test]
    fn test_root_must_be_object() {
        assert!(matches!(
            parse_level_document("[1, 2]"),
            Err(LevelConfigError::NotAnObject)
        ));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = LevelTable::from_file(Path::new("/nonexistent/levels.json")).unwrap_err();
        assert!(matches!(err, LevelConfigError::Read { .. }));
        assert!(err.to_string().contains("levels.json"));
    }

    #[test]
    fn test_builtin_document_parses() {
        let table = LevelTable::builtin().unwrap();
        assert!(!table.is_empty());
    }
}
