//! Enemy placement side files
//!
//! ```json
//! { "enemies": [ { "name": "Crab", "start_pos": [8, 28], "final_pos": [14, 28] } ] }
//! ```
//!
//! Positions are in tile units.

use glam::IVec2;
use serde::Deserialize;

use super::LevelError;
use crate::settings::EnemyKind;

#[derive(Debug, Deserialize)]
struct PlacementFile {
    enemies: Vec<RawPlacement>,
}

#[derive(Debug, Deserialize)]
struct RawPlacement {
    name: String,
    start_pos: [f64; 2],
    final_pos: [f64; 2],
}

/// One validated enemy placement (tile coordinates)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyPlacement {
    pub kind: EnemyKind,
    pub start: IVec2,
    pub end: IVec2,
}

/// Parse and validate a placement document
pub fn parse_placements(json: &str) -> Result<Vec<EnemyPlacement>, LevelError> {
    let file: PlacementFile = serde_json::from_str(json)
        .map_err(|e| LevelError::MalformedLevelData(format!("enemy placements: {e}")))?;

    file.enemies
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            let kind = EnemyKind::from_name(&raw.name).ok_or_else(|| {
                LevelError::MalformedLevelData(format!("enemy {i}: unknown name '{}'", raw.name))
            })?;
            let start = tile_coord(raw.start_pos, i, "start_pos")?;
            let end = tile_coord(raw.final_pos, i, "final_pos")?;
            if end.x < start.x {
                return Err(LevelError::MalformedLevelData(format!(
                    "enemy {i}: final_pos.x {} is left of start_pos.x {}",
                    end.x, start.x
                )));
            }
            Ok(EnemyPlacement { kind, start, end })
        })
        .collect()
}

fn tile_coord(pos: [f64; 2], index: usize, field: &str) -> Result<IVec2, LevelError> {
    let valid = |v: f64| v >= 0.0 && v.fract() == 0.0 && v <= i32::MAX as f64;
    if !pos.iter().all(|&v| valid(v)) {
        return Err(LevelError::MalformedLevelData(format!(
            "enemy {index}: {field} {:?} must be non-negative integers",
            pos
        )));
    }
    Ok(IVec2::new(pos[0] as i32, pos[1] as i32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let json = r#"{ "enemies": [
            { "name": "Crab", "start_pos": [8, 28], "final_pos": [14, 28] },
            { "name": "Pumpkin", "start_pos": [3, 10], "final_pos": [3, 10] }
        ] }"#;
        let placements = parse_placements(json).unwrap();
        assert_eq!(placements.len(), 2);
        assert_eq!(placements[0].kind, EnemyKind::Crab);
        assert_eq!(placements[0].start, IVec2::new(8, 28));
        assert_eq!(placements[1].end, IVec2::new(3, 10));
    }

    #[test]
    fn test_rejects_bad_entries() {
        let cases = [
            r#"{ "enemies": [ { "name": "Dragon", "start_pos": [1, 1], "final_pos": [2, 1] } ] }"#,
            r#"{ "enemies": [ { "name": "Crab", "start_pos": [-1, 1], "final_pos": [2, 1] } ] }"#,
            r#"{ "enemies": [ { "name": "Crab", "start_pos": [1.5, 1], "final_pos": [2, 1] } ] }"#,
            r#"{ "enemies": [ { "name": "Crab", "start_pos": [5, 1], "final_pos": [2, 1] } ] }"#,
            r#"{ "enemies": [ { "name": "Crab", "start_pos": [5, 1] } ] }"#,
            r#"{ "monsters": [] }"#,
        ];
        for json in cases {
            let err = parse_placements(json).unwrap_err();
            assert!(matches!(err, LevelError::MalformedLevelData(_)), "{json}");
        }
    }
}
