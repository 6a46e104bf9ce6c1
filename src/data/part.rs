//! Part records: the YAML schema behind `data/parts.yaml`.

use std::fs;

use serde::Deserialize;

use crate::combat::ship::Part;

pub const DEFAULT_PARTS_PATH: &str = "data/parts.yaml";

fn default_true() -> bool {
    true
}

/// One `parts:` entry. Numeric fields default to 0, flags to false,
/// `available` to true, so dataset entries only spell out what they use.
#[derive(Debug, Clone, Deserialize)]
pub struct PartRecord {
    pub name: String,
    #[serde(default)]
    pub damage: i32,
    #[serde(default)]
    pub shots: i32,
    #[serde(default)]
    pub power: i32,
    #[serde(default)]
    pub armor: i32,
    #[serde(default)]
    pub shield: i32,
    #[serde(default)]
    pub hit_bonus: i32,
    #[serde(default)]
    pub initiative: i32,
    #[serde(default)]
    pub weapon: bool,
    #[serde(default)]
    pub missile: bool,
    #[serde(default)]
    pub drive: bool,
    #[serde(default)]
    pub ancient: bool,
    #[serde(default = "default_true")]
    pub available: bool,
}

impl PartRecord {
    pub fn to_part(&self) -> Part {
        Part {
            name: self.name.clone(),
            damage: self.damage,
            nshots: self.shots,
            power: self.power,
            armor: self.armor,
            shield: self.shield,
            hit_bonus: self.hit_bonus,
            initiative: self.initiative,
            is_weapon: self.weapon,
            is_missile: self.missile,
            is_drive: self.drive,
            is_ancient: self.ancient,
            is_available: self.available,
        }
    }
}

impl Default for PartRecord {
    fn default() -> Self {
        Self {
            name: String::new(),
            damage: 0,
            shots: 0,
            power: 0,
            armor: 0,
            shield: 0,
            hit_bonus: 0,
            initiative: 0,
            weapon: false,
            missile: false,
            drive: false,
            ancient: false,
            available: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PartsFile {
    pub parts: Vec<PartRecord>,
}

pub fn load_part_records(path: &str) -> Result<Vec<PartRecord>, String> {
    let raw = fs::read_to_string(path).map_err(|err| format!("unable to read '{path}': {err}"))?;
    let file: PartsFile =
        serde_yaml::from_str(&raw).map_err(|err| format!("unable to parse yaml '{path}': {err}"))?;
    Ok(file.parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_defaults_fill_unspecified_fields() {
        let yaml = "parts:\n  - name: Test Cannon\n    damage: 2\n    shots: 1\n    weapon: true\n";
        let file: PartsFile = serde_yaml::from_str(yaml).unwrap();
        let record = &file.parts[0];
        assert_eq!(record.name, "Test Cannon");
        assert_eq!(record.damage, 2);
        assert_eq!(record.power, 0);
        assert!(record.weapon);
        assert!(!record.missile);
        assert!(record.available);
    }

    #[test]
    fn to_part_carries_every_field() {
        let record = PartRecord {
            name: "Launcher".to_string(),
            damage: 2,
            shots: 2,
            weapon: true,
            missile: true,
            ..PartRecord::default()
        };
        let part = record.to_part();
        assert_eq!(part.name, "Launcher");
        assert_eq!(part.damage, 2);
        assert_eq!(part.nshots, 2);
        assert!(part.is_weapon);
        assert!(part.is_missile);
        assert!(part.is_available);
    }

    #[test]
    fn missing_name_is_a_parse_error() {
        let yaml = "parts:\n  - damage: 2\n";
        assert!(serde_yaml::from_str::<PartsFile>(yaml).is_err());
    }
}
