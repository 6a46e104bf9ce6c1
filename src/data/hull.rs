//! Hull records: the YAML schema behind `data/hulls.yaml`.

use std::fs;
use std::sync::Arc;

use serde::Deserialize;

use crate::combat::ship::{Hull, Part};

pub const DEFAULT_HULLS_PATH: &str = "data/hulls.yaml";

fn default_one() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

/// One `hulls:` entry. `slots` is required; `default_parts` names parts by
/// their catalog lookup name and is resolved at catalog construction.
#[derive(Debug, Clone, Deserialize)]
pub struct HullRecord {
    pub name: String,
    #[serde(default = "default_one")]
    pub max_count: u32,
    pub slots: u32,
    #[serde(default)]
    pub bonus_power: i32,
    #[serde(default)]
    pub bonus_initiative: i32,
    #[serde(default)]
    pub needs_drive: bool,
    #[serde(default = "default_true")]
    pub mobile: bool,
    #[serde(default)]
    pub default_parts: Vec<String>,
}

impl HullRecord {
    /// `default_parts` are the already-resolved templates for this record's
    /// part names, in record order.
    pub fn to_hull(&self, default_parts: Vec<Arc<Part>>) -> Hull {
        Hull {
            name: self.name.clone(),
            nmax: self.max_count,
            nslots: self.slots,
            bonus_power: self.bonus_power,
            bonus_initiative: self.bonus_initiative,
            needs_drive: self.needs_drive,
            is_mobile: self.mobile,
            default_parts,
        }
    }
}

impl Default for HullRecord {
    fn default() -> Self {
        Self {
            name: String::new(),
            max_count: 1,
            slots: 0,
            bonus_power: 0,
            bonus_initiative: 0,
            needs_drive: false,
            mobile: true,
            default_parts: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HullsFile {
    pub hulls: Vec<HullRecord>,
}

pub fn load_hull_records(path: &str) -> Result<Vec<HullRecord>, String> {
    let raw = fs::read_to_string(path).map_err(|err| format!("unable to read '{path}': {err}"))?;
    let file: HullsFile =
        serde_yaml::from_str(&raw).map_err(|err| format!("unable to parse yaml '{path}': {err}"))?;
    Ok(file.hulls)
}
