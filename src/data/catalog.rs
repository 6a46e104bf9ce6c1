//! The template catalog: part and hull records resolved into shared
//! immutable templates, keyed by normalized lookup name.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::combat::ship::{Hull, Part, Ship, EMPTY_SLOT_NAME};
use crate::data::hull::{load_hull_records, HullRecord, DEFAULT_HULLS_PATH};
use crate::data::part::{load_part_records, PartRecord, DEFAULT_PARTS_PATH};

/// Lookup keys keep ASCII alphanumerics only, lowercased, so dataset names
/// match user input regardless of case and spacing.
pub fn normalize_lookup(raw: &str) -> String {
    raw.chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

#[derive(Debug, Clone)]
pub struct Catalog {
    parts: BTreeMap<String, Arc<Part>>,
    hulls: BTreeMap<String, Arc<Hull>>,
}

impl Catalog {
    /// Resolves records into templates. Fails on duplicate or unusable
    /// names, unresolvable default part references, or a hull whose default
    /// loadout is illegal; a dataset with any of these is internally
    /// inconsistent and unusable.
    pub fn from_records(
        part_records: &[PartRecord],
        hull_records: &[HullRecord],
    ) -> Result<Self, String> {
        let mut parts = BTreeMap::new();
        for record in part_records {
            let key = normalize_lookup(&record.name);
            if key.is_empty() {
                return Err(format!("part '{}' has no usable lookup name", record.name));
            }
            if parts.insert(key, Arc::new(record.to_part())).is_some() {
                return Err(format!("duplicate part name '{}'", record.name));
            }
        }
        // The filler part must always resolve, dataset or not.
        parts
            .entry(normalize_lookup(EMPTY_SLOT_NAME))
            .or_insert_with(|| Arc::new(Part::empty_slot()));

        let mut hulls = BTreeMap::new();
        for record in hull_records {
            let key = normalize_lookup(&record.name);
            if key.is_empty() {
                return Err(format!("hull '{}' has no usable lookup name", record.name));
            }
            let mut default_parts = Vec::with_capacity(record.default_parts.len());
            for part_name in &record.default_parts {
                let part = parts.get(&normalize_lookup(part_name)).ok_or_else(|| {
                    format!(
                        "hull '{}' references unknown part '{part_name}'",
                        record.name
                    )
                })?;
                default_parts.push(Arc::clone(part));
            }
            let hull = Arc::new(record.to_hull(default_parts));
            check_default_loadout(&hull)?;
            if hulls.insert(key, hull).is_some() {
                return Err(format!("duplicate hull name '{}'", record.name));
            }
        }

        Ok(Self { parts, hulls })
    }

    pub fn load(parts_path: &str, hulls_path: &str) -> Result<Self, String> {
        let part_records = load_part_records(parts_path)?;
        let hull_records = load_hull_records(hulls_path)?;
        Self::from_records(&part_records, &hull_records)
    }

    pub fn load_default() -> Result<Self, String> {
        Self::load(DEFAULT_PARTS_PATH, DEFAULT_HULLS_PATH)
    }

    pub fn resolve_part(&self, name: &str) -> Option<Arc<Part>> {
        self.parts.get(&normalize_lookup(name)).cloned()
    }

    pub fn resolve_hull(&self, name: &str) -> Option<Arc<Hull>> {
        self.hulls.get(&normalize_lookup(name)).cloned()
    }

    /// Parts in lookup-key order.
    pub fn parts(&self) -> impl Iterator<Item = &Arc<Part>> {
        self.parts.values()
    }

    /// Hulls in lookup-key order.
    pub fn hulls(&self) -> impl Iterator<Item = &Arc<Hull>> {
        self.hulls.values()
    }
}

/// A hull's own default loadout must be legal; anything else means the
/// static data contradicts itself.
fn check_default_loadout(hull: &Arc<Hull>) -> Result<(), String> {
    if hull.default_parts.len() != hull.nslots as usize {
        return Err(format!(
            "hull '{}' default loadout fills {} of {} slots",
            hull.name,
            hull.default_parts.len(),
            hull.nslots
        ));
    }
    let probe = Ship::new(0, Arc::clone(hull), hull.default_parts.clone(), false);
    if probe.stats.net_power < 0 {
        return Err(format!(
            "hull '{}' default loadout draws more power than it supplies",
            hull.name
        ));
    }
    if hull.needs_drive && !probe.stats.has_drive {
        return Err(format!(
            "hull '{}' requires a drive but its default loadout equips none",
            hull.name
        ));
    }
    Ok(())
}
